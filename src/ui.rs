use egui::{Color32, RichText, Ui};
use std::path::{Path, PathBuf};

use crate::game::{AnswerOutcome, NameError, Round, RoundSummary};

const CORRECT_COLOR: Color32 = Color32::from_rgb(0x4C, 0xAF, 0x50);
const WRONG_COLOR: Color32 = Color32::from_rgb(0xF4, 0x43, 0x36);
const ACCENT_COLOR: Color32 = Color32::from_rgb(0xE6, 0x51, 0x00);

pub struct TriviaUI {
    pub show_settings: bool,
    pub name_input: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TriviaAction {
    None,
    NameEdited,
    StartGame,
    Answer(char),
    NextQuestion,
    PlayAgain,
    Exit,
}

impl Default for TriviaUI {
    fn default() -> Self {
        Self {
            show_settings: false,
            name_input: String::new(),
        }
    }
}

impl TriviaUI {
    pub fn show_instructions(
        &mut self,
        ui: &mut Ui,
        name_check: &Result<String, NameError>,
        round_seconds: u64,
    ) -> TriviaAction {
        let mut action = TriviaAction::None;

        ui.vertical_centered(|ui| {
            ui.heading(
                RichText::new("Welcome to the Ultimate Movie Trivia Game!").color(Color32::RED),
            );
            ui.add_space(20.0);
            ui.label(RichText::new(format!(
                "Answer the questions as best you can.\n\
                 Each question has multiple choices.\n\
                 Choose an answer to proceed.\n\n\
                 You earn 5 points for each correct answer\n\
                 and lose 1 point for each incorrect answer.\n\
                 You have {} seconds to get a score high enough\n\
                 to make the Top 5 leaderboard.\n\n\
                 Enter your name below and click Start Game!",
                round_seconds
            ))
            .size(18.0));
            ui.add_space(20.0);

            if ui.text_edit_singleline(&mut self.name_input).changed() {
                action = TriviaAction::NameEdited;
            }

            match name_check {
                // An untouched, empty entry gets no warning.
                Err(_) if self.name_input.is_empty() => {}
                Err(e) => {
                    ui.label(RichText::new(e.to_string()).italics().color(Color32::RED));
                }
                Ok(_) => {}
            }

            ui.add_space(30.0);
            let start = egui::Button::new(RichText::new("Start Game").size(18.0).strong());
            if ui.add_enabled(name_check.is_ok(), start).clicked() {
                action = TriviaAction::StartGame;
            }
        });

        action
    }

    pub fn show_settings(
        &mut self,
        ui: &mut Ui,
        trivia_path: &Path,
        recent_files: &[(String, i64)],
        error: Option<&str>,
    ) -> Option<PathBuf> {
        let mut selected = None;

        ui.heading("Settings");
        ui.separator();

        ui.label("Trivia File:");
        ui.horizontal(|ui| {
            ui.label(trivia_path.display().to_string());
            if ui.button("Browse").clicked() {
                let mut dialog = rfd::FileDialog::new();
                if let Some(dir) = trivia_path.parent().filter(|dir| dir.is_dir()) {
                    dialog = dialog.set_directory(dir);
                }
                selected = dialog.pick_file();
            }
        });

        if !recent_files.is_empty() {
            ui.add_space(10.0);
            ui.label("Recent Files:");
            for (file, _) in recent_files {
                if ui.button(file).clicked() {
                    selected = Some(PathBuf::from(file));
                }
            }
        }

        if let Some(error) = error {
            ui.label(RichText::new(error).color(Color32::RED));
        }

        selected
    }

    pub fn show_question(&mut self, ui: &mut Ui, round: &Round, seconds_left: u64) -> TriviaAction {
        let mut action = TriviaAction::None;
        let question = round.question();
        let answered = round.answered();

        ui.vertical_centered(|ui| {
            ui.label(RichText::new(format!("Score: {}", round.score())).size(18.0).strong());
            ui.label(
                RichText::new(format!("Time Left: {} s", seconds_left))
                    .size(16.0)
                    .strong()
                    .color(Color32::RED),
            );

            ui.add_space(30.0);
            ui.label(RichText::new(&question.prompt).size(18.0).strong());
            ui.add_space(10.0);

            for choice in &question.choices {
                let mut button = egui::Button::new(
                    RichText::new(format!("{}: {}", choice.label, choice.text)).size(16.0),
                );
                if answered.is_some() {
                    if choice.text == question.correct_answer {
                        button = button.fill(CORRECT_COLOR);
                    } else if answered.map(|(label, _)| label) == Some(choice.label) {
                        button = button.fill(WRONG_COLOR);
                    }
                }
                if ui.add_enabled(answered.is_none(), button).clicked() {
                    action = TriviaAction::Answer(choice.label);
                }
            }

            ui.add_space(30.0);
            match answered {
                None => {
                    ui.label(RichText::new("Result:").size(16.0).strong().color(Color32::BLUE));
                }
                Some((_, AnswerOutcome::Correct)) => {
                    ui.label(RichText::new("Correct!").size(16.0).strong().color(CORRECT_COLOR));
                }
                Some((_, AnswerOutcome::Wrong { correct_answer })) => {
                    ui.label(
                        RichText::new(format!("Incorrect! The answer was {}", correct_answer))
                            .size(16.0)
                            .strong()
                            .color(WRONG_COLOR),
                    );
                }
            }

            if answered.is_some() {
                ui.add_space(20.0);
                if ui.button(RichText::new("Next Question").size(14.0)).clicked() {
                    action = TriviaAction::NextQuestion;
                }
            }
        });

        action
    }

    pub fn show_times_up(&self, ui: &mut Ui, seconds_left: u64) {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.label(
                RichText::new(format!(
                    "Time's Up! Showing scoreboard in {}...",
                    seconds_left.max(1)
                ))
                .size(36.0)
                .strong()
                .color(WRONG_COLOR),
            );
        });
    }

    pub fn show_scoreboard(&mut self, ui: &mut Ui, summary: &RoundSummary) -> TriviaAction {
        let mut action = TriviaAction::None;

        ui.vertical_centered(|ui| {
            ui.heading(RichText::new("Score Board").size(28.0).strong());
            ui.add_space(20.0);
            ui.label(
                RichText::new(format!("Your Score: {} - {}", summary.player, summary.score))
                    .size(24.0)
                    .strong()
                    .color(Color32::from_rgb(0x19, 0x76, 0xD2)),
            );

            let message = if summary.made_top {
                "You made the Top 5!"
            } else {
                "You did not make the Top 5."
            };
            ui.label(RichText::new(message).size(20.0).italics().color(ACCENT_COLOR));

            if let Some(error) = &summary.error {
                ui.label(
                    RichText::new(format!("Could not save your score: {}", error))
                        .color(Color32::RED),
                );
            }

            ui.add_space(30.0);
            for entry in &summary.top {
                ui.label(RichText::new(format!("{} - {}", entry.name, entry.score)).size(18.0));
            }

            ui.add_space(30.0);
            if ui.button(RichText::new("PLAY AGAIN").size(18.0).strong()).clicked() {
                action = TriviaAction::PlayAgain;
            }
            if ui.button(RichText::new("EXIT").size(18.0).strong()).clicked() {
                action = TriviaAction::Exit;
            }
        });

        action
    }
}
