use eframe::egui;
use log::{debug, info, warn};
use rand::thread_rng;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::UserConfig;
use crate::game::{Game, NameError, Phase, QuestionBank};
use crate::ui::{TriviaAction, TriviaUI};

pub struct TriviaApp {
    config: UserConfig,
    ui: TriviaUI,
    game: Game,
    name_check: Result<String, NameError>,
    settings_error: Option<String>,
}

impl TriviaApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: UserConfig, game: Game) -> Self {
        Self {
            config,
            ui: TriviaUI::default(),
            game,
            name_check: Err(NameError::TooShort),
            settings_error: None,
        }
    }

    fn refresh_name_check(&mut self) {
        self.name_check = self.game.check_name(&self.ui.name_input);
    }

    fn switch_trivia_file(&mut self, path: PathBuf) {
        match QuestionBank::load(&path) {
            Ok(bank) => {
                info!("Switched to trivia file {} ({} questions)", path.display(), bank.len());
                self.game.set_bank(bank);
                self.config.use_trivia_file(path);
                if let Err(e) = self.config.save() {
                    warn!("Failed to save config: {}", e);
                }
                self.settings_error = None;
            }
            Err(e) => {
                warn!("Failed to load trivia file: {}", e);
                self.settings_error = Some(e.to_string());
            }
        }
    }

    fn handle_action(&mut self, action: TriviaAction, now: Instant, frame: &mut eframe::Frame) {
        match action {
            TriviaAction::None => {}
            TriviaAction::NameEdited => self.refresh_name_check(),
            TriviaAction::StartGame => {
                if let Err(e) = self.game.start(&self.ui.name_input, &mut thread_rng(), now) {
                    self.name_check = Err(e);
                }
            }
            TriviaAction::Answer(label) => {
                if let Some(outcome) = self.game.answer(label, now) {
                    debug!("Answered {}: {:?}", label, outcome);
                }
            }
            TriviaAction::NextQuestion => self.game.next_question(&mut thread_rng()),
            TriviaAction::PlayAgain => {
                self.game.play_again();
                self.ui.name_input.clear();
                self.refresh_name_check();
            }
            TriviaAction::Exit => frame.close(),
        }
    }
}

impl eframe::App for TriviaApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.game.tick(now);

        let mut action = TriviaAction::None;
        egui::CentralPanel::default().show(ctx, |ui| {
            match self.game.phase() {
                Phase::Instructions => {
                    action = self.ui.show_instructions(
                        ui,
                        &self.name_check,
                        self.config.round_seconds,
                    );

                    ui.add_space(20.0);
                    if ui.button("Settings").clicked() {
                        self.ui.show_settings = !self.ui.show_settings;
                    }
                }
                Phase::Playing(round) => {
                    let seconds_left = round.clock().remaining_secs(now);
                    action = self.ui.show_question(ui, round, seconds_left);
                }
                Phase::TimesUp { countdown, .. } => {
                    self.ui.show_times_up(ui, countdown.remaining_secs(now));
                }
                Phase::Scoreboard(summary) => {
                    action = self.ui.show_scoreboard(ui, summary);
                }
            }
        });

        if self.ui.show_settings && matches!(self.game.phase(), Phase::Instructions) {
            let mut show = true;
            let mut selected = None;
            egui::Window::new("Settings")
                .open(&mut show)
                .show(ctx, |ui| {
                    selected = self.ui.show_settings(
                        ui,
                        &self.config.trivia_path,
                        &self.config.recent_trivia_files,
                        self.settings_error.as_deref(),
                    );
                });
            self.ui.show_settings = show;

            if let Some(path) = selected {
                self.switch_trivia_file(path);
            }
        }

        self.handle_action(action, now, frame);

        // Keep the clocks moving without input.
        if matches!(self.game.phase(), Phase::Playing(_) | Phase::TimesUp { .. }) {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}
