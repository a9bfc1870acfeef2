use std::mem;
use std::path::Path;
use std::time::{Duration, Instant};

use log::{info, warn};
use rand::Rng;
use thiserror::Error;

use crate::error::GameError;
use crate::scoreboard::{name_taken, ScoreEntry, Scoreboard};
use crate::trivia::{load_trivia, Question};

pub const POINTS_CORRECT: i64 = 5;
pub const PENALTY_WRONG: i64 = 1;
pub const TIMES_UP_SECONDS: u64 = 3;
pub const MIN_NAME_LEN: usize = 5;
pub const MAX_NAME_LEN: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("Name must be at least 5 characters.")]
    TooShort,
    #[error("Name cannot exceed 15 characters.")]
    TooLong,
    #[error("Name cannot contain a comma.")]
    Comma,
    #[error("This name already exists. Choose another.")]
    Taken,
    #[error("Could not read the scoreboard: {0}")]
    Scoreboard(String),
}

/// Checks a player name against the length rules and the current
/// leaderboard. Returns the trimmed name.
pub fn validate_name(raw: &str, existing: &[ScoreEntry]) -> Result<String, NameError> {
    let name = raw.trim();
    let len = name.chars().count();

    if len < MIN_NAME_LEN {
        Err(NameError::TooShort)
    } else if len > MAX_NAME_LEN {
        Err(NameError::TooLong)
    } else if name.contains(',') {
        Err(NameError::Comma)
    } else if name_taken(existing, name) {
        Err(NameError::Taken)
    } else {
        Ok(name.to_string())
    }
}

/// The playable subset of a trivia file.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn load(path: &Path) -> Result<Self, GameError> {
        Self::new(path, load_trivia(path)?)
    }

    /// Drops records that cannot be answered correctly. Fails if nothing is
    /// left.
    pub fn new(path: &Path, questions: Vec<Question>) -> Result<Self, GameError> {
        let total = questions.len();
        let questions: Vec<Question> = questions
            .into_iter()
            .filter(|question| {
                let playable = question.is_playable();
                if !playable {
                    warn!("Skipping unplayable question: {:?}", question.prompt);
                }
                playable
            })
            .collect();

        if questions.is_empty() {
            return Err(GameError::NoPlayableQuestions {
                path: path.to_path_buf(),
            });
        }

        info!("{} of {} questions are playable", questions.len(), total);
        Ok(Self { questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Uniform random draw, repeats allowed.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Question {
        let index = rng.gen_range(0..self.questions.len());
        self.questions[index].clone()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    started: Instant,
    total: Duration,
}

impl Countdown {
    pub fn starting_at(started: Instant, total: Duration) -> Self {
        Self { started, total }
    }

    /// Whole seconds left, rounded up so the display reaches 0 only on expiry.
    pub fn remaining_secs(&self, now: Instant) -> u64 {
        let left = self
            .total
            .saturating_sub(now.saturating_duration_since(self.started));
        left.as_secs() + u64::from(left.subsec_nanos() > 0)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.total
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Wrong { correct_answer: String },
}

#[derive(Debug, Clone)]
pub struct Round {
    player: String,
    score: i64,
    clock: Countdown,
    question: Question,
    answered: Option<(char, AnswerOutcome)>,
}

impl Round {
    pub fn new(player: String, question: Question, clock: Countdown) -> Self {
        Self {
            player,
            score: 0,
            clock,
            question,
            answered: None,
        }
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn clock(&self) -> &Countdown {
        &self.clock
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    /// The label picked for the current question and how it was scored.
    pub fn answered(&self) -> Option<(char, &AnswerOutcome)> {
        self.answered.as_ref().map(|(label, outcome)| (*label, outcome))
    }

    /// Scores the choice behind `label`. Only the first answer to a question
    /// counts, and nothing counts once the clock has run out.
    pub fn answer(&mut self, label: char, now: Instant) -> Option<AnswerOutcome> {
        if self.answered.is_some() || self.clock.is_expired(now) {
            return None;
        }
        let choice = self.question.choice(label)?;

        let outcome = if choice.text == self.question.correct_answer {
            self.score += POINTS_CORRECT;
            AnswerOutcome::Correct
        } else {
            if self.score > 0 {
                self.score = (self.score - PENALTY_WRONG).max(0);
            }
            AnswerOutcome::Wrong {
                correct_answer: self.question.correct_answer.clone(),
            }
        };

        self.answered = Some((label, outcome.clone()));
        Some(outcome)
    }

    pub fn next_question(&mut self, question: Question) {
        self.question = question;
        self.answered = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSummary {
    pub player: String,
    pub score: i64,
    pub top: Vec<ScoreEntry>,
    pub made_top: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Phase {
    Instructions,
    Playing(Round),
    TimesUp {
        player: String,
        score: i64,
        countdown: Countdown,
    },
    Scoreboard(RoundSummary),
}

/// Game state independent of any rendering.
pub struct Game {
    bank: QuestionBank,
    scoreboard: Scoreboard,
    round_length: Duration,
    phase: Phase,
}

impl Game {
    pub fn new(bank: QuestionBank, scoreboard: Scoreboard, round_length: Duration) -> Self {
        Self {
            bank,
            scoreboard,
            round_length,
            phase: Phase::Instructions,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn set_bank(&mut self, bank: QuestionBank) {
        self.bank = bank;
    }

    pub fn check_name(&self, raw: &str) -> Result<String, NameError> {
        let existing = self
            .scoreboard
            .load()
            .map_err(|e| NameError::Scoreboard(e.to_string()))?;
        validate_name(raw, &existing)
    }

    /// Starts a round from the instructions screen.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        raw_name: &str,
        rng: &mut R,
        now: Instant,
    ) -> Result<(), NameError> {
        if !matches!(self.phase, Phase::Instructions) {
            return Ok(());
        }
        let player = self.check_name(raw_name)?;

        info!("Starting round for {}", player);
        let clock = Countdown::starting_at(now, self.round_length);
        self.phase = Phase::Playing(Round::new(player, self.bank.pick(rng), clock));
        Ok(())
    }

    pub fn answer(&mut self, label: char, now: Instant) -> Option<AnswerOutcome> {
        match &mut self.phase {
            Phase::Playing(round) => round.answer(label, now),
            _ => None,
        }
    }

    pub fn next_question<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if let Phase::Playing(round) = &mut self.phase {
            round.next_question(self.bank.pick(rng));
        }
    }

    /// Advances the clock-driven transitions: an expired round becomes the
    /// time's-up interstitial, and an expired interstitial records the score.
    pub fn tick(&mut self, now: Instant) {
        match &self.phase {
            Phase::Playing(round) if round.clock().is_expired(now) => {
                info!("Time's up for {} with {} points", round.player(), round.score());
                self.phase = Phase::TimesUp {
                    player: round.player().to_string(),
                    score: round.score(),
                    countdown: Countdown::starting_at(now, Duration::from_secs(TIMES_UP_SECONDS)),
                };
            }
            Phase::TimesUp { countdown, .. } if countdown.is_expired(now) => {
                let finished = mem::replace(&mut self.phase, Phase::Instructions);
                if let Phase::TimesUp { player, score, .. } = finished {
                    self.phase = Phase::Scoreboard(self.record(player, score));
                }
            }
            _ => {}
        }
    }

    fn record(&self, player: String, score: i64) -> RoundSummary {
        match self.scoreboard.update(&player, score) {
            Ok(top) => {
                let made_top = top
                    .iter()
                    .any(|entry| entry.name == player && entry.score == score);
                RoundSummary {
                    player,
                    score,
                    top,
                    made_top,
                    error: None,
                }
            }
            Err(e) => {
                warn!("Failed to update scoreboard {}: {}", self.scoreboard.path().display(), e);
                RoundSummary {
                    player,
                    score,
                    top: Vec::new(),
                    made_top: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    pub fn play_again(&mut self) {
        if matches!(self.phase, Phase::Scoreboard(_)) {
            self.phase = Phase::Instructions;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trivia::parse_trivia;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    const TRIVIA: &str = "\
#Q What year was Inception released?
A 2008
B 2010
C 2012
D 2014
^2010
#Q Unfinished question
A no answer given
";

    fn questions() -> Vec<Question> {
        parse_trivia(TRIVIA.as_bytes()).expect("parse failed")
    }

    fn setup_game() -> (TempDir, Game) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let bank = QuestionBank::new(Path::new("movies"), questions()).expect("bank failed");
        let scoreboard = Scoreboard::new(temp_dir.path().join("scoreboard.txt"));
        (temp_dir, Game::new(bank, scoreboard, Duration::from_secs(60)))
    }

    fn round(now: Instant) -> Round {
        Round::new(
            "tester".to_string(),
            questions().remove(0),
            Countdown::starting_at(now, Duration::from_secs(60)),
        )
    }

    #[test]
    fn name_rules() {
        let existing = vec![ScoreEntry::new("Maverick", 20)];

        assert_eq!(validate_name("abcd", &existing), Err(NameError::TooShort));
        assert_eq!(validate_name("   abcd   ", &existing), Err(NameError::TooShort));
        assert_eq!(validate_name("abcdefghijklmnop", &existing), Err(NameError::TooLong));
        assert_eq!(validate_name("ab,cde", &existing), Err(NameError::Comma));
        assert_eq!(validate_name("maverick", &existing), Err(NameError::Taken));
        assert_eq!(validate_name("  Goose  ", &existing), Ok("Goose".to_string()));
        assert_eq!(validate_name("abcdefghijklmno", &existing), Ok("abcdefghijklmno".to_string()));
    }

    #[test]
    fn name_error_messages() {
        assert_eq!(NameError::TooShort.to_string(), "Name must be at least 5 characters.");
        assert_eq!(NameError::TooLong.to_string(), "Name cannot exceed 15 characters.");
    }

    #[test]
    fn bank_keeps_only_playable_questions() {
        let bank = QuestionBank::new(Path::new("movies"), questions()).expect("bank failed");
        assert_eq!(bank.len(), 1);

        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(bank.pick(&mut rng).correct_answer, "2010");
    }

    #[test]
    fn empty_bank_is_an_error() {
        let only_broken = parse_trivia("#Q Broken\n".as_bytes()).expect("parse failed");
        assert!(matches!(
            QuestionBank::new(Path::new("movies"), only_broken),
            Err(GameError::NoPlayableQuestions { .. })
        ));
    }

    #[test]
    fn countdown_rounds_up() {
        let start = Instant::now();
        let clock = Countdown::starting_at(start, Duration::from_secs(60));

        assert_eq!(clock.remaining_secs(start), 60);
        assert_eq!(clock.remaining_secs(start + Duration::from_millis(500)), 60);
        assert_eq!(clock.remaining_secs(start + Duration::from_secs(1)), 59);
        assert_eq!(clock.remaining_secs(start + Duration::from_millis(59_001)), 1);
        assert_eq!(clock.remaining_secs(start + Duration::from_secs(90)), 0);
        assert!(!clock.is_expired(start + Duration::from_millis(59_999)));
        assert!(clock.is_expired(start + Duration::from_secs(60)));
    }

    #[test]
    fn correct_answer_scores_once() {
        let now = Instant::now();
        let mut round = round(now);

        assert_eq!(round.answer('B', now), Some(AnswerOutcome::Correct));
        assert_eq!(round.score(), POINTS_CORRECT);
        assert_eq!(round.answer('B', now), None);
        assert_eq!(round.score(), POINTS_CORRECT);
        assert_eq!(round.answered().map(|(label, _)| label), Some('B'));
    }

    #[test]
    fn wrong_answer_never_goes_below_zero() {
        let now = Instant::now();
        let mut round = round(now);

        assert_eq!(
            round.answer('A', now),
            Some(AnswerOutcome::Wrong {
                correct_answer: "2010".to_string()
            })
        );
        assert_eq!(round.score(), 0);

        round.next_question(questions().remove(0));
        round.answer('B', now);
        round.next_question(questions().remove(0));
        round.answer('D', now);
        assert_eq!(round.score(), POINTS_CORRECT - PENALTY_WRONG);
    }

    #[test]
    fn unknown_label_and_expired_clock_are_ignored() {
        let now = Instant::now();
        let mut round = round(now);

        assert_eq!(round.answer('Z', now), None);
        assert!(round.answered().is_none());
        assert_eq!(round.answer('B', now + Duration::from_secs(61)), None);
        assert_eq!(round.score(), 0);
    }

    #[test]
    fn start_requires_a_valid_name() {
        let (_dir, mut game) = setup_game();
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(game.start("Bob", &mut rng, Instant::now()), Err(NameError::TooShort));
        assert!(matches!(game.phase(), Phase::Instructions));

        game.start("Roberta", &mut rng, Instant::now()).expect("start failed");
        assert!(matches!(game.phase(), Phase::Playing(_)));
    }

    #[test]
    fn full_round_records_the_score() {
        let (_dir, mut game) = setup_game();
        let mut rng = StdRng::seed_from_u64(3);
        let start = Instant::now();

        game.start("Ellen Ripley", &mut rng, start).expect("start failed");
        assert_eq!(game.answer('B', start), Some(AnswerOutcome::Correct));
        game.next_question(&mut rng);
        assert_eq!(game.answer('B', start), Some(AnswerOutcome::Correct));

        game.tick(start + Duration::from_secs(30));
        assert!(matches!(game.phase(), Phase::Playing(_)));

        let expired = start + Duration::from_secs(60);
        game.tick(expired);
        match game.phase() {
            Phase::TimesUp { score, .. } => assert_eq!(*score, 2 * POINTS_CORRECT),
            other => panic!("expected TimesUp, got {:?}", other),
        }
        assert_eq!(game.answer('B', expired), None);

        game.tick(expired + Duration::from_secs(TIMES_UP_SECONDS));
        match game.phase() {
            Phase::Scoreboard(summary) => {
                assert!(summary.made_top);
                assert_eq!(summary.top, vec![ScoreEntry::new("Ellen Ripley", 10)]);
                assert_eq!(summary.error, None);
            }
            other => panic!("expected Scoreboard, got {:?}", other),
        }

        game.play_again();
        assert!(matches!(game.phase(), Phase::Instructions));
        assert_eq!(game.check_name("ellen ripley"), Err(NameError::Taken));
    }

    #[test]
    fn low_score_misses_a_full_board() {
        let (dir, mut game) = setup_game();
        let full: Vec<_> = (1..=5)
            .map(|i| ScoreEntry::new(format!("player{}", i), i * 10))
            .collect();
        Scoreboard::new(dir.path().join("scoreboard.txt"))
            .save(&full)
            .expect("save failed");

        let mut rng = StdRng::seed_from_u64(5);
        let start = Instant::now();
        game.start("Newcomer", &mut rng, start).expect("start failed");
        game.tick(start + Duration::from_secs(60));
        game.tick(start + Duration::from_secs(60 + TIMES_UP_SECONDS));

        match game.phase() {
            Phase::Scoreboard(summary) => {
                assert!(!summary.made_top);
                assert_eq!(summary.top, full.into_iter().rev().collect::<Vec<_>>());
            }
            other => panic!("expected Scoreboard, got {:?}", other),
        }
    }
}
