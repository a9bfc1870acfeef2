mod app;
mod config;
mod error;
mod game;
mod scoreboard;
mod trivia;
mod ui;

use std::fs::{self, File};
use std::path::PathBuf;
use std::time::Duration;

use app::TriviaApp;
use config::UserConfig;
use eframe::egui;
use error::GameError;
use game::{Game, QuestionBank};
use log::{error, info, LevelFilter};
use scoreboard::Scoreboard;
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};

const LOG_FILE: &str = "movie-trivia.log";

fn log_file_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("movie-trivia"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(LOG_FILE)
}

fn init_logging() {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ));

    let path = log_file_path();
    let file = match path.parent() {
        Some(dir) => fs::create_dir_all(dir).and_then(|_| File::create(&path)),
        None => File::create(&path),
    };
    let file_error = match file {
        Ok(file) => {
            loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), file));
            None
        }
        Err(e) => Some(e),
    };

    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("Failed to initialise logging: {}", e);
    }
    match file_error {
        Some(e) => error!("Logging to terminal only, cannot open {}: {}", path.display(), e),
        None => info!("Logging to {}", path.display()),
    }
}

fn main() -> Result<(), GameError> {
    init_logging();

    let config = UserConfig::load();
    let bank = QuestionBank::load(&config.trivia_path).map_err(|e| {
        error!("Cannot start: {}", e);
        e
    })?;
    let scoreboard = Scoreboard::new(config.scoreboard_path.clone());
    let game = Game::new(bank, scoreboard, Duration::from_secs(config.round_seconds));

    let options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(900.0, 750.0)),
        ..Default::default()
    };

    eframe::run_native(
        "Ultimate Movie Trivia",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Box::new(TriviaApp::new(cc, config, game))
        }),
    )
    .map_err(|e| GameError::Ui(e.to_string()))
}
