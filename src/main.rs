//! chordline - a keymap-driven terminal text editor
//!
//! This is the main entry point. It parses CLI arguments, loads the
//! configuration and delegates to the terminal or headless runner.

use clap::Parser;

use chordline::cli::Cli;
use chordline::config::Config;
use chordline::{logging, run};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log {
        logging::init(path)?;
    }

    let config = Config::load(cli.config.as_deref())?;
    let files = run::validate_files(&cli.files)?;

    let result = match run::detect_mode(&cli)? {
        run::EditorMode::Headless(keys) => {
            run::run_headless_mode(&files, &config, &keys).map(|text| print!("{}", text))
        }
        run::EditorMode::Terminal => run::run_terminal_mode(&files, &config),
    };

    if let Err(err) = &result {
        tracing::error!(error = %err, "editor exited with an error");
    }
    result
}
