//! Command-line argument parsing for chordline.

use clap::Parser;
use std::path::PathBuf;

/// Command-line interface configuration.
#[derive(Parser, Debug, Default)]
#[command(name = "chordline")]
#[command(about = "A keymap-driven terminal text editor")]
#[command(version)]
pub struct Cli {
    /// File(s) to open; the first becomes the current buffer
    pub files: Vec<PathBuf>,

    /// Run headless: feed these keys (Emacs notation, e.g. "C-u 3 a RET")
    /// through the command loop, then print the buffer to stdout
    #[arg(long, value_name = "DESC")]
    pub keys: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write logs to this file (filter with CHORDLINE_LOG)
    #[arg(long, value_name = "PATH")]
    pub log: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_command_line() {
        let cli = Cli::try_parse_from([
            "chordline",
            "--keys",
            "C-x ( a C-x )",
            "--config",
            "/tmp/c.toml",
            "--log",
            "/tmp/chordline.log",
            "notes.txt",
        ])
        .unwrap();
        assert_eq!(cli.files, vec![PathBuf::from("notes.txt")]);
        assert_eq!(cli.keys.as_deref(), Some("C-x ( a C-x )"));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert_eq!(cli.log, Some(PathBuf::from("/tmp/chordline.log")));
    }

    #[test]
    fn test_no_arguments() {
        let cli = Cli::try_parse_from(["chordline"]).unwrap();
        assert!(cli.files.is_empty());
        assert!(cli.keys.is_none());
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["chordline", "--sed"]).is_err());
    }
}
