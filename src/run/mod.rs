//! Application execution modes for chordline.
//!
//! - Terminal mode drives the command loop from a live crossterm terminal.
//! - Headless mode feeds a key description through a scripted frontend and
//!   returns the resulting buffer text.

mod headless;
mod tui;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

pub use headless::run_headless_mode;
pub use tui::run_terminal_mode;

use crate::cli::Cli;

/// Editor execution mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Headless(String),
    Terminal,
}

/// Validate and canonicalize file paths, rejecting device files and pipes
/// that would hang a blocking read.
pub fn validate_file_path(path: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let canonical = match path.canonicalize() {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            // File doesn't exist yet - validate the parent directory
            match path.parent().filter(|p| !p.as_os_str().is_empty()) {
                Some(parent) => {
                    let canonical_parent = parent
                        .canonicalize()
                        .map_err(|_| format!("Invalid parent directory: {}", parent.display()))?;
                    let filename = path
                        .file_name()
                        .ok_or("Invalid file path: missing filename")?;
                    canonical_parent.join(filename)
                }
                None => std::env::current_dir()
                    .map_err(|_| "Cannot determine current directory")?
                    .join(path),
            }
        }
        Err(e) => return Err(format!("Invalid path: {}", e).into()),
    };

    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;
        if let Ok(metadata) = std::fs::metadata(&canonical) {
            let ft = metadata.file_type();
            if ft.is_char_device() || ft.is_block_device() {
                return Err("Cannot open device files".into());
            }
            if ft.is_fifo() {
                return Err("Cannot open FIFO/named pipe files".into());
            }
            if ft.is_socket() {
                return Err("Cannot open socket files".into());
            }
        }
    }

    Ok(canonical)
}

/// Validate every path, keeping order.
pub fn validate_files(files: &[PathBuf]) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    files.iter().map(|f| validate_file_path(f)).collect()
}

/// Detect the appropriate editor mode based on arguments and environment.
pub fn detect_mode(cli: &Cli) -> Result<EditorMode, Box<dyn std::error::Error>> {
    detect_mode_internal(cli.keys.as_deref(), std::io::stdin().is_terminal())
}

pub fn detect_mode_internal(
    keys: Option<&str>,
    is_stdin_tty: bool,
) -> Result<EditorMode, Box<dyn std::error::Error>> {
    match keys {
        Some(keys) => Ok(EditorMode::Headless(keys.to_string())),
        None if is_stdin_tty => Ok(EditorMode::Terminal),
        None => Err("stdin is not a terminal; use --keys to run headless".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_mode_headless_wins() {
        assert_eq!(
            detect_mode_internal(Some("a b"), false).unwrap(),
            EditorMode::Headless("a b".to_string())
        );
        assert_eq!(
            detect_mode_internal(Some("a"), true).unwrap(),
            EditorMode::Headless("a".to_string())
        );
    }

    #[test]
    fn test_detect_mode_terminal() {
        assert_eq!(detect_mode_internal(None, true).unwrap(), EditorMode::Terminal);
        assert!(detect_mode_internal(None, false).is_err());
    }

    #[test]
    fn test_validate_new_file_in_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.txt");
        let validated = validate_file_path(&path).unwrap();
        assert_eq!(validated.file_name().unwrap(), "new.txt");
    }

    #[test]
    fn test_validate_rejects_missing_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("x.txt");
        assert!(validate_file_path(&path).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_validate_rejects_device() {
        assert!(validate_file_path(Path::new("/dev/null")).is_err());
    }
}
