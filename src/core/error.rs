//! Error taxonomy for the editor core.
//!
//! Everything a command can raise is an [`EditorError`]. The dispatch loop
//! contains all of them per iteration; only [`EditorError::Quit`] has control
//! flow meaning (it ends one recursive-edit level).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    /// Recoverable, user-facing failure raised by a command body.
    #[error("{0}")]
    Message(String),

    #[error("Already recording keyboard macro")]
    AlreadyRecording,

    #[error("Not recording keyboard macro")]
    NotRecording,

    #[error("Empty keyboard macro")]
    EmptyMacro,

    #[error("Keyboard macro not defined")]
    MacroNotDefined,

    /// Explicit abort of the current modal loop.
    #[error("Quit")]
    Quit,

    #[error("Recursive edit depth limit exceeded")]
    RecursionLimit,

    #[error("Undefined command: {0}")]
    UndefinedCommand(String),

    #[error("Invalid key description: {0}")]
    InvalidKey(String),

    #[error("Empty key sequence")]
    EmptyKeySequence,

    #[error("No file name for buffer {0}")]
    NoFileName(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Persist(#[from] tempfile::PersistError),
}

impl EditorError {
    /// Shorthand for [`EditorError::Message`].
    pub fn message(text: impl Into<String>) -> Self {
        EditorError::Message(text.into())
    }

    pub fn is_quit(&self) -> bool {
        matches!(self, EditorError::Quit)
    }
}

pub type Result<T, E = EditorError> = std::result::Result<T, E>;
