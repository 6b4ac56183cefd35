pub mod display;
pub mod events;
pub mod frontend;
pub mod raw;

pub use frontend::TerminalFrontend;
pub use raw::RawMode;
