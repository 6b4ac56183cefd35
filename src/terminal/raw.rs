use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

static TERMINAL_INITIALIZED: AtomicBool = AtomicBool::new(false);

type PanicHook = Box<dyn Fn(&std::panic::PanicHookInfo<'_>) + Sync + Send + 'static>;

/// RAII wrapper for raw mode and alternate screen.
/// Enables raw mode and enters alternate screen on creation.
/// Restores terminal state on drop.
pub struct RawMode {
    original_hook: Option<PanicHook>,
}

impl RawMode {
    /// Enter raw mode and alternate screen
    pub fn new() -> io::Result<Self> {
        crossterm::terminal::enable_raw_mode()?;

        let mut stdout = io::stdout();
        crossterm::execute!(
            stdout,
            crossterm::terminal::EnterAlternateScreen,
            crossterm::terminal::Clear(crossterm::terminal::ClearType::All)
        )?;

        TERMINAL_INITIALIZED.store(true, Ordering::SeqCst);

        // Restore the terminal before the panic message is printed
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(|info| {
            restore_terminal();
            eprintln!("{}", info);
        }));

        tracing::debug!("raw mode entered");
        Ok(Self {
            original_hook: Some(original_hook),
        })
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        restore_terminal();

        if let Some(hook) = self.original_hook.take() {
            std::panic::set_hook(hook);
        }
    }
}

fn restore_terminal() {
    if TERMINAL_INITIALIZED.swap(false, Ordering::SeqCst) {
        let mut stdout = io::stdout();

        // Clear before leaving so terminals without a real alternate screen
        // are not left with editor artifacts.
        let _ = crossterm::execute!(
            stdout,
            crossterm::terminal::Clear(crossterm::terminal::ClearType::All),
            crossterm::cursor::MoveTo(0, 0),
            crossterm::cursor::Show,
            crossterm::terminal::LeaveAlternateScreen
        );

        let _ = crossterm::terminal::disable_raw_mode();
    }
}
