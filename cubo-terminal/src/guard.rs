/// Scoped ownership of the terminal modes the viewer switches on
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, terminal,
};
use std::io::{self, stdout};
use tracing::warn;

/// Raw mode, alternate screen, hidden cursor and mouse capture, held together.
///
/// Dropping the guard restores the terminal on every exit path, including
/// early `?` returns and panics unwinding through the render loop.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn acquire() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        // From here on, Drop undoes whatever part of the setup succeeded
        let guard = Self { _private: () };
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture
        )?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = execute!(
            stdout(),
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        ) {
            warn!(%err, "failed to restore terminal screen");
        }
        if let Err(err) = terminal::disable_raw_mode() {
            warn!(%err, "failed to leave raw mode");
        }
    }
}
