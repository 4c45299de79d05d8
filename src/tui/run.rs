//! Dashboard entry point and terminal setup.

use std::{
    io::{self, Stdout},
    path::Path,
};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};

use crate::config::Config;
use crate::error::Result;
use crate::tui::app::App;

/// Initialise the terminal, run the dashboard for one project and restore
/// the terminal afterwards, even when setup or the app loop failed.
pub fn run_dashboard(db_path: &Path, project_id: u64, config: &Config) -> Result<()> {
    let mut app = App::new(db_path, project_id, config)?;

    enable_raw_mode()?;
    let mut terminal = restore_on_error(setup_terminal, || {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
    })?;

    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

/// Run `setup`; if it fails, call `restore` before handing back the error.
fn restore_on_error<T>(setup: impl FnOnce() -> Result<T>, restore: impl FnOnce()) -> Result<T> {
    match setup() {
        Ok(value) => Ok(value),
        Err(e) => {
            restore();
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::error::ShipError;

    #[test]
    fn test_failed_setup_restores_terminal() {
        let restored = Cell::new(0);
        let result: Result<()> = restore_on_error(
            || Err(ShipError::Io(io::Error::new(io::ErrorKind::Other, "no tty"))),
            || restored.set(restored.get() + 1),
        );
        assert!(matches!(result, Err(ShipError::Io(_))));
        assert_eq!(restored.get(), 1);
    }

    #[test]
    fn test_successful_setup_leaves_terminal_alone() {
        let restored = Cell::new(false);
        let value = restore_on_error(|| Ok(7), || restored.set(true)).unwrap();
        assert_eq!(value, 7);
        assert!(!restored.get());
    }
}
