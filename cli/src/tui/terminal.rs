use std::io;

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use task_console_core::api::TuiConfig;

pub fn check_tui_support(cfg: &TuiConfig) -> Result<(), String> {
    if !atty::is(atty::Stream::Stdout) {
        return Err("stdout is not a terminal".to_string());
    }
    if !atty::is(atty::Stream::Stdin) {
        return Err("stdin is not a terminal".to_string());
    }
    if !cfg!(windows) && std::env::var("TERM").is_err() {
        return Err("TERM environment variable not set".to_string());
    }
    let (width, height) = terminal::size().map_err(|e| format!("terminal size failed: {e}"))?;
    fits(width, height, cfg)
}

fn fits(width: u16, height: u16, cfg: &TuiConfig) -> Result<(), String> {
    if width < cfg.min_width || height < cfg.min_height {
        return Err(format!(
            "terminal too small ({}x{}), need at least {}x{}",
            width, height, cfg.min_width, cfg.min_height
        ));
    }
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>, String> {
    enable_raw_mode().map_err(|e| e.to_string())?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).map_err(|e| e.to_string())?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.to_string())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), terminal::LeaveAlternateScreen);
    let _ = terminal.show_cursor();
}

/// Owns the terminal for the lifetime of the console and hands it back to
/// the shell when dropped, including while a panic unwinds.
pub struct TerminalSession<B: Backend> {
    terminal: Terminal<B>,
    restore: fn(&mut Terminal<B>),
}

impl TerminalSession<CrosstermBackend<io::Stdout>> {
    pub fn enter() -> Result<Self, String> {
        Ok(Self::new(setup_terminal()?, restore_terminal))
    }
}

impl<B: Backend> TerminalSession<B> {
    pub fn new(terminal: Terminal<B>, restore: fn(&mut Terminal<B>)) -> Self {
        Self { terminal, restore }
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }
}

impl<B: Backend> Drop for TerminalSession<B> {
    fn drop(&mut self) {
        (self.restore)(&mut self.terminal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use std::panic;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_minimum_size_comes_from_config() {
        let mut cfg = TuiConfig::default();
        assert!(fits(80, 24, &cfg).is_ok());
        assert_eq!(
            fits(79, 24, &cfg).unwrap_err(),
            "terminal too small (79x24), need at least 80x24"
        );
        cfg.min_height = 30;
        assert!(fits(120, 24, &cfg).is_err());
    }

    #[test]
    fn test_session_restores_when_panic_unwinds() {
        static RESTORED: AtomicUsize = AtomicUsize::new(0);
        fn count_restore(_: &mut Terminal<TestBackend>) {
            RESTORED.fetch_add(1, Ordering::SeqCst);
        }

        let res = panic::catch_unwind(|| {
            let mut session =
                TerminalSession::new(Terminal::new(TestBackend::new(20, 5)).unwrap(), count_restore);
            session.terminal_mut().clear().unwrap();
            panic!("key handler failed");
        });
        assert!(res.is_err());
        assert_eq!(RESTORED.load(Ordering::SeqCst), 1);

        drop(TerminalSession::new(
            Terminal::new(TestBackend::new(20, 5)).unwrap(),
            count_restore,
        ));
        assert_eq!(RESTORED.load(Ordering::SeqCst), 2);
    }
}
