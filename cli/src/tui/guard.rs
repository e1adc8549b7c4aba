//! Top-level render guard.
//!
//! A panic inside the draw callback trips the guard once; from then on the
//! console only shows a static message until the user quits.
use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};

use ratatui::backend::Backend;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::{Frame, Terminal};

pub const FAULT_MESSAGE: &str = "Something went wrong. Please restart the console to try again.";

#[derive(Debug, Default)]
pub struct RenderGuard {
    tripped: bool,
}

impl RenderGuard {
    pub fn is_tripped(&self) -> bool {
        self.tripped
    }

    pub fn draw<B, F>(&mut self, terminal: &mut Terminal<B>, render: F) -> io::Result<()>
    where
        B: Backend,
        F: FnOnce(&mut Frame<'_>),
    {
        if self.tripped {
            return terminal.draw(draw_fault).map(|_| ());
        }

        match panic::catch_unwind(AssertUnwindSafe(|| terminal.draw(render).map(|_| ()))) {
            Ok(res) => res,
            Err(payload) => {
                self.tripped = true;
                tracing::error!(
                    target: "task_console.tui",
                    panic = %panic_message(payload.as_ref()),
                    "render failed, console disabled"
                );
                // The aborted frame left the back buffer half-written.
                terminal.clear()?;
                terminal.draw(draw_fault).map(|_| ())
            }
        }
    }
}

fn draw_fault(f: &mut Frame<'_>) {
    let area = f.area();
    let height = area.height.min(5);
    let rect = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: area.width,
        height,
    };
    f.render_widget(Clear, area);
    let body = Paragraph::new(FAULT_MESSAGE)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(body, rect);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Routes panic reports to the log while the alternate screen is active;
/// the default hook would print over the UI. Dropping the guard puts the
/// previous hook back.
pub struct PanicHookGuard {
    restore: Option<Box<dyn FnOnce() + Send>>,
}

impl PanicHookGuard {
    pub fn install() -> Self {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(|info| {
            tracing::error!(target: "task_console.tui", panic = %info, "panic");
        }));
        Self {
            restore: Some(Box::new(move || panic::set_hook(previous))),
        }
    }
}

impl Drop for PanicHookGuard {
    fn drop(&mut self) {
        // The hook cannot be swapped from a panicking thread.
        if std::thread::panicking() {
            return;
        }
        if let Some(restore) = self.restore.take() {
            restore();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_healthy_render_passes_through() {
        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        let mut guard = RenderGuard::default();
        guard
            .draw(&mut terminal, |f| {
                f.render_widget(Paragraph::new("table"), f.area())
            })
            .unwrap();
        assert!(!guard.is_tripped());
        assert!(screen_text(&terminal).contains("table"));
    }

    #[test]
    fn test_panic_trips_once_and_stays_tripped() {
        let mut terminal = Terminal::new(TestBackend::new(100, 10)).unwrap();
        let mut guard = RenderGuard::default();
        guard
            .draw(&mut terminal, |_| panic!("bad row"))
            .unwrap();
        assert!(guard.is_tripped());
        assert!(screen_text(&terminal).contains(FAULT_MESSAGE));

        // Later frames never reach the render callback again.
        let mut called = false;
        guard
            .draw(&mut terminal, |_| {
                called = true;
            })
            .unwrap();
        assert!(!called);
        assert!(screen_text(&terminal).contains(FAULT_MESSAGE));
    }
}
