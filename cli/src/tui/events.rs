use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;

pub enum InputEvent {
    Key(KeyEvent),
    Resize,
}

/// Blocking crossterm reader on its own thread, forwarding into the event loop.
pub struct InputReader {
    running: Arc<AtomicBool>,
    handle: Option<std::thread::JoinHandle<()>>,
}

impl InputReader {
    pub fn start() -> (Self, mpsc::UnboundedReceiver<InputEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let running = Arc::new(AtomicBool::new(true));
        let thread_running = Arc::clone(&running);
        let handle = std::thread::spawn(move || {
            while thread_running.load(Ordering::SeqCst) {
                if !event::poll(Duration::from_millis(100)).unwrap_or(false) {
                    continue;
                }
                let forwarded = match event::read() {
                    // Release/Repeat would double every keystroke on Windows.
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        tracing::trace!("Key pressed: {:?}", key);
                        Some(InputEvent::Key(key))
                    }
                    Ok(Event::Resize(w, h)) => {
                        tracing::trace!(width = w, height = h, "terminal resized");
                        Some(InputEvent::Resize)
                    }
                    Ok(_) => None,
                    Err(e) => {
                        tracing::warn!(error = %e, "input read failed");
                        None
                    }
                };
                if let Some(ev) = forwarded {
                    if tx.send(ev).is_err() {
                        break;
                    }
                }
            }
        });
        (
            Self {
                running,
                handle: Some(handle),
            },
            rx,
        )
    }

    pub fn stop(mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
