//! Terminal input abstraction.
//!
//! A background task polls crossterm and forwards the events the page cares
//! about over a channel, so the main loop can `select!` on input and the
//! frame clock without blocking.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind, MouseEventKind};
use tokio::sync::mpsc;

/// How long one crossterm poll may block before the reader checks whether
/// the receiver is still alive.
const POLL: Duration = Duration::from_millis(50);

/// High-level input consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    /// Mouse-wheel notches; positive scrolls down.
    Scroll(i32),
    Resize(u16, u16),
}

impl AppEvent {
    fn from_crossterm(ev: CtEvent) -> Option<Self> {
        match ev {
            CtEvent::Key(k) if k.kind != KeyEventKind::Release => Some(AppEvent::Key(k)),
            CtEvent::Mouse(m) => match m.kind {
                MouseEventKind::ScrollDown => Some(AppEvent::Scroll(1)),
                MouseEventKind::ScrollUp => Some(AppEvent::Scroll(-1)),
                _ => None,
            },
            CtEvent::Resize(w, h) => Some(AppEvent::Resize(w, h)),
            _ => None,
        }
    }
}

/// Spawn the reader task and return its receiving end.
pub fn spawn_input_reader() -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::task::spawn_blocking(move || loop {
        if tx.is_closed() {
            break;
        }
        match event::poll(POLL) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(err) => {
                tracing::warn!(%err, "terminal poll failed; input reader stopping");
                break;
            }
        }
        let Ok(ev) = event::read() else {
            continue;
        };
        if let Some(app_event) = AppEvent::from_crossterm(ev) {
            if tx.send(app_event).is_err() {
                break; // receiver dropped
            }
        }
    });

    rx
}
