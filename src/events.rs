//! Event types and the main event loop driver for the salon finder.
//!
//! [`EventHandler`] runs a background task that polls crossterm for key
//! presses and emits periodic [`Event::Tick`]s. Other tasks (the location
//! lookup) post into the same channel through [`EventHandler::tx`].

use crate::models::ResolvedLocation;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::io;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::error;

/// Events processed by the application event loop.
pub enum Event {
    /// Periodic tick used for UI refresh.
    Tick,
    /// User key press from the terminal.
    Input(KeyEvent),
    /// The terminal can no longer be read; no further input will arrive.
    InputClosed,
    /// The IP lookup finished. `None` means no provider could place the user.
    LocationResolved(Option<ResolvedLocation>),
}

/// Multiplexes terminal input and ticks into a single event stream.
pub struct EventHandler {
    /// Sender for posting events from other tasks.
    pub tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Creates the handler and spawns the input/tick task.
    ///
    /// The task polls crossterm with a timeout of `tick_rate_ms`. If the
    /// terminal can no longer be read it posts [`Event::InputClosed`] and stops.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        tokio::spawn(async move {
            pump_events(&event_tx, Duration::from_millis(tick_rate_ms), |timeout| {
                if event::poll(timeout)? {
                    event::read().map(Some)
                } else {
                    Ok(None)
                }
            });
        });

        Self { tx, rx }
    }

    /// Receives the next event. `None` once every sender is gone.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Forwards key presses from `source` and emits ticks until the receiver is
/// dropped or `source` fails.
fn pump_events<S>(tx: &mpsc::UnboundedSender<Event>, tick_rate: Duration, mut source: S)
where
    S: FnMut(Duration) -> io::Result<Option<CrosstermEvent>>,
{
    let mut last_tick = Instant::now();
    loop {
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::from_secs(0));
        match source(timeout) {
            Ok(Some(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                if tx.send(Event::Input(key)).is_err() {
                    return;
                }
            }
            Ok(_) => {}
            Err(e) => {
                error!("Terminal input failed: {}", e);
                let _ = tx.send(Event::InputClosed);
                return;
            }
        }
        if last_tick.elapsed() >= tick_rate {
            if tx.send(Event::Tick).is_err() {
                return;
            }
            last_tick = Instant::now();
        }
    }
}
