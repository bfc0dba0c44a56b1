//! Events feeding the controller loop.

use crossterm::event::{Event, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

/// Everything the controller reacts to, serialized through one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A key was pressed.
    Key(KeyEvent),
    /// Animation heartbeat.
    Tick,
    /// A scheduled computer move is due.
    ComputerTurn {
        /// Scheduler generation the move was scheduled under.
        generation: u64,
    },
}

/// Reads terminal key presses on a blocking thread until the receiver
/// goes away.
#[instrument(skip(tx))]
pub fn spawn_input_reader(tx: UnboundedSender<AppEvent>) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        debug!("Input reader started");
        while !tx.is_closed() {
            match crossterm::event::poll(Duration::from_millis(100)) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => {
                    warn!(error = %e, "Input poll failed");
                    break;
                }
            }
            match crossterm::event::read() {
                // Skip key release events (crossterm fires both press and release).
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                    if tx.send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "Input read failed");
                    break;
                }
            }
        }
        debug!("Input reader stopped");
    })
}

/// Sends [`AppEvent::Tick`] every `period` until the receiver goes away.
#[instrument(skip(tx))]
pub fn spawn_ticker(tx: UnboundedSender<AppEvent>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            if tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    })
}
