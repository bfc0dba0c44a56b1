//! Terminal setup and the event loop.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, error, info, instrument, warn};

use crate::app_config::AppConfig;
use crate::controller::{Controller, Flow};
use crate::effects::ring;
use crate::events::{AppEvent, spawn_input_reader, spawn_ticker};
use crate::store::Store;

/// Animation tick period.
const TICK: Duration = Duration::from_millis(100);

/// Raw mode and the alternate screen. Restores the terminal on drop.
struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    /// Switches the terminal into raw mode on the alternate screen.
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let guard = Self { active: true };
        execute!(io::stdout(), EnterAlternateScreen)
            .context("Failed to enter alternate screen")?;
        Ok(guard)
    }

    /// Leaves raw mode and the alternate screen once. Later calls do nothing.
    fn restore(&mut self, out: &mut impl Write) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        debug!("Restoring terminal");
        let raw = disable_raw_mode();
        let screen = execute!(out, LeaveAlternateScreen, Show);
        raw.and(screen)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.active {
            warn!("Terminal still in raw mode, restoring");
            let _ = self.restore(&mut io::stdout());
        }
    }
}

/// Runs the app until the player quits.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or drawn to.
#[instrument(skip(config), fields(state_file = %config.state_file().display()))]
pub async fn run(config: AppConfig, fresh: bool) -> Result<()> {
    info!("Starting Ultimate Tic-Tac-Toe");

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut controller = Controller::new(
        &config,
        Store::new(config.state_file()),
        fresh,
        event_tx.clone(),
    );

    let mut guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let input = spawn_input_reader(event_tx.clone());
    let ticker = spawn_ticker(event_tx, TICK);

    let res = event_loop(&mut terminal, &mut controller, &mut event_rx).await;

    ticker.abort();
    // Closing the channel stops the input reader on its next poll.
    drop(event_rx);
    drop(controller);

    guard
        .restore(terminal.backend_mut())
        .context("Failed to restore terminal")?;
    let _ = input.await;

    if let Err(ref err) = res {
        error!(error = ?err, "Event loop error");
    }
    info!("Goodbye");
    res
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    controller: &mut Controller,
    events: &mut UnboundedReceiver<AppEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| controller.render(frame))?;
        ring(terminal.backend_mut(), &controller.take_cues())?;

        let Some(event) = events.recv().await else {
            return Ok(());
        };
        if controller.handle(event) == Flow::Quit {
            return Ok(());
        }
    }
}
