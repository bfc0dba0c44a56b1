//! Sound cues and the round-win celebration.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::layout::Rect;
use std::io::Write;
use std::time::{Duration, Instant};
use strum::Display;
use tracing::{debug, instrument};

/// Sparkle glyphs, brightest first.
const SPARKLE_GLYPHS: [char; 4] = ['✦', '✧', '*', '·'];

/// Sparkles drawn per frame.
const SPARKLE_COUNT: usize = 24;

/// Frame length of the sparkle animation.
const SPARKLE_FRAME: Duration = Duration::from_millis(100);

/// Something worth a sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Cue {
    /// A mark was placed.
    Move,
    /// A round was won.
    Win,
    /// A round was drawn.
    Draw,
}

impl Cue {
    /// Terminal bells rung for this cue.
    pub fn bells(self) -> usize {
        match self {
            Cue::Move | Cue::Draw => 1,
            Cue::Win => 2,
        }
    }
}

/// Rings the terminal bell for each cue.
#[instrument(skip(out, cues), fields(count = cues.len()))]
pub fn ring(out: &mut impl Write, cues: &[Cue]) -> std::io::Result<()> {
    if cues.is_empty() {
        return Ok(());
    }
    for cue in cues {
        debug!(%cue, "Bell");
        for _ in 0..cue.bells() {
            out.write_all(b"\x07")?;
        }
    }
    out.flush()
}

/// Sparkles shown over the board after a round win. Ends on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Celebration {
    started: Instant,
    duration: Duration,
    seed: u64,
}

impl Celebration {
    /// Starts a celebration at `started`.
    pub fn new(started: Instant, duration: Duration, seed: u64) -> Self {
        Self {
            started,
            duration,
            seed,
        }
    }

    /// True once the celebration has run its course.
    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }

    /// Sparkle cells inside `area` for the frame at `now`.
    pub fn sparkles(&self, area: Rect, now: Instant) -> Vec<(u16, u16, char)> {
        if area.width == 0 || area.height == 0 || self.is_finished(now) {
            return Vec::new();
        }
        let elapsed = now.saturating_duration_since(self.started);
        let frame = (elapsed.as_millis() / SPARKLE_FRAME.as_millis()) as u64;
        let mut rng = StdRng::seed_from_u64(self.seed ^ frame.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        (0..SPARKLE_COUNT)
            .map(|_| {
                let x = area.x + rng.random_range(0..area.width);
                let y = area.y + rng.random_range(0..area.height);
                let glyph = SPARKLE_GLYPHS[rng.random_range(0..SPARKLE_GLYPHS.len())];
                (x, y, glyph)
            })
            .collect()
    }
}
