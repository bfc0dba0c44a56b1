//! Stateless rendering for the game screen.

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use ultimate_ttt_core::{
    Configuration, GameSession, Outcome, Player, Position, Preferences, Square,
};

use crate::effects::Celebration;

/// Colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Screen background.
    pub background: Color,
    /// Regular text.
    pub text: Color,
    /// Hints and empty squares.
    pub muted: Color,
    /// Title text.
    pub title: Color,
    /// X marks.
    pub x: Color,
    /// O marks.
    pub o: Color,
    /// Cursor square background.
    pub cursor: Color,
    /// Winning line background.
    pub win: Color,
    /// Banner border and sparkles.
    pub accent: Color,
}

impl Palette {
    /// Dark theme.
    pub const DARK: Palette = Palette {
        background: Color::Black,
        text: Color::White,
        muted: Color::DarkGray,
        title: Color::Cyan,
        x: Color::LightBlue,
        o: Color::LightRed,
        cursor: Color::Gray,
        win: Color::Green,
        accent: Color::Yellow,
    };

    /// Light theme.
    pub const LIGHT: Palette = Palette {
        background: Color::White,
        text: Color::Black,
        muted: Color::Gray,
        title: Color::Blue,
        x: Color::Blue,
        o: Color::Red,
        cursor: Color::LightYellow,
        win: Color::LightGreen,
        accent: Color::Magenta,
    };

    /// Palette for the saved theme preference.
    pub fn for_prefs(prefs: Preferences) -> Self {
        if prefs.theme_light {
            Self::LIGHT
        } else {
            Self::DARK
        }
    }

    /// Color for `player`'s marks.
    pub fn mark(&self, player: Player) -> Color {
        match player {
            Player::X => self.x,
            Player::O => self.o,
        }
    }
}

/// Overlay shown once a round is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    /// Headline.
    pub title: &'static str,
    /// Detail line.
    pub message: String,
    /// What `n` does next.
    pub action: &'static str,
}

impl Banner {
    /// Banner for the session's finished round, if it is finished.
    pub fn for_session(session: &GameSession) -> Option<Self> {
        let outcome = session.round().status().outcome()?;
        let config = session.config();
        let banner = match outcome {
            Outcome::Winner(player) if session.is_match_over() => {
                let tally = session.score().tally();
                Self {
                    title: "MATCH WINNER!",
                    message: format!(
                        "{} takes the match {}-{}",
                        config.name_of(player),
                        tally.wins(player),
                        tally.wins(player.opponent())
                    ),
                    action: "n: New Match",
                }
            }
            Outcome::Winner(player) => Self {
                title: "ROUND WIN!",
                message: format!("{} wins the round", config.name_of(player)),
                action: "n: Next Round",
            },
            Outcome::Draw => Self {
                title: "DRAW",
                message: "No winner this round".to_string(),
                action: "n: Next Round",
            },
        };
        Some(banner)
    }
}

/// Everything the game screen shows.
#[derive(Debug, Clone, Copy)]
pub struct GameView<'a> {
    /// Game being shown.
    pub session: &'a GameSession,
    /// Highlighted square.
    pub cursor: Position,
    /// Sound and theme.
    pub prefs: Preferences,
    /// Running celebration, if any.
    pub celebration: Option<&'a Celebration>,
    /// One-off message such as a rejected move.
    pub notice: Option<&'a str>,
    /// Frame time.
    pub now: Instant,
}

/// "Best of N • MODE • difficulty".
pub fn subtitle(config: &Configuration) -> String {
    format!(
        "Best of {} • {} • {}",
        config.best_of, config.mode, config.difficulty
    )
}

/// Whose turn it is, or that the round is over.
pub fn status_line(session: &GameSession) -> String {
    if session.round().is_over() {
        return "Round over".to_string();
    }
    if session.is_computer_turn() {
        return format!("{} is thinking...", session.config().name_of(session.to_move()));
    }
    let player = session.to_move();
    format!("Turn: {} ({})", player, session.config().name_of(player))
}

/// Match counters against the target, then the scoreboard.
pub fn score_lines(session: &GameSession) -> [String; 2] {
    let score = session.score();
    let tally = score.tally();
    let totals = score.totals();
    let config = session.config();
    [
        format!(
            "Match: X {}  O {}  Draws {}  (first to {})",
            tally.x_wins,
            tally.o_wins,
            tally.draws,
            score.target_wins()
        ),
        format!(
            "{} {}  •  {} {}  •  Draws {}",
            config.name_of(Player::X),
            totals.x_wins,
            config.name_of(Player::O),
            totals.o_wins,
            totals.draws
        ),
    ]
}

/// Renders the game screen.
pub fn draw_game(frame: &mut Frame, view: &GameView<'_>) {
    let palette = Palette::for_prefs(view.prefs);
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Subtitle
            Constraint::Min(11),   // Board
            Constraint::Length(3), // Status
            Constraint::Length(4), // Scores
            Constraint::Length(1), // Help
        ])
        .split(area);

    let title = Paragraph::new("Ultimate Tic-Tac-Toe")
        .style(
            Style::default()
                .fg(palette.title)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let details = Paragraph::new(subtitle(view.session.config()))
        .style(Style::default().fg(palette.muted))
        .alignment(Alignment::Center);
    frame.render_widget(details, chunks[1]);

    draw_board(frame, chunks[2], view, &palette);

    let mut status = vec![Span::styled(
        status_line(view.session),
        Style::default().fg(palette.mark(view.session.to_move())),
    )];
    if let Some(notice) = view.notice {
        status.push(Span::styled(
            format!("  ({})", notice),
            Style::default().fg(palette.muted),
        ));
    }
    let status = Paragraph::new(Line::from(status))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[3]);

    let scores = Paragraph::new(
        score_lines(view.session)
            .into_iter()
            .map(Line::from)
            .collect::<Vec<_>>(),
    )
    .style(Style::default().fg(palette.text))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Score"));
    frame.render_widget(scores, chunks[4]);

    let sound = if view.prefs.sound_on { "on" } else { "off" };
    let help = Paragraph::new(format!(
        "arrows/1-9 move • Enter place • u undo • r reset • c clear • n next • m/d/b settings • s sound ({}) • t theme • o start • q quit",
        sound
    ))
    .style(Style::default().fg(palette.muted))
    .alignment(Alignment::Center);
    frame.render_widget(help, chunks[5]);

    if let Some(celebration) = view.celebration {
        for (x, y, glyph) in celebration.sparkles(chunks[2], view.now) {
            if let Some(cell) = frame.buffer_mut().cell_mut((x, y)) {
                cell.set_char(glyph).set_fg(palette.accent);
            }
        }
    }

    if let Some(banner) = Banner::for_session(view.session) {
        draw_banner(frame, chunks[2], &banner, &palette);
    }
}

fn draw_board(frame: &mut Frame, area: Rect, view: &GameView<'_>, palette: &Palette) {
    let board_area = center_rect(area, 23, 11);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(board_area);

    for (row, chunk) in [rows[0], rows[2], rows[4]].into_iter().enumerate() {
        draw_row(frame, chunk, view, palette, row);
    }
    draw_separator(frame, rows[1], palette);
    draw_separator(frame, rows[3], palette);
}

fn draw_row(frame: &mut Frame, area: Rect, view: &GameView<'_>, palette: &Palette, row: usize) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(7),
            Constraint::Length(1),
            Constraint::Length(7),
            Constraint::Length(1),
            Constraint::Length(7),
        ])
        .split(area);

    for (col, chunk) in [cols[0], cols[2], cols[4]].into_iter().enumerate() {
        if let Some(pos) = Position::from_row_col(row, col) {
            draw_cell(frame, chunk, view, palette, pos);
        }
    }
    draw_separator_vertical(frame, cols[1], palette);
    draw_separator_vertical(frame, cols[3], palette);
}

fn draw_cell(frame: &mut Frame, area: Rect, view: &GameView<'_>, palette: &Palette, pos: Position) {
    let round = view.session.round();
    let square = round.board().get(pos);

    // Empty squares show their digit key.
    let (label, mut style) = match square {
        Square::Empty => (
            (pos.to_index() + 1).to_string(),
            Style::default().fg(palette.muted),
        ),
        Square::Occupied(player) => (
            player.to_string(),
            Style::default()
                .fg(palette.mark(player))
                .add_modifier(Modifier::BOLD),
        ),
    };

    let on_line = round
        .winning_line()
        .is_some_and(|line| line.contains(&pos));
    let background = if on_line {
        style = style.fg(palette.background);
        Some(palette.win)
    } else if pos == view.cursor && !round.is_over() {
        Some(palette.cursor)
    } else {
        None
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(label, style)),
        Line::from(""),
    ];
    let mut paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    if let Some(bg) = background {
        paragraph = paragraph.style(Style::default().bg(bg));
    }
    frame.render_widget(paragraph, area);
}

fn draw_separator(frame: &mut Frame, area: Rect, palette: &Palette) {
    let sep = Paragraph::new("───────┼───────┼───────").style(Style::default().fg(palette.muted));
    frame.render_widget(sep, area);
}

fn draw_separator_vertical(frame: &mut Frame, area: Rect, palette: &Palette) {
    let sep = Paragraph::new(vec![Line::from("│"), Line::from("│"), Line::from("│")])
        .style(Style::default().fg(palette.muted));
    frame.render_widget(sep, area);
}

fn draw_banner(frame: &mut Frame, area: Rect, banner: &Banner, palette: &Palette) {
    let popup = center_rect(area, 36, 5);
    frame.render_widget(Clear, popup);
    let text = vec![
        Line::from(Span::styled(
            banner.title,
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            banner.message.as_str(),
            Style::default().fg(palette.text),
        )),
        Line::from(Span::styled(banner.action, Style::default().fg(palette.muted))),
    ];
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().bg(palette.background))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent)),
        );
    frame.render_widget(paragraph, popup);
}

/// Centers a `width` x `height` rectangle inside `area`.
pub fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vert[1])[1]
}
