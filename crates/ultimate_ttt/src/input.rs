//! Cursor movement for keyboard navigation.

use crossterm::event::KeyCode;
use ultimate_ttt_core::Position;

/// Moves cursor based on arrow keys. Stops at the board edges.
pub fn move_cursor(cursor: Position, key: KeyCode) -> Position {
    let (row, col) = (cursor.row(), cursor.col());
    let (row, col) = match key {
        KeyCode::Up => (row.saturating_sub(1), col),
        KeyCode::Down => ((row + 1).min(2), col),
        KeyCode::Left => (row, col.saturating_sub(1)),
        KeyCode::Right => (row, (col + 1).min(2)),
        _ => return cursor,
    };
    Position::from_row_col(row, col).unwrap_or(cursor)
}

/// Maps digit keys 1-9 to squares in reading order.
pub fn digit_position(key: KeyCode) -> Option<Position> {
    match key {
        KeyCode::Char(c @ '1'..='9') => {
            Position::from_index(c.to_digit(10)? as usize - 1)
        }
        _ => None,
    }
}
