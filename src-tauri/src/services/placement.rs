//! Spawn placement for new notes
//!
//! A new note opens at the cursor, pulled back onto the primary display
//! when it would overflow an edge.

use crate::config;
use crate::store::{Position, Size};

/// Top-left corner for a window of `size` opened at `cursor`
pub fn spawn_position(cursor: Position, display: Size, size: Size) -> Position {
    let mut x = cursor.x;
    let mut y = cursor.y;

    if x + size.width > display.width {
        x = display.width - size.width - config::SPAWN_MARGIN;
    }
    if y + size.height > display.height {
        y = display.height - size.height - config::SPAWN_MARGIN;
    }
    if x < 0.0 {
        x = config::SPAWN_MARGIN;
    }
    if y < 0.0 {
        y = config::SPAWN_MARGIN;
    }

    Position::new(x, y)
}
