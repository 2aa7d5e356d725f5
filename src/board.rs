//! Board geometry
//!
//! Token positions are stored relative to the owning color: `0` is the
//! color's entry cell, `TRACK_LENGTH - 1` the last track cell before its
//! finish lane, and `TRACK_LENGTH..=FINISHED` the finish lane itself. Two
//! tokens of different colors can only meet on the shared track, so every
//! collision check goes through [`absolute_cell`].

use crate::player::Color;

/// A token position: [`HOME`], relative track progress, or a finish slot.
pub type Position = i8;

/// Number of cells on the shared track
pub const TRACK_LENGTH: Position = 40;

/// Number of slots in each color's private finish lane
pub const FINISH_LENGTH: Position = 4;

/// Tokens owned by each player
pub const TOKENS_PER_PLAYER: usize = 4;

/// Position of a token that has not entered the track yet
pub const HOME: Position = -1;

/// Relative position of a color's entry cell
pub const ENTRY: Position = 0;

/// The terminal finish slot. A token here is finished and never moves again.
pub const FINISHED: Position = TRACK_LENGTH + FINISH_LENGTH - 1;

/// The die face that lets a token leave home
pub const ENTRY_ROLL: u8 = 6;

/// Offset of a color's entry cell on the shared track.
///
/// The two colors start on opposite sides of the board.
pub const fn entry_offset(color: Color) -> Position {
    match color {
        Color::Blue => 0,
        Color::Red => TRACK_LENGTH / 2,
    }
}

/// Maps a token's relative progress to the shared track cell it occupies.
///
/// Returns `None` for tokens at home or in the finish lane, which cannot
/// collide with the opponent.
///
/// ```
/// use ludo_mcts::{board::absolute_cell, Color};
///
/// assert_eq!(absolute_cell(Color::Blue, 5), Some(5));
/// assert_eq!(absolute_cell(Color::Red, 25), Some(5));
/// assert_eq!(absolute_cell(Color::Red, -1), None);
/// assert_eq!(absolute_cell(Color::Blue, 41), None);
/// ```
pub fn absolute_cell(color: Color, progress: Position) -> Option<Position> {
    if is_on_track(progress) {
        Some((entry_offset(color) + progress) % TRACK_LENGTH)
    } else {
        None
    }
}

/// True for positions on the shared track
pub fn is_on_track(position: Position) -> bool {
    (0..TRACK_LENGTH).contains(&position)
}

/// True for positions inside the finish lane, including the terminal slot
pub fn is_in_finish_lane(position: Position) -> bool {
    (TRACK_LENGTH..=FINISHED).contains(&position)
}

/// True for every value a token position may take
pub fn is_valid_position(position: Position) -> bool {
    (HOME..=FINISHED).contains(&position)
}

/// Steps a token still has to travel before it is finished.
///
/// A token at home needs the entry move plus the full lap.
pub fn steps_to_finish(position: Position) -> u32 {
    if position == HOME {
        (FINISHED - ENTRY) as u32 + 1
    } else {
        (FINISHED - position) as u32
    }
}
