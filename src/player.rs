//! The two sides of the game.

use std::fmt;

/// One of the two players. Blue is the side the planner entry point
/// [`choose_blue_move`](crate::choose_blue_move) reasons for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Blue,
    Red,
}

impl Color {
    /// Both colors in seating order.
    pub const ALL: [Color; 2] = [Color::Blue, Color::Red];

    /// Returns the other player
    pub fn opponent(self) -> Color {
        match self {
            Color::Blue => Color::Red,
            Color::Red => Color::Blue,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Blue => write!(f, "Blue"),
            Color::Red => write!(f, "Red"),
        }
    }
}
