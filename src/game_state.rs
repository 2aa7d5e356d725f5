//! Game state and transition rules
//!
//! [`GameState`] is a small value type: two fixed-size token arrays, the side
//! to move and the active extra-turn rule. It is cloned freely by the planner,
//! so nothing in here allocates except the legal-action list.

use std::fmt;

use rand::{Rng, RngCore};

use crate::{
    board::{
        absolute_cell, is_in_finish_lane, is_valid_position, steps_to_finish, Position, ENTRY,
        ENTRY_ROLL, FINISHED, HOME, TOKENS_PER_PLAYER, TRACK_LENGTH,
    },
    player::Color,
    LudoError, Result,
};

/// Which moves let the mover roll again
///
/// Rule sets disagree on this, so it is chosen per game instead of being
/// fixed in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExtraTurnPolicy {
    /// Turns strictly alternate
    #[default]
    Never,

    /// Rolling a six grants another turn
    OnSix,

    /// Rolling a six or capturing an opposing token grants another turn
    OnSixOrCapture,
}

impl ExtraTurnPolicy {
    /// Returns true if a move made with `roll` keeps the turn with the mover
    pub fn grants_extra_turn(self, roll: u8, captured: bool) -> bool {
        match self {
            ExtraTurnPolicy::Never => false,
            ExtraTurnPolicy::OnSix => roll == ENTRY_ROLL,
            ExtraTurnPolicy::OnSixOrCapture => roll == ENTRY_ROLL || captured,
        }
    }
}

/// Moves token `token_index` of the side to move to `target`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action {
    pub token_index: usize,
    pub target: Position,
}

impl Action {
    pub fn new(token_index: usize, target: Position) -> Self {
        Action {
            token_index,
            target,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token {} -> {}", self.token_index, self.target)
    }
}

/// What happened when an action was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    /// The die face the action corresponds to
    pub roll: u8,

    /// Index of the opposing token sent home, if any
    pub captured: Option<usize>,

    /// Whether the mover keeps the turn
    pub extra_turn: bool,
}

/// Draws a die face uniformly from `1..=6`
pub fn roll_die<R: RngCore + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(1..=6)
}

/// The full state of a two-player game
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameState {
    blue_tokens: [Position; TOKENS_PER_PLAYER],
    red_tokens: [Position; TOKENS_PER_PLAYER],
    current_player: Color,
    extra_turns: ExtraTurnPolicy,
}

impl GameState {
    /// Builds a state from explicit token positions.
    ///
    /// Fails with [`LudoError::InvalidArgument`] if a position is out of
    /// range, if two tokens share a track cell, or if a color stacks two
    /// tokens on a finish slot other than the terminal one.
    ///
    /// ```
    /// use ludo_mcts::{Color, GameState};
    ///
    /// let state = GameState::new([-1, -1, 5, 43], [-1, -1, -1, 12], Color::Blue).unwrap();
    /// assert_eq!(state.current_player(), Color::Blue);
    ///
    /// // Blue at relative 25 and Red at relative 5 are the same track cell.
    /// assert!(GameState::new([25, -1, -1, -1], [5, -1, -1, -1], Color::Blue).is_err());
    /// ```
    pub fn new(
        blue_tokens: [Position; TOKENS_PER_PLAYER],
        red_tokens: [Position; TOKENS_PER_PLAYER],
        current_player: Color,
    ) -> Result<Self> {
        let state = GameState {
            blue_tokens,
            red_tokens,
            current_player,
            extra_turns: ExtraTurnPolicy::default(),
        };
        state.validate()?;
        Ok(state)
    }

    /// A fresh game with every token at home
    pub fn initial(starting_player: Color) -> Self {
        GameState {
            blue_tokens: [HOME; TOKENS_PER_PLAYER],
            red_tokens: [HOME; TOKENS_PER_PLAYER],
            current_player: starting_player,
            extra_turns: ExtraTurnPolicy::default(),
        }
    }

    /// Sets the extra-turn rule
    pub fn with_extra_turn_policy(mut self, policy: ExtraTurnPolicy) -> Self {
        self.extra_turns = policy;
        self
    }

    pub fn set_extra_turn_policy(&mut self, policy: ExtraTurnPolicy) {
        self.extra_turns = policy;
    }

    pub fn extra_turn_policy(&self) -> ExtraTurnPolicy {
        self.extra_turns
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    /// Token positions of `color`
    pub fn tokens(&self, color: Color) -> &[Position; TOKENS_PER_PLAYER] {
        match color {
            Color::Blue => &self.blue_tokens,
            Color::Red => &self.red_tokens,
        }
    }

    fn tokens_mut(&mut self, color: Color) -> &mut [Position; TOKENS_PER_PLAYER] {
        match color {
            Color::Blue => &mut self.blue_tokens,
            Color::Red => &mut self.red_tokens,
        }
    }

    /// Lists the moves available to the side to move for `dice_roll`.
    ///
    /// An empty list means the player must pass; see [`pass_turn`](Self::pass_turn).
    /// Rolls outside `1..=6` have no moves.
    ///
    /// ```
    /// use ludo_mcts::{Action, Color, GameState};
    ///
    /// let state = GameState::initial(Color::Blue);
    /// assert!(state.get_legal_actions(3).is_empty());
    /// assert_eq!(state.get_legal_actions(6).len(), 4);
    /// assert_eq!(state.get_legal_actions(6)[0], Action::new(0, 0));
    /// ```
    pub fn get_legal_actions(&self, dice_roll: u8) -> Vec<Action> {
        if !(1..=6).contains(&dice_roll) {
            return Vec::new();
        }

        let tokens = self.tokens(self.current_player);
        let mut actions = Vec::with_capacity(TOKENS_PER_PLAYER);

        for (token_index, &position) in tokens.iter().enumerate() {
            let target = match position {
                HOME if dice_roll == ENTRY_ROLL => ENTRY,
                HOME | FINISHED => continue,
                _ => position + dice_roll as Position,
            };

            if target > FINISHED {
                continue;
            }

            // Own tokens never share a cell; the terminal slot holds any number.
            if target != FINISHED && tokens.contains(&target) {
                continue;
            }

            actions.push(Action { token_index, target });
        }

        actions
    }

    /// Returns true if at least one die face gives the side to move a legal action
    pub fn has_any_move(&self) -> bool {
        (1..=6).any(|roll| !self.get_legal_actions(roll).is_empty())
    }

    /// Applies `action` for the side to move.
    ///
    /// The die face is implied by the action: six for a token leaving home,
    /// otherwise the distance travelled. The action must be legal for that
    /// face, otherwise [`LudoError::InvalidAction`] is returned and the state
    /// is left untouched. An opposing token on the target track cell is sent
    /// home.
    pub fn apply_action(&mut self, action: Action) -> Result<MoveReport> {
        let mover = self.current_player;

        let position = *self
            .tokens(mover)
            .get(action.token_index)
            .ok_or_else(|| {
                LudoError::InvalidAction(format!(
                    "token index {} is out of range 0..{}",
                    action.token_index, TOKENS_PER_PLAYER
                ))
            })?;

        let roll = implied_roll(position, action.target).ok_or_else(|| {
            LudoError::InvalidAction(format!(
                "{} cannot move {}: no die face takes it from {} to {}",
                mover, action, position, action.target
            ))
        })?;

        if !self.get_legal_actions(roll).contains(&action) {
            return Err(LudoError::InvalidAction(format!(
                "{} is not legal for {} with a roll of {}",
                action, mover, roll
            )));
        }

        let captured = absolute_cell(mover, action.target)
            .and_then(|cell| self.capture_at(mover.opponent(), cell));

        self.tokens_mut(mover)[action.token_index] = action.target;

        let extra_turn = self
            .extra_turns
            .grants_extra_turn(roll, captured.is_some());
        if !extra_turn {
            self.current_player = mover.opponent();
        }

        Ok(MoveReport {
            roll,
            captured,
            extra_turn,
        })
    }

    /// Hands the turn to the opponent without moving
    pub fn pass_turn(&mut self) {
        self.current_player = self.current_player.opponent();
    }

    /// True once every token of either player sits on the terminal slot
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some()
    }

    /// The player whose tokens have all finished
    pub fn winner(&self) -> Option<Color> {
        Color::ALL
            .into_iter()
            .find(|&color| self.tokens(color).iter().all(|&p| p == FINISHED))
    }

    /// Total number of steps `color` still needs to finish every token
    pub fn remaining_steps(&self, color: Color) -> u32 {
        self.tokens(color).iter().map(|&p| steps_to_finish(p)).sum()
    }

    fn capture_at(&mut self, victim: Color, cell: Position) -> Option<usize> {
        let tokens = self.tokens_mut(victim);
        let index = tokens
            .iter()
            .position(|&p| absolute_cell(victim, p) == Some(cell))?;
        tokens[index] = HOME;
        Some(index)
    }

    fn validate(&self) -> Result<()> {
        let mut occupied: [Option<Color>; TRACK_LENGTH as usize] = [None; TRACK_LENGTH as usize];

        for color in Color::ALL {
            let tokens = self.tokens(color);
            for (index, &position) in tokens.iter().enumerate() {
                if !is_valid_position(position) {
                    return Err(LudoError::InvalidArgument(format!(
                        "{} token {} has out-of-range position {}",
                        color, index, position
                    )));
                }

                if let Some(cell) = absolute_cell(color, position) {
                    if let Some(owner) = occupied[cell as usize] {
                        return Err(LudoError::InvalidArgument(format!(
                            "{} token {} shares track cell {} with a {} token",
                            color, index, cell, owner
                        )));
                    }
                    occupied[cell as usize] = Some(color);
                } else if is_in_finish_lane(position)
                    && position != FINISHED
                    && tokens[..index].contains(&position)
                {
                    return Err(LudoError::InvalidArgument(format!(
                        "{} stacks two tokens on finish slot {}",
                        color, position
                    )));
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Blue {:?} | Red {:?} | {} to move",
            self.blue_tokens, self.red_tokens, self.current_player
        )
    }
}

fn implied_roll(position: Position, target: Position) -> Option<u8> {
    if position == HOME {
        return (target == ENTRY).then_some(ENTRY_ROLL);
    }
    let distance = i16::from(target) - i16::from(position);
    (1..=6).contains(&distance).then_some(distance as u8)
}
