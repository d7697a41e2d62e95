use std::fmt;

/// Identifier of the agent owning a cell. `0` marks an empty cell.
pub type AgentId = u8;

/// Value of an empty cell.
pub const EMPTY: AgentId = 0;

/// Reward for completing a winning line.
pub const WIN_REWARD: f64 = 1.0;
/// Reward for a move that leaves the game running.
pub const CONTINUE_REWARD: f64 = 0.0;
/// Reward for a move that fills the board without a winner.
pub const DRAW_REWARD: f64 = -0.5;
/// Value of a finished game that another agent won.
pub const LOSS_REWARD: f64 = -1.0;

/// A grid coordinate, 0-indexed. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action {
    pub x: usize,
    pub y: usize,
}

impl Action {
    pub fn new(x: usize, y: usize) -> Self {
        Action { x, y }
    }

    /// Build an action from a 1-based, row-major cell number on a board
    /// `width` columns wide. Returns `None` for cell `0`.
    pub fn from_cell_number(cell: usize, width: usize) -> Option<Self> {
        if cell == 0 || width == 0 {
            return None;
        }
        let index = cell - 1;
        Some(Action {
            x: index % width,
            y: index / width,
        })
    }

    /// Inverse of [`Action::from_cell_number`].
    pub fn cell_number(&self, width: usize) -> usize {
        self.y * width + self.x + 1
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Result of checking a single move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Win,
    Continue,
    Draw,
}

impl ActionOutcome {
    /// `1` for a win, `0` to continue, `-1` for a draw.
    pub fn code(self) -> i32 {
        match self {
            ActionOutcome::Win => 1,
            ActionOutcome::Continue => 0,
            ActionOutcome::Draw => -1,
        }
    }

    /// Immediate reward assigned to the move.
    pub fn reward(self) -> f64 {
        match self {
            ActionOutcome::Win => WIN_REWARD,
            ActionOutcome::Continue => CONTINUE_REWARD,
            ActionOutcome::Draw => DRAW_REWARD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_number_roundtrip() {
        let action = Action::from_cell_number(6, 3).unwrap();
        assert_eq!(action, Action::new(2, 1));
        assert_eq!(action.cell_number(3), 6);
    }

    #[test]
    fn test_cell_number_zero_is_rejected() {
        assert_eq!(Action::from_cell_number(0, 3), None);
    }

    #[test]
    fn test_action_outcome_rewards() {
        assert_eq!(ActionOutcome::Win.reward(), 1.0);
        assert_eq!(ActionOutcome::Continue.reward(), 0.0);
        assert_eq!(ActionOutcome::Draw.reward(), -0.5);
    }
}
