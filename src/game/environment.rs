use super::{Action, ActionOutcome, AgentId, Outcome, State};
use crate::error::MoveError;

/// A turn-based game agents can observe and act upon.
pub trait Environment {
    /// Deep copy of the current grid.
    fn state(&self) -> State;

    /// Every legal action for `agent`, in row-major order.
    fn potential_actions(&self, agent: AgentId) -> Vec<Action>;

    /// Apply `action` for `agent` and return the reward for the move.
    fn act(&mut self, agent: AgentId, action: Action) -> Result<f64, MoveError>;

    /// Authoritative result of the whole board.
    fn evaluate(&self) -> Outcome;

    /// Result of `agent` owning the cell at `action`, checked locally.
    fn evaluate_action(&self, agent: AgentId, action: Action) -> ActionOutcome;

    /// Clear the grid for a new round.
    fn reset(&mut self);
}
