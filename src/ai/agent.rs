use crate::error::AgentError;
use crate::game::{Action, AgentId, Environment, State};

/// Universal interface for every player: humans, learning agents, baselines.
pub trait Agent {
    /// Id written into the cells this agent claims.
    fn id(&self) -> AgentId;

    /// Mark shown for this agent on the board.
    fn sign(&self) -> &str;

    /// Choose one of `actions` for the given state. `env` is the live game,
    /// available for read-only evaluation of candidate moves.
    fn fetch_move(
        &mut self,
        env: &dyn Environment,
        state: &State,
        actions: &[Action],
    ) -> Result<Action, AgentError>;

    /// The round ended with `state` as the final position.
    fn game_over(&mut self, _env: &dyn Environment, _state: &State) {}

    /// Take the agent's latest status message, if any.
    fn fetch_message(&mut self) -> Option<String> {
        None
    }

    /// Humans may retry invalid input forever; programs may not.
    fn is_human(&self) -> bool {
        false
    }
}
