use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::agent::Agent;
use crate::error::AgentError;
use crate::game::{Action, AgentId, Environment, State};

/// An agent that selects uniformly at random from legal actions.
pub struct RandomAgent {
    id: AgentId,
    sign: String,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(id: AgentId, sign: impl Into<String>) -> Self {
        Self::with_rng(id, sign, StdRng::from_os_rng())
    }

    pub fn with_rng(id: AgentId, sign: impl Into<String>, rng: StdRng) -> Self {
        RandomAgent {
            id,
            sign: sign.into(),
            rng,
        }
    }
}

impl Agent for RandomAgent {
    fn id(&self) -> AgentId {
        self.id
    }

    fn sign(&self) -> &str {
        &self.sign
    }

    fn fetch_move(
        &mut self,
        _env: &dyn Environment,
        _state: &State,
        actions: &[Action],
    ) -> Result<Action, AgentError> {
        if actions.is_empty() {
            return Err(AgentError::NoLegalActions);
        }
        let idx = self.rng.random_range(0..actions.len());
        Ok(actions[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Board;

    #[test]
    fn test_random_agent_selects_legal_action() {
        let mut agent = RandomAgent::with_rng(1, "X", StdRng::seed_from_u64(7));
        let board = Board::new(3, 3, 3).unwrap();
        let legal = board.potential_actions(1);

        for _ in 0..100 {
            let action = agent.fetch_move(&board, &board.state(), &legal).unwrap();
            assert!(legal.contains(&action), "Action {} is not legal", action);
        }
    }

    #[test]
    fn test_random_agent_rejects_empty_action_set() {
        let mut agent = RandomAgent::new(2, "O");
        let board = Board::new(3, 3, 3).unwrap();
        let err = agent.fetch_move(&board, &board.state(), &[]).unwrap_err();
        assert!(matches!(err, AgentError::NoLegalActions));
    }

    #[test]
    fn test_random_agent_identity() {
        let agent = RandomAgent::new(2, "O");
        assert_eq!(agent.id(), 2);
        assert_eq!(agent.sign(), "O");
        assert!(!agent.is_human());
    }
}
