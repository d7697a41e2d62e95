//! m,n,k-game logic: board representation, evaluation engine, and the value
//! types shared with agents.

mod action;
mod board;
mod environment;
mod state;

pub use action::{
    Action, ActionOutcome, AgentId, CONTINUE_REWARD, DRAW_REWARD, EMPTY, LOSS_REWARD, WIN_REWARD,
};
pub use board::Board;
pub use environment::Environment;
pub use state::{Outcome, State};
