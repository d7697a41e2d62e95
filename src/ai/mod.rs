mod agent;
pub mod algorithms;
mod human;
mod knowledge;
mod random;
pub mod state_encoding;

pub use agent::Agent;
pub use algorithms::{QLearningAgent, QLearningConfig, Step};
pub use human::HumanAgent;
pub use knowledge::{Knowledge, SharedKnowledge};
pub use random::RandomAgent;
