mod q_learning;

pub use q_learning::{estimate, td_update, QLearningAgent, QLearningConfig, Step};
