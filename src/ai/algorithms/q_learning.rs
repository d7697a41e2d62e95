use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ai::agent::Agent;
use crate::ai::knowledge::SharedKnowledge;
use crate::ai::state_encoding::marshal_state;
use crate::error::AgentError;
use crate::game::{Action, AgentId, Environment, State};

/// Tabular Q-learning hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    pub learning_rate: f64,
    pub discount_factor: f64,
    pub exploration_factor: f64,
    pub learn: bool,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        QLearningConfig {
            learning_rate: 0.2,
            discount_factor: 0.8,
            exploration_factor: 0.25,
            learn: true,
        }
    }
}

/// What a value-table entry describes: the state after placing a mark, or
/// the final position of a finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Place(Action),
    Terminal,
}

impl Step {
    fn action(self) -> Option<Action> {
        match self {
            Step::Place(action) => Some(action),
            Step::Terminal => None,
        }
    }
}

/// The last move taken, waiting for its bootstrap target.
#[derive(Debug, Clone)]
struct Transition {
    key: String,
    reward: f64,
}

/// One-step temporal-difference update.
pub fn td_update(old: f64, reward: f64, next: f64, alpha: f64, gamma: f64) -> f64 {
    old + alpha * (reward + gamma * next - old)
}

/// Immediate reward for `agent` taking `step` on `env`.
pub fn estimate(env: &dyn Environment, agent: AgentId, step: Step) -> f64 {
    match step {
        Step::Place(action) => env.evaluate_action(agent, action).reward(),
        Step::Terminal => env.evaluate().reward_for(agent),
    }
}

/// Epsilon-greedy agent backed by a value table shared with other agents.
pub struct QLearningAgent {
    id: AgentId,
    sign: String,
    config: QLearningConfig,
    knowledge: SharedKnowledge,
    previous: Option<Transition>,
    message: Option<String>,
    rng: StdRng,
}

impl QLearningAgent {
    pub fn new(
        id: AgentId,
        sign: impl Into<String>,
        config: QLearningConfig,
        knowledge: SharedKnowledge,
    ) -> Self {
        Self::with_rng(id, sign, config, knowledge, StdRng::from_os_rng())
    }

    pub fn with_rng(
        id: AgentId,
        sign: impl Into<String>,
        config: QLearningConfig,
        knowledge: SharedKnowledge,
        rng: StdRng,
    ) -> Self {
        QLearningAgent {
            id,
            sign: sign.into(),
            config,
            knowledge,
            previous: None,
            message: None,
            rng,
        }
    }

    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    pub fn knowledge(&self) -> &SharedKnowledge {
        &self.knowledge
    }

    pub fn set_learning(&mut self, learn: bool) {
        self.config.learn = learn;
    }

    pub fn set_exploration(&mut self, exploration_factor: f64) {
        self.config.exploration_factor = exploration_factor;
    }

    /// Value of `step` from `state`. Unseen keys are seeded with their
    /// immediate reward estimate; cached values are never recomputed.
    pub fn lookup(&self, env: &dyn Environment, state: &State, step: Step) -> f64 {
        let key = marshal_state(self.id, state, step.action());
        if let Some(&value) = self.knowledge.borrow().values.get(&key) {
            return value;
        }
        let value = estimate(env, self.id, step);
        self.knowledge.borrow_mut().values.insert(key, value);
        value
    }

    /// Move the previous transition's value towards `reward + γ · next`.
    fn learn_from_previous(&mut self, next: f64) {
        let Some(prev) = self.previous.as_ref() else {
            return;
        };
        let (alpha, gamma) = (self.config.learning_rate, self.config.discount_factor);
        let mut knowledge = self.knowledge.borrow_mut();
        match knowledge.values.get_mut(&prev.key) {
            Some(value) => *value = td_update(*value, prev.reward, next, alpha, gamma),
            None => {
                knowledge.values.insert(prev.key.clone(), prev.reward);
            }
        }
    }

    fn explore(&mut self, state: &State, actions: &[Action]) -> Action {
        let action = actions[self.rng.random_range(0..actions.len())];
        let mut knowledge = self.knowledge.borrow_mut();
        knowledge.ensure_dispersion(state.width() * state.height());
        knowledge.record_exploration(action.y * state.width() + action.x);
        action
    }

    /// Highest-valued action; the first one seen wins ties.
    fn exploit(&self, env: &dyn Environment, state: &State, actions: &[Action]) -> (Action, f64) {
        let mut best = actions[0];
        let mut best_value = self.lookup(env, state, Step::Place(best));
        for &action in &actions[1..] {
            let value = self.lookup(env, state, Step::Place(action));
            if value > best_value {
                best = action;
                best_value = value;
            }
        }
        (best, best_value)
    }
}

impl Agent for QLearningAgent {
    fn id(&self) -> AgentId {
        self.id
    }

    fn sign(&self) -> &str {
        &self.sign
    }

    fn fetch_move(
        &mut self,
        env: &dyn Environment,
        state: &State,
        actions: &[Action],
    ) -> Result<Action, AgentError> {
        if actions.is_empty() {
            return Err(AgentError::NoLegalActions);
        }

        let e: f64 = self.rng.random();
        let (action, value) = if e < self.config.exploration_factor {
            let action = self.explore(state, actions);
            self.message = Some(format!("Exploratory action ({e:.6})"));
            (action, self.lookup(env, state, Step::Place(action)))
        } else {
            self.message = Some(format!("Greedy action ({e:.6})"));
            self.exploit(env, state, actions)
        };
        debug!(agent = self.id, %action, value, e, "Chose action");

        if self.config.learn {
            self.learn_from_previous(value);
        }

        self.previous = Some(Transition {
            key: marshal_state(self.id, state, Some(action)),
            reward: env.evaluate_action(self.id, action).reward(),
        });
        Ok(action)
    }

    fn game_over(&mut self, env: &dyn Environment, state: &State) {
        if self.config.learn {
            let terminal = self.lookup(env, state, Step::Terminal);
            self.learn_from_previous(terminal);
        }
        self.previous = None;
        self.message = None;
        self.knowledge.borrow_mut().iterations += 1;
    }

    fn fetch_message(&mut self) -> Option<String> {
        self.message.take()
    }
}
