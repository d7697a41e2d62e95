use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use crate::ai::{Agent, QLearningAgent, RandomAgent, SharedKnowledge};
use crate::checkpoint::KnowledgeStore;
use crate::error::GameError;
use crate::game::{AgentId, Environment, Outcome};
use crate::training::episode::{next_starter, play_round, RoundEvent, RoundOptions};
use crate::training::metrics::TrainingMetrics;

/// Trainer configuration, the `[training]` section of the config file.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub rounds: usize,
    pub save_interval: usize,
    pub log_interval: usize,
    pub max_agent_failures: usize,
    pub eval_games: usize,
    pub model_path: PathBuf,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            rounds: 10_000,
            save_interval: 1000,
            log_interval: 1000,
            max_agent_failures: 3,
            eval_games: 0,
            model_path: PathBuf::from("rl.kw.json"),
        }
    }
}

/// Outcome of a training session.
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub metrics: TrainingMetrics,
    pub rounds_played: usize,
    pub interrupted: bool,
}

/// Plays consecutive rounds between agents sharing one value table.
pub struct Trainer {
    config: TrainerConfig,
    store: Option<KnowledgeStore>,
    cancel: Arc<AtomicBool>,
}

impl Trainer {
    /// A trainer that keeps its knowledge in memory only.
    pub fn new(config: TrainerConfig) -> Self {
        Trainer {
            config,
            store: None,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Persist knowledge through `store` every `save_interval` rounds and
    /// once more when the session ends.
    pub fn with_store(mut self, store: KnowledgeStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Flag that stops the session at the next round boundary once set.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    fn options(&self) -> RoundOptions {
        RoundOptions {
            max_agent_failures: self.config.max_agent_failures,
        }
    }

    fn save(&self, knowledge: &SharedKnowledge) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&knowledge.borrow()) {
                warn!(error = %e, "Failed to save knowledge");
            }
        }
    }

    /// Run the full session. Knowledge is saved even when the session is
    /// interrupted or a round is aborted.
    pub fn run<F>(
        &self,
        env: &mut dyn Environment,
        agents: &mut [&mut dyn Agent],
        knowledge: &SharedKnowledge,
        mut on_event: F,
    ) -> Result<TrainingSummary, GameError>
    where
        F: FnMut(RoundEvent<'_>),
    {
        let mut metrics = TrainingMetrics::new();
        let mut starter = 0;
        let mut rounds_played = 0;
        let mut interrupted = false;

        info!(
            rounds = self.config.rounds,
            agents = agents.len(),
            states = knowledge.borrow().learned_states(),
            "Starting session"
        );

        for round in 1..=self.config.rounds {
            if self.cancel.load(Ordering::SeqCst) {
                info!(round, "Session interrupted");
                interrupted = true;
                break;
            }

            env.reset();
            let result = match play_round(env, agents, starter, self.options(), &mut on_event) {
                Ok(result) => result,
                Err(e) => {
                    self.save(knowledge);
                    return Err(e);
                }
            };
            starter = next_starter(result.outcome);
            metrics.record_round(&result);
            rounds_played = round;

            if round % self.config.log_interval.max(1) == 0 {
                let window = self.config.log_interval;
                info!(
                    round,
                    win_rate_1 = %format!("{:.1}%", metrics.win_rate(1, window) * 100.0),
                    win_rate_2 = %format!("{:.1}%", metrics.win_rate(2, window) * 100.0),
                    draw_rate = %format!("{:.1}%", metrics.draw_rate(window) * 100.0),
                    avg_len = %format!("{:.1}", metrics.average_game_length(window)),
                    states = knowledge.borrow().learned_states(),
                    "Progress"
                );
            }

            if round % self.config.save_interval.max(1) == 0 {
                self.save(knowledge);
            }
        }

        self.save(knowledge);
        info!(
            rounds = rounds_played,
            draws = metrics.draws(),
            forced_draws = metrics.forced_draws(),
            "Session finished"
        );

        Ok(TrainingSummary {
            metrics,
            rounds_played,
            interrupted,
        })
    }

    /// Win rate of `agent` playing greedily against a random opponent, with
    /// the first move alternating between the two. The agent's settings and
    /// its value table are left as they were.
    pub fn evaluate(
        &self,
        env: &mut dyn Environment,
        agent: &mut QLearningAgent,
        games: usize,
    ) -> Result<f32, GameError> {
        if games == 0 {
            return Ok(0.0);
        }

        let saved_config = agent.config().clone();
        let saved_knowledge = agent.knowledge().borrow().clone();
        agent.set_exploration(0.0);
        agent.set_learning(false);

        let agent_id = agent.id();
        let opponent_id: AgentId = if agent_id == 1 { 2 } else { 1 };
        let mut random = RandomAgent::new(opponent_id, "R");
        let mut wins = 0;
        let mut outcome = Ok(());

        for game in 0..games {
            env.reset();
            let mut agents: [&mut dyn Agent; 2] = if agent_id == 1 {
                [&mut *agent, &mut random]
            } else {
                [&mut random, &mut *agent]
            };
            match play_round(env, &mut agents, game % 2, self.options(), |_| {}) {
                Ok(result) if result.outcome == Outcome::Winner(agent_id) => wins += 1,
                Ok(_) => {}
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            }
        }

        agent.set_exploration(saved_config.exploration_factor);
        agent.set_learning(saved_config.learn);
        *agent.knowledge().borrow_mut() = saved_knowledge;
        outcome.map(|()| wins as f32 / games as f32)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::ai::{Knowledge, QLearningConfig};
    use crate::game::Board;

    fn learning_pair(knowledge: &SharedKnowledge) -> (QLearningAgent, QLearningAgent) {
        let config = QLearningConfig::default();
        (
            QLearningAgent::with_rng(
                1,
                "X",
                config.clone(),
                knowledge.clone(),
                StdRng::seed_from_u64(1),
            ),
            QLearningAgent::with_rng(2, "O", config, knowledge.clone(), StdRng::seed_from_u64(2)),
        )
    }

    fn config(rounds: usize) -> TrainerConfig {
        TrainerConfig {
            rounds,
            save_interval: 10,
            log_interval: 10,
            ..Default::default()
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = TrainerConfig::default();
        assert_eq!(config.rounds, 10_000);
        assert_eq!(config.save_interval, 1000);
        assert_eq!(config.max_agent_failures, 3);
        assert_eq!(config.model_path, PathBuf::from("rl.kw.json"));
    }

    #[test]
    fn test_run_plays_all_rounds() {
        let knowledge = Knowledge::new().into_shared();
        let (mut a, mut b) = learning_pair(&knowledge);
        let mut board = Board::new(3, 3, 3).unwrap();
        let mut finished = 0;

        let summary = Trainer::new(config(25))
            .run(&mut board, &mut [&mut a, &mut b], &knowledge, |event| {
                if let RoundEvent::Finished { .. } = event {
                    finished += 1;
                }
            })
            .unwrap();

        assert_eq!(summary.rounds_played, 25);
        assert!(!summary.interrupted);
        assert_eq!(finished, 25);
        assert_eq!(summary.metrics.total_rounds(), 25);
        // Both agents count every finished game
        assert_eq!(knowledge.borrow().iterations, 50);
        assert!(knowledge.borrow().learned_states() > 0);
    }

    #[test]
    fn test_run_saves_knowledge() {
        let dir = tempfile::tempdir().unwrap();
        let store = KnowledgeStore::new(dir.path().join("model.json"));
        let knowledge = Knowledge::new().into_shared();
        let (mut a, mut b) = learning_pair(&knowledge);
        let mut board = Board::new(3, 3, 3).unwrap();

        Trainer::new(config(15))
            .with_store(store.clone())
            .run(&mut board, &mut [&mut a, &mut b], &knowledge, |_| {})
            .unwrap();

        let saved = store.load().unwrap().unwrap();
        let live = knowledge.borrow();
        assert_eq!(saved.iterations, 30);
        assert_eq!(saved.learned_states(), live.learned_states());
        assert!(live.values.keys().all(|key| saved.values.contains_key(key)));
    }

    #[test]
    fn test_cancelled_run_stops_and_still_saves() {
        let dir = tempfile::tempdir().unwrap();
        let store = KnowledgeStore::new(dir.path().join("model.json"));
        let knowledge = Knowledge::new().into_shared();
        let (mut a, mut b) = learning_pair(&knowledge);
        let mut board = Board::new(3, 3, 3).unwrap();

        let trainer = Trainer::new(config(1000)).with_store(store.clone());
        let cancel = trainer.cancel_flag();
        let mut rounds = 0;
        let summary = trainer
            .run(&mut board, &mut [&mut a, &mut b], &knowledge, |event| {
                if let RoundEvent::Finished { .. } = event {
                    rounds += 1;
                    if rounds == 3 {
                        cancel.store(true, Ordering::SeqCst);
                    }
                }
            })
            .unwrap();

        assert!(summary.interrupted);
        assert_eq!(summary.rounds_played, 3);
        assert_eq!(store.load().unwrap().unwrap().iterations, 6);
    }

    #[test]
    fn test_evaluate_restores_agent() {
        let knowledge = Knowledge::new().into_shared();
        let (mut a, _) = learning_pair(&knowledge);
        let mut board = Board::new(3, 3, 3).unwrap();
        let trainer = Trainer::new(config(1));

        let rate = trainer.evaluate(&mut board, &mut a, 20).unwrap();
        assert!((0.0..=1.0).contains(&rate));
        assert_eq!(a.config(), &QLearningConfig::default());
        assert_eq!(*knowledge.borrow(), Knowledge::new());
        assert_eq!(trainer.evaluate(&mut board, &mut a, 0).unwrap(), 0.0);
    }
}
