use tracing::{debug, warn};

use crate::ai::Agent;
use crate::error::GameError;
use crate::game::{Action, ActionOutcome, AgentId, Environment, Outcome, State};

/// Limits applied while driving a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOptions {
    /// Consecutive failed turns a program may have before the round is
    /// declared a draw. Humans retry without limit.
    pub max_agent_failures: usize,
}

impl Default for RoundOptions {
    fn default() -> Self {
        RoundOptions {
            max_agent_failures: 3,
        }
    }
}

/// Result of a single round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    pub outcome: Outcome,
    pub moves: usize,
    /// The round was ended as a draw because an agent kept failing.
    pub forced_draw: bool,
}

impl RoundResult {
    pub fn winner(&self) -> Option<AgentId> {
        match self.outcome {
            Outcome::Winner(id) => Some(id),
            _ => None,
        }
    }
}

/// Progress notifications emitted while a round is played.
#[derive(Debug)]
pub enum RoundEvent<'a> {
    Started {
        agent: AgentId,
        state: &'a State,
    },
    Moved {
        agent: AgentId,
        action: Action,
        state: &'a State,
        message: Option<String>,
    },
    Rejected {
        agent: AgentId,
        reason: &'a str,
        failures: usize,
    },
    Finished {
        result: &'a RoundResult,
        state: &'a State,
    },
}

enum Turn {
    Played(ActionOutcome),
    Forfeit,
}

/// Play one round on `env`, starting with `agents[starter]`. Agent `i` is
/// expected to own id `i + 1`.
///
/// Every agent is told the final position through `game_over`. A program
/// that fails fatally, or `max_agent_failures` times in a row, ends the
/// round as a forced draw. A human failing fatally aborts the round.
pub fn play_round<F>(
    env: &mut dyn Environment,
    agents: &mut [&mut dyn Agent],
    starter: usize,
    options: RoundOptions,
    mut on_event: F,
) -> Result<RoundResult, GameError>
where
    F: FnMut(RoundEvent<'_>),
{
    if agents.is_empty() {
        return Err(GameError::NoAgents);
    }

    let mut turn = starter % agents.len();
    let mut moves = 0;
    on_event(RoundEvent::Started {
        agent: agents[turn].id(),
        state: &env.state(),
    });
    let (outcome, forced_draw) = loop {
        let agent = &mut *agents[turn];
        match take_turn(env, agent, options, &mut moves, &mut on_event)? {
            Turn::Played(ActionOutcome::Win) => break (Outcome::Winner(agent.id()), false),
            Turn::Played(ActionOutcome::Draw) => break (Outcome::Draw, false),
            Turn::Played(ActionOutcome::Continue) => turn = (turn + 1) % agents.len(),
            Turn::Forfeit => break (Outcome::Draw, true),
        }
    };

    let final_state = env.state();
    for agent in agents.iter_mut() {
        agent.game_over(&*env, &final_state);
    }

    let result = RoundResult {
        outcome,
        moves,
        forced_draw,
    };
    debug!(?outcome, moves, forced_draw, "Round finished");
    on_event(RoundEvent::Finished {
        result: &result,
        state: &final_state,
    });
    Ok(result)
}

/// Ask `agent` for moves until one is accepted or the agent is out of
/// chances. Rejected moves never touch the board.
fn take_turn<F>(
    env: &mut dyn Environment,
    agent: &mut dyn Agent,
    options: RoundOptions,
    moves: &mut usize,
    on_event: &mut F,
) -> Result<Turn, GameError>
where
    F: FnMut(RoundEvent<'_>),
{
    let id = agent.id();
    let state = env.state();
    let actions = env.potential_actions(id);
    let mut failures = 0;

    loop {
        let reason = match agent.fetch_move(&*env, &state, &actions) {
            Ok(action) => match env.act(id, action) {
                Ok(_) => {
                    *moves += 1;
                    let result = env.evaluate_action(id, action);
                    let after = env.state();
                    on_event(RoundEvent::Moved {
                        agent: id,
                        action,
                        state: &after,
                        message: agent.fetch_message(),
                    });
                    return Ok(Turn::Played(result));
                }
                Err(e) => e.to_string(),
            },
            Err(e) if e.is_fatal() && agent.is_human() => {
                return Err(GameError::AgentAborted {
                    agent: id,
                    source: e,
                });
            }
            Err(e) if e.is_fatal() => {
                warn!(agent = id, error = %e, "Agent failed, forcing a draw");
                return Ok(Turn::Forfeit);
            }
            Err(e) => e.to_string(),
        };

        failures += 1;
        on_event(RoundEvent::Rejected {
            agent: id,
            reason: &reason,
            failures,
        });
        if agent.is_human() {
            continue;
        }
        warn!(agent = id, failures, %reason, "Agent move rejected");
        if failures >= options.max_agent_failures {
            warn!(agent = id, "Too many failed moves, forcing a draw");
            return Ok(Turn::Forfeit);
        }
    }
}

/// Index of the agent starting the round after `outcome`: the winner, or
/// the first agent after a draw.
pub fn next_starter(outcome: Outcome) -> usize {
    match outcome {
        Outcome::Winner(id) => usize::from(id).saturating_sub(1),
        _ => 0,
    }
}
