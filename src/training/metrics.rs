use std::collections::{BTreeMap, VecDeque};

use crate::game::AgentId;
use crate::training::episode::RoundResult;

/// Compact record of a finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundRecord {
    pub winner: Option<AgentId>,
    pub moves: usize,
    pub forced_draw: bool,
}

impl From<&RoundResult> for RoundRecord {
    fn from(result: &RoundResult) -> Self {
        RoundRecord {
            winner: result.winner(),
            moves: result.moves,
            forced_draw: result.forced_draw,
        }
    }
}

/// Scoreboard with lifetime tallies plus rolling window rates.
#[derive(Debug, Clone)]
pub struct TrainingMetrics {
    recent: VecDeque<RoundRecord>,
    capacity: usize,
    wins: BTreeMap<AgentId, u64>,
    draws: u64,
    forced_draws: u64,
    total_rounds: u64,
    total_moves: u64,
}

impl TrainingMetrics {
    pub fn with_capacity(capacity: usize) -> Self {
        TrainingMetrics {
            recent: VecDeque::with_capacity(capacity),
            capacity,
            wins: BTreeMap::new(),
            draws: 0,
            forced_draws: 0,
            total_rounds: 0,
            total_moves: 0,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(1000)
    }

    pub fn record_round(&mut self, result: &RoundResult) {
        let record = RoundRecord::from(result);
        self.total_rounds += 1;
        self.total_moves += record.moves as u64;
        match record.winner {
            Some(id) => *self.wins.entry(id).or_insert(0) += 1,
            None => self.draws += 1,
        }
        if record.forced_draw {
            self.forced_draws += 1;
        }

        self.recent.push_back(record);
        if self.recent.len() > self.capacity {
            self.recent.pop_front();
        }
    }

    fn window(&self, last_n: usize) -> impl Iterator<Item = &RoundRecord> {
        self.recent.iter().rev().take(last_n)
    }

    fn window_len(&self, last_n: usize) -> usize {
        self.recent.len().min(last_n)
    }

    /// Share of the last N rounds won by `agent`.
    pub fn win_rate(&self, agent: AgentId, last_n: usize) -> f32 {
        let n = self.window_len(last_n);
        if n == 0 {
            return 0.0;
        }
        let wins = self
            .window(last_n)
            .filter(|r| r.winner == Some(agent))
            .count();
        wins as f32 / n as f32
    }

    /// Share of the last N rounds without a winner.
    pub fn draw_rate(&self, last_n: usize) -> f32 {
        let n = self.window_len(last_n);
        if n == 0 {
            return 0.0;
        }
        let draws = self.window(last_n).filter(|r| r.winner.is_none()).count();
        draws as f32 / n as f32
    }

    pub fn average_game_length(&self, last_n: usize) -> f32 {
        let n = self.window_len(last_n);
        if n == 0 {
            return 0.0;
        }
        let total: usize = self.window(last_n).map(|r| r.moves).sum();
        total as f32 / n as f32
    }

    pub fn wins(&self, agent: AgentId) -> u64 {
        self.wins.get(&agent).copied().unwrap_or(0)
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }

    pub fn forced_draws(&self) -> u64 {
        self.forced_draws
    }

    pub fn total_rounds(&self) -> u64 {
        self.total_rounds
    }

    pub fn total_moves(&self) -> u64 {
        self.total_moves
    }

    /// Agent with the most wins; `None` when nobody won or the top is shared.
    pub fn overall_winner(&self) -> Option<AgentId> {
        let top = self.wins.values().copied().max()?;
        let mut leaders = self.wins.iter().filter(|&(_, &w)| w == top);
        let (&id, _) = leaders.next()?;
        if leaders.next().is_some() {
            None
        } else {
            Some(id)
        }
    }
}

impl Default for TrainingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Outcome;

    fn round(outcome: Outcome, moves: usize) -> RoundResult {
        RoundResult {
            outcome,
            moves,
            forced_draw: false,
        }
    }

    #[test]
    fn test_win_rate() {
        let mut m = TrainingMetrics::new();
        for _ in 0..7 {
            m.record_round(&round(Outcome::Winner(1), 5));
        }
        for _ in 0..3 {
            m.record_round(&round(Outcome::Winner(2), 6));
        }
        assert!((m.win_rate(1, 10) - 0.7).abs() < 1e-6);
        assert!((m.win_rate(2, 3) - 1.0).abs() < 1e-6);
        assert_eq!(m.wins(1), 7);
        assert_eq!(m.wins(3), 0);
    }

    #[test]
    fn test_draw_rate_and_forced_draws() {
        let mut m = TrainingMetrics::new();
        m.record_round(&round(Outcome::Draw, 9));
        m.record_round(&RoundResult {
            outcome: Outcome::Draw,
            moves: 2,
            forced_draw: true,
        });
        m.record_round(&round(Outcome::Winner(1), 5));
        m.record_round(&round(Outcome::Winner(2), 6));
        assert!((m.draw_rate(10) - 0.5).abs() < 1e-6);
        assert_eq!(m.draws(), 2);
        assert_eq!(m.forced_draws(), 1);
        assert_eq!(m.total_moves(), 22);
    }

    #[test]
    fn test_average_game_length() {
        let mut m = TrainingMetrics::new();
        m.record_round(&round(Outcome::Draw, 20));
        m.record_round(&round(Outcome::Draw, 30));
        assert!((m.average_game_length(10) - 25.0).abs() < 1e-6);
        assert!((m.average_game_length(1) - 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_window_is_capped_but_totals_are_not() {
        let mut m = TrainingMetrics::with_capacity(2);
        m.record_round(&round(Outcome::Winner(1), 5));
        m.record_round(&round(Outcome::Draw, 9));
        m.record_round(&round(Outcome::Draw, 9));
        assert_eq!(m.win_rate(1, 10), 0.0);
        assert_eq!(m.total_rounds(), 3);
        assert_eq!(m.wins(1), 1);
    }

    #[test]
    fn test_overall_winner() {
        let mut m = TrainingMetrics::new();
        assert_eq!(m.overall_winner(), None);
        m.record_round(&round(Outcome::Draw, 9));
        assert_eq!(m.overall_winner(), None);
        m.record_round(&round(Outcome::Winner(2), 5));
        assert_eq!(m.overall_winner(), Some(2));
        m.record_round(&round(Outcome::Winner(1), 5));
        assert_eq!(m.overall_winner(), None);
        m.record_round(&round(Outcome::Winner(1), 5));
        assert_eq!(m.overall_winner(), Some(1));
    }

    #[test]
    fn test_empty_metrics() {
        let m = TrainingMetrics::default();
        assert_eq!(m.win_rate(1, 10), 0.0);
        assert_eq!(m.draw_rate(10), 0.0);
        assert_eq!(m.average_game_length(10), 0.0);
    }
}
