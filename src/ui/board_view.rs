use std::collections::BTreeMap;
use std::fmt::Write;

use crate::game::{AgentId, State, EMPTY};
use crate::training::metrics::TrainingMetrics;

const CELL_WIDTH: usize = 5;

/// Plain-text renderer for boards and session statistics.
#[derive(Debug, Clone, Default)]
pub struct BoardView {
    signs: BTreeMap<AgentId, String>,
}

impl BoardView {
    pub fn new<I, S>(signs: I) -> Self
    where
        I: IntoIterator<Item = (AgentId, S)>,
        S: Into<String>,
    {
        BoardView {
            signs: signs.into_iter().map(|(id, s)| (id, s.into())).collect(),
        }
    }

    fn sign(&self, id: AgentId) -> &str {
        self.signs.get(&id).map(String::as_str).unwrap_or("?")
    }

    /// Draw `state` inside a double-line frame. Empty cells show the 1-based
    /// number a human types to claim them.
    pub fn render(&self, state: &State) -> String {
        let width = state.width();
        let border = |left: char, fill: char, join: char, right: char| {
            let mut line = String::new();
            line.push(left);
            for col in 0..width {
                line.extend(std::iter::repeat(fill).take(CELL_WIDTH));
                line.push(if col + 1 < width { join } else { right });
            }
            line
        };

        let mut out = String::new();
        for (y, row) in state.rows().enumerate() {
            let line = if y == 0 {
                border('╔', '═', '╤', '╗')
            } else {
                border('║', '─', '┼', '║')
            };
            out.push_str(&line);
            out.push('\n');

            out.push('║');
            for (x, &cell) in row.iter().enumerate() {
                if x > 0 {
                    out.push('│');
                }
                let label = if cell == EMPTY {
                    (y * width + x + 1).to_string()
                } else {
                    self.sign(cell).to_string()
                };
                let _ = write!(out, "{label:^CELL_WIDTH$}");
            }
            out.push_str("║\n");
        }
        if state.height() > 0 {
            out.push_str(&border('╚', '═', '╧', '╝'));
            out.push('\n');
        }
        out
    }

    /// Final tally such as `Stats: X/O/Draw = 5/3/2` plus the overall winner.
    pub fn scoreboard(&self, metrics: &TrainingMetrics) -> String {
        let mut signs = Vec::new();
        let mut counts = Vec::new();
        for (&id, sign) in &self.signs {
            signs.push(sign.as_str());
            counts.push(metrics.wins(id).to_string());
        }
        signs.push("Draw");
        counts.push(metrics.draws().to_string());

        let winner = match metrics.overall_winner() {
            Some(id) => self.sign(id),
            None => "DRAW",
        };
        let mut out = format!(
            "Stats: {} = {}\nOverall winner: {}",
            signs.join("/"),
            counts.join("/"),
            winner
        );
        if metrics.forced_draws() > 0 {
            let _ = write!(out, "\nForced draws: {}", metrics.forced_draws());
        }
        out
    }

    /// Exploratory move counts, one line per 1-based cell number.
    pub fn dispersion(counts: &[u64]) -> String {
        let mut out = String::from("Random move dispersion:");
        for (i, count) in counts.iter().enumerate() {
            let _ = write!(out, "\n{}: {}", i + 1, count);
        }
        out
    }
}
