use super::action::{AgentId, DRAW_REWARD, EMPTY, CONTINUE_REWARD, LOSS_REWARD, WIN_REWARD};
use crate::error::BoardError;

/// Whole-board result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Winner(AgentId),
    Draw,
}

impl Outcome {
    /// The winner's id, `-1` for a draw, `0` while the game goes on.
    pub fn code(self) -> i32 {
        match self {
            Outcome::InProgress => 0,
            Outcome::Winner(id) => id as i32,
            Outcome::Draw => -1,
        }
    }

    pub fn is_terminal(self) -> bool {
        self != Outcome::InProgress
    }

    /// Value of this outcome from `agent`'s point of view.
    pub fn reward_for(self, agent: AgentId) -> f64 {
        match self {
            Outcome::InProgress => CONTINUE_REWARD,
            Outcome::Draw => DRAW_REWARD,
            Outcome::Winner(id) if id == agent => WIN_REWARD,
            Outcome::Winner(_) => LOSS_REWARD,
        }
    }
}

/// Snapshot of a board's grid. Cells are stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct State {
    width: usize,
    height: usize,
    cells: Vec<AgentId>,
}

impl State {
    /// An all-empty grid.
    pub fn empty(width: usize, height: usize) -> Self {
        State {
            width,
            height,
            cells: vec![EMPTY; width * height],
        }
    }

    /// Build a state from rows, top row first.
    pub fn from_rows(rows: &[Vec<AgentId>]) -> Result<Self, BoardError> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        let mut cells = Vec::with_capacity(width * height);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != width {
                return Err(BoardError::RaggedState {
                    row,
                    found: values.len(),
                    expected: width,
                });
            }
            cells.extend_from_slice(values);
        }
        Ok(State {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Owner of the cell at column `x`, row `y`, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<AgentId> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Overwrite a cell. Out-of-range writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, owner: AgentId) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = owner;
        }
    }

    /// Iterate over rows, top row first.
    pub fn rows(&self) -> impl Iterator<Item = &[AgentId]> {
        self.cells.chunks(self.width.max(1))
    }

    pub fn cells(&self) -> &[AgentId] {
        &self.cells
    }

    pub fn empty_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| c == EMPTY).count()
    }
}
