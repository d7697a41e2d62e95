use super::action::{Action, ActionOutcome, AgentId, EMPTY};
use super::environment::Environment;
use super::state::{Outcome, State};
use crate::error::{BoardError, MoveError};

/// Line directions as (dx, dy): horizontal, vertical, top-left to
/// bottom-right and top-right to bottom-left.
const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (-1, 1)];

/// An m,n,k-game board: `m` columns, `n` rows, `k` marks in a row to win.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    m: usize,
    n: usize,
    k: usize,
    grid: State,
    empty: usize,
}

impl Board {
    /// Create an empty board. Fails if no line of `k` marks fits.
    pub fn new(m: usize, n: usize, k: usize) -> Result<Self, BoardError> {
        validate_dimensions(m, n, k)?;
        Ok(Board {
            m,
            n,
            k,
            grid: State::empty(m, n),
            empty: m * n,
        })
    }

    /// Rebuild a board from a saved snapshot.
    pub fn from_state(state: &State, k: usize) -> Result<Self, BoardError> {
        let (m, n) = (state.width(), state.height());
        validate_dimensions(m, n, k)?;
        Ok(Board {
            m,
            n,
            k,
            grid: state.clone(),
            empty: state.empty_cells(),
        })
    }

    pub fn width(&self) -> usize {
        self.m
    }

    pub fn height(&self) -> usize {
        self.n
    }

    pub fn win_length(&self) -> usize {
        self.k
    }

    pub fn is_full(&self) -> bool {
        self.empty == 0
    }

    fn owner(&self, x: isize, y: isize) -> Option<AgentId> {
        if x < 0 || y < 0 {
            return None;
        }
        self.grid.get(x as usize, y as usize)
    }

    /// Count consecutive cells owned by `agent`, starting one step away from
    /// (x, y) in direction (dx, dy). Stops after `k - 1` cells.
    fn count_from(&self, agent: AgentId, x: usize, y: usize, dx: isize, dy: isize) -> usize {
        let mut count = 0;
        let (mut cx, mut cy) = (x as isize + dx, y as isize + dy);
        while count < self.k - 1 && self.owner(cx, cy) == Some(agent) {
            count += 1;
            cx += dx;
            cy += dy;
        }
        count
    }

    /// Length of the run of `owner` marks starting at (x, y) and extending
    /// in direction (dx, dy).
    fn run_length(&self, owner: AgentId, x: usize, y: usize, dx: isize, dy: isize) -> usize {
        let mut length = 0;
        let (mut cx, mut cy) = (x as isize, y as isize);
        while self.owner(cx, cy) == Some(owner) {
            length += 1;
            cx += dx;
            cy += dy;
        }
        length
    }
}

fn validate_dimensions(m: usize, n: usize, k: usize) -> Result<(), BoardError> {
    if m == 0 || n == 0 || k == 0 {
        return Err(BoardError::ZeroDimension { m, n, k });
    }
    if k > m && k > n {
        return Err(BoardError::Unwinnable { m, n, k });
    }
    Ok(())
}

impl Environment for Board {
    fn state(&self) -> State {
        self.grid.clone()
    }

    fn potential_actions(&self, _agent: AgentId) -> Vec<Action> {
        let mut actions = Vec::with_capacity(self.empty);
        for y in 0..self.n {
            for x in 0..self.m {
                if self.grid.get(x, y) == Some(EMPTY) {
                    actions.push(Action::new(x, y));
                }
            }
        }
        actions
    }

    fn act(&mut self, agent: AgentId, action: Action) -> Result<f64, MoveError> {
        let Action { x, y } = action;
        match self.grid.get(x, y) {
            None => Err(MoveError::OutOfRange {
                x,
                y,
                width: self.m,
                height: self.n,
            }),
            Some(EMPTY) => {
                self.grid.set(x, y, agent);
                self.empty -= 1;
                Ok(self.evaluate_action(agent, action).reward())
            }
            Some(_) => Err(MoveError::CellOccupied { x, y }),
        }
    }

    fn evaluate(&self) -> Outcome {
        for &(dx, dy) in &DIRECTIONS {
            for y in 0..self.n {
                for x in 0..self.m {
                    let owner = match self.grid.get(x, y) {
                        Some(owner) if owner != EMPTY => owner,
                        _ => continue,
                    };
                    // Only measure maximal runs, from their first cell.
                    let (px, py) = (x as isize - dx, y as isize - dy);
                    if self.owner(px, py) == Some(owner) {
                        continue;
                    }
                    if self.run_length(owner, x, y, dx, dy) >= self.k {
                        return Outcome::Winner(owner);
                    }
                }
            }
        }

        if self.is_full() {
            Outcome::Draw
        } else {
            Outcome::InProgress
        }
    }

    fn evaluate_action(&self, agent: AgentId, action: Action) -> ActionOutcome {
        let Action { x, y } = action;
        let current = match self.grid.get(x, y) {
            Some(owner) => owner,
            None => return ActionOutcome::Continue,
        };

        for &(dx, dy) in &DIRECTIONS {
            let forward = self.count_from(agent, x, y, dx, dy);
            let backward = self.count_from(agent, x, y, -dx, -dy);
            if 1 + forward + backward >= self.k {
                return ActionOutcome::Win;
            }
        }

        // The action's own cell counts as filled whether or not it has been
        // written yet.
        let remaining = if current == EMPTY {
            self.empty - 1
        } else {
            self.empty
        };
        if remaining == 0 {
            ActionOutcome::Draw
        } else {
            ActionOutcome::Continue
        }
    }

    fn reset(&mut self) {
        self.grid = State::empty(self.m, self.n);
        self.empty = self.m * self.n;
    }
}
