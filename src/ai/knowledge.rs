use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Value table shared between cooperating agents.
pub type SharedKnowledge = Rc<RefCell<Knowledge>>;

/// Everything a learning agent knows: the value of each marshalled
/// state-action key, how many games were finished, and how often each cell
/// was picked by an exploratory move.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Knowledge {
    pub values: HashMap<String, f64>,
    pub iterations: u64,
    pub random_dispersion: Vec<u64>,
}

impl Knowledge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap into a handle agents can share.
    pub fn into_shared(self) -> SharedKnowledge {
        Rc::new(RefCell::new(self))
    }

    /// Number of state-action keys learned so far.
    pub fn learned_states(&self) -> usize {
        self.values.len()
    }

    /// Resize the dispersion counters to `cells`, keeping the counts that
    /// still fit.
    pub fn ensure_dispersion(&mut self, cells: usize) {
        if self.random_dispersion.len() != cells {
            self.random_dispersion.resize(cells, 0);
        }
    }

    /// Count one exploratory move at row-major cell `index`.
    pub fn record_exploration(&mut self, index: usize) {
        if index >= self.random_dispersion.len() {
            self.random_dispersion.resize(index + 1, 0);
        }
        self.random_dispersion[index] += 1;
    }
}
