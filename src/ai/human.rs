use std::io::{BufRead, Write};

use super::agent::Agent;
use crate::error::AgentError;
use crate::game::{Action, AgentId, Environment, State};

/// A player typing 1-based cell numbers, counted row by row.
pub struct HumanAgent<R, W> {
    id: AgentId,
    sign: String,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> HumanAgent<R, W> {
    pub fn new(id: AgentId, sign: impl Into<String>, input: R, output: W) -> Self {
        HumanAgent {
            id,
            sign: sign.into(),
            input,
            output,
        }
    }

    fn read_cell(&mut self) -> Result<usize, AgentError> {
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Err(AgentError::InputClosed);
        }
        let line = std::str::from_utf8(&buf)
            .map_err(|_| AgentError::InvalidInput("input is not valid UTF-8".into()))?;
        let trimmed = line.trim();
        match trimmed.parse::<usize>() {
            Ok(cell) if cell > 0 => Ok(cell),
            _ => Err(AgentError::InvalidInput(format!(
                "'{trimmed}' is not a cell number"
            ))),
        }
    }
}

impl<R: BufRead, W: Write> Agent for HumanAgent<R, W> {
    fn id(&self) -> AgentId {
        self.id
    }

    fn sign(&self) -> &str {
        &self.sign
    }

    fn fetch_move(
        &mut self,
        _env: &dyn Environment,
        state: &State,
        _actions: &[Action],
    ) -> Result<Action, AgentError> {
        write!(self.output, "{} > Your move? ", self.sign)?;
        self.output.flush()?;
        let cell = self.read_cell()?;
        Action::from_cell_number(cell, state.width())
            .ok_or_else(|| AgentError::InvalidInput(format!("'{cell}' is not a cell number")))
    }

    fn is_human(&self) -> bool {
        true
    }
}
