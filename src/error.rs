use std::path::PathBuf;

use crate::game::AgentId;

/// Rejected moves. The board is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("move ({x}, {y}) is out of range for a {width}x{height} board")]
    OutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("cell ({x}, {y}) is already taken")]
    CellOccupied { x: usize, y: usize },
}

/// Errors that can occur when constructing a board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board dimensions must be positive (m={m}, n={n}, k={k})")]
    ZeroDimension { m: usize, n: usize, k: usize },

    #[error("there can not exist {k} marks in a row on a {m}x{n} board")]
    Unwinnable { m: usize, n: usize, k: usize },

    #[error("state rows must all have the same width (row {row} has {found}, expected {expected})")]
    RaggedState {
        row: usize,
        found: usize,
        expected: usize,
    },
}

/// Errors raised by an agent while choosing a move.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("no legal actions available")]
    NoLegalActions,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("input stream closed")]
    InputClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AgentError {
    /// Fatal errors can not be fixed by asking the agent again.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, AgentError::InvalidInput(_))
    }
}

/// Errors that end a round abnormally.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("agent {agent} aborted the round: {source}")]
    AgentAborted { agent: AgentId, source: AgentError },

    #[error("a round needs at least one agent")]
    NoAgents,
}

/// Errors that can occur while persisting learned knowledge.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("failed to read knowledge from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write knowledge to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse knowledge from {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize knowledge: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
