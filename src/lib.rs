//! # mnk_agent
//!
//! Generalized m,n,k-games (tic-tac-toe, gomoku and friends) played by
//! humans and tabular Q-learning agents.
//!
//! ## Modules
//!
//! - [`game`] — Board, evaluation engine, actions and state snapshots
//! - [`ai`] — Agent trait, Q-learning, human and random agents, state keys
//! - [`training`] — Round driver, self-play trainer, metrics collection
//! - [`checkpoint`] — Knowledge persistence and model reports
//! - [`ui`] — Plain-text board and scoreboard rendering
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod ai;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod game;
pub mod training;
pub mod ui;
