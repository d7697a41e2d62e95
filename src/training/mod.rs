//! Round driver, training sessions and scoreboard metrics.

pub mod episode;
pub mod metrics;
pub mod trainer;
