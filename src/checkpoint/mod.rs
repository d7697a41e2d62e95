//! Model persistence: the JSON knowledge store and model status reports.

mod manager;
mod metadata;

pub use manager::KnowledgeStore;
pub use metadata::ModelReport;
