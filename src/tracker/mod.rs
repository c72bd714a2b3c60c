//! Competitor tracking: per-competitor history and the registry that drives
//! rating updates across dated matchups

pub mod competitor;
pub mod registry;

pub use competitor::{Competitor, HistoryEntry};
pub use registry::CompetitorRegistry;
