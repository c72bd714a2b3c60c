//! MultiElo Tracker - Elo ratings for matchups with any number of competitors
//!
//! This crate generalizes Elo to multiplayer games, with support for ties,
//! configurable placement scores, and a registry that tracks every
//! competitor's rating history across dated matchups.

pub mod config;
pub mod error;
pub mod metrics;
pub mod rating;
pub mod tracker;
pub mod types;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use rating::{MultiElo, MultiEloConfig, RatingUpdater, ScoreFunction};
pub use tracker::{Competitor, CompetitorRegistry, HistoryEntry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
