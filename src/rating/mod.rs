//! Rating system: generalized multiplayer Elo
//!
//! This module provides the rating update trait, the multiplayer Elo
//! implementation, placement score functions and finishing-place simulation.

pub mod calculator;
pub mod multi_elo;
pub mod score;
pub mod simulation;

// Re-export commonly used types
pub use calculator::RatingUpdater;
pub use multi_elo::{KScaling, MultiElo, MultiEloConfig};
pub use score::ScoreFunction;
pub use simulation::{scores_to_result_proportions, simulate_win_probabilities};
