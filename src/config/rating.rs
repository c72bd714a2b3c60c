//! Rating system configuration

use crate::error::{RatingError, Result};
use crate::rating::MultiEloConfig;
use serde::{Deserialize, Serialize};

/// Rating configuration: starting rating plus algorithm parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Rating assigned to a competitor on first appearance
    pub initial_rating: f64,
    pub elo: MultiEloConfig,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            initial_rating: 1000.0,
            elo: MultiEloConfig::default(),
        }
    }
}

impl RatingConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.initial_rating.is_finite() {
            return Err(RatingError::configuration(
                "Initial rating must be a finite number",
            ));
        }
        self.elo.validate()
    }
}
