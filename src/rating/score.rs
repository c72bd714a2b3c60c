//! Placement score functions
//!
//! A score function maps finishing positions to the "actual" score each
//! participant earned. Every score vector sums to 1, ends at 0 for last place
//! and strictly decreases from first to last.

use crate::error::{RatingError, Result};
use serde::{Deserialize, Serialize};

/// Shape of the placement score curve
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreFunction {
    /// Equal score gap between consecutive places
    #[default]
    Linear,
    /// Scores grow by roughly `base` per place gained. A base of 1 is linear.
    Exponential { base: f64 },
}

impl ScoreFunction {
    pub fn exponential(base: f64) -> Self {
        ScoreFunction::Exponential { base }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ScoreFunction::Linear => Ok(()),
            ScoreFunction::Exponential { base } => {
                if !base.is_finite() || *base < 1.0 {
                    return Err(RatingError::configuration(format!(
                        "Score function base must be a finite value >= 1 (got {})",
                        base
                    )));
                }
                Ok(())
            }
        }
    }

    /// Scores for first through last place in an `n`-way matchup
    pub fn scores(&self, n: usize) -> Vec<f64> {
        if n < 2 {
            return vec![1.0; n];
        }

        match *self {
            ScoreFunction::Linear => linear_scores(n),
            ScoreFunction::Exponential { base } if base == 1.0 => linear_scores(n),
            ScoreFunction::Exponential { base } => {
                // base^(n - p) - 1 scaled down by base^(n - 1) so large fields stay finite
                let floor = base.powi(1 - n as i32);
                let raw: Vec<f64> = (1..=n)
                    .map(|place| base.powi(1 - place as i32) - floor)
                    .collect();
                let total: f64 = raw.iter().sum();
                raw.into_iter().map(|score| score / total).collect()
            }
        }
    }
}

fn linear_scores(n: usize) -> Vec<f64> {
    let pairings = (n * (n - 1)) as f64 / 2.0;
    (1..=n)
        .map(|place| (n - place) as f64 / pairings)
        .collect()
}
