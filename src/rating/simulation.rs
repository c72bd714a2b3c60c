//! Monte Carlo estimates of finishing-place probabilities
//!
//! Each simulated contest draws a performance for every participant from a
//! Gumbel distribution centred on their rating. With scale
//! `rating_scale_divisor / ln(logistic_base)` the head-to-head win rate of any
//! pair matches the logistic Elo curve used by [`MultiElo`].

use crate::error::{RatingError, Result};
use crate::rating::multi_elo::MultiElo;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;
use tracing::debug;

/// Estimate how likely each participant is to finish in each place
///
/// Returns an `n x n` matrix where entry `(i, j)` is the probability that
/// participant `i` finishes in place `j + 1`. Rows and columns each sum to 1.
pub fn simulate_win_probabilities(
    elo: &MultiElo,
    ratings: &[f64],
    n_sim: usize,
    seed: Option<u64>,
) -> Result<Vec<Vec<f64>>> {
    if ratings.is_empty() {
        return Err(RatingError::invalid_input("No ratings provided for simulation"));
    }
    if let Some(bad) = ratings.iter().find(|rating| !rating.is_finite()) {
        return Err(RatingError::invalid_input(format!(
            "Ratings must be finite numbers (got {})",
            bad
        )));
    }
    if n_sim == 0 {
        return Err(RatingError::invalid_input(
            "Number of simulations must be positive",
        ));
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let config = elo.config();
    let scale = config.rating_scale_divisor / config.logistic_base.ln();
    let n = ratings.len();

    let mut counts = vec![vec![0usize; n]; n];
    let mut performances = vec![0.0; n];
    for _ in 0..n_sim {
        for (performance, rating) in performances.iter_mut().zip(ratings) {
            let u: f64 = rng.gen_range(f64::MIN_POSITIVE..1.0);
            *performance = rating - scale * (-u.ln()).ln();
        }
        for (place, player) in finishing_order(&performances).into_iter().enumerate() {
            counts[player][place] += 1;
        }
    }

    debug!("Simulated {} contests for {} participants", n_sim, n);

    Ok(to_proportions(counts, n_sim))
}

/// Convert a players x trials score matrix into finishing-place proportions
///
/// Higher scores finish ahead; equal scores go to the lower index.
pub fn scores_to_result_proportions(scores: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    let n = scores.len();
    let trials = scores.first().map(Vec::len).unwrap_or(0);
    if n == 0 || trials == 0 {
        return Err(RatingError::invalid_input("Score matrix is empty"));
    }
    if scores.iter().any(|row| row.len() != trials) {
        return Err(RatingError::invalid_input(
            "Every player needs the same number of scores",
        ));
    }

    let mut counts = vec![vec![0usize; n]; n];
    let mut column = vec![0.0; n];
    for trial in 0..trials {
        for (value, row) in column.iter_mut().zip(scores) {
            *value = row[trial];
        }
        for (place, player) in finishing_order(&column).into_iter().enumerate() {
            counts[player][place] += 1;
        }
    }

    Ok(to_proportions(counts, trials))
}

fn finishing_order(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(Ordering::Equal));
    order
}

fn to_proportions(counts: Vec<Vec<usize>>, total: usize) -> Vec<Vec<f64>> {
    counts
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|count| count as f64 / total as f64)
                .collect()
        })
        .collect()
}
