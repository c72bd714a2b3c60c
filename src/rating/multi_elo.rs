//! Generalized Elo for multiplayer matchups
//!
//! Every participant is compared pairwise against every other participant with
//! the logistic Elo curve. The summed win probabilities, normalized by the
//! number of head-to-head pairings, form the expected score; the placement
//! score function supplies the actual score. For two players this reduces to
//! classical Elo.

use crate::error::{RatingError, Result};
use crate::rating::calculator::{validate_update_input, RatingUpdater};
use crate::rating::score::ScoreFunction;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How the K-factor grows with the number of participants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KScaling {
    /// `k_factor * (n - 1)`: keeps swings in large matchups comparable to 1v1 games
    #[default]
    PerOpponent,
    /// `k_factor` regardless of matchup size
    Constant,
}

/// Configuration for the multiplayer Elo algorithm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiEloConfig {
    /// Scales the magnitude of every rating change
    pub k_factor: f64,
    /// Rating gap that multiplies the odds by `logistic_base`
    pub rating_scale_divisor: f64,
    /// Base of the exponential in the pairwise win probability
    pub logistic_base: f64,
    /// Maps finishing place to actual score
    pub score_function: ScoreFunction,
    pub k_scaling: KScaling,
}

impl Default for MultiEloConfig {
    fn default() -> Self {
        Self {
            k_factor: 32.0,
            rating_scale_divisor: 400.0,
            logistic_base: 10.0,
            score_function: ScoreFunction::Linear,
            k_scaling: KScaling::PerOpponent,
        }
    }
}

impl MultiEloConfig {
    /// Create conservative configuration (slower rating changes)
    pub fn conservative() -> Self {
        Self {
            k_factor: 16.0,
            ..Self::default()
        }
    }

    /// Create aggressive configuration (faster rating changes, rewards winning)
    pub fn aggressive() -> Self {
        Self {
            k_factor: 48.0,
            score_function: ScoreFunction::exponential(1.5),
            ..Self::default()
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !self.k_factor.is_finite() || self.k_factor <= 0.0 {
            return Err(RatingError::configuration("K-factor must be positive"));
        }

        if !self.rating_scale_divisor.is_finite() || self.rating_scale_divisor <= 0.0 {
            return Err(RatingError::configuration(
                "Rating scale divisor must be positive",
            ));
        }

        if !self.logistic_base.is_finite() || self.logistic_base <= 1.0 {
            return Err(RatingError::configuration(
                "Logistic base must be greater than 1",
            ));
        }

        self.score_function.validate()
    }
}

/// Multiplayer Elo rating updater
#[derive(Debug, Clone, PartialEq)]
pub struct MultiElo {
    config: MultiEloConfig,
}

impl MultiElo {
    /// Create a new multiplayer Elo updater
    pub fn new(config: MultiEloConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self { config })
    }

    pub fn config(&self) -> &MultiEloConfig {
        &self.config
    }

    /// Probability that a competitor rated `rating` beats one rated `opponent`
    pub fn win_probability(&self, rating: f64, opponent: f64) -> f64 {
        let exponent = (opponent - rating) / self.config.rating_scale_divisor;
        1.0 / (1.0 + self.config.logistic_base.powf(exponent))
    }

    /// Expected score of every participant; the scores sum to 1
    pub fn expected_scores(&self, ratings: &[f64]) -> Vec<f64> {
        let n = ratings.len();
        if n < 2 {
            return vec![1.0; n];
        }

        let pairings = (n * (n - 1)) as f64 / 2.0;
        ratings
            .iter()
            .enumerate()
            .map(|(i, &rating)| {
                let total: f64 = ratings
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, &opponent)| self.win_probability(rating, opponent))
                    .sum();
                total / pairings
            })
            .collect()
    }

    /// Actual scores for `places`, averaging the scores of tied participants
    pub fn actual_scores(&self, places: &[u32]) -> Vec<f64> {
        let mut scores = self.config.score_function.scores(places.len());

        let mut start = 0;
        while start < places.len() {
            let end = start
                + places[start..]
                    .iter()
                    .take_while(|&&place| place == places[start])
                    .count();

            if end - start > 1 {
                let shared = scores[start..end].iter().sum::<f64>() / (end - start) as f64;
                scores[start..end].iter_mut().for_each(|score| *score = shared);
            }
            start = end;
        }

        scores
    }

    /// K-factor applied to an `n`-way matchup
    pub fn effective_k(&self, n: usize) -> f64 {
        match self.config.k_scaling {
            KScaling::PerOpponent => self.config.k_factor * n.saturating_sub(1) as f64,
            KScaling::Constant => self.config.k_factor,
        }
    }
}

impl RatingUpdater for MultiElo {
    fn update_with_places(&self, ratings: &[f64], places: &[u32]) -> Result<Vec<f64>> {
        validate_update_input(ratings, places)?;

        let actual = self.actual_scores(places);
        let expected = self.expected_scores(ratings);
        let k = self.effective_k(ratings.len());

        let new_ratings: Vec<f64> = ratings
            .iter()
            .zip(actual.iter().zip(expected.iter()))
            .map(|(rating, (actual, expected))| rating + k * (actual - expected))
            .collect();

        debug!(
            "Updated {} ratings (k = {}): {:?} -> {:?}",
            ratings.len(),
            k,
            ratings,
            new_ratings
        );

        if new_ratings.iter().any(|rating| !rating.is_finite()) {
            return Err(RatingError::invalid_input(format!(
                "Rating update produced non-finite ratings (k = {})",
                k
            )));
        }

        Ok(new_ratings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-6, "{:?} != {:?}", actual, expected);
        }
    }

    fn default_elo() -> MultiElo {
        MultiElo::new(MultiEloConfig::default()).unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = MultiEloConfig::default();
        assert_eq!(config.k_factor, 32.0);
        assert_eq!(config.rating_scale_divisor, 400.0);
        assert_eq!(config.logistic_base, 10.0);
        assert_eq!(config.score_function, ScoreFunction::Linear);
        assert_eq!(KScaling::default(), KScaling::PerOpponent);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = MultiEloConfig::default();
        config.k_factor = 0.0;
        assert!(config.validate().is_err());

        config = MultiEloConfig::default();
        config.rating_scale_divisor = -400.0;
        assert!(config.validate().is_err());

        config = MultiEloConfig::default();
        config.logistic_base = 1.0;
        assert!(config.validate().is_err());

        config = MultiEloConfig::default();
        config.score_function = ScoreFunction::exponential(0.9);
        assert!(matches!(
            MultiElo::new(config),
            Err(RatingError::Configuration { .. })
        ));
    }

    #[test]
    fn test_config_presets() {
        let conservative = MultiEloConfig::conservative();
        let aggressive = MultiEloConfig::aggressive();
        let default = MultiEloConfig::default();

        assert!(conservative.k_factor < default.k_factor);
        assert!(aggressive.k_factor > default.k_factor);

        assert!(conservative.validate().is_ok());
        assert!(aggressive.validate().is_ok());
    }

    #[test]
    fn test_known_two_player_changes() {
        let elo = default_elo();

        assert_close(&elo.expected_scores(&[1000.0, 1000.0]), &[0.5, 0.5]);
        assert_close(&elo.update(&[1000.0, 1000.0]).unwrap(), &[1016.0, 984.0]);

        assert_close(
            &elo.expected_scores(&[1200.0, 1000.0]),
            &[0.75974693, 0.24025307],
        );
        assert_close(
            &elo.update(&[1200.0, 1000.0]).unwrap(),
            &[1207.68809835, 992.31190165],
        );
        assert_close(
            &elo.update(&[1000.0, 1200.0]).unwrap(),
            &[1024.31190165, 1175.68809835],
        );

        assert_close(
            &elo.expected_scores(&[1200.0, 800.0]),
            &[0.90909091, 0.09090909],
        );
        assert_close(
            &elo.update(&[1200.0, 800.0]).unwrap(),
            &[1202.90909091, 797.09090909],
        );
    }

    #[test]
    fn test_known_four_player_changes() {
        let elo = default_elo();
        assert_close(
            &elo.update(&[1200.0, 1000.0, 1100.0, 900.0]).unwrap(),
            &[
                1212.0186820921676,
                1012.1559508263673,
                1087.8440491736326,
                887.9813179078324,
            ],
        );

        let exponential = MultiElo::new(MultiEloConfig {
            score_function: ScoreFunction::exponential(1.25),
            ..MultiEloConfig::default()
        })
        .unwrap();
        assert_close(
            &exponential.update(&[1200.0, 1000.0, 1100.0, 900.0]).unwrap(),
            &[
                1215.8416909417251,
                1010.7400216228275,
                1085.436969527615,
                887.9813179078324,
            ],
        );
    }

    #[test]
    fn test_equal_ratings_monotonic_deltas() {
        let elo = default_elo();
        let new_ratings = elo.update(&[1000.0; 4]).unwrap();
        assert_close(&new_ratings, &[1024.0, 1008.0, 992.0, 976.0]);
        assert!(new_ratings.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_constant_k_scaling() {
        let elo = MultiElo::new(MultiEloConfig {
            k_scaling: KScaling::Constant,
            ..MultiEloConfig::default()
        })
        .unwrap();

        assert_eq!(elo.effective_k(8), 32.0);
        assert_close(
            &elo.update(&[1000.0; 4]).unwrap(),
            &[1008.0, 1002.0 + 2.0 / 3.0, 997.0 + 1.0 / 3.0, 992.0],
        );
    }

    #[test]
    fn test_ties_share_scores() {
        let elo = default_elo();

        assert_close(&elo.actual_scores(&[1, 1, 3]), &[0.5, 0.5, 0.0]);
        assert_close(
            &elo.update_with_places(&[1500.0, 1500.0, 1500.0], &[1, 1, 2])
                .unwrap(),
            &[1510.6666666666667, 1510.6666666666667, 1478.6666666666667],
        );

        // Everyone tied against equal opposition: nothing moves
        assert_close(
            &elo.update_with_places(&[1000.0, 1000.0, 1000.0], &[1, 1, 1])
                .unwrap(),
            &[1000.0, 1000.0, 1000.0],
        );
    }

    #[test]
    fn test_zero_sum() {
        let elo = default_elo();
        for ratings in [
            vec![1200.0, 1000.0],
            vec![850.0, 1300.0, 990.0],
            vec![1000.0, 1100.0, 700.0, 1450.0, 1020.0, 600.0, 1234.5, 980.0],
        ] {
            let expected_total: f64 = elo.expected_scores(&ratings).iter().sum();
            assert!((expected_total - 1.0).abs() < 1e-9);

            let before: f64 = ratings.iter().sum();
            let after: f64 = elo.update(&ratings).unwrap().iter().sum();
            assert!((before - after).abs() < 1e-6);
        }
    }

    #[test]
    fn test_order_sensitivity() {
        let elo = default_elo();
        let forward = elo.update(&[1100.0, 1000.0]).unwrap();
        let swapped = elo.update(&[1000.0, 1100.0]).unwrap();

        // Winner gains in both orders; the upset winner gains more
        assert!(forward[0] > 1100.0 && forward[1] < 1000.0);
        assert!(swapped[0] > 1000.0 && swapped[1] < 1100.0);
        assert!(swapped[0] - 1000.0 > forward[0] - 1100.0);
    }

    #[test]
    fn test_custom_logistic_base() {
        let elo = MultiElo::new(MultiEloConfig {
            logistic_base: std::f64::consts::E,
            rating_scale_divisor: 1.0,
            ..MultiEloConfig::default()
        })
        .unwrap();

        let p = elo.win_probability(1.0, 0.0);
        assert!((p - 1.0 / (1.0 + (-1.0f64).exp())).abs() < 1e-12);
        assert!((elo.win_probability(5.0, 5.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_inputs() {
        let elo = default_elo();
        assert!(matches!(
            elo.update(&[]),
            Err(RatingError::InvalidInput { .. })
        ));
        assert!(matches!(
            elo.update(&[1000.0]),
            Err(RatingError::InvalidInput { .. })
        ));
        assert!(matches!(
            elo.update(&[1000.0, f64::NAN]),
            Err(RatingError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_matches_classical_elo() {
        use skillratings::elo::{elo as classical_elo, EloConfig, EloRating};
        use skillratings::Outcomes;

        let multi = default_elo();
        for (winner, loser) in [(1000.0, 1000.0), (1200.0, 1000.0), (950.0, 1320.0)] {
            let (a, b) = classical_elo(
                &EloRating { rating: winner },
                &EloRating { rating: loser },
                &Outcomes::WIN,
                &EloConfig { k: 32.0 },
            );
            let ours = multi.update(&[winner, loser]).unwrap();
            assert_close(&ours, &[a.rating, b.rating]);
        }
    }

    #[test]
    fn test_large_exponential_field_stays_finite() {
        let elo = MultiElo::new(MultiEloConfig {
            score_function: ScoreFunction::exponential(3.0),
            ..MultiEloConfig::default()
        })
        .unwrap();

        let ratings = vec![1000.0; 700];
        let new_ratings = elo.update(&ratings).unwrap();

        assert_eq!(new_ratings.len(), 700);
        assert!(new_ratings.iter().all(|rating| rating.is_finite()));
        assert!(new_ratings[0] > 1000.0);
        assert!(new_ratings[699] < 1000.0);
        let total: f64 = new_ratings.iter().sum();
        assert!((total - 700_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_result_is_rejected() {
        let elo = MultiElo::new(MultiEloConfig {
            k_factor: f64::MAX,
            ..MultiEloConfig::default()
        })
        .unwrap();

        assert!(matches!(
            elo.update(&[1000.0, 1000.0, 1000.0]),
            Err(RatingError::InvalidInput { .. })
        ));
    }
}
