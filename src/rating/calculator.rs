//! Rating updater trait
//!
//! The registry is written against this trait rather than a concrete
//! algorithm, so alternative update rules (or test doubles) can be swapped in.

use crate::error::{RatingError, Result};

/// Turns the ratings of one matchup's participants into their new ratings
#[cfg_attr(test, mockall::automock)]
pub trait RatingUpdater {
    /// Calculate new ratings for participants listed in finishing order
    ///
    /// # Arguments
    /// * `ratings` - Current ratings, index 0 finished first
    /// * `places` - 1-based finishing place of each participant; equal places are ties
    ///
    /// # Returns
    /// New ratings in the same order as `ratings`
    fn update_with_places(&self, ratings: &[f64], places: &[u32]) -> Result<Vec<f64>>;

    /// Calculate new ratings for a matchup without ties
    fn update(&self, ratings: &[f64]) -> Result<Vec<f64>> {
        let places: Vec<u32> = (1..=ratings.len() as u32).collect();
        self.update_with_places(ratings, &places)
    }
}

/// Check the shape of an update request before any arithmetic happens
pub fn validate_update_input(ratings: &[f64], places: &[u32]) -> Result<()> {
    if ratings.len() < 2 {
        return Err(RatingError::invalid_input(format!(
            "At least 2 ratings are required (got {})",
            ratings.len()
        )));
    }

    if let Some(bad) = ratings.iter().find(|rating| !rating.is_finite()) {
        return Err(RatingError::invalid_input(format!(
            "Ratings must be finite numbers (got {})",
            bad
        )));
    }

    if places.len() != ratings.len() {
        return Err(RatingError::invalid_input(format!(
            "Expected {} places, got {}",
            ratings.len(),
            places.len()
        )));
    }

    if places.iter().any(|&place| place == 0) {
        return Err(RatingError::invalid_input("Places are 1-based"));
    }

    if places.windows(2).any(|pair| pair[1] < pair[0]) {
        return Err(RatingError::invalid_input(
            "Places must be listed in finishing order",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_ties() {
        assert!(validate_update_input(&[1000.0, 1000.0, 1000.0], &[1, 1, 3]).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        assert!(matches!(
            validate_update_input(&[1000.0], &[1]),
            Err(RatingError::InvalidInput { .. })
        ));
        assert!(validate_update_input(&[], &[]).is_err());
        assert!(validate_update_input(&[1000.0, f64::NAN], &[1, 2]).is_err());
        assert!(validate_update_input(&[1000.0, f64::INFINITY], &[1, 2]).is_err());
        assert!(validate_update_input(&[1000.0, 900.0], &[1]).is_err());
        assert!(validate_update_input(&[1000.0, 900.0], &[0, 1]).is_err());
        assert!(validate_update_input(&[1000.0, 900.0], &[2, 1]).is_err());
    }

    /// Echoes the places it was given back as ratings
    struct PlaceEcho;

    impl RatingUpdater for PlaceEcho {
        fn update_with_places(&self, ratings: &[f64], places: &[u32]) -> Result<Vec<f64>> {
            validate_update_input(ratings, places)?;
            Ok(places.iter().map(|&place| place as f64).collect())
        }
    }

    #[test]
    fn test_default_update_passes_sequential_places() {
        let result = PlaceEcho.update(&[1000.0, 1000.0, 1000.0]).unwrap();
        assert_eq!(result, vec![1.0, 2.0, 3.0]);
    }
}
