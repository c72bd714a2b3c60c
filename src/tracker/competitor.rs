//! A single competitor and its rating history

use crate::error::{RatingError, Result};
use crate::types::CompetitorId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One point in a competitor's rating history
///
/// `date` is `None` for the synthetic creation entry, or for results recorded
/// without a date. Undated entries never answer as-of-date lookups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: Option<NaiveDate>,
    pub rating: f64,
}

/// Current and historical ratings of one competitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    id: CompetitorId,
    rating: f64,
    history: Vec<HistoryEntry>,
}

impl Competitor {
    /// Create a competitor whose history starts with the initial rating
    pub fn create(
        id: impl Into<CompetitorId>,
        initial_rating: f64,
        creation_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: id.into(),
            rating: initial_rating,
            history: vec![HistoryEntry {
                date: creation_date,
                rating: initial_rating,
            }],
        }
    }

    /// Rebuild a competitor from a previously recorded history
    ///
    /// The first entry is treated as the creation entry and the current rating
    /// is taken from the last entry.
    pub fn with_history(id: impl Into<CompetitorId>, history: Vec<HistoryEntry>) -> Result<Self> {
        let id = id.into();
        let last = history.last().copied().ok_or_else(|| {
            RatingError::invalid_input(format!("History for competitor {} is empty", id))
        })?;

        let mut latest: Option<NaiveDate> = None;
        for entry in &history {
            if !entry.rating.is_finite() {
                return Err(RatingError::invalid_input(format!(
                    "History for competitor {} contains a non-finite rating",
                    id
                )));
            }
            if let Some(date) = entry.date {
                if latest.is_some_and(|latest| date < latest) {
                    return Err(RatingError::invalid_input(format!(
                        "History for competitor {} is not in date order",
                        id
                    )));
                }
                latest = Some(date);
            }
        }

        Ok(Self {
            id,
            rating: last.rating,
            history,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current rating
    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Date of the most recent dated history entry
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.history.iter().rev().find_map(|entry| entry.date)
    }

    /// Record the rating produced by a new result
    ///
    /// Fails if `date` is earlier than an already recorded date; history is
    /// never reordered.
    pub fn record_result(&mut self, new_rating: f64, date: Option<NaiveDate>) -> Result<()> {
        if !new_rating.is_finite() {
            return Err(RatingError::invalid_input(format!(
                "Rating for competitor {} must be finite (got {})",
                self.id, new_rating
            )));
        }

        if let (Some(date), Some(latest)) = (date, self.latest_date()) {
            if date < latest {
                return Err(RatingError::invalid_input(format!(
                    "Result for competitor {} dated {} precedes recorded history ({})",
                    self.id, date, latest
                )));
            }
        }

        self.history.push(HistoryEntry {
            date,
            rating: new_rating,
        });
        self.rating = new_rating;
        Ok(())
    }

    /// Rating in effect on `date`
    ///
    /// Uses the latest dated entry on or before `date`; when several entries
    /// share that date the last one recorded wins. Returns `default_rating`
    /// when `date` predates the whole history.
    pub fn rating_as_of(&self, date: NaiveDate, default_rating: f64) -> f64 {
        self.history
            .iter()
            .filter(|entry| entry.date.is_some_and(|d| d <= date))
            .max_by_key(|entry| entry.date)
            .map(|entry| entry.rating)
            .unwrap_or(default_rating)
    }

    /// Number of results recorded; the creation entry is not a game
    pub fn games_played(&self) -> usize {
        self.history.len().saturating_sub(1)
    }

    /// True if any result after the creation entry was recorded without a date
    pub fn has_undated_results(&self) -> bool {
        self.history.iter().skip(1).any(|entry| entry.date.is_none())
    }
}

impl std::fmt::Display for Competitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {:.2} ({} games)",
            self.id,
            self.rating,
            self.games_played()
        )
    }
}
