//! Common types used throughout the rating tracker

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unique identifier for a competitor (player, team, engine, ...)
pub type CompetitorId = String;

/// One finishing position in a matchup
///
/// A slot holds either a single competitor or a group that tied for that place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlacementSlot {
    Single(CompetitorId),
    Tied(Vec<CompetitorId>),
}

impl PlacementSlot {
    /// Competitors occupying this slot
    pub fn competitors(&self) -> &[CompetitorId] {
        match self {
            PlacementSlot::Single(id) => std::slice::from_ref(id),
            PlacementSlot::Tied(ids) => ids,
        }
    }
}

impl From<&str> for PlacementSlot {
    fn from(id: &str) -> Self {
        PlacementSlot::Single(id.to_string())
    }
}

impl From<CompetitorId> for PlacementSlot {
    fn from(id: CompetitorId) -> Self {
        PlacementSlot::Single(id)
    }
}

/// A single contest result: a date plus placement slots from first to last
///
/// Empty (`None`) slots are valid and are skipped, e.g. when fewer competitors
/// took part than the widest matchup in a data set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub date: NaiveDate,
    pub placements: Vec<Option<PlacementSlot>>,
}

impl Matchup {
    pub fn new(date: NaiveDate, placements: Vec<Option<PlacementSlot>>) -> Self {
        Self { date, placements }
    }

    /// Matchup without ties, competitors listed from first to last
    pub fn ranked<I, S>(date: NaiveDate, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompetitorId>,
    {
        let placements = order
            .into_iter()
            .map(|id| Some(PlacementSlot::Single(id.into())))
            .collect();
        Self { date, placements }
    }

    /// True when no slot holds a competitor
    pub fn is_empty(&self) -> bool {
        self.placements
            .iter()
            .flatten()
            .all(|slot| slot.competitors().is_empty())
    }

    /// Participants in finishing order paired with their 1-based place.
    /// Competitors sharing a slot share a place.
    pub fn participants(&self) -> Vec<(CompetitorId, u32)> {
        self.placements
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|slot| (index as u32 + 1, slot)))
            .flat_map(|(place, slot)| {
                slot.competitors()
                    .iter()
                    .map(move |id| (id.clone(), place))
            })
            .collect()
    }
}

/// Rating change information for a competitor in one matchup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub competitor_id: CompetitorId,
    pub old_rating: f64,
    pub new_rating: f64,
    pub place: u32,
}

impl RatingChange {
    pub fn delta(&self) -> f64 {
        self.new_rating - self.old_rating
    }
}

/// All rating changes produced by one processed matchup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupOutcome {
    pub date: NaiveDate,
    pub changes: Vec<RatingChange>,
}

impl std::fmt::Display for MatchupOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ", self.date)?;
        for change in &self.changes {
            write!(
                f,
                "{}: {:.2} --> {:.2}; ",
                change.competitor_id, change.old_rating, change.new_rating
            )?;
        }
        Ok(())
    }
}

/// Row of the current standings table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub rank: usize,
    pub identity: CompetitorId,
    pub games_played: usize,
    pub rating: f64,
}

/// Row of the rating history table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub identity: CompetitorId,
    pub date: NaiveDate,
    pub rating: f64,
}
