//! Competitor registry and matchup processing
//!
//! The registry owns every competitor, keyed by identity, and applies a
//! [`RatingUpdater`] to matchups strictly in date order. Each matchup's update
//! reads the ratings produced by all earlier matchups, so processing order is
//! part of the result.

use crate::config::RatingConfig;
use crate::error::{RatingError, Result};
use crate::metrics::MetricsCollector;
use crate::rating::{MultiElo, RatingUpdater};
use crate::tracker::competitor::Competitor;
use crate::types::{CompetitorId, HistoryRow, Matchup, MatchupOutcome, RatingChange, StandingRow};
use chrono::NaiveDate;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tracks ratings of a group of competitors over a sequence of matchups
#[derive(Debug)]
pub struct CompetitorRegistry<U = MultiElo> {
    competitors: BTreeMap<CompetitorId, Competitor>,
    initial_rating: f64,
    updater: U,
    metrics: Option<Arc<MetricsCollector>>,
}

impl CompetitorRegistry<MultiElo> {
    /// Create an empty registry using multiplayer Elo
    pub fn from_config(config: &RatingConfig) -> Result<Self> {
        config.validate()?;
        let updater = MultiElo::new(config.elo.clone())?;
        Self::new(config.initial_rating, updater)
    }
}

impl<U: RatingUpdater> CompetitorRegistry<U> {
    /// Create an empty registry
    pub fn new(initial_rating: f64, updater: U) -> Result<Self> {
        Self::with_competitors(initial_rating, updater, Vec::new())
    }

    /// Create a registry seeded with existing competitors
    ///
    /// Fails with `DuplicateIdentity` if two competitors share an identity.
    pub fn with_competitors(
        initial_rating: f64,
        updater: U,
        competitors: Vec<Competitor>,
    ) -> Result<Self> {
        if !initial_rating.is_finite() {
            return Err(RatingError::configuration(
                "Initial rating must be a finite number",
            ));
        }

        let mut map = BTreeMap::new();
        for competitor in competitors {
            match map.entry(competitor.id().to_string()) {
                Entry::Occupied(entry) => {
                    return Err(RatingError::DuplicateIdentity {
                        id: entry.key().clone(),
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(competitor);
                }
            }
        }

        Ok(Self {
            competitors: map,
            initial_rating,
            updater,
            metrics: None,
        })
    }

    /// Report processing metrics to `metrics`
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        metrics.set_competitor_count(self.competitors.len());
        self.metrics = Some(metrics);
        self
    }

    pub fn initial_rating(&self) -> f64 {
        self.initial_rating
    }

    pub fn updater(&self) -> &U {
        &self.updater
    }

    pub fn len(&self) -> usize {
        self.competitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.competitors.is_empty()
    }

    /// All competitors in identity order
    pub fn competitors(&self) -> impl Iterator<Item = &Competitor> {
        self.competitors.values()
    }

    /// Look up a registered competitor
    pub fn get(&self, id: &str) -> Result<&Competitor> {
        self.competitors.get(id).ok_or_else(|| RatingError::NotFound {
            id: id.to_string(),
        })
    }

    /// Register a new competitor at the default initial rating
    ///
    /// Fails with `AlreadyExists` if the identity is taken.
    pub fn create_competitor(&mut self, id: &str) -> Result<&mut Competitor> {
        if self.competitors.contains_key(id) {
            return Err(RatingError::AlreadyExists { id: id.to_string() });
        }
        Ok(self.get_or_create(id))
    }

    /// Fetch a competitor, registering it first if it has never been seen
    pub fn get_or_create(&mut self, id: &str) -> &mut Competitor {
        if !self.competitors.contains_key(id) {
            self.record_created(id);
        }

        let initial_rating = self.initial_rating;
        self.competitors
            .entry(id.to_string())
            .or_insert_with(|| Competitor::create(id, initial_rating, None))
    }

    fn record_created(&self, id: &str) {
        info!("Created competitor with ID {}", id);
        if let Some(metrics) = &self.metrics {
            metrics.record_competitor_created();
        }
    }

    /// Rating of `id` as of `date`, or the registry's initial rating if the
    /// date predates the competitor's history
    pub fn rating_as_of(&self, id: &str, date: NaiveDate) -> Result<f64> {
        Ok(self.get(id)?.rating_as_of(date, self.initial_rating))
    }

    /// Apply a batch of matchups in ascending date order
    ///
    /// Rows without any competitor are dropped and rows with a single
    /// competitor are skipped. The batch is applied to a working copy and only
    /// committed once every row succeeded, so a rejected batch leaves the
    /// registry untouched.
    pub fn process_matchups(&mut self, matchups: &[Matchup]) -> Result<Vec<MatchupOutcome>> {
        let mut rows: Vec<&Matchup> = matchups.iter().filter(|m| !m.is_empty()).collect();
        let dropped = matchups.len() - rows.len();
        if dropped > 0 {
            debug!("Dropped {} matchups without competitors", dropped);
        }
        rows.sort_by_key(|m| m.date);

        let prepared: Vec<(NaiveDate, Vec<(CompetitorId, u32)>)> =
            rows.iter().map(|m| (m.date, m.participants())).collect();
        self.validate_batch(&prepared)?;

        let mut working = self.competitors.clone();
        let mut applied = Vec::with_capacity(prepared.len());
        let mut single = 0;
        for (date, participants) in prepared {
            if participants.len() < 2 {
                warn!(
                    "Skipping matchup on {} with a single competitor ({})",
                    date, participants[0].0
                );
                single += 1;
                continue;
            }

            let timer = self.metrics.as_ref().map(|metrics| metrics.start_timer());
            let outcome = self.apply_matchup(&mut working, date, &participants)?;
            applied.push((outcome, timer.map(|timer| timer.stop())));
        }

        let created: Vec<CompetitorId> = working
            .keys()
            .filter(|id| !self.competitors.contains_key(*id))
            .cloned()
            .collect();
        self.competitors = working;
        for id in &created {
            self.record_created(id);
        }

        if let Some(metrics) = &self.metrics {
            for _ in 0..dropped {
                metrics.record_skipped_matchup("empty");
            }
            for _ in 0..single {
                metrics.record_skipped_matchup("single_participant");
            }
            for (outcome, duration) in &applied {
                if let Some(duration) = duration {
                    metrics.record_matchup(&outcome.changes, *duration);
                }
            }
            metrics.set_competitor_count(self.competitors.len());
        }

        let outcomes: Vec<MatchupOutcome> = applied.into_iter().map(|(outcome, _)| outcome).collect();
        for outcome in &outcomes {
            info!("{}", outcome);
        }
        info!(
            "Processed {} of {} matchups ({} competitors tracked)",
            outcomes.len(),
            matchups.len(),
            self.competitors.len()
        );

        Ok(outcomes)
    }

    fn validate_batch(&self, prepared: &[(NaiveDate, Vec<(CompetitorId, u32)>)]) -> Result<()> {
        let mut first_seen: HashMap<&str, NaiveDate> = HashMap::new();

        for (date, participants) in prepared {
            let mut seen = HashSet::new();
            for (id, _) in participants {
                if !seen.insert(id.as_str()) {
                    return Err(RatingError::invalid_input(format!(
                        "Competitor {} appears more than once in the matchup on {}",
                        id, date
                    )));
                }
                first_seen.entry(id.as_str()).or_insert(*date);
            }
        }

        for (id, date) in first_seen {
            let latest = self.competitors.get(id).and_then(Competitor::latest_date);
            if let Some(latest) = latest {
                if date < latest {
                    return Err(RatingError::invalid_input(format!(
                        "Matchup on {} precedes recorded history of competitor {} ({})",
                        date, id, latest
                    )));
                }
            }
        }

        Ok(())
    }

    fn apply_matchup(
        &self,
        working: &mut BTreeMap<CompetitorId, Competitor>,
        date: NaiveDate,
        participants: &[(CompetitorId, u32)],
    ) -> Result<MatchupOutcome> {
        let ratings: Vec<f64> = participants
            .iter()
            .map(|(id, _)| working.get(id).map_or(self.initial_rating, Competitor::rating))
            .collect();
        let places: Vec<u32> = participants.iter().map(|(_, place)| *place).collect();

        let new_ratings = self.updater.update_with_places(&ratings, &places)?;
        if new_ratings.len() != ratings.len() {
            return Err(RatingError::invalid_input(format!(
                "Rating updater returned {} ratings for {} competitors",
                new_ratings.len(),
                ratings.len()
            )));
        }
        if let Some(bad) = new_ratings.iter().find(|rating| !rating.is_finite()) {
            return Err(RatingError::invalid_input(format!(
                "Rating updater returned a non-finite rating ({}) on {}",
                bad, date
            )));
        }

        let mut changes = Vec::with_capacity(participants.len());
        for (((id, place), old_rating), new_rating) in
            participants.iter().zip(ratings).zip(new_ratings)
        {
            working
                .entry(id.clone())
                .or_insert_with(|| Competitor::create(id.as_str(), self.initial_rating, None))
                .record_result(new_rating, Some(date))?;
            changes.push(RatingChange {
                competitor_id: id.clone(),
                old_rating,
                new_rating,
                place: *place,
            });
        }

        Ok(MatchupOutcome { date, changes })
    }

    /// Current ratings of every competitor, best first
    ///
    /// Equal ratings keep identity order. Ranks are dense, 1..=N.
    pub fn current_standings(&self) -> Vec<StandingRow> {
        let mut competitors: Vec<&Competitor> = self.competitors.values().collect();
        competitors.sort_by(|a, b| b.rating().total_cmp(&a.rating()));

        competitors
            .into_iter()
            .enumerate()
            .map(|(index, competitor)| StandingRow {
                rank: index + 1,
                identity: competitor.id().to_string(),
                games_played: competitor.games_played(),
                rating: competitor.rating(),
            })
            .collect()
    }

    /// Every dated history entry of every competitor
    ///
    /// Undated entries are left out; a warning is logged for each competitor
    /// with a result recorded without a date.
    pub fn full_history(&self) -> Vec<HistoryRow> {
        let mut rows = Vec::new();
        for competitor in self.competitors.values() {
            if competitor.has_undated_results() {
                warn!(
                    "Possible missing dates in history for competitor {}",
                    competitor.id()
                );
            }

            rows.extend(competitor.history().iter().filter_map(|entry| {
                entry.date.map(|date| HistoryRow {
                    identity: competitor.id().to_string(),
                    date,
                    rating: entry.rating,
                })
            }));
        }
        rows
    }
}

impl<U> PartialEq for CompetitorRegistry<U> {
    fn eq(&self, other: &Self) -> bool {
        self.initial_rating == other.initial_rating && self.competitors == other.competitors
    }
}

impl<U> std::fmt::Display for CompetitorRegistry<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CompetitorRegistry({} total competitors)", self.competitors.len())
    }
}
