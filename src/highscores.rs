//! Local run history
//!
//! Keeps the top 10 runs by distance, coins breaking ties. Persisted through a [`BlobStore`]
//! (LocalStorage on the web).

use serde::{Deserialize, Serialize};

use crate::persistence::{BlobStore, keys};
use crate::sim::RunSummary;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Anything that wants to hear about finished runs (local board, remote upload)
pub trait RunResultSink {
    /// `finished_at` is a host wall-clock timestamp (ms)
    fn submit(&mut self, summary: &RunSummary, finished_at: f64);
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Yards covered
    pub distance: u64,
    pub currency: u32,
    /// Difficulty level reached (0-based)
    #[serde(default)]
    pub difficulty_level: u8,
    /// Simulated run time (ms)
    #[serde(default)]
    pub elapsed_ms: f64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

impl HighScoreEntry {
    pub fn from_summary(summary: &RunSummary, timestamp: f64) -> Self {
        Self {
            distance: summary.distance,
            currency: summary.currency,
            difficulty_level: summary.difficulty_level,
            elapsed_ms: summary.elapsed_ms,
            timestamp,
        }
    }

    /// Ranking order: distance, then coins. Equal runs keep the older entry ahead.
    fn rank_key(&self) -> (u64, u32) {
        (self.distance, self.currency)
    }
}

fn summary_key(summary: &RunSummary) -> (u64, u32) {
    (summary.distance, summary.currency)
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a finished run makes the board (runs that went nowhere never do)
    pub fn qualifies(&self, summary: &RunSummary) -> bool {
        if summary.distance == 0 {
            return false;
        }
        self.entries.len() < MAX_HIGH_SCORES || self.insert_position(summary).is_some()
    }

    /// Get the rank a run would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, summary: &RunSummary) -> Option<usize> {
        if !self.qualifies(summary) {
            return None;
        }
        Some(self.insert_position(summary).unwrap_or(self.entries.len()) + 1)
    }

    /// First entry this run strictly beats
    fn insert_position(&self, summary: &RunSummary) -> Option<usize> {
        let key = summary_key(summary);
        self.entries.iter().position(|e| key > e.rank_key())
    }

    /// Add a finished run (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify
    pub fn add_run(&mut self, summary: &RunSummary, timestamp: f64) -> Option<usize> {
        let rank = self.potential_rank(summary)?;
        self.entries
            .insert(rank - 1, HighScoreEntry::from_summary(summary, timestamp));
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Best run on the board at or above a difficulty level
    pub fn best_at_level(&self, difficulty_level: u8) -> Option<&HighScoreEntry> {
        self.entries
            .iter()
            .find(|e| e.difficulty_level >= difficulty_level)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best distance so far (if any)
    pub fn top_distance(&self) -> Option<u64> {
        self.entries.first().map(|e| e.distance)
    }

    /// Load the board from a store, starting fresh on a missing or bad blob
    pub fn load(store: &dyn BlobStore) -> Self {
        let Some(json) = store.load(keys::HIGH_SCORES) else {
            log::info!("No high scores found, starting fresh");
            return Self::new();
        };
        match serde_json::from_str::<HighScores>(&json) {
            Ok(mut scores) => {
                scores.entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(e) => {
                log::warn!("Discarding unreadable high scores: {e}");
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &mut dyn BlobStore) {
        if let Ok(json) = serde_json::to_string(self) {
            store.save(keys::HIGH_SCORES, &json);
            log::info!("High scores saved ({} entries)", self.entries.len());
        }
    }
}

impl RunResultSink for HighScores {
    fn submit(&mut self, summary: &RunSummary, finished_at: f64) {
        match self.add_run(summary, finished_at) {
            Some(rank) => log::info!("New high score: {} yards (#{rank})", summary.distance),
            None => log::debug!("{} yards did not place", summary.distance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn run(distance: u64, currency: u32) -> RunSummary {
        RunSummary {
            distance,
            currency,
            elapsed_ms: distance as f64 * 50.0,
            difficulty_level: (distance / 100).min(6) as u8,
        }
    }

    #[test]
    fn test_zero_distance_never_places() {
        let mut scores = HighScores::new();
        assert!(!scores.qualifies(&run(0, 50)));
        assert_eq!(scores.add_run(&run(0, 50), 1.0), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_distance_then_coins() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_run(&run(100, 5), 1.0), Some(1));
        assert_eq!(scores.add_run(&run(300, 0), 2.0), Some(1));
        // Same distance, more coins: ranks above
        assert_eq!(scores.add_run(&run(100, 9), 3.0), Some(2));
        // Identical run: the older entry stays ahead
        assert_eq!(scores.add_run(&run(100, 9), 4.0), Some(3));
        assert_eq!(scores.entries[1].timestamp, 3.0);
        assert_eq!(scores.entries[2].timestamp, 4.0);
        assert_eq!(scores.top_distance(), Some(300));
        assert_eq!(scores.potential_rank(&run(200, 0)), Some(2));
    }

    #[test]
    fn test_entry_keeps_run_details() {
        let mut scores = HighScores::new();
        let summary = run(420, 12);
        scores.add_run(&summary, 9.0);
        let entry = &scores.entries[0];
        assert_eq!(entry.difficulty_level, 4);
        assert_eq!(entry.elapsed_ms, summary.elapsed_ms);
        assert_eq!(scores.best_at_level(4).map(|e| e.distance), Some(420));
        assert!(scores.best_at_level(5).is_none());
    }

    #[test]
    fn test_board_is_capped() {
        let mut scores = HighScores::new();
        for d in 1..=MAX_HIGH_SCORES as u64 {
            scores.add_run(&run(d * 10, 0), d as f64);
        }
        assert!(!scores.qualifies(&run(10, 0)));
        assert!(scores.qualifies(&run(10, 1)));
        assert_eq!(scores.potential_rank(&run(5, 3)), None);
        assert_eq!(scores.add_run(&run(55, 0), 99.0), Some(6));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().unwrap().distance, 20);
    }

    #[test]
    fn test_older_blobs_still_load() {
        let mut store = MemoryStore::default();
        store.save(
            keys::HIGH_SCORES,
            r#"{"entries":[{"distance":80,"currency":2,"timestamp":5.0}]}"#,
        );
        let scores = HighScores::load(&store);
        assert_eq!(scores.entries[0].difficulty_level, 0);
        assert_eq!(scores.top_distance(), Some(80));
    }

    #[test]
    fn test_sink_and_store() {
        let mut store = MemoryStore::default();
        let mut scores = HighScores::load(&store);
        scores.submit(&run(42, 3), 7.0);
        scores.save(&mut store);

        let loaded = HighScores::load(&store);
        assert_eq!(loaded, scores);
        assert_eq!(loaded.entries[0].currency, 3);

        store.save(keys::HIGH_SCORES, "not json");
        assert!(HighScores::load(&store).is_empty());
    }
}
