//! Adaptive learning tracker
//!
//! Watches the player's movement, jumps and pickups through bounded rolling
//! windows and summarizes them into a behavior profile. From the profile it
//! derives tuning a defender AI could use: a movement prediction, blocking
//! spots near collectibles and counter-pattern tags.
//!
//! The tracker is independent of the simulation tick. Observations come from
//! the host's input handlers and every timestamp is passed in.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::FIELD_WIDTH;
use crate::error::LearningError;
use crate::persistence::{BlobStore, keys};
use crate::sim::{CollectibleKind, GameEvent};

/// Rolling window capacities
pub const MOVEMENT_WINDOW: usize = 100;
pub const JUMP_WINDOW: usize = 50;
pub const COLLECTION_WINDOW: usize = 30;
pub const ADAPTATION_WINDOW: usize = 100;

/// Movement samples needed before analysis, and how many recent ones it uses
const MIN_MOVEMENT_SAMPLES: usize = 10;
const RECENT_MOVEMENT: usize = 20;
const KEPT_DIRECTIONS: usize = 10;
const MIN_JUMP_SAMPLES: usize = 5;
const RECENT_JUMPS: usize = 10;
const MIN_COLLECTION_SAMPLES: usize = 5;
const KEPT_COLLECTION_TAGS: usize = 10;
const PREDICTION_SAMPLES: usize = 5;
const SUCCESS_WINDOW: usize = 20;
const COLLECTION_CELL: f32 = 50.0;
const BLOCKING_RANGE: f32 = 100.0;

pub const MAX_ADAPTATION: f32 = 10.0;

/// Distance (yards) after which the progressive ramp and blocking kick in
const PROGRESSIVE_THRESHOLD: u64 = 500;

/// Which part of the field the player favors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LateralSide {
    Left,
    #[default]
    Center,
    Right,
}

impl LateralSide {
    pub fn classify(x: f32) -> Self {
        if x < FIELD_WIDTH * 0.375 {
            LateralSide::Left
        } else if x > FIELD_WIDTH * 0.625 {
            LateralSide::Right
        } else {
            LateralSide::Center
        }
    }
}

/// Dominant axis of one movement step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Direction of the larger component of `delta` (ties go vertical)
    pub fn of_step(delta: Vec2) -> Self {
        if delta.x.abs() > delta.y.abs() {
            if delta.x > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if delta.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementSample {
    pub pos: Vec2,
    pub timestamp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpSample {
    pub timestamp: f64,
    pub success: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollectionSample {
    pub pos: Vec2,
    pub kind: CollectibleKind,
    pub timestamp: f64,
}

/// Rolling observation windows plus the aggregates derived from them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorProfile {
    pub movement: VecDeque<MovementSample>,
    pub jumps: VecDeque<JumpSample>,
    pub collections: VecDeque<CollectionSample>,

    pub average_position: Vec2,
    pub preferred_side: LateralSide,
    /// Step directions over the recent window, oldest first
    pub escape_directions: Vec<Direction>,
    /// Jumps per minute
    pub jump_frequency: f32,
    /// `<kind>_<col>_<row>` tags of recent pickups
    pub collection_pattern: Vec<String>,
    /// 0..=10
    pub adaptation_level: f32,
}

impl Default for BehaviorProfile {
    fn default() -> Self {
        Self {
            movement: VecDeque::with_capacity(MOVEMENT_WINDOW),
            jumps: VecDeque::with_capacity(JUMP_WINDOW),
            collections: VecDeque::with_capacity(COLLECTION_WINDOW),
            average_position: Vec2::new(FIELD_WIDTH / 2.0, 300.0),
            preferred_side: LateralSide::Center,
            escape_directions: Vec::new(),
            jump_frequency: 0.0,
            collection_pattern: Vec::new(),
            adaptation_level: 0.0,
        }
    }
}

/// One AI-vs-player exchange used to drive the adaptation level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptationRecord {
    pub timestamp: f64,
    pub player_action: String,
    pub ai_response: String,
    pub success: bool,
}

/// AI tuning derived from the profile and run progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveParams {
    pub difficulty_multiplier: f32,
    /// Suggested max concurrent defenders
    pub spawn_rate: u32,
    /// 0.3..=0.9
    pub predictive_accuracy: f32,
    pub blocking_enabled: bool,
    pub predicted_position: Vec2,
    pub counter_patterns: Vec<String>,
}

/// A spot a defender could hold to cut the player off from a collectible
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockingPosition {
    pub pos: Vec2,
    /// Higher for collectibles nearer the predicted player position
    pub priority: f32,
}

/// Player behavior tracker (one per running game, optionally persisted)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningTracker {
    pub profile: BehaviorProfile,
    pub history: VecDeque<AdaptationRecord>,
}

fn push_bounded<T>(window: &mut VecDeque<T>, item: T, cap: usize) {
    window.push_back(item);
    while window.len() > cap {
        window.pop_front();
    }
}

impl LearningTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn adaptation_level(&self) -> f32 {
        self.profile.adaptation_level
    }

    /// Record a player position sample
    pub fn track_movement(&mut self, pos: Vec2, timestamp: f64) {
        push_bounded(
            &mut self.profile.movement,
            MovementSample { pos, timestamp },
            MOVEMENT_WINDOW,
        );
        self.analyze_movement();
    }

    /// Record a jump attempt
    pub fn track_jump(&mut self, timestamp: f64, success: bool) {
        push_bounded(
            &mut self.profile.jumps,
            JumpSample { timestamp, success },
            JUMP_WINDOW,
        );
        self.analyze_jumps();
    }

    /// Record a collectible pickup
    pub fn track_collection(&mut self, pos: Vec2, kind: CollectibleKind, timestamp: f64) {
        push_bounded(
            &mut self.profile.collections,
            CollectionSample {
                pos,
                kind,
                timestamp,
            },
            COLLECTION_WINDOW,
        );
        self.analyze_collections();
    }

    /// Feed one tick's events into the tracker
    ///
    /// A defender going down after a missed dive counts as a player win, a
    /// tackle as an AI win.
    pub fn observe(&mut self, events: &[GameEvent], timestamp: f64) {
        for event in events {
            match *event {
                GameEvent::JumpStarted => self.track_jump(timestamp, true),
                GameEvent::CollectiblePicked { kind, pos, .. } => {
                    self.track_collection(pos, kind, timestamp)
                }
                GameEvent::DefenderDown { .. } => {
                    self.update_adaptation(false, "evade", "dive", timestamp)
                }
                GameEvent::Tackled { .. } => {
                    self.update_adaptation(true, "run", "tackle", timestamp)
                }
                _ => {}
            }
        }
    }

    fn analyze_movement(&mut self) {
        let profile = &mut self.profile;
        if profile.movement.len() < MIN_MOVEMENT_SAMPLES {
            return;
        }
        let skip = profile.movement.len().saturating_sub(RECENT_MOVEMENT);
        let recent: Vec<Vec2> = profile.movement.iter().skip(skip).map(|s| s.pos).collect();

        let sum: Vec2 = recent.iter().copied().sum();
        profile.average_position = sum / recent.len() as f32;
        profile.preferred_side = LateralSide::classify(profile.average_position.x);

        let directions: Vec<Direction> = recent
            .windows(2)
            .map(|w| Direction::of_step(w[1] - w[0]))
            .collect();
        let keep = directions.len().saturating_sub(KEPT_DIRECTIONS);
        profile.escape_directions = directions[keep..].to_vec();
    }

    fn analyze_jumps(&mut self) {
        let profile = &mut self.profile;
        if profile.jumps.len() < MIN_JUMP_SAMPLES {
            return;
        }
        let skip = profile.jumps.len().saturating_sub(RECENT_JUMPS);
        let stamps: Vec<f64> = profile.jumps.iter().skip(skip).map(|j| j.timestamp).collect();
        let intervals: Vec<f64> = stamps.windows(2).map(|w| w[1] - w[0]).collect();
        let mean = intervals.iter().sum::<f64>() / intervals.len().max(1) as f64;
        profile.jump_frequency = if mean > 0.0 {
            (60_000.0 / mean).min(f32::MAX as f64) as f32
        } else {
            0.0
        };
    }

    fn analyze_collections(&mut self) {
        let profile = &mut self.profile;
        if profile.collections.len() < MIN_COLLECTION_SAMPLES {
            return;
        }
        let skip = profile
            .collections
            .len()
            .saturating_sub(KEPT_COLLECTION_TAGS);
        profile.collection_pattern = profile
            .collections
            .iter()
            .skip(skip)
            .map(|c| {
                format!(
                    "{}_{}_{}",
                    c.kind.as_str(),
                    (c.pos.x / COLLECTION_CELL).floor() as i32,
                    (c.pos.y / COLLECTION_CELL).floor() as i32
                )
            })
            .collect();
    }

    /// Escape directions ranked by frequency
    ///
    /// Among equal counts the direction first seen later ranks higher.
    pub fn ranked_directions(&self) -> Vec<(Direction, usize)> {
        let mut ranked: Vec<(Direction, usize)> = Vec::new();
        for dir in &self.profile.escape_directions {
            match ranked.iter_mut().find(|(d, _)| d == dir) {
                Some((_, count)) => *count += 1,
                None => ranked.push((*dir, 1)),
            }
        }
        ranked.reverse();
        // Stable: ties stay in reverse first-seen order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    pub fn dominant_direction(&self) -> Option<Direction> {
        self.ranked_directions().first().map(|(d, _)| *d)
    }

    /// Where the player is likely to be shortly
    ///
    /// Linear extrapolation over the last few samples, or the average position
    /// while there isn't enough history.
    pub fn predict_position(&self) -> Vec2 {
        let movement = &self.profile.movement;
        if movement.len() < PREDICTION_SAMPLES {
            return self.profile.average_position;
        }
        let first = movement[movement.len() - PREDICTION_SAMPLES].pos;
        let last = movement[movement.len() - 1].pos;
        let velocity = (last - first) / (PREDICTION_SAMPLES - 1) as f32;
        last + velocity * 2.0
    }

    /// Tags that invert the player's habits
    pub fn counter_patterns(&self) -> Vec<String> {
        let mut patterns: Vec<String> = match self.profile.preferred_side {
            LateralSide::Left => vec!["block_left".into(), "force_right".into()],
            LateralSide::Right => vec!["block_right".into(), "force_left".into()],
            LateralSide::Center => vec!["surround".into(), "pincer_movement".into()],
        };
        if let Some(dir) = self.dominant_direction() {
            patterns.push(format!("counter_{}", dir.as_str()));
        }
        patterns
    }

    /// AI parameters for the current distance (yards)
    ///
    /// `elapsed_ms` is accepted for callers that key tuning on run time; the
    /// current formula depends on distance and adaptation only.
    pub fn adaptive_params(&self, score: u64, _elapsed_ms: f64) -> AdaptiveParams {
        let yards = score as f32;
        let base = (1.0 + yards / 500.0 * 0.5).min(3.0);
        let progressive = if score >= PROGRESSIVE_THRESHOLD {
            1.5 + (yards - PROGRESSIVE_THRESHOLD as f32) / 1000.0
        } else {
            1.0
        };
        let level = self.profile.adaptation_level;
        let adaptation = 1.0 + level * 0.1;

        let spawn_rate = if score >= PROGRESSIVE_THRESHOLD {
            (5 + (score - PROGRESSIVE_THRESHOLD) / 200).min(10) as u32
        } else {
            3
        };

        AdaptiveParams {
            difficulty_multiplier: base * progressive * adaptation,
            spawn_rate,
            predictive_accuracy: (0.3 + level * 0.1).min(0.9),
            blocking_enabled: score >= PROGRESSIVE_THRESHOLD,
            predicted_position: self.predict_position(),
            counter_patterns: self.counter_patterns(),
        }
    }

    /// Blocking spots in front of collectibles near the predicted position
    pub fn blocking_positions(
        &self,
        collectibles: &[Vec2],
        rng: &mut impl Rng,
    ) -> Vec<BlockingPosition> {
        let prediction = self.predict_position();
        let mut spots: Vec<BlockingPosition> = collectibles
            .iter()
            .filter_map(|&c| {
                let distance = c.distance(prediction);
                if distance >= BLOCKING_RANGE {
                    return None;
                }
                let jitter = rng.random_range(-20.0..20.0);
                Some(BlockingPosition {
                    pos: Vec2::new(c.x + jitter, c.y - 30.0),
                    priority: 1.0 / distance.max(f32::EPSILON),
                })
            })
            .collect();
        spots.sort_by(|a, b| b.priority.total_cmp(&a.priority));
        spots
    }

    /// Record an exchange outcome and nudge the adaptation level
    ///
    /// A high recent success rate raises the level quickly; a low one lowers it
    /// at half the pace.
    pub fn update_adaptation(
        &mut self,
        success: bool,
        player_action: &str,
        ai_response: &str,
        timestamp: f64,
    ) {
        push_bounded(
            &mut self.history,
            AdaptationRecord {
                timestamp,
                player_action: player_action.to_string(),
                ai_response: ai_response.to_string(),
                success,
            },
            ADAPTATION_WINDOW,
        );

        let skip = self.history.len().saturating_sub(SUCCESS_WINDOW);
        let recent = self.history.len() - skip;
        let wins = self.history.iter().skip(skip).filter(|h| h.success).count();
        let rate = wins as f32 / recent as f32;

        let level = &mut self.profile.adaptation_level;
        if rate > 0.7 {
            *level = (*level + 0.1).min(MAX_ADAPTATION);
        } else if rate < 0.3 {
            *level = (*level - 0.05).max(0.0);
        }
    }

    /// Serialize the full tracker to a JSON blob
    pub fn export(&self) -> String {
        // Only plain data and string keys: serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Decode a blob, enforcing window caps and the adaptation range
    pub fn try_import(blob: &str) -> Result<Self, LearningError> {
        if blob.trim().is_empty() {
            return Err(LearningError::Empty);
        }
        let mut tracker: LearningTracker = serde_json::from_str(blob)?;
        tracker.sanitize();
        Ok(tracker)
    }

    /// Decode a blob, falling back to a fresh tracker on any failure
    pub fn import(blob: &str) -> Self {
        Self::try_import(blob).unwrap_or_else(|e| {
            log::warn!("Failed to import learning state: {e}");
            Self::new()
        })
    }

    fn sanitize(&mut self) {
        fn trim<T>(window: &mut VecDeque<T>, cap: usize) {
            while window.len() > cap {
                window.pop_front();
            }
        }
        trim(&mut self.profile.movement, MOVEMENT_WINDOW);
        trim(&mut self.profile.jumps, JUMP_WINDOW);
        trim(&mut self.profile.collections, COLLECTION_WINDOW);
        trim(&mut self.history, ADAPTATION_WINDOW);
        let level = self.profile.adaptation_level;
        self.profile.adaptation_level = if level.is_finite() {
            level.clamp(0.0, MAX_ADAPTATION)
        } else {
            0.0
        };
    }

    /// Load a persisted tracker, or start fresh
    pub fn load(store: &dyn BlobStore) -> Self {
        match store.load(keys::LEARNING) {
            Some(blob) => {
                let tracker = Self::import(&blob);
                log::info!(
                    "Loaded learning state (adaptation {:.2})",
                    tracker.adaptation_level()
                );
                tracker
            }
            None => Self::new(),
        }
    }

    pub fn save(&self, store: &mut dyn BlobStore) {
        store.save(keys::LEARNING, &self.export());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn walk(tracker: &mut LearningTracker, points: &[(f32, f32)]) {
        for (i, &(x, y)) in points.iter().enumerate() {
            tracker.track_movement(Vec2::new(x, y), i as f64 * 100.0);
        }
    }

    #[test]
    fn test_windows_are_bounded() {
        let mut tracker = LearningTracker::new();
        for i in 0..250 {
            let t = i as f64;
            tracker.track_movement(Vec2::new(200.0, 300.0), t);
            tracker.track_jump(t, true);
            tracker.track_collection(Vec2::ZERO, CollectibleKind::Currency, t);
        }
        assert_eq!(tracker.profile.movement.len(), MOVEMENT_WINDOW);
        assert_eq!(tracker.profile.jumps.len(), JUMP_WINDOW);
        assert_eq!(tracker.profile.collections.len(), COLLECTION_WINDOW);
        // Oldest evicted first
        assert_eq!(tracker.profile.movement.front().unwrap().timestamp, 150.0);
    }

    #[test]
    fn test_needs_ten_samples_before_analysis() {
        let mut tracker = LearningTracker::new();
        walk(&mut tracker, &[(50.0, 300.0); 9]);
        assert_eq!(tracker.profile.preferred_side, LateralSide::Center);
        tracker.track_movement(Vec2::new(50.0, 300.0), 1000.0);
        assert_eq!(tracker.profile.preferred_side, LateralSide::Left);
        assert_eq!(tracker.profile.average_position, Vec2::new(50.0, 300.0));
    }

    #[test]
    fn test_side_classification() {
        assert_eq!(LateralSide::classify(100.0), LateralSide::Left);
        assert_eq!(LateralSide::classify(200.0), LateralSide::Center);
        assert_eq!(LateralSide::classify(300.0), LateralSide::Right);
    }

    #[test]
    fn test_direction_ranking_and_counters() {
        let mut tracker = LearningTracker::new();
        // Drift steadily right along the right side of the field
        let points: Vec<(f32, f32)> = (0..12).map(|i| (260.0 + i as f32 * 5.0, 300.0)).collect();
        walk(&mut tracker, &points);

        assert_eq!(tracker.profile.escape_directions.len(), KEPT_DIRECTIONS);
        assert_eq!(tracker.dominant_direction(), Some(Direction::Right));
        assert_eq!(
            tracker.counter_patterns(),
            vec!["block_right", "force_left", "counter_right"]
        );
    }

    #[test]
    fn test_ranked_ties_favor_later_first_seen() {
        let mut tracker = LearningTracker::new();
        tracker.profile.escape_directions = vec![
            Direction::Up,
            Direction::Left,
            Direction::Left,
            Direction::Up,
            Direction::Down,
        ];
        let ranked = tracker.ranked_directions();
        assert_eq!(
            ranked,
            vec![(Direction::Left, 2), (Direction::Up, 2), (Direction::Down, 1)]
        );
        assert_eq!(tracker.dominant_direction(), Some(Direction::Left));
        assert_eq!(tracker.counter_patterns().last().unwrap(), "counter_left");
    }

    #[test]
    fn test_prediction_extrapolates() {
        let mut tracker = LearningTracker::new();
        walk(&mut tracker, &[(100.0, 300.0), (110.0, 300.0)]);
        // Too few samples: falls back to the average
        assert_eq!(tracker.predict_position(), tracker.profile.average_position);

        walk(
            &mut tracker,
            &[
                (100.0, 300.0),
                (110.0, 300.0),
                (120.0, 300.0),
                (130.0, 300.0),
                (140.0, 300.0),
            ],
        );
        assert_eq!(tracker.predict_position(), Vec2::new(160.0, 300.0));
    }

    #[test]
    fn test_jump_frequency() {
        let mut tracker = LearningTracker::new();
        for i in 0..5 {
            tracker.track_jump(i as f64 * 2000.0, true);
        }
        assert!((tracker.profile.jump_frequency - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_collection_pattern_tags() {
        let mut tracker = LearningTracker::new();
        for i in 0..5 {
            tracker.track_collection(
                Vec2::new(120.0, 260.0),
                CollectibleKind::Energy,
                i as f64,
            );
        }
        assert_eq!(tracker.profile.collection_pattern.len(), 5);
        assert_eq!(tracker.profile.collection_pattern[0], "energy_2_5");
    }

    #[test]
    fn test_adaptive_params() {
        let tracker = LearningTracker::new();
        let early = tracker.adaptive_params(0, 0.0);
        assert_eq!(early.difficulty_multiplier, 1.0);
        assert_eq!(early.spawn_rate, 3);
        assert!(!early.blocking_enabled);
        assert!((early.predictive_accuracy - 0.3).abs() < 1e-6);

        let late = tracker.adaptive_params(900, 0.0);
        assert!(late.blocking_enabled);
        assert_eq!(late.spawn_rate, 7);
        // base 1.9 * progressive 1.9
        assert!((late.difficulty_multiplier - 1.9 * 1.9).abs() < 1e-4);

        assert_eq!(tracker.adaptive_params(5000, 0.0).spawn_rate, 10);
    }

    #[test]
    fn test_adaptation_is_asymmetric_and_bounded() {
        let mut tracker = LearningTracker::new();
        for i in 0..10 {
            tracker.update_adaptation(true, "dodge", "dive", i as f64);
        }
        let raised = tracker.adaptation_level();
        assert!((raised - 1.0).abs() < 1e-4);

        for i in 0..200 {
            tracker.update_adaptation(true, "dodge", "dive", i as f64);
        }
        assert_eq!(tracker.adaptation_level(), MAX_ADAPTATION);
        assert_eq!(tracker.history.len(), ADAPTATION_WINDOW);

        let mut losing = LearningTracker::new();
        losing.profile.adaptation_level = 1.0;
        for i in 0..10 {
            losing.update_adaptation(false, "jump", "tackle", i as f64);
        }
        assert!((losing.adaptation_level() - 0.5).abs() < 1e-4);
        for i in 0..100 {
            losing.update_adaptation(false, "jump", "tackle", i as f64);
        }
        assert_eq!(losing.adaptation_level(), 0.0);
    }

    #[test]
    fn test_blocking_positions_sorted_by_priority() {
        let mut tracker = LearningTracker::new();
        walk(&mut tracker, &[(200.0, 300.0); 10]);
        let mut rng = Pcg32::seed_from_u64(1);
        let spots = tracker.blocking_positions(
            &[
                Vec2::new(260.0, 300.0),
                Vec2::new(210.0, 300.0),
                Vec2::new(390.0, 300.0),
            ],
            &mut rng,
        );
        assert_eq!(spots.len(), 2);
        assert!(spots[0].priority > spots[1].priority);
        assert_eq!(spots[0].pos.y, 270.0);
        assert!((spots[0].pos.x - 210.0).abs() <= 20.0);
    }

    #[test]
    fn test_observe_events() {
        let mut tracker = LearningTracker::new();
        let events = [
            GameEvent::JumpStarted,
            GameEvent::CollectiblePicked {
                id: crate::sim::EntityId(0),
                kind: CollectibleKind::Currency,
                pos: Vec2::new(10.0, 20.0),
            },
            GameEvent::DefenderDown {
                id: crate::sim::EntityId(1),
            },
        ];
        tracker.observe(&events, 500.0);
        assert_eq!(tracker.profile.jumps.len(), 1);
        assert_eq!(tracker.profile.collections.len(), 1);
        assert_eq!(tracker.history.len(), 1);
        assert!(!tracker.history[0].success);
    }

    #[test]
    fn test_round_trip() {
        let mut tracker = LearningTracker::new();
        for i in 0..15 {
            tracker.track_movement(Vec2::new(100.0 + i as f32 * 3.3, 400.0 - i as f32), i as f64);
        }
        tracker.track_jump(10.0, true);
        tracker.update_adaptation(true, "left", "block", 12.0);

        let restored = LearningTracker::import(&tracker.export());
        assert_eq!(restored, tracker);
    }

    #[test]
    fn test_bad_blob_falls_back() {
        assert!(matches!(
            LearningTracker::try_import("   "),
            Err(LearningError::Empty)
        ));
        assert!(matches!(
            LearningTracker::try_import("{ nope"),
            Err(LearningError::Decode(_))
        ));
        assert_eq!(LearningTracker::import("garbage"), LearningTracker::new());
    }

    #[test]
    fn test_import_sanitizes() {
        let mut tracker = LearningTracker::new();
        tracker.profile.adaptation_level = 42.0;
        let restored = LearningTracker::import(&tracker.export());
        assert_eq!(restored.adaptation_level(), MAX_ADAPTATION);
    }

    #[test]
    fn test_store_round_trip() {
        let mut store = MemoryStore::default();
        assert_eq!(LearningTracker::load(&store), LearningTracker::new());

        let mut tracker = LearningTracker::new();
        tracker.update_adaptation(true, "a", "b", 1.0);
        tracker.save(&mut store);
        assert_eq!(LearningTracker::load(&store), tracker);
    }
}
