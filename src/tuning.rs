//! Data-driven game balance
//!
//! Every rate, radius and duration the simulation uses lives here so a host can
//! ship a JSON override without rebuilding. Missing fields fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::consts::BASE_SCROLL_SPEED;
use crate::error::TuningError;
use crate::persistence::{BlobStore, keys};

/// Gameplay tuning values
///
/// Rates marked "per frame" are expressed for one 60 Hz reference frame and
/// scaled by the actual delta time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Fraction of the remaining distance to the target covered per frame
    pub player_smoothing: f32,
    /// Max player displacement per frame at full stamina speed factor
    pub player_max_step: f32,
    /// Stamina lost per frame
    pub stamina_drain: f32,
    /// Stamina restored by an energy pickup
    pub energy_restore: f32,
    pub jump_duration_ms: f32,
    /// Measured from jump start
    pub jump_cooldown_ms: f32,
    pub jump_stamina_cost: f32,

    // === Contact radii ===
    pub pickup_radius: f32,
    pub tackle_radius: f32,
    /// Radius for an actively diving defender
    pub dive_tackle_radius: f32,

    // === Defender AI ===
    pub dive_trigger_range: f32,
    pub dive_duration_ms: f32,
    /// How far ahead of the player a dive aims
    pub dive_lead: f32,
    /// Per-frame chance an in-range defender commits to its dive
    pub dive_probability: f32,
    pub defender_separation: f32,
    pub defender_stamina_drain: f32,
    /// Speed factor applied to defenders trailing the player
    pub behind_penalty: f32,
    /// Max aim jitter in pixels at zero accuracy
    pub aim_jitter: f32,

    // === Spawning ===
    pub initial_defenders: usize,
    pub initial_collectibles: usize,
    /// Per-frame defender spawn chance at level 0
    pub defender_spawn_chance: f32,
    /// Added to the spawn chance for each difficulty level
    pub defender_spawn_chance_per_level: f32,
    pub burst_chance: f32,
    pub burst_chance_per_level: f32,
    pub burst_size: usize,
    /// Per-frame collectible spawn chance
    pub collectible_spawn_chance: f32,
    /// Probability a new collectible is currency rather than energy
    pub currency_weight: f32,

    // === Speed & milestones ===
    pub base_scroll_speed: f32,
    /// Fraction of the gap to target speed closed per frame
    pub speed_approach: f32,
    pub milestone_yards: u64,
    pub milestone_reward: u32,
    pub milestone_notice_ms: u32,
    pub milestone_speed_bonus: f32,
    pub milestone_speed_bonus_cap: f32,
    pub difficulty_notice_ms: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_smoothing: 0.25,
            player_max_step: 12.0,
            stamina_drain: 0.1,
            energy_restore: 25.0,
            jump_duration_ms: 600.0,
            jump_cooldown_ms: 1000.0,
            jump_stamina_cost: 10.0,

            pickup_radius: 20.0,
            tackle_radius: 25.0,
            dive_tackle_radius: 30.0,

            dive_trigger_range: 80.0,
            dive_duration_ms: 400.0,
            dive_lead: 20.0,
            dive_probability: 0.03,
            defender_separation: 30.0,
            defender_stamina_drain: 0.05,
            behind_penalty: 0.6,
            aim_jitter: 12.0,

            initial_defenders: 3,
            initial_collectibles: 2,
            defender_spawn_chance: 0.02,
            defender_spawn_chance_per_level: 0.005,
            burst_chance: 0.01,
            burst_chance_per_level: 0.003,
            burst_size: 2,
            collectible_spawn_chance: 0.015,
            currency_weight: 0.7,

            base_scroll_speed: BASE_SCROLL_SPEED,
            speed_approach: 0.02,
            milestone_yards: 100,
            milestone_reward: 10,
            milestone_notice_ms: 3000,
            milestone_speed_bonus: 0.1,
            milestone_speed_bonus_cap: 1.0,
            difficulty_notice_ms: 2500,
        }
    }
}

impl Tuning {
    /// Tuning with all random spawning disabled (scripted scenarios, replays)
    pub fn without_spawns() -> Self {
        Self {
            initial_defenders: 0,
            initial_collectibles: 0,
            defender_spawn_chance: 0.0,
            defender_spawn_chance_per_level: 0.0,
            burst_chance: 0.0,
            burst_chance_per_level: 0.0,
            collectible_spawn_chance: 0.0,
            ..Self::default()
        }
    }

    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check every field is inside its legal range
    pub fn validate(&self) -> Result<(), TuningError> {
        let probabilities = [
            ("player_smoothing", self.player_smoothing),
            ("dive_probability", self.dive_probability),
            ("defender_spawn_chance", self.defender_spawn_chance),
            ("defender_spawn_chance_per_level", self.defender_spawn_chance_per_level),
            ("burst_chance", self.burst_chance),
            ("burst_chance_per_level", self.burst_chance_per_level),
            ("collectible_spawn_chance", self.collectible_spawn_chance),
            ("currency_weight", self.currency_weight),
            ("speed_approach", self.speed_approach),
            ("behind_penalty", self.behind_penalty),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, value as f64));
            }
        }
        if self.player_smoothing == 0.0 {
            return Err(invalid("player_smoothing", 0.0));
        }

        let positives = [
            ("player_max_step", self.player_max_step),
            ("jump_duration_ms", self.jump_duration_ms),
            ("pickup_radius", self.pickup_radius),
            ("tackle_radius", self.tackle_radius),
            ("dive_tackle_radius", self.dive_tackle_radius),
            ("dive_duration_ms", self.dive_duration_ms),
            ("base_scroll_speed", self.base_scroll_speed),
        ];
        for (field, value) in positives {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(field, value as f64));
            }
        }

        let non_negatives = [
            ("stamina_drain", self.stamina_drain),
            ("energy_restore", self.energy_restore),
            ("jump_cooldown_ms", self.jump_cooldown_ms),
            ("jump_stamina_cost", self.jump_stamina_cost),
            ("dive_trigger_range", self.dive_trigger_range),
            ("dive_lead", self.dive_lead),
            ("defender_separation", self.defender_separation),
            ("defender_stamina_drain", self.defender_stamina_drain),
            ("aim_jitter", self.aim_jitter),
            ("milestone_speed_bonus", self.milestone_speed_bonus),
            ("milestone_speed_bonus_cap", self.milestone_speed_bonus_cap),
        ];
        for (field, value) in non_negatives {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, value as f64));
            }
        }

        if self.milestone_yards == 0 {
            return Err(invalid("milestone_yards", 0.0));
        }
        Ok(())
    }

    /// Load tuning from a blob store, falling back to defaults
    pub fn load(store: &dyn BlobStore) -> Self {
        let Some(json) = store.load(keys::TUNING) else {
            log::info!("Using default tuning");
            return Self::default();
        };
        match Self::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Rejected stored tuning ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Save tuning to a blob store
    pub fn save(&self, store: &mut dyn BlobStore) {
        if let Ok(json) = serde_json::to_string(self) {
            store.save(keys::TUNING, &json);
            log::info!("Tuning saved");
        }
    }
}

fn invalid(field: &'static str, value: f64) -> TuningError {
    TuningError::InvalidValue { field, value }
}
