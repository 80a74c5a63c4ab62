//! Run state and core simulation types
//!
//! `RunState` is the single source of truth for one run. The renderer reads it
//! once per tick; only the tick mutates it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty;
use super::pool::{EntityId, EntityPool};
use crate::consts::*;
use crate::tuning::Tuning;
use crate::yards_from_scroll;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Active gameplay
    Running,
    /// Tick advancement suspended, state kept
    Paused,
    /// Player was tackled; frozen until restart
    Over,
}

/// Player jump state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum JumpState {
    /// On the ground; a new jump is allowed once `elapsed >= ready_at`
    Grounded { ready_at: f64 },
    /// Mid-jump and immune to contact
    Airborne { started_at: f64, cooldown_until: f64 },
}

impl Default for JumpState {
    fn default() -> Self {
        JumpState::Grounded { ready_at: 0.0 }
    }
}

/// The ball carrier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub pos: Vec2,
    /// Smoothed-movement target from the input provider
    pub target: Vec2,
    /// 0..=100
    pub stamina: f32,
    pub jump: JumpState,
    /// Run time (ms) of the last move input
    pub last_input_at: f64,
}

impl Default for PlayerState {
    fn default() -> Self {
        let spawn = Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y);
        Self {
            pos: spawn,
            target: spawn,
            stamina: MAX_STAMINA,
            jump: JumpState::default(),
            last_input_at: 0.0,
        }
    }
}

impl PlayerState {
    /// Movement speed factor derived from stamina (0.6 exhausted, 1.0 fresh)
    pub fn speed_factor(&self) -> f32 {
        0.6 + 0.4 * (self.stamina / MAX_STAMINA).clamp(0.0, 1.0)
    }

    pub fn is_airborne(&self) -> bool {
        matches!(self.jump, JumpState::Airborne { .. })
    }

    /// Start a jump if grounded, off cooldown and able to pay the stamina cost
    pub fn try_jump(&mut self, now: f64, tuning: &Tuning) -> bool {
        match self.jump {
            JumpState::Grounded { ready_at }
                if now >= ready_at && self.stamina >= tuning.jump_stamina_cost =>
            {
                self.drain_stamina(tuning.jump_stamina_cost);
                self.jump = JumpState::Airborne {
                    started_at: now,
                    cooldown_until: now + tuning.jump_cooldown_ms as f64,
                };
                true
            }
            _ => false,
        }
    }

    /// Land once the jump arc has elapsed
    pub fn update_jump(&mut self, now: f64, jump_duration_ms: f32) {
        if let JumpState::Airborne {
            started_at,
            cooldown_until,
        } = self.jump
            && now - started_at >= jump_duration_ms as f64
        {
            self.jump = JumpState::Grounded {
                ready_at: cooldown_until,
            };
        }
    }

    pub fn drain_stamina(&mut self, amount: f32) {
        self.stamina = (self.stamina - amount).clamp(0.0, MAX_STAMINA);
    }

    pub fn restore_stamina(&mut self, amount: f32) {
        self.stamina = (self.stamina + amount).clamp(0.0, MAX_STAMINA);
    }
}

/// Defender steering pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BehaviorPattern {
    #[default]
    Straight,
    Zigzag,
    Curved,
    Aggressive,
}

impl BehaviorPattern {
    pub const ALL: [BehaviorPattern; 4] = [
        BehaviorPattern::Straight,
        BehaviorPattern::Zigzag,
        BehaviorPattern::Curved,
        BehaviorPattern::Aggressive,
    ];

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Defender dive lifecycle: `Ready -> Diving -> Down`
///
/// `Down` is terminal for the defender's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum DiveState {
    /// Chasing, dive not yet attempted
    #[default]
    Ready,
    /// Lunging from `origin` to `target`
    Diving {
        started_at: f64,
        origin: Vec2,
        target: Vec2,
    },
    /// Missed; drifts with the field until released
    Down { since: f64 },
}

/// An opposing defender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defender {
    pub id: EntityId,
    pub pos: Vec2,
    pub target: Vec2,
    /// Base chase speed (pixels per frame)
    pub speed: f32,
    /// 0..=100
    pub stamina: f32,
    pub pattern: BehaviorPattern,
    /// Pattern oscillation clock (ms)
    pub pattern_time: f32,
    pub dive: DiveState,
}

impl Default for Defender {
    fn default() -> Self {
        Self {
            id: EntityId::default(),
            pos: Vec2::ZERO,
            target: Vec2::ZERO,
            speed: 1.0,
            stamina: MAX_STAMINA,
            pattern: BehaviorPattern::Straight,
            pattern_time: 0.0,
            dive: DiveState::Ready,
        }
    }
}

impl Defender {
    /// Whether this defender has used its one dive
    pub fn has_dived(&self) -> bool {
        !matches!(self.dive, DiveState::Ready)
    }

    pub fn is_diving(&self) -> bool {
        matches!(self.dive, DiveState::Diving { .. })
    }

    pub fn is_down(&self) -> bool {
        matches!(self.dive, DiveState::Down { .. })
    }

    /// `Ready -> Diving`; a no-op from any other state
    pub fn start_dive(&mut self, now: f64, target: Vec2) -> bool {
        if self.dive != DiveState::Ready {
            return false;
        }
        self.dive = DiveState::Diving {
            started_at: now,
            origin: self.pos,
            target,
        };
        self.target = target;
        true
    }

    /// `Diving -> Down`; a no-op from any other state
    pub fn land(&mut self, now: f64) -> bool {
        if !self.is_diving() {
            return false;
        }
        self.dive = DiveState::Down { since: now };
        true
    }
}

/// Collectible types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollectibleKind {
    /// Restores stamina
    #[default]
    Energy,
    /// Adds to the run's coin count
    Currency,
}

impl CollectibleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectibleKind::Energy => "energy",
            CollectibleKind::Currency => "currency",
        }
    }
}

/// A pickup on the field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Collectible {
    pub id: EntityId,
    pub pos: Vec2,
    /// Field anchor the collectible scrolls with
    pub target: Vec2,
    pub kind: CollectibleKind,
}

/// Pending on-screen milestone notice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub message: String,
    pub reward: u32,
    /// Run time (ms) after which the notice is cleared
    pub expires_at: f64,
}

/// Things that happened during a tick, for the host's UI/audio layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    CollectiblePicked {
        id: EntityId,
        kind: CollectibleKind,
        pos: Vec2,
    },
    DefenderSpawned { id: EntityId },
    DiveStarted { id: EntityId },
    DefenderDown { id: EntityId },
    JumpStarted,
    DifficultyIncreased { level: u8 },
    MilestoneReached { yards: u64, reward: u32 },
    Tackled { by: EntityId },
}

/// A transient notice for the host's notification widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub duration_ms: u32,
}

impl GameEvent {
    /// Notification for events the player should be told about
    pub fn notification(&self, tuning: &Tuning) -> Option<Notification> {
        match *self {
            GameEvent::DifficultyIncreased { level } => Some(Notification {
                title: "Difficulty Up!".to_string(),
                message: format!("Level {} - defenders are getting faster", level + 1),
                duration_ms: tuning.difficulty_notice_ms,
            }),
            GameEvent::MilestoneReached { yards, reward } => Some(Notification {
                title: format!("{yards} Yards!"),
                message: format!("+{reward} coins"),
                duration_ms: tuning.milestone_notice_ms,
            }),
            _ => None,
        }
    }
}

/// Final numbers handed to the persistence collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Yards covered
    pub distance: u64,
    pub currency: u32,
    pub elapsed_ms: f64,
    pub difficulty_level: u8,
}

fn detached_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete state of one run (deterministic for a given seed and input stream)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Run seed for reproducibility
    pub seed: u64,
    #[serde(skip, default = "detached_rng")]
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub phase: RunPhase,
    pub player: PlayerState,
    pub pool: EntityPool,
    /// Yards; only ever derived from `scroll_offset`
    score: u64,
    pub currency: u32,
    /// Current scroll speed (pixels per frame)
    pub scroll_speed: f32,
    pub target_speed: f32,
    pub base_speed: f32,
    /// Accumulated field scroll (pixels)
    scroll_offset: f64,
    /// Simulated run time (ms)
    pub elapsed_ms: f64,
    pub difficulty_level: u8,
    pub defender_cap: usize,
    /// Yard mark of the last milestone awarded
    pub last_milestone: u64,
    /// Saturating target-speed bonus from milestones
    pub milestone_bonus: f32,
    pub achievement: Option<Achievement>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events raised by the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl RunState {
    /// Create a new run with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let tier = difficulty::tier(0);
        let base_speed = tuning.base_scroll_speed;
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: RunPhase::Running,
            player: PlayerState::default(),
            pool: EntityPool::default(),
            score: 0,
            currency: 0,
            scroll_speed: base_speed,
            target_speed: base_speed * tier.speed_multiplier,
            base_speed,
            scroll_offset: 0.0,
            elapsed_ms: 0.0,
            difficulty_level: 0,
            defender_cap: tier.defender_cap,
            last_milestone: 0,
            milestone_bonus: 0.0,
            achievement: None,
            time_ticks: 0,
            events: Vec::new(),
            tuning,
        };

        for _ in 0..state.tuning.initial_defenders {
            let x = state
                .rng
                .random_range(DEFENDER_MARGIN..FIELD_WIDTH - DEFENDER_MARGIN);
            let y = state.rng.random_range(100.0..300.0);
            state.spawn_defender_at(Vec2::new(x, y));
        }
        for _ in 0..state.tuning.initial_collectibles {
            let x = state
                .rng
                .random_range(COLLECTIBLE_MARGIN..FIELD_WIDTH - COLLECTIBLE_MARGIN);
            let y = state.rng.random_range(50.0..350.0);
            let kind = state.roll_collectible_kind();
            state.spawn_collectible_at(Vec2::new(x, y), kind);
        }

        log::info!("Run started with seed {seed}");
        state
    }

    /// Throw the run away and start over with the same seed and tuning
    pub fn restart(&mut self) {
        self.restart_with_seed(self.seed);
    }

    /// Start over with the same tuning and a new random stream
    pub fn restart_with_seed(&mut self, seed: u64) {
        *self = Self::with_tuning(seed, self.tuning.clone());
    }

    /// Distance in yards
    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Advance the field; the only path that changes the score
    pub(crate) fn advance_scroll(&mut self, pixels: f32) {
        self.scroll_offset += pixels.max(0.0) as f64;
        self.score = self.score.max(yards_from_scroll(self.scroll_offset));
    }

    pub fn is_over(&self) -> bool {
        self.phase == RunPhase::Over
    }

    pub fn is_paused(&self) -> bool {
        self.phase == RunPhase::Paused
    }

    /// Final results, available once the run is over
    pub fn summary(&self) -> Option<RunSummary> {
        self.is_over().then(|| RunSummary {
            distance: self.score,
            currency: self.currency,
            elapsed_ms: self.elapsed_ms,
            difficulty_level: self.difficulty_level,
        })
    }

    pub fn defenders(&self) -> impl Iterator<Item = &Defender> {
        self.pool.defenders.iter()
    }

    pub fn collectibles(&self) -> impl Iterator<Item = &Collectible> {
        self.pool.collectibles.iter()
    }

    /// Spawn a freshly randomized defender at `pos`
    ///
    /// `None` when the pool is full.
    pub fn spawn_defender_at(&mut self, pos: Vec2) -> Option<EntityId> {
        let speed = 1.0 + self.rng.random::<f32>() * 2.0 + self.score as f32 / 1000.0;
        let pattern = BehaviorPattern::random(&mut self.rng);
        let pattern_time = self.rng.random_range(0.0..2000.0);
        let id = self.pool.defenders.acquire(|id, d| {
            d.id = id;
            d.pos = pos;
            d.target = pos;
            d.speed = speed;
            d.stamina = MAX_STAMINA;
            d.pattern = pattern;
            d.pattern_time = pattern_time;
            d.dive = DiveState::Ready;
        })?;
        log::debug!("Defender {} spawned ({pattern:?}, speed {speed:.2})", id.0);
        self.events.push(GameEvent::DefenderSpawned { id });
        Some(id)
    }

    /// Spawn a defender above the field at a random lateral position
    pub fn spawn_defender(&mut self) -> Option<EntityId> {
        let x = self
            .rng
            .random_range(DEFENDER_MARGIN..FIELD_WIDTH - DEFENDER_MARGIN);
        self.spawn_defender_at(Vec2::new(x, DEFENDER_SPAWN_Y))
    }

    pub fn spawn_collectible_at(&mut self, pos: Vec2, kind: CollectibleKind) -> Option<EntityId> {
        self.pool.collectibles.acquire(|id, c| {
            c.id = id;
            c.pos = pos;
            c.target = pos;
            c.kind = kind;
        })
    }

    /// Spawn a collectible at the top of the field in a random lane
    pub fn spawn_collectible(&mut self) -> Option<EntityId> {
        let x = self
            .rng
            .random_range(COLLECTIBLE_MARGIN..FIELD_WIDTH - COLLECTIBLE_MARGIN);
        let kind = self.roll_collectible_kind();
        self.spawn_collectible_at(Vec2::new(x, COLLECTIBLE_SPAWN_Y), kind)
    }

    fn roll_collectible_kind(&mut self) -> CollectibleKind {
        let weight = self.tuning.currency_weight.clamp(0.0, 1.0) as f64;
        if self.rng.random_bool(weight) {
            CollectibleKind::Currency
        } else {
            CollectibleKind::Energy
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_defaults() {
        let state = RunState::new(7);
        assert_eq!(state.phase, RunPhase::Running);
        assert_eq!(state.score(), 0);
        assert_eq!(state.player.stamina, MAX_STAMINA);
        assert_eq!(state.defenders().count(), 3);
        assert_eq!(state.collectibles().count(), 2);
        assert!(state.summary().is_none());
    }

    #[test]
    fn test_initial_entities_start_inside_bounds() {
        use crate::sim::kinematics::{COLLECTIBLE_BOUNDS, DEFENDER_BOUNDS};
        for seed in 0..200 {
            let state = RunState::new(seed);
            assert!(state.defenders().all(|d| DEFENDER_BOUNDS.contains(d.pos)));
            assert!(state.collectibles().all(|c| COLLECTIBLE_BOUNDS.contains(c.pos)));
        }
    }

    #[test]
    fn test_restart_with_new_seed() {
        let tuning = Tuning {
            initial_defenders: 5,
            ..Tuning::default()
        };
        let mut state = RunState::with_tuning(1, tuning.clone());
        state.currency = 40;
        state.restart_with_seed(2);

        let expected = RunState::with_tuning(2, tuning.clone());
        assert_eq!(state.seed, 2);
        assert_eq!(state.currency, 0);
        assert_eq!(state.tuning, tuning);
        let got: Vec<_> = state.defenders().cloned().collect();
        let want: Vec<_> = expected.defenders().cloned().collect();
        assert_eq!(got, want);

        let replay: Vec<_> = RunState::with_tuning(1, tuning).defenders().cloned().collect();
        assert_ne!(got, replay);
    }

    #[test]
    fn test_dive_transitions() {
        let mut d = Defender::default();
        assert!(!d.has_dived());
        assert!(!d.land(0.0), "cannot land before diving");

        assert!(d.start_dive(10.0, Vec2::new(1.0, 2.0)));
        assert!(d.is_diving());
        assert!(d.has_dived());
        assert!(!d.start_dive(11.0, Vec2::ZERO), "dive while diving is a no-op");

        assert!(d.land(20.0));
        assert!(d.is_down());
        assert!(!d.start_dive(30.0, Vec2::ZERO), "down -> diving is illegal");
        assert!(d.has_dived());
    }

    #[test]
    fn test_jump_cycle() {
        let tuning = Tuning::default();
        let mut player = PlayerState::default();

        assert!(player.try_jump(0.0, &tuning));
        assert!(player.is_airborne());
        assert!(!player.try_jump(100.0, &tuning), "no double jump");

        player.update_jump(700.0, tuning.jump_duration_ms);
        assert!(!player.is_airborne());
        assert!(!player.try_jump(800.0, &tuning), "still on cooldown");
        assert!(player.try_jump(1000.0, &tuning));
        assert_eq!(player.stamina, MAX_STAMINA - 2.0 * tuning.jump_stamina_cost);
    }

    #[test]
    fn test_jump_needs_stamina() {
        let tuning = Tuning::default();
        let mut player = PlayerState {
            stamina: tuning.jump_stamina_cost - 1.0,
            ..Default::default()
        };
        assert!(!player.try_jump(0.0, &tuning));
    }

    #[test]
    fn test_score_only_follows_scroll() {
        let mut state = RunState::with_tuning(1, Tuning::without_spawns());
        state.advance_scroll(5.0);
        assert_eq!(state.score(), 0);
        state.advance_scroll(1.0);
        assert_eq!(state.score(), 1);
        state.advance_scroll(-50.0);
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn test_notifications() {
        let tuning = Tuning::default();
        let n = GameEvent::MilestoneReached {
            yards: 200,
            reward: 10,
        }
        .notification(&tuning)
        .unwrap();
        assert_eq!(n.title, "200 Yards!");
        assert_eq!(n.duration_ms, tuning.milestone_notice_ms);
        assert!(GameEvent::JumpStarted.notification(&tuning).is_none());
    }
}
