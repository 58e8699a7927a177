//! Tunables for the simulation.
//!
//! Every number the core uses lives here so a run can be reshaped from a
//! JSON file without touching code. Speeds are world units per second and
//! durations are game-clock milliseconds.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Hard ceiling on `max_lives`.
pub const LIVES_CAP: u32 = 5;

// ── Difficulty presets ───────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }
}

/// How regular zombies steer after spawning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyMovement {
    /// Straight down the screen.
    #[default]
    Straight,
    /// Re-aim at the player every tick.
    Pursuit,
}

/// Speed and delay multipliers as `(num, den)` and the quota offset,
/// relative to `Medium`.
fn difficulty_scale(difficulty: Difficulty) -> ((f32, f32), (u64, u64), i64) {
    match difficulty {
        Difficulty::Easy => ((3.0, 4.0), (5, 4), -5),
        Difficulty::Medium => ((1.0, 1.0), (1, 1), 0),
        Difficulty::Hard => ((4.0, 3.0), (3, 4), 5),
    }
}

// ── Sub-sections ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    /// Gap between field drops.
    pub interval_ms: u64,
    /// How long a collected effect lasts.
    pub duration_ms: u64,
    /// How long an uncollected item stays on the field.
    pub item_lifetime_ms: u64,
    pub item_size: f32,
    /// Items never spawn closer than this to the world edge.
    pub margin: f32,
    pub speed_multiplier: f32,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            interval_ms: 30_000,
            duration_ms: 8_000,
            item_lifetime_ms: 10_000,
            item_size: 30.0,
            margin: 60.0,
            speed_multiplier: 1.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiniBossConfig {
    /// Mini-bosses appear on levels divisible by this.
    pub level_modulus: u32,
    pub hp: u32,
    pub size: f32,
    pub speed_factor: f32,
    /// Independent delayed spawns scheduled per boss level.
    pub count: u32,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for MiniBossConfig {
    fn default() -> Self {
        Self {
            level_modulus: 5,
            hp: 3,
            size: 70.0,
            speed_factor: 0.5,
            count: 3,
            min_delay_ms: 2_000,
            max_delay_ms: 15_000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MegaBossConfig {
    /// The encounter replaces normal spawning on levels divisible by this.
    pub level_modulus: u32,
    pub width: f32,
    pub height: f32,
    /// Resting y of the boss' top edge once it has entered.
    pub station_y: f32,
    pub entry_ms: u64,
    pub required_hits: u32,
    pub shield_ms: u64,
    pub vulnerable_ms: u64,
    pub burst_interval_ms: u64,
    pub shards_per_burst: u32,
    pub arc_degrees: f32,
    pub shard_size: f32,
    pub shard_base_speed: f32,
    pub shard_speed_step: f32,
    pub dash_interval_ms: u64,
    pub dash_speed: f32,
    pub defeat_bonus: u32,
}

impl Default for MegaBossConfig {
    fn default() -> Self {
        Self {
            level_modulus: 10,
            width: 140.0,
            height: 100.0,
            station_y: 40.0,
            entry_ms: 1_500,
            required_hits: 20,
            shield_ms: 5_000,
            vulnerable_ms: 2_000,
            burst_interval_ms: 400,
            shards_per_burst: 6,
            arc_degrees: 90.0,
            shard_size: 12.0,
            shard_base_speed: 180.0,
            shard_speed_step: 15.0,
            dash_interval_ms: 600,
            dash_speed: 160.0,
            defeat_bonus: 500,
        }
    }
}

// ── Top level ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub difficulty: Difficulty,
    pub world_width: f32,
    pub world_height: f32,

    pub player_width: f32,
    pub player_height: f32,
    pub player_speed: f32,
    pub starting_lives: u32,
    pub max_lives: u32,

    pub bullet_width: f32,
    pub bullet_height: f32,
    pub bullet_speed: f32,
    /// Horizontal speed of the outer bullets of a TripleFire volley.
    pub triple_fire_spread: f32,
    pub bullet_capacity: usize,
    pub shard_capacity: usize,
    pub enemy_capacity: usize,
    pub item_capacity: usize,

    pub zombie_size: f32,
    pub enemy_movement: EnemyMovement,
    pub base_zombie_speed: f32,
    pub zombie_speed_step: f32,
    /// Spawns (and so kills) needed to clear level 1.
    pub base_quota: u32,
    pub quota_step: u32,
    pub base_spawn_delay_ms: u64,
    pub spawn_delay_step_ms: u64,
    pub min_spawn_delay_ms: u64,

    pub score_normal: u32,
    pub score_boss: u32,
    pub combo_window_ms: u64,
    pub combo_step: u32,
    pub combo_bonus: u32,
    pub extra_life_score: u32,

    pub power_ups: PowerUpConfig,
    pub mini_boss: MiniBossConfig,
    pub mega_boss: MegaBossConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            world_width: 800.0,
            world_height: 600.0,

            player_width: 50.0,
            player_height: 60.0,
            player_speed: 360.0,
            starting_lives: 3,
            max_lives: 5,

            bullet_width: 6.0,
            bullet_height: 10.0,
            bullet_speed: 520.0,
            triple_fire_spread: 200.0,
            bullet_capacity: 40,
            shard_capacity: 128,
            enemy_capacity: 64,
            item_capacity: 4,

            zombie_size: 45.0,
            enemy_movement: EnemyMovement::Straight,
            base_zombie_speed: 72.0,
            zombie_speed_step: 24.0,
            base_quota: 20,
            quota_step: 5,
            base_spawn_delay_ms: 1_200,
            spawn_delay_step_ms: 100,
            min_spawn_delay_ms: 400,

            score_normal: 10,
            score_boss: 50,
            combo_window_ms: 1_500,
            combo_step: 10,
            combo_bonus: 25,
            extra_life_score: 1_000,

            power_ups: PowerUpConfig::default(),
            mini_boss: MiniBossConfig::default(),
            mega_boss: MegaBossConfig::default(),
        }
    }
}

impl GameConfig {
    /// Default tuning shifted for the chosen difficulty.
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let mut config = Self::default();
        config.apply_difficulty(difficulty);
        config
    }

    /// Retune the base speed, spawn delay and quota for `difficulty`.
    ///
    /// The current values are read as tuned for `self.difficulty`, so a
    /// loaded file keeps its own numbers at its own difficulty and other
    /// presets scale from them. The spawn delay never drops below
    /// `min_spawn_delay_ms`.
    pub fn apply_difficulty(&mut self, difficulty: Difficulty) {
        let (from_speed, from_delay, from_quota) = difficulty_scale(self.difficulty);
        let (to_speed, to_delay, to_quota) = difficulty_scale(difficulty);

        self.base_zombie_speed =
            self.base_zombie_speed * from_speed.1 / from_speed.0 * to_speed.0 / to_speed.1;
        let delay = self.base_spawn_delay_ms * from_delay.1 / from_delay.0 * to_delay.0 / to_delay.1;
        self.base_spawn_delay_ms = delay.max(self.min_spawn_delay_ms);
        let quota = (self.base_quota as i64 - from_quota + to_quota).max(1);
        self.base_quota = quota as u32;
        self.difficulty = difficulty;
    }

    /// Copy of this config retuned for `difficulty` and re-checked.
    pub fn tuned_for(&self, difficulty: Difficulty) -> Result<Self, ConfigError> {
        let mut config = self.clone();
        config.apply_difficulty(difficulty);
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config; missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if self.world_width <= 0.0 || self.world_height <= 0.0 {
            return Err(invalid("world_width/world_height", "must be positive"));
        }
        if self.max_lives == 0 || self.max_lives > LIVES_CAP {
            return Err(invalid("max_lives", format!("must be in 1..={LIVES_CAP}")));
        }
        if self.starting_lives == 0 || self.starting_lives > self.max_lives {
            return Err(invalid(
                "starting_lives",
                format!("must be in 1..={}", self.max_lives),
            ));
        }
        for (field, cap) in [
            ("bullet_capacity", self.bullet_capacity),
            ("shard_capacity", self.shard_capacity),
            ("enemy_capacity", self.enemy_capacity),
            ("item_capacity", self.item_capacity),
        ] {
            if cap == 0 {
                return Err(invalid(field, "pool capacity must be non-zero"));
            }
        }
        if self.base_quota == 0 {
            return Err(invalid("base_quota", "must be non-zero"));
        }
        if self.min_spawn_delay_ms > self.base_spawn_delay_ms {
            return Err(invalid(
                "min_spawn_delay_ms",
                format!(
                    "floor {} exceeds base delay {}",
                    self.min_spawn_delay_ms, self.base_spawn_delay_ms
                ),
            ));
        }
        if self.mini_boss.level_modulus == 0 {
            return Err(invalid("mini_boss.level_modulus", "must be non-zero"));
        }
        if self.mini_boss.hp == 0 {
            return Err(invalid("mini_boss.hp", "must be non-zero"));
        }
        if self.mini_boss.min_delay_ms > self.mini_boss.max_delay_ms {
            return Err(invalid("mini_boss.min_delay_ms", "exceeds max_delay_ms"));
        }
        if self.mega_boss.level_modulus == 0 {
            return Err(invalid("mega_boss.level_modulus", "must be non-zero"));
        }
        if self.mega_boss.required_hits == 0 {
            return Err(invalid("mega_boss.required_hits", "must be non-zero"));
        }
        if self.mega_boss.shards_per_burst == 0 {
            return Err(invalid("mega_boss.shards_per_burst", "must be non-zero"));
        }
        if self.mega_boss.shield_ms == 0 {
            return Err(invalid("mega_boss.shield_ms", "must be non-zero"));
        }
        if self.mega_boss.vulnerable_ms == 0 {
            return Err(invalid("mega_boss.vulnerable_ms", "must be non-zero"));
        }
        if self.mega_boss.burst_interval_ms == 0 {
            return Err(invalid("mega_boss.burst_interval_ms", "must be non-zero"));
        }
        if self.mega_boss.dash_interval_ms == 0 {
            return Err(invalid("mega_boss.dash_interval_ms", "must be non-zero"));
        }
        if self.power_ups.interval_ms == 0 {
            return Err(invalid("power_ups.interval_ms", "must be non-zero"));
        }
        Ok(())
    }
}
