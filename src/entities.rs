//! All game entity types. Pure data; the systems in `compute`, `spawner`,
//! `combat`, `boss` and `progression` operate on them.

use serde::{Deserialize, Serialize};

use crate::boss::BossEncounter;
use crate::config::GameConfig;
use crate::events::GameEvent;
use crate::pool::EntityPool;
use crate::schedule::Scheduler;

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Axis-aligned box; `x`/`y` is the top-left corner, y grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Strict overlap; boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

// ── Power-ups ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    #[default]
    Speed,
    TripleFire,
    Shield,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::Speed,
        PowerUpKind::TripleFire,
        PowerUpKind::Shield,
    ];

    fn slot(self) -> usize {
        match self {
            PowerUpKind::Speed => 0,
            PowerUpKind::TripleFire => 1,
            PowerUpKind::Shield => 2,
        }
    }
}

/// Expiry time of each effect on the game clock. At most one instance of an
/// effect exists; collecting it again only moves the expiry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PowerUpTimers {
    expires_at: [Option<u64>; 3],
}

impl PowerUpTimers {
    pub fn activate(&mut self, kind: PowerUpKind, until_ms: u64) {
        self.expires_at[kind.slot()] = Some(until_ms);
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.expires_at[kind.slot()].is_some()
    }

    pub fn expires_at(&self, kind: PowerUpKind) -> Option<u64> {
        self.expires_at[kind.slot()]
    }

    pub fn remaining_ms(&self, kind: PowerUpKind, now_ms: u64) -> u64 {
        self.expires_at(kind)
            .map(|at| at.saturating_sub(now_ms))
            .unwrap_or(0)
    }

    /// Drop every effect whose expiry has been reached and report which.
    pub fn expire(&mut self, now_ms: u64) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        for kind in PowerUpKind::ALL {
            if let Some(at) = self.expires_at[kind.slot()] {
                if at <= now_ms {
                    self.expires_at[kind.slot()] = None;
                    expired.push(kind);
                }
            }
        }
        expired
    }

    pub fn clear(&mut self) {
        self.expires_at = [None; 3];
    }
}

// ── Player ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub base_speed: f32,
    /// `base_speed`, multiplied while Speed is active.
    pub speed: f32,
    /// Always within `0..=max_lives`.
    pub lives: u32,
    pub power_ups: PowerUpTimers,
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn has(&self, kind: PowerUpKind) -> bool {
        self.power_ups.is_active(kind)
    }
}

// ── Projectiles ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum ProjectileOwner {
    #[default]
    Player,
    Boss,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    pub owner: ProjectileOwner,
}

impl Projectile {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ── Enemies ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum EnemyKind {
    #[default]
    Zombie,
    MiniBoss,
    MegaBoss,
}

impl EnemyKind {
    pub fn is_boss(self) -> bool {
        matches!(self, EnemyKind::MiniBoss | EnemyKind::MegaBoss)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    pub hp: u32,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ── Field items ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PowerUpItem {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub kind: PowerUpKind,
    pub expires_at_ms: u64,
}

impl PowerUpItem {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.size, self.size)
    }
}

// ── Scoring ──────────────────────────────────────────────────────────────────

/// Chain of kills landed within the combo window of each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Combo {
    pub chain: u32,
    pub best: u32,
    pub last_kill_ms: Option<u64>,
}

// ── Master game state ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// The entire simulation state. Owned by the caller and handed by `&mut`
/// to each system; collaborators only read it.
#[derive(Clone, Debug)]
pub struct GameState {
    pub config: GameConfig,
    pub player: Player,
    /// Player-owned projectiles.
    pub bullets: EntityPool<Projectile>,
    /// Boss-owned projectiles.
    pub shards: EntityPool<Projectile>,
    pub enemies: EntityPool<Enemy>,
    pub items: EntityPool<PowerUpItem>,
    pub boss: BossEncounter,
    pub scheduler: Scheduler,

    /// Never decreases during a run.
    pub score: u32,
    /// Starts at 1 and only increases.
    pub level: u32,
    pub kills_this_level: u32,
    /// Quota-counted spawns; never exceeds `kills_to_advance`.
    pub spawned_this_level: u32,
    pub kills_to_advance: u32,
    pub total_kills: u32,
    pub combo: Combo,
    pub next_extra_life_score: u32,

    pub zombie_speed: f32,
    pub spawn_delay_ms: u64,
    pub next_spawn_at_ms: u64,
    pub next_power_up_at_ms: u64,

    pub paused: bool,
    pub boss_active: bool,
    pub status: GameStatus,

    /// Monotonic game clock; frozen while paused.
    pub now_ms: u64,
    pub frame: u64,
    pub fire_latch: bool,
    pub pause_latch: bool,

    /// Notifications raised this tick; cleared at the start of the next.
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Enemies that block level advancement (everything but the mega-boss,
    /// which is tracked through `boss_active`).
    pub fn active_non_boss_enemies(&self) -> usize {
        self.enemies
            .iter()
            .filter(|(_, e)| e.kind != EnemyKind::MegaBoss)
            .count()
    }

    pub fn is_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }
}
