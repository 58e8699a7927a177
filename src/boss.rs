//! Mega-boss encounter.
//!
//! ```text
//! Dormant ─▶ Entering ─▶ Shielded ◀──▶ Vulnerable
//!                            │              │
//!                            └──▶ Defeated ◀┘   (once hits reach the threshold)
//! ```
//!
//! The boss body lives in the enemy pool as an [`EnemyKind::MegaBoss`]
//! whose hp mirrors the hits still needed. Phase changes, shard bursts and
//! dashes are [`TimedEvent`]s stamped with the encounter id; a stale one is
//! discarded when it fires.

use std::f32::consts::FRAC_PI_2;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::entities::{Enemy, EnemyKind, GameState, Projectile, ProjectileOwner};
use crate::events::GameEvent;
use crate::pool::Handle;
use crate::progression;
use crate::schedule::TimedEvent;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum BossPhase {
    #[default]
    Dormant,
    Entering,
    Shielded,
    Vulnerable,
    Defeated,
}

impl BossPhase {
    /// Only a Vulnerable boss takes damage; every other phase absorbs hits.
    pub fn accepts_damage(self) -> bool {
        self == BossPhase::Vulnerable
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BossEncounter {
    /// Bumped at the start of every encounter; doubles as the callback token.
    pub encounter: u64,
    pub phase: BossPhase,
    pub handle: Option<Handle>,
    pub hits: u32,
    pub required_hits: u32,
    pub phase_started_at_ms: u64,
    pub phase_ends_at_ms: u64,
    pub bursts_fired: u32,
}

impl BossEncounter {
    pub fn remaining_hits(&self) -> u32 {
        self.required_hits.saturating_sub(self.hits)
    }
}

/// Bring the mega-boss in at top centre and suspend normal spawning.
pub fn start_encounter(state: &mut GameState) {
    let cfg = state.config.mega_boss.clone();
    let now = state.now_ms;

    let x = (state.config.world_width - cfg.width) / 2.0;
    let entry_secs = cfg.entry_ms as f32 / 1000.0;
    let (y, vy) = if entry_secs > 0.0 {
        (-cfg.height, (cfg.station_y + cfg.height) / entry_secs)
    } else {
        (cfg.station_y, 0.0)
    };

    let Some(handle) = state.enemies.acquire(Enemy {
        x,
        y,
        vx: 0.0,
        vy,
        width: cfg.width,
        height: cfg.height,
        hp: cfg.required_hits,
        kind: EnemyKind::MegaBoss,
    }) else {
        warn!(level = state.level, "enemy pool full, mega-boss encounter skipped");
        return;
    };

    let boss = &mut state.boss;
    boss.encounter += 1;
    boss.handle = Some(handle);
    boss.hits = 0;
    boss.required_hits = cfg.required_hits;
    boss.bursts_fired = 0;
    state.boss_active = true;

    debug!(
        encounter = state.boss.encounter,
        level = state.level,
        "mega-boss encounter started"
    );
    enter_phase(state, BossPhase::Entering, now);
}

fn phase_duration(state: &GameState, phase: BossPhase) -> Option<u64> {
    let cfg = &state.config.mega_boss;
    match phase {
        BossPhase::Entering => Some(cfg.entry_ms),
        BossPhase::Shielded => Some(cfg.shield_ms),
        BossPhase::Vulnerable => Some(cfg.vulnerable_ms),
        BossPhase::Dormant | BossPhase::Defeated => None,
    }
}

fn enter_phase(state: &mut GameState, phase: BossPhase, start_ms: u64) {
    let encounter = state.boss.encounter;
    state.boss.phase = phase;
    state.boss.phase_started_at_ms = start_ms;

    if let Some(duration) = phase_duration(state, phase) {
        let ends = start_ms + duration;
        state.boss.phase_ends_at_ms = ends;
        state
            .scheduler
            .at(ends, TimedEvent::BossPhaseEnd { encounter, phase });
    }

    match phase {
        BossPhase::Shielded => {
            set_boss_velocity(state, 0.0, 0.0);
            state
                .scheduler
                .at(start_ms, TimedEvent::ShardBurst { encounter });
        }
        BossPhase::Vulnerable => {
            let interval = state.config.mega_boss.dash_interval_ms;
            state
                .scheduler
                .at(start_ms + interval, TimedEvent::BossDash { encounter });
        }
        _ => {}
    }

    debug!(encounter, ?phase, at_ms = start_ms, "boss phase");
    state.events.push(GameEvent::BossPhaseChanged { phase });
}

fn set_boss_velocity(state: &mut GameState, vx: f32, vy: f32) {
    if let Some(boss) = state.boss.handle.and_then(|h| state.enemies.get_mut(h)) {
        boss.vx = vx;
        boss.vy = vy;
    }
}

/// True while `encounter` is the live fight and its body still exists.
fn is_current(state: &GameState, encounter: u64) -> bool {
    state.boss_active
        && state.boss.encounter == encounter
        && state
            .boss
            .handle
            .is_some_and(|h| state.enemies.is_active(h))
}

/// Apply a boss-owned timed event that fell due at `due_ms`.
pub fn run_timed(state: &mut GameState, due_ms: u64, event: TimedEvent, rng: &mut impl Rng) {
    match event {
        TimedEvent::BossPhaseEnd { encounter, phase } => {
            if !is_current(state, encounter) || state.boss.phase != phase {
                debug!(encounter, ?phase, "stale boss phase timer dropped");
                return;
            }
            match phase {
                BossPhase::Entering => {
                    let station = state.config.mega_boss.station_y;
                    if let Some(boss) = state.boss.handle.and_then(|h| state.enemies.get_mut(h)) {
                        boss.y = station;
                        boss.vy = 0.0;
                    }
                    enter_phase(state, BossPhase::Shielded, due_ms);
                }
                BossPhase::Shielded => enter_phase(state, BossPhase::Vulnerable, due_ms),
                BossPhase::Vulnerable => enter_phase(state, BossPhase::Shielded, due_ms),
                BossPhase::Dormant | BossPhase::Defeated => {}
            }
        }
        TimedEvent::ShardBurst { encounter } => {
            if !is_current(state, encounter) || state.boss.phase != BossPhase::Shielded {
                return;
            }
            fire_burst(state);
            let next = due_ms + state.config.mega_boss.burst_interval_ms;
            if next < state.boss.phase_ends_at_ms {
                state.scheduler.at(next, TimedEvent::ShardBurst { encounter });
            }
        }
        TimedEvent::BossDash { encounter } => {
            if !is_current(state, encounter) || state.boss.phase != BossPhase::Vulnerable {
                return;
            }
            let speed = state.config.mega_boss.dash_speed;
            let vx = if rng.gen_bool(0.5) { speed } else { -speed };
            set_boss_velocity(state, vx, 0.0);
            let next = due_ms + state.config.mega_boss.dash_interval_ms;
            if next < state.boss.phase_ends_at_ms {
                state.scheduler.at(next, TimedEvent::BossDash { encounter });
            }
        }
        TimedEvent::MiniBossSpawn { .. } => {}
    }
}

/// Angles (radians, y down) of `count` shards spread evenly across
/// `arc_degrees`, centred on straight down.
pub fn shard_angles(count: u32, arc_degrees: f32) -> Vec<f32> {
    if count <= 1 {
        return vec![FRAC_PI_2];
    }
    let arc = arc_degrees.to_radians();
    let start = FRAC_PI_2 - arc / 2.0;
    let step = arc / (count - 1) as f32;
    (0..count).map(|i| start + step * i as f32).collect()
}

/// Emit one radial fan of shards from the boss' lower edge. Shards that do
/// not fit in the pool are dropped. Returns how many were spawned.
pub fn fire_burst(state: &mut GameState) -> u32 {
    let Some(body) = state
        .boss
        .handle
        .and_then(|h| state.enemies.get(h))
        .map(|e| e.rect())
    else {
        return 0;
    };
    let cfg = &state.config.mega_boss;
    let size = cfg.shard_size;
    let speed = cfg.shard_base_speed + cfg.shard_speed_step * state.level as f32;
    let origin_x = body.x + body.w / 2.0 - size / 2.0;
    let origin_y = body.y + body.h - size / 2.0;

    let mut spawned = 0;
    for angle in shard_angles(cfg.shards_per_burst, cfg.arc_degrees) {
        let shard = Projectile {
            x: origin_x,
            y: origin_y,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            width: size,
            height: size,
            owner: ProjectileOwner::Boss,
        };
        if state.shards.acquire(shard).is_none() {
            trace!("shard pool exhausted");
            break;
        }
        spawned += 1;
    }
    state.boss.bursts_fired += 1;
    spawned
}

/// A player bullet struck the boss body; the bullet is already consumed.
pub fn register_hit(state: &mut GameState, handle: Handle) {
    if state.boss.handle != Some(handle) || !state.boss_active {
        return;
    }
    if !state.boss.phase.accepts_damage() {
        state.events.push(GameEvent::HitAbsorbed);
        return;
    }

    state.boss.hits += 1;
    let remaining = state.boss.remaining_hits();
    if let Some(body) = state.enemies.get_mut(handle) {
        body.hp = remaining;
    }
    state.events.push(GameEvent::Hit { is_boss: true });

    if remaining == 0 {
        defeat(state);
    }
}

/// Tear the encounter down: shards gone, body gone, spawning resumes.
pub fn defeat(state: &mut GameState) {
    if !state.boss_active {
        return;
    }
    state
        .shards
        .release_where(|p| p.owner == ProjectileOwner::Boss);
    if let Some(handle) = state.boss.handle.take() {
        state.enemies.release(handle);
    }
    state.boss.phase = BossPhase::Defeated;
    state.boss_active = false;
    state.next_spawn_at_ms = state.now_ms + state.spawn_delay_ms;

    let bonus = state.config.mega_boss.defeat_bonus;
    progression::award_kill(state, EnemyKind::MegaBoss, bonus);

    debug!(
        encounter = state.boss.encounter,
        hits = state.boss.hits,
        "mega-boss defeated"
    );
    state
        .events
        .push(GameEvent::BossPhaseChanged { phase: BossPhase::Defeated });
    state.events.push(GameEvent::BossDefeated { bonus });
}

/// Move the boss body: descent while Entering, lateral dashes bouncing off
/// the side walls while Vulnerable.
pub fn update_motion(state: &mut GameState, dt: f32) {
    let width = state.config.world_width;
    let Some(boss) = state.boss.handle.and_then(|h| state.enemies.get_mut(h)) else {
        return;
    };
    boss.x += boss.vx * dt;
    boss.y += boss.vy * dt;

    let max_x = (width - boss.width).max(0.0);
    if boss.x < 0.0 {
        boss.x = 0.0;
        boss.vx = boss.vx.abs();
    } else if boss.x > max_x {
        boss.x = max_x;
        boss.vx = -boss.vx.abs();
    }
}
