//! Timed creation of zombies, mini-bosses and power-up items.

use rand::Rng;
use tracing::{debug, trace};

use crate::config::EnemyMovement;
use crate::entities::{Enemy, EnemyKind, GameState, PowerUpItem, PowerUpKind};
use crate::pool::Handle;
use crate::schedule::TimedEvent;

/// Velocity of length `speed` pointing from `from` to `to`. Straight down
/// when the points coincide.
pub fn aim(from: (f32, f32), to: (f32, f32), speed: f32) -> (f32, f32) {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist < f32::EPSILON {
        return (0.0, speed);
    }
    (dx / dist * speed, dy / dist * speed)
}

fn random_top_x(state: &GameState, size: f32, rng: &mut impl Rng) -> f32 {
    let max_x = (state.config.world_width - size).max(0.0);
    rng.gen_range(0.0..=max_x)
}

fn initial_velocity(state: &GameState, x: f32, y: f32, size: f32, speed: f32) -> (f32, f32) {
    match state.config.enemy_movement {
        EnemyMovement::Straight => (0.0, speed),
        EnemyMovement::Pursuit => {
            let target = state.player.rect().center();
            aim((x + size / 2.0, y + size / 2.0), target, speed)
        }
    }
}

/// One quota-counted zombie just above the top edge. No-op while paused,
/// during a boss encounter, after game over, or once the quota is spent.
pub fn try_spawn_enemy(state: &mut GameState, rng: &mut impl Rng) -> Option<Handle> {
    if state.paused
        || state.boss_active
        || state.is_over()
        || state.spawned_this_level >= state.kills_to_advance
    {
        return None;
    }

    let size = state.config.zombie_size;
    let x = random_top_x(state, size, rng);
    let y = -size;
    let (vx, vy) = initial_velocity(state, x, y, size, state.zombie_speed);

    let Some(handle) = state.enemies.acquire(Enemy {
        x,
        y,
        vx,
        vy,
        width: size,
        height: size,
        hp: 1,
        kind: EnemyKind::Zombie,
    }) else {
        trace!("enemy pool exhausted");
        return None;
    };
    state.spawned_this_level += 1;
    Some(handle)
}

/// A tougher, slower zombie. Mini-bosses sit outside the spawn quota but
/// still have to be cleared before the level can advance.
pub fn try_spawn_mini_boss(state: &mut GameState, rng: &mut impl Rng) -> Option<Handle> {
    if state.paused || state.boss_active || state.is_over() {
        return None;
    }

    let cfg = &state.config.mini_boss;
    let size = cfg.size;
    let hp = cfg.hp;
    let speed = state.zombie_speed * cfg.speed_factor;
    let x = random_top_x(state, size, rng);
    let y = -size;
    let (vx, vy) = initial_velocity(state, x, y, size, speed);

    let handle = state.enemies.acquire(Enemy {
        x,
        y,
        vx,
        vy,
        width: size,
        height: size,
        hp,
        kind: EnemyKind::MiniBoss,
    });
    if handle.is_some() {
        debug!(level = state.level, "mini-boss arrived");
    }
    handle
}

/// Queue the independently jittered mini-boss arrivals for this level.
pub fn schedule_mini_bosses(state: &mut GameState, rng: &mut impl Rng) {
    let cfg = &state.config.mini_boss;
    let (count, min, max) = (cfg.count, cfg.min_delay_ms, cfg.max_delay_ms);
    let level = state.level;
    for _ in 0..count {
        let delay = rng.gen_range(min..=max);
        state
            .scheduler
            .at(state.now_ms + delay, TimedEvent::MiniBossSpawn { level });
    }
}

/// Handle a delayed mini-boss arrival; ignored if its level has passed.
pub fn run_timed(state: &mut GameState, event: TimedEvent, rng: &mut impl Rng) {
    if let TimedEvent::MiniBossSpawn { level } = event {
        if level != state.level {
            debug!(level, current = state.level, "stale mini-boss spawn dropped");
            return;
        }
        try_spawn_mini_boss(state, rng);
    }
}

/// One item of a uniformly chosen kind at a random interior point.
pub fn try_spawn_power_up(state: &mut GameState, rng: &mut impl Rng) -> Option<Handle> {
    if state.paused || state.is_over() {
        return None;
    }

    let cfg = &state.config.power_ups;
    let size = cfg.item_size;
    let margin = cfg.margin;
    let expires_at_ms = state.now_ms + cfg.item_lifetime_ms;
    let max_x = (state.config.world_width - margin - size).max(margin);
    let max_y = (state.config.world_height - margin - size).max(margin);

    let kind = PowerUpKind::ALL[rng.gen_range(0..PowerUpKind::ALL.len())];
    let x = rng.gen_range(margin..=max_x);
    let y = rng.gen_range(margin..=max_y);

    let handle = state.items.acquire(PowerUpItem {
        x,
        y,
        size,
        kind,
        expires_at_ms,
    });
    if handle.is_none() {
        trace!("item pool exhausted");
    }
    handle
}

/// Fire the periodic spawn timers that have come due.
pub fn update(state: &mut GameState, rng: &mut impl Rng) {
    let now = state.now_ms;
    if now >= state.next_spawn_at_ms {
        try_spawn_enemy(state, rng);
        state.next_spawn_at_ms = now + state.spawn_delay_ms;
    }
    if now >= state.next_power_up_at_ms {
        try_spawn_power_up(state, rng);
        state.next_power_up_at_ms = now + state.config.power_ups.interval_ms;
    }
}
