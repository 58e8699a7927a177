//! Game-logic entry points.
//!
//! `tick` advances the whole simulation by one host frame. All randomness
//! comes through the injected `rng`, so a seeded RNG replays a run exactly.

use rand::Rng;
use tracing::trace;

use crate::boss::{self, BossEncounter};
use crate::combat;
use crate::config::{EnemyMovement, GameConfig};
use crate::entities::{
    Combo, EnemyKind, GameState, GameStatus, Player, PowerUpKind, PowerUpTimers, Projectile,
    ProjectileOwner, Rect,
};
use crate::events::GameEvent;
use crate::input::InputSnapshot;
use crate::pool::EntityPool;
use crate::progression;
use crate::schedule::{Scheduler, TimedEvent};
use crate::spawner;

/// Gap between the player sprite and the bottom edge at spawn.
const PLAYER_BOTTOM_GAP: f32 = 20.0;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Fresh level-1 state for `config`.
pub fn init_state(config: GameConfig) -> GameState {
    let player = Player {
        x: config.world_width / 2.0 - config.player_width / 2.0,
        y: config.world_height - config.player_height - PLAYER_BOTTOM_GAP,
        width: config.player_width,
        height: config.player_height,
        base_speed: config.player_speed,
        speed: config.player_speed,
        lives: config.starting_lives.min(config.max_lives),
        power_ups: PowerUpTimers::default(),
    };

    let spawn_delay_ms = progression::spawn_delay_for_level(&config, 1);
    GameState {
        player,
        bullets: EntityPool::with_capacity(config.bullet_capacity),
        shards: EntityPool::with_capacity(config.shard_capacity),
        enemies: EntityPool::with_capacity(config.enemy_capacity),
        items: EntityPool::with_capacity(config.item_capacity),
        boss: BossEncounter::default(),
        scheduler: Scheduler::new(),
        score: 0,
        level: 1,
        kills_this_level: 0,
        spawned_this_level: 0,
        kills_to_advance: progression::quota_for_level(&config, 1),
        total_kills: 0,
        combo: Combo::default(),
        next_extra_life_score: config.extra_life_score,
        zombie_speed: progression::zombie_speed_for_level(&config, 1),
        spawn_delay_ms,
        next_spawn_at_ms: spawn_delay_ms,
        next_power_up_at_ms: config.power_ups.interval_ms,
        paused: false,
        boss_active: false,
        status: GameStatus::Playing,
        now_ms: 0,
        frame: 0,
        fire_latch: false,
        pause_latch: false,
        events: Vec::new(),
        config,
    }
}

/// Throw the run away and start over with the same tuning.
pub fn restart(state: &mut GameState) {
    *state = init_state(state.config.clone());
}

// ── Player actions ───────────────────────────────────────────────────────────

/// Move along `direction` (unit vector, y down) at the current speed and
/// keep the player inside the world.
pub fn move_player(state: &mut GameState, direction: (f32, f32), dt: f32) {
    let max_x = (state.config.world_width - state.player.width).max(0.0);
    let max_y = (state.config.world_height - state.player.height).max(0.0);
    let p = &mut state.player;
    p.x = (p.x + direction.0 * p.speed * dt).clamp(0.0, max_x);
    p.y = (p.y + direction.1 * p.speed * dt).clamp(0.0, max_y);
}

/// Fire one volley: a single bullet, or three with TripleFire. The volley is
/// dropped whole if the bullet pool cannot hold all of it. Returns the
/// number of bullets fired.
pub fn player_fire(state: &mut GameState) -> u32 {
    let spread = state.config.triple_fire_spread;
    let volley = if state.player.has(PowerUpKind::TripleFire) {
        vec![-spread, 0.0, spread]
    } else {
        vec![0.0]
    };
    if state.bullets.available() < volley.len() {
        trace!(active = state.bullets.active_count(), "bullet cap reached");
        return 0;
    }

    let (w, h) = (state.config.bullet_width, state.config.bullet_height);
    let speed = state.config.bullet_speed;
    let muzzle_x = state.player.x + state.player.width / 2.0 - w / 2.0;
    let muzzle_y = state.player.y - h;

    let mut fired = 0;
    for vx in volley {
        let bullet = Projectile {
            x: muzzle_x,
            y: muzzle_y,
            vx,
            vy: -speed,
            width: w,
            height: h,
            owner: ProjectileOwner::Player,
        };
        if state.bullets.acquire(bullet).is_some() {
            fired += 1;
        }
    }
    state.events.push(GameEvent::Fired { bullets: fired });
    fired
}

// ── Per-tick helpers ─────────────────────────────────────────────────────────

fn expire_timers(state: &mut GameState) {
    let now = state.now_ms;
    for kind in state.player.power_ups.expire(now) {
        if kind == PowerUpKind::Speed {
            state.player.speed = state.player.base_speed;
        }
        state.events.push(GameEvent::PowerUpExpired { kind });
    }
    state.items.release_where(|item| item.expires_at_ms <= now);
}

fn run_scheduled(state: &mut GameState, rng: &mut impl Rng) {
    while let Some((due, event)) = state.scheduler.pop_due(state.now_ms) {
        match event {
            TimedEvent::MiniBossSpawn { .. } => spawner::run_timed(state, event, rng),
            _ => boss::run_timed(state, due, event, rng),
        }
    }
}

fn integrate(state: &mut GameState, dt: f32) {
    for (_, b) in state.bullets.iter_mut() {
        b.x += b.vx * dt;
        b.y += b.vy * dt;
    }
    for (_, s) in state.shards.iter_mut() {
        s.x += s.vx * dt;
        s.y += s.vy * dt;
    }

    let pursuit = state.config.enemy_movement == EnemyMovement::Pursuit;
    let target = state.player.rect().center();
    for (_, e) in state.enemies.iter_mut() {
        if e.kind == EnemyKind::MegaBoss {
            continue;
        }
        if pursuit {
            let speed = (e.vx * e.vx + e.vy * e.vy).sqrt();
            (e.vx, e.vy) = spawner::aim(e.rect().center(), target, speed);
        }
        e.x += e.vx * dt;
        e.y += e.vy * dt;
    }

    boss::update_motion(state, dt);
}

/// Release projectiles that have left the world entirely.
fn cull_offscreen(state: &mut GameState) {
    let world = Rect::new(0.0, 0.0, state.config.world_width, state.config.world_height);
    state.bullets.release_where(|b| !b.rect().intersects(&world));
    state.shards.release_where(|s| !s.rect().intersects(&world));
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by `dt_ms` of game time.
///
/// Order within a tick: timers, scheduled callbacks, spawning, player input,
/// motion, off-screen culling, combat, progression. Nothing runs once the
/// game is over, and the clock stands still while paused.
pub fn tick(state: &mut GameState, input: &InputSnapshot, dt_ms: u64, rng: &mut impl Rng) {
    state.events.clear();
    if state.is_over() {
        return;
    }

    if input.pause && !state.pause_latch {
        state.paused = !state.paused;
        state.events.push(if state.paused {
            GameEvent::Paused
        } else {
            GameEvent::Resumed
        });
    }
    state.pause_latch = input.pause;
    if state.paused {
        state.fire_latch = input.fire;
        return;
    }

    state.now_ms += dt_ms;
    state.frame += 1;
    let dt = dt_ms as f32 / 1000.0;

    expire_timers(state);
    run_scheduled(state, rng);
    spawner::update(state, rng);

    move_player(state, input.direction(), dt);
    if input.fire && !state.fire_latch {
        player_fire(state);
    }
    state.fire_latch = input.fire;

    integrate(state, dt);
    cull_offscreen(state);

    combat::resolve(state);

    if !state.is_over() {
        progression::check_advance(state, rng);
    }
    progression::decay_combo(state);
}
