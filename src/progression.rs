//! Level progression, scoring, lives and the game-over transition.

use rand::Rng;
use tracing::{debug, info};

use crate::boss;
use crate::config::GameConfig;
use crate::entities::{EnemyKind, GameState, GameStatus};
use crate::events::GameEvent;
use crate::spawner;

// ── Difficulty curve ─────────────────────────────────────────────────────────

const BACKGROUNDS: &[&str] = &[
    "bg_street",
    "bg_park",
    "bg_mall",
    "bg_subway",
    "bg_hospital",
    "bg_rooftops",
    "bg_harbor",
    "bg_cemetery",
    "bg_factory",
    "bg_lair",
];

/// Spawns needed to clear `level`.
pub fn quota_for_level(config: &GameConfig, level: u32) -> u32 {
    config.base_quota + config.quota_step * level.saturating_sub(1)
}

pub fn zombie_speed_for_level(config: &GameConfig, level: u32) -> f32 {
    config.base_zombie_speed + config.zombie_speed_step * level.saturating_sub(1) as f32
}

/// Gap between spawns on `level`, shrinking toward the configured floor.
pub fn spawn_delay_for_level(config: &GameConfig, level: u32) -> u64 {
    let shrink = config.spawn_delay_step_ms * level.saturating_sub(1) as u64;
    config
        .base_spawn_delay_ms
        .saturating_sub(shrink)
        .max(config.min_spawn_delay_ms)
}

/// Cosmetic background asset for `level`; cycles through the set.
pub fn background_key(level: u32) -> &'static str {
    BACKGROUNDS[(level.saturating_sub(1) as usize) % BACKGROUNDS.len()]
}

pub fn is_mega_boss_level(config: &GameConfig, level: u32) -> bool {
    level % config.mega_boss.level_modulus == 0
}

/// Mini-boss levels; a mega-boss level takes precedence.
pub fn is_mini_boss_level(config: &GameConfig, level: u32) -> bool {
    level % config.mini_boss.level_modulus == 0 && !is_mega_boss_level(config, level)
}

// ── Level advance ────────────────────────────────────────────────────────────

/// Quota met, field clear of non-boss enemies, no encounter running.
pub fn can_advance(state: &GameState) -> bool {
    !state.is_over()
        && state.spawned_this_level >= state.kills_to_advance
        && state.active_non_boss_enemies() == 0
        && !state.boss_active
}

/// Advance if the current level is finished. Returns whether it did.
pub fn check_advance(state: &mut GameState, rng: &mut impl Rng) -> bool {
    if !can_advance(state) {
        return false;
    }
    advance_level(state, rng);
    true
}

pub fn advance_level(state: &mut GameState, rng: &mut impl Rng) {
    state.level += 1;
    let level = state.level;

    state.kills_this_level = 0;
    state.spawned_this_level = 0;
    state.kills_to_advance = quota_for_level(&state.config, level);
    state.zombie_speed = zombie_speed_for_level(&state.config, level);
    state.spawn_delay_ms = spawn_delay_for_level(&state.config, level);
    state.next_spawn_at_ms = state.now_ms + state.spawn_delay_ms;

    let background = background_key(level);
    debug!(
        level,
        quota = state.kills_to_advance,
        zombie_speed = state.zombie_speed,
        spawn_delay_ms = state.spawn_delay_ms,
        "level up"
    );
    state.events.push(GameEvent::LevelUp { level, background });

    if is_mega_boss_level(&state.config, level) {
        boss::start_encounter(state);
    } else if is_mini_boss_level(&state.config, level) {
        spawner::schedule_mini_bosses(state, rng);
    }
}

// ── Score ────────────────────────────────────────────────────────────────────

/// Add points and hand out any extra lives crossed on the way.
pub fn add_score(state: &mut GameState, points: u32) {
    state.score = state.score.saturating_add(points);

    let step = state.config.extra_life_score;
    if step == 0 {
        return;
    }
    while state.score >= state.next_extra_life_score {
        state.next_extra_life_score = state.next_extra_life_score.saturating_add(step);
        if state.player.lives < state.config.max_lives {
            state.player.lives += 1;
            state.events.push(GameEvent::ExtraLife {
                lives: state.player.lives,
            });
        }
        if state.next_extra_life_score == u32::MAX {
            break;
        }
    }
}

/// Credit a destroyed enemy: counters, combo chain and points.
pub fn award_kill(state: &mut GameState, kind: EnemyKind, points: u32) {
    state.kills_this_level += 1;
    state.total_kills += 1;

    let now = state.now_ms;
    let window = state.config.combo_window_ms;
    let combo = &mut state.combo;
    combo.chain = match combo.last_kill_ms {
        Some(last) if now.saturating_sub(last) <= window => combo.chain + 1,
        _ => 1,
    };
    combo.last_kill_ms = Some(now);
    combo.best = combo.best.max(combo.chain);
    let chain = combo.chain;

    add_score(state, points);
    state.events.push(GameEvent::EnemyKilled { kind, points });

    let step = state.config.combo_step;
    if step > 0 && chain % step == 0 {
        let bonus = state.config.combo_bonus;
        add_score(state, bonus);
        state.events.push(GameEvent::ComboBonus {
            chain,
            points: bonus,
        });
    }
}

/// Break the chain once the window since the last kill has lapsed.
pub fn decay_combo(state: &mut GameState) {
    if let Some(last) = state.combo.last_kill_ms {
        if state.now_ms.saturating_sub(last) > state.config.combo_window_ms {
            state.combo.chain = 0;
            state.combo.last_kill_ms = None;
        }
    }
}

// ── Lives ────────────────────────────────────────────────────────────────────

pub fn lose_life(state: &mut GameState) {
    if state.is_over() {
        return;
    }
    state.player.lives = state.player.lives.saturating_sub(1);
    state.events.push(GameEvent::PlayerHit {
        lives_left: state.player.lives,
    });
    if state.player.lives == 0 {
        game_over(state);
    }
}

/// Freeze the run and surface the final score.
pub fn game_over(state: &mut GameState) {
    if state.is_over() {
        return;
    }
    state.status = GameStatus::GameOver;
    info!(
        score = state.score,
        level = state.level,
        kills = state.total_kills,
        "game over"
    );
    state.events.push(GameEvent::GameOver { score: state.score });
}
