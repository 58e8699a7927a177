//! Per-tick overlap resolution.
//!
//! Each pass walks the active pairs of two pools in slot order. Whatever a
//! pass destroys is released immediately, so later pairs in the same tick
//! never see it: the first hit processed wins.

use crate::boss;
use crate::entities::{EnemyKind, GameState, PowerUpKind, Projectile};
use crate::events::GameEvent;
use crate::pool::Handle;
use crate::progression;

/// Run every pass in order, stopping early if the game ends mid-tick.
pub fn resolve(state: &mut GameState) {
    let passes: [fn(&mut GameState); 6] = [
        bullets_vs_enemies,
        bullets_vs_shards,
        player_vs_enemies,
        player_vs_shards,
        player_vs_items,
        enemies_past_bottom,
    ];
    for pass in passes {
        if state.is_over() {
            break;
        }
        pass(state);
    }
}

// ── Bullets ──────────────────────────────────────────────────────────────────

pub fn bullets_vs_enemies(state: &mut GameState) {
    for bullet in state.bullets.handles() {
        let Some(rect) = state.bullets.get(bullet).map(Projectile::rect) else {
            continue;
        };
        let target = state
            .enemies
            .iter()
            .find(|(_, e)| e.rect().intersects(&rect))
            .map(|(h, e)| (h, e.kind));
        let Some((enemy, kind)) = target else {
            continue;
        };

        // The bullet is spent even when a shield swallows the hit.
        state.bullets.release(bullet);
        match kind {
            EnemyKind::MegaBoss => boss::register_hit(state, enemy),
            EnemyKind::Zombie | EnemyKind::MiniBoss => damage_enemy(state, enemy),
        }
    }
}

fn damage_enemy(state: &mut GameState, handle: Handle) {
    let Some(enemy) = state.enemies.get_mut(handle) else {
        return;
    };
    enemy.hp = enemy.hp.saturating_sub(1);
    let (hp, kind) = (enemy.hp, enemy.kind);
    state.events.push(GameEvent::Hit {
        is_boss: kind.is_boss(),
    });

    if hp == 0 {
        state.enemies.release(handle);
        let points = if kind.is_boss() {
            state.config.score_boss
        } else {
            state.config.score_normal
        };
        progression::award_kill(state, kind, points);
    }
}

/// Player bullets and boss shards cancel each other out.
pub fn bullets_vs_shards(state: &mut GameState) {
    for bullet in state.bullets.handles() {
        let Some(rect) = state.bullets.get(bullet).map(Projectile::rect) else {
            continue;
        };
        let shard = state
            .shards
            .iter()
            .find(|(_, s)| s.rect().intersects(&rect))
            .map(|(h, _)| h);
        if let Some(shard) = shard {
            state.bullets.release(bullet);
            state.shards.release(shard);
        }
    }
}

// ── Player ───────────────────────────────────────────────────────────────────

/// Shield soaks the contact, otherwise it costs a life. Either way the
/// hazard is gone.
fn take_contact(state: &mut GameState) {
    if state.player.has(PowerUpKind::Shield) {
        state.events.push(GameEvent::ShieldBlocked);
    } else {
        progression::lose_life(state);
    }
}

/// The mega-boss body is not a contact hazard; its shards are.
pub fn player_vs_enemies(state: &mut GameState) {
    let player = state.player.rect();
    let touching: Vec<Handle> = state
        .enemies
        .iter()
        .filter(|(_, e)| e.kind != EnemyKind::MegaBoss && e.rect().intersects(&player))
        .map(|(h, _)| h)
        .collect();

    for enemy in touching {
        if state.is_over() {
            break;
        }
        if state.enemies.release(enemy) {
            take_contact(state);
        }
    }
}

pub fn player_vs_shards(state: &mut GameState) {
    let player = state.player.rect();
    let touching: Vec<Handle> = state
        .shards
        .iter()
        .filter(|(_, s)| s.rect().intersects(&player))
        .map(|(h, _)| h)
        .collect();

    for shard in touching {
        if state.is_over() {
            break;
        }
        if state.shards.release(shard) {
            take_contact(state);
        }
    }
}

pub fn player_vs_items(state: &mut GameState) {
    let player = state.player.rect();
    let touching: Vec<(Handle, PowerUpKind)> = state
        .items
        .iter()
        .filter(|(_, item)| item.rect().intersects(&player))
        .map(|(h, item)| (h, item.kind))
        .collect();

    for (item, kind) in touching {
        if state.items.release(item) {
            apply_power_up(state, kind);
        }
    }
}

/// Start (or restart) a timed effect. Collecting an effect that is already
/// running only pushes its expiry out.
pub fn apply_power_up(state: &mut GameState, kind: PowerUpKind) {
    let until = state.now_ms + state.config.power_ups.duration_ms;
    state.player.power_ups.activate(kind, until);
    if kind == PowerUpKind::Speed {
        state.player.speed = state.player.base_speed * state.config.power_ups.speed_multiplier;
    }
    state.events.push(GameEvent::PowerUpCollected { kind });
}

// ── Boundary ─────────────────────────────────────────────────────────────────

/// Enemies that slip past the bottom edge cost a life. Ones already
/// destroyed earlier in the tick are no longer active and are not counted.
pub fn enemies_past_bottom(state: &mut GameState) {
    let floor = state.config.world_height;
    let breached: Vec<Handle> = state
        .enemies
        .iter()
        .filter(|(_, e)| e.kind != EnemyKind::MegaBoss && e.y >= floor)
        .map(|(h, _)| h)
        .collect();

    for enemy in breached {
        if state.is_over() {
            break;
        }
        if state.enemies.release(enemy) {
            state.events.push(GameEvent::EnemyBreached);
            progression::lose_life(state);
        }
    }
}
