//! Read-only view of a tick for renderers.
//!
//! The renderer never touches `GameState`; it gets a flat list of sprites
//! keyed by texture name plus the HUD values, copied out once per frame.

use serde::Serialize;

use crate::boss::BossPhase;
use crate::entities::{EnemyKind, GameState, PowerUpKind, Rect};
use crate::progression;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Sprite {
    pub texture: &'static str,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// False while the entity is still outside the world (e.g. a zombie
    /// that has not yet crossed the top edge).
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub remaining_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BossHud {
    pub phase: BossPhase,
    pub hits: u32,
    pub required_hits: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Hud {
    pub score: u32,
    pub level: u32,
    pub lives: u32,
    pub max_lives: u32,
    pub kills_this_level: u32,
    pub kills_to_advance: u32,
    pub combo: u32,
    pub best_combo: u32,
    pub power_ups: Vec<ActivePowerUp>,
    pub boss: Option<BossHud>,
    pub background: &'static str,
    pub paused: bool,
    pub game_over: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub frame: u64,
    pub world_width: f32,
    pub world_height: f32,
    pub sprites: Vec<Sprite>,
    pub hud: Hud,
}

pub fn enemy_texture(kind: EnemyKind, phase: BossPhase) -> &'static str {
    match kind {
        EnemyKind::Zombie => "zombie",
        EnemyKind::MiniBoss => "mini_boss",
        EnemyKind::MegaBoss if phase.accepts_damage() => "mega_boss",
        EnemyKind::MegaBoss => "mega_boss_shielded",
    }
}

pub fn power_up_texture(kind: PowerUpKind) -> &'static str {
    match kind {
        PowerUpKind::Speed => "powerup_speed",
        PowerUpKind::TripleFire => "powerup_triple",
        PowerUpKind::Shield => "powerup_shield",
    }
}

fn sprite(texture: &'static str, rect: Rect, world: &Rect) -> Sprite {
    Sprite {
        texture,
        x: rect.x,
        y: rect.y,
        w: rect.w,
        h: rect.h,
        visible: rect.intersects(world),
    }
}

pub fn build(state: &GameState) -> RenderSnapshot {
    let world = Rect::new(0.0, 0.0, state.config.world_width, state.config.world_height);
    let phase = state.boss.phase;

    let mut sprites = Vec::with_capacity(
        1 + state.enemies.active_count()
            + state.bullets.active_count()
            + state.shards.active_count()
            + state.items.active_count(),
    );

    for (_, item) in state.items.iter() {
        sprites.push(sprite(power_up_texture(item.kind), item.rect(), &world));
    }
    for (_, enemy) in state.enemies.iter() {
        sprites.push(sprite(enemy_texture(enemy.kind, phase), enemy.rect(), &world));
    }
    for (_, bullet) in state.bullets.iter() {
        sprites.push(sprite("bullet", bullet.rect(), &world));
    }
    for (_, shard) in state.shards.iter() {
        sprites.push(sprite("shard", shard.rect(), &world));
    }
    let player_texture = if state.player.has(PowerUpKind::Shield) {
        "player_shielded"
    } else {
        "player"
    };
    sprites.push(sprite(player_texture, state.player.rect(), &world));

    let power_ups = PowerUpKind::ALL
        .into_iter()
        .filter(|&kind| state.player.has(kind))
        .map(|kind| ActivePowerUp {
            kind,
            remaining_ms: state.player.power_ups.remaining_ms(kind, state.now_ms),
        })
        .collect();

    let boss = state.boss_active.then(|| BossHud {
        phase,
        hits: state.boss.hits,
        required_hits: state.boss.required_hits,
    });

    RenderSnapshot {
        frame: state.frame,
        world_width: world.w,
        world_height: world.h,
        sprites,
        hud: Hud {
            score: state.score,
            level: state.level,
            lives: state.player.lives,
            max_lives: state.config.max_lives,
            kills_this_level: state.kills_this_level,
            kills_to_advance: state.kills_to_advance,
            combo: state.combo.chain,
            best_combo: state.combo.best,
            power_ups,
            boss,
            background: progression::background_key(state.level),
            paused: state.paused,
            game_over: state.is_over(),
        },
    }
}
