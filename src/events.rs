//! Notifications raised during a tick for audio, glow and HUD collaborators.
//! Nothing in the core waits on them.

use serde::Serialize;

use crate::boss::BossPhase;
use crate::entities::{EnemyKind, PowerUpKind};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum GameEvent {
    /// A player bullet connected and did damage.
    Hit { is_boss: bool },
    /// A bullet struck a boss whose shield swallowed it.
    HitAbsorbed,
    EnemyKilled { kind: EnemyKind, points: u32 },
    /// The player volley left the gun.
    Fired { bullets: u32 },
    PlayerHit { lives_left: u32 },
    /// The Shield power-up soaked a collision.
    ShieldBlocked,
    /// An enemy got past the bottom of the screen.
    EnemyBreached,
    PowerUpCollected { kind: PowerUpKind },
    PowerUpExpired { kind: PowerUpKind },
    ComboBonus { chain: u32, points: u32 },
    ExtraLife { lives: u32 },
    BossPhaseChanged { phase: BossPhase },
    BossDefeated { bonus: u32 },
    LevelUp { level: u32, background: &'static str },
    GameOver { score: u32 },
    Paused,
    Resumed,
}
