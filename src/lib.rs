//! Simulation core for a top-down zombie shooter: pooled entities, timed
//! spawning, combat resolution, the mega-boss encounter and level
//! progression. Rendering, audio and input devices are left to the host.

pub mod boss;
pub mod combat;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod events;
pub mod input;
pub mod leaderboard;
pub mod pool;
pub mod progression;
pub mod schedule;
pub mod snapshot;
pub mod spawner;

pub use compute::{init_state, restart, tick};
pub use config::{Difficulty, GameConfig};
pub use entities::GameState;
pub use error::{ConfigError, LeaderboardError};
pub use events::GameEvent;
pub use input::InputSnapshot;
