//! Core engine types: players, RNG, configuration, errors.

pub mod config;
pub mod error;
pub mod player;
pub mod rng;

pub use config::{CalamityCaps, TradeConfig};
pub use error::{Result, TradeError};
pub use player::{Player, PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
