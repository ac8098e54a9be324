//! Error types for table setup and configuration.
//!
//! Negotiation never produces these: a trade that cannot be balanced is a
//! normal outcome (see `trading::TradeOutcome`). Errors are reserved for
//! malformed catalogs, invalid configuration and holdings that cannot
//! satisfy an explicit removal request.

use thiserror::Error;

use super::player::PlayerId;
use crate::cards::CardTypeId;

#[derive(Error, Debug)]
pub enum TradeError {
    #[error("Card type already registered: {0}")]
    DuplicateCardType(String),

    #[error("Unknown card type: {0}")]
    UnknownCardType(String),

    #[error("Invalid card spec for {name}: {reason}")]
    InvalidCardSpec { name: String, reason: String },

    #[error("Priority threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Table needs between 1 and 255 players, got {0}")]
    InvalidPlayerCount(usize),

    #[error("No player at seat {0}")]
    UnknownPlayer(PlayerId),

    #[error("Holding has {available} copies of {card}, cannot remove {requested}")]
    InsufficientCopies {
        card: CardTypeId,
        requested: u32,
        available: u32,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TradeError>;
