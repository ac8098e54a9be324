//! # empire-trade
//!
//! Card valuation and trade negotiation for civilization trading games.
//!
//! Players collect commodity cards in sets. A set of `n` copies of a card
//! with face value `v` scores `n² · v`, so every player wants more of what
//! they already have. Each round players trade in turn: an actor finds the
//! counterpart whose offer best covers its needs, and the two sides build
//! a value-balanced exchange that either commits whole or not at all.
//! Revealed calamities are capped and ordered for resolution.
//!
//! ## Design Principles
//!
//! 1. **Multisets, not copies**: A holding maps card types to counts. Two
//!    copies of a type are indistinguishable.
//!
//! 2. **Atomic negotiation**: Cards move into staging lists while an
//!    exchange is negotiated. An exchange that cannot be balanced returns
//!    every staged card and leaves both holdings exactly as they were.
//!
//! 3. **Deterministic**: Negotiation depends only on holdings and
//!    thresholds. Random choices (overflow discards, draws) come from seeded
//!    `GameRng` streams.
//!
//! ## Modules
//!
//! - `core`: Players, RNG, configuration, errors
//! - `cards`: Card types and the registry that issues their ids
//! - `holding`: Holdings and their valuation
//! - `trading`: Priority/offer, proposals, negotiation, the round controller
//! - `calamity`: Overflow discard, resolution order, calamity demands

pub mod core;
pub mod cards;
pub mod holding;
pub mod trading;
pub mod calamity;

// Re-export commonly used types
pub use crate::core::{
    CalamityCaps, GameRng, GameRngState, Player, PlayerId, PlayerMap, Result, TradeConfig,
    TradeError,
};

pub use crate::cards::{CalamityKind, CardRegistry, CardSpec, CardType, CardTypeId};

pub use crate::holding::{cards_value, set_value, FillerFilter, Holding, HoldingSummary};

pub use crate::trading::{
    compute_priority_and_offer, evaluate_offer, negotiate, AbortReason, Exchange, RoundSummary,
    StopReason, TradeOutcome, TradeProposal, TradingRound, TradingTable,
};

pub use crate::calamity::{
    calamity_resolution_order, resolve_calamity_overflow, CalamityAssignment, CalamityDemand,
    CalamityOverflow, CalamityResolution, CalamitySelection,
};
