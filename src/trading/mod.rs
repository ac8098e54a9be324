//! The trading economy.
//!
//! ## Flow
//!
//! 1. `offer`: each player derives the types they protect (priority) and
//!    the types they are willing to trade (offer) from their holding.
//! 2. `proposal`: an actor looks for counterparts whose offer covers its
//!    priority, and estimates what each match is worth.
//! 3. `negotiation`: the best proposal is turned into a balanced exchange,
//!    staged card by card and committed or rolled back as a whole.
//! 4. `round`: a FIFO controller repeats this until nobody can trade.
//!
//! `TradingTable` in `table` owns the players and registry and exposes the
//! whole flow to the orchestrator.

pub mod negotiation;
pub mod offer;
pub mod proposal;
pub mod round;
pub mod table;

pub use negotiation::{negotiate, AbortReason, Exchange, FillStage, StagedCards, TradeOutcome};
pub use offer::{compute_priority_and_offer, priority_and_offer};
pub use proposal::{evaluate_offer, TradeProposal};
pub use round::{RoundSummary, StepOutcome, StopReason, TradingRound};
pub use table::TradingTable;
