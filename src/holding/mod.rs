//! Holdings: per-player multisets of card types and their valuation.
//!
//! - `multiset`: the `Holding` container, reveal and random draw
//! - `valuation`: set value, marginal value, total value, filler lookups
//! - `summary`: value-sorted rows for display

pub mod multiset;
pub mod summary;
pub mod valuation;

pub use multiset::Holding;
pub use summary::{HoldingRow, HoldingSummary};
pub use valuation::{cards_value, set_value, FillerFilter, ValuationKey};
