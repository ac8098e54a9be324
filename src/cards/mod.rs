//! Card types and the registry that issues their ids.
//!
//! ## Key Types
//!
//! - `CardTypeId`: Identity of a card type; holdings count copies by it
//! - `CardType`: Immutable descriptor (face value, set cap, calamity kind)
//! - `CardSpec`: Catalog entry a `CardType` is registered from
//! - `CardRegistry`: Id and name lookup, calamity `last_owner` tracking

pub mod definition;
pub mod registry;

pub use definition::{CalamityKind, CardSpec, CardType, CardTypeId};
pub use registry::CardRegistry;
