//! Calamity assignment and the demands each calamity makes of its victim.
//!
//! The set of calamities with automated effects is closed, so it is a
//! plain enum. Everything else is handed back to the operator as
//! `CalamityDemand::Manual`.

use serde::{Deserialize, Serialize};

use crate::cards::{CardRegistry, CardTypeId};
use crate::core::PlayerId;

/// Cards Banditry takes from its victim.
pub const BANDITRY_DISCARDS: u32 = 2;

/// Treasury tokens that save one card from Banditry.
pub const BANDITRY_PREVENTION_COST: u32 = 4;

/// Face value Corruption takes before external modifiers.
pub const CORRUPTION_BASE_VALUE: i64 = 10;

/// How a calamity is resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalamityResolution {
    Banditry,
    Corruption,
    /// No automated effect; the operator resolves it.
    Manual,
}

/// What a calamity requires of its victim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalamityDemand {
    /// Discard `count` cards; each can be kept by paying `prevention_cost`
    /// treasury tokens.
    DiscardCards { count: u32, prevention_cost: u32 },
    /// Discard cards totalling at least `base` face value.
    DiscardFaceValue { base: i64 },
    /// Resolved outside the engine.
    Manual,
}

impl CalamityResolution {
    /// Resolution for the calamity called `name`.
    #[must_use]
    pub fn for_name(name: &str) -> Self {
        match name {
            "Banditry" => CalamityResolution::Banditry,
            "Corruption" => CalamityResolution::Corruption,
            _ => CalamityResolution::Manual,
        }
    }

    #[must_use]
    pub fn demand(self) -> CalamityDemand {
        match self {
            CalamityResolution::Banditry => CalamityDemand::DiscardCards {
                count: BANDITRY_DISCARDS,
                prevention_cost: BANDITRY_PREVENTION_COST,
            },
            CalamityResolution::Corruption => CalamityDemand::DiscardFaceValue {
                base: CORRUPTION_BASE_VALUE,
            },
            CalamityResolution::Manual => CalamityDemand::Manual,
        }
    }
}

/// A retained calamity, awaiting resolution against its victim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalamityAssignment {
    pub calamity: CardTypeId,
    pub victim: PlayerId,
    /// Who the card last moved to in a trade, if it was traded.
    pub last_owner: Option<PlayerId>,
}

impl CalamityAssignment {
    #[must_use]
    pub fn resolution(&self, registry: &CardRegistry) -> CalamityResolution {
        CalamityResolution::for_name(&registry[self.calamity].name)
    }

    #[must_use]
    pub fn demand(&self, registry: &CardRegistry) -> CalamityDemand {
        self.resolution(registry).demand()
    }
}

/// Every retained calamity at the table, in resolution order, plus the
/// overflow that went to the discard pile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalamitySelection {
    pub assignments: Vec<CalamityAssignment>,
    pub discarded: Vec<CardTypeId>,
}
