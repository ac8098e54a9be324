//! Revealed calamities: overflow discard, resolution order, and the demands
//! each calamity makes of its victim.

pub mod ordering;
pub mod overflow;
pub mod resolution;

pub use ordering::{calamity_resolution_order, resolution_key};
pub use overflow::{resolve_calamity_overflow, CalamityOverflow};
pub use resolution::{
    CalamityAssignment, CalamityDemand, CalamityResolution, CalamitySelection,
    BANDITRY_DISCARDS, BANDITRY_PREVENTION_COST, CORRUPTION_BASE_VALUE,
};
