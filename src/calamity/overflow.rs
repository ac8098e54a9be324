//! Overflow discard for revealed calamities.
//!
//! A holder keeps at most `caps.major` major calamities and at most
//! `caps.total` calamities overall. Excess majors are discarded first, at
//! random among the majors; then, if the combined pool is still too large,
//! random cards from the combined pool go until the total cap holds.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cards::{CardRegistry, CardTypeId};
use crate::core::{CalamityCaps, GameRng};

/// Retained and discarded calamities after enforcing the caps.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalamityOverflow {
    pub retained: Vec<CardTypeId>,
    pub discarded: Vec<CardTypeId>,
}

impl CalamityOverflow {
    /// Number of retained major calamities.
    #[must_use]
    pub fn retained_majors(&self, registry: &CardRegistry) -> usize {
        self.retained
            .iter()
            .filter(|&&id| registry[id].is_major_calamity())
            .count()
    }
}

/// Enforce `caps` on the calamities a holder revealed.
///
/// Non-calamity ids in `revealed` are ignored.
pub fn resolve_calamity_overflow(
    registry: &CardRegistry,
    revealed: &[CardTypeId],
    caps: CalamityCaps,
    rng: &mut GameRng,
) -> CalamityOverflow {
    let (mut majors, minors): (Vec<CardTypeId>, Vec<CardTypeId>) = revealed
        .iter()
        .copied()
        .filter(|&id| {
            let is_calamity = registry[id].is_calamity();
            if !is_calamity {
                warn!(card = %registry[id], "ignoring non-calamity in revealed calamities");
            }
            is_calamity
        })
        .partition(|&id| registry[id].is_major_calamity());

    let mut discarded = Vec::new();
    discard_excess(&mut majors, caps.major, rng, &mut discarded);

    let mut retained = majors;
    retained.extend(minors);
    discard_excess(&mut retained, caps.total, rng, &mut discarded);

    if !discarded.is_empty() {
        debug!(
            retained = retained.len(),
            discarded = discarded.len(),
            "calamity overflow discarded"
        );
    }

    CalamityOverflow {
        retained,
        discarded,
    }
}

fn discard_excess(
    pool: &mut Vec<CardTypeId>,
    cap: usize,
    rng: &mut GameRng,
    discarded: &mut Vec<CardTypeId>,
) {
    while pool.len() > cap {
        let Some(index) = rng.choose_index(pool.len()) else {
            break;
        };
        discarded.push(pool.remove(index));
    }
}
