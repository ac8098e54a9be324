//! Priority and offer computation.
//!
//! A player protects the smallest value-ranked prefix of their open
//! (non-complete) types whose set values reach `priority_threshold` of the
//! open holding's total value. Everything offerable is listed in the offer,
//! protected or not; negotiation never hands over protected types as
//! filler, and proposals only ask for types the counterpart doesn't
//! protect.

use rustc_hash::FxHashSet;

use crate::cards::{CardRegistry, CardTypeId};
use crate::core::Player;
use crate::holding::Holding;

/// Derive the priority set and offer list of `holding`.
#[must_use]
pub fn priority_and_offer(
    registry: &CardRegistry,
    holding: &Holding,
    threshold: f64,
) -> (FxHashSet<CardTypeId>, Vec<CardTypeId>) {
    let open = holding.without_full_sets(registry);
    let target = threshold * open.total_value(registry) as f64;

    let mut ranked: Vec<CardTypeId> = open.types().collect();
    open.sort_by_valuation(registry, &mut ranked);

    let mut priority = FxHashSet::default();
    let mut rolling_sum = 0i64;
    for id in ranked.into_iter().filter(|&id| registry[id].tradeable) {
        priority.insert(id);
        rolling_sum += open.set_value(&registry[id]);
        if rolling_sum as f64 >= target {
            break;
        }
    }

    let mut offer: Vec<CardTypeId> = open
        .types()
        .filter(|&id| registry[id].offerable)
        .collect();
    offer.sort_by(|&a, &b| {
        let (a, b) = (&registry[a], &registry[b]);
        b.face_value.cmp(&a.face_value).then_with(|| a.name.cmp(&b.name))
    });

    (priority, offer)
}

/// Recompute `player.priority` and `player.offer` from their holding.
pub fn compute_priority_and_offer(registry: &CardRegistry, player: &mut Player) {
    let (priority, offer) =
        priority_and_offer(registry, &player.holding, player.priority_threshold);
    player.priority = priority;
    player.offer = offer;
}
