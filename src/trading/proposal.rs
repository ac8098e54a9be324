//! Trade candidate discovery.
//!
//! Two players are a good match when the counterpart offers types the
//! actor protects but the counterpart doesn't (`gain_candidates`), and the
//! actor offers types the counterpart protects (`give_candidates`). When
//! the actor has nothing the counterpart wants, the proposal is still made
//! but marked one-sided: the give side is synthesized during negotiation
//! and the estimate is discounted.

use serde::{Deserialize, Serialize};

use crate::cards::{CardRegistry, CardTypeId};
use crate::core::{Player, PlayerId, TradeConfig};

/// A candidate exchange between `actor` and `counterpart`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TradeProposal {
    pub actor: PlayerId,
    pub counterpart: PlayerId,

    /// Types the actor wants from the counterpart, best first by the
    /// actor's valuation.
    pub gain_candidates: Vec<CardTypeId>,

    /// Types the actor can give that the counterpart protects, best first
    /// by the counterpart's valuation. `None` when undetermined.
    pub give_candidates: Option<Vec<CardTypeId>>,

    /// Sum of the actor's marginal values over `gain_candidates`,
    /// discounted for one-sided proposals.
    pub estimated_value: f64,
}

impl TradeProposal {
    /// The actor has nothing the counterpart prioritizes.
    #[must_use]
    pub fn is_one_sided(&self) -> bool {
        self.give_candidates.is_none()
    }
}

/// Look for a proposal from `actor` to `other`.
///
/// Returns `None` when either holding has fewer than
/// `config.min_distinct_types` open types, or when `other` offers nothing
/// the actor needs.
#[must_use]
pub fn evaluate_offer(
    registry: &CardRegistry,
    config: &TradeConfig,
    actor: &Player,
    other: &Player,
) -> Option<TradeProposal> {
    let actor_open = actor.holding.without_full_sets(registry).distinct_len();
    let other_open = other.holding.without_full_sets(registry).distinct_len();
    if actor_open < config.min_distinct_types || other_open < config.min_distinct_types {
        return None;
    }

    let mut gain: Vec<CardTypeId> = other
        .offer
        .iter()
        .copied()
        .filter(|id| actor.priority.contains(id) && !other.priority.contains(id))
        .collect();
    actor.holding.sort_by_valuation(registry, &mut gain);

    if gain.is_empty() {
        return None;
    }

    let mut give: Vec<CardTypeId> = actor
        .offer
        .iter()
        .copied()
        .filter(|id| other.priority.contains(id) && !gain.contains(id))
        .collect();
    other.holding.sort_by_valuation(registry, &mut give);

    let gain_value: i64 = gain
        .iter()
        .map(|&id| actor.holding.marginal_value(&registry[id]))
        .sum();

    let (give_candidates, estimated_value) = if give.is_empty() {
        (None, gain_value as f64 * config.one_sided_discount)
    } else {
        (Some(give), gain_value as f64)
    };

    Some(TradeProposal {
        actor: actor.id,
        counterpart: other.id,
        gain_candidates: gain,
        give_candidates,
        estimated_value,
    })
}
