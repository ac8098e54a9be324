//! Atomic two-party trade negotiation.
//!
//! Negotiation turns a proposal into a concrete exchange. Cards are named
//! alternately (A-B-B-A): the side receiving the more valuable headline
//! card receives first, then gives, gives again if it still can, and the
//! other side is topped up to balance the face values. A final
//! lowest-value card is added to each side.
//!
//! Every card named is removed from its holder immediately and parked in
//! a staging list. If any lookup comes up empty the staging lists are
//! returned to their holders and both holdings are exactly as before; only
//! a fully balanced exchange is committed.
//!
//! Direction is canonicalized once, up front: if the actor's headline gain
//! is worth less than its headline give, the counterpart leads. The
//! procedure below is written for the leading side only.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use super::offer::compute_priority_and_offer;
use crate::cards::{CardRegistry, CardTypeId};
use crate::core::{Player, PlayerId};
use crate::holding::{cards_value, FillerFilter};

/// Cards staged on one side of an exchange.
pub type StagedCards = SmallVec<[CardTypeId; 4]>;

/// Lookup that failed during negotiation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillStage {
    /// Topping up the leading side after the give candidates are named.
    Balance,
    /// Matching the follower's top-up from the leading side.
    Complement,
    /// The closing lowest-value card on either side.
    Final,
}

/// Why a negotiation was rolled back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbortReason {
    /// Nothing to gain.
    NoGainCandidates,
    /// Nothing to give, even after synthesizing the give side.
    NoGiveCandidates,
    /// A candidate was no longer in its holder's hand.
    CandidateNotHeld { card: CardTypeId, holder: PlayerId },
    /// No spare card satisfied a balancing lookup.
    NoFiller { holder: PlayerId, stage: FillStage },
    /// The proposal names the same player twice, or an empty seat.
    InvalidPair { actor: PlayerId, counterpart: PlayerId },
}

/// A committed exchange, from the actor's point of view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub actor: PlayerId,
    pub counterpart: PlayerId,
    /// Cards the actor received.
    pub gained: StagedCards,
    /// Cards the actor handed over.
    pub given: StagedCards,
    /// The counterpart led the negotiation.
    pub reversed: bool,
}

impl Exchange {
    /// Every card that moved, paired with its new holder.
    pub fn transfers(&self) -> impl Iterator<Item = (CardTypeId, PlayerId)> + '_ {
        let to_actor = self.gained.iter().map(move |&card| (card, self.actor));
        let to_counterpart = self.given.iter().map(move |&card| (card, self.counterpart));
        to_actor.chain(to_counterpart)
    }
}

/// Result of a negotiation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeOutcome {
    Committed(Exchange),
    Aborted(AbortReason),
}

impl TradeOutcome {
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, TradeOutcome::Committed(_))
    }

    #[must_use]
    pub fn exchange(&self) -> Option<&Exchange> {
        match self {
            TradeOutcome::Committed(exchange) => Some(exchange),
            TradeOutcome::Aborted(_) => None,
        }
    }
}

/// Negotiate and, if it balances, commit an exchange between `actor` and
/// `counterpart`.
///
/// `gain_candidates` are types the actor wants from the counterpart;
/// `give_candidates` are types the actor offers, or `None` to give from
/// the actor's tradeable commodities, best first for the counterpart.
///
/// On commit both players' priority and offer are recomputed. On abort
/// both holdings are left untouched.
pub fn negotiate(
    registry: &CardRegistry,
    actor: &mut Player,
    counterpart: &mut Player,
    gain_candidates: &[CardTypeId],
    give_candidates: Option<&[CardTypeId]>,
) -> TradeOutcome {
    let actor_id = actor.id;
    let counterpart_id = counterpart.id;

    let Some(&first_gain) = gain_candidates.first() else {
        return TradeOutcome::Aborted(AbortReason::NoGainCandidates);
    };
    let give_candidates: Vec<CardTypeId> = match give_candidates {
        Some(give) => give.to_vec(),
        None => synthesize_give(registry, actor, counterpart, first_gain),
    };
    let Some(&first_give) = give_candidates.first() else {
        debug!(actor = %actor.name, counterpart = %counterpart.name, "nothing to give");
        return TradeOutcome::Aborted(AbortReason::NoGiveCandidates);
    };

    let reversed = registry[first_gain].face_value < registry[first_give].face_value;
    let (lead, follow, lead_gain, lead_give) = if reversed {
        (
            &mut *counterpart,
            &mut *actor,
            give_candidates.as_slice(),
            gain_candidates,
        )
    } else {
        (
            &mut *actor,
            &mut *counterpart,
            gain_candidates,
            give_candidates.as_slice(),
        )
    };

    let mut staging = Staging::new(registry, lead, follow);
    if let Err(reason) = staging.run(lead_gain, lead_give) {
        staging.rollback();
        debug!(
            actor = %actor.name,
            counterpart = %counterpart.name,
            ?reason,
            "negotiation aborted"
        );
        return TradeOutcome::Aborted(reason);
    }

    let (to_lead, to_follow) = staging.commit();
    let (gained, given) = if reversed {
        (to_follow, to_lead)
    } else {
        (to_lead, to_follow)
    };

    debug!(
        actor = %actor.name,
        counterpart = %counterpart.name,
        gained = ?gained,
        given = ?given,
        reversed,
        "trade committed"
    );

    TradeOutcome::Committed(Exchange {
        actor: actor_id,
        counterpart: counterpart_id,
        gained,
        given,
        reversed,
    })
}

/// Give side for a one-sided proposal: the actor's open tradeable
/// commodities other than the headline gain, best first for the
/// counterpart.
fn synthesize_give(
    registry: &CardRegistry,
    actor: &Player,
    counterpart: &Player,
    first_gain: CardTypeId,
) -> Vec<CardTypeId> {
    let mut give: Vec<CardTypeId> = actor
        .holding
        .without_full_sets(registry)
        .types()
        .filter(|&id| id != first_gain)
        .filter(|&id| registry[id].tradeable && registry[id].is_valuable())
        .collect();
    counterpart.holding.sort_by_valuation(registry, &mut give);
    give
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Lead,
    Follow,
}

impl Side {
    fn other(self) -> Side {
        match self {
            Side::Lead => Side::Follow,
            Side::Follow => Side::Lead,
        }
    }
}

/// Provisional card movements between two holdings.
struct Staging<'a> {
    registry: &'a CardRegistry,
    lead: &'a mut Player,
    follow: &'a mut Player,
    /// Taken from `follow`, bound for `lead`.
    to_lead: StagedCards,
    /// Taken from `lead`, bound for `follow`.
    to_follow: StagedCards,
}

impl<'a> Staging<'a> {
    fn new(registry: &'a CardRegistry, lead: &'a mut Player, follow: &'a mut Player) -> Self {
        Self {
            registry,
            lead,
            follow,
            to_lead: StagedCards::new(),
            to_follow: StagedCards::new(),
        }
    }

    fn run(&mut self, gain: &[CardTypeId], give: &[CardTypeId]) -> Result<(), AbortReason> {
        // Lead receives first, then gives.
        self.stage(Side::Follow, gain[0])?;
        self.stage(Side::Lead, give[0])?;

        if let Some(&second_give) = give.get(1) {
            self.stage(Side::Lead, second_give)?;
            let diff = self.value(&self.to_follow) - self.value(&self.to_lead);
            if diff > 0 {
                self.fetch_by_value(Side::Follow, diff, FillStage::Balance)?;
            } else {
                self.fetch_lowest(Side::Follow, FillerFilter::NonNegative, FillStage::Balance)?;
            }
        } else {
            self.fetch_lowest(Side::Follow, FillerFilter::NonNegative, FillStage::Balance)?;
            let diff = self.value(&self.to_lead) - self.value(&self.to_follow);
            self.fetch_by_value(Side::Lead, diff, FillStage::Complement)?;
        }

        self.fetch_lowest(Side::Lead, FillerFilter::Tradeable, FillStage::Final)?;
        self.fetch_lowest(Side::Follow, FillerFilter::Tradeable, FillStage::Final)?;
        Ok(())
    }

    fn holder(&self, side: Side) -> &Player {
        match side {
            Side::Lead => &*self.lead,
            Side::Follow => &*self.follow,
        }
    }

    fn holder_mut(&mut self, side: Side) -> &mut Player {
        match side {
            Side::Lead => &mut *self.lead,
            Side::Follow => &mut *self.follow,
        }
    }

    fn incoming_mut(&mut self, side: Side) -> &mut StagedCards {
        match side {
            Side::Lead => &mut self.to_lead,
            Side::Follow => &mut self.to_follow,
        }
    }

    fn value(&self, cards: &[CardTypeId]) -> i64 {
        cards_value(self.registry, cards)
    }

    fn staged(&self) -> StagedCards {
        self.to_lead
            .iter()
            .chain(self.to_follow.iter())
            .copied()
            .collect()
    }

    /// Move one copy of `card` out of `from`'s holding toward the other side.
    fn stage(&mut self, from: Side, card: CardTypeId) -> Result<(), AbortReason> {
        let holder = self.holder_mut(from);
        if !holder.holding.remove_one(card) {
            return Err(AbortReason::CandidateNotHeld {
                card,
                holder: holder.id,
            });
        }
        trace!(
            card = %self.registry[card],
            from = %self.holder(from).name,
            to = %self.holder(from.other()).name,
            "staged"
        );
        self.incoming_mut(from.other()).push(card);
        Ok(())
    }

    fn fetch_lowest(
        &mut self,
        from: Side,
        filter: FillerFilter,
        stage: FillStage,
    ) -> Result<(), AbortReason> {
        let excluded = self.staged();
        let holder = self.holder(from);
        let card = holder
            .holding
            .lowest_value_type(self.registry, &holder.priority, &excluded, filter)
            .ok_or(AbortReason::NoFiller {
                holder: holder.id,
                stage,
            })?;
        self.stage(from, card)
    }

    fn fetch_by_value(
        &mut self,
        from: Side,
        threshold: i64,
        stage: FillStage,
    ) -> Result<(), AbortReason> {
        let excluded = self.staged();
        let holder = self.holder(from);
        let card = holder
            .holding
            .type_by_value(self.registry, &holder.priority, &excluded, threshold)
            .ok_or(AbortReason::NoFiller {
                holder: holder.id,
                stage,
            })?;
        self.stage(from, card)
    }

    /// Return every staged card to the holding it came from.
    fn rollback(self) {
        self.follow.holding.extend(self.to_lead.iter().copied());
        self.lead.holding.extend(self.to_follow.iter().copied());
    }

    /// Hand every staged card to its new holder and refresh both players.
    fn commit(self) -> (StagedCards, StagedCards) {
        self.lead.holding.extend(self.to_lead.iter().copied());
        self.follow.holding.extend(self.to_follow.iter().copied());
        compute_priority_and_offer(self.registry, self.lead);
        compute_priority_and_offer(self.registry, self.follow);
        (self.to_lead, self.to_follow)
    }
}
