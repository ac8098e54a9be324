//! Valuation of holdings.
//!
//! A set of `n` copies of a type with face value `v` is worth `n² · v`.
//! The quadratic reward for completing sets is what makes trading
//! worthwhile at all: every card a player collects toward a set is worth
//! more than the one before it.
//!
//! Besides the pure value functions, this module holds the two lookups
//! negotiation uses to balance an exchange: the cheapest card a player can
//! spare, and the cheapest card worth at least a given face value.

use std::cmp::Ordering;

use rustc_hash::FxHashSet;

use super::multiset::Holding;
use crate::cards::{CardRegistry, CardType, CardTypeId};

/// Value of `count` copies of `card_type`.
#[must_use]
pub fn set_value(card_type: &CardType, count: u32) -> i64 {
    let count = i64::from(count);
    count * count * card_type.face_value
}

/// Value ranking used to order trade candidates:
/// marginal value, then set value, then face value, then name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ValuationKey<'a> {
    pub marginal_value: i64,
    pub set_value: i64,
    pub face_value: i64,
    pub name: &'a str,
}

/// Which cards a lowest-value lookup may return.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillerFilter {
    /// Anything tradeable, calamities included.
    Tradeable,
    /// Commodities with a non-negative face value.
    NonNegative,
}

impl FillerFilter {
    fn accepts(self, card_type: &CardType) -> bool {
        match self {
            FillerFilter::Tradeable => card_type.tradeable,
            FillerFilter::NonNegative => card_type.is_filler(),
        }
    }
}

impl Holding {
    /// Set value of the copies of `card_type` held.
    #[must_use]
    pub fn set_value(&self, card_type: &CardType) -> i64 {
        set_value(card_type, self.count(card_type.id))
    }

    /// Value of one more copy of `card_type`.
    ///
    /// Once the set is complete (`max_count` copies or more) further copies
    /// are pointless, and the average value per held copy is returned
    /// instead. A type not held at all is worth nothing to this holder.
    #[must_use]
    pub fn marginal_value(&self, card_type: &CardType) -> i64 {
        let count = self.count(card_type.id);
        if count == 0 {
            return 0;
        }
        let current = set_value(card_type, count);
        if count >= card_type.max_count {
            current / i64::from(count)
        } else {
            set_value(card_type, count + 1) - current
        }
    }

    /// Sum of set values over held commodities with positive face value.
    #[must_use]
    pub fn total_value(&self, registry: &CardRegistry) -> i64 {
        self.iter()
            .map(|(id, count)| (&registry[id], count))
            .filter(|(card_type, _)| card_type.is_valuable())
            .map(|(card_type, count)| set_value(card_type, count))
            .sum()
    }

    /// Whether the set of `card_type` is complete.
    #[must_use]
    pub fn is_full_set(&self, card_type: &CardType) -> bool {
        self.count(card_type.id) >= card_type.max_count
    }

    /// This holding without its completed sets.
    ///
    /// Completed sets cannot be improved and are never traded away, so all
    /// priority, offer and candidate reasoning works on this view.
    #[must_use]
    pub fn without_full_sets(&self, registry: &CardRegistry) -> Holding {
        self.filter(|id, count| count < registry[id].max_count)
    }

    /// Ranking key of `card_type` from this holder's perspective.
    #[must_use]
    pub fn valuation_key<'a>(&self, card_type: &'a CardType) -> ValuationKey<'a> {
        ValuationKey {
            marginal_value: self.marginal_value(card_type),
            set_value: self.set_value(card_type),
            face_value: card_type.face_value,
            name: &card_type.name,
        }
    }

    /// Sort `ids` by this holder's valuation, most valuable first.
    pub fn sort_by_valuation(&self, registry: &CardRegistry, ids: &mut [CardTypeId]) {
        ids.sort_by(|&a, &b| {
            self.valuation_key(&registry[b])
                .cmp(&self.valuation_key(&registry[a]))
        });
    }

    /// Cheapest type this holder can spare.
    ///
    /// Considers types outside completed sets, `protected` and `excluded`
    /// that pass `filter`, and returns the one with the lowest marginal
    /// value (face value, then name break ties).
    #[must_use]
    pub fn lowest_value_type(
        &self,
        registry: &CardRegistry,
        protected: &FxHashSet<CardTypeId>,
        excluded: &[CardTypeId],
        filter: FillerFilter,
    ) -> Option<CardTypeId> {
        self.spare_types_ascending(registry, protected, excluded)
            .into_iter()
            .find(|&id| filter.accepts(&registry[id]))
    }

    /// Cheapest spare type whose face value reaches `threshold`.
    ///
    /// Scans spare non-negative commodities by ascending marginal value and
    /// returns the first with `face_value >= threshold`, or `None` if no
    /// such type exists.
    #[must_use]
    pub fn type_by_value(
        &self,
        registry: &CardRegistry,
        protected: &FxHashSet<CardTypeId>,
        excluded: &[CardTypeId],
        threshold: i64,
    ) -> Option<CardTypeId> {
        self.spare_types_ascending(registry, protected, excluded)
            .into_iter()
            .filter(|&id| registry[id].is_filler())
            .find(|&id| registry[id].face_value >= threshold)
    }

    fn spare_types_ascending(
        &self,
        registry: &CardRegistry,
        protected: &FxHashSet<CardTypeId>,
        excluded: &[CardTypeId],
    ) -> Vec<CardTypeId> {
        let mut spare: Vec<CardTypeId> = self
            .iter()
            .filter(|&(id, count)| count < registry[id].max_count)
            .map(|(id, _)| id)
            .filter(|id| !protected.contains(id) && !excluded.contains(id))
            .collect();
        spare.sort_by(|&a, &b| self.ascending_cost(&registry[a], &registry[b]));
        spare
    }

    fn ascending_cost(&self, a: &CardType, b: &CardType) -> Ordering {
        (self.marginal_value(a), a.face_value, a.name.as_str())
            .cmp(&(self.marginal_value(b), b.face_value, b.name.as_str()))
    }
}

/// Total value of a loose collection of cards, such as one side of a
/// staged exchange.
#[must_use]
pub fn cards_value(registry: &CardRegistry, cards: &[CardTypeId]) -> i64 {
    Holding::from_cards(cards.iter().copied()).total_value(registry)
}
