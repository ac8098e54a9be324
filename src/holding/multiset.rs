//! A player's hand of trade cards as a multiset.
//!
//! `Holding` maps `CardTypeId -> count`. Entries never hold a zero count,
//! so two holdings with the same copies compare equal no matter how they
//! got there. That is what makes negotiation rollback exact.
//!
//! Backed by `im::OrdMap`: cloning is O(1), and iteration is ordered by id,
//! so every scan over a holding is deterministic.

use im::OrdMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::cards::{CardRegistry, CardTypeId};
use crate::core::{GameRng, Result, TradeError};

/// Multiset of card types.
///
/// ```
/// use empire_trade::cards::CardTypeId;
/// use empire_trade::holding::Holding;
///
/// let wheat = CardTypeId::new(0);
/// let mut holding = Holding::new();
/// holding.add(wheat);
/// holding.add(wheat);
///
/// assert_eq!(holding.count(wheat), 2);
/// assert!(holding.remove_one(wheat));
/// assert_eq!(holding.len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    #[serde(deserialize_with = "nonzero_counts")]
    counts: OrdMap<CardTypeId, u32>,
}

/// Drops zero entries from a serialized holding.
fn nonzero_counts<'de, D>(
    deserializer: D,
) -> std::result::Result<OrdMap<CardTypeId, u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let counts = OrdMap::<CardTypeId, u32>::deserialize(deserializer)?;
    Ok(counts.into_iter().filter(|&(_, count)| count > 0).collect())
}

impl Holding {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(type, count)` pairs. Repeated types accumulate.
    pub fn from_counts(counts: impl IntoIterator<Item = (CardTypeId, u32)>) -> Self {
        let mut holding = Self::new();
        for (id, count) in counts {
            holding.add_copies(id, count);
        }
        holding
    }

    /// Build from individual copies.
    pub fn from_cards(cards: impl IntoIterator<Item = CardTypeId>) -> Self {
        let mut holding = Self::new();
        holding.extend(cards);
        holding
    }

    /// Copies of `id` held.
    #[must_use]
    pub fn count(&self, id: CardTypeId) -> u32 {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn contains(&self, id: CardTypeId) -> bool {
        self.counts.contains_key(&id)
    }

    /// Total number of physical copies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.values().map(|&c| c as usize).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of distinct types held.
    #[must_use]
    pub fn distinct_len(&self) -> usize {
        self.counts.len()
    }

    pub fn add(&mut self, id: CardTypeId) {
        self.add_copies(id, 1);
    }

    pub fn add_copies(&mut self, id: CardTypeId, copies: u32) {
        if copies == 0 {
            return;
        }
        *self.counts.entry(id).or_insert(0) += copies;
    }

    /// Remove one copy. Returns `false` if none was held.
    pub fn remove_one(&mut self, id: CardTypeId) -> bool {
        match self.counts.get(&id).copied() {
            Some(1) => {
                self.counts.remove(&id);
                true
            }
            Some(0) | None => false,
            Some(count) => {
                self.counts.insert(id, count - 1);
                true
            }
        }
    }

    /// Remove `copies` copies, or nothing if fewer are held.
    pub fn remove_copies(&mut self, id: CardTypeId, copies: u32) -> Result<()> {
        let available = self.count(id);
        if available < copies {
            return Err(TradeError::InsufficientCopies {
                card: id,
                requested: copies,
                available,
            });
        }
        if available == copies {
            self.counts.remove(&id);
        } else {
            self.counts.insert(id, available - copies);
        }
        Ok(())
    }

    /// Remove every copy of `id`, returning how many there were.
    pub fn remove_all(&mut self, id: CardTypeId) -> u32 {
        self.counts.remove(&id).unwrap_or(0)
    }

    /// Iterate over `(type, count)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (CardTypeId, u32)> + '_ {
        self.counts.iter().map(|(&id, &count)| (id, count))
    }

    /// Iterate over distinct types in id order.
    pub fn types(&self) -> impl Iterator<Item = CardTypeId> + '_ {
        self.counts.keys().copied()
    }

    /// Iterate over every copy, each type repeated by its count.
    pub fn cards(&self) -> impl Iterator<Item = CardTypeId> + '_ {
        self.iter()
            .flat_map(|(id, count)| std::iter::repeat(id).take(count as usize))
    }

    /// Keep only the types matching `keep`.
    #[must_use]
    pub fn filter(&self, mut keep: impl FnMut(CardTypeId, u32) -> bool) -> Holding {
        Holding {
            counts: self
                .counts
                .iter()
                .filter(|(&id, &count)| keep(id, count))
                .map(|(&id, &count)| (id, count))
                .collect(),
        }
    }

    /// Remove and return every calamity copy, in id order.
    pub fn reveal_calamities(&mut self, registry: &CardRegistry) -> Vec<CardTypeId> {
        let calamities: Vec<CardTypeId> = self
            .cards()
            .filter(|&id| registry[id].is_calamity())
            .collect();
        for &id in &calamities {
            self.remove_one(id);
        }
        calamities
    }

    /// Remove one uniformly random copy.
    ///
    /// Every physical copy is equally likely, so a type held three times
    /// is three times as likely as a single.
    pub fn take_random(&mut self, rng: &mut GameRng) -> Option<CardTypeId> {
        let index = rng.choose_index(self.len())?;
        let id = self.cards().nth(index)?;
        self.remove_one(id);
        Some(id)
    }
}

impl Extend<CardTypeId> for Holding {
    fn extend<I: IntoIterator<Item = CardTypeId>>(&mut self, iter: I) {
        for id in iter {
            self.add(id);
        }
    }
}

impl FromIterator<CardTypeId> for Holding {
    fn from_iter<I: IntoIterator<Item = CardTypeId>>(iter: I) -> Self {
        Self::from_cards(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardSpec;

    fn ids() -> (CardTypeId, CardTypeId, CardTypeId) {
        (CardTypeId::new(0), CardTypeId::new(1), CardTypeId::new(2))
    }

    #[test]
    fn test_add_and_count() {
        let (wheat, iron, _) = ids();
        let mut holding = Holding::new();

        holding.add(wheat);
        holding.add_copies(iron, 3);
        holding.add_copies(wheat, 0);

        assert_eq!(holding.count(wheat), 1);
        assert_eq!(holding.count(iron), 3);
        assert_eq!(holding.len(), 4);
        assert_eq!(holding.distinct_len(), 2);
    }

    #[test]
    fn test_remove_drops_empty_entries() {
        let (wheat, iron, _) = ids();
        let mut holding = Holding::from_counts([(wheat, 1), (iron, 2)]);

        assert!(holding.remove_one(wheat));
        assert!(!holding.contains(wheat));
        assert!(!holding.remove_one(wheat));

        // Same content, same value: no residual zero entries
        assert_eq!(holding, Holding::from_counts([(iron, 2)]));
    }

    #[test]
    fn test_remove_then_add_restores_equality() {
        let (wheat, iron, salt) = ids();
        let original = Holding::from_counts([(wheat, 2), (iron, 1), (salt, 4)]);
        let mut working = original.clone();

        working.remove_one(iron);
        working.remove_one(salt);
        working.add(salt);
        working.add(iron);

        assert_eq!(working, original);
    }

    #[test]
    fn test_remove_copies() {
        let (wheat, _, _) = ids();
        let mut holding = Holding::from_counts([(wheat, 3)]);

        let err = holding.remove_copies(wheat, 4).unwrap_err();
        assert!(matches!(
            err,
            TradeError::InsufficientCopies { requested: 4, available: 3, .. }
        ));
        assert_eq!(holding.count(wheat), 3);

        holding.remove_copies(wheat, 2).unwrap();
        assert_eq!(holding.count(wheat), 1);
        holding.remove_copies(wheat, 1).unwrap();
        assert!(holding.is_empty());
    }

    #[test]
    fn test_cards_expands_copies() {
        let (wheat, iron, _) = ids();
        let holding = Holding::from_counts([(iron, 2), (wheat, 1)]);
        let cards: Vec<_> = holding.cards().collect();
        assert_eq!(cards, vec![wheat, iron, iron]);

        let rebuilt: Holding = cards.into_iter().collect();
        assert_eq!(rebuilt, holding);
    }

    #[test]
    fn test_filter() {
        let (wheat, iron, salt) = ids();
        let holding = Holding::from_counts([(wheat, 1), (iron, 2), (salt, 3)]);
        let filtered = holding.filter(|_, count| count >= 2);
        assert_eq!(filtered, Holding::from_counts([(iron, 2), (salt, 3)]));
    }

    #[test]
    fn test_reveal_calamities() {
        let mut registry = CardRegistry::new();
        let grain = registry.register(CardSpec::commodity("Grain", 4, 8)).unwrap();
        let flood = registry.register(CardSpec::major_calamity("Flood", 3)).unwrap();
        let unrest = registry.register(CardSpec::minor_calamity("Unrest", 2)).unwrap();

        let mut holding = Holding::from_counts([(grain, 2), (flood, 1), (unrest, 1)]);
        let revealed = holding.reveal_calamities(&registry);

        assert_eq!(revealed, vec![flood, unrest]);
        assert_eq!(holding, Holding::from_counts([(grain, 2)]));
    }

    #[test]
    fn test_take_random() {
        let (wheat, iron, _) = ids();
        let mut holding = Holding::from_counts([(wheat, 1), (iron, 3)]);
        let mut rng = GameRng::new(42);

        let taken = holding.take_random(&mut rng).unwrap();
        assert!(taken == wheat || taken == iron);
        assert_eq!(holding.len(), 3);

        let mut empty = Holding::new();
        assert_eq!(empty.take_random(&mut rng), None);
    }

    #[test]
    fn test_serialization() {
        let (wheat, iron, _) = ids();
        let holding = Holding::from_counts([(wheat, 2), (iron, 1)]);
        let json = serde_json::to_string(&holding).unwrap();
        let restored: Holding = serde_json::from_str(&json).unwrap();
        assert_eq!(holding, restored);
    }

    #[test]
    fn test_deserialize_drops_zero_entries() {
        let (wheat, iron, salt) = ids();
        let raw: OrdMap<CardTypeId, u32> =
            [(wheat, 0u32), (iron, 2), (salt, 2)].into_iter().collect();

        let mut restored: Holding =
            serde_json::from_value(serde_json::json!({ "counts": raw })).unwrap();
        assert_eq!(restored, Holding::from_counts([(iron, 2), (salt, 2)]));
        assert_eq!(restored.distinct_len(), 2);
        assert!(!restored.contains(wheat));
        assert!(!restored.remove_one(wheat));
        assert_eq!(restored.len(), 4);
    }
}
