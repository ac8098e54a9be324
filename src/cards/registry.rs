//! Card registry for type lookup.
//!
//! The `CardRegistry` owns every `CardType` of a game and issues the
//! `CardTypeId`s holdings count by. Ids are dense indices, so lookup by id
//! is a slice access; names are indexed separately for catalog loading and
//! orchestrator input.

use std::ops::Index;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::definition::{CardSpec, CardType, CardTypeId};
use crate::core::{PlayerId, Result, TradeError};

/// Registry of card types.
///
/// ## Example
///
/// ```
/// use empire_trade::cards::{CardRegistry, CardSpec};
///
/// let mut registry = CardRegistry::new();
/// let wheat = registry.register(CardSpec::commodity("Wheat", 1, 8)).unwrap();
///
/// assert_eq!(registry[wheat].name, "Wheat");
/// assert_eq!(registry.id_of("Wheat").unwrap(), wheat);
/// assert!(registry.register(CardSpec::commodity("Wheat", 2, 8)).is_err());
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<CardType>", into = "Vec<CardType>")]
pub struct CardRegistry {
    types: Vec<CardType>,
    by_name: FxHashMap<String, CardTypeId>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from catalog entries, in order.
    pub fn from_specs(specs: impl IntoIterator<Item = CardSpec>) -> Result<Self> {
        let mut registry = Self::new();
        for spec in specs {
            registry.register(spec)?;
        }
        Ok(registry)
    }

    /// Load a catalog from a JSON array of card specs.
    pub fn from_json(json: &str) -> Result<Self> {
        let specs: Vec<CardSpec> = serde_json::from_str(json)?;
        Self::from_specs(specs)
    }

    /// Register a card type and return its id.
    ///
    /// Names must be unique and `max_count` positive.
    pub fn register(&mut self, spec: CardSpec) -> Result<CardTypeId> {
        if self.by_name.contains_key(&spec.name) {
            return Err(TradeError::DuplicateCardType(spec.name));
        }
        if spec.max_count == 0 {
            return Err(TradeError::InvalidCardSpec {
                name: spec.name,
                reason: "count must be positive".into(),
            });
        }

        let id = CardTypeId::new(self.types.len() as u32);
        self.by_name.insert(spec.name.clone(), id);
        self.types.push(CardType::from_spec(id, spec));
        Ok(id)
    }

    #[must_use]
    pub fn get(&self, id: CardTypeId) -> Option<&CardType> {
        self.types.get(id.index())
    }

    /// Look a type up by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&CardType> {
        self.by_name.get(name).map(|&id| &self.types[id.index()])
    }

    /// Resolve a name to its id.
    pub fn id_of(&self, name: &str) -> Result<CardTypeId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| TradeError::UnknownCardType(name.to_string()))
    }

    #[must_use]
    pub fn contains(&self, id: CardTypeId) -> bool {
        id.index() < self.types.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over all card types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CardType> {
        self.types.iter()
    }

    /// Iterate over calamity types.
    pub fn calamities(&self) -> impl Iterator<Item = &CardType> {
        self.types.iter().filter(|t| t.is_calamity())
    }

    /// Record who a calamity last moved to.
    pub fn set_last_owner(&mut self, id: CardTypeId, owner: Option<PlayerId>) {
        if let Some(card_type) = self.types.get_mut(id.index()) {
            card_type.last_owner = owner;
        }
    }

    /// Forget every `last_owner`, as when discards are reshuffled into the stacks.
    pub fn clear_last_owners(&mut self) {
        for card_type in &mut self.types {
            card_type.last_owner = None;
        }
    }
}

/// Serialized registries are re-validated: ids must be dense and in
/// order, names unique.
impl TryFrom<Vec<CardType>> for CardRegistry {
    type Error = TradeError;

    fn try_from(types: Vec<CardType>) -> Result<Self> {
        let mut registry = Self::new();
        for card_type in types {
            if card_type.id.index() != registry.types.len() {
                return Err(TradeError::InvalidCardSpec {
                    reason: format!(
                        "id {} out of sequence, expected {}",
                        card_type.id.index(),
                        registry.types.len()
                    ),
                    name: card_type.name,
                });
            }
            if registry.by_name.contains_key(&card_type.name) {
                return Err(TradeError::DuplicateCardType(card_type.name));
            }
            if card_type.max_count == 0 {
                return Err(TradeError::InvalidCardSpec {
                    name: card_type.name,
                    reason: "count must be positive".into(),
                });
            }
            registry.by_name.insert(card_type.name.clone(), card_type.id);
            registry.types.push(card_type);
        }
        Ok(registry)
    }
}

impl From<CardRegistry> for Vec<CardType> {
    fn from(registry: CardRegistry) -> Self {
        registry.types
    }
}

impl Index<CardTypeId> for CardRegistry {
    type Output = CardType;

    /// Panics if `id` was not issued by this registry.
    fn index(&self, id: CardTypeId) -> &Self::Output {
        self.types
            .get(id.index())
            .expect("Card type not found in registry")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CalamityKind;

    #[test]
    fn test_register_and_get() {
        let mut registry = CardRegistry::new();

        let ochre = registry.register(CardSpec::commodity("Ochre", 1, 7)).unwrap();
        let iron = registry.register(CardSpec::commodity("Iron", 2, 8)).unwrap();

        assert_eq!(ochre, CardTypeId::new(0));
        assert_eq!(iron, CardTypeId::new(1));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(iron).unwrap().face_value, 2);
        assert!(registry.get(CardTypeId::new(9)).is_none());
        assert!(registry.contains(ochre));
        assert!(!registry.contains(CardTypeId::new(2)));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = CardRegistry::new();
        registry.register(CardSpec::commodity("Salt", 3, 8)).unwrap();

        let result = registry.register(CardSpec::commodity("Salt", 4, 8));
        assert!(matches!(result, Err(TradeError::DuplicateCardType(name)) if name == "Salt"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_zero_count_rejected() {
        let mut registry = CardRegistry::new();
        let result = registry.register(CardSpec::commodity("Water", 0, 0));
        assert!(matches!(result, Err(TradeError::InvalidCardSpec { .. })));
    }

    #[test]
    fn test_lookup_by_name() {
        let mut registry = CardRegistry::new();
        let gold = registry.register(CardSpec::commodity("Gold", 9, 5)).unwrap();

        assert_eq!(registry.by_name("Gold").map(|t| t.id), Some(gold));
        assert!(registry.by_name("Silver").is_none());
        assert!(matches!(
            registry.id_of("Silver"),
            Err(TradeError::UnknownCardType(_))
        ));
    }

    #[test]
    fn test_from_json_catalog() {
        let json = r#"[
            { "name": "Ochre", "value": 1, "count": 7, "calamity": null,
              "tradeable": true, "offerable": true, "additional_set": false },
            { "name": "Volcano", "value": 2, "count": 1, "calamity": "major",
              "tradeable": false, "offerable": false, "additional_set": false },
            { "name": "Superstition", "value": 2, "count": 1, "calamity": "minor",
              "tradeable": true, "offerable": false, "additional_set": false }
        ]"#;

        let registry = CardRegistry::from_json(json).unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.calamities().count(), 2);

        let volcano = registry.by_name("Volcano").unwrap();
        assert_eq!(volcano.calamity, Some(CalamityKind::Major));
        assert!(!volcano.tradeable);
    }

    #[test]
    fn test_from_json_duplicate() {
        let json = r#"[
            { "name": "Ochre", "value": 1, "count": 7 },
            { "name": "Ochre", "value": 1, "count": 7 }
        ]"#;
        assert!(matches!(
            CardRegistry::from_json(json),
            Err(TradeError::DuplicateCardType(_))
        ));
    }

    #[test]
    fn test_last_owner_tracking() {
        let mut registry = CardRegistry::new();
        let piracy = registry
            .register(CardSpec::major_calamity("Piracy", 5))
            .unwrap();

        assert_eq!(registry[piracy].last_owner, None);
        registry.set_last_owner(piracy, Some(PlayerId::new(2)));
        assert_eq!(registry[piracy].last_owner, Some(PlayerId::new(2)));

        registry.clear_last_owners();
        assert_eq!(registry[piracy].last_owner, None);
    }

    #[test]
    fn test_serde_round_trip_keeps_name_index() {
        let mut registry = CardRegistry::from_specs([
            CardSpec::commodity("Wine", 5, 7),
            CardSpec::commodity("Dye", 6, 7),
        ])
        .unwrap();
        registry.set_last_owner(CardTypeId::new(0), Some(PlayerId::new(1)));

        let json = serde_json::to_string(&registry).unwrap();
        let mut restored: CardRegistry = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.id_of("Wine").unwrap(), CardTypeId::new(0));
        assert_eq!(restored.id_of("Dye").unwrap(), CardTypeId::new(1));
        assert_eq!(restored[CardTypeId::new(0)].last_owner, Some(PlayerId::new(1)));

        assert!(matches!(
            restored.register(CardSpec::commodity("Wine", 1, 2)),
            Err(TradeError::DuplicateCardType(_))
        ));
        assert_eq!(
            restored.register(CardSpec::commodity("Gems", 8, 4)).unwrap(),
            CardTypeId::new(2)
        );
    }

    #[test]
    fn test_deserialize_rejects_bad_snapshots() {
        let wine = CardType::from_spec(CardTypeId::new(0), CardSpec::commodity("Wine", 5, 7));
        let dye = CardType::from_spec(CardTypeId::new(1), CardSpec::commodity("Dye", 6, 7));

        let duplicate = vec![wine.clone(), CardType { id: CardTypeId::new(1), ..wine.clone() }];
        let json = serde_json::to_string(&duplicate).unwrap();
        assert!(serde_json::from_str::<CardRegistry>(&json).is_err());
        assert!(matches!(
            CardRegistry::try_from(duplicate),
            Err(TradeError::DuplicateCardType(name)) if name == "Wine"
        ));

        let out_of_order = vec![dye, wine];
        let json = serde_json::to_string(&out_of_order).unwrap();
        assert!(serde_json::from_str::<CardRegistry>(&json).is_err());
        assert!(matches!(
            CardRegistry::try_from(out_of_order),
            Err(TradeError::InvalidCardSpec { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "not found in registry")]
    fn test_index_unknown_panics() {
        let registry = CardRegistry::new();
        let _ = &registry[CardTypeId::new(0)];
    }
}
