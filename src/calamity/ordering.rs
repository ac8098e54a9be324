//! Resolution order of retained calamities.

use std::cmp::Reverse;

use crate::cards::{CardRegistry, CardType, CardTypeId};

/// Sort key: severity name, face value, untradeable.
///
/// Compared lexically, so `"minor"` sorts above `"major"` once the order is
/// reversed: minor calamities resolve first, higher face values first
/// within a kind, untradeable before tradeable on further ties.
#[must_use]
pub fn resolution_key(card_type: &CardType) -> (&'static str, i64, bool) {
    (
        card_type.calamity.map_or("", |kind| kind.name()),
        card_type.face_value,
        !card_type.tradeable,
    )
}

/// Order `calamities` for resolution. The sort is stable.
#[must_use]
pub fn calamity_resolution_order(
    registry: &CardRegistry,
    calamities: &[CardTypeId],
) -> Vec<CardTypeId> {
    let mut ordered = calamities.to_vec();
    ordered.sort_by_key(|&id| Reverse(resolution_key(&registry[id])));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardSpec;

    #[test]
    fn test_minor_before_major() {
        let reg = CardRegistry::from_specs([
            CardSpec::major_calamity("Volcano", 10),
            CardSpec::major_calamity("Flood", 5),
            CardSpec::minor_calamity("Unrest", 3),
            CardSpec::minor_calamity("Piracy", 4).untradeable(),
            CardSpec::minor_calamity("Drought", 4),
        ])
        .unwrap();
        let id = |n: &str| reg.id_of(n).unwrap();

        let ordered = calamity_resolution_order(
            &reg,
            &[id("Flood"), id("Unrest"), id("Volcano"), id("Drought"), id("Piracy")],
        );
        assert_eq!(
            ordered,
            vec![id("Piracy"), id("Drought"), id("Unrest"), id("Volcano"), id("Flood")]
        );
    }

    #[test]
    fn test_empty() {
        let reg = CardRegistry::new();
        assert!(calamity_resolution_order(&reg, &[]).is_empty());
    }
}
