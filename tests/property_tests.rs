//! Property tests for negotiation and calamity overflow.

use empire_trade::calamity::resolve_calamity_overflow;
use empire_trade::cards::{CardRegistry, CardSpec, CardTypeId};
use empire_trade::core::{CalamityCaps, GameRng, Player, PlayerId, TradeConfig};
use empire_trade::holding::Holding;
use empire_trade::trading::{compute_priority_and_offer, evaluate_offer, negotiate, TradingTable};
use proptest::prelude::*;

const TYPES: usize = 10;

fn catalog() -> CardRegistry {
    CardRegistry::from_specs([
        CardSpec::commodity("Ochre", 1, 7),
        CardSpec::commodity("Hides", 1, 7),
        CardSpec::commodity("Papyrus", 2, 7),
        CardSpec::commodity("Salt", 3, 8),
        CardSpec::commodity("Grain", 4, 8),
        CardSpec::commodity("Cloth", 5, 7),
        CardSpec::commodity("Bronze", 6, 6).untradeable(),
        CardSpec::commodity("Gold", 9, 3),
        CardSpec {
            max_count: 3,
            ..CardSpec::minor_calamity("Unrest", 2)
        },
        CardSpec::major_calamity("Volcano", 9),
    ])
    .unwrap()
}

fn holding_from(counts: &[u32]) -> Holding {
    Holding::from_counts(
        counts
            .iter()
            .enumerate()
            .map(|(i, &count)| (CardTypeId::new(i as u32), count)),
    )
}

fn seated(registry: &CardRegistry, seat: u8, counts: &[u32]) -> Player {
    let mut player = Player::new(format!("P{}", seat), u32::from(seat) + 1)
        .with_holding(holding_from(counts));
    player.id = PlayerId::new(seat);
    compute_priority_and_offer(registry, &mut player);
    player
}

fn counts_strategy() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..5, TYPES)
}

fn candidates_strategy() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..TYPES as u32, 0..4)
}

fn to_ids(raw: &[u32]) -> Vec<CardTypeId> {
    raw.iter().map(|&i| CardTypeId::new(i)).collect()
}

proptest! {
    #[test]
    fn prop_negotiation_conserves_or_rolls_back(
        a in counts_strategy(),
        b in counts_strategy(),
        gain in candidates_strategy(),
        give in prop::option::of(candidates_strategy()),
    ) {
        let registry = catalog();
        let mut actor = seated(&registry, 0, &a);
        let mut counterpart = seated(&registry, 1, &b);
        let (actor_before, counterpart_before) = (actor.holding.clone(), counterpart.holding.clone());
        let total_before = actor.holding.len() + counterpart.holding.len();

        let gain = to_ids(&gain);
        let give = give.map(|g| to_ids(&g));
        let outcome = negotiate(&registry, &mut actor, &mut counterpart, &gain, give.as_deref());

        prop_assert_eq!(actor.holding.len() + counterpart.holding.len(), total_before);
        for id in registry.iter().map(|t| t.id) {
            prop_assert_eq!(
                actor.holding.count(id) + counterpart.holding.count(id),
                actor_before.count(id) + counterpart_before.count(id)
            );
        }

        match outcome.exchange() {
            Some(exchange) => {
                prop_assert_eq!(exchange.gained.len(), 3);
                prop_assert_eq!(exchange.given.len(), 3);
            }
            None => {
                prop_assert_eq!(&actor.holding, &actor_before);
                prop_assert_eq!(&counterpart.holding, &counterpart_before);
            }
        }
    }

    #[test]
    fn prop_negotiation_is_deterministic(
        a in counts_strategy(),
        b in counts_strategy(),
        gain in candidates_strategy(),
        give in candidates_strategy(),
    ) {
        let registry = catalog();
        let (gain, give) = (to_ids(&gain), to_ids(&give));

        let mut a1 = seated(&registry, 0, &a);
        let mut b1 = seated(&registry, 1, &b);
        let first = negotiate(&registry, &mut a1, &mut b1, &gain, Some(give.as_slice()));

        let mut a2 = seated(&registry, 0, &a);
        let mut b2 = seated(&registry, 1, &b);
        let second = negotiate(&registry, &mut a2, &mut b2, &gain, Some(give.as_slice()));

        prop_assert_eq!(first, second);
        prop_assert_eq!(a1.holding, a2.holding);
        prop_assert_eq!(b1.holding, b2.holding);
    }

    #[test]
    fn prop_direction_is_canonical(
        a in counts_strategy(),
        b in counts_strategy(),
        low in 0u32..TYPES as u32,
        high in 0u32..TYPES as u32,
    ) {
        let registry = catalog();
        let (low, high) = (CardTypeId::new(low), CardTypeId::new(high));
        prop_assume!(registry[low].face_value < registry[high].face_value);

        let mut a1 = seated(&registry, 0, &a);
        let mut b1 = seated(&registry, 1, &b);
        let forward = negotiate(&registry, &mut a1, &mut b1, &[low], Some(&[high][..]));

        let mut a2 = seated(&registry, 0, &a);
        let mut b2 = seated(&registry, 1, &b);
        let backward = negotiate(&registry, &mut b2, &mut a2, &[high], Some(&[low][..]));

        prop_assert_eq!(forward.is_committed(), backward.is_committed());
        prop_assert_eq!(a1.holding, a2.holding);
        prop_assert_eq!(b1.holding, b2.holding);
    }

    #[test]
    fn prop_full_sets_never_prioritized_or_offered(counts in counts_strategy()) {
        let registry = catalog();
        let player = seated(&registry, 0, &counts);

        for card in player.priority.iter().chain(player.offer.iter()) {
            prop_assert!(!player.holding.is_full_set(&registry[*card]));
            prop_assert!(registry[*card].tradeable || !player.priority.contains(card));
        }
    }

    #[test]
    fn prop_full_sets_never_proposed(
        a in prop::collection::vec(0u32..9, TYPES),
        b in prop::collection::vec(0u32..9, TYPES),
    ) {
        let registry = catalog();
        let actor = seated(&registry, 0, &a);
        let other = seated(&registry, 1, &b);

        if let Some(proposal) = evaluate_offer(&registry, &TradeConfig::default(), &actor, &other) {
            let gives = proposal.give_candidates.iter().flatten();
            for card in proposal.gain_candidates.iter().chain(gives) {
                prop_assert!(!actor.holding.is_full_set(&registry[*card]));
                prop_assert!(!other.holding.is_full_set(&registry[*card]));
            }
        }
    }

    #[test]
    fn prop_trading_phase_conserves_cards(
        hands in prop::collection::vec(counts_strategy(), 2..5),
        seed in any::<u64>(),
    ) {
        let registry = catalog();
        let players: Vec<Player> = hands
            .iter()
            .enumerate()
            .map(|(i, counts)| {
                Player::new(format!("P{}", i), i as u32 + 1).with_holding(holding_from(counts))
            })
            .collect();
        let full_before: Vec<(usize, CardTypeId)> = hands
            .iter()
            .enumerate()
            .flat_map(|(i, counts)| {
                counts
                    .iter()
                    .enumerate()
                    .filter(|&(t, &c)| c >= registry[CardTypeId::new(t as u32)].max_count)
                    .map(move |(t, _)| (i, CardTypeId::new(t as u32)))
                    .collect::<Vec<_>>()
            })
            .collect();

        let config = TradeConfig::default().with_seed(seed).with_max_attempts(200);
        let mut table = TradingTable::new(registry.clone(), players, config).unwrap();
        let before = table.total_cards();

        let summary = table.trading_phase();
        prop_assert!(summary.attempts <= 200);
        prop_assert_eq!(table.total_cards(), before);
        prop_assert!(summary.trades + summary.aborted <= summary.attempts);

        for (seat, card) in full_before {
            let player = table.player(PlayerId::new(seat as u8));
            prop_assert!(player.holding.count(card) >= registry[card].max_count);
        }
    }

    #[test]
    fn prop_calamity_caps_hold(
        revealed in prop::collection::vec(8u32..10, 0..8),
        major in 0usize..3,
        extra in 0usize..3,
        seed in any::<u64>(),
    ) {
        let registry = catalog();
        let revealed = to_ids(&revealed);
        let caps = CalamityCaps { major, total: major + extra };

        let overflow = resolve_calamity_overflow(&registry, &revealed, caps, &mut GameRng::new(seed));

        prop_assert!(overflow.retained_majors(&registry) <= caps.major);
        prop_assert!(overflow.retained.len() <= caps.total);
        prop_assert_eq!(overflow.retained.len() + overflow.discarded.len(), revealed.len());
    }
}
