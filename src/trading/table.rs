//! The trading table.
//!
//! `TradingTable` owns everything the trading economy touches: the card
//! registry (including calamity `last_owner` bookkeeping), the players and
//! their holdings, the configuration, the round counter and the seeded RNG
//! streams. It is the surface the phase orchestrator drives:
//!
//! ```
//! use empire_trade::cards::{CardRegistry, CardSpec};
//! use empire_trade::core::{Player, TradeConfig};
//! use empire_trade::holding::Holding;
//! use empire_trade::trading::TradingTable;
//!
//! let registry = CardRegistry::from_specs([
//!     CardSpec::commodity("Ochre", 1, 7),
//!     CardSpec::commodity("Salt", 3, 8),
//! ])
//! .unwrap();
//! let salt = registry.id_of("Salt").unwrap();
//! let players = vec![
//!     Player::new("Egypt", 1).with_holding(Holding::from_counts([(salt, 2)])),
//!     Player::new("Crete", 2),
//! ];
//!
//! let mut table = TradingTable::new(registry, players, TradeConfig::default()).unwrap();
//! let summary = table.trading_phase();
//! assert_eq!(summary.trades, 0);
//! ```

use std::cmp::Reverse;
use std::collections::VecDeque;

use tracing::debug;

use super::negotiation::{negotiate, AbortReason, TradeOutcome};
use super::offer::compute_priority_and_offer;
use super::proposal::{evaluate_offer, TradeProposal};
use super::round::{RoundSummary, TradingRound};
use crate::calamity::{
    resolution_key, resolve_calamity_overflow, CalamityAssignment, CalamityOverflow,
    CalamitySelection,
};
use crate::cards::{CardRegistry, CardTypeId};
use crate::core::{GameRng, Player, PlayerId, PlayerMap, Result, TradeConfig, TradeError};

/// Registry, players and round state for the trading economy.
#[derive(Clone, Debug)]
pub struct TradingTable {
    registry: CardRegistry,
    players: PlayerMap<Player>,
    config: TradeConfig,
    round: u32,
    calamity_rng: GameRng,
    draw_rng: GameRng,
}

impl TradingTable {
    /// Seat `players` in order and derive their priority and offer.
    pub fn new(registry: CardRegistry, players: Vec<Player>, config: TradeConfig) -> Result<Self> {
        config.validate()?;
        if players.is_empty() || players.len() > 255 {
            return Err(TradeError::InvalidPlayerCount(players.len()));
        }

        let seated = players
            .into_iter()
            .enumerate()
            .map(|(seat, mut player)| {
                player.id = PlayerId::new(seat as u8);
                player.priority_threshold = config.priority_threshold;
                compute_priority_and_offer(&registry, &mut player);
                player
            })
            .collect();

        let rng = GameRng::new(config.seed);
        Ok(Self {
            registry,
            players: PlayerMap::from_vec(seated),
            round: 1,
            calamity_rng: rng.for_context("calamity"),
            draw_rng: rng.for_context("draw"),
            config,
        })
    }

    #[must_use]
    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &TradeConfig {
        &self.config
    }

    /// Current round, starting at 1.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Advance to the next round.
    pub fn next_round(&mut self) -> u32 {
        self.round += 1;
        self.round
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<Player> {
        &self.players
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// Player at `id`. Panics if there is no such seat.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }

    /// Mutable player at `id`. Panics if there is no such seat.
    ///
    /// After changing a holding directly, call `compute_priority_and_offer`.
    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id]
    }

    /// Player at `id`, or an error if there is no such seat.
    pub fn try_player(&self, id: PlayerId) -> Result<&Player> {
        if self.players.contains(id) {
            Ok(&self.players[id])
        } else {
            Err(TradeError::UnknownPlayer(id))
        }
    }

    #[must_use]
    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.players
            .iter()
            .map(|(_, player)| player)
            .find(|player| player.name == name)
    }

    /// Total copies held across the table.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.players.iter().map(|(_, p)| p.holding.len()).sum()
    }

    /// Override one player's priority threshold and refresh their offer.
    pub fn set_priority_threshold(&mut self, id: PlayerId, threshold: f64) -> Result<()> {
        self.try_player(id)?;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(TradeError::InvalidThreshold(threshold));
        }
        let player = &mut self.players[id];
        player.priority_threshold = threshold;
        compute_priority_and_offer(&self.registry, player);
        Ok(())
    }

    /// Recompute priority and offer for `id` from their holding.
    pub fn compute_priority_and_offer(&mut self, id: PlayerId) {
        compute_priority_and_offer(&self.registry, &mut self.players[id]);
    }

    /// Trading order for this round: succession track position ascending,
    /// ranking breaking ties. Every player is reset to the configured
    /// priority threshold and refreshed.
    pub fn prepare_trading_queue(&mut self) -> VecDeque<PlayerId> {
        let threshold = self.config.priority_threshold;
        for (_, player) in self.players.iter_mut() {
            player.priority_threshold = threshold;
            compute_priority_and_offer(&self.registry, player);
        }

        let mut order: Vec<PlayerId> = self.players.player_ids().collect();
        order.sort_by_key(|&id| self.players[id].order_ast_position());
        order.into_iter().collect()
    }

    /// Proposal from `actor` to `other`, if any.
    #[must_use]
    pub fn evaluate_offer(&self, actor: PlayerId, other: PlayerId) -> Option<TradeProposal> {
        if actor == other || !self.players.contains(actor) || !self.players.contains(other) {
            return None;
        }
        evaluate_offer(
            &self.registry,
            &self.config,
            &self.players[actor],
            &self.players[other],
        )
    }

    /// Negotiate `proposal` and, if it balances, commit it.
    ///
    /// Calamities that change hands record their new holder as
    /// `last_owner`.
    pub fn negotiate(&mut self, proposal: &TradeProposal) -> TradeOutcome {
        let (actor, counterpart) = (proposal.actor, proposal.counterpart);
        if actor == counterpart || !self.players.contains(actor) || !self.players.contains(counterpart)
        {
            debug!(%actor, %counterpart, "proposal names an invalid pair");
            return TradeOutcome::Aborted(AbortReason::InvalidPair { actor, counterpart });
        }

        let (a, b) = self.players.pair_mut(actor, counterpart);
        let outcome = negotiate(
            &self.registry,
            a,
            b,
            &proposal.gain_candidates,
            proposal.give_candidates.as_deref(),
        );

        if let TradeOutcome::Committed(exchange) = &outcome {
            for (card, holder) in exchange.transfers() {
                if self.registry[card].is_calamity() {
                    self.registry.set_last_owner(card, Some(holder));
                }
            }
        }
        outcome
    }

    /// Carry out `proposal`. Returns whether a trade was committed; on
    /// `false` every holding is unchanged.
    pub fn execute_trade(&mut self, proposal: &TradeProposal) -> bool {
        self.negotiate(proposal).is_committed()
    }

    /// Run the controller over `queue` for at most `max_attempts` steps.
    pub fn run_trading_round(
        &mut self,
        queue: impl IntoIterator<Item = PlayerId>,
        max_attempts: usize,
    ) -> RoundSummary {
        TradingRound::new(queue, max_attempts).run(self)
    }

    /// Prepare the queue and run a full round with the configured ceiling.
    pub fn trading_phase(&mut self) -> RoundSummary {
        let queue = self.prepare_trading_queue();
        let max_attempts = self.config.max_attempts;
        self.run_trading_round(queue, max_attempts)
    }

    /// Enforce the calamity caps on what `player` revealed.
    pub fn resolve_calamity_overflow(
        &mut self,
        player: PlayerId,
        revealed: &[CardTypeId],
    ) -> CalamityOverflow {
        let overflow = resolve_calamity_overflow(
            &self.registry,
            revealed,
            self.config.calamity_caps,
            &mut self.calamity_rng,
        );
        if !overflow.discarded.is_empty() {
            debug!(
                %player,
                discarded = overflow.discarded.len(),
                "calamity overflow"
            );
        }
        overflow
    }

    /// Reveal every player's calamities, discard the overflow, and list
    /// what remains in resolution order.
    ///
    /// Revealed calamities leave the holdings; retained ones come back as
    /// assignments, discarded ones go to the shared pile.
    pub fn calamity_selection(&mut self) -> CalamitySelection {
        let mut selection = CalamitySelection::default();
        let seats: Vec<PlayerId> = self.players.player_ids().collect();

        for victim in seats {
            let revealed = self.players[victim]
                .holding
                .reveal_calamities(&self.registry);
            if revealed.is_empty() {
                continue;
            }
            compute_priority_and_offer(&self.registry, &mut self.players[victim]);

            let overflow = self.resolve_calamity_overflow(victim, &revealed);
            selection
                .assignments
                .extend(overflow.retained.iter().map(|&calamity| CalamityAssignment {
                    calamity,
                    victim,
                    last_owner: self.registry[calamity].last_owner,
                }));
            selection.discarded.extend(overflow.discarded);
        }

        let registry = &self.registry;
        selection
            .assignments
            .sort_by_key(|a| Reverse(resolution_key(&registry[a.calamity])));
        selection
    }

    /// Move one random card from `victim` to `taker`.
    ///
    /// `None` if the two seats are the same, either is unknown, or the
    /// victim holds nothing.
    pub fn draw_random_card(&mut self, victim: PlayerId, taker: PlayerId) -> Option<CardTypeId> {
        if victim == taker || !self.players.contains(victim) || !self.players.contains(taker) {
            return None;
        }
        let card = self.players[victim]
            .holding
            .take_random(&mut self.draw_rng)?;
        self.players[taker].holding.add(card);
        if self.registry[card].is_calamity() {
            self.registry.set_last_owner(card, Some(taker));
        }
        compute_priority_and_offer(&self.registry, &mut self.players[victim]);
        compute_priority_and_offer(&self.registry, &mut self.players[taker]);
        Some(card)
    }

    /// Forget calamity ownership, as when discards are reshuffled.
    pub fn clear_last_owners(&mut self) {
        self.registry.clear_last_owners();
    }
}
