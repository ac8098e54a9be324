//! Players and per-player storage.
//!
//! ## PlayerId
//!
//! Index of a civilization at the table, 0-based.
//!
//! ## PlayerMap
//!
//! `Vec`-backed per-player storage indexed by `PlayerId`. Negotiation needs
//! two players mutably at once, which `PlayerMap::pair_mut` provides.
//!
//! ## Player
//!
//! A civilization's trading state: its holding plus the derived
//! priority set and offer list.

use std::collections::BTreeMap;
use std::ops::{Index, IndexMut};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::cards::{CardRegistry, CardTypeId};
use crate::holding::Holding;

/// Player identifier supporting 1-255 players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a table of `player_count` players.
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data storage with O(1) access.
///
/// ```
/// use empire_trade::core::{PlayerId, PlayerMap};
///
/// let mut cities: PlayerMap<u32> = PlayerMap::new(3, |_| 0);
/// cities[PlayerId::new(1)] = 4;
///
/// let (a, b) = cities.pair_mut(PlayerId::new(0), PlayerId::new(1));
/// std::mem::swap(a, b);
/// assert_eq!(cities[PlayerId::new(0)], 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8)
            .map(|i| factory(PlayerId(i)))
            .collect();

        Self { data }
    }

    /// Wrap an existing vector; entry `i` belongs to `PlayerId(i)`.
    pub fn from_vec(data: Vec<T>) -> Self {
        assert!(!data.is_empty(), "Must have at least 1 player");
        assert!(data.len() <= 255, "At most 255 players supported");
        Self { data }
    }

    /// Get the number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Check whether `player` has an entry.
    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        player.index() < self.data.len()
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Borrow two different players mutably at the same time.
    ///
    /// Panics if `a == b`.
    pub fn pair_mut(&mut self, a: PlayerId, b: PlayerId) -> (&mut T, &mut T) {
        assert_ne!(a, b, "pair_mut needs two distinct players");
        let (i, j) = (a.index(), b.index());
        if i < j {
            let (low, high) = self.data.split_at_mut(j);
            (&mut low[i], &mut high[0])
        } else {
            let (low, high) = self.data.split_at_mut(i);
            (&mut high[0], &mut low[j])
        }
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over all player IDs.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.data.len() as u8).map(PlayerId)
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

/// A civilization's trading state.
///
/// `priority` and `offer` are derived from `holding` and are recomputed by
/// `trading::compute_priority_and_offer` whenever the holding changes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    /// Seat at the table; assigned by `TradingTable::new`.
    pub id: PlayerId,

    pub name: String,

    /// Archaeological succession table ranking, the stable tie-break.
    pub ast_ranking: u32,

    /// Position on the succession track.
    pub ast_position: u32,

    /// Cities on the board, set by the orchestrator each round.
    pub cities: u32,

    /// Share of holding value protected from trading, in (0, 1].
    pub priority_threshold: f64,

    pub holding: Holding,

    /// Types the player currently refuses to give away.
    pub priority: FxHashSet<CardTypeId>,

    /// Types the player is willing to trade, face value descending.
    pub offer: Vec<CardTypeId>,

    /// Completed trades per round.
    pub trades: BTreeMap<u32, u32>,
}

impl Player {
    /// Create a player with an empty holding.
    pub fn new(name: impl Into<String>, ast_ranking: u32) -> Self {
        Self {
            id: PlayerId::new(0),
            name: name.into(),
            ast_ranking,
            ast_position: 0,
            cities: 0,
            priority_threshold: 0.5,
            holding: Holding::new(),
            priority: FxHashSet::default(),
            offer: Vec::new(),
            trades: BTreeMap::new(),
        }
    }

    /// Start with the given holding.
    #[must_use]
    pub fn with_holding(mut self, holding: Holding) -> Self {
        self.holding = holding;
        self
    }

    /// Move one step up the succession track.
    pub fn ascend(&mut self) {
        self.ast_position += 1;
    }

    /// Sort key for card acquisition order.
    #[must_use]
    pub fn order_cities(&self) -> (u32, u32) {
        (self.cities, self.ast_ranking)
    }

    /// Sort key for the trading queue.
    #[must_use]
    pub fn order_ast_position(&self) -> (u32, u32) {
        (self.ast_position, self.ast_ranking)
    }

    /// Count a completed trade in `round`.
    pub fn record_trade(&mut self, round: u32) {
        *self.trades.entry(round).or_insert(0) += 1;
    }

    /// Trades completed in `round`.
    #[must_use]
    pub fn trades_in_round(&self, round: u32) -> u32 {
        self.trades.get(&round).copied().unwrap_or(0)
    }

    /// Change in total holding value if `incoming` were added.
    #[must_use]
    pub fn value_delta(&self, registry: &CardRegistry, incoming: &[CardTypeId]) -> i64 {
        let mut after = self.holding.clone();
        after.extend(incoming.iter().copied());
        after.total_value(registry) - self.holding.total_value(registry)
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
