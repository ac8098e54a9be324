//! Trading round controller.
//!
//! Players take turns from a FIFO queue. On each step the head of the queue
//! becomes the actor, evaluates a proposal against every other queued
//! player, goes back to the tail, and tries the best proposal found. The
//! best proposal is the one with the strictly highest estimated value; the
//! first seen wins ties.
//!
//! A step that does not trade leaves every holding untouched, so once every
//! queued player has had a turn without trading in a row, nothing further
//! can happen and the round stops. `max_attempts` bounds the round either
//! way.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::proposal::TradeProposal;
use super::table::TradingTable;
use crate::core::PlayerId;

/// What a single controller step did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// The actor found nobody to trade with.
    NoProposal,
    /// The best proposal could not be balanced and was rolled back.
    Aborted,
    /// A trade was committed.
    Traded,
}

/// Why a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Every queued player had a turn in a row without trading.
    Converged,
    /// `max_attempts` steps were taken.
    AttemptLimit,
    /// The queue was empty.
    EmptyQueue,
}

/// Counters for a finished round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: u32,
    pub attempts: usize,
    pub trades: usize,
    pub aborted: usize,
    pub stop: StopReason,
}

/// FIFO turn order for one trading round.
#[derive(Clone, Debug)]
pub struct TradingRound {
    queue: VecDeque<PlayerId>,
    max_attempts: usize,
}

impl TradingRound {
    pub fn new(queue: impl IntoIterator<Item = PlayerId>, max_attempts: usize) -> Self {
        Self {
            queue: queue.into_iter().collect(),
            max_attempts,
        }
    }

    /// Current turn order, head first.
    #[must_use]
    pub fn queue(&self) -> &VecDeque<PlayerId> {
        &self.queue
    }

    /// Best proposal from `actor` to any player still in the queue.
    #[must_use]
    pub fn best_proposal(&self, table: &TradingTable, actor: PlayerId) -> Option<TradeProposal> {
        let mut best: Option<TradeProposal> = None;
        for &other in self.queue.iter().filter(|&&other| other != actor) {
            let Some(proposal) = table.evaluate_offer(actor, other) else {
                continue;
            };
            if best
                .as_ref()
                .map_or(true, |b| proposal.estimated_value > b.estimated_value)
            {
                best = Some(proposal);
            }
        }
        best
    }

    /// Give the head of the queue one turn.
    pub fn step(&mut self, table: &mut TradingTable) -> StepOutcome {
        let Some(actor) = self.queue.pop_front() else {
            return StepOutcome::NoProposal;
        };
        let proposal = self.best_proposal(table, actor);
        self.queue.push_back(actor);

        let Some(proposal) = proposal else {
            return StepOutcome::NoProposal;
        };
        debug!(
            actor = %table.player(actor).name,
            counterpart = %table.player(proposal.counterpart).name,
            value = proposal.estimated_value,
            "selected proposal"
        );

        if table.execute_trade(&proposal) {
            let round = table.round();
            table.player_mut(actor).record_trade(round);
            StepOutcome::Traded
        } else {
            StepOutcome::Aborted
        }
    }

    /// Step until the round converges or `max_attempts` is reached.
    pub fn run(mut self, table: &mut TradingTable) -> RoundSummary {
        let mut attempts = 0;
        let mut trades = 0;
        let mut aborted = 0;
        let mut idle = 0;

        let stop = loop {
            if self.queue.is_empty() {
                break StopReason::EmptyQueue;
            }
            if attempts >= self.max_attempts {
                break StopReason::AttemptLimit;
            }

            attempts += 1;
            match self.step(table) {
                StepOutcome::Traded => {
                    trades += 1;
                    idle = 0;
                }
                StepOutcome::Aborted => {
                    aborted += 1;
                    idle += 1;
                }
                StepOutcome::NoProposal => idle += 1,
            }

            if idle >= self.queue.len() {
                break StopReason::Converged;
            }
        };

        let summary = RoundSummary {
            round: table.round(),
            attempts,
            trades,
            aborted,
            stop,
        };
        info!(
            round = summary.round,
            attempts,
            trades,
            aborted,
            stop = ?stop,
            "trading round finished"
        );
        summary
    }
}
