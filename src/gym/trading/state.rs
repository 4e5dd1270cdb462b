use crate::{
    data::{
        domain::{Balance, Quantity, RateRecord},
        episode::EpisodeId,
    },
    gym::{
        Reward,
        trading::{
            action::Action,
            book::{Fill, PositionBook},
            contract::{Contract, Settlement},
        },
    },
};

/// All mutable state of one environment instance.
///
/// Owned exclusively by its [`Environment`](crate::gym::trading::env::Environment) and only
/// mutated through `step`/`reset`.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeState {
    pub(super) elapsed: usize,
    pub(super) episode: EpisodeId,
    pub(super) episode_length: usize,
    pub(super) budget: Balance,
    pub(super) book: PositionBook,
    pub(super) last_action: Option<Action>,
    pub(super) last_reward: Option<Reward>,
    pub(super) last_settlement: Option<Settlement>,
}

impl EpisodeState {
    pub(super) fn new(budget: Balance, episode_length: usize) -> Self {
        Self {
            elapsed: 0,
            episode: EpisodeId(0),
            episode_length,
            budget,
            book: PositionBook::new(),
            last_action: None,
            last_reward: None,
            last_settlement: None,
        }
    }

    /// Zero-based timestep within the current episode.
    pub fn elapsed(&self) -> usize {
        self.elapsed
    }

    /// Episode counter. May exceed the number of loaded episodes by one before wrapping.
    pub fn episode(&self) -> EpisodeId {
        self.episode
    }

    pub fn episode_length(&self) -> usize {
        self.episode_length
    }

    pub fn budget(&self) -> Balance {
        self.budget
    }

    pub fn book(&self) -> &PositionBook {
        &self.book
    }

    pub fn last_action(&self) -> Option<Action> {
        self.last_action
    }

    pub fn last_reward(&self) -> Option<Reward> {
        self.last_reward
    }

    /// Trade closed by the most recent step, if any.
    pub fn last_settlement(&self) -> Option<&Settlement> {
        self.last_settlement.as_ref()
    }

    /// Applies `action` at `current` and returns the realized P&L as reward.
    ///
    /// `Hold` leaves the book untouched. `Long`/`Short` close the oldest opposing contract or,
    /// if there is none, open a contract of `stake` on their own side.
    pub(super) fn apply_action(
        &mut self,
        action: Action,
        current: &RateRecord,
        stake: Quantity,
    ) -> Reward {
        self.last_action = Some(action);
        self.last_settlement = None;

        let Some(side) = action.side() else {
            return Reward(0.0);
        };

        let contract = Contract::new(side, stake, *current, self.elapsed);
        match self.book.open_or_close(contract) {
            Fill::Opened => {
                tracing::debug!(
                    side = %side,
                    entry_price = %contract.entry_price(),
                    elapsed = self.elapsed,
                    "Contract Opened"
                );
                Reward(0.0)
            }
            Fill::Closed { contract: open, pnl } => {
                self.budget += pnl;
                let settlement = Settlement::new(&open, current, self.elapsed, pnl, self.budget);
                tracing::info!(
                    side = %settlement.side,
                    pnl = settlement.pnl,
                    duration = settlement.duration,
                    budget = %settlement.budget,
                    "Contract Settled"
                );
                self.last_settlement = Some(settlement);
                Reward(pnl)
            }
        }
    }

    /// Drops open contracts and restores the starting budget for the episode `episode`.
    pub(super) fn start_episode(
        &mut self,
        episode: EpisodeId,
        episode_length: usize,
        budget: Balance,
    ) {
        self.book.clear();
        self.budget = budget;
        self.episode = episode;
        self.elapsed = 0;
        self.episode_length = episode_length;
    }
}
