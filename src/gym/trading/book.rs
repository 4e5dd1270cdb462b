use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::{
    data::domain::RateRecord,
    gym::trading::{
        contract::{Contract, Side},
        observation::CloseHint,
    },
};

/// Outcome of [`PositionBook::open_or_close`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    /// The contract was queued on its own side.
    Opened,
    /// The oldest opposing contract was consumed and settled at `pnl`.
    Closed { contract: Contract, pnl: f64 },
}

impl Fill {
    /// P&L realized by this fill, zero for openings.
    pub fn realized_pnl(&self) -> f64 {
        match self {
            Fill::Opened => 0.0,
            Fill::Closed { pnl, .. } => *pnl,
        }
    }
}

/// FIFO queues of open long and short contracts.
///
/// An opening on one side first consumes the oldest contract of the other side, so under
/// alternating actions at most one side is ever non-empty. Repeated openings on the same side
/// accumulate; only the oldest of them is valued or closed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionBook {
    long: VecDeque<Contract>,
    short: VecDeque<Contract>,
}

impl PositionBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes the oldest contract opposing `contract`, or queues `contract` if there is none.
    ///
    /// When closing, `contract` itself is discarded; its entry record is the exit rate.
    pub fn open_or_close(&mut self, contract: Contract) -> Fill {
        let side = contract.side();
        match self.queue_mut(side.opposite()).pop_front() {
            Some(open) => {
                let pnl = open.value_at(contract.entry());
                Fill::Closed {
                    contract: open,
                    pnl,
                }
            }
            None => {
                self.queue_mut(side).push_back(contract);
                Fill::Opened
            }
        }
    }

    /// Mark-to-market value of the oldest open contract, `0.0` when flat.
    ///
    /// If both sides hold contracts the long side wins.
    pub fn unrealized_value(&self, current: &RateRecord) -> f64 {
        self.oldest()
            .map(|c| c.value_at(current))
            .unwrap_or(0.0)
    }

    /// Which action would close the oldest open contract. Advisory only.
    pub fn close_hint(&self) -> CloseHint {
        match self.oldest().map(Contract::side) {
            None => CloseHint::Flat,
            Some(Side::Long) => CloseHint::GoShort,
            Some(Side::Short) => CloseHint::GoLong,
        }
    }

    /// Drops every open contract without settling it.
    pub fn clear(&mut self) {
        self.long.clear();
        self.short.clear();
    }

    pub fn is_flat(&self) -> bool {
        self.long.is_empty() && self.short.is_empty()
    }

    pub fn open_contracts(&self, side: Side) -> &VecDeque<Contract> {
        match side {
            Side::Long => &self.long,
            Side::Short => &self.short,
        }
    }

    fn oldest(&self) -> Option<&Contract> {
        self.long.front().or_else(|| self.short.front())
    }

    fn queue_mut(&mut self, side: Side) -> &mut VecDeque<Contract> {
        match side {
            Side::Long => &mut self.long,
            Side::Short => &mut self.short,
        }
    }
}
