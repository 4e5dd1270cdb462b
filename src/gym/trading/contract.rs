use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::data::domain::{Balance, Price, Quantity, QuoteSide, RateRecord};

// ================================================================================================
// Side
// ================================================================================================

#[derive(
    Copy,
    Clone,
    Debug,
    EnumString,
    EnumIter,
    Display,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    Serialize,
    PartialOrd,
    Ord,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    Long,
    Short,
}

impl Side {
    pub fn opposite(&self) -> Self {
        match self {
            Side::Long => Side::Short,
            Side::Short => Side::Long,
        }
    }

    /// Quote side a contract of this side is entered at.
    pub fn opening_quote(&self) -> QuoteSide {
        match self {
            Side::Long => QuoteSide::Ask,
            Side::Short => QuoteSide::Bid,
        }
    }

    /// Quote side a contract of this side is valued and closed at.
    pub fn closing_quote(&self) -> QuoteSide {
        self.opening_quote().opposite()
    }

    /// Signs a stake magnitude: positive for longs, negative for shorts.
    pub fn signed(&self, stake: Quantity) -> Quantity {
        let magnitude = Quantity(stake.0.abs());
        match self {
            Side::Long => magnitude,
            Side::Short => -magnitude,
        }
    }
}

// ================================================================================================
// Contract
// ================================================================================================

/// An open simulated position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    side: Side,
    investment: Quantity,
    entry: RateRecord,
    entry_elapsed: usize,
}

impl Contract {
    /// Creates a contract whose investment is `stake` signed by `side`.
    pub fn new(side: Side, stake: Quantity, entry: RateRecord, entry_elapsed: usize) -> Self {
        Self {
            side,
            investment: side.signed(stake),
            entry,
            entry_elapsed,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn investment(&self) -> Quantity {
        self.investment
    }

    pub fn entry(&self) -> &RateRecord {
        &self.entry
    }

    pub fn entry_elapsed(&self) -> usize {
        self.entry_elapsed
    }

    /// Close price paid on entry.
    pub fn entry_price(&self) -> Price {
        self.entry.close(self.side.opening_quote())
    }

    /// Mark-to-market value against `current`.
    ///
    /// Formula: `investment * (current.close[closing side] - entry.close[opening side])`
    pub fn value_at(&self, current: &RateRecord) -> f64 {
        let exit = current.close(self.side.closing_quote());
        self.investment.value_of(exit - self.entry_price())
    }
}

// ================================================================================================
// Settlement
// ================================================================================================

/// Record of a contract closed by an opposing action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    /// Side of the contract that was closed.
    pub side: Side,
    /// Quote side the closing action traded at.
    pub closed_at: QuoteSide,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub pnl: f64,
    pub entry_price: Price,
    pub exit_price: Price,
    /// Number of timesteps the contract was held.
    pub duration: usize,
    /// Budget after the P&L was booked.
    pub budget: Balance,
}

impl Settlement {
    pub(crate) fn new(
        contract: &Contract,
        exit: &RateRecord,
        exit_elapsed: usize,
        pnl: f64,
        budget: Balance,
    ) -> Self {
        let closed_at = contract.side().closing_quote();
        Self {
            side: contract.side(),
            closed_at,
            entry_time: contract.entry().time,
            exit_time: exit.time,
            pnl,
            entry_price: contract.entry_price(),
            exit_price: exit.close(closed_at),
            duration: exit_elapsed.saturating_sub(contract.entry_elapsed()),
            budget,
        }
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} closed at {}: {} -> {}, pnl {:.5}, entry {}, exit {}, held {} steps, budget {:.5}",
            self.side,
            self.closed_at,
            self.entry_time.to_rfc3339(),
            self.exit_time.to_rfc3339(),
            self.pnl,
            self.entry_price,
            self.exit_price,
            self.duration,
            self.budget.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::data::domain::{Ohlc, Volume};

    fn record(minute: u32, bid: f64, ask: f64) -> RateRecord {
        RateRecord {
            time: Utc.with_ymd_and_hms(2018, 6, 1, 0, minute, 0).unwrap(),
            volume: Volume(10),
            bid: Ohlc::flat(bid),
            ask: Ohlc::flat(ask),
        }
    }

    #[test]
    fn long_enters_at_ask_and_values_at_bid() {
        let c = Contract::new(Side::Long, Quantity(100.0), record(0, 1.0, 1.5), 0);

        assert_eq!(c.investment(), Quantity(100.0));
        assert_eq!(c.entry_price(), Price(1.5));
        // 100 * (2.0 - 1.5)
        assert!((c.value_at(&record(5, 2.0, 9.0)) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn short_enters_at_bid_and_values_at_ask() {
        let c = Contract::new(Side::Short, Quantity(100.0), record(0, 1.0, 1.5), 3);

        assert_eq!(c.investment(), Quantity(-100.0));
        assert_eq!(c.entry_price(), Price(1.0));
        // -100 * (0.5 - 1.0)
        assert!((c.value_at(&record(5, 9.0, 0.5)) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn stake_sign_is_taken_from_side_only() {
        assert_eq!(Side::Long.signed(Quantity(-3.0)), Quantity(3.0));
        assert_eq!(Side::Short.signed(Quantity(3.0)), Quantity(-3.0));
    }

    #[test]
    fn settlement_captures_both_ends() {
        let c = Contract::new(Side::Short, Quantity(100.0), record(0, 1.2, 1.3), 2);
        let exit = record(25, 1.0, 1.1);

        let s = Settlement::new(&c, &exit, 7, c.value_at(&exit), Balance(110.0));

        assert_eq!(s.side, Side::Short);
        assert_eq!(s.closed_at, QuoteSide::Ask);
        assert_eq!(s.entry_price, Price(1.2));
        assert_eq!(s.exit_price, Price(1.1));
        assert_eq!(s.duration, 5);
        assert!((s.pnl - 10.0).abs() < 1e-9);
        assert!(s.to_string().starts_with("short closed at ask"));
    }
}
