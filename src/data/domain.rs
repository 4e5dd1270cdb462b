use std::{fmt, num::ParseFloatError, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{impl_add_sub_primitive, impl_from_primitive, impl_neg_primitive};

// ================================================================================================
// Domain Strong Types (NewTypes)
// ================================================================================================

/// Represents a quoted exchange rate in the quote currency.
///
/// Used for: Open, High, Low and Close of both the bid and the ask side.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub f64);
impl_from_primitive!(Price, f64);
impl_add_sub_primitive!(Price, f64);
impl_neg_primitive!(Price, f64);

impl FromStr for Price {
    type Err = ParseFloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<f64>().map(Price)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Signed amount invested in a contract.
///
/// Positive values are long (bought at the ask), negative values are short (sold at the bid).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(pub f64);
impl_from_primitive!(Quantity, f64);
impl_add_sub_primitive!(Quantity, f64);
impl_neg_primitive!(Quantity, f64);

impl Quantity {
    /// Value of this quantity over a price move.
    pub fn value_of(self, delta: Price) -> f64 {
        self.0 * delta.0
    }
}

/// Running cash balance of an episode.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balance(pub f64);
impl_from_primitive!(Balance, f64);
impl_add_sub_primitive!(Balance, f64);

impl Balance {
    /// A balance at or below zero ends the episode.
    pub fn is_exhausted(&self) -> bool {
        self.0 <= 0.0
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of ticks traded during a candle, as reported by the broker.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Volume(pub u64);
impl_from_primitive!(Volume, u64);

// ================================================================================================
// Quote Side
// ================================================================================================

/// Side of the two-way quote.
///
/// Longs are opened at the ask and valued against the bid; shorts the other way round.
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
#[serde(rename_all = "lowercase")]
pub enum QuoteSide {
    Bid,
    Ask,
}

impl QuoteSide {
    pub fn opposite(&self) -> Self {
        match self {
            QuoteSide::Bid => QuoteSide::Ask,
            QuoteSide::Ask => QuoteSide::Bid,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

// ================================================================================================
// Rate Records
// ================================================================================================

/// Open/High/Low/Close prices of one quote side over a single candle.
///
/// Accepts both the broker's abbreviated keys (`o`, `h`, `l`, `c`) and the long names, and both
/// string-encoded (`"1.16868"`) and numeric prices.
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Ohlc {
    #[serde(rename = "o", alias = "open")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub open: Price,

    #[serde(rename = "h", alias = "high")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub high: Price,

    #[serde(rename = "l", alias = "low")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub low: Price,

    #[serde(rename = "c", alias = "close")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub close: Price,
}

impl Ohlc {
    /// Candle with all four prices at the same level.
    pub fn flat(price: f64) -> Self {
        let p = Price(price);
        Self {
            open: p,
            high: p,
            low: p,
            close: p,
        }
    }
}

/// One timestep of market data: a two-sided candle plus its volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    #[serde(alias = "timestamp")]
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub volume: Volume,
    pub bid: Ohlc,
    pub ask: Ohlc,
}

impl RateRecord {
    pub fn quote(&self, side: QuoteSide) -> &Ohlc {
        match side {
            QuoteSide::Bid => &self.bid,
            QuoteSide::Ask => &self.ask,
        }
    }

    pub fn close(&self, side: QuoteSide) -> Price {
        self.quote(side).close
    }

    /// Candle start as Unix epoch seconds, including the sub-second part.
    pub fn timestamp_secs(&self) -> f64 {
        self.time.timestamp() as f64 + f64::from(self.time.timestamp_subsec_nanos()) * 1e-9
    }
}
