use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::{
    data::domain::{Ohlc, RateRecord, Volume},
    gym::trading::{action::Action, book::PositionBook},
};

/// Number of features in an encoded observation.
pub const OBSERVATION_DIM: usize = 12;

/// Which action would close the currently open contract.
///
/// The discriminant equals the code of that action, `0` when flat.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum CloseHint {
    #[default]
    Flat = 0,
    /// A short is open; going long closes it.
    GoLong = 1,
    /// A long is open; going short closes it.
    GoShort = 2,
}

impl CloseHint {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn closing_action(self) -> Option<Action> {
        match self {
            CloseHint::Flat => None,
            CloseHint::GoLong => Some(Action::Long),
            CloseHint::GoShort => Some(Action::Short),
        }
    }
}

/// What the agent sees at a timestep: the raw candle plus the state of its position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub volume: Volume,
    /// Candle start, Unix epoch seconds.
    pub timestamp: f64,
    pub bid: Ohlc,
    pub ask: Ohlc,
    pub unrealized_value: f64,
    pub close_hint: CloseHint,
}

impl Observation {
    pub fn encode(record: &RateRecord, book: &PositionBook) -> Self {
        Self {
            volume: record.volume,
            timestamp: record.timestamp_secs(),
            bid: record.bid,
            ask: record.ask,
            unrealized_value: book.unrealized_value(record),
            close_hint: book.close_hint(),
        }
    }

    /// Flat feature vector in the order
    /// `volume, timestamp, bid o/h/l/c, ask o/h/l/c, unrealized value, close hint`.
    pub fn to_array(&self) -> [f64; OBSERVATION_DIM] {
        [
            self.volume.0 as f64,
            self.timestamp,
            self.bid.open.0,
            self.bid.high.0,
            self.bid.low.0,
            self.bid.close.0,
            self.ask.open.0,
            self.ask.high.0,
            self.ask.low.0,
            self.ask.close.0,
            self.unrealized_value,
            f64::from(self.close_hint.code()),
        ]
    }
}

impl From<Observation> for [f64; OBSERVATION_DIM] {
    fn from(obs: Observation) -> Self {
        obs.to_array()
    }
}

/// Declared per-feature bounds of the observation vector.
///
/// The bounds are advisory: raw timestamps and valuations routinely fall outside them, and
/// nothing clips or rejects such observations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservationSpace {
    pub low: f64,
    pub high: f64,
    pub dim: usize,
}

impl Default for ObservationSpace {
    fn default() -> Self {
        Self {
            low: 0.0,
            high: 1000.0,
            dim: OBSERVATION_DIM,
        }
    }
}

impl ObservationSpace {
    pub fn contains(&self, obs: &Observation) -> bool {
        obs.to_array()
            .iter()
            .all(|x| (self.low..=self.high).contains(x))
    }
}
