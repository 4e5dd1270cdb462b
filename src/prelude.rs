// 1. Traits
pub use crate::agent::{Agent, Scripted, TakeProfit};
pub use crate::data::source::RateSource;
pub use crate::gym::trading::Env;

// 2. The Core "Loop" Types
pub use crate::gym::trading::{
    action::{Action, ActionSpace},
    config::EnvConfig,
    env::{EpisodeReport, Environment},
    observation::{CloseHint, OBSERVATION_DIM, Observation, ObservationSpace},
    state::EpisodeState,
};
pub use crate::gym::{Info, RenderMode, Reward, Step, StepOutcome};

// 3. Financial Domain Types
pub use crate::data::domain::{Balance, Ohlc, Price, Quantity, QuoteSide, RateRecord, Volume};
pub use crate::data::episode::{Episode, EpisodeId, RateSeries};
pub use crate::gym::trading::{
    book::{Fill, PositionBook},
    contract::{Contract, Settlement, Side},
};

// 4. Errors
pub use crate::error::{DataError, EnvError, FxError, FxResult, IoError, SystemError};

// 5. Factories & Sources
pub use crate::data::source::{DEFAULT_DATA_DIR, JsonFolder};
pub use crate::gym::trading::factory::{make, make_with_source};
