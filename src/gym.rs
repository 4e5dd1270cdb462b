use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
    error::{EnvError, FxResult},
    impl_add_sub_primitive, impl_from_primitive, impl_neg_primitive,
};

pub mod trading;

/// Scalar reward returned by a single `step`.
///
/// Wraps the realized profit or loss of the step in account currency. Steps that do not close a
/// position yield `Reward(0.0)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reward(pub f64);
impl_from_primitive!(Reward, f64);
impl_add_sub_primitive!(Reward, f64);
impl_neg_primitive!(Reward, f64);

/// Side channel of a step. Always empty; kept for parity with the Gym step contract.
pub type Info = BTreeMap<String, serde_json::Value>;

/// Result of a single step: the *next* observation, the reward, the outcome and the info map.
pub type Step<O> = (O, Reward, StepOutcome, Info);

/// How the step ended.
///
/// Both terminal variants roll the environment into the next episode before the step returns,
/// so the accompanying observation already belongs to the new episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
pub enum StepOutcome {
    InProgress,
    /// The last timestep of the episode was consumed.
    Truncated,
    /// The budget dropped to zero or below.
    Bankrupt,
}

impl StepOutcome {
    /// The Gym `done` flag.
    pub fn is_done(&self) -> bool {
        !matches!(self, Self::InProgress)
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated)
    }

    pub fn is_bankrupt(&self) -> bool {
        matches!(self, Self::Bankrupt)
    }
}

impl From<StepOutcome> for bool {
    fn from(outcome: StepOutcome) -> Self {
        outcome.is_done()
    }
}

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
    EnumString,
    EnumIter,
    Display,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Human,
}

impl RenderMode {
    /// Parses a mode name such as `"human"`.
    pub fn parse_mode(name: &str) -> FxResult<Self> {
        name.parse()
            .map_err(|_| EnvError::InvalidRenderMode(name.to_string()).into())
    }
}
