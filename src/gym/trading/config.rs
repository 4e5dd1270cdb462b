use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    data::{
        domain::{Balance, Quantity},
        source::DEFAULT_DATA_DIR,
    },
    error::{EnvError, FxResult},
    gym::Reward,
};

/// Configuration blueprint for building a trading [`Environment`].
///
/// # Defaults
///
/// | field                | default                             |
/// |----------------------|-------------------------------------|
/// | `data_dir`           | `data/candlerates/EUR_USD/2018-06/` |
/// | `multiplier`         | `100.0`                             |
/// | `unit_stake`         | `1.0`                               |
/// | `initial_budget`     | `100.0`                             |
/// | `bankruptcy_penalty` | `-1.0`                              |
///
/// # Example
///
/// ```no_run
/// # use fxgym::prelude::*;
/// # fn example() -> FxResult<()> {
/// let cfg = EnvConfig::default()
///     .with_data_dir("data/candlerates/EUR_USD/2018-06/")
///     .with_unit_stake(2.0);
///
/// let env = make(cfg)?;
/// # Ok(())
/// # }
/// ```
///
/// [`Environment`]: crate::gym::trading::env::Environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Directory of candle files read by [`crate::make`].
    data_dir: PathBuf,

    /// Contract size per unit of stake.
    multiplier: f64,

    /// Units staked per opening action.
    unit_stake: f64,

    /// Cash balance every episode starts with.
    initial_budget: Balance,

    /// Reward returned in place of the realized P&L on the step the budget runs out.
    bankruptcy_penalty: Reward,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            multiplier: 100.0,
            unit_stake: 1.0,
            initial_budget: Balance(100.0),
            bankruptcy_penalty: Reward(-1.0),
        }
    }
}

impl EnvConfig {
    pub fn with_data_dir(self, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..self
        }
    }

    pub fn with_multiplier(self, multiplier: f64) -> Self {
        Self { multiplier, ..self }
    }

    pub fn with_unit_stake(self, unit_stake: f64) -> Self {
        Self { unit_stake, ..self }
    }

    pub fn with_initial_budget(self, initial_budget: f64) -> Self {
        Self {
            initial_budget: Balance(initial_budget),
            ..self
        }
    }

    pub fn with_bankruptcy_penalty(self, penalty: f64) -> Self {
        Self {
            bankruptcy_penalty: Reward(penalty),
            ..self
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn unit_stake(&self) -> f64 {
        self.unit_stake
    }

    pub fn initial_budget(&self) -> Balance {
        self.initial_budget
    }

    pub fn bankruptcy_penalty(&self) -> Reward {
        self.bankruptcy_penalty
    }

    /// Unsigned investment of a single contract: `unit_stake * multiplier`.
    pub fn stake(&self) -> Quantity {
        Quantity(self.unit_stake * self.multiplier)
    }

    pub fn validate(&self) -> FxResult<()> {
        fn positive(name: &str, value: f64) -> FxResult<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(EnvError::InvalidConfig(format!("`{name}` must be positive, got {value}")).into())
            }
        }

        positive("multiplier", self.multiplier)?;
        positive("unit_stake", self.unit_stake)?;
        positive("initial_budget", self.initial_budget.0)?;
        if !self.bankruptcy_penalty.0.is_finite() {
            return Err(EnvError::InvalidConfig(format!(
                "`bankruptcy_penalty` must be finite, got {}",
                self.bankruptcy_penalty.0
            ))
            .into());
        }
        Ok(())
    }
}

impl From<&Path> for EnvConfig {
    fn from(data_dir: &Path) -> Self {
        EnvConfig::default().with_data_dir(data_dir)
    }
}

impl From<PathBuf> for EnvConfig {
    fn from(data_dir: PathBuf) -> Self {
        EnvConfig::default().with_data_dir(data_dir)
    }
}
