use crate::{
    data::{
        episode::RateSeries,
        source::{JsonFolder, RateSource},
    },
    error::FxResult,
    gym::trading::{config::EnvConfig, env::Environment},
};

/// Builds a trading environment from the candle files in `cfg.data_dir()`.
#[tracing::instrument(skip(cfg), fields(data_dir = tracing::field::Empty))]
pub fn make(cfg: impl Into<EnvConfig>) -> FxResult<Environment> {
    let env_cfg = cfg.into();
    tracing::Span::current().record(
        "data_dir",
        tracing::field::display(env_cfg.data_dir().display()),
    );

    let source = JsonFolder::new(env_cfg.data_dir());
    make_with_source(env_cfg, &source)
}

/// Builds a trading environment from an arbitrary rate source.
///
/// The whole dataset is loaded and validated up front; a missing or malformed source fails here
/// rather than on the first `step`.
#[tracing::instrument(skip_all, fields(source = %source.describe()))]
pub fn make_with_source<S: RateSource + ?Sized>(
    cfg: impl Into<EnvConfig>,
    source: &S,
) -> FxResult<Environment> {
    let env_cfg = cfg.into();
    env_cfg.validate()?;

    let data = RateSeries::new(source.load()?, &source.describe())?;
    tracing::info!(episodes = data.len(), "Environment Built.");

    Ok(Environment::new(env_cfg, data))
}
