use serde::{Deserialize, Serialize};

use crate::{
    data::domain::RateRecord,
    error::{DataError, FxResult, SystemError},
    impl_add_sub_primitive, impl_from_primitive,
};

/// Monotonic episode counter.
///
/// The counter is allowed to run past the number of loaded episodes; data is always indexed
/// modulo the episode count.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct EpisodeId(pub usize);
impl_from_primitive!(EpisodeId, usize);
impl_add_sub_primitive!(EpisodeId, usize);

/// A named, ordered run of rate records over which budget and positions are tracked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    name: String,
    rates: Vec<RateRecord>,
}

impl Episode {
    pub fn new(name: impl Into<String>, rates: Vec<RateRecord>) -> Self {
        Self {
            name: name.into(),
            rates,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rates(&self) -> &[RateRecord] {
        &self.rates
    }

    /// Number of timesteps.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Record at `elapsed`, or [`SystemError::IndexOutOfRange`] past the last timestep.
    pub fn record(&self, elapsed: usize) -> FxResult<&RateRecord> {
        self.rates.get(elapsed).ok_or_else(|| {
            SystemError::IndexOutOfRange(format!(
                "elapsed {elapsed} exceeds last timestep {} of episode '{}'",
                self.rates.len().saturating_sub(1),
                self.name
            ))
            .into()
        })
    }
}

/// The fully materialized dataset backing an environment.
///
/// Guaranteed non-empty, with every episode holding at least one record.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSeries {
    episodes: Vec<Episode>,
}

impl RateSeries {
    /// Validates and wraps loaded episodes.
    ///
    /// `origin` only decorates the error message.
    pub fn new(episodes: Vec<Episode>, origin: &str) -> FxResult<Self> {
        if episodes.is_empty() {
            return Err(DataError::NoEpisodes(origin.to_string()).into());
        }
        if let Some(empty) = episodes.iter().find(|ep| ep.is_empty()) {
            return Err(DataError::EmptyEpisode(empty.name().to_string()).into());
        }
        Ok(Self { episodes })
    }

    /// Number of loaded episodes.
    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    /// Episode selected cyclically by `id % len`.
    pub fn get(&self, id: EpisodeId) -> &Episode {
        &self.episodes[id.0 % self.episodes.len()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Episode> {
        self.episodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::{
        data::domain::{Ohlc, Volume},
        error::FxError,
    };

    fn record(close: f64) -> RateRecord {
        RateRecord {
            time: DateTime::<Utc>::UNIX_EPOCH,
            volume: Volume(1),
            bid: Ohlc::flat(close),
            ask: Ohlc::flat(close),
        }
    }

    fn series(lengths: &[usize]) -> RateSeries {
        let episodes = lengths
            .iter()
            .enumerate()
            .map(|(i, len)| Episode::new(format!("ep-{i}"), vec![record(1.0); *len]))
            .collect();
        RateSeries::new(episodes, "test").unwrap()
    }

    #[test]
    fn episodes_wrap_modulo_count() {
        let s = series(&[1, 2, 3]);

        assert_eq!(s.get(EpisodeId(0)).name(), "ep-0");
        assert_eq!(s.get(EpisodeId(3)).name(), "ep-0");
        assert_eq!(s.get(EpisodeId(4)).len(), 2);
        assert_eq!(s.get(EpisodeId(3 * 1000 + 2)).name(), "ep-2");
    }

    #[test]
    fn record_past_end_is_index_out_of_range() {
        let s = series(&[2]);
        let ep = s.get(EpisodeId(0));

        assert!(ep.record(1).is_ok());
        let err = ep.record(2).unwrap_err();
        assert!(matches!(
            err,
            FxError::System(SystemError::IndexOutOfRange(_))
        ));
    }

    #[test]
    fn rejects_empty_dataset() {
        let err = RateSeries::new(Vec::new(), "nowhere").unwrap_err();
        assert!(matches!(err, FxError::Data(DataError::NoEpisodes(_))));
    }

    #[test]
    fn rejects_episode_without_records() {
        let episodes = vec![
            Episode::new("full", vec![record(1.0)]),
            Episode::new("hollow", Vec::new()),
        ];
        let err = RateSeries::new(episodes, "test").unwrap_err();
        assert!(matches!(err, FxError::Data(DataError::EmptyEpisode(name)) if name == "hollow"));
    }
}
