use std::{
    fs,
    path::{Path, PathBuf},
};

use itertools::Itertools;
use serde::Deserialize;

use crate::{
    data::{domain::RateRecord, episode::Episode},
    error::{FxResult, IoError},
};

/// Location of the sample dataset shipped with the crate, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "data/candlerates/EUR_USD/2018-06/";

/// Supplies the ordered episodes an environment trades over.
///
/// Implementations must be deterministic: two calls on an unchanged source return the same
/// episodes in the same order.
pub trait RateSource {
    /// Human readable locator, used in logs and error messages.
    fn describe(&self) -> String;

    /// Blocking read of the whole dataset.
    fn load(&self) -> FxResult<Vec<Episode>>;
}

impl RateSource for Vec<Episode> {
    fn describe(&self) -> String {
        format!("in-memory ({} episodes)", self.len())
    }

    fn load(&self) -> FxResult<Vec<Episode>> {
        Ok(self.clone())
    }
}

// ================================================================================================
// JSON Folder
// ================================================================================================

/// A directory of candle files, one episode per `*.json` file.
///
/// Files are visited in file-name order and each episode is named after its file stem. A file
/// holds either a broker candles response (`{"instrument": ..., "candles": [...]}`) or a bare
/// array of candles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFolder {
    path: PathBuf,
}

impl JsonFolder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonFolder {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

impl From<&Path> for JsonFolder {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<PathBuf> for JsonFolder {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RateFile {
    Candles { candles: Vec<RateRecord> },
    Bare(Vec<RateRecord>),
}

impl From<RateFile> for Vec<RateRecord> {
    fn from(file: RateFile) -> Self {
        match file {
            RateFile::Candles { candles } => candles,
            RateFile::Bare(rates) => rates,
        }
    }
}

impl RateSource for JsonFolder {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> FxResult<Vec<Episode>> {
        let entries = fs::read_dir(&self.path).map_err(|source| IoError::ReadDir {
            path: self.path.clone(),
            source,
        })?;

        let files = entries
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(IoError::from)?
            .into_iter()
            .filter(|p| p.is_file() && is_json(p))
            .sorted()
            .collect::<Vec<_>>();

        let episodes = files
            .iter()
            .map(PathBuf::as_path)
            .map(read_episode)
            .collect::<FxResult<Vec<_>>>()?;

        tracing::info!(episodes = episodes.len(), "Rate data loaded");
        Ok(episodes)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn read_episode(path: &Path) -> FxResult<Episode> {
    let raw = fs::read_to_string(path).map_err(|source| IoError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let file: RateFile = serde_json::from_str(&raw).map_err(|source| IoError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let rates: Vec<RateRecord> = file.into();

    tracing::debug!(episode = %name, records = rates.len(), "Episode file parsed");
    Ok(Episode::new(name, rates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FxError;

    fn sample_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_DATA_DIR)
    }

    #[test]
    fn loads_bundled_sample_in_file_name_order() {
        let episodes = JsonFolder::new(sample_dir()).load().unwrap();

        let names = episodes.iter().map(Episode::name).collect::<Vec<_>>();
        assert_eq!(names, vec!["2018-06-01", "2018-06-04"]);
        assert!(episodes.iter().all(|ep| !ep.is_empty()));
    }

    #[test]
    fn missing_directory_is_io_error() {
        let err = JsonFolder::new("does/not/exist").load().unwrap_err();
        assert!(matches!(err, FxError::Io(IoError::ReadDir { .. })));
    }

    #[test]
    fn accepts_bare_candle_arrays() {
        let raw = r#"[{
            "time": "2018-06-01T00:00:00Z",
            "volume": 3,
            "bid": {"o": "1.1", "h": "1.2", "l": "1.0", "c": "1.15"},
            "ask": {"o": "1.1", "h": "1.2", "l": "1.0", "c": "1.16"}
        }]"#;

        let rates: Vec<RateRecord> = serde_json::from_str::<RateFile>(raw).unwrap().into();
        assert_eq!(rates.len(), 1);
    }

    #[test]
    fn in_memory_source_round_trips() {
        let source = vec![Episode::new("a", Vec::new())];
        assert_eq!(source.load().unwrap(), source);
        assert_eq!(source.describe(), "in-memory (1 episodes)");
    }
}
