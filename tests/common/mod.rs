#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use fxgym::prelude::*;

/// Absolute path of the sample dataset shipped with the crate.
pub fn sample_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_DATA_DIR)
}

/// A five-minute candle whose bid and ask are both flat at `close`.
pub fn candle(step: i64, close: f64) -> RateRecord {
    RateRecord {
        time: DateTime::<Utc>::UNIX_EPOCH + Duration::minutes(5 * step),
        volume: Volume(10),
        bid: Ohlc::flat(close),
        ask: Ohlc::flat(close),
    }
}

/// A candle with a fixed bid/ask spread around `mid`.
pub fn spread_candle(step: i64, mid: f64, spread: f64) -> RateRecord {
    RateRecord {
        ask: Ohlc::flat(mid + spread / 2.0),
        bid: Ohlc::flat(mid - spread / 2.0),
        ..candle(step, mid)
    }
}

pub fn episode(name: &str, closes: &[f64]) -> Episode {
    let rates = closes
        .iter()
        .enumerate()
        .map(|(i, c)| candle(i as i64, *c))
        .collect();
    Episode::new(name, rates)
}

pub fn env_over(episodes: Vec<Episode>) -> Environment {
    make_with_source(EnvConfig::default(), &episodes).expect("in-memory dataset is valid")
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
