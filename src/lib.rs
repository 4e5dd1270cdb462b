//! Single-instrument forex trading simulator with a Gym-like step API.
//!
//! An agent observes a two-sided candle plus the state of its position, picks one of
//! `Hold`, `Long` or `Short`, and is rewarded with the P&L realized by closing a contract.
//!
//! ```no_run
//! use fxgym::prelude::*;
//!
//! # fn main() -> FxResult<()> {
//! let mut env = make(EnvConfig::default())?;
//! let mut obs = env.reset()?;
//! loop {
//!     let action = if obs.close_hint == CloseHint::Flat { Action::Long } else { Action::Short };
//!     let (next, reward, outcome, _info) = env.step(action)?;
//!     println!("{reward:?} {}", env.render(RenderMode::Human));
//!     if outcome.is_done() {
//!         break;
//!     }
//!     obs = next;
//! }
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod data;
pub mod error;
pub mod gym;
mod macros;
pub mod prelude;

pub use data::source::{DEFAULT_DATA_DIR, JsonFolder, RateSource};
pub use gym::trading::factory::{make, make_with_source};
