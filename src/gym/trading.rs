use crate::{
    error::FxResult,
    gym::{RenderMode, Step},
};

pub mod action;
pub mod book;
pub mod config;
pub mod contract;
pub mod env;
pub mod factory;
pub mod observation;
pub mod state;

use action::Action;
use observation::Observation;

/// Gym-style step environment.
pub trait Env {
    /// Restarts the run at the first episode and returns its first observation.
    fn reset(&mut self) -> FxResult<Observation>;

    /// Applies `action`, advances time by one timestep and reports the outcome.
    fn step(&mut self, action: Action) -> FxResult<Step<Observation>>;

    /// Describes the trade closed by the last step, or an empty string if none was closed.
    fn render(&self, mode: RenderMode) -> String;
}
