use crate::{
    error::FxResult,
    gym::trading::{action::Action, observation::Observation},
};

/// A decision policy driven by [`Environment::run_episode`].
///
/// Training loops that manage stepping themselves do not need this trait; they call
/// [`Env::step`](crate::gym::trading::Env::step) directly.
///
/// [`Environment::run_episode`]: crate::gym::trading::env::Environment::run_episode
pub trait Agent {
    /// Decide on an action based on the current observation.
    fn act(&mut self, obs: &Observation) -> FxResult<Action>;

    /// Optional agent name for logging/debugging.
    fn name(&self) -> &str {
        "UnnamedAgent: override Agent::name()"
    }

    /// Reset internal state at the end of an episode. Default is no-op.
    fn reset(&mut self) {}
}

impl Agent for Box<dyn Agent> {
    fn act(&mut self, obs: &Observation) -> FxResult<Action> {
        (**self).act(obs)
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Replays a fixed action sequence, holding once it is exhausted.
#[derive(Debug, Clone, Default)]
pub struct Scripted {
    actions: Vec<Action>,
    cursor: usize,
}

impl Scripted {
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            cursor: 0,
        }
    }
}

impl Agent for Scripted {
    fn act(&mut self, _obs: &Observation) -> FxResult<Action> {
        let action = self
            .actions
            .get(self.cursor)
            .copied()
            .unwrap_or(Action::Hold);
        self.cursor += 1;
        Ok(action)
    }

    fn name(&self) -> &str {
        "Scripted"
    }

    fn reset(&mut self) {
        self.cursor = 0;
    }
}

/// Closes whatever is open as soon as the position shows a profit, and re-enters `entry` when
/// flat.
#[derive(Debug, Clone, Copy)]
pub struct TakeProfit {
    entry: Action,
}

impl TakeProfit {
    pub fn new(entry: Action) -> Self {
        Self { entry }
    }
}

impl Agent for TakeProfit {
    fn act(&mut self, obs: &Observation) -> FxResult<Action> {
        let action = match obs.close_hint.closing_action() {
            None => self.entry,
            Some(close) if obs.unrealized_value > 0.0 => close,
            Some(_) => Action::Hold,
        };
        Ok(action)
    }

    fn name(&self) -> &str {
        "TakeProfit"
    }
}
