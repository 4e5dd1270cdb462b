use serde::{Deserialize, Serialize};

use crate::{
    agent::Agent,
    data::{
        domain::{Balance, RateRecord},
        episode::{EpisodeId, RateSeries},
        source::RateSource,
    },
    error::FxResult,
    gym::{
        Info, RenderMode, Reward, Step, StepOutcome,
        trading::{
            Env,
            action::{Action, ActionSpace},
            config::EnvConfig,
            contract::Settlement,
            observation::{Observation, ObservationSpace},
            state::EpisodeState,
        },
    },
};

/// Single-instrument forex trading environment.
///
/// # Lifecycle
///
/// ```md
/// Current State                         | Call      | Next State  | Notes
/// --------------------------------------|-----------|-------------|------------------------------------
/// `Running` (elapsed < length - 1)      | step()    | Running     | `StepOutcome::InProgress`
/// `Running` (last timestep consumed)    | step()    | Running     | `Truncated`, rolled to next episode
/// `Running` (budget <= 0)               | step()    | Running     | `Bankrupt`, reward forced, rolled
/// any                                   | reset()   | Running     | Restart at episode 0
/// ```
///
/// Terminal steps roll into the next episode before returning, so there is no separate "done"
/// state to reset out of.
#[derive(Debug, Clone)]
pub struct Environment {
    cfg: EnvConfig,
    data: RateSeries,
    state: EpisodeState,
}

impl Env for Environment {
    #[tracing::instrument(skip(self), fields(ep_id = %self.state.episode.0))]
    fn reset(&mut self) -> FxResult<Observation> {
        self.restart();
        tracing::info!("Environment Reset Initiated.");
        self.observation()
    }

    #[tracing::instrument(
        level = "debug",
        skip(self),
        fields(ep_id = %self.state.episode.0, elapsed = self.state.elapsed)
    )]
    fn step(&mut self, action: Action) -> FxResult<Step<Observation>> {
        // 1. Snapshot the rate the action executes at
        let current = *self.current_record()?;

        // 2. Apply the action
        let mut reward = self
            .state
            .apply_action(action, &current, self.cfg.stake());

        // 3. Time passes
        self.state.elapsed += 1;

        // 4. Termination, length before budget
        let outcome = self.evaluate_outcome();
        match outcome {
            StepOutcome::InProgress => {}
            StepOutcome::Truncated => self.roll_episode(),
            StepOutcome::Bankrupt => {
                tracing::warn!(
                    budget = %self.state.budget,
                    realized = reward.0,
                    "Budget Exhausted. Forcing Bankruptcy Penalty."
                );
                self.roll_episode();
                reward = self.cfg.bankruptcy_penalty();
            }
        }
        self.state.last_reward = Some(reward);

        // 5. Observe the next timestep
        let obs = self.observation()?;
        Ok((obs, reward, outcome, Info::new()))
    }

    fn render(&self, _mode: RenderMode) -> String {
        self.state
            .last_settlement()
            .map(Settlement::to_string)
            .unwrap_or_default()
    }
}

impl Environment {
    /// Validates a raw action code before stepping.
    pub fn try_step(&mut self, code: i64) -> FxResult<Step<Observation>> {
        let action = Action::try_from(code)?;
        self.step(action)
    }

    /// Replaces the dataset and restarts at the first episode.
    ///
    /// On failure the environment keeps its previous data and state.
    #[tracing::instrument(skip_all, fields(source = %source.describe()))]
    pub fn re_init<S: RateSource + ?Sized>(&mut self, source: &S) -> FxResult<()> {
        let data = RateSeries::new(source.load()?, &source.describe())?;
        self.data = data;
        self.restart();
        tracing::info!(episodes = self.data.len(), "Environment Re-initialized.");
        Ok(())
    }

    /// Plays `agent` from the current timestep until the episode ends.
    pub fn run_episode<A: Agent + ?Sized>(&mut self, agent: &mut A) -> FxResult<EpisodeReport> {
        let mut report = EpisodeReport::new(self.state.episode, self.episode_name());
        let mut obs = self.observation()?;

        loop {
            let action = agent.act(&obs)?;
            let (next, reward, outcome, _) = self.step(action)?;
            report.record(reward, outcome, self.state.last_settlement());
            obs = next;
            if outcome.is_done() {
                break;
            }
        }

        agent.reset();
        tracing::info!(
            episode = report.episode.0,
            steps = report.steps,
            total_reward = report.total_reward.0,
            outcome = %report.outcome,
            "Episode Finished"
        );
        Ok(report)
    }

    /// Encodes the current timestep.
    pub fn observation(&self) -> FxResult<Observation> {
        let record = self.current_record()?;
        Ok(Observation::encode(record, &self.state.book))
    }

    pub fn config(&self) -> &EnvConfig {
        &self.cfg
    }

    pub fn state(&self) -> &EpisodeState {
        &self.state
    }

    pub fn episode(&self) -> EpisodeId {
        self.state.episode
    }

    pub fn episode_name(&self) -> &str {
        self.data.get(self.state.episode).name()
    }

    pub fn episode_count(&self) -> usize {
        self.data.len()
    }

    pub fn episode_length(&self) -> usize {
        self.state.episode_length
    }

    pub fn elapsed(&self) -> usize {
        self.state.elapsed
    }

    pub fn budget(&self) -> Balance {
        self.state.budget
    }

    pub fn last_settlement(&self) -> Option<&Settlement> {
        self.state.last_settlement()
    }

    pub fn action_space(&self) -> ActionSpace {
        ActionSpace::default()
    }

    pub fn observation_space(&self) -> ObservationSpace {
        ObservationSpace::default()
    }
}

impl Environment {
    fn current_record(&self) -> FxResult<&RateRecord> {
        self.data.get(self.state.episode).record(self.state.elapsed)
    }

    fn evaluate_outcome(&self) -> StepOutcome {
        if self.state.elapsed > self.state.episode_length.saturating_sub(1) {
            StepOutcome::Truncated
        } else if self.state.budget.is_exhausted() {
            StepOutcome::Bankrupt
        } else {
            StepOutcome::InProgress
        }
    }

    /// Moves to the next episode, discarding open contracts unsettled.
    ///
    /// Data is indexed modulo the episode count, so the counter could keep growing; it is
    /// nevertheless restarted once it passes the episode count. Both effects are intended.
    fn roll_episode(&mut self) {
        let next = self.state.episode + 1;
        let length = self.data.get(next).len();
        self.state
            .start_episode(next, length, self.cfg.initial_budget());
        tracing::info!(
            episode = next.0,
            name = self.episode_name(),
            length,
            "Episode Starting (Next Sequence)"
        );

        if self.state.episode.0 > self.data.len() {
            tracing::info!("Episode counter exceeded dataset. Performing Full Environment Reset.");
            self.restart();
        }
    }

    fn restart(&mut self) {
        let first = EpisodeId(0);
        let length = self.data.get(first).len();
        self.state
            .start_episode(first, length, self.cfg.initial_budget());
    }
}

// ================================================================================================
// Building
// ================================================================================================
impl Environment {
    pub(super) fn new(cfg: EnvConfig, data: RateSeries) -> Self {
        let length = data.get(EpisodeId(0)).len();
        let state = EpisodeState::new(cfg.initial_budget(), length);
        Self { cfg, data, state }
    }
}

// ================================================================================================
// Episode Report
// ================================================================================================

/// Summary of one episode played by [`Environment::run_episode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    pub episode: EpisodeId,
    pub name: String,
    pub steps: usize,
    pub total_reward: Reward,
    pub outcome: StepOutcome,
    pub settlements: Vec<Settlement>,
}

impl EpisodeReport {
    fn new(episode: EpisodeId, name: &str) -> Self {
        Self {
            episode,
            name: name.to_string(),
            steps: 0,
            total_reward: Reward(0.0),
            outcome: StepOutcome::InProgress,
            settlements: Vec::new(),
        }
    }

    fn record(&mut self, reward: Reward, outcome: StepOutcome, settlement: Option<&Settlement>) {
        self.steps += 1;
        self.total_reward += reward;
        self.outcome = outcome;
        self.settlements.extend(settlement.copied());
    }

    /// Sum of realized P&L over all settlements, unaffected by bankruptcy penalties.
    pub fn realized_pnl(&self) -> f64 {
        self.settlements.iter().map(|s| s.pnl).sum()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Utc};

    use super::*;
    use crate::{
        data::{
            domain::{Ohlc, Volume},
            episode::Episode,
        },
        error::{EnvError, FxError},
    };

    fn record(minute: i64, close: f64) -> RateRecord {
        RateRecord {
            time: DateTime::<Utc>::UNIX_EPOCH + Duration::minutes(minute),
            volume: Volume(1),
            bid: Ohlc::flat(close),
            ask: Ohlc::flat(close),
        }
    }

    fn episode(name: &str, closes: &[f64]) -> Episode {
        let rates = closes
            .iter()
            .enumerate()
            .map(|(i, c)| record(i as i64, *c))
            .collect();
        Episode::new(name, rates)
    }

    fn env(episodes: Vec<Episode>) -> Environment {
        let data = RateSeries::new(episodes, "test").unwrap();
        Environment::new(EnvConfig::default(), data)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn reference_scenario() {
        let mut env = env(vec![episode("only", &[1.0, 1.1, 1.2])]);

        let (_, reward, outcome, info) = env.step(Action::Long).unwrap();
        assert_eq!(reward, Reward(0.0));
        assert_eq!(outcome, StepOutcome::InProgress);
        assert!(info.is_empty());
        assert_eq!(env.budget(), Balance(100.0));
        assert!(!env.state().book().is_flat());

        let (_, reward, outcome, _) = env.step(Action::Short).unwrap();
        assert_close(reward.0, 10.0);
        assert_eq!(outcome, StepOutcome::InProgress);
        assert_close(env.budget().0, 110.0);

        let (_, reward, outcome, _) = env.step(Action::Hold).unwrap();
        assert_eq!(reward, Reward(0.0));
        assert!(outcome.is_done());
        assert_eq!(outcome, StepOutcome::Truncated);
        assert_eq!(env.budget(), Balance(100.0));
        assert_eq!(env.elapsed(), 0);
    }

    #[test]
    fn observation_after_step_is_the_next_timestep() {
        let mut env = env(vec![episode("a", &[1.0, 1.1, 1.2])]);

        let (obs, _, _, _) = env.step(Action::Long).unwrap();

        assert_eq!(obs.bid.close.0, 1.1);
        // 100 * (1.1 - 1.0)
        assert_close(obs.unrealized_value, 10.0);
        assert_eq!(obs.to_array()[11], 2.0);
    }

    #[test]
    fn bankruptcy_forces_penalty_even_after_profitable_close() {
        let mut env = env(vec![episode("a", &[1.0, 1.1, 1.2, 1.3])]);

        env.step(Action::Long).unwrap();
        // Close at a profit that does not lift the budget back above zero.
        env.state.budget = Balance(-50.0);
        let (obs, reward, outcome, _) = env.step(Action::Short).unwrap();

        assert_eq!(outcome, StepOutcome::Bankrupt);
        assert_eq!(reward, Reward(-1.0));
        assert_eq!(env.state().last_reward(), Some(Reward(-1.0)));
        // The realized profit is still reported by the settlement.
        let settlement = env.last_settlement().unwrap();
        assert_close(settlement.pnl, 10.0);
        assert_close(settlement.budget.0, -40.0);
        // Rolled: fresh budget, first timestep of the next episode.
        assert_eq!(env.budget(), Balance(100.0));
        assert_eq!(env.elapsed(), 0);
        assert_eq!(obs.bid.close.0, 1.0);
    }

    #[test]
    fn length_check_wins_over_budget_check() {
        let mut env = env(vec![episode("a", &[1.0])]);
        env.state.budget = Balance(-1.0);

        let (_, reward, outcome, _) = env.step(Action::Hold).unwrap();

        assert_eq!(outcome, StepOutcome::Truncated);
        assert_eq!(reward, Reward(0.0));
    }

    #[test]
    fn open_position_is_discarded_at_episode_end() {
        let mut env = env(vec![episode("a", &[1.0, 2.0]), episode("b", &[5.0, 6.0])]);

        env.step(Action::Long).unwrap();
        let (obs, reward, outcome, _) = env.step(Action::Hold).unwrap();

        assert!(outcome.is_done());
        assert_eq!(reward, Reward(0.0));
        assert!(env.state().book().is_flat());
        assert_eq!(env.episode_name(), "b");
        assert_eq!(obs.unrealized_value, 0.0);
        assert_eq!(obs.bid.close.0, 5.0);
    }

    #[test]
    fn counter_wraps_after_passing_episode_count() {
        let mut env = env(vec![episode("a", &[1.0]), episode("b", &[2.0])]);
        let mut seen = Vec::new();

        for _ in 0..5 {
            env.step(Action::Hold).unwrap();
            seen.push((env.episode().0, env.episode_name().to_string()));
        }

        assert_eq!(
            seen,
            vec![
                (1, "b".to_string()),
                (2, "a".to_string()),
                (0, "a".to_string()),
                (1, "b".to_string()),
                (2, "a".to_string()),
            ]
        );
    }

    #[test]
    fn render_reports_only_the_closing_step() {
        let mut env = env(vec![episode("a", &[1.0, 1.1, 1.2, 1.3])]);

        env.step(Action::Short).unwrap();
        assert_eq!(env.render(RenderMode::Human), "");

        env.step(Action::Long).unwrap();
        let rendered = env.render(RenderMode::Human);
        assert!(rendered.starts_with("short closed at ask"));

        env.step(Action::Hold).unwrap();
        assert_eq!(env.render(RenderMode::Human), "");
    }

    #[test]
    fn invalid_code_is_rejected_without_side_effects() {
        let mut env = env(vec![episode("a", &[1.0, 1.1])]);

        let err = env.try_step(7).unwrap_err();

        assert!(matches!(err, FxError::Env(EnvError::InvalidAction(7))));
        assert_eq!(env.elapsed(), 0);
        assert_eq!(env.state().last_action(), None);
    }

    #[test]
    fn reset_restarts_at_first_episode() {
        let mut env = env(vec![episode("a", &[1.0, 1.1]), episode("b", &[2.0, 2.1, 2.2])]);
        env.step(Action::Long).unwrap();
        env.step(Action::Hold).unwrap();
        env.step(Action::Short).unwrap();
        assert_eq!(env.episode(), EpisodeId(1));

        let obs = env.reset().unwrap();

        assert_eq!(env.episode(), EpisodeId(0));
        assert_eq!(env.elapsed(), 0);
        assert_eq!(env.episode_length(), 2);
        assert_eq!(env.budget(), Balance(100.0));
        assert!(env.state().book().is_flat());
        assert_eq!(obs.bid.close.0, 1.0);
    }

    #[test]
    fn re_init_swaps_dataset() {
        let mut env = env(vec![episode("a", &[1.0, 1.1, 1.2])]);
        env.step(Action::Long).unwrap();

        env.re_init(&vec![episode("x", &[3.0]), episode("y", &[4.0])])
            .unwrap();

        assert_eq!(env.episode_count(), 2);
        assert_eq!(env.episode_name(), "x");
        assert_eq!(env.episode_length(), 1);
        assert!(env.state().book().is_flat());
    }

    #[test]
    fn failed_re_init_keeps_previous_data() {
        let mut env = env(vec![episode("a", &[1.0, 1.1, 1.2])]);
        env.step(Action::Long).unwrap();

        assert!(env.re_init(&Vec::<Episode>::new()).is_err());

        assert_eq!(env.episode_name(), "a");
        assert_eq!(env.elapsed(), 1);
    }
}
