//! This module is used for tests.
use crate::{
    record::Logger, PreferenceDataset, RewardTrainer, Trajectory, TrajectoryGenerator,
};
use anyhow::Result;

/// Dummy trajectory generator.
///
/// Observations are `[t / horizon]` for time step `t`, actions are `[0]` and
/// the reward of a step is its observation. All trajectories of a call to
/// `sample` have the same horizon, taken from `horizons` in turn.
pub struct DummyGenerator {
    horizons: Vec<usize>,
    terminal: bool,

    /// Arguments of the calls to `sample`.
    pub sample_calls: Vec<usize>,

    /// Arguments of the calls to `train`.
    pub train_calls: Vec<usize>,

    /// The logger.
    pub logger: Logger,
}

impl DummyGenerator {
    /// Generates terminal trajectories of length `horizon`.
    pub fn new(horizon: usize) -> Self {
        Self::with_horizons(vec![horizon])
    }

    /// Generates terminal trajectories whose horizon changes between calls.
    pub fn with_horizons(horizons: Vec<usize>) -> Self {
        Self {
            horizons,
            terminal: true,
            sample_calls: vec![],
            train_calls: vec![],
            logger: Logger::default(),
        }
    }

    /// Makes trajectories truncated instead of terminal.
    pub fn truncated(mut self) -> Self {
        self.terminal = false;
        self
    }

    /// Creates a trajectory of length `horizon`.
    pub fn trajectory(horizon: usize, terminal: bool) -> Trajectory<Vec<f32>, Vec<f32>> {
        let obs: Vec<Vec<f32>> = (0..=horizon)
            .map(|t| vec![t as f32 / horizon.max(1) as f32])
            .collect();
        let rews = obs[..horizon].iter().map(|o| o[0]).collect();
        Trajectory {
            obs,
            acts: vec![vec![0.0]; horizon],
            infos: None,
            rews,
            terminal,
        }
    }
}

impl TrajectoryGenerator<Vec<f32>, Vec<f32>> for DummyGenerator {
    fn sample(&mut self, steps: usize) -> Result<Vec<Trajectory<Vec<f32>, Vec<f32>>>> {
        let horizon = self.horizons[self.sample_calls.len() % self.horizons.len()];
        self.sample_calls.push(steps);

        let n = steps.div_ceil(horizon.max(1));
        Ok((0..n.max(1))
            .map(|_| Self::trajectory(horizon, self.terminal))
            .collect())
    }

    fn train(&mut self, steps: usize) -> Result<()> {
        self.train_calls.push(steps);
        self.logger.record_scalar("steps", steps as f32);
        Ok(())
    }

    fn set_logger(&mut self, logger: Logger) {
        self.logger = logger;
    }
}

/// Dummy reward trainer.
#[derive(Default)]
pub struct DummyRewardTrainer {
    /// Sizes of the datasets passed to `train`.
    pub dataset_lens: Vec<usize>,

    /// The logger.
    pub logger: Logger,
}

impl<O, A> RewardTrainer<O, A> for DummyRewardTrainer {
    fn train(&mut self, dataset: &PreferenceDataset<O, A>) -> Result<()> {
        self.dataset_lens.push(dataset.len());
        self.logger.record_scalar("loss", 1.0 / dataset.len().max(1) as f32);
        Ok(())
    }

    fn set_logger(&mut self, logger: Logger) {
        self.logger = logger;
    }
}
