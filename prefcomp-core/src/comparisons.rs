//! The outer loop of reward learning from preference comparisons.
mod config;
use crate::{
    error::PrefCompError,
    record::Logger,
    Fragmenter, PreferenceDataset, PreferenceGatherer, RandomFragmenter, RandomFragmenterConfig,
    RewardTrainer, SyntheticGatherer, SyntheticGathererConfig, Trajectory, TrajectoryGenerator,
};
use anyhow::Result;
pub use config::PreferenceComparisonsConfig;
use std::collections::BTreeSet;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Learns a reward model from preferences between trajectory fragments.
///
/// # Training loop
///
/// Each iteration of [`PreferenceComparisons::train()`] does the following:
///
/// 1. Sample trajectories covering `sample_steps` transitions from the
///    [`TrajectoryGenerator`].
/// 2. Check that all terminal trajectories have the same length, unless
///    `allow_variable_horizon` is set.
/// 3. Cut the trajectories into fragment pairs with the [`Fragmenter`].
/// 4. Gather preferences for the pairs with the [`PreferenceGatherer`].
///    Metrics are recorded under `preferences/`.
/// 5. Append the pairs and preferences to the [`PreferenceDataset`].
/// 6. Train the reward model on the whole dataset with the
///    [`RewardTrainer`]. Metrics are recorded under `reward/`.
/// 7. Train the agent for `agent_steps` steps with the
///    [`TrajectoryGenerator`]. Metrics are recorded under `agent/`.
/// 8. Dump the metrics of the iteration to the [`Logger`].
///
/// ```mermaid
/// graph LR
///     A[TrajectoryGenerator]-->|Trajectory|B[Fragmenter]
///     B -->|FragmentPair|C[PreferenceGatherer]
///     C -->|preferences|D[PreferenceDataset]
///     D -->E[RewardTrainer]
///     E -.->|learned reward|A
/// ```
///
/// The dataset only grows; it is never reset between iterations.
///
/// All sub-components write into the logger of this struct. Their own loggers
/// are replaced when they are given to the builder methods.
pub struct PreferenceComparisons<O, A, G, T>
where
    G: TrajectoryGenerator<O, A>,
    T: RewardTrainer<O, A>,
{
    trajectory_generator: G,
    reward_trainer: T,
    fragmenter: Box<dyn Fragmenter<O, A>>,
    preference_gatherer: Box<dyn PreferenceGatherer<O, A>>,
    dataset: PreferenceDataset<O, A>,
    logger: Logger,

    /// The number of environment steps sampled in each iteration.
    sample_steps: usize,

    /// The number of agent training steps in each iteration.
    agent_steps: usize,

    allow_variable_horizon: bool,

    /// Length of the terminal trajectories seen so far.
    horizon: Option<usize>,
}

impl<O, A, G, T> PreferenceComparisons<O, A, G, T>
where
    O: Clone,
    A: Clone,
    G: TrajectoryGenerator<O, A>,
    T: RewardTrainer<O, A>,
{
    /// Constructs the training loop.
    ///
    /// A [`RandomFragmenter`] and a [`SyntheticGatherer`] with default
    /// configurations are used unless replaced with
    /// [`fragmenter`](Self::fragmenter) and
    /// [`preference_gatherer`](Self::preference_gatherer). Records are
    /// discarded unless a logger is given with [`logger`](Self::logger).
    pub fn build(
        config: &PreferenceComparisonsConfig,
        mut trajectory_generator: G,
        mut reward_trainer: T,
    ) -> Self {
        let logger = Logger::default();
        trajectory_generator.set_logger(logger.clone());
        reward_trainer.set_logger(logger.clone());
        let fragmenter =
            RandomFragmenter::build_with_logger(&RandomFragmenterConfig::default(), logger.clone());
        let preference_gatherer = SyntheticGatherer::build_with_logger(
            &SyntheticGathererConfig::default(),
            logger.clone(),
        );

        Self {
            trajectory_generator,
            reward_trainer,
            fragmenter: Box::new(fragmenter),
            preference_gatherer: Box::new(preference_gatherer),
            dataset: PreferenceDataset::new(),
            logger,
            sample_steps: config.sample_steps,
            // Some(0) is honoured
            agent_steps: config.agent_steps.unwrap_or(config.sample_steps),
            allow_variable_horizon: config.allow_variable_horizon,
            horizon: None,
        }
    }

    /// Replaces the fragmenter.
    pub fn fragmenter(mut self, mut fragmenter: Box<dyn Fragmenter<O, A>>) -> Self {
        fragmenter.set_logger(self.logger.clone());
        self.fragmenter = fragmenter;
        self
    }

    /// Replaces the preference gatherer.
    pub fn preference_gatherer(mut self, mut gatherer: Box<dyn PreferenceGatherer<O, A>>) -> Self {
        gatherer.set_logger(self.logger.clone());
        self.preference_gatherer = gatherer;
        self
    }

    /// Replaces the logger of this struct and of all the sub-components.
    pub fn logger(mut self, logger: Logger) -> Self {
        self.trajectory_generator.set_logger(logger.clone());
        self.reward_trainer.set_logger(logger.clone());
        self.fragmenter.set_logger(logger.clone());
        self.preference_gatherer.set_logger(logger.clone());
        self.logger = logger;
        self
    }

    /// Runs `iterations` iterations of the training loop.
    pub fn train(&mut self, iterations: usize) -> Result<()> {
        for i in 0..iterations {
            self.logger
                .log(format!("Collecting {} trajectory steps", self.sample_steps));
            let trajectories = self.trajectory_generator.sample(self.sample_steps)?;
            self.check_fixed_horizon(&trajectories)?;

            self.logger.log("Creating fragment pairs");
            let fragments = self.fragmenter.fragment(&trajectories)?;
            let preferences = {
                let _scope = self.logger.accumulate_means("preferences");
                self.logger.log("Gathering preferences");
                self.preference_gatherer.gather(&fragments)?
            };
            self.dataset.push(fragments, preferences)?;
            self.logger
                .log(format!("Dataset now contains {} samples", self.dataset.len()));
            self.logger
                .record_scalar("dataset_size", self.dataset.len() as f32);

            {
                let _scope = self.logger.accumulate_means("reward");
                self.logger.log("Training reward model");
                self.reward_trainer.train(&self.dataset)?;
            }
            {
                let _scope = self.logger.accumulate_means("agent");
                self.logger
                    .log(format!("Training agent for {} steps", self.agent_steps));
                self.trajectory_generator.train(self.agent_steps)?;
            }
            self.logger.dump(i);
        }
        Ok(())
    }

    /// Fails if terminal trajectories have different lengths, including the
    /// length seen in earlier iterations.
    fn check_fixed_horizon(&mut self, trajectories: &[Trajectory<O, A>]) -> Result<()> {
        if self.allow_variable_horizon {
            return Ok(());
        }

        let mut horizons: BTreeSet<usize> = trajectories
            .iter()
            .filter(|t| t.terminal)
            .map(|t| t.len())
            .collect();
        horizons.extend(self.horizon);

        match horizons.len() {
            0 => Ok(()),
            1 => {
                self.horizon = horizons.into_iter().next();
                Ok(())
            }
            _ => Err(PrefCompError::VariableHorizon {
                horizons: horizons.into_iter().collect(),
            }
            .into()),
        }
    }

    /// The dataset of preferences gathered so far.
    pub fn dataset(&self) -> &PreferenceDataset<O, A> {
        &self.dataset
    }

    /// The trajectory generator.
    pub fn trajectory_generator(&self) -> &G {
        &self.trajectory_generator
    }

    /// The reward trainer.
    pub fn reward_trainer(&self) -> &T {
        &self.reward_trainer
    }

    /// The logger shared by all the sub-components.
    pub fn get_logger(&self) -> &Logger {
        &self.logger
    }

    /// The number of agent training steps in each iteration.
    pub fn agent_steps(&self) -> usize {
        self.agent_steps
    }
}
