//! Sources of trajectories.
use crate::{error::PrefCompError, record::Logger, Trajectory};
use anyhow::Result;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Generates trajectories, possibly while training an agent on the learned
/// reward.
pub trait TrajectoryGenerator<O, A> {
    /// Samples trajectories covering at least `steps` transitions.
    fn sample(&mut self, steps: usize) -> Result<Vec<Trajectory<O, A>>>;

    /// Trains the agent for `steps` environment steps.
    ///
    /// The default implementation does nothing, for generators without an
    /// agent.
    fn train(&mut self, _steps: usize) -> Result<()> {
        Ok(())
    }

    /// Replaces the logger.
    fn set_logger(&mut self, logger: Logger);
}

/// A [`TrajectoryGenerator`] drawing from a fixed set of trajectories.
pub struct TrajectoryDataset<O, A> {
    trajectories: Vec<Trajectory<O, A>>,
    rng: StdRng,
    logger: Logger,
}

impl<O, A> TrajectoryDataset<O, A> {
    /// Creates a generator over `trajectories`.
    pub fn new(trajectories: Vec<Trajectory<O, A>>, seed: u64) -> Self {
        Self {
            trajectories,
            rng: StdRng::seed_from_u64(seed),
            logger: Logger::default(),
        }
    }

    /// The total number of transitions in the dataset.
    pub fn num_steps(&self) -> usize {
        self.trajectories.iter().map(|t| t.len()).sum()
    }
}

impl<O: Clone, A: Clone> TrajectoryGenerator<O, A> for TrajectoryDataset<O, A> {
    /// Takes trajectories in random order until `steps` transitions are
    /// covered.
    fn sample(&mut self, steps: usize) -> Result<Vec<Trajectory<O, A>>> {
        let available = self.num_steps();
        if available < steps {
            return Err(PrefCompError::InsufficientSteps {
                requested: steps,
                available,
            }
            .into());
        }

        let mut ixs: Vec<usize> = (0..self.trajectories.len()).collect();
        ixs.shuffle(&mut self.rng);

        let mut n = 0;
        let mut samples = vec![];
        for ix in ixs {
            if n >= steps {
                break;
            }
            let traj = &self.trajectories[ix];
            n += traj.len();
            samples.push(traj.clone());
        }
        Ok(samples)
    }

    fn train(&mut self, steps: usize) -> Result<()> {
        self.logger.log(format!(
            "Trajectories are sampled from a fixed dataset, skipping {} steps of agent training",
            steps
        ));
        Ok(())
    }

    fn set_logger(&mut self, logger: Logger) {
        self.logger = logger;
    }
}
