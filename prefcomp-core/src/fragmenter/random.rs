//! Uniform random fragmenter.
use super::{Fragmenter, RandomFragmenterConfig};
use crate::{error::PrefCompError, record::Logger, FragmentPair, Trajectory};
use anyhow::Result;
use itertools::Itertools;
use rand::{distributions::WeightedIndex, prelude::Distribution, rngs::StdRng, Rng, SeedableRng};

/// Samples fragments of trajectories uniformly at random with replacement.
///
/// Each fragment is part of a single trajectory and has a fixed length.
/// This leads to a bias: transitions within `fragment_length` of either end
/// of a trajectory are less likely to be part of a fragment. Trajectories
/// shorter than `fragment_length` are never used.
pub struct RandomFragmenter {
    fragment_length: usize,
    num_pairs: usize,
    warning_threshold: usize,
    rng: StdRng,
    logger: Logger,
}

impl RandomFragmenter {
    /// Constructs the fragmenter.
    pub fn build(config: &RandomFragmenterConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            fragment_length: config.fragment_length,
            num_pairs: config.num_pairs,
            warning_threshold: config.warning_threshold,
            rng,
            logger: Logger::default(),
        }
    }

    /// Constructs the fragmenter with a logger.
    pub fn build_with_logger(config: &RandomFragmenterConfig, logger: Logger) -> Self {
        let mut fragmenter = Self::build(config);
        fragmenter.logger = logger;
        fragmenter
    }

    fn check_available_transitions(&self, available: usize) {
        let required = 2 * self.num_pairs * self.fragment_length;
        if available < required {
            self.logger.warn(
                "Fewer transitions available than needed for desired number \
                 of fragment pairs. Some transitions will appear multiple times.",
            );
        } else if self.warning_threshold > 0 && available < self.warning_threshold * required {
            self.logger.warn(format!(
                "Samples will contain {} transitions in total and only {} are available. \
                 Because we sample with replacement, a significant number \
                 of transitions are likely to appear multiple times.",
                required, available
            ));
        }
    }
}

impl<O: Clone, A: Clone> Fragmenter<O, A> for RandomFragmenter {
    fn fragment(&mut self, trajectories: &[Trajectory<O, A>]) -> Result<Vec<FragmentPair<O, A>>> {
        let candidates: Vec<&Trajectory<O, A>> = trajectories
            .iter()
            .filter(|traj| traj.len() >= self.fragment_length)
            .collect();
        if candidates.is_empty() {
            return Err(PrefCompError::NoTrajectoriesLongEnough {
                fragment_length: self.fragment_length,
            }
            .into());
        }

        let num_discarded = trajectories.len() - candidates.len();
        if num_discarded > 0 {
            self.logger.log(format!(
                "Discarded {} out of {} trajectories because they are shorter \
                 than the desired length of {}.",
                num_discarded,
                trajectories.len(),
                self.fragment_length
            ));
        }

        let weights: Vec<usize> = candidates.iter().map(|traj| traj.len()).collect();
        self.check_available_transitions(weights.iter().sum());

        // A fragment_length of 0 gives all-zero weights, so fall back to uniform.
        let dist = WeightedIndex::new(weights.iter().map(|w| (*w).max(1)))?;
        let mut fragments = Vec::with_capacity(2 * self.num_pairs);
        for _ in 0..2 * self.num_pairs {
            let traj = candidates[dist.sample(&mut self.rng)];
            let start = self.rng.gen_range(0..=traj.len() - self.fragment_length);
            fragments.push(traj.slice(start, start + self.fragment_length)?);
        }

        Ok(fragments.into_iter().tuples().collect())
    }

    fn set_logger(&mut self, logger: Logger) {
        self.logger = logger;
    }
}
