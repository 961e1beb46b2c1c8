#![warn(missing_docs)]
//! Reward learning from preference comparisons.
//!
//! Pairs of trajectory fragments are compared, either synthetically from the
//! ground-truth reward or by some other oracle, and a reward model is fit so
//! that the preference probabilities it induces match the gathered ones.
//! [`PreferenceComparisons`] runs the outer loop, alternating reward-model
//! training with agent training against the learned reward.
//!
//! This crate is independent of any tensor backend. The reward trainer is
//! a trait, [`RewardTrainer`], implemented for candle in `prefcomp-candle`.
pub mod dummy;
pub mod error;
pub mod record;

mod comparisons;
mod dataset;
mod fragmenter;
mod gatherer;
mod generator;
mod reward_trainer;
mod sampler;
mod trajectory;

pub use comparisons::{PreferenceComparisons, PreferenceComparisonsConfig};
pub use dataset::PreferenceDataset;
pub use fragmenter::{Fragmenter, RandomFragmenter, RandomFragmenterConfig};
pub use gatherer::{PreferenceGatherer, SyntheticGatherer, SyntheticGathererConfig};
pub use generator::{TrajectoryDataset, TrajectoryGenerator};
pub use reward_trainer::RewardTrainer;
pub use sampler::RandomSampler;
pub use trajectory::{
    discounted_return, flatten_trajectories, FragmentPair, Trajectory, Transitions,
};
