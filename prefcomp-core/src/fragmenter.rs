//! Creation of pairs of trajectory fragments.
mod config;
mod random;
use crate::{record::Logger, FragmentPair, Trajectory};
use anyhow::Result;
pub use config::RandomFragmenterConfig;
pub use random::RandomFragmenter;

/// Creates pairs of trajectory fragments from a set of trajectories.
pub trait Fragmenter<O, A> {
    /// Creates fragment pairs out of `trajectories`.
    fn fragment(&mut self, trajectories: &[Trajectory<O, A>]) -> Result<Vec<FragmentPair<O, A>>>;

    /// Replaces the logger.
    fn set_logger(&mut self, logger: Logger);
}
