//! Preference gathering for pairs of fragments.
mod config;
mod synthetic;
use crate::{record::Logger, FragmentPair};
use anyhow::Result;
pub use config::SyntheticGathererConfig;
pub use synthetic::SyntheticGatherer;

/// Gathers the preferences between pairs of trajectory fragments.
pub trait PreferenceGatherer<O, A> {
    /// Returns, for each pair, the probability that the first fragment is
    /// preferred over the second.
    ///
    /// The values may be hard labels (0 or 1) or soft labels in between.
    fn gather(&mut self, pairs: &[FragmentPair<O, A>]) -> Result<Vec<f32>>;

    /// Replaces the logger.
    fn set_logger(&mut self, logger: Logger);
}
