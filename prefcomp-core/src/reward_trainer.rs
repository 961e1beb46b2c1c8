//! Training of reward models.
use crate::{record::Logger, PreferenceDataset};
use anyhow::Result;

/// Trains a reward model on a dataset of preferences.
///
/// The backend of the reward model is left to implementors; see
/// `prefcomp-candle` for one built on candle.
pub trait RewardTrainer<O, A> {
    /// Trains the reward model on the whole dataset.
    fn train(&mut self, dataset: &PreferenceDataset<O, A>) -> Result<()>;

    /// Replaces the logger.
    fn set_logger(&mut self, logger: Logger);
}
