//! Configuration of [`CrossEntropyRewardTrainer`](super::CrossEntropyRewardTrainer).
use crate::opt::OptimizerConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`CrossEntropyRewardTrainer`](super::CrossEntropyRewardTrainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct CrossEntropyRewardTrainerConfig {
    /// Assumed probability with which a preference is uniformly random.
    pub noise_prob: f64,

    /// The number of fragment pairs in a mini-batch.
    pub batch_size: usize,

    /// The number of epochs in each call to `train`.
    pub epochs: usize,

    /// Configuration of the optimizer.
    #[serde(default)]
    pub opt_config: OptimizerConfig,

    /// Discount factor used to compute the returns of fragments.
    pub discount_factor: f64,

    /// Absolute bound of the difference of returns before exponentiation.
    ///
    /// The default of 50 rounds probabilities below 2e-22 up to 2e-22.
    pub threshold: f64,

    /// Seed of the mini-batch sampler.
    pub seed: u64,
}

impl Default for CrossEntropyRewardTrainerConfig {
    fn default() -> Self {
        Self {
            noise_prob: 0.0,
            batch_size: 32,
            epochs: 1,
            opt_config: OptimizerConfig::default(),
            discount_factor: 1.0,
            threshold: 50.0,
            seed: 0,
        }
    }
}

impl CrossEntropyRewardTrainerConfig {
    /// Sets the label noise probability.
    pub fn noise_prob(mut self, v: f64) -> Self {
        self.noise_prob = v;
        self
    }

    /// Sets the batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the number of epochs.
    pub fn epochs(mut self, v: usize) -> Self {
        self.epochs = v;
        self
    }

    /// Sets the optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Sets the learning rate of the optimizer.
    pub fn lr(mut self, v: f64) -> Self {
        self.opt_config = self.opt_config.learning_rate(v);
        self
    }

    /// Sets the discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.discount_factor = v;
        self
    }

    /// Sets the clipping threshold.
    pub fn threshold(mut self, v: f64) -> Self {
        self.threshold = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Constructs [`CrossEntropyRewardTrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`CrossEntropyRewardTrainerConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_cross_entropy_reward_trainer_config() -> Result<()> {
        let config = CrossEntropyRewardTrainerConfig::default()
            .noise_prob(0.1)
            .batch_size(8)
            .lr(3e-4)
            .discount_factor(0.99);
        assert_eq!(config.opt_config, OptimizerConfig::Adam { lr: 3e-4 });

        let dir = TempDir::new("cross_entropy_reward_trainer_config")?;
        let path = dir.path().join("cross_entropy_reward_trainer_config.yaml");
        config.save(&path)?;
        let config_ = CrossEntropyRewardTrainerConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
