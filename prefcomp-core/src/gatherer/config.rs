//! Configuration of [`SyntheticGatherer`](super::SyntheticGatherer).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`SyntheticGatherer`](super::SyntheticGatherer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct SyntheticGathererConfig {
    /// Temperature of the Boltzmann-rational preference model.
    ///
    /// `0` gives deterministic preferences from the sign of the difference
    /// of returns.
    pub temperature: f32,

    /// Discount factor used to compute the returns of fragments.
    pub discount_factor: f32,

    /// If `true`, preferences are sampled from the model, giving 0 or 1.
    /// Otherwise the probabilities are returned.
    pub sample: bool,

    /// Seed of the random number generator used for sampling.
    pub seed: u64,

    /// Absolute bound of the scaled difference of returns before
    /// exponentiation.
    pub threshold: f32,
}

impl Default for SyntheticGathererConfig {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            discount_factor: 1.0,
            sample: true,
            seed: 0,
            threshold: 50.0,
        }
    }
}

impl SyntheticGathererConfig {
    /// Sets the temperature.
    pub fn temperature(mut self, v: f32) -> Self {
        self.temperature = v;
        self
    }

    /// Sets the discount factor.
    pub fn discount_factor(mut self, v: f32) -> Self {
        self.discount_factor = v;
        self
    }

    /// Sets whether preferences are sampled.
    pub fn sample(mut self, v: bool) -> Self {
        self.sample = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Sets the clipping threshold.
    pub fn threshold(mut self, v: f32) -> Self {
        self.threshold = v;
        self
    }

    /// Constructs [`SyntheticGathererConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`SyntheticGathererConfig`] as a YAML file.
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
    fn test_serde_synthetic_gatherer_config() -> Result<()> {
        let config = SyntheticGathererConfig::default()
            .temperature(0.5)
            .sample(false)
            .seed(7);

        let dir = TempDir::new("synthetic_gatherer_config")?;
        let path = dir.path().join("synthetic_gatherer_config.yaml");
        config.save(&path)?;
        let config_ = SyntheticGathererConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
