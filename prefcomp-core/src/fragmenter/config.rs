//! Configuration of [`RandomFragmenter`](super::RandomFragmenter).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`RandomFragmenter`](super::RandomFragmenter).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct RandomFragmenterConfig {
    /// The number of transitions in each fragment.
    pub fragment_length: usize,

    /// The number of fragment pairs sampled per call.
    pub num_pairs: usize,

    /// Seed of the random number generator. If `None`, it is seeded from
    /// the operating system.
    pub seed: Option<u64>,

    /// A warning is emitted if fewer than `warning_threshold` times the
    /// required transitions are available. `0` disables the warning.
    pub warning_threshold: usize,
}

impl Default for RandomFragmenterConfig {
    fn default() -> Self {
        Self {
            fragment_length: 50,
            num_pairs: 50,
            seed: None,
            warning_threshold: 10,
        }
    }
}

impl RandomFragmenterConfig {
    /// Sets the length of fragments.
    pub fn fragment_length(mut self, v: usize) -> Self {
        self.fragment_length = v;
        self
    }

    /// Sets the number of fragment pairs.
    pub fn num_pairs(mut self, v: usize) -> Self {
        self.num_pairs = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = Some(v);
        self
    }

    /// Sets the warning threshold.
    pub fn warning_threshold(mut self, v: usize) -> Self {
        self.warning_threshold = v;
        self
    }

    /// Constructs [`RandomFragmenterConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`RandomFragmenterConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
