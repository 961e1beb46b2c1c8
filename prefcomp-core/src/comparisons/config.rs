//! Configuration of [`PreferenceComparisons`](super::PreferenceComparisons).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`PreferenceComparisons`](super::PreferenceComparisons).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct PreferenceComparisonsConfig {
    /// The number of environment steps sampled in each iteration for
    /// creating fragments.
    pub sample_steps: usize,

    /// The number of environment steps the agent is trained for in each
    /// iteration. If `None`, `sample_steps` is used.
    pub agent_steps: Option<usize>,

    /// If `false`, training fails when terminal trajectories of different
    /// lengths are sampled.
    pub allow_variable_horizon: bool,
}

impl Default for PreferenceComparisonsConfig {
    fn default() -> Self {
        Self {
            sample_steps: 1000,
            agent_steps: None,
            allow_variable_horizon: false,
        }
    }
}

impl PreferenceComparisonsConfig {
    /// Sets the number of sampled steps per iteration.
    pub fn sample_steps(mut self, v: usize) -> Self {
        self.sample_steps = v;
        self
    }

    /// Sets the number of agent training steps per iteration.
    pub fn agent_steps(mut self, v: usize) -> Self {
        self.agent_steps = Some(v);
        self
    }

    /// Allows or disallows variable horizon episodes.
    pub fn allow_variable_horizon(mut self, v: bool) -> Self {
        self.allow_variable_horizon = v;
        self
    }

    /// Constructs [`PreferenceComparisonsConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`PreferenceComparisonsConfig`] as a YAML file.
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
    fn test_serde_preference_comparisons_config() -> Result<()> {
        let config = PreferenceComparisonsConfig::default()
            .sample_steps(200)
            .agent_steps(0)
            .allow_variable_horizon(true);

        let dir = TempDir::new("preference_comparisons_config")?;
        let path = dir.path().join("preference_comparisons_config.yaml");
        config.save(&path)?;
        let config_ = PreferenceComparisonsConfig::load(&path)?;
        assert_eq!(config, config_);
        assert_eq!(config_.agent_steps, Some(0));
        Ok(())
    }
}
