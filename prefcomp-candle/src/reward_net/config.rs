//! Configuration of [`BasicRewardNet`](super::BasicRewardNet).
use crate::mlp::MlpConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`BasicRewardNet`](super::BasicRewardNet).
///
/// The input of the MLP is the concatenation of the enabled parts of a
/// transition in the order state, action, next state, done.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct BasicRewardNetConfig {
    /// Dimension of observations.
    pub obs_dim: usize,

    /// Dimension of actions.
    pub act_dim: usize,

    /// Sizes of hidden layers.
    pub hidden_units: Vec<usize>,

    /// Whether the current observation is an input.
    pub use_state: bool,

    /// Whether the action is an input.
    pub use_action: bool,

    /// Whether the next observation is an input.
    pub use_next_state: bool,

    /// Whether the done flag is an input.
    pub use_done: bool,
}

impl Default for BasicRewardNetConfig {
    fn default() -> Self {
        Self {
            obs_dim: 0,
            act_dim: 0,
            hidden_units: vec![32, 32],
            use_state: true,
            use_action: true,
            use_next_state: false,
            use_done: false,
        }
    }
}

impl BasicRewardNetConfig {
    /// Sets the dimension of observations.
    pub fn obs_dim(mut self, v: usize) -> Self {
        self.obs_dim = v;
        self
    }

    /// Sets the dimension of actions.
    pub fn act_dim(mut self, v: usize) -> Self {
        self.act_dim = v;
        self
    }

    /// Sets the sizes of hidden layers.
    pub fn hidden_units(mut self, v: Vec<usize>) -> Self {
        self.hidden_units = v;
        self
    }

    /// Sets whether the current observation is an input.
    pub fn use_state(mut self, v: bool) -> Self {
        self.use_state = v;
        self
    }

    /// Sets whether the action is an input.
    pub fn use_action(mut self, v: bool) -> Self {
        self.use_action = v;
        self
    }

    /// Sets whether the next observation is an input.
    pub fn use_next_state(mut self, v: bool) -> Self {
        self.use_next_state = v;
        self
    }

    /// Sets whether the done flag is an input.
    pub fn use_done(mut self, v: bool) -> Self {
        self.use_done = v;
        self
    }

    /// Dimension of the input of the MLP.
    pub fn in_dim(&self) -> usize {
        self.use_state as usize * self.obs_dim
            + self.use_action as usize * self.act_dim
            + self.use_next_state as usize * self.obs_dim
            + self.use_done as usize
    }

    pub(super) fn mlp_config(&self) -> MlpConfig {
        MlpConfig::new(self.in_dim(), self.hidden_units.clone(), 1, false)
    }

    /// Constructs [`BasicRewardNetConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`BasicRewardNetConfig`] as a YAML file.
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
    fn test_in_dim() {
        let config = BasicRewardNetConfig::default().obs_dim(4).act_dim(2);
        assert_eq!(config.in_dim(), 6);
        assert_eq!(config.clone().use_action(false).in_dim(), 4);
        assert_eq!(config.use_next_state(true).use_done(true).in_dim(), 11);
    }

    #[test]
    fn test_serde_basic_reward_net_config() -> Result<()> {
        let config = BasicRewardNetConfig::default()
            .obs_dim(3)
            .act_dim(1)
            .hidden_units(vec![16]);

        let dir = TempDir::new("basic_reward_net_config")?;
        let path = dir.path().join("basic_reward_net_config.yaml");
        config.save(&path)?;
        let config_ = BasicRewardNetConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
