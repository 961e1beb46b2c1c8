//! Reward models.
mod base;
mod config;
use anyhow::Result;
pub use base::BasicRewardNet;
use candle_core::{Device, Tensor};
use candle_nn::VarMap;
pub use config::BasicRewardNetConfig;
use prefcomp_core::Transitions;

/// Batch of transitions converted to tensors.
#[derive(Debug, Clone)]
pub struct RewardNetInput {
    /// Observations, `(n, obs_dim)`.
    pub obs: Tensor,

    /// Actions, `(n, act_dim)`.
    pub act: Tensor,

    /// Next observations, `(n, obs_dim)`.
    pub next_obs: Tensor,

    /// `1` at the end of terminal trajectories and `0` otherwise, `(n, 1)`.
    pub done: Tensor,
}

/// Parameters of a reward model.
///
/// Clones of a reward net share their parameters, so an agent holding a
/// clone sees the updates applied by a reward trainer.
pub trait RewardNetBase {
    /// Parameters of the model.
    fn varmap(&self) -> &VarMap;

    /// Device on which the model is.
    fn device(&self) -> &Device;
}

/// A reward model mapping transitions with observations `O` and actions `A`
/// to rewards.
pub trait RewardNet<O, A>: RewardNetBase {
    /// Converts transitions to the input of [`RewardNet::forward`].
    fn preprocess(&self, transitions: &Transitions<O, A>) -> Result<RewardNetInput>;

    /// Computes rewards of the transitions, with shape `(n,)`.
    fn forward(&self, input: &RewardNetInput) -> Result<Tensor>;

    /// Computes rewards of the transitions as a vector.
    fn rewards(&self, transitions: &Transitions<O, A>) -> Result<Vec<f32>> {
        let input = self.preprocess(transitions)?;
        Ok(self.forward(&input)?.to_vec1::<f32>()?)
    }
}
