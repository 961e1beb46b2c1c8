use super::{BasicRewardNetConfig, RewardNet, RewardNetBase, RewardNetInput};
use crate::{mlp::Mlp, model::SubModel1};
use anyhow::{bail, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use log::info;
use prefcomp_core::Transitions;
use std::path::Path;

/// Stacks vectors of length `dim` into a `(n, dim)` tensor.
fn stack<T: AsRef<[f32]>>(xs: &[T], dim: usize, device: &Device) -> Result<Tensor> {
    let data: Vec<f32> = xs.iter().flat_map(|x| x.as_ref().iter().copied()).collect();
    Ok(Tensor::from_vec(data, (xs.len(), dim), device)?)
}

/// A reward net given by an MLP over parts of a transition.
///
/// Which parts of a transition are fed to the MLP is set with
/// [`BasicRewardNetConfig`]. Observations and actions are anything that can
/// be viewed as a slice of `f32`.
#[derive(Clone)]
pub struct BasicRewardNet {
    config: BasicRewardNetConfig,
    device: Device,
    varmap: VarMap,
    mlp: Mlp,
}

impl BasicRewardNet {
    /// Constructs [`BasicRewardNet`] with randomly initialized parameters.
    pub fn build(config: BasicRewardNetConfig, device: Device) -> Result<Self> {
        if config.in_dim() == 0 {
            bail!("BasicRewardNet needs at least one non-empty input");
        }
        let varmap = VarMap::new();
        let mlp = {
            let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
            Mlp::build(vb, config.mlp_config())?
        };

        Ok(Self {
            config,
            device,
            varmap,
            mlp,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BasicRewardNetConfig {
        &self.config
    }

    /// Saves the parameters in safetensors format.
    pub fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.varmap.save(&path)?;
        info!("Save reward net to {:?}", path.as_ref());
        Ok(())
    }

    /// Loads the parameters in place.
    ///
    /// Clones of this reward net see the loaded parameters.
    pub fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.varmap.load(&path)?;
        info!("Load reward net from {:?}", path.as_ref());
        Ok(())
    }
}

impl RewardNetBase for BasicRewardNet {
    fn varmap(&self) -> &VarMap {
        &self.varmap
    }

    fn device(&self) -> &Device {
        &self.device
    }
}

impl<O, A> RewardNet<O, A> for BasicRewardNet
where
    O: AsRef<[f32]>,
    A: AsRef<[f32]>,
{
    fn preprocess(&self, transitions: &Transitions<O, A>) -> Result<RewardNetInput> {
        let n = transitions.len();
        let dones: Vec<f32> = transitions
            .dones
            .iter()
            .map(|d| if *d { 1.0 } else { 0.0 })
            .collect();

        Ok(RewardNetInput {
            obs: stack(&transitions.obs, self.config.obs_dim, &self.device)?,
            act: stack(&transitions.acts, self.config.act_dim, &self.device)?,
            next_obs: stack(&transitions.next_obs, self.config.obs_dim, &self.device)?,
            done: Tensor::from_vec(dones, (n, 1), &self.device)?,
        })
    }

    fn forward(&self, input: &RewardNetInput) -> Result<Tensor> {
        let mut xs = vec![];
        if self.config.use_state {
            xs.push(&input.obs);
        }
        if self.config.use_action {
            xs.push(&input.act);
        }
        if self.config.use_next_state {
            xs.push(&input.next_obs);
        }
        if self.config.use_done {
            xs.push(&input.done);
        }
        let xs = Tensor::cat(&xs, 1)?;
        Ok(self.mlp.forward(&xs)?.squeeze(1)?)
    }
}
