//! Reward models and reward training implemented with
//! [candle](https://crates.io/crates/candle-core).
//!
//! * [`RewardNet`] is the interface of reward models, with
//!   [`BasicRewardNet`] as an MLP implementation.
//! * [`CrossEntropyRewardTrainer`] fits a [`RewardNet`] to a
//!   [`PreferenceDataset`](prefcomp_core::PreferenceDataset) and implements
//!   [`RewardTrainer`](prefcomp_core::RewardTrainer).
pub mod mlp;
pub mod model;
pub mod opt;
mod reward_net;
mod trainer;
pub mod util;
pub use reward_net::{
    BasicRewardNet, BasicRewardNetConfig, RewardNet, RewardNetBase, RewardNetInput,
};
use serde::{Deserialize, Serialize};
pub use trainer::{CrossEntropyRewardTrainer, CrossEntropyRewardTrainerConfig};

#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq)]
/// Device for using candle.
///
/// This enum is added because [`candle_core::Device`] does not support serialization.
pub enum Device {
    /// The main CPU device.
    Cpu,

    /// The main GPU device.
    Cuda(usize),
}

impl TryFrom<Device> for candle_core::Device {
    type Error = candle_core::Error;

    fn try_from(device: Device) -> Result<Self, Self::Error> {
        match device {
            Device::Cpu => Ok(candle_core::Device::Cpu),
            Device::Cuda(n) => candle_core::Device::new_cuda(n),
        }
    }
}
