//! Cross-entropy reward trainer.
mod base;
mod config;
pub use base::CrossEntropyRewardTrainer;
pub use config::CrossEntropyRewardTrainerConfig;
