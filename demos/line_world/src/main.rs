mod line_world;
use anyhow::Result;
use clap::Parser;
use line_world::{Act, LineWorldGenerator, Obs, ACT_DIM, OBS_DIM};
use log::info;
use prefcomp_candle::{
    opt::OptimizerConfig, BasicRewardNet, BasicRewardNetConfig, CrossEntropyRewardTrainer,
    CrossEntropyRewardTrainerConfig, Device,
};
use prefcomp_core::{
    record::{Logger, NullRecorder, Recorder},
    PreferenceComparisons, PreferenceComparisonsConfig, RandomFragmenter, RandomFragmenterConfig,
    SyntheticGatherer, SyntheticGathererConfig,
};
use prefcomp_tensorboard::TensorboardRecorder;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

type Trainer = CrossEntropyRewardTrainer<BasicRewardNet>;
type Comparisons = PreferenceComparisons<Obs, Act, LineWorldGenerator, Trainer>;

const LR: f64 = 1e-2;
const BATCH_SIZE: usize = 16;
const EPOCHS: usize = 3;
const HIDDEN_UNITS: &[usize] = &[16];
const N_EPISODES_PER_EVAL: usize = 10;

/// Learn the reward of a walker on a line from synthetic preferences
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of iterations of the training loop
    #[arg(long, default_value_t = 20)]
    iterations: usize,

    /// Environment steps sampled in each iteration
    #[arg(long, default_value_t = 200)]
    sample_steps: usize,

    /// Number of transitions in a fragment
    #[arg(long, default_value_t = 10)]
    fragment_length: usize,

    /// Fragment pairs compared in each iteration
    #[arg(long, default_value_t = 20)]
    num_pairs: usize,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Directory for TFRecord, configuration and reward net parameters
    #[arg(long)]
    logdir: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct LineWorldConfig {
    pub comparisons_config: PreferenceComparisonsConfig,
    pub fragmenter_config: RandomFragmenterConfig,
    pub gatherer_config: SyntheticGathererConfig,
    pub trainer_config: CrossEntropyRewardTrainerConfig,
    pub reward_net_config: BasicRewardNetConfig,
    pub device: Device,
}

impl LineWorldConfig {
    fn new(args: &Args) -> Self {
        let comparisons_config =
            PreferenceComparisonsConfig::default().sample_steps(args.sample_steps);
        let fragmenter_config = RandomFragmenterConfig::default()
            .fragment_length(args.fragment_length)
            .num_pairs(args.num_pairs)
            .seed(args.seed);
        let gatherer_config = SyntheticGathererConfig::default().seed(args.seed);
        let trainer_config = CrossEntropyRewardTrainerConfig::default()
            .batch_size(BATCH_SIZE)
            .epochs(EPOCHS)
            .opt_config(OptimizerConfig::default().learning_rate(LR))
            .seed(args.seed);
        let reward_net_config = BasicRewardNetConfig::default()
            .obs_dim(OBS_DIM)
            .act_dim(ACT_DIM)
            .hidden_units(HIDDEN_UNITS.to_vec())
            .use_state(false)
            .use_action(false)
            .use_next_state(true);

        Self {
            comparisons_config,
            fragmenter_config,
            gatherer_config,
            trainer_config,
            reward_net_config,
            device: Device::Cpu,
        }
    }

    fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

fn create_recorder(logdir: Option<&str>) -> Box<dyn Recorder> {
    match logdir {
        Some(logdir) => Box::new(TensorboardRecorder::new(logdir)),
        None => Box::new(NullRecorder {}),
    }
}

/// Returns the number of preferences gathered.
fn train(args: &Args) -> Result<usize> {
    let config = LineWorldConfig::new(args);
    if let Some(logdir) = &args.logdir {
        std::fs::create_dir_all(logdir)?;
        config.save(Path::new(logdir).join("config.yaml"))?;
    }

    let device = candle_core::Device::try_from(config.device)?;
    let reward_net = BasicRewardNet::build(config.reward_net_config.clone(), device)?;
    let generator = LineWorldGenerator::new(reward_net.clone(), args.seed);
    let trainer = Trainer::build(&config.trainer_config, reward_net.clone())?;
    let logger = Logger::new(create_recorder(args.logdir.as_deref()));

    let mut comparisons = Comparisons::build(&config.comparisons_config, generator, trainer)
        .fragmenter(Box::new(RandomFragmenter::build(&config.fragmenter_config)))
        .preference_gatherer(Box::new(SyntheticGatherer::build(&config.gatherer_config)))
        .logger(logger);
    comparisons.train(args.iterations)?;

    let mut evaluator = LineWorldGenerator::new(reward_net.clone(), args.seed + 1).greedy();
    info!(
        "Mean return of the greedy policy on the learned reward: {}",
        evaluator.evaluate(N_EPISODES_PER_EVAL)?
    );

    if let Some(logdir) = &args.logdir {
        reward_net.save(Path::new(logdir).join("reward_net.safetensors"))?;
    }

    Ok(comparisons.dataset().len())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    train(&args)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_line_world() -> Result<()> {
        let tmp_dir = TempDir::new("line_world")?;
        let logdir = match tmp_dir.as_ref().to_str() {
            Some(s) => s.to_string(),
            None => panic!("Failed to get string of temporary directory"),
        };
        let args = Args {
            iterations: 2,
            sample_steps: 40,
            fragment_length: 5,
            num_pairs: 5,
            seed: 0,
            logdir: Some(logdir.clone()),
        };

        assert_eq!(train(&args)?, 10);

        let config = LineWorldConfig::load(Path::new(&logdir).join("config.yaml"))?;
        assert_eq!(config, LineWorldConfig::new(&args));
        assert!(Path::new(&logdir).join("reward_net.safetensors").exists());
        Ok(())
    }
}
