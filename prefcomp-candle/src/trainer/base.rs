use super::CrossEntropyRewardTrainerConfig;
use crate::{
    opt::Optimizer,
    util::{discounted_sum, preference_cross_entropy, preference_probability},
    RewardNet, RewardNetBase,
};
use anyhow::Result;
use candle_core::Tensor;
use prefcomp_core::{
    record::Logger, PreferenceDataset, RandomSampler, RewardTrainer, Trajectory,
};

/// Trains a reward net with the cross-entropy loss of the Bradley-Terry
/// preference model.
///
/// The probability that the first fragment of a pair is preferred is
/// `noise_prob / 2 + (1 - noise_prob) / (1 + exp(R2 - R1))`, where `R1` and
/// `R2` are the discounted returns of the fragments under the reward net.
/// Each epoch draws as many pairs as the dataset holds, with replacement,
/// and takes an optimizer step per mini-batch.
pub struct CrossEntropyRewardTrainer<R> {
    reward_net: R,
    noise_prob: f64,
    batch_size: usize,
    epochs: usize,
    discount_factor: f64,
    threshold: f64,
    opt: Optimizer,
    sampler: RandomSampler,
    logger: Logger,
}

impl<R: RewardNetBase> CrossEntropyRewardTrainer<R> {
    /// Constructs the trainer of `reward_net`.
    pub fn build(config: &CrossEntropyRewardTrainerConfig, reward_net: R) -> Result<Self> {
        let opt = config.opt_config.build(reward_net.varmap().all_vars())?;

        Ok(Self {
            reward_net,
            noise_prob: config.noise_prob,
            batch_size: config.batch_size,
            epochs: config.epochs,
            discount_factor: config.discount_factor,
            threshold: config.threshold,
            opt,
            sampler: RandomSampler::new(config.seed, None),
            logger: Logger::default(),
        })
    }

    /// Constructs the trainer of `reward_net` with a logger.
    pub fn build_with_logger(
        config: &CrossEntropyRewardTrainerConfig,
        reward_net: R,
        logger: Logger,
    ) -> Result<Self> {
        let mut trainer = Self::build(config, reward_net)?;
        trainer.logger = logger;
        Ok(trainer)
    }

    /// The reward net being trained.
    pub fn reward_net(&self) -> &R {
        &self.reward_net
    }

    /// Clipped difference of returns, second minus first.
    fn return_diff(&self, rews1: &Tensor, rews2: &Tensor) -> Result<Tensor> {
        let diff = (discounted_sum(rews2, self.discount_factor)?
            - discounted_sum(rews1, self.discount_factor)?)?;
        let th = self.threshold as f32;
        Ok(diff.clamp(-th, th)?)
    }

    /// Probability that the fragment with per-step rewards `rews1` is
    /// preferred over the one with `rews2`.
    pub fn probability(&self, rews1: &Tensor, rews2: &Tensor) -> Result<Tensor> {
        let diff = self.return_diff(rews1, rews2)?;
        preference_probability(&diff, self.noise_prob)
    }

    fn fragment_rewards<O, A>(&self, fragment: &Trajectory<O, A>) -> Result<Tensor>
    where
        O: Clone,
        A: Clone,
        R: RewardNet<O, A>,
    {
        let input = self.reward_net.preprocess(&fragment.flatten())?;
        self.reward_net.forward(&input)
    }

    /// Probability, under the reward net, that `fragment1` is preferred over
    /// `fragment2`.
    pub fn predicted_preference<O, A>(
        &self,
        fragment1: &Trajectory<O, A>,
        fragment2: &Trajectory<O, A>,
    ) -> Result<f32>
    where
        O: Clone,
        A: Clone,
        R: RewardNet<O, A>,
    {
        let rews1 = self.fragment_rewards(fragment1)?;
        let rews2 = self.fragment_rewards(fragment2)?;
        Ok(self.probability(&rews1, &rews2)?.to_scalar::<f32>()?)
    }

    /// Cross-entropy between the predicted and the given preferences.
    pub fn loss<O, A>(
        &self,
        pairs: &[(&Trajectory<O, A>, &Trajectory<O, A>)],
        preferences: &[f32],
    ) -> Result<Tensor>
    where
        O: Clone,
        A: Clone,
        R: RewardNet<O, A>,
    {
        let diffs = pairs
            .iter()
            .map(|&(f1, f2)| {
                let rews1 = self.fragment_rewards(f1)?;
                let rews2 = self.fragment_rewards(f2)?;
                self.return_diff(&rews1, &rews2)
            })
            .collect::<Result<Vec<_>>>()?;
        let diffs = Tensor::stack(&diffs, 0)?;
        let targets = Tensor::from_slice(preferences, (preferences.len(),), diffs.device())?;
        preference_cross_entropy(&diffs, &targets, self.noise_prob)
    }
}

impl<O, A, R> RewardTrainer<O, A> for CrossEntropyRewardTrainer<R>
where
    O: Clone,
    A: Clone,
    R: RewardNet<O, A>,
{
    fn train(&mut self, dataset: &PreferenceDataset<O, A>) -> Result<()> {
        for _ in 0..self.epochs {
            for batch in self.sampler.batches(dataset.len(), self.batch_size) {
                let (pairs, preferences): (Vec<_>, Vec<_>) = batch
                    .iter()
                    .filter_map(|&i| dataset.get(i))
                    .map(|(f1, f2, p)| ((f1, f2), p))
                    .unzip();
                let loss = self.loss(&pairs, &preferences)?;
                self.opt.backward_step(&loss)?;
                self.logger.record_scalar("loss", loss.to_scalar::<f32>()?);
            }
        }
        Ok(())
    }

    fn set_logger(&mut self, logger: Logger) {
        self.logger = logger;
    }
}
