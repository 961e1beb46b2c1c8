//! Preferences computed from the ground-truth reward.
use super::{PreferenceGatherer, SyntheticGathererConfig};
use crate::{discounted_return, record::Logger, FragmentPair};
use anyhow::Result;
use rand::{distributions::Bernoulli, prelude::Distribution, rngs::StdRng, SeedableRng};

/// Computes synthetic preferences using the ground-truth environment reward.
///
/// The probability that the first fragment is preferred follows the
/// Boltzmann-rational model, `1 / (1 + exp((r2 - r1) / temperature))`,
/// where `r1` and `r2` are the discounted returns of the fragments.
pub struct SyntheticGatherer {
    temperature: f32,
    discount_factor: f32,
    sample: bool,
    threshold: f32,
    rng: StdRng,
    logger: Logger,
}

/// Binary entropy in nats, with `0 ln 0 = 0`.
fn entropy(p: f32) -> f32 {
    let h = |x: f32| if x > 0.0 { -x * x.ln() } else { 0.0 };
    h(p) + h(1.0 - p)
}

impl SyntheticGatherer {
    /// Constructs the gatherer.
    pub fn build(config: &SyntheticGathererConfig) -> Self {
        Self {
            temperature: config.temperature,
            discount_factor: config.discount_factor,
            sample: config.sample,
            threshold: config.threshold,
            rng: StdRng::seed_from_u64(config.seed),
            logger: Logger::default(),
        }
    }

    /// Constructs the gatherer with a logger.
    pub fn build_with_logger(config: &SyntheticGathererConfig, logger: Logger) -> Self {
        let mut gatherer = Self::build(config);
        gatherer.logger = logger;
        gatherer
    }

    fn returns<O, A>(&self, pairs: &[FragmentPair<O, A>]) -> (Vec<f32>, Vec<f32>) {
        pairs
            .iter()
            .map(|(f1, f2)| {
                (
                    discounted_return(&f1.rews, self.discount_factor),
                    discounted_return(&f2.rews, self.discount_factor),
                )
            })
            .unzip()
    }

    /// Probabilities that the first fragment of each pair is preferred.
    fn probabilities(&self, rews1: &[f32], rews2: &[f32]) -> Vec<f32> {
        rews1
            .iter()
            .zip(rews2.iter())
            .map(|(r1, r2)| {
                let diff = ((r2 - r1) / self.temperature).clamp(-self.threshold, self.threshold);
                1.0 / (1.0 + diff.exp())
            })
            .collect()
    }
}

impl<O, A> PreferenceGatherer<O, A> for SyntheticGatherer {
    fn gather(&mut self, pairs: &[FragmentPair<O, A>]) -> Result<Vec<f32>> {
        let (rews1, rews2) = self.returns(pairs);

        if self.temperature == 0.0 {
            let prefs = rews1
                .iter()
                .zip(rews2.iter())
                .map(|(r1, r2)| {
                    if r1 > r2 {
                        1.0
                    } else if r1 < r2 {
                        0.0
                    } else {
                        0.5
                    }
                })
                .collect();
            return Ok(prefs);
        }

        let probs = self.probabilities(&rews1, &rews2);
        if !probs.is_empty() {
            let mean_entropy = probs.iter().map(|p| entropy(*p)).sum::<f32>() / probs.len() as f32;
            self.logger.record_scalar("entropy", mean_entropy);
        }

        if self.sample {
            probs
                .iter()
                .map(|p| -> Result<f32> {
                    let dist = Bernoulli::new(*p as f64)?;
                    Ok(if dist.sample(&mut self.rng) { 1.0 } else { 0.0 })
                })
                .collect()
        } else {
            Ok(probs)
        }
    }

    fn set_logger(&mut self, logger: Logger) {
        self.logger = logger;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Trajectory;

    fn fragment(rews: &[f32]) -> Trajectory<f32, i64> {
        Trajectory::new(
            vec![0.0; rews.len() + 1],
            vec![0; rews.len()],
            None,
            rews.to_vec(),
            false,
        )
        .unwrap()
    }

    fn pair(rews1: &[f32], rews2: &[f32]) -> FragmentPair<f32, i64> {
        (fragment(rews1), fragment(rews2))
    }

    #[test]
    fn test_zero_temperature_gives_exact_labels() -> Result<()> {
        let config = SyntheticGathererConfig::default().temperature(0.0);
        let mut gatherer = SyntheticGatherer::build(&config);
        let pairs = vec![
            pair(&[1.0, 2.0], &[0.0, 1.0]),
            pair(&[0.0, 1.0], &[1.0, 2.0]),
            pair(&[1.5, 1.5], &[3.0, 0.0]),
        ];
        assert_eq!(gatherer.gather(&pairs)?, vec![1.0, 0.0, 0.5]);
        Ok(())
    }

    #[test]
    fn test_zero_temperature_leaves_rng_untouched() -> Result<()> {
        let pairs: Vec<_> = (0..20)
            .map(|i| pair(&[(i % 5) as f32 * 0.5], &[1.0]))
            .collect();
        let config = SyntheticGathererConfig::default().seed(7);

        let mut gatherer = SyntheticGatherer::build(&config.clone().temperature(0.0));
        gatherer.gather(&pairs)?;
        gatherer.gather(&pairs)?;
        gatherer.temperature = 1.0;

        let prefs = gatherer.gather(&pairs)?;
        assert_eq!(prefs, SyntheticGatherer::build(&config).gather(&pairs)?);
        Ok(())
    }

    #[test]
    fn test_probabilities_are_monotonic() -> Result<()> {
        let config = SyntheticGathererConfig::default().sample(false);
        let mut gatherer = SyntheticGatherer::build(&config);
        let pairs: Vec<_> = (-10..=10)
            .map(|d| pair(&[d as f32, 0.0], &[0.0, 0.0]))
            .collect();
        let probs = gatherer.gather(&pairs)?;

        assert!(probs.iter().all(|p| *p > 0.0 && *p < 1.0));
        assert!(probs.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(probs[10], 0.5);
        Ok(())
    }

    #[test]
    fn test_scaling_rewards_inside_and_outside_the_clip() -> Result<()> {
        let config = SyntheticGathererConfig::default().sample(false);
        let mut gatherer = SyntheticGatherer::build(&config);

        // Inside the clip: the preferred fragment stays preferred
        let probs = gatherer.gather(&[
            pair(&[1.0, 1.0], &[0.5, 0.5]),
            pair(&[2.0, 2.0], &[1.0, 1.0]),
        ])?;
        assert!(probs[0] > 0.5);
        assert!(probs[1] > probs[0]);

        // Beyond the clip the difference of returns is saturated
        let probs = gatherer.gather(&[pair(&[0.0], &[60.0]), pair(&[0.0], &[120.0])])?;
        assert_eq!(probs[0], probs[1]);
        assert!(probs[0] < 0.5);
        Ok(())
    }

    #[test]
    fn test_sampled_preferences() -> Result<()> {
        let pairs: Vec<_> = (0..20)
            .map(|i| pair(&[(i % 5) as f32 * 0.5], &[1.0]))
            .collect();

        let config = SyntheticGathererConfig::default().seed(42);
        let prefs1 = SyntheticGatherer::build(&config).gather(&pairs)?;
        let prefs2 = SyntheticGatherer::build(&config).gather(&pairs)?;
        assert_eq!(prefs1, prefs2);
        assert!(prefs1.iter().all(|p| *p == 0.0 || *p == 1.0));

        // Saturated probabilities are sampled deterministically
        let mut gatherer = SyntheticGatherer::build(&config);
        let prefs = gatherer.gather(&[pair(&[100.0], &[0.0]), pair(&[0.0], &[100.0])])?;
        assert_eq!(prefs, vec![1.0, 0.0]);
        Ok(())
    }

    #[test]
    fn test_discount_factor() -> Result<()> {
        let pairs = vec![pair(&[0.0, 0.0, 10.0], &[1.0, 0.0, 0.0])];

        let config = SyntheticGathererConfig::default()
            .temperature(0.0)
            .discount_factor(0.5);
        assert_eq!(SyntheticGatherer::build(&config).gather(&pairs)?, vec![1.0]);

        let config = config.discount_factor(0.1);
        assert_eq!(SyntheticGatherer::build(&config).gather(&pairs)?, vec![0.0]);
        Ok(())
    }

    #[test]
    fn test_entropy_is_recorded() -> Result<()> {
        let logger = Logger::default();
        let config = SyntheticGathererConfig::default().sample(false);
        let mut gatherer = SyntheticGatherer::build_with_logger(&config, logger.clone());
        gatherer.gather(&[pair(&[1.0], &[1.0]), pair(&[2.0], &[2.0])])?;

        let record = logger.dump(0);
        let h = record.get_scalar("entropy")?;
        assert!((h - std::f32::consts::LN_2).abs() < 1e-6);
        Ok(())
    }
}
