//! Sampling of dataset indices with replacement.
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Draws indices of a dataset uniformly at random with replacement.
pub struct RandomSampler {
    num_samples: Option<usize>,
    rng: StdRng,
}

impl RandomSampler {
    /// Creates a sampler.
    ///
    /// If `num_samples` is `None`, as many indices as the length of the
    /// dataset are drawn.
    pub fn new(seed: u64, num_samples: Option<usize>) -> Self {
        Self {
            num_samples,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws indices in `[0, len)`.
    pub fn sample(&mut self, len: usize) -> Vec<usize> {
        if len == 0 {
            return vec![];
        }
        let n = self.num_samples.unwrap_or(len);
        (0..n).map(|_| self.rng.gen_range(0..len)).collect()
    }

    /// Draws indices in `[0, len)` and splits them into mini-batches.
    ///
    /// The last batch is shorter if the number of samples is not a multiple
    /// of `batch_size`.
    pub fn batches(&mut self, len: usize, batch_size: usize) -> Vec<Vec<usize>> {
        self.sample(len)
            .chunks(batch_size.max(1))
            .map(|c| c.to_vec())
            .collect()
    }
}
