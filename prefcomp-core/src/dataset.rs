//! Dataset of preferences between fragment pairs.
use crate::{error::PrefCompError, FragmentPair, Trajectory};
use anyhow::Result;

/// A growing dataset of fragment pairs with the probabilities that the first
/// fragment of each pair is preferred.
///
/// The dataset is append-only and lives only in memory.
#[derive(Debug, Clone)]
pub struct PreferenceDataset<O, A> {
    fragments1: Vec<Trajectory<O, A>>,
    fragments2: Vec<Trajectory<O, A>>,
    preferences: Vec<f32>,
}

impl<O, A> Default for PreferenceDataset<O, A> {
    fn default() -> Self {
        Self {
            fragments1: vec![],
            fragments2: vec![],
            preferences: vec![],
        }
    }
}

impl<O, A> PreferenceDataset<O, A> {
    /// Creates an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends fragment pairs and their preferences.
    ///
    /// Fails without modifying the dataset if the numbers of pairs and
    /// preferences differ or if a preference is not a probability.
    pub fn push(&mut self, pairs: Vec<FragmentPair<O, A>>, preferences: Vec<f32>) -> Result<()> {
        if pairs.len() != preferences.len() {
            return Err(PrefCompError::PreferenceShape {
                expected: pairs.len(),
                got: preferences.len(),
            }
            .into());
        }
        if let Some((index, value)) = preferences
            .iter()
            .enumerate()
            .find(|(_, p)| !(p.is_finite() && (0.0..=1.0).contains(*p)))
        {
            return Err(PrefCompError::InvalidPreference {
                index,
                value: *value,
            }
            .into());
        }

        for (f1, f2) in pairs {
            self.fragments1.push(f1);
            self.fragments2.push(f2);
        }
        self.preferences.extend(preferences);
        Ok(())
    }

    /// Returns the `i`-th fragment pair and its preference.
    pub fn get(&self, i: usize) -> Option<(&Trajectory<O, A>, &Trajectory<O, A>, f32)> {
        Some((
            self.fragments1.get(i)?,
            self.fragments2.get(i)?,
            *self.preferences.get(i)?,
        ))
    }

    /// Iterates over the samples in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Trajectory<O, A>, &Trajectory<O, A>, f32)> {
        self.fragments1
            .iter()
            .zip(self.fragments2.iter())
            .zip(self.preferences.iter())
            .map(|((f1, f2), p)| (f1, f2, *p))
    }

    /// The number of samples.
    pub fn len(&self) -> usize {
        self.preferences.len()
    }

    /// Returns `true` if the dataset has no samples.
    pub fn is_empty(&self) -> bool {
        self.preferences.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(id: usize) -> FragmentPair<usize, usize> {
        let frag = |o| Trajectory::new(vec![o, o], vec![0], None, vec![0.0], false).unwrap();
        (frag(2 * id), frag(2 * id + 1))
    }

    #[test]
    fn test_push_and_get() -> Result<()> {
        let mut dataset = PreferenceDataset::new();
        assert!(dataset.is_empty());

        dataset.push(vec![pair(0), pair(1)], vec![1.0, 0.0])?;
        dataset.push(vec![pair(2)], vec![0.25])?;
        assert_eq!(dataset.len(), 3);

        let (f1, f2, p) = dataset.get(2).unwrap();
        assert_eq!((f1.obs[0], f2.obs[0], p), (4, 5, 0.25));
        assert!(dataset.get(3).is_none());

        let prefs: Vec<f32> = dataset.iter().map(|(_, _, p)| p).collect();
        assert_eq!(prefs, vec![1.0, 0.0, 0.25]);
        let firsts: Vec<usize> = dataset.iter().map(|(f1, _, _)| f1.obs[0]).collect();
        assert_eq!(firsts, vec![0, 2, 4]);
        Ok(())
    }

    #[test]
    fn test_push_is_atomic() -> Result<()> {
        let mut dataset = PreferenceDataset::new();
        dataset.push(vec![pair(0)], vec![0.5])?;

        let err = dataset.push(vec![pair(1), pair(2)], vec![1.0]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<PrefCompError>(),
            Some(&PrefCompError::PreferenceShape { expected: 2, got: 1 })
        );
        assert_eq!(dataset.len(), 1);

        let err = dataset.push(vec![pair(1), pair(2)], vec![1.0, 1.5]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<PrefCompError>(),
            Some(&PrefCompError::InvalidPreference { index: 1, value: 1.5 })
        );
        assert!(dataset.push(vec![pair(1)], vec![f32::NAN]).is_err());
        assert_eq!(dataset.len(), 1);
        Ok(())
    }
}
