//! Record storage and aggregation.
use super::{Record, RecordValue};
use std::collections::HashSet;
use xxhash_rust::xxh3::Xxh3Builder;

/// Accumulates records and aggregates them on demand.
///
/// Scalars recorded more than once are summarized as `{key}_min`,
/// `{key}_max`, `{key}_mean` and `{key}_median`. Scalars recorded once are
/// passed through as they are, unless the storage was created with
/// [`RecordStorage::summarizing`]. For datetimes the most recent value is
/// kept.
#[derive(Default)]
pub struct RecordStorage {
    data: Vec<Record>,

    /// Summarize scalars even when a single value was stored.
    summarize_single: bool,
}

fn min(vs: &[f32]) -> RecordValue {
    RecordValue::Scalar(vs.iter().copied().fold(f32::INFINITY, f32::min))
}

fn max(vs: &[f32]) -> RecordValue {
    RecordValue::Scalar(vs.iter().copied().fold(f32::NEG_INFINITY, f32::max))
}

fn mean(vs: &[f32]) -> RecordValue {
    RecordValue::Scalar(vs.iter().sum::<f32>() / vs.len() as f32)
}

fn median(mut vs: Vec<f32>) -> RecordValue {
    vs.sort_by(|x, y| x.total_cmp(y));
    RecordValue::Scalar(vs[vs.len() / 2])
}

impl RecordStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self {
            data: vec![],
            summarize_single: false,
        }
    }

    /// Creates an empty storage that always emits the summary keys, so that
    /// the keys of a scalar do not depend on how often it was stored.
    pub fn summarizing() -> Self {
        Self {
            data: vec![],
            summarize_single: true,
        }
    }

    /// Stores a record.
    pub fn store(&mut self, record: Record) {
        self.data.push(record);
    }

    /// Returns `true` if no record is stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn get_keys(&self) -> HashSet<String, Xxh3Builder> {
        let mut keys = HashSet::<String, Xxh3Builder>::default();
        for record in self.data.iter() {
            for k in record.keys() {
                keys.insert(k.clone());
            }
        }
        keys
    }

    fn datetime(&self, key: &str) -> Record {
        self.data
            .iter()
            .rev()
            .find_map(|record| match record.get(key) {
                Some(v @ RecordValue::DateTime(..)) => {
                    Some(Record::from_slice(&[(key, v.clone())]))
                }
                _ => None,
            })
            .unwrap_or_default()
    }

    fn scalar(&self, key: &str) -> Record {
        let vs: Vec<f32> = self
            .data
            .iter()
            .filter_map(|record| match record.get(key) {
                Some(RecordValue::Scalar(v)) => Some(*v),
                _ => None,
            })
            .collect();

        match vs.len() {
            0 => Record::empty(),
            1 if !self.summarize_single => {
                Record::from_slice(&[(key, RecordValue::Scalar(vs[0]))])
            }
            _ => Record::from_slice(&[
                (format!("{}_min", key), min(&vs)),
                (format!("{}_max", key), max(&vs)),
                (format!("{}_mean", key), mean(&vs)),
                (format!("{}_median", key), median(vs)),
            ]),
        }
    }

    /// Aggregates all stored records and clears the storage.
    ///
    /// The variant of the first value stored under a key decides how the key
    /// is aggregated; values of other variants under the same key are ignored.
    pub fn aggregate(&mut self) -> Record {
        let mut record = Record::empty();

        for key in self.get_keys().iter() {
            let first = self.data.iter().find_map(|r| r.get(key));
            let r = match first {
                Some(RecordValue::DateTime(..)) => self.datetime(key),
                Some(RecordValue::Scalar(..)) => self.scalar(key),
                None => continue,
            };
            record = record.merge(r);
        }

        self.data = vec![];

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_scalars() {
        let mut storage = RecordStorage::new();
        for v in [3.0, 1.0, 2.0, 6.0] {
            storage.store(Record::from_scalar("loss", v));
        }
        storage.store(Record::from_scalar("entropy", 0.5));

        let record = storage.aggregate();
        assert_eq!(record.get_scalar("loss_min").unwrap(), 1.0);
        assert_eq!(record.get_scalar("loss_max").unwrap(), 6.0);
        assert_eq!(record.get_scalar("loss_mean").unwrap(), 3.0);
        assert_eq!(record.get_scalar("loss_median").unwrap(), 3.0);
        assert_eq!(record.get_scalar("entropy").unwrap(), 0.5);
        assert!(record.get("loss").is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_summarizing_storage_keeps_keys_stable() {
        let mut storage = RecordStorage::summarizing();
        storage.store(Record::from_scalar("loss", 2.0));
        let record = storage.aggregate();
        assert_eq!(record.get_scalar("loss_mean").unwrap(), 2.0);
        assert_eq!(record.get_scalar("loss_min").unwrap(), 2.0);
        assert!(record.get("loss").is_none());

        for v in [1.0, 3.0] {
            storage.store(Record::from_scalar("loss", v));
        }
        let record = storage.aggregate();
        assert_eq!(record.get_scalar("loss_mean").unwrap(), 2.0);
        assert_eq!(record.get_scalar("loss_max").unwrap(), 3.0);
    }
}
