//! Hierarchical logger shared by the components of the training loop.
use super::{NullRecorder, Record, RecordStorage, RecordValue, Recorder};
use chrono::Local;
use log::{info, warn};
use std::{cell::RefCell, fmt, rc::Rc};

struct LoggerState {
    /// Names of the open accumulation scopes, outermost first.
    scopes: Vec<String>,

    /// Values recorded outside of any scope; later values overwrite.
    current: Record,

    /// Values recorded inside scopes, aggregated at dump time.
    storage: RecordStorage,

    /// Warnings emitted since the last dump.
    warnings: Vec<String>,

    recorder: Box<dyn Recorder>,
}

/// A handle to a hierarchical metrics logger.
///
/// Cloning the handle does not create a new logger: all clones write into the
/// same state. [`PreferenceComparisons`](crate::PreferenceComparisons) hands a
/// clone of its own logger to every sub-component so that all metrics of an
/// iteration end up in one [`Record`].
///
/// Values recorded inside an [`accumulate_means`](Logger::accumulate_means)
/// scope are prefixed with the scope names and aggregated with
/// [`RecordStorage`] when [`dump`](Logger::dump) is called, always into
/// `{key}_min`, `{key}_max`, `{key}_mean` and `{key}_median`, however many
/// values were recorded. Values recorded outside of any scope keep only
/// their last value under the bare key.
#[derive(Clone)]
pub struct Logger {
    state: Rc<RefCell<LoggerState>>,
}

impl Default for Logger {
    /// A logger discarding every dumped record.
    fn default() -> Self {
        Self::new(Box::new(NullRecorder {}))
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Logger")
            .field("scopes", &state.scopes)
            .field("current", &state.current)
            .finish()
    }
}

impl Logger {
    /// Creates a logger writing dumped records to `recorder`.
    pub fn new(recorder: Box<dyn Recorder>) -> Self {
        let state = LoggerState {
            scopes: vec![],
            current: Record::empty(),
            storage: RecordStorage::summarizing(),
            warnings: vec![],
            recorder,
        };
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Returns `true` if both handles refer to the same logger.
    pub fn ptr_eq(&self, other: &Logger) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// Records a value under `key`, prefixed with the names of open scopes.
    pub fn record(&self, key: &str, value: RecordValue) {
        let mut state = self.state.borrow_mut();
        if state.scopes.is_empty() {
            state.current.insert(key, value);
        } else {
            let key = format!("{}/{}", state.scopes.join("/"), key);
            state.storage.store(Record::from_slice(&[(key, value)]));
        }
    }

    /// Records a scalar value.
    pub fn record_scalar(&self, key: &str, value: f32) {
        self.record(key, RecordValue::Scalar(value));
    }

    /// Opens an accumulation scope named `name`.
    ///
    /// The scope is closed when the returned guard is dropped. Scopes nest.
    #[must_use = "the scope is closed as soon as the guard is dropped"]
    pub fn accumulate_means(&self, name: &str) -> AccumulateMeans {
        self.state.borrow_mut().scopes.push(name.to_string());
        AccumulateMeans {
            logger: self.clone(),
        }
    }

    /// Aggregates everything recorded since the last dump, writes it to the
    /// recorder with `step` as `iteration`, and returns the written record.
    pub fn dump(&self, step: usize) -> Record {
        let mut state = self.state.borrow_mut();
        let current = std::mem::take(&mut state.current);
        let mut record = current.merge(state.storage.aggregate());
        record.insert("iteration", RecordValue::Scalar(step as f32));
        record.insert("datetime", RecordValue::DateTime(Local::now()));
        state.warnings.clear();
        state.recorder.write(record.clone());
        record
    }

    /// Emits an informational message.
    pub fn log(&self, msg: impl AsRef<str>) {
        info!("{}", msg.as_ref());
    }

    /// Emits a warning.
    pub fn warn(&self, msg: impl AsRef<str>) {
        warn!("{}", msg.as_ref());
        self.state.borrow_mut().warnings.push(msg.as_ref().to_string());
    }

    /// Returns the warnings emitted since the last dump.
    pub fn warnings(&self) -> Vec<String> {
        self.state.borrow().warnings.clone()
    }
}

/// Guard of a scope opened with [`Logger::accumulate_means`].
pub struct AccumulateMeans {
    logger: Logger,
}

impl Drop for AccumulateMeans {
    fn drop(&mut self) {
        self.logger.state.borrow_mut().scopes.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::BufferedRecorder;

    #[test]
    fn test_nested_scopes() {
        let recorder = BufferedRecorder::new();
        let logger = Logger::new(Box::new(recorder.clone()));

        {
            let _outer = logger.accumulate_means("agent");
            {
                let _inner = logger.accumulate_means("rollout");
                logger.record_scalar("return", 2.0);
            }
            logger.record_scalar("return", 4.0);
        }
        logger.record_scalar("size", 1.0);
        logger.record_scalar("size", 5.0);

        let record = logger.dump(3);
        assert_eq!(record.get_scalar("agent/rollout/return_mean").unwrap(), 2.0);
        assert_eq!(record.get_scalar("agent/return_mean").unwrap(), 4.0);
        assert_eq!(record.get_scalar("size").unwrap(), 5.0);
        assert_eq!(record.get_scalar("iteration").unwrap(), 3.0);
        assert_eq!(recorder.len(), 1);
    }

    #[test]
    fn test_dump_resets_state() {
        let logger = Logger::default();
        logger.record_scalar("loss", 1.0);
        logger.warn("something odd");
        assert_eq!(logger.warnings().len(), 1);

        let _ = logger.dump(0);
        let record = logger.dump(1);
        assert!(record.get("loss").is_none());
        assert!(logger.warnings().is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let logger = Logger::default();
        let clone = logger.clone();
        assert!(logger.ptr_eq(&clone));
        assert!(!logger.ptr_eq(&Logger::default()));

        let _scope = clone.accumulate_means("preferences");
        logger.record_scalar("entropy", 0.5);
        drop(_scope);

        let record = logger.dump(0);
        assert_eq!(record.get_scalar("preferences/entropy_mean").unwrap(), 0.5);
    }

    #[test]
    fn test_scoped_keys_do_not_depend_on_the_number_of_values() {
        let logger = Logger::default();
        for (step, n) in [1, 3].into_iter().enumerate() {
            {
                let _scope = logger.accumulate_means("reward");
                for _ in 0..n {
                    logger.record_scalar("loss", 1.5);
                }
            }
            let record = logger.dump(step);
            assert_eq!(record.get_scalar("reward/loss_mean").unwrap(), 1.5);
            assert!(record.get("reward/loss").is_none());
        }
    }
}
