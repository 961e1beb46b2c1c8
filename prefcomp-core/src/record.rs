//! Types and traits for recording metrics during reward learning.
//!
//! * [`Record`] - a container of key-value pairs
//! * [`RecordValue`] - values that can be stored in a [`Record`]
//! * [`RecordStorage`] - accumulates records and aggregates them
//! * [`Logger`] - a shared, hierarchical handle that components write to
//! * [`Recorder`] - a sink receiving the records dumped by a [`Logger`]
//! * [`BufferedRecorder`] and [`NullRecorder`] - in-memory and discarding sinks
//!
//! # Basic Usage
//!
//! ```rust
//! use prefcomp_core::record::{BufferedRecorder, Logger};
//!
//! let recorder = BufferedRecorder::new();
//! let logger = Logger::new(Box::new(recorder.clone()));
//!
//! logger.record_scalar("dataset_size", 10.0);
//! {
//!     let _scope = logger.accumulate_means("reward");
//!     logger.record_scalar("loss", 0.75);
//!     logger.record_scalar("loss", 0.25);
//! }
//! logger.dump(0);
//!
//! let record = &recorder.records()[0];
//! assert_eq!(record.get_scalar("dataset_size").unwrap(), 10.0);
//! assert_eq!(record.get_scalar("reward/loss_mean").unwrap(), 0.5);
//! ```
mod base;
mod buffered_recorder;
mod logger;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use logger::{AccumulateMeans, Logger};
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
pub use storage::RecordStorage;
