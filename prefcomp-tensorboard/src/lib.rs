//! Writes records dumped by a [`Logger`](prefcomp_core::record::Logger) to
//! TensorBoard event files.
use log::warn;
use prefcomp_core::record::{Record, RecordValue, Recorder};
use std::path::Path;
use tensorboard_rs::summary_writer::SummaryWriter;

/// Write records to TFRecord.
pub struct TensorboardRecorder {
    writer: SummaryWriter,
    step_key: String,
}

impl TensorboardRecorder {
    /// Construct a [`TensorboardRecorder`].
    ///
    /// TFRecord will be stored in `logdir`. The step of each record is read
    /// from its `iteration` entry.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        Self::new_with_step_key(logdir, "iteration")
    }

    /// Construct a [`TensorboardRecorder`] reading the step from `step_key`.
    pub fn new_with_step_key<P: AsRef<Path>>(logdir: P, step_key: impl Into<String>) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
            step_key: step_key.into(),
        }
    }
}

impl Recorder for TensorboardRecorder {
    /// Write a given [`Record`] into a TFRecord.
    ///
    /// Scalars are written; datetimes are discarded. A record without a
    /// scalar step is skipped.
    fn write(&mut self, record: Record) {
        let step = match record.get_scalar(&self.step_key) {
            Ok(v) => v as usize,
            Err(e) => {
                warn!("Skip a record without step: {}", e);
                return;
            }
        };

        for (k, v) in record.iter() {
            if *k != self.step_key {
                match v {
                    RecordValue::Scalar(v) => self.writer.add_scalar(k, *v, step),
                    RecordValue::DateTime(_) => {} // discard value
                };
            }
        }
        self.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use prefcomp_core::record::Logger;
    use tempdir::TempDir;

    #[test]
    fn test_write_event_file() -> Result<()> {
        let dir = TempDir::new("tensorboard_recorder")?;
        let logger = Logger::new(Box::new(TensorboardRecorder::new(dir.path())));
        {
            let _scope = logger.accumulate_means("reward");
            logger.record_scalar("loss", 0.5);
        }
        logger.dump(0);

        // A record without step is skipped
        let mut recorder = TensorboardRecorder::new_with_step_key(dir.path(), "opt_steps");
        recorder.write(Record::from_scalar("loss", 1.0));

        let n_files = std::fs::read_dir(dir.path())?.count();
        assert!(n_files >= 1);
        Ok(())
    }
}
