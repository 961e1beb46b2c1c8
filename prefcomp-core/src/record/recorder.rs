use super::Record;

/// Writes a record to an output destination with [`Recorder::write`].
///
/// A [`Logger`](super::Logger) writes one aggregated record per dump.
pub trait Recorder {
    /// Write a record to the [`Recorder`].
    fn write(&mut self, record: Record);
}
