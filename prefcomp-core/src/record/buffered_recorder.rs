use super::{Record, Recorder};
use std::{cell::RefCell, rc::Rc};

/// Buffered recorder.
///
/// Keeps written records in memory. Clones share the buffer, so a clone kept
/// by the caller sees what was written through the one handed to a
/// [`Logger`](super::Logger).
#[derive(Default, Clone)]
pub struct BufferedRecorder {
    buf: Rc<RefCell<Vec<Record>>>,
}

impl BufferedRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns copies of the records written so far.
    pub fn records(&self) -> Vec<Record> {
        self.buf.borrow().clone()
    }

    /// Returns the number of records written so far.
    pub fn len(&self) -> usize {
        self.buf.borrow().len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.borrow().is_empty()
    }
}

impl Recorder for BufferedRecorder {
    /// Write a [`Record`] to the buffer.
    fn write(&mut self, record: Record) {
        self.buf.borrow_mut().push(record);
    }
}
