//! In-memory buffer of pending annotation rows.
//!
//! Records accumulate here and are handed off for background persistence in
//! batches of [`FLUSH_THRESHOLD`]. The buffer is cleared synchronously when
//! a batch is taken, before any remote write starts; a drained batch is
//! never re-buffered, which makes delivery at-most-once (a failed background
//! append is the flush worker's problem to log and retry, not ours).

use crate::record::AnnotationRecord;

/// Batch size at which [`AnnotationBuffer::flush_if_due`] drains the buffer.
pub const FLUSH_THRESHOLD: usize = 5;

/// Ordered pending records for one session.
#[derive(Debug, Default)]
pub struct AnnotationBuffer {
    pending: Vec<AnnotationRecord>,
}

impl AnnotationBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to the pending batch.
    pub fn record(&mut self, record: AnnotationRecord) {
        self.pending.push(record);
    }

    /// Take the whole buffer when the threshold is reached.
    ///
    /// Returns `None` below the threshold. On `Some`, the buffer is already
    /// empty when this returns.
    pub fn flush_if_due(&mut self) -> Option<Vec<AnnotationRecord>> {
        if self.pending.len() >= FLUSH_THRESHOLD {
            Some(std::mem::take(&mut self.pending))
        } else {
            None
        }
    }

    /// Take the whole buffer regardless of size. Used at logout and at queue
    /// exhaustion. Returns `None` when there is nothing to flush.
    pub fn flush_now(&mut self) -> Option<Vec<AnnotationRecord>> {
        if self.pending.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.pending))
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
