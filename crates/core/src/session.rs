//! The per-user annotation session state machine.
//!
//! A [`Session`] is created at login (after the once-per-login ledger fetch)
//! and destroyed at logout. It owns the filtered queue, the position within
//! it, and the pending annotation buffer. The session itself performs no
//! I/O: flush batches are returned to the caller, which hands them to the
//! background flush worker.

use std::collections::HashSet;

use chrono::Local;

use crate::buffer::AnnotationBuffer;
use crate::corpus::{AnnotationUnit, Corpus};
use crate::labels::LabelSchema;
use crate::progress::{remaining, Progress, ProgressState};
use crate::record::{AnnotationRecord, Selection};

/// Result of a submit action.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The record was buffered and the queue advanced. `flush` carries a
    /// drained batch when the submit tripped the threshold or exhausted the
    /// queue.
    Advanced {
        flush: Option<Vec<AnnotationRecord>>,
        finished: bool,
    },
    /// No labeled spans were provided; nothing was recorded and the queue
    /// did not move. The UI disables submit in this case, so the server
    /// mirrors it as a quiet no-op rather than an error.
    EmptySubmission,
    /// The queue was already exhausted; submits after exhaustion are no-ops.
    AlreadyFinished,
}

/// Live state for one logged-in user.
#[derive(Debug)]
pub struct Session {
    user_id: String,
    schema: &'static LabelSchema,
    progress: Progress,
    buffer: AnnotationBuffer,
}

impl Session {
    /// Create a session: filter the corpus against the already-annotated
    /// text set and start at position 0. An empty queue makes the session
    /// born finished.
    pub fn new(user_id: String, corpus: &Corpus, already_done: &HashSet<String>) -> Self {
        let queue = remaining(corpus, already_done);
        Self {
            user_id,
            schema: LabelSchema::latest(),
            progress: Progress::new(queue),
            buffer: AnnotationBuffer::new(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn schema(&self) -> &'static LabelSchema {
        self.schema
    }

    /// The unit currently presented for annotation, if any.
    pub fn current(&self) -> Option<&AnnotationUnit> {
        self.progress.current()
    }

    pub fn position(&self) -> usize {
        self.progress.position()
    }

    pub fn total(&self) -> usize {
        self.progress.total()
    }

    pub fn is_finished(&self) -> bool {
        self.progress.is_finished()
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Submit the labeled spans for the current unit.
    ///
    /// Builds one record (timestamped with the local clock), buffers it,
    /// drains the buffer if the batch threshold is reached, then advances
    /// the queue. Exhausting the queue forces a flush of whatever remains
    /// buffered.
    pub fn submit(&mut self, selections: &[Selection], comment: &str) -> SubmitOutcome {
        let Some(unit) = self.progress.current().cloned() else {
            return SubmitOutcome::AlreadyFinished;
        };
        if selections.is_empty() {
            return SubmitOutcome::EmptySubmission;
        }

        let record = AnnotationRecord::build(
            self.schema,
            &self.user_id,
            self.progress.position(),
            &unit,
            selections,
            comment,
            Local::now(),
        );
        self.buffer.record(record);

        let mut flush = self.buffer.flush_if_due();
        let finished = matches!(self.progress.advance(), ProgressState::Exhausted);
        if finished && flush.is_none() {
            flush = self.buffer.flush_now();
        }

        SubmitOutcome::Advanced { flush, finished }
    }

    /// Tear the session down, returning any still-buffered records for a
    /// final flush. Consumes the session: nothing is retained.
    pub fn logout(mut self) -> Option<Vec<AnnotationRecord>> {
        self.buffer.flush_now()
    }
}
