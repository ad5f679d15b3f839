//! Progress tracking over the unannotated queue.
//!
//! `remaining` is computed once at session creation; afterwards the session
//! moves a position index through the filtered queue and never re-filters.
//! Submitted-but-unflushed units are therefore tracked by position, not by
//! membership in the already-done set.

use std::collections::HashSet;

use crate::corpus::{AnnotationUnit, Corpus};
use crate::labels::LabelSchema;

/// Filter `corpus` down to units whose text is not in `already_done`,
/// preserving corpus order.
///
/// De-duplication is keyed on the full unit text: two distinct corpus lines
/// with identical text are treated as one already-annotated unit. This
/// mirrors the source campaign's bookkeeping and is deliberately not "fixed"
/// here.
pub fn remaining(corpus: &Corpus, already_done: &HashSet<String>) -> Vec<AnnotationUnit> {
    corpus
        .units()
        .iter()
        .filter(|unit| !already_done.contains(&unit.text))
        .cloned()
        .collect()
}

/// Extract the set of already-annotated unit texts from a user's ledger rows.
///
/// `rows` includes the header row, which is skipped. Rows too short to carry
/// a `full_text` column are ignored.
pub fn annotated_texts(schema: &LabelSchema, rows: &[Vec<String>]) -> HashSet<String> {
    let col = schema.full_text_column();
    rows.iter()
        .skip(1)
        .filter_map(|row| row.get(col).cloned())
        .collect()
}

/// Where the session currently sits in its queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressState {
    /// The unit at this queue position is presented for annotation.
    Active(usize),
    /// Terminal: every queued unit has been submitted. Sticky.
    Exhausted,
}

/// Position index over the filtered queue, with a sticky finished flag.
#[derive(Debug, Clone)]
pub struct Progress {
    queue: Vec<AnnotationUnit>,
    position: usize,
    finished: bool,
}

impl Progress {
    /// Start at position 0. An empty queue is born exhausted.
    pub fn new(queue: Vec<AnnotationUnit>) -> Self {
        let finished = queue.is_empty();
        Self {
            queue,
            position: 0,
            finished,
        }
    }

    /// Current state. The finished flag wins over the index, so the index is
    /// never reinterpreted after exhaustion.
    pub fn state(&self) -> ProgressState {
        if self.finished || self.position >= self.queue.len() {
            ProgressState::Exhausted
        } else {
            ProgressState::Active(self.position)
        }
    }

    /// The unit currently presented, if any.
    pub fn current(&self) -> Option<&AnnotationUnit> {
        match self.state() {
            ProgressState::Active(i) => self.queue.get(i),
            ProgressState::Exhausted => None,
        }
    }

    /// Advance past the current unit. No-op once exhausted; the index never
    /// overruns the queue length.
    pub fn advance(&mut self) -> ProgressState {
        if self.finished {
            return ProgressState::Exhausted;
        }
        self.position += 1;
        if self.position >= self.queue.len() {
            self.finished = true;
        }
        self.state()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Queue length (units remaining at session start).
    pub fn total(&self) -> usize {
        self.queue.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
