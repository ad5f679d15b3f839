//! Retorik domain logic.
//!
//! Pure (no I/O beyond corpus file loading) building blocks for the debate
//! annotation service: corpus parsing, the versioned label schema, annotation
//! records, progress tracking over the unannotated queue, the batched
//! annotation buffer, and the per-user session state machine.

pub mod buffer;
pub mod corpus;
pub mod error;
pub mod labels;
pub mod progress;
pub mod record;
pub mod session;

pub use buffer::{AnnotationBuffer, FLUSH_THRESHOLD};
pub use corpus::{AnnotationUnit, Corpus};
pub use error::CoreError;
pub use labels::{Label, LabelSchema};
pub use progress::{annotated_texts, remaining, Progress, ProgressState};
pub use record::{AnnotationRecord, Selection};
pub use session::{Session, SubmitOutcome};
