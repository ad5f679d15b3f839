//! Background flush worker: appends drained annotation batches to the ledger.
//!
//! The interactive submit path never waits on the spreadsheet bridge.
//! Batches drained from a session buffer are handed to [`FlushQueue::enqueue`]
//! (a non-blocking `try_send`) and a single worker task appends them,
//! retrying transient failures with bounded exponential backoff.
//!
//! Delivery is explicitly at-most-once: the session buffer is cleared before
//! the hand-off, drained records are never re-buffered, and a batch that
//! still fails after the last retry is logged and lost. The single consumer
//! serializes successive batches from the same user as a side effect;
//! cross-user ordering is unspecified.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use retorik_ledger::Ledger;

/// Bound on the number of queued batches.
const QUEUE_CAPACITY: usize = 64;

/// Append attempts per batch, including the first.
const MAX_ATTEMPTS: u32 = 3;

/// Initial retry backoff; doubles per attempt.
const INITIAL_BACKOFF: Duration = Duration::from_millis(200);

/// One drained batch destined for a user's ledger tab.
#[derive(Debug)]
pub struct FlushJob {
    pub tab: String,
    pub rows: Vec<Vec<String>>,
}

/// Cloneable sending half of the flush queue.
#[derive(Clone)]
pub struct FlushQueue {
    tx: mpsc::Sender<FlushJob>,
}

impl FlushQueue {
    /// Create the queue; pass the receiver to [`run`].
    pub fn new() -> (Self, mpsc::Receiver<FlushJob>) {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        (Self { tx }, rx)
    }

    /// Hand a batch to the worker without waiting.
    ///
    /// A full or closed queue drops the batch: the records were already
    /// removed from the session buffer, so this is the at-most-once data
    /// loss path and it is logged as such.
    pub fn enqueue(&self, job: FlushJob) {
        let rows = job.rows.len();
        let tab = job.tab.clone();
        if let Err(e) = self.tx.try_send(job) {
            tracing::error!(tab = %tab, rows, error = %e, "Flush queue rejected batch; records lost");
        }
    }
}

/// Run the flush worker until `cancel` fires, then drain remaining jobs.
///
/// The post-cancel drain gives logout-time batches a chance to land during
/// graceful shutdown; the caller bounds it with a timeout.
pub async fn run(ledger: Arc<dyn Ledger>, mut rx: mpsc::Receiver<FlushJob>, cancel: CancellationToken) {
    tracing::info!("Flush worker started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            job = rx.recv() => match job {
                Some(job) => append_with_retry(ledger.as_ref(), job).await,
                None => break,
            },
        }
    }

    rx.close();
    while let Some(job) = rx.recv().await {
        append_with_retry(ledger.as_ref(), job).await;
    }
    tracing::info!("Flush worker stopped");
}

/// Append one batch, retrying up to [`MAX_ATTEMPTS`] times.
async fn append_with_retry(ledger: &dyn Ledger, job: FlushJob) {
    let FlushJob { tab, rows } = job;
    let count = rows.len();
    let mut backoff = INITIAL_BACKOFF;

    for attempt in 1..=MAX_ATTEMPTS {
        match ledger.append_rows(&tab, rows.clone()).await {
            Ok(()) => {
                tracing::debug!(tab = %tab, rows = count, "Flushed annotation batch");
                return;
            }
            Err(e) if attempt < MAX_ATTEMPTS => {
                tracing::warn!(
                    tab = %tab,
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %e,
                    "Flush failed; retrying"
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
            Err(e) => {
                tracing::error!(tab = %tab, rows = count, error = %e, "Flush failed permanently; batch lost");
            }
        }
    }
}
