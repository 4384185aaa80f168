//! Background batch worker
//!
//! Runs a batch on one named thread and hands its events to an observer over
//! a channel. Validation happens on the caller's thread, so configuration
//! errors come back from [`BatchTask::spawn`] before anything is written.

use crate::codec::ImageCodec;
use crate::config::BatchJobConfig;
use crate::error::{BatchError, Result};
use crate::events::{BatchEvent, BatchSummary};
use crate::pipeline::BatchPipeline;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::debug;

const WORKER_THREAD_NAME: &str = "img-web-batch";

pub struct BatchTask {
    events: Receiver<BatchEvent>,
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<BatchSummary>,
}

impl BatchTask {
    pub fn spawn<C>(pipeline: BatchPipeline<C>, config: &BatchJobConfig) -> Result<Self>
    where
        C: ImageCodec + Send + 'static,
    {
        let batch = pipeline.prepare(config)?;
        let cancel = pipeline.cancel_flag();
        let (tx, rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                // A dropped receiver must not stop the batch, so send errors are ignored.
                pipeline.execute(batch).drain_into(|event| {
                    let _ = tx.send(event.clone());
                })
            })
            .map_err(BatchError::Worker)?;

        debug!("spawned {} worker", WORKER_THREAD_NAME);

        Ok(Self {
            events: rx,
            cancel,
            handle,
        })
    }

    /// Events in emission order. The channel closes once the run has finished.
    pub fn events(&self) -> &Receiver<BatchEvent> {
        &self.events
    }

    /// Requests a stop before the next file; the file in progress completes.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn join(self) -> Result<BatchSummary> {
        self.handle.join().map_err(|_| BatchError::WorkerPanicked)
    }
}
