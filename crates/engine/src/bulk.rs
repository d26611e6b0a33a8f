//! Bulk iteration of point maps, run on a worker thread.
//!
//! A point attractor is computed all at once: the recurrence is iterated
//! `max` times in strict index order and the whole history is returned as
//! positions on the z = 0 plane. Large counts are slow enough to stall an
//! interactive loop, so [`BulkTask`] moves the work to its own thread. The
//! worker gets copies of its inputs and sends back an owned `Vec`; nothing
//! mutable is shared. Each task is tagged with a generation so the session
//! can tell a superseded result from the current one.

use attractors_catalog::Catalog;
use attractors_core::attractor::embed;
use attractors_core::{AttractorError, DVec3, PointStepper, SimpleConstants, Stepper};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// How many iterations run between cancellation checks.
const CANCEL_CHECK_INTERVAL: usize = 1024;

/// Inputs of one bulk computation, copied into the worker.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkRequest {
    pub id: String,
    pub max: usize,
    pub multiplier: f64,
    pub constants: SimpleConstants,
}

/// Shared flag a running computation polls to stop early.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Runs `stepper` for indices `0..max` and embeds the history as positions.
pub fn iterate(
    stepper: &PointStepper,
    max: usize,
    multiplier: f64,
    constants: &SimpleConstants,
    cancel: &CancelToken,
) -> Result<Vec<DVec3>, AttractorError> {
    let mut history = Vec::with_capacity(max);
    for i in 0..max {
        if i % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
            return Err(AttractorError::Cancelled);
        }
        let next = stepper.step(i, constants, multiplier, &history)?;
        history.push(next);
    }
    Ok(history.into_iter().map(embed).collect())
}

/// Looks up `request.id` and iterates it. Fails for unknown ids and curve attractors.
pub fn compute(
    catalog: &Catalog,
    request: &BulkRequest,
    cancel: &CancelToken,
) -> Result<Vec<DVec3>, AttractorError> {
    let attractor = catalog.get(&request.id)?;
    match &attractor.stepper {
        Stepper::Point(stepper) => iterate(
            stepper,
            request.max,
            request.multiplier,
            &request.constants,
            cancel,
        ),
        Stepper::Curve(_) => Err(AttractorError::NotAPointAttractor(request.id.clone())),
    }
}

/// Result of one bulk task, tagged with the generation it was dispatched as.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkOutcome {
    pub generation: u64,
    /// Attractor the request named.
    pub id: String,
    pub result: Result<Vec<DVec3>, AttractorError>,
}

/// Handle to an in-flight computation on a worker thread.
#[derive(Debug)]
pub struct BulkTask {
    generation: u64,
    id: String,
    cancel: CancelToken,
    receiver: Receiver<BulkOutcome>,
    handle: Option<JoinHandle<()>>,
}

impl BulkTask {
    /// Starts `request` on a new worker thread.
    pub fn spawn(
        catalog: Arc<Catalog>,
        request: BulkRequest,
        generation: u64,
    ) -> Result<Self, AttractorError> {
        let (tx, rx) = mpsc::channel();
        let id = request.id.clone();
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let handle = thread::Builder::new()
            .name(format!("bulk-{}-{generation}", request.id))
            .spawn(move || {
                let result = compute(&catalog, &request, &token);
                if let Err(e) = &result {
                    log::debug!("bulk {generation} for '{}' ended: {e}", request.id);
                }
                // The receiver is gone once the task is superseded.
                let _ = tx.send(BulkOutcome {
                    generation,
                    id: request.id,
                    result,
                });
            })
            .map_err(|e| AttractorError::BulkFailed(format!("could not start worker: {e}")))?;
        Ok(Self {
            generation,
            id,
            cancel,
            receiver: rx,
            handle: Some(handle),
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Signals the worker to stop. Any result it still produces is dropped.
    pub fn cancel(mut self) {
        self.cancel.cancel();
        // Detach: the worker exits at its next cancellation check.
        self.handle.take();
    }

    /// Non-blocking poll. `None` while the worker is still running.
    pub fn try_take(&mut self) -> Option<BulkOutcome> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(self.lost()),
        }
    }

    /// Blocks until the worker reports.
    pub fn wait(mut self) -> BulkOutcome {
        let outcome = self.receiver.recv().unwrap_or_else(|_| self.lost());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("bulk worker {} panicked", self.generation);
            }
        }
        outcome
    }

    fn lost(&self) -> BulkOutcome {
        BulkOutcome {
            generation: self.generation,
            id: self.id.clone(),
            result: Err(AttractorError::BulkFailed(
                "worker exited without a result".into(),
            )),
        }
    }
}
