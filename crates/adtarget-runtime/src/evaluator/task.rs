//! Per-predicate task body

use adtarget_core::{PredicateError, PredicateResult, RequestContext, TargetingPredicate};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::debug;

/// What one predicate task produced
pub(crate) enum TaskOutcome {
    Finished(PredicateResult),
    Failed(PredicateError),
    Panicked(String),
}

impl TaskOutcome {
    /// Anything other than a TRUE result settles the group
    pub(crate) fn is_decisive(&self) -> bool {
        !matches!(self, TaskOutcome::Finished(result) if result.is_true())
    }
}

pub(crate) struct TaskReport {
    pub index: usize,
    pub outcome: TaskOutcome,
}

/// Counts a predicate task as alive from dispatch until its future is dropped,
/// whether it completed or was aborted.
pub(crate) struct InFlightGuard {
    counter: Arc<AtomicUsize>,
}

impl InFlightGuard {
    pub(crate) fn new(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self {
            counter: Arc::clone(counter),
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Evaluate one predicate once a worker permit is available.
///
/// Panics are caught here so a `JoinError` only ever means cancellation.
pub(crate) async fn run_predicate(
    index: usize,
    predicate: Arc<dyn TargetingPredicate>,
    ctx: Arc<RequestContext>,
    permits: Arc<Semaphore>,
    _guard: InFlightGuard,
) -> TaskReport {
    let _permit = match permits.acquire_owned().await {
        Ok(permit) => permit,
        Err(_) => {
            return TaskReport {
                index,
                outcome: TaskOutcome::Failed(PredicateError::failed("worker pool closed")),
            }
        }
    };

    let start = Instant::now();
    let outcome = match AssertUnwindSafe(predicate.evaluate(&ctx)).catch_unwind().await {
        Ok(Ok(result)) => TaskOutcome::Finished(result),
        Ok(Err(e)) => TaskOutcome::Failed(e),
        Err(payload) => TaskOutcome::Panicked(panic_message(payload.as_ref())),
    };

    debug!(
        "Predicate '{}' [{}] finished in {}ms",
        predicate.name(),
        index,
        start.elapsed().as_millis()
    );

    TaskReport { index, outcome }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
