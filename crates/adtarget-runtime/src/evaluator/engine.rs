//! Core TargetingEvaluator implementation

use super::outcome::{EvaluationOutcome, Rejection};
use super::task::{run_predicate, InFlightGuard, TaskOutcome, TaskReport};
use crate::config::{CancellationPolicy, EvaluatorConfig};
use crate::error::{EvaluationError, Result};
use crate::observability::{Metrics, MetricsCollector};
use adtarget_core::{RequestContext, TargetingGroup, TargetingPredicate};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Evaluates targeting groups against request contexts.
///
/// One evaluator is meant to be shared across requests. It owns the worker
/// permits that bound how many predicates run at once; everything else about
/// a call (its tasks, its partial results) lives and dies inside `evaluate`.
pub struct TargetingEvaluator {
    config: EvaluatorConfig,

    /// Worker permits shared by all calls
    permits: Arc<Semaphore>,

    /// Predicate tasks currently alive, across all calls
    in_flight: Arc<AtomicUsize>,

    metrics: Option<Arc<MetricsCollector>>,
}

impl TargetingEvaluator {
    /// Create an evaluator from an explicit configuration
    pub fn new(config: EvaluatorConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            permits: Arc::new(Semaphore::new(config.max_concurrency)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            metrics: None,
            config,
        })
    }

    /// Record metrics into the given collector
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn metrics(&self) -> Option<&Arc<MetricsCollector>> {
        self.metrics.as_ref()
    }

    /// Predicate tasks currently alive (dispatched and not yet dropped)
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Worker permits not currently held by a predicate
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Decide whether `group` holds for `ctx`.
    ///
    /// Returns `Eligible` iff the request is from a recognized customer and
    /// every predicate returns TRUE (an empty group is eligible). No predicate
    /// is invoked for an unrecognized customer. Any predicate failure, panic
    /// or timeout fails the whole call. By the time this returns, every task
    /// it spawned has finished or been aborted and dropped.
    pub async fn evaluate(
        &self,
        ctx: &Arc<RequestContext>,
        group: &TargetingGroup,
    ) -> Result<EvaluationOutcome> {
        let start = Instant::now();
        let result = self.evaluate_group(ctx, group).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(outcome) => debug!(
                "Targeting group '{}' evaluated to {} in {}ms",
                group.targeting_group_id,
                outcome.label(),
                elapsed.as_millis()
            ),
            Err(e) => warn!(
                "Targeting group '{}' evaluation failed after {}ms: {}",
                group.targeting_group_id,
                elapsed.as_millis(),
                e
            ),
        }

        if let Some(metrics) = &self.metrics {
            metrics.counter("evaluations_total").inc();
            metrics.record_duration("evaluation", elapsed);
            match &result {
                Ok(EvaluationOutcome::Eligible) => metrics.counter("eligible_total").inc(),
                Ok(EvaluationOutcome::Ineligible(Rejection::GateRejected)) => {
                    metrics.counter("gate_rejections_total").inc();
                    metrics.counter("ineligible_total").inc();
                }
                Ok(EvaluationOutcome::Ineligible(_)) => metrics.counter("ineligible_total").inc(),
                Err(e) => metrics.record_error(e.kind()),
            }
        }

        result
    }

    async fn evaluate_group(
        &self,
        ctx: &Arc<RequestContext>,
        group: &TargetingGroup,
    ) -> Result<EvaluationOutcome> {
        if !ctx.is_recognized_customer() {
            debug!(
                "Request is not from a recognized customer, rejecting targeting group '{}'",
                group.targeting_group_id
            );
            return Ok(EvaluationOutcome::Ineligible(Rejection::GateRejected));
        }

        let predicates = group.predicates();
        if predicates.is_empty() {
            return Ok(EvaluationOutcome::Eligible);
        }

        debug!(
            "Dispatching {} predicates for targeting group '{}'",
            predicates.len(),
            group.targeting_group_id
        );

        // Dropping the JoinSet aborts whatever is still in it, so a caller
        // that abandons this future does not leave predicates running.
        let mut tasks = JoinSet::new();
        for (index, predicate) in predicates.iter().enumerate() {
            tasks.spawn(run_predicate(
                index,
                Arc::clone(predicate),
                Arc::clone(ctx),
                Arc::clone(&self.permits),
                InFlightGuard::new(&self.in_flight),
            ));
        }
        if let Some(metrics) = &self.metrics {
            metrics
                .counter("predicate_invocations_total")
                .add(predicates.len() as u64);
        }

        let collected = self.collect(&mut tasks, predicates).await;

        if !tasks.is_empty() {
            debug!(
                "Cancelling {} outstanding predicate tasks for targeting group '{}'",
                tasks.len(),
                group.targeting_group_id
            );
            tasks.shutdown().await;
        }

        reduce(collected?, predicates)
    }

    /// Gather task results into slots indexed by predicate position.
    ///
    /// Stops early on timeout, on interruption, or (under
    /// `CancelOnDecision`) on the first decisive result; the caller drains
    /// whatever is left in `tasks`.
    async fn collect(
        &self,
        tasks: &mut JoinSet<TaskReport>,
        predicates: &[Arc<dyn TargetingPredicate>],
    ) -> Result<Vec<Option<TaskOutcome>>> {
        let mut slots: Vec<Option<TaskOutcome>> = predicates.iter().map(|_| None).collect();
        let deadline = self
            .config
            .timeout()
            .map(|timeout| (timeout, tokio::time::Instant::now() + timeout));

        loop {
            let joined = match deadline {
                Some((timeout, at)) => {
                    match tokio::time::timeout_at(at, tasks.join_next()).await {
                        Ok(joined) => joined,
                        Err(_) => {
                            let pending = pending_names(&slots, predicates);
                            warn!(
                                "Timed out after {}ms waiting on {:?}",
                                timeout.as_millis(),
                                pending
                            );
                            return Err(EvaluationError::Timeout { timeout, pending });
                        }
                    }
                }
                None => tasks.join_next().await,
            };

            let Some(joined) = joined else {
                break;
            };
            let report = joined.map_err(|e| EvaluationError::Interrupted(e.to_string()))?;

            let decisive = report.outcome.is_decisive();
            slots[report.index] = Some(report.outcome);

            if decisive && self.config.cancellation == CancellationPolicy::CancelOnDecision {
                break;
            }
        }

        Ok(slots)
    }
}

/// Reduce collected results in predicate order.
///
/// Failures take precedence over rejections; within each, the lowest index
/// wins. Empty slots belong to tasks that were cancelled once the outcome was
/// already decided.
fn reduce(
    slots: Vec<Option<TaskOutcome>>,
    predicates: &[Arc<dyn TargetingPredicate>],
) -> Result<EvaluationOutcome> {
    let mut rejection = None;

    for (index, slot) in slots.into_iter().enumerate() {
        let name = predicates[index].name().to_string();
        match slot {
            Some(TaskOutcome::Failed(source)) => {
                return Err(EvaluationError::PredicateFailed {
                    index,
                    predicate: name,
                    source,
                });
            }
            Some(TaskOutcome::Panicked(message)) => {
                return Err(EvaluationError::PredicatePanicked {
                    index,
                    predicate: name,
                    message,
                });
            }
            Some(TaskOutcome::Finished(result)) if !result.is_true() => {
                if rejection.is_none() {
                    rejection = Some(Rejection::PredicateRejected {
                        index,
                        predicate: name,
                        result,
                    });
                }
            }
            Some(TaskOutcome::Finished(_)) | None => {}
        }
    }

    Ok(match rejection {
        Some(rejection) => EvaluationOutcome::Ineligible(rejection),
        None => EvaluationOutcome::Eligible,
    })
}

fn pending_names(
    slots: &[Option<TaskOutcome>],
    predicates: &[Arc<dyn TargetingPredicate>],
) -> Vec<String> {
    slots
        .iter()
        .zip(predicates)
        .filter(|(slot, _)| slot.is_none())
        .map(|(_, predicate)| predicate.name().to_string())
        .collect()
}
