//! Deferred call cancellation
//!
//! Every accepted ring call is handed to this service, which stops it once
//! [`RING_DURATION`] has elapsed. Scheduling never blocks the request path:
//! jobs go through a channel to a worker task that owns one timer task per
//! pending cancellation and supervises their completion.

use crate::domain::call::CallTransport;
use crate::domain::shared::error::{DomainError, Result};
use crate::domain::shared::value_objects::CallSessionId;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use metrics::{counter, gauge};
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// How long a ring-only call is left ringing before it is cancelled
///
/// Measured from the moment the worker picks the job up rather than from
/// [`AutoTerminator::schedule`], so the response to the scheduling request
/// is normally out before the clock starts.
pub const RING_DURATION: Duration = Duration::from_millis(5_000);

/// A cancellation handed to the worker
#[derive(Debug, Clone)]
pub struct PendingCancel {
    pub session_id: CallSessionId,
    pub scheduled_at: DateTime<Utc>,
}

/// Handle for scheduling cancellations
///
/// Cheap to clone; the worker stops once every handle is dropped and
/// the outstanding cancellations have run.
#[derive(Clone)]
pub struct AutoTerminator {
    jobs: mpsc::UnboundedSender<PendingCancel>,
    pending: Arc<AtomicUsize>,
}

impl AutoTerminator {
    /// Spawn the cancellation worker
    pub fn start(transport: Arc<dyn CallTransport>) -> (Self, JoinHandle<()>) {
        let (jobs, rx) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));

        let worker = tokio::spawn(run_worker(rx, transport, pending.clone()));
        info!("Auto-terminator started (ring duration {:?})", RING_DURATION);

        (Self { jobs, pending }, worker)
    }

    /// Schedule exactly one cancellation of `session_id`, due after [`RING_DURATION`]
    pub fn schedule(&self, session_id: CallSessionId) -> Result<()> {
        let job = PendingCancel {
            session_id,
            scheduled_at: Utc::now(),
        };

        record_pending(self.pending.fetch_add(1, Ordering::SeqCst) + 1);
        self.jobs.send(job).map_err(|e| {
            record_pending(self.pending.fetch_sub(1, Ordering::SeqCst) - 1);
            DomainError::Internal(format!(
                "auto-terminator is not running, call {} will not be cancelled",
                e.0.session_id
            ))
        })
    }

    /// Number of cancellations scheduled but not yet attempted
    pub fn pending_count(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<PendingCancel>,
    transport: Arc<dyn CallTransport>,
    pending: Arc<AtomicUsize>,
) {
    let mut timers = JoinSet::new();

    loop {
        tokio::select! {
            job = rx.recv() => match job {
                Some(job) => {
                    let due = Instant::now() + RING_DURATION;
                    debug!("Cancellation of call {} scheduled at {}", job.session_id, job.scheduled_at);
                    timers.spawn(cancel_when_due(job, due, transport.clone(), pending.clone()));
                }
                None => break,
            },
            Some(joined) = timers.join_next(), if !timers.is_empty() => {
                if let Err(e) = joined {
                    error!("Cancellation task did not complete: {}", e);
                }
            }
        }
    }

    // All handles dropped: let the calls already ringing be stopped before exiting
    while let Some(joined) = timers.join_next().await {
        if let Err(e) = joined {
            error!("Cancellation task did not complete: {}", e);
        }
    }
    info!("Auto-terminator stopped");
}

async fn cancel_when_due(
    job: PendingCancel,
    due: Instant,
    transport: Arc<dyn CallTransport>,
    pending: Arc<AtomicUsize>,
) {
    tokio::time::sleep_until(due).await;

    let outcome = AssertUnwindSafe(transport.stop_voice_call(&job.session_id))
        .catch_unwind()
        .await
        .unwrap_or_else(|_| Err(DomainError::Internal("call transport panicked".to_string())));
    record_pending(pending.fetch_sub(1, Ordering::SeqCst) - 1);

    match outcome {
        Ok(()) => {
            counter!("ring_cancellations_total").increment(1);
            info!("Ring call {} cancelled", job.session_id);
        }
        Err(e) => {
            // The response has already gone out; nothing to report back to
            counter!("ring_cancellation_failures_total").increment(1);
            let failure = DomainError::CancellationFailed {
                session_id: job.session_id.to_string(),
                reason: e.to_string(),
            };
            warn!("{}", failure);
        }
    }
}

fn record_pending(count: usize) {
    gauge!("ring_pending_cancellations").set(count as f64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::call::transport::MockCallTransport;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;

    #[tokio::test(start_paused = true)]
    async fn test_cancels_after_ring_duration() {
        let stopped = Arc::new(AtomicBool::new(false));
        let flag = stopped.clone();

        let mut transport = MockCallTransport::new();
        transport
            .expect_stop_voice_call()
            .withf(|id| id.as_str() == "S1")
            .times(1)
            .returning(move |_| {
                flag.store(true, Ordering::SeqCst);
                Ok(())
            });

        let (terminator, _worker) = AutoTerminator::start(Arc::new(transport));
        terminator.schedule(CallSessionId::new("S1")).unwrap();
        assert_eq!(terminator.pending_count(), 1);

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert!(!stopped.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(stopped.load(Ordering::SeqCst));
        assert_eq!(terminator.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_cancellation_is_contained() {
        let mut transport = MockCallTransport::new();
        transport
            .expect_stop_voice_call()
            .times(1)
            .returning(|_| Err(DomainError::Transport("peer gone".to_string())));

        let (terminator, worker) = AutoTerminator::start(Arc::new(transport));
        terminator.schedule(CallSessionId::new("S2")).unwrap();
        drop(terminator);

        // Worker drains the failing cancellation and exits cleanly
        tokio_test::assert_ok!(worker.await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_counts_from_worker_pickup() {
        let stopped = Arc::new(AtomicBool::new(false));
        let flag = stopped.clone();

        let mut transport = MockCallTransport::new();
        transport.expect_stop_voice_call().times(1).returning(move |_| {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });

        let (terminator, _worker) = AutoTerminator::start(Arc::new(transport));
        terminator.schedule(CallSessionId::new("S4")).unwrap();

        // The clock moves on before the worker gets to run
        tokio::time::advance(Duration::from_millis(100)).await;

        tokio::time::sleep(Duration::from_millis(4_950)).await;
        assert!(!stopped.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(stopped.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_gauge_follows_schedule_and_cancel() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let _guard = metrics::set_default_local_recorder(&recorder);

        let mut transport = MockCallTransport::new();
        transport.expect_stop_voice_call().times(2).returning(|_| Ok(()));

        let (terminator, _worker) = AutoTerminator::start(Arc::new(transport));
        terminator.schedule(CallSessionId::new("S5")).unwrap();
        terminator.schedule(CallSessionId::new("S6")).unwrap();
        assert!(handle.render().contains("ring_pending_cancellations 2"));

        tokio::time::sleep(RING_DURATION + Duration::from_millis(100)).await;
        let rendered = handle.render();
        assert!(rendered.contains("ring_pending_cancellations 0"), "{}", rendered);
        assert!(rendered.contains("ring_cancellations_total 2"), "{}", rendered);
    }

    #[tokio::test]
    async fn test_schedule_fails_when_worker_gone() {
        let transport = MockCallTransport::new();
        let (terminator, worker) = AutoTerminator::start(Arc::new(transport));
        worker.abort();
        let _ = worker.await;

        let result = terminator.schedule(CallSessionId::new("S3"));
        assert!(matches!(result, Err(DomainError::Internal(_))));
        assert_eq!(terminator.pending_count(), 0);
    }
}
