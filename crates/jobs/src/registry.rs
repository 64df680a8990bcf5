//! Registry of live poll loops, one at most per [`JobKey`].
//!
//! [`PollRegistry`] owns every running loop: it enforces dedup-by-key
//! on start, offers idempotent per-key cancellation, and cancels
//! everything on [`shutdown`](PollRegistry::shutdown) when the owning
//! view is torn down. Cancelled loops are dropped silently; their
//! terminal callback never runs.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use lectern_gateway::GatewayError;

use crate::key::JobKey;
use crate::poller::{PollOutcome, PollTick, PollerConfig};

/// Registry of active poll loops.
///
/// Created once per lecture view and cheaply cloned (via `Arc`) into
/// the trackers that start loops on it.
pub struct PollRegistry {
    /// Live loops indexed by job key. Entries self-remove on exit,
    /// guarded by an epoch so a stale task never evicts a successor
    /// loop registered under the same key.
    loops: Mutex<HashMap<JobKey, LoopHandle>>,
    next_epoch: AtomicU64,
    /// Master cancellation token; cancelled on view teardown.
    shutdown: CancellationToken,
}

struct LoopHandle {
    epoch: u64,
    cancel: CancellationToken,
}

impl PollRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            loops: Mutex::new(HashMap::new()),
            next_epoch: AtomicU64::new(0),
            shutdown: CancellationToken::new(),
        })
    }

    /// Start a poll loop for `key`, unless one is already live.
    ///
    /// Returns `false` (a silent no-op) when `key` is already being
    /// polled -- duplicate starts are coalesced, never an error.
    ///
    /// `check` runs once per tick. A transport or HTTP error is logged
    /// and counted against the attempt budget like any other tick.
    /// When `check` reports a terminal result, or the budget runs out
    /// (synthesizing [`PollOutcome::TimedOut`]), `on_terminal` runs
    /// exactly once. Within one key, ticks are strictly sequential.
    pub async fn start<C, CF, T, TF>(
        self: &Arc<Self>,
        key: JobKey,
        config: PollerConfig,
        mut check: C,
        on_terminal: T,
    ) -> bool
    where
        C: FnMut() -> CF + Send + 'static,
        CF: Future<Output = Result<PollTick, GatewayError>> + Send + 'static,
        T: FnOnce(PollOutcome) -> TF + Send + 'static,
        TF: Future<Output = ()> + Send + 'static,
    {
        let mut loops = self.loops.lock().await;
        if loops.contains_key(&key) {
            tracing::debug!(key = %key, "Poll loop already active; start is a no-op");
            return false;
        }

        let epoch = self.next_epoch.fetch_add(1, Ordering::Relaxed);
        let cancel = self.shutdown.child_token();

        let registry = Arc::clone(self);
        let task_key = key.clone();
        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            let outcome = run_poll_loop(&task_key, config, &mut check, &task_cancel).await;
            match outcome {
                Some(outcome) => on_terminal(outcome).await,
                // Cancelled: silently dropped, no terminal callback.
                None => tracing::debug!(key = %task_key, "Poll loop cancelled"),
            }
            registry.remove_if_epoch(&task_key, epoch).await;
        });

        loops.insert(key, LoopHandle { epoch, cancel });
        true
    }

    /// Whether a loop is currently live for `key`.
    pub async fn is_active(&self, key: &JobKey) -> bool {
        self.loops.lock().await.contains_key(key)
    }

    /// Number of currently live loops.
    pub async fn active_count(&self) -> usize {
        self.loops.lock().await.len()
    }

    /// Stop the loop for `key`, if any. Idempotent.
    pub async fn stop(&self, key: &JobKey) {
        if let Some(handle) = self.loops.lock().await.remove(key) {
            tracing::debug!(key = %key, "Stopping poll loop");
            handle.cancel.cancel();
        }
    }

    /// Cancel every live loop. The view teardown hook: failing to call
    /// this leaks timers that keep firing network calls.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        let mut loops = self.loops.lock().await;
        let count = loops.len();
        loops.clear();
        if count > 0 {
            tracing::info!(count, "Poll registry shut down");
        }
    }

    /// Remove the entry for `key` if it still belongs to `epoch`.
    async fn remove_if_epoch(&self, key: &JobKey, epoch: u64) {
        let mut loops = self.loops.lock().await;
        if loops.get(key).is_some_and(|h| h.epoch == epoch) {
            loops.remove(key);
        }
    }
}

/// Tick-then-wait cycle for one key.
///
/// Returns the terminal outcome, or `None` when cancelled before one
/// was reached. The check for tick n+1 never starts before tick n's
/// result is processed.
async fn run_poll_loop<C, CF>(
    key: &JobKey,
    config: PollerConfig,
    check: &mut C,
    cancel: &CancellationToken,
) -> Option<PollOutcome>
where
    C: FnMut() -> CF + Send,
    CF: Future<Output = Result<PollTick, GatewayError>> + Send,
{
    let mut attempts = 0u32;

    loop {
        if attempts >= config.max_attempts {
            tracing::warn!(key = %key, attempts, "Poll attempt budget exhausted");
            return Some(PollOutcome::TimedOut);
        }
        attempts += 1;

        let tick = tokio::select! {
            _ = cancel.cancelled() => return None,
            result = check() => result,
        };

        match tick {
            Ok(PollTick::Terminal(outcome)) => {
                tracing::info!(key = %key, attempts, "Poll loop reached terminal status");
                return Some(outcome);
            }
            Ok(PollTick::Continue) => {}
            // Transient miss: no state change, counts toward the budget.
            Err(e) => {
                tracing::warn!(key = %key, attempt = attempts, error = %e, "Poll check failed");
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => return None,
            _ = tokio::time::sleep(config.interval) => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
