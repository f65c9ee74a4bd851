//! Shutdown Coordination
//!
//! Two layers live here:
//!
//! - [`CancellationToken`] is the thread-level primitive. Background loops
//!   wait on it between firings and blocking operations give up when it
//!   is cancelled.
//! - [`ShutdownCoordinator`] is the process-level layer. It installs OS
//!   signal handlers on the tokio runtime, broadcasts the shutdown to async
//!   listeners and cancels its token so the worker threads stop too.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::broadcast;

#[derive(Debug, Default)]
struct TokenState {
    cancelled: Mutex<bool>,
    condvar: Condvar,
    // Lock-free mirror of `cancelled` for hot-path checks
    flag: AtomicBool,
}

/// Cloneable cancellation flag that threads can block on
///
/// All clones share the same state; cancelling one cancels them all.
/// Cancellation is permanent.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    state: Arc<TokenState>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the token and wake every thread waiting on it
    pub fn cancel(&self) {
        // The guarded value is a plain bool, so a poisoned lock is still usable
        let mut cancelled = self
            .state
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *cancelled = true;
        self.state.flag.store(true, Ordering::Release);
        drop(cancelled);
        self.state.condvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.flag.load(Ordering::Acquire)
    }

    /// Sleep for `timeout` unless cancelled first
    ///
    /// Returns `true` if the token was cancelled, `false` if the full
    /// timeout elapsed. The deadline is absolute, so spurious wakeups do
    /// not stretch the wait.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            self.wait();
            return true;
        };
        let mut cancelled = self
            .state
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        while !*cancelled {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _) = self
                .state
                .condvar
                .wait_timeout(cancelled, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            cancelled = guard;
        }

        true
    }

    /// Block until the token is cancelled
    pub fn wait(&self) {
        let mut cancelled = self
            .state
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        while !*cancelled {
            cancelled = self
                .state
                .condvar
                .wait(cancelled)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

/// Coordinates graceful shutdown across the application
pub struct ShutdownCoordinator {
    pub shutdown_tx: broadcast::Sender<()>,
    pub shutdown_requested: Arc<AtomicBool>,
    token: CancellationToken,
}

impl ShutdownCoordinator {
    /// Create a new shutdown coordinator
    pub fn new() -> (Self, broadcast::Receiver<()>) {
        // Use a larger channel to avoid dropping bursts of shutdown signals
        let (shutdown_tx, shutdown_rx) = broadcast::channel(8);
        let shutdown_requested = Arc::new(AtomicBool::new(false));

        let coordinator = Self {
            shutdown_tx,
            shutdown_requested,
            token: CancellationToken::new(),
        };

        (coordinator, shutdown_rx)
    }

    /// Subscribe to shutdown notifications
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Token cancelled together with the coordinator, for worker threads
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Trigger shutdown
    pub fn trigger_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::Release);
        self.token.cancel();
        let _ = self.shutdown_tx.send(());
    }

    /// Check if shutdown has been requested
    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::Acquire)
    }

    /// Guard execution of a future with shutdown coordination
    ///
    /// Installs signal handlers, then hands the coordinator and a shutdown
    /// receiver to the closure.
    pub async fn guard_with_coordinator<F, Fut, R, E>(future_fn: F) -> Result<R, E>
    where
        F: FnOnce(Self, broadcast::Receiver<()>) -> Fut,
        Fut: std::future::Future<Output = Result<R, E>>,
    {
        let (coordinator, shutdown_rx) = Self::new();

        setup_signal_handlers(
            coordinator.shutdown_tx.clone(),
            coordinator.shutdown_requested.clone(),
            coordinator.token.clone(),
        );

        future_fn(coordinator, shutdown_rx).await
    }
}

/// Set up signal handlers for graceful shutdown
fn setup_signal_handlers(
    shutdown_tx: broadcast::Sender<()>,
    shutdown_requested: Arc<AtomicBool>,
    token: CancellationToken,
) {
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }

        use std::sync::atomic::AtomicUsize;
        use tokio::signal::unix::{signal, SignalKind};
        let signal_count = Arc::new(AtomicUsize::new(0));
        let signals = [
            SignalKind::interrupt(),
            SignalKind::terminate(),
            SignalKind::hangup(),
            SignalKind::quit(),
        ];

        for kind in signals {
            let tx = shutdown_tx.clone();
            let requested = shutdown_requested.clone();
            let sig_ctr = signal_count.clone();
            let token = token.clone();

            tokio::spawn(async move {
                if let Ok(mut sig) = signal(kind) {
                    // Second signal forces exit; first one breaks out to avoid a busy loop
                    #[allow(clippy::never_loop)]
                    while sig.recv().await.is_some() {
                        let prev = sig_ctr.fetch_add(1, Ordering::AcqRel);
                        requested.store(true, Ordering::Release);
                        token.cancel();
                        let _ = tx.send(());
                        if prev >= 1 {
                            log::warn!("Second shutdown signal received; exiting");
                            std::process::exit(130);
                        }
                        break;
                    }
                }
            });
        }
    }

    #[cfg(not(unix))]
    {
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown_requested.store(true, Ordering::Release);
                token.cancel();
                let _ = shutdown_tx.send(());
            }
        });
    }
}
