//! Background request execution with callback completion.
//!
//! Every dispatched request runs as its own tokio task. The caller's
//! callback is invoked exactly once: with the response, with the error, or
//! with [`NetworkError::Cancelled`] if the [`RequestHandle`] was cancelled
//! first. There is no ordering between separate requests.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::oneshot;

use super::response::ApiResponse;
use crate::error::{NetworkError, Result};

/// Unique identifier for a dispatched request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl RequestId {
    fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw id value.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// A handle to a pending request that can be cancelled.
#[derive(Clone, Debug)]
pub struct RequestHandle {
    /// The unique ID of this request.
    pub id: RequestId,
    cancel_tx: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl RequestHandle {
    /// Cancel the pending request.
    ///
    /// Returns `true` if the cancellation signal was sent, `false` if the
    /// request has already completed or was already cancelled.
    pub fn cancel(&self) -> bool {
        if let Some(tx) = self.cancel_tx.lock().take() {
            tx.send(()).is_ok()
        } else {
            false
        }
    }

    /// Check if the request is still pending.
    pub fn is_pending(&self) -> bool {
        self.cancel_tx.lock().is_some()
    }

    fn finish(&self) {
        self.cancel_tx.lock().take();
    }
}

/// Run `request` in the background and hand its outcome to `on_complete`.
pub(crate) fn spawn_request<Fut, F>(request: Fut, on_complete: F) -> RequestHandle
where
    Fut: Future<Output = Result<ApiResponse>> + Send + 'static,
    F: FnOnce(Result<ApiResponse>) + Send + 'static,
{
    let id = RequestId::new();
    let (cancel_tx, cancel_rx) = oneshot::channel();
    let handle = RequestHandle {
        id,
        cancel_tx: Arc::new(Mutex::new(Some(cancel_tx))),
    };
    let pending = handle.clone();

    runtime::spawn_detached(async move {
        let outcome = tokio::select! {
            result = request => result,
            _ = cancel_rx => {
                tracing::warn!(target: "courier_net::dispatch", "Request {:?} was cancelled", id);
                Err(NetworkError::Cancelled)
            }
        };
        pending.finish();
        on_complete(outcome);
    });

    handle
}

/// Where dispatched requests run.
///
/// The caller's tokio runtime when there is one, otherwise a small shared
/// runtime created on first use, so plain threads (such as a mobile UI
/// thread) can dispatch too.
mod runtime {
    use std::future::Future;
    use std::sync::OnceLock;

    use tokio::runtime::{Handle, Runtime};

    static SHARED: OnceLock<Runtime> = OnceLock::new();

    fn shared() -> &'static Runtime {
        SHARED.get_or_init(|| {
            tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .thread_name("courier-net")
                .enable_all()
                .build()
                .expect("Failed to create tokio runtime")
        })
    }

    pub(super) fn spawn_detached<F>(future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match Handle::try_current() {
            Ok(handle) => drop(handle.spawn(future)),
            Err(_) => {
                tracing::debug!(target: "courier_net::dispatch", "No ambient runtime, using the shared one");
                drop(shared().spawn(future));
            }
        }
    }
}
