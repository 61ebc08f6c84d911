//! Bridging callback-signalled primitives into awaited outcomes.
//!
//! Maintenance primitives start synchronously but signal completion
//! asynchronously through a one-shot handle. [`await_completion`] turns
//! one such primitive into a single boolean outcome the batch runner can
//! await.

use std::time::Duration;

use anyhow::Result;
use tokio::sync::oneshot;
use tracing::warn;

/// One-shot completion signal handed to a maintenance primitive.
///
/// Firing consumes the handle, so a primitive cannot signal twice. A
/// handle dropped without firing resolves the waiting side as a failure.
#[derive(Debug)]
pub struct CompletionHandle {
    tx: oneshot::Sender<()>,
}

impl CompletionHandle {
    /// Signals that the primitive ran to completion.
    pub fn fire(self) {
        // The waiter may already be gone when a bound elapsed first.
        let _ = self.tx.send(());
    }
}

/// How a maintenance primitive responded to being started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The primitive started; it will fire the completion handle exactly
    /// once, eventually.
    Started,
    /// The store exposes no mechanism for this operation on this folder.
    /// Nothing was invoked and the handle will never fire.
    Unsupported,
}

/// Runs one callback-signalled primitive to a single boolean outcome.
///
/// `start` is called with a fresh [`CompletionHandle`]. It either reports
/// [`Dispatch::Unsupported`] without invoking anything, or starts the
/// primitive and returns [`Dispatch::Started`].
///
/// Resolves `true` only when the completion handle fires; completion is
/// taken as success without further verification. Resolves `false` when
/// no mechanism existed, when starting raised an error (contained here,
/// never propagated), when the handle was dropped unfired, or when
/// `bound` elapsed first. With `bound == None` a started primitive that
/// never signals is waited on indefinitely; only the batch runner's
/// deadline check between resources limits such a run.
pub async fn await_completion<F>(start: F, bound: Option<Duration>) -> bool
where
    F: FnOnce(CompletionHandle) -> Result<Dispatch>,
{
    let (tx, rx) = oneshot::channel();
    match start(CompletionHandle { tx }) {
        Ok(Dispatch::Started) => match bound {
            None => rx.await.is_ok(),
            Some(limit) => match tokio::time::timeout(limit, rx).await {
                Ok(signal) => signal.is_ok(),
                Err(_) => {
                    warn!(bound_secs = limit.as_secs(), "primitive exceeded its bound");
                    false
                }
            },
        },
        Ok(Dispatch::Unsupported) => false,
        Err(error) => {
            warn!(%error, "maintenance primitive failed to start");
            false
        }
    }
}
