// SPDX-License-Identifier: MIT OR Apache-2.0

//! Namespace readiness signal.
//!
//! A remote source marks a namespace ready once its first full load has finished.
//! The source keeps the [`ReadyHandle`]; binders wait on cloned [`ReadySignal`]s.

use tokio::sync::watch;

/// Creates a connected readiness handle/signal pair, initially not ready.
///
/// # Examples
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (handle, signal) = hexbind::domain::readiness();
/// assert!(!signal.is_ready());
/// handle.mark_ready();
/// signal.wait().await;
/// assert!(signal.is_ready());
/// # }
/// ```
pub fn readiness() -> (ReadyHandle, ReadySignal) {
    let (tx, rx) = watch::channel(false);
    (ReadyHandle { tx }, ReadySignal { rx })
}

/// Producer side of a readiness signal.
#[derive(Debug)]
pub struct ReadyHandle {
    tx: watch::Sender<bool>,
}

impl ReadyHandle {
    /// Marks the namespace as initialized and wakes every waiter.
    pub fn mark_ready(&self) {
        self.tx.send_replace(true);
    }

    /// Returns a new waiter for this handle.
    pub fn signal(&self) -> ReadySignal {
        ReadySignal {
            rx: self.tx.subscribe(),
        }
    }
}

/// Waiter side of a readiness signal.
#[derive(Clone, Debug)]
pub struct ReadySignal {
    rx: watch::Receiver<bool>,
}

impl ReadySignal {
    /// Returns `true` once the namespace has been marked ready.
    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }

    /// Waits until the namespace is marked ready.
    ///
    /// If the handle is dropped without ever marking the namespace ready, this
    /// never completes; callers bound it with a timeout.
    pub async fn wait(&self) {
        let mut rx = self.rx.clone();
        let closed = rx.wait_for(|ready| *ready).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_completes_after_mark() {
        let (handle, signal) = readiness();
        let waiter = tokio::spawn({
            let signal = signal.clone();
            async move { signal.wait().await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.mark_ready();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert!(signal.is_ready());
    }

    #[tokio::test]
    async fn test_dropped_handle_never_ready() {
        let (handle, signal) = readiness();
        drop(handle);
        let result = tokio::time::timeout(Duration::from_millis(20), signal.wait()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_signal_from_handle_sees_state() {
        let (handle, _) = readiness();
        handle.mark_ready();
        assert!(handle.signal().is_ready());
    }
}
