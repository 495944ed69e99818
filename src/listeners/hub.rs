//! # ListenerHub: non-blocking callback fan-out.
//!
//! The mailbox task must never await a listener: callbacks may be slow, may
//! re-enter the client, or may panic. The hub decouples them behind a bounded
//! queue drained by one dedicated worker task.
//!
//! ## What it guarantees
//! - `emit` returns immediately (try-send).
//! - Callbacks run in emission order, one at a time.
//! - A panicking listener is caught and logged; later callbacks still run.
//! - Events buffered at shutdown are still delivered: the worker drains the
//!   queue after the last hub handle is dropped, so a terminal `dead` always
//!   reaches the listener.
//!
//! ## What it does not guarantee
//! - Delivery under overflow: a full queue drops the callback with a warning.

use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;
use tracing::warn;

use super::listener::ClientListener;

/// One callback, queued for the fan-out worker.
#[derive(Debug)]
pub(crate) enum ListenerEvent {
    Connected {
        app_id: String,
    },
    Disconnected,
    Dead {
        reason: String,
    },
    ExecutorAdded {
        full_id: String,
        worker_id: String,
        host_port: String,
        cores: u32,
        memory_mb: u32,
    },
    ExecutorRemoved {
        full_id: String,
        message: Option<String>,
        exit_status: Option<i32>,
        worker_lost: bool,
    },
    WorkerRemoved {
        worker_id: String,
        host: String,
        message: String,
    },
}

impl ListenerEvent {
    fn label(&self) -> &'static str {
        match self {
            ListenerEvent::Connected { .. } => "connected",
            ListenerEvent::Disconnected => "disconnected",
            ListenerEvent::Dead { .. } => "dead",
            ListenerEvent::ExecutorAdded { .. } => "executor_added",
            ListenerEvent::ExecutorRemoved { .. } => "executor_removed",
            ListenerEvent::WorkerRemoved { .. } => "worker_removed",
        }
    }
}

/// Clonable emitter feeding the fan-out worker.
#[derive(Clone)]
pub(crate) struct ListenerHub {
    tx: mpsc::Sender<ListenerEvent>,
}

impl ListenerHub {
    /// Spawns the worker for `listener` with the given queue capacity.
    pub(crate) fn new(listener: Arc<dyn ClientListener>, capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<ListenerEvent>(capacity.max(1));

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let fut = dispatch(listener.as_ref(), event);
                if let Err(panic) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                    warn!(?panic, "listener panicked while handling a callback");
                }
            }
        });

        Self { tx }
    }

    /// Queues one callback without blocking; overflow drops it with a warning.
    pub(crate) fn emit(&self, event: ListenerEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(event)) => {
                warn!(event = event.label(), "listener queue full, callback dropped");
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                warn!(event = event.label(), "listener worker gone, callback dropped");
            }
        }
    }
}

async fn dispatch(listener: &dyn ClientListener, event: ListenerEvent) {
    match event {
        ListenerEvent::Connected { app_id } => listener.connected(&app_id).await,
        ListenerEvent::Disconnected => listener.disconnected().await,
        ListenerEvent::Dead { reason } => listener.dead(&reason).await,
        ListenerEvent::ExecutorAdded {
            full_id,
            worker_id,
            host_port,
            cores,
            memory_mb,
        } => {
            listener
                .executor_added(&full_id, &worker_id, &host_port, cores, memory_mb)
                .await
        }
        ListenerEvent::ExecutorRemoved {
            full_id,
            message,
            exit_status,
            worker_lost,
        } => {
            listener
                .executor_removed(&full_id, message.as_deref(), exit_status, worker_lost)
                .await
        }
        ListenerEvent::WorkerRemoved {
            worker_id,
            host,
            message,
        } => listener.worker_removed(&worker_id, &host, &message).await,
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::mpsc::UnboundedSender;

    use super::*;

    struct Recorder {
        tx: UnboundedSender<String>,
        panic_on_connected: bool,
    }

    #[async_trait]
    impl ClientListener for Recorder {
        async fn connected(&self, app_id: &str) {
            if self.panic_on_connected {
                panic!("listener bug");
            }
            let _ = self.tx.send(format!("connected:{app_id}"));
        }

        async fn disconnected(&self) {
            let _ = self.tx.send("disconnected".into());
        }

        async fn dead(&self, reason: &str) {
            let _ = self.tx.send(format!("dead:{reason}"));
        }
    }

    #[tokio::test]
    async fn test_callbacks_run_in_emission_order() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let hub = ListenerHub::new(
            Arc::new(Recorder {
                tx,
                panic_on_connected: false,
            }),
            16,
        );

        hub.emit(ListenerEvent::Connected {
            app_id: "app-1".into(),
        });
        hub.emit(ListenerEvent::Disconnected);
        hub.emit(ListenerEvent::Dead {
            reason: "done".into(),
        });

        assert_eq!(rx.recv().await.unwrap(), "connected:app-1");
        assert_eq!(rx.recv().await.unwrap(), "disconnected");
        assert_eq!(rx.recv().await.unwrap(), "dead:done");
    }

    #[tokio::test]
    async fn test_panicking_listener_does_not_kill_the_worker() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let hub = ListenerHub::new(
            Arc::new(Recorder {
                tx,
                panic_on_connected: true,
            }),
            16,
        );

        hub.emit(ListenerEvent::Connected {
            app_id: "app-1".into(),
        });
        hub.emit(ListenerEvent::Dead {
            reason: "still alive".into(),
        });

        assert_eq!(rx.recv().await.unwrap(), "dead:still alive");
    }
}
