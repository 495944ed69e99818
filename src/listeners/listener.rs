//! # Owning-process callback trait.
//!
//! `ClientListener` is how the embedding driver observes the session. The
//! client invokes callbacks from a dedicated fan-out worker
//! ([`ListenerHub`](super::hub::ListenerHub)), never from the mailbox task,
//! so implementations may call back into the client (e.g. `stop()` from
//! `dead`) without deadlocking.
//!
//! ## Contract
//! - `connected` fires once per accepted registration acknowledgment.
//! - `disconnected` fires once per disconnection episode; a `MasterChanged`
//!   failover opens a new episode.
//! - `dead` fires exactly once, and only for protocol-fatal conditions
//!   (retry budget exhausted, application removed).
//! - Informational events are forwarded as received, duplicates included.

use async_trait::async_trait;

/// Contract for session lifecycle callbacks.
///
/// Executor/worker notifications default to no-ops; state-transition
/// callbacks must be provided.
#[async_trait]
pub trait ClientListener: Send + Sync + 'static {
    /// Registration succeeded; the session owns `app_id` from now on.
    async fn connected(&self, app_id: &str);

    /// The link to the active master was lost; a standby may still take over.
    async fn disconnected(&self);

    /// The session is irrecoverably over.
    async fn dead(&self, reason: &str);

    /// An executor was granted. `full_id` is `app_id/executor_id`.
    async fn executor_added(
        &self,
        full_id: &str,
        worker_id: &str,
        host_port: &str,
        cores: u32,
        memory_mb: u32,
    ) {
        let _ = (full_id, worker_id, host_port, cores, memory_mb);
    }

    /// An executor reached a terminal state.
    async fn executor_removed(
        &self,
        full_id: &str,
        message: Option<&str>,
        exit_status: Option<i32>,
        worker_lost: bool,
    ) {
        let _ = (full_id, message, exit_status, worker_lost);
    }

    /// A worker disappeared from the cluster.
    async fn worker_removed(&self, worker_id: &str, host: &str, message: &str) {
        let _ = (worker_id, host, message);
    }
}
