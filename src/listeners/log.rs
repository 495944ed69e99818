//! # Tracing-backed reference listener.
//!
//! [`LogListener`] emits every callback as a `tracing` event. Primarily
//! useful for development, demos, and as a skeleton for custom listeners —
//! production embedders usually implement [`ClientListener`] themselves.

use async_trait::async_trait;
use tracing::{info, warn};

use super::listener::ClientListener;

/// Logs every session callback. Enabled via the `logging` feature.
pub struct LogListener;

#[async_trait]
impl ClientListener for LogListener {
    async fn connected(&self, app_id: &str) {
        info!(app_id, "connected to master");
    }

    async fn disconnected(&self) {
        warn!("master connection lost, waiting for reconnection");
    }

    async fn dead(&self, reason: &str) {
        warn!(reason, "application is dead");
    }

    async fn executor_added(
        &self,
        full_id: &str,
        worker_id: &str,
        host_port: &str,
        cores: u32,
        memory_mb: u32,
    ) {
        info!(full_id, worker_id, host_port, cores, memory_mb, "executor added");
    }

    async fn executor_removed(
        &self,
        full_id: &str,
        message: Option<&str>,
        exit_status: Option<i32>,
        worker_lost: bool,
    ) {
        info!(full_id, message, exit_status, worker_lost, "executor removed");
    }

    async fn worker_removed(&self, worker_id: &str, host: &str, message: &str) {
        info!(worker_id, host, message, "worker removed");
    }
}
