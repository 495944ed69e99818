//! # Message vocabulary exchanged with the cluster masters.
//!
//! Two directions, one enum each:
//! - [`MasterMessage`] — what the client sends to a coordinator;
//! - [`ClientMessage`] — what the client endpoint receives, from coordinators
//!   (registration acknowledgments, executor/worker events, failover
//!   notices) and from the local control plane (executor requests, stop, the
//!   internal retry-timer tick).
//!
//! Request/reply pairs carry a [`Reply`] resolver; everything else is
//! fire-and-forget. The vocabulary is semantic, not wire-exact: the transport
//! and serialization behind it are opaque.

use crate::rpc::{EndpointRef, Reply};

/// Well-known registration name of a master endpoint within its env.
pub const MASTER_ENDPOINT: &str = "master";

/// Well-known registration name of the client endpoint within its env.
pub const CLIENT_ENDPOINT: &str = "app-client";

/// What the driver tells the cluster about itself when registering.
#[derive(Clone, Debug)]
pub struct ApplicationDescriptor {
    /// Human-readable application name.
    pub name: String,
    /// Upper bound on total cores, `None` for unlimited.
    pub max_cores: Option<u32>,
    /// Memory per executor, in megabytes.
    pub memory_per_executor_mb: u32,
}

impl ApplicationDescriptor {
    /// Descriptor with unlimited cores and a 1 GiB executor footprint.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_cores: None,
            memory_per_executor_mb: 1024,
        }
    }
}

/// Lifecycle state of one executor, as reported by the cluster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutorState {
    Launching,
    Running,
    Killed,
    Failed,
    Lost,
    Exited,
}

impl ExecutorState {
    /// True for terminal states; a finished executor is reported to the
    /// listener as removed.
    pub fn is_finished(self) -> bool {
        !matches!(self, ExecutorState::Launching | ExecutorState::Running)
    }
}

/// Client → master messages.
#[derive(Debug)]
pub enum MasterMessage {
    /// Ask the master to accept this application; the master answers by
    /// sending [`ClientMessage::RegisteredApplication`] to `client`.
    RegisterApplication {
        /// The application being registered.
        descriptor: ApplicationDescriptor,
        /// Reply-to reference for the acknowledgment and later events.
        client: EndpointRef<ClientMessage>,
    },
    /// Resize the executor pool to a target total. Replies whether the
    /// request was acknowledged.
    RequestExecutors {
        /// Registered application id.
        app_id: String,
        /// Desired total executor count.
        total: u32,
        /// Resolved with the master's boolean answer.
        reply: Reply<bool>,
    },
    /// Terminate a named set of executors. Replies whether the request was
    /// acknowledged.
    KillExecutors {
        /// Registered application id.
        app_id: String,
        /// Executor ids to terminate.
        executor_ids: Vec<String>,
        /// Resolved with the master's boolean answer.
        reply: Reply<bool>,
    },
    /// Confirms that the client adopted a new master after failover.
    MasterChangeAcknowledged {
        /// Registered application id.
        app_id: String,
    },
    /// Best-effort goodbye sent on voluntary client stop.
    UnregisterApplication {
        /// Registered application id.
        app_id: String,
    },
}

/// Messages delivered to the client endpoint.
#[derive(Debug)]
pub enum ClientMessage {
    /// A master accepted the registration. First acknowledgment wins the
    /// session; a late one from another candidate is an accepted race, never
    /// fatal.
    RegisteredApplication {
        /// Cluster-assigned application id.
        app_id: String,
        /// The accepting master.
        master: EndpointRef<MasterMessage>,
    },
    /// The master removed the application. Terminal.
    ApplicationRemoved {
        /// Human-readable reason.
        reason: String,
    },
    /// An executor was allocated for this application.
    ExecutorAdded {
        /// Executor id, unique within the application.
        id: u32,
        /// Worker hosting the executor.
        worker_id: String,
        /// Host and port of the worker.
        host_port: String,
        /// Cores granted.
        cores: u32,
        /// Memory granted, in megabytes.
        memory_mb: u32,
    },
    /// An executor changed state; terminal states surface to the listener as
    /// removals.
    ExecutorUpdated {
        /// Executor id, unique within the application.
        id: u32,
        /// New state.
        state: ExecutorState,
        /// Optional diagnostic message.
        message: Option<String>,
        /// Process exit status, when known.
        exit_status: Option<i32>,
        /// True if the executor vanished because its worker was lost.
        worker_lost: bool,
    },
    /// A worker disappeared from the cluster.
    WorkerRemoved {
        /// Worker id.
        worker_id: String,
        /// Worker host.
        host: String,
        /// Human-readable reason.
        message: String,
    },
    /// A standby master took over; the client must adopt it and acknowledge.
    MasterChanged {
        /// The new active master.
        master: EndpointRef<MasterMessage>,
        /// The new master's web UI, informational.
        web_ui_url: String,
    },
    /// Local control plane: resize the executor pool via the active master.
    RequestExecutors {
        /// Desired total executor count.
        total: u32,
        /// Resolved with the downstream answer, or `false` when no master is
        /// active.
        reply: Reply<bool>,
    },
    /// Local control plane: kill the named executors via the active master.
    KillExecutors {
        /// Executor ids to terminate.
        executor_ids: Vec<String>,
        /// Resolved with the downstream answer, or `false` when no master is
        /// active.
        reply: Reply<bool>,
    },
    /// Local control plane: stop the client endpoint. Client-initiated only.
    Stop {
        /// Acknowledged with `true` once teardown is underway.
        reply: Reply<bool>,
    },
    /// Internal retry-timer tick for the given round; stale rounds are
    /// ignored.
    RegistrationTimeout {
        /// Round the firing timer belonged to.
        round: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished_states() {
        assert!(!ExecutorState::Launching.is_finished());
        assert!(!ExecutorState::Running.is_finished());
        for state in [
            ExecutorState::Killed,
            ExecutorState::Failed,
            ExecutorState::Lost,
            ExecutorState::Exited,
        ] {
            assert!(state.is_finished(), "{state:?} should be terminal");
        }
    }
}
