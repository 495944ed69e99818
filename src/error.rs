//! Error types used by the RPC layer and the application client.
//!
//! This module defines two main error enums:
//!
//! - [`RpcError`] — failures of the messaging substrate: unreachable peers,
//!   stopped endpoints, abandoned or timed-out calls.
//! - [`ClientError`] — failures of the [`AppClient`](crate::AppClient)
//!   lifecycle itself.
//!
//! Both types provide `as_label` helpers producing short stable strings for
//! logs and metrics. [`RpcError::is_canceled`] distinguishes an abandoned
//! call (the callee dropped the [`Reply`](crate::Reply) without resolving it,
//! typically during shutdown) from a genuine failure.

use std::time::Duration;

use thiserror::Error;

use crate::rpc::Address;

/// # Errors produced by the messaging substrate.
///
/// Transport-transient variants (`Unreachable`, `Timeout`) are retried only
/// by the registration round machinery; forwarded per-call requests surface
/// them to the caller as-is.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RpcError {
    /// No process is reachable at the given address.
    #[error("{address} is unreachable")]
    Unreachable {
        /// The address that could not be contacted.
        address: Address,
    },

    /// The address is reachable but hosts no endpoint with this name.
    #[error("no endpoint named {name:?} at {address}")]
    NotFound {
        /// The requested endpoint name.
        name: String,
        /// The address that was queried.
        address: Address,
    },

    /// An endpoint with this name already exists in the local registry.
    #[error("an endpoint named {name:?} is already registered")]
    AlreadyRegistered {
        /// The contested endpoint name.
        name: String,
    },

    /// The target endpoint has stopped; its mailbox no longer accepts messages.
    #[error("endpoint {name:?} is stopped")]
    EndpointStopped {
        /// Name of the stopped endpoint.
        name: String,
    },

    /// A request/reply call did not complete within the allotted time.
    #[error("call timed out after {elapsed:?}")]
    Timeout {
        /// How long the caller waited.
        elapsed: Duration,
    },

    /// The callee dropped the pending call without resolving it.
    ///
    /// Distinct from failure: this is the shutdown/abandonment signal and is
    /// silently dropped by forwarding code rather than relayed as an error.
    #[error("call dropped before a reply was sent")]
    Canceled,

    /// The remote handler resolved the call with an application-level failure.
    #[error("handler failed: {reason}")]
    Handler {
        /// Failure description supplied by the handler.
        reason: String,
    },

    /// An address string could not be parsed as `host:port`.
    #[error("invalid address {input:?}, expected host:port")]
    InvalidAddress {
        /// The rejected input.
        input: String,
    },
}

impl RpcError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RpcError::Unreachable { .. } => "rpc_unreachable",
            RpcError::NotFound { .. } => "rpc_not_found",
            RpcError::AlreadyRegistered { .. } => "rpc_already_registered",
            RpcError::EndpointStopped { .. } => "rpc_endpoint_stopped",
            RpcError::Timeout { .. } => "rpc_timeout",
            RpcError::Canceled => "rpc_canceled",
            RpcError::Handler { .. } => "rpc_handler_failure",
            RpcError::InvalidAddress { .. } => "rpc_invalid_address",
        }
    }

    /// True if this is the abandonment signal rather than a genuine failure.
    pub fn is_canceled(&self) -> bool {
        matches!(self, RpcError::Canceled)
    }
}

/// # Errors produced by the [`AppClient`](crate::AppClient) lifecycle.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ClientError {
    /// `start()` was called on a client that is already running or was stopped.
    #[error("client already started")]
    AlreadyStarted,

    /// The client endpoint could not be brought up; the session is dead on
    /// arrival and the failure is not retried.
    #[error("client failed to start: {reason}")]
    StartFailed {
        /// Why startup failed.
        reason: String,
    },

    /// An underlying RPC failure.
    #[error(transparent)]
    Rpc(#[from] RpcError),
}

impl ClientError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ClientError::AlreadyStarted => "client_already_started",
            ClientError::StartFailed { .. } => "client_start_failed",
            ClientError::Rpc(e) => e.as_label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        let timeout = RpcError::Timeout {
            elapsed: Duration::from_secs(10),
        };
        assert_eq!(timeout.as_label(), "rpc_timeout");
        assert!(!timeout.is_canceled());
        assert!(RpcError::Canceled.is_canceled());
        assert_eq!(
            ClientError::from(RpcError::Canceled).as_label(),
            "rpc_canceled"
        );
    }

    #[test]
    fn test_timeout_reports_elapsed() {
        let timeout = RpcError::Timeout {
            elapsed: Duration::from_secs(10),
        };
        assert_eq!(timeout.to_string(), "call timed out after 10s");
    }
}
