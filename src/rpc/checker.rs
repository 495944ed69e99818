//! # Existence-check service.
//!
//! A stateless, side-effect-free request/reply endpoint: given a name, it
//! answers whether a live endpoint with that name is registered in the local
//! env. It exists so that resolvers can validate a remote reference before
//! returning it to callers, and it doubles as the minimal conformance
//! exercise of the mailbox's request/reply contract.
//!
//! No retries, no state; transport failures propagate to the caller as-is.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::RpcError;
use crate::rpc::endpoint::{Endpoint, Reply};
use crate::rpc::env::Registry;
use crate::rpc::mailbox::EndpointRef;

/// Messages understood by the existence checker.
#[derive(Debug)]
pub enum CheckerMessage {
    /// Is an endpoint with this name registered here?
    CheckExistence {
        /// The queried endpoint name.
        name: String,
        /// Resolved with the boolean answer.
        reply: Reply<bool>,
    },
}

/// The per-env existence-check endpoint.
///
/// Registered automatically under
/// [`ENDPOINT_VERIFIER`](crate::ENDPOINT_VERIFIER) when an
/// [`RpcEnv`](crate::RpcEnv) is created.
pub struct ExistenceChecker {
    registry: Arc<Registry>,
}

impl ExistenceChecker {
    pub(crate) fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Endpoint for ExistenceChecker {
    type Msg = CheckerMessage;

    async fn receive(
        &mut self,
        msg: CheckerMessage,
        _ctx: &EndpointRef<CheckerMessage>,
    ) -> Result<(), RpcError> {
        match msg {
            CheckerMessage::CheckExistence { name, reply } => {
                reply.ok(self.registry.contains(&name).await);
                Ok(())
            }
        }
    }
}
