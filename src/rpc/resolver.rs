//! # Master resolution seam.
//!
//! [`ResolveMaster`] is the boundary between the client and the addressing /
//! lookup mechanism: given a candidate [`Address`], produce a validated
//! reference to the master endpoint hosted there. Registration attempt tasks
//! call it once per candidate per round; failures are logged by the caller
//! and never fail the round.
//!
//! [`StaticResolver`] is the in-process implementation used by tests and
//! embedded deployments: a fixed map of address → [`RpcEnv`], validating each
//! reference through the target env's existence checker before handing it
//! out.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::RpcError;
use crate::protocol::{MasterMessage, MASTER_ENDPOINT};
use crate::rpc::env::RpcEnv;
use crate::rpc::mailbox::EndpointRef;
use crate::rpc::Address;

/// Resolves a candidate address to a live master reference.
#[async_trait]
pub trait ResolveMaster: Send + Sync + 'static {
    /// Returns a reference to the master endpoint at `address`.
    ///
    /// Errors are transport-transient from the round's point of view:
    /// [`RpcError::Unreachable`] when nothing answers at the address,
    /// [`RpcError::NotFound`] when the process is up but hosts no master.
    async fn resolve(&self, address: &Address) -> Result<EndpointRef<MasterMessage>, RpcError>;
}

/// Fixed in-process address book over local [`RpcEnv`]s.
///
/// An address missing from the map behaves as an unreachable host.
pub struct StaticResolver {
    envs: HashMap<Address, RpcEnv>,
}

impl StaticResolver {
    /// Builds a resolver over the given envs, keyed by their addresses.
    pub fn new(envs: impl IntoIterator<Item = RpcEnv>) -> Self {
        Self {
            envs: envs
                .into_iter()
                .map(|env| (env.address().clone(), env))
                .collect(),
        }
    }
}

#[async_trait]
impl ResolveMaster for StaticResolver {
    async fn resolve(&self, address: &Address) -> Result<EndpointRef<MasterMessage>, RpcError> {
        let env = self.envs.get(address).ok_or_else(|| RpcError::Unreachable {
            address: address.clone(),
        })?;

        // Validate through the remote existence checker before returning the
        // reference, the same ask path a remote transport would use.
        let not_found = || RpcError::NotFound {
            name: MASTER_ENDPOINT.to_string(),
            address: address.clone(),
        };
        if !env.verify(MASTER_ENDPOINT).await? {
            return Err(not_found());
        }
        env.lookup(MASTER_ENDPOINT).await.ok_or_else(not_found)
    }
}
