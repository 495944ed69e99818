//! # RpcEnv: the per-process endpoint registry.
//!
//! An [`RpcEnv`] models one process in the cluster: a logical [`Address`]
//! plus a registry of named, live endpoints. Registering an endpoint spawns
//! its mailbox task; the task removes its own entry when it stops, so the
//! registry always reflects liveness.
//!
//! Every env hosts an [`ExistenceChecker`](crate::ExistenceChecker) under
//! [`ENDPOINT_VERIFIER`]; [`RpcEnv::verify`] goes through that endpoint's
//! normal ask path, which is exactly how resolvers validate a remote
//! reference before handing it out.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::RpcError;
use crate::rpc::checker::{CheckerMessage, ExistenceChecker};
use crate::rpc::endpoint::Endpoint;
use crate::rpc::mailbox::{self, EndpointRef};
use crate::rpc::Address;

/// Well-known name of the existence-check endpoint present in every env.
pub const ENDPOINT_VERIFIER: &str = "endpoint-verifier";

/// One registry entry: the type-erased handle plus a type-erased stop hook.
struct Entry {
    handle: Arc<dyn Any + Send + Sync>,
    stop: Box<dyn Fn() + Send + Sync>,
}

/// Name → live endpoint map shared between the env and its mailbox tasks.
#[derive(Default)]
pub(crate) struct Registry {
    entries: RwLock<HashMap<String, Entry>>,
}

impl Registry {
    pub(crate) async fn contains(&self, name: &str) -> bool {
        self.entries.read().await.contains_key(name)
    }

    pub(crate) async fn lookup<M: Send + 'static>(&self, name: &str) -> Option<EndpointRef<M>> {
        self.entries
            .read()
            .await
            .get(name)
            .and_then(|entry| entry.handle.downcast_ref::<EndpointRef<M>>())
            .cloned()
    }

    /// Removes the entry only if it still points at this mailbox; a same-name
    /// endpoint registered after this one stopped is left alone.
    pub(crate) async fn remove_matching<M: Send + 'static>(
        &self,
        name: &str,
        handle: &EndpointRef<M>,
    ) {
        let mut entries = self.entries.write().await;
        let matches = entries
            .get(name)
            .and_then(|entry| entry.handle.downcast_ref::<EndpointRef<M>>())
            .is_some_and(|existing| existing.same_channel(handle));
        if matches {
            entries.remove(name);
        }
    }
}

struct EnvInner {
    address: Address,
    registry: Arc<Registry>,
}

/// Handle to one process's endpoint registry. Cheap to clone.
#[derive(Clone)]
pub struct RpcEnv {
    inner: Arc<EnvInner>,
}

impl RpcEnv {
    /// Creates an env at the given address and brings up its existence
    /// checker. Must be called from within a tokio runtime.
    pub async fn new(address: Address) -> Self {
        let registry = Arc::new(Registry::default());
        let env = Self {
            inner: Arc::new(EnvInner { address, registry }),
        };
        let checker = ExistenceChecker::new(Arc::clone(&env.inner.registry));
        env.register(ENDPOINT_VERIFIER, checker)
            .await
            .unwrap_or_else(|_| unreachable!("fresh registry cannot hold {ENDPOINT_VERIFIER}"));
        env
    }

    /// This env's logical address.
    pub fn address(&self) -> &Address {
        &self.inner.address
    }

    /// Registers `endpoint` under `name` and spawns its mailbox.
    ///
    /// Fails with [`RpcError::AlreadyRegistered`] if the name is taken.
    pub async fn register<E: Endpoint>(
        &self,
        name: &str,
        endpoint: E,
    ) -> Result<EndpointRef<E::Msg>, RpcError> {
        let mut entries = self.inner.registry.entries.write().await;
        if entries.contains_key(name) {
            return Err(RpcError::AlreadyRegistered {
                name: name.to_string(),
            });
        }

        let handle = mailbox::spawn(
            Arc::clone(&self.inner.registry),
            self.inner.address.clone(),
            Arc::from(name),
            endpoint,
        );
        let stopper = handle.clone();
        entries.insert(
            name.to_string(),
            Entry {
                handle: Arc::new(handle.clone()),
                stop: Box::new(move || stopper.stop()),
            },
        );
        Ok(handle)
    }

    /// Looks up a live endpoint by name and message type.
    pub async fn lookup<M: Send + 'static>(&self, name: &str) -> Option<EndpointRef<M>> {
        self.inner.registry.lookup(name).await
    }

    /// Asks this env's existence checker whether `name` is registered here.
    pub async fn verify(&self, name: &str) -> Result<bool, RpcError> {
        let checker: EndpointRef<CheckerMessage> =
            self.lookup(ENDPOINT_VERIFIER)
                .await
                .ok_or_else(|| RpcError::NotFound {
                    name: ENDPOINT_VERIFIER.to_string(),
                    address: self.inner.address.clone(),
                })?;
        checker
            .ask(|reply| CheckerMessage::CheckExistence {
                name: name.to_string(),
                reply,
            })
            .await
    }

    /// Requests every registered endpoint (the checker included) to stop.
    pub async fn shutdown(&self) {
        let entries = self.inner.registry.entries.read().await;
        for entry in entries.values() {
            (entry.stop)();
        }
    }
}
