//! # Mailbox: serialized delivery loop and endpoint handles.
//!
//! One task per endpoint owns the endpoint value and drains its queue,
//! delivering items strictly one at a time. Everything else holds an
//! [`EndpointRef`] — a cheap clonable handle that can send, ask, stop, or
//! inject transport notifications.
//!
//! ## Delivery rules
//! - In-order per sender, never concurrent with itself.
//! - `Stop` closes the queue, already-buffered messages are still delivered
//!   (drain), then `on_stop` runs exactly once.
//! - A handler error tears the endpoint down: `on_stop` runs immediately,
//!   buffered messages are discarded.
//! - After the loop exits the endpoint deregisters itself from the local
//!   registry, so existence checks observe the stop.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::warn;

use crate::error::RpcError;
use crate::rpc::endpoint::{Endpoint, Reply};
use crate::rpc::env::Registry;
use crate::rpc::Address;

/// One item in an endpoint's queue: a protocol message or a transport event.
pub(crate) enum Inbound<M> {
    Message(M),
    Disconnected(Address),
    NetworkError(RpcError, Address),
    Stop,
}

/// Handle to a live endpoint's mailbox.
///
/// Clones share the same queue. Sending to a stopped endpoint fails with
/// [`RpcError::EndpointStopped`].
pub struct EndpointRef<M> {
    name: Arc<str>,
    address: Address,
    tx: mpsc::UnboundedSender<Inbound<M>>,
}

impl<M> Clone for EndpointRef<M> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            address: self.address.clone(),
            tx: self.tx.clone(),
        }
    }
}

impl<M> std::fmt::Debug for EndpointRef<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EndpointRef({}@{})", self.name, self.address)
    }
}

impl<M: Send + 'static> EndpointRef<M> {
    /// Name the endpoint is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Address of the env hosting the endpoint.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Fire-and-forget send.
    pub fn send(&self, msg: M) -> Result<(), RpcError> {
        self.post(Inbound::Message(msg))
    }

    /// Request/reply call: builds the message around a fresh [`Reply`] and
    /// waits for the handler to resolve it.
    ///
    /// Returns [`RpcError::Canceled`] if the call is abandoned (the reply was
    /// dropped unresolved, e.g. because the callee shut down).
    pub async fn ask<T, F>(&self, build: F) -> Result<T, RpcError>
    where
        T: Send + 'static,
        F: FnOnce(Reply<T>) -> M,
    {
        let (reply, rx) = Reply::channel();
        self.post(Inbound::Message(build(reply)))?;
        rx.await.map_err(|_| RpcError::Canceled)?
    }

    /// Asks the endpoint to stop: its queue is closed, buffered messages are
    /// drained, then `on_stop` runs. Idempotent.
    pub fn stop(&self) {
        let _ = self.post(Inbound::Stop);
    }

    /// Injects a transport-level "peer unreachable" observation.
    pub fn notify_disconnected(&self, remote: Address) {
        let _ = self.post(Inbound::Disconnected(remote));
    }

    /// Injects a transport-level link error observation.
    pub fn notify_network_error(&self, error: RpcError, remote: Address) {
        let _ = self.post(Inbound::NetworkError(error, remote));
    }

    pub(crate) fn same_channel(&self, other: &Self) -> bool {
        self.tx.same_channel(&other.tx)
    }

    fn post(&self, inbound: Inbound<M>) -> Result<(), RpcError> {
        self.tx
            .send(inbound)
            .map_err(|_| RpcError::EndpointStopped {
                name: self.name.to_string(),
            })
    }
}

/// Spawns the delivery loop for `endpoint` and returns its handle.
///
/// The loop owns the endpoint value; when it exits (stop request, drained
/// queue after stop, or handler error) it runs `on_stop` and removes the
/// registry entry if it still points at this mailbox.
pub(crate) fn spawn<E: Endpoint>(
    registry: Arc<Registry>,
    address: Address,
    name: Arc<str>,
    mut endpoint: E,
) -> EndpointRef<E::Msg> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = EndpointRef { name, address, tx };
    let ctx = handle.clone();

    tokio::spawn(async move {
        match endpoint.on_start(&ctx).await {
            Ok(()) => {
                while let Some(inbound) = rx.recv().await {
                    match inbound {
                        Inbound::Stop => {
                            // Stop delivery of anything sent from now on, but
                            // drain what is already buffered.
                            rx.close();
                        }
                        Inbound::Message(msg) => {
                            if let Err(error) = endpoint.receive(msg, &ctx).await {
                                warn!(
                                    endpoint = ctx.name(),
                                    error = %error,
                                    "handler failed, stopping endpoint"
                                );
                                break;
                            }
                        }
                        Inbound::Disconnected(remote) => {
                            endpoint.on_disconnected(&remote).await;
                        }
                        Inbound::NetworkError(error, remote) => {
                            endpoint.on_network_error(&error, &remote).await;
                        }
                    }
                }
            }
            Err(error) => {
                warn!(endpoint = ctx.name(), error = %error, "endpoint failed to start");
            }
        }

        endpoint.on_stop().await;
        registry.remove_matching(ctx.name(), &ctx).await;
    });

    handle
}
