//! # Endpoint contract and the request/reply resolver.
//!
//! An endpoint is a stateful component driven by a mailbox that delivers
//! inbound items one at a time, in arrival order, never concurrently with
//! itself. That serialization — not locking — is what makes an endpoint's
//! `&mut self` handlers safe.
//!
//! ## Handler shapes
//! - fire-and-forget: a plain message variant handled by [`Endpoint::receive`];
//! - request/reply: a message variant carrying a [`Reply<T>`]. The handler
//!   must eventually resolve it exactly once — the type enforces "at most
//!   once" by consuming itself, and dropping it unresolved surfaces
//!   [`RpcError::Canceled`] to the caller (abandonment, distinct from
//!   failure).
//!
//! ## Lifecycle
//! ```text
//! on_start ──► receive / on_disconnected / on_network_error ... ──► on_stop
//! ```
//! `on_start` runs once before any message. `on_stop` runs once after the
//! mailbox is drained (or immediately after a handler error, which tears the
//! endpoint down — no further messages are delivered).

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::error::RpcError;
use crate::rpc::mailbox::EndpointRef;
use crate::rpc::Address;

/// Single-use resolver for a pending request/reply call.
///
/// Consumed by value: a handler can resolve the caller's call at most once,
/// with [`Reply::ok`] or [`Reply::fail`]. Dropping it unresolved abandons the
/// call — the caller observes [`RpcError::Canceled`].
pub struct Reply<T> {
    tx: oneshot::Sender<Result<T, RpcError>>,
}

impl<T> Reply<T> {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<Result<T, RpcError>>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Resolves the call with a value.
    pub fn ok(self, value: T) {
        let _ = self.tx.send(Ok(value));
    }

    /// Resolves the call with a reported failure.
    pub fn fail(self, error: RpcError) {
        let _ = self.tx.send(Err(error));
    }
}

impl<T> std::fmt::Debug for Reply<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Reply(..)")
    }
}

/// # A mailbox-driven stateful component.
///
/// Handlers take `&mut self`: the mailbox guarantees they never run
/// concurrently for the same endpoint. `ctx` is the endpoint's own
/// [`EndpointRef`], usable to hand out as a reply-to reference, post messages
/// to itself from spawned tasks, or stop itself.
///
/// Returning `Err` from [`Endpoint::on_start`] or [`Endpoint::receive`] tears
/// the endpoint down: its [`Endpoint::on_stop`] runs and no further items are
/// delivered.
#[async_trait]
pub trait Endpoint: Send + 'static {
    /// The message vocabulary this endpoint understands.
    type Msg: Send + 'static;

    /// Invoked once, before any message is delivered.
    async fn on_start(&mut self, ctx: &EndpointRef<Self::Msg>) -> Result<(), RpcError> {
        let _ = ctx;
        Ok(())
    }

    /// Handles one inbound message.
    async fn receive(
        &mut self,
        msg: Self::Msg,
        ctx: &EndpointRef<Self::Msg>,
    ) -> Result<(), RpcError>;

    /// Invoked once, after the mailbox is drained; release owned resources here.
    async fn on_stop(&mut self) {}

    /// The transport observed a peer address becoming unreachable.
    async fn on_disconnected(&mut self, address: &Address) {
        let _ = address;
    }

    /// The transport reported an error on the link to a peer address.
    async fn on_network_error(&mut self, error: &RpcError, address: &Address) {
        let _ = (error, address);
    }
}
