//! # Session callbacks to the owning process.
//!
//! The [`ClientListener`] trait is the contract; the internal
//! [`ListenerHub`](hub::ListenerHub) fans callbacks out on a dedicated worker
//! so the client's mailbox never blocks on, or re-enters through, embedder
//! code.

mod hub;
mod listener;

pub use listener::ClientListener;

pub(crate) use hub::{ListenerEvent, ListenerHub};

#[cfg(feature = "logging")]
mod log;
#[cfg(feature = "logging")]
pub use log::LogListener;
