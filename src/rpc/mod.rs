//! # RPC plumbing: mailboxes, endpoint registry, resolution.
//!
//! The messaging substrate the client is built on. Each process is an
//! [`RpcEnv`] hosting named endpoints; each endpoint is driven by a mailbox
//! that serializes delivery ([`mailbox`]); request/reply calls are expressed
//! with [`Reply`] payloads ([`endpoint`]); remote masters are obtained
//! through the [`ResolveMaster`] seam ([`resolver`]) after validation by the
//! per-env existence checker ([`checker`]).

mod address;
mod checker;
mod endpoint;
mod env;
mod mailbox;
mod resolver;

pub use address::Address;
pub use checker::{CheckerMessage, ExistenceChecker};
pub use endpoint::{Endpoint, Reply};
pub use env::{RpcEnv, ENDPOINT_VERIFIER};
pub use mailbox::EndpointRef;
pub use resolver::{ResolveMaster, StaticResolver};
