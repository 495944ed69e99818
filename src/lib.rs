//! # driverlink
//!
//! **Driverlink** is the driver-side client of a standalone cluster control
//! plane: it registers an application with a set of candidate masters,
//! survives master failover, relays executor lifecycle events to the
//! embedding process, and proxies executor pool requests to whichever master
//! is currently active.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  ┌───────────────────┐          ┌─────────────────────────────────────┐
//!  │     AppClient     │          │  ClientEndpoint (mailbox actor)     │
//!  │ (embedder facade) │─────────►│  - registration state machine      │
//!  │  start / stop     │  ask /   │  - session fields (master, dead,   │
//!  │  request / kill   │  send    │    disconnected, round)            │
//!  └───────┬───────────┘          │  - forwarding proxy (JoinSet)      │
//!          │                      └──────┬───────────────┬──────────────┘
//!          │ callbacks                   │ rounds        │ resolve + send
//!          ▼                             ▼               ▼
//!  ┌───────────────────┐       ┌─────────────────┐   ┌─────────────────┐
//!  │    ListenerHub    │       │ RegistrationRound│  │  ResolveMaster  │
//!  │ (bounded queue +  │       │  attempt tasks + │  │  (address ──►   │
//!  │  fan-out worker)  │       │  retry timer     │  │   master ref)   │
//!  └───────┬───────────┘       └─────────────────┘   └────────┬────────┘
//!          ▼                                                  ▼
//!  ┌───────────────────┐                            ┌─────────────────────┐
//!  │  ClientListener   │                            │ RpcEnv (per process)│
//!  │  (embedder code)  │                            │  registry + checker │
//!  └───────────────────┘                            └─────────────────────┘
//! ```
//!
//! ### Registration lifecycle
//! ```text
//! start() ──► round 1: contact every candidate master in parallel
//!   │
//!   ├─ a master acknowledges ──► Registered (one-shot; later timers only
//!   │                            cancel the leftover attempts)
//!   │     ├─ master lost      ──► Disconnected, wait for MasterChanged
//!   │     ├─ MasterChanged    ──► adopt + acknowledge, back to Registered
//!   │     └─ ApplicationRemoved ─► Dead (terminal)
//!   │
//!   └─ retry timer fires unregistered
//!         ├─ rounds left  ──► cancel round, start round n+1
//!         └─ budget spent ──► Dead ("all masters are unresponsive")
//! ```
//!
//! ## Features
//! | Area           | Description                                                   | Key types / traits                    |
//! |----------------|---------------------------------------------------------------|---------------------------------------|
//! | **Client**     | Lifecycle facade: start, stop, executor pool requests.        | [`AppClient`], [`ClientConfig`]       |
//! | **Listeners**  | Session callbacks delivered off the hot path.                 | [`ClientListener`]                    |
//! | **Protocol**   | Message vocabulary exchanged with the masters.                | [`MasterMessage`], [`ClientMessage`]  |
//! | **RPC**        | In-process envs, typed mailboxes, request/reply.              | [`RpcEnv`], [`EndpointRef`], [`Reply`]|
//! | **Resolution** | Pluggable address-to-master lookup seam.                      | [`ResolveMaster`], [`StaticResolver`] |
//! | **Errors**     | Typed failures for the substrate and the client lifecycle.    | [`RpcError`], [`ClientError`]         |
//!
//! ## Optional features
//! - `logging`: exports the tracing-backed [`LogListener`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use driverlink::{
//!     Address, AppClient, ApplicationDescriptor, ClientConfig, ClientListener,
//!     ClientMessage, Endpoint, EndpointRef, MasterMessage, RpcEnv, RpcError,
//!     StaticResolver, MASTER_ENDPOINT,
//! };
//!
//! // A toy in-process master that accepts every application.
//! struct ToyMaster;
//!
//! #[async_trait]
//! impl Endpoint for ToyMaster {
//!     type Msg = MasterMessage;
//!
//!     async fn receive(
//!         &mut self,
//!         msg: MasterMessage,
//!         ctx: &EndpointRef<MasterMessage>,
//!     ) -> Result<(), RpcError> {
//!         match msg {
//!             MasterMessage::RegisterApplication { client, .. } => {
//!                 let _ = client.send(ClientMessage::RegisteredApplication {
//!                     app_id: "app-0001".into(),
//!                     master: ctx.clone(),
//!                 });
//!             }
//!             MasterMessage::RequestExecutors { reply, .. } => reply.ok(true),
//!             MasterMessage::KillExecutors { reply, .. } => reply.ok(true),
//!             _ => {}
//!         }
//!         Ok(())
//!     }
//! }
//!
//! struct Quiet;
//!
//! #[async_trait]
//! impl ClientListener for Quiet {
//!     async fn connected(&self, _app_id: &str) {}
//!     async fn disconnected(&self) {}
//!     async fn dead(&self, _reason: &str) {}
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let master_addr = Address::new("master-a", 7077);
//!     let master_env = RpcEnv::new(master_addr.clone()).await;
//!     master_env.register(MASTER_ENDPOINT, ToyMaster).await?;
//!
//!     let client = AppClient::new(
//!         RpcEnv::new(Address::new("driver", 4040)).await,
//!         ApplicationDescriptor::new("example-job"),
//!         ClientConfig::new(vec![master_addr]),
//!         Arc::new(StaticResolver::new([master_env])),
//!         Arc::new(Quiet),
//!     );
//!
//!     client.start().await?;
//!     while !client.is_registered() {
//!         tokio::task::yield_now().await;
//!     }
//!     assert!(client.request_total_executors(2).await?);
//!
//!     client.stop().await;
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod listeners;
mod protocol;
mod rpc;

pub use client::AppClient;
pub use config::ClientConfig;
pub use error::{ClientError, RpcError};
pub use listeners::ClientListener;
pub use protocol::{
    ApplicationDescriptor, ClientMessage, ExecutorState, MasterMessage, CLIENT_ENDPOINT,
    MASTER_ENDPOINT,
};
pub use rpc::{
    Address, CheckerMessage, Endpoint, EndpointRef, ExistenceChecker, Reply, ResolveMaster,
    RpcEnv, StaticResolver, ENDPOINT_VERIFIER,
};

#[cfg(feature = "logging")]
pub use listeners::LogListener;
