//! # AppClient: the embedder-facing facade.
//!
//! Owns the client endpoint's lifecycle (`start` / `stop`) and fronts the
//! forwarding proxy (`request_total_executors` / `kill_executors`). Thin by
//! construction: all session state lives inside the endpoint actor, the
//! facade only holds the handle plus the two shared read-only cells.
//!
//! ## Lifecycle
//! One-shot: `start` can succeed at most once, `stop` is idempotent, and a
//! stopped client never restarts. Calling a forwarding method outside the
//! running window answers `false` rather than erroring.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tokio::sync::Mutex;
use tokio::time;
use tracing::{info, warn};

use crate::client::endpoint::ClientEndpoint;
use crate::config::ClientConfig;
use crate::error::{ClientError, RpcError};
use crate::listeners::{ClientListener, ListenerEvent, ListenerHub};
use crate::protocol::{ApplicationDescriptor, ClientMessage, CLIENT_ENDPOINT};
use crate::rpc::{EndpointRef, Reply, ResolveMaster, RpcEnv};

/// Handle to one application's session with the cluster masters.
///
/// Construct, [`start`](AppClient::start), use, [`stop`](AppClient::stop).
/// Cheap to share behind an `Arc`; every method takes `&self`.
pub struct AppClient {
    env: RpcEnv,
    descriptor: ApplicationDescriptor,
    config: ClientConfig,
    resolver: Arc<dyn ResolveMaster>,
    listener: Arc<dyn ClientListener>,

    endpoint: Mutex<Option<EndpointRef<ClientMessage>>>,
    registered: Arc<AtomicBool>,
    app_id: Arc<OnceLock<String>>,
    stopped: AtomicBool,
}

impl AppClient {
    pub fn new(
        env: RpcEnv,
        descriptor: ApplicationDescriptor,
        config: ClientConfig,
        resolver: Arc<dyn ResolveMaster>,
        listener: Arc<dyn ClientListener>,
    ) -> Self {
        Self {
            env,
            descriptor,
            config,
            resolver,
            listener,
            endpoint: Mutex::new(None),
            registered: Arc::new(AtomicBool::new(false)),
            app_id: Arc::new(OnceLock::new()),
            stopped: AtomicBool::new(false),
        }
    }

    /// Brings up the client endpoint and kicks off registration round 1.
    ///
    /// Fails with [`ClientError::AlreadyStarted`] on a running or stopped
    /// client. A registration failure of the endpoint itself (name taken in
    /// the env) is terminal: the listener sees `disconnected` and the client
    /// is left stopped.
    pub async fn start(&self) -> Result<(), ClientError> {
        let mut slot = self.endpoint.lock().await;
        if slot.is_some() || self.stopped.load(Ordering::SeqCst) {
            return Err(ClientError::AlreadyStarted);
        }

        info!(app = %self.descriptor.name, candidates = self.config.masters.len(), "starting application client");
        let hub = ListenerHub::new(Arc::clone(&self.listener), self.config.listener_queue);
        let endpoint = ClientEndpoint::new(
            self.descriptor.clone(),
            self.config.clone(),
            Arc::clone(&self.resolver),
            hub.clone(),
            Arc::clone(&self.registered),
            Arc::clone(&self.app_id),
        );
        match self.env.register(CLIENT_ENDPOINT, endpoint).await {
            Ok(handle) => {
                *slot = Some(handle);
                Ok(())
            }
            Err(error) => {
                warn!(error = %error, "client endpoint could not be brought up");
                hub.emit(ListenerEvent::Disconnected);
                self.stopped.store(true, Ordering::SeqCst);
                Err(ClientError::StartFailed {
                    reason: error.to_string(),
                })
            }
        }
    }

    /// Stops the client: best-effort goodbye to the master, then endpoint
    /// teardown. Idempotent; bounded by `stop_timeout`.
    pub async fn stop(&self) {
        let handle = { self.endpoint.lock().await.take() };
        self.stopped.store(true, Ordering::SeqCst);
        let Some(handle) = handle else { return };

        let graceful = time::timeout(
            self.config.stop_timeout,
            handle.ask(|reply| ClientMessage::Stop { reply }),
        )
        .await
        .map_err(|_| RpcError::Timeout {
            elapsed: self.config.stop_timeout,
        });
        match graceful {
            Ok(Ok(_)) => {}
            // Already tearing down; nothing left to acknowledge.
            Ok(Err(error)) if error.is_canceled() => {}
            Ok(Err(error)) => warn!(error = %error, "stop request failed"),
            Err(timeout) => {
                warn!(error = %timeout, "stop not acknowledged in time, aborting endpoint");
                handle.stop();
            }
        }
    }

    /// Asks the active master to resize the executor pool to `total`.
    ///
    /// Answers `Ok(false)` when the client is not running or not registered.
    pub async fn request_total_executors(&self, total: u32) -> Result<bool, ClientError> {
        self.forward("request executors", move |reply| {
            ClientMessage::RequestExecutors { total, reply }
        })
        .await
    }

    /// Asks the active master to terminate the named executors.
    ///
    /// Answers `Ok(false)` when the client is not running or not registered.
    pub async fn kill_executors(&self, executor_ids: Vec<String>) -> Result<bool, ClientError> {
        self.forward("kill executors", move |reply| ClientMessage::KillExecutors {
            executor_ids,
            reply,
        })
        .await
    }

    /// True once a master has acknowledged the registration.
    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::SeqCst)
    }

    /// Cluster-assigned application id, once registered.
    pub fn app_id(&self) -> Option<String> {
        self.app_id.get().cloned()
    }

    async fn forward<F>(&self, what: &'static str, build: F) -> Result<bool, ClientError>
    where
        F: FnOnce(Reply<bool>) -> ClientMessage,
    {
        let handle = { self.endpoint.lock().await.clone() };
        match handle {
            Some(handle) => Ok(handle.ask(build).await?),
            None => {
                warn!(what, "client is not running, answering negatively");
                Ok(false)
            }
        }
    }
}
