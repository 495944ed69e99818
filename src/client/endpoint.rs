//! # ClientEndpoint: the registration/session state machine.
//!
//! One mailbox-driven actor owns every mutable session field. Worker tasks
//! (registration attempts, the retry timer, forwarding calls) never touch
//! that state directly: they communicate by posting messages back into the
//! mailbox or through the two lock-free shared cells (`registered`,
//! `app_id`) that other threads may read without serialization.
//!
//! ## State machine
//! ```text
//! Init ──► Registering(n) ──► Registered ──► Dead
//!             │    ▲              │  ▲
//!             │    └── n+1 ◄──────┘  │ (MasterChanged)
//!             ▼                      ▼
//!            Dead (budget        Disconnected
//!             exhausted)
//! ```
//!
//! ## Round flow
//! Each round spawns one attempt task per candidate (all in parallel, no
//! queuing) plus one retry timer. Attempt failures are logged and swallowed;
//! a round only fails by exhaustion. The winning acknowledgment does not
//! cancel the siblings — the timer does, which leaves a narrow, accepted
//! window for a late second acknowledgment (never fatal).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tokio::task::JoinSet;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::round::RegistrationRound;
use crate::config::ClientConfig;
use crate::error::RpcError;
use crate::listeners::{ListenerEvent, ListenerHub};
use crate::protocol::{ApplicationDescriptor, ClientMessage, MasterMessage};
use crate::rpc::{Address, Endpoint, EndpointRef, Reply, ResolveMaster};

/// The actor owning the session. Constructed by
/// [`AppClient`](crate::AppClient), registered under
/// [`CLIENT_ENDPOINT`](crate::CLIENT_ENDPOINT).
pub(crate) struct ClientEndpoint {
    descriptor: ApplicationDescriptor,
    config: ClientConfig,
    resolver: Arc<dyn ResolveMaster>,
    listeners: ListenerHub,

    // Shared cells readable from any thread.
    registered: Arc<AtomicBool>,
    app_id: Arc<OnceLock<String>>,

    // Actor-owned state, touched only by mailbox handlers.
    master: Option<EndpointRef<MasterMessage>>,
    disconnected: bool,
    dead: bool,
    round: Option<RegistrationRound>,
    forwards: JoinSet<()>,
}

impl ClientEndpoint {
    pub(crate) fn new(
        descriptor: ApplicationDescriptor,
        config: ClientConfig,
        resolver: Arc<dyn ResolveMaster>,
        listeners: ListenerHub,
        registered: Arc<AtomicBool>,
        app_id: Arc<OnceLock<String>>,
    ) -> Self {
        Self {
            descriptor,
            config,
            resolver,
            listeners,
            registered,
            app_id,
            master: None,
            disconnected: false,
            dead: false,
            round: None,
            forwards: JoinSet::new(),
        }
    }

    /// Launches round `round`, cancelling whatever round came before it.
    fn start_round(&mut self, ctx: &EndpointRef<ClientMessage>, round: u32) {
        if let Some(previous) = self.round.take() {
            previous.cancel();
        }
        debug!(
            round,
            candidates = self.config.masters.len(),
            "starting registration round"
        );

        let cancel = CancellationToken::new();
        let mut attempts = Vec::with_capacity(self.config.masters.len());
        for address in self.config.masters.iter().cloned() {
            let token = cancel.child_token();
            let registered = Arc::clone(&self.registered);
            let resolver = Arc::clone(&self.resolver);
            let descriptor = self.descriptor.clone();
            let client = ctx.clone();
            attempts.push(tokio::spawn(async move {
                tokio::select! {
                    _ = token.cancelled() => {}
                    _ = register_with(address, resolver, registered, descriptor, client) => {}
                }
            }));
        }

        let timer = {
            let client = ctx.clone();
            let timeout = self.config.registration_timeout;
            tokio::spawn(async move {
                time::sleep(timeout).await;
                let _ = client.send(ClientMessage::RegistrationTimeout { round });
            })
        };

        self.round = Some(RegistrationRound::new(round, cancel, attempts, timer));
    }

    fn handle_registration_timeout(&mut self, round: u32, ctx: &EndpointRef<ClientMessage>) {
        if self.dead {
            return;
        }
        // Only the live round's timer may drive the state machine.
        match &self.round {
            Some(current) if current.round() == round => {}
            _ => return,
        }

        if self.registered.load(Ordering::SeqCst) {
            // Registration is one-shot once successful: cancel the remaining
            // attempts and never start another round.
            if let Some(current) = self.round.take() {
                current.cancel();
            }
        } else if round >= self.config.registration_retries {
            self.mark_dead("all masters are unresponsive, giving up", ctx);
        } else {
            self.start_round(ctx, round + 1);
        }
    }

    /// Latches `dead`, notifies the listener exactly once, and stops.
    fn mark_dead(&mut self, reason: &str, ctx: &EndpointRef<ClientMessage>) {
        if self.dead {
            return;
        }
        warn!(reason, "application client is dead");
        self.dead = true;
        self.listeners.emit(ListenerEvent::Dead {
            reason: reason.to_string(),
        });
        ctx.stop();
    }

    /// Relays a caller's request to the active master without blocking the
    /// mailbox; with no active master the answer is an immediate `false`.
    fn forward<F>(&mut self, what: &'static str, reply: Reply<bool>, build: F)
    where
        F: FnOnce(String, Reply<bool>) -> MasterMessage + Send + 'static,
    {
        while self.forwards.try_join_next().is_some() {}

        match (&self.master, self.app_id.get()) {
            (Some(master), Some(app_id)) if !self.dead => {
                let master = master.clone();
                let app_id = app_id.clone();
                self.forwards.spawn(async move {
                    match master.ask(move |r| build(app_id, r)).await {
                        Ok(answer) => reply.ok(answer),
                        // Shutdown-induced cancellation abandons the caller's
                        // call instead of failing it.
                        Err(error) if error.is_canceled() => {}
                        Err(error) => reply.fail(error),
                    }
                });
            }
            _ => {
                warn!(what, "no master is connected, answering negatively");
                reply.ok(false);
            }
        }
    }

    fn full_executor_id(&self, id: u32) -> String {
        match self.app_id.get() {
            Some(app_id) => format!("{app_id}/{id}"),
            None => format!("?/{id}"),
        }
    }
}

/// One registration attempt against one candidate. Runs on a worker task;
/// every outcome short of success is logged and swallowed.
async fn register_with(
    address: Address,
    resolver: Arc<dyn ResolveMaster>,
    registered: Arc<AtomicBool>,
    descriptor: ApplicationDescriptor,
    client: EndpointRef<ClientMessage>,
) {
    // Stale-round guard: another attempt already won.
    if registered.load(Ordering::SeqCst) {
        return;
    }
    match resolver.resolve(&address).await {
        Ok(master) => {
            debug!(master = %address, "sending registration");
            let message = MasterMessage::RegisterApplication { descriptor, client };
            if let Err(error) = master.send(message) {
                warn!(master = %address, error = %error, "failed to send registration");
            }
        }
        Err(error) => {
            warn!(master = %address, error = %error, "could not reach master");
        }
    }
}

#[async_trait]
impl Endpoint for ClientEndpoint {
    type Msg = ClientMessage;

    async fn on_start(&mut self, ctx: &EndpointRef<ClientMessage>) -> Result<(), RpcError> {
        self.start_round(ctx, 1);
        Ok(())
    }

    async fn receive(
        &mut self,
        msg: ClientMessage,
        ctx: &EndpointRef<ClientMessage>,
    ) -> Result<(), RpcError> {
        match msg {
            ClientMessage::RegisteredApplication { app_id, master } => {
                if self.dead {
                    return Ok(());
                }
                info!(app_id = %app_id, master = %master.address(), "registered with master");
                // First acknowledgment wins the id; a late one from another
                // candidate keeps it but adopts the newer master ref.
                let _ = self.app_id.set(app_id);
                self.registered.store(true, Ordering::SeqCst);
                self.master = Some(master);
                self.disconnected = false;
                if let Some(app_id) = self.app_id.get() {
                    self.listeners.emit(ListenerEvent::Connected {
                        app_id: app_id.clone(),
                    });
                }
            }

            ClientMessage::ApplicationRemoved { reason } => {
                self.mark_dead(&reason, ctx);
            }

            ClientMessage::ExecutorAdded {
                id,
                worker_id,
                host_port,
                cores,
                memory_mb,
            } => {
                let full_id = self.full_executor_id(id);
                info!(executor = %full_id, host_port = %host_port, cores, memory_mb, "executor added");
                self.listeners.emit(ListenerEvent::ExecutorAdded {
                    full_id,
                    worker_id,
                    host_port,
                    cores,
                    memory_mb,
                });
            }

            ClientMessage::ExecutorUpdated {
                id,
                state,
                message,
                exit_status,
                worker_lost,
            } => {
                let full_id = self.full_executor_id(id);
                info!(
                    executor = %full_id,
                    ?state,
                    message = message.as_deref().unwrap_or(""),
                    "executor updated"
                );
                if state.is_finished() {
                    self.listeners.emit(ListenerEvent::ExecutorRemoved {
                        full_id,
                        message,
                        exit_status,
                        worker_lost,
                    });
                }
            }

            ClientMessage::WorkerRemoved {
                worker_id,
                host,
                message,
            } => {
                info!(worker_id = %worker_id, host = %host, "worker removed");
                self.listeners.emit(ListenerEvent::WorkerRemoved {
                    worker_id,
                    host,
                    message,
                });
            }

            ClientMessage::MasterChanged { master, web_ui_url } => {
                if self.dead {
                    return Ok(());
                }
                info!(master = %master.address(), web_ui_url = %web_ui_url, "master has changed");
                if let Some(app_id) = self.app_id.get() {
                    let _ = master.send(MasterMessage::MasterChangeAcknowledged {
                        app_id: app_id.clone(),
                    });
                }
                self.master = Some(master);
                self.disconnected = false;
            }

            ClientMessage::RequestExecutors { total, reply } => {
                self.forward("request executors", reply, move |app_id, reply| {
                    MasterMessage::RequestExecutors {
                        app_id,
                        total,
                        reply,
                    }
                });
            }

            ClientMessage::KillExecutors {
                executor_ids,
                reply,
            } => {
                self.forward("kill executors", reply, move |app_id, reply| {
                    MasterMessage::KillExecutors {
                        app_id,
                        executor_ids,
                        reply,
                    }
                });
            }

            ClientMessage::Stop { reply } => {
                if let (Some(master), Some(app_id)) = (&self.master, self.app_id.get()) {
                    let _ = master.send(MasterMessage::UnregisterApplication {
                        app_id: app_id.clone(),
                    });
                }
                reply.ok(true);
                ctx.stop();
            }

            ClientMessage::RegistrationTimeout { round } => {
                self.handle_registration_timeout(round, ctx);
            }
        }
        Ok(())
    }

    async fn on_stop(&mut self) {
        if let Some(round) = self.round.take() {
            round.cancel();
        }
        self.forwards.abort_all();
    }

    async fn on_disconnected(&mut self, address: &Address) {
        if self.dead {
            return;
        }
        let is_active_master = self
            .master
            .as_ref()
            .is_some_and(|master| master.address() == address);
        if is_active_master && !self.disconnected {
            self.disconnected = true;
            warn!(master = %address, "connection to master lost, waiting for a new master");
            self.listeners.emit(ListenerEvent::Disconnected);
        }
    }

    async fn on_network_error(&mut self, error: &RpcError, address: &Address) {
        if self.config.masters.contains(address) && !self.registered.load(Ordering::SeqCst) {
            warn!(master = %address, error = %error, "network error while registering");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

    use super::*;
    use crate::listeners::ClientListener;
    use crate::protocol::{ExecutorState, CLIENT_ENDPOINT, MASTER_ENDPOINT};
    use crate::rpc::{RpcEnv, StaticResolver};

    // --- fixtures ---------------------------------------------------------

    type Log = Arc<Mutex<Vec<String>>>;

    fn log_of(log: &Log) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    /// Scriptable master endpoint recording everything it receives.
    struct FakeMaster {
        app_id: String,
        accept: bool,
        grant: bool,
        hold_requests: bool,
        held: Vec<Reply<bool>>,
        log: Log,
    }

    impl FakeMaster {
        fn accepting(app_id: &str, log: &Log) -> Self {
            Self {
                app_id: app_id.to_string(),
                accept: true,
                grant: true,
                hold_requests: false,
                held: Vec::new(),
                log: Arc::clone(log),
            }
        }

        fn silent(log: &Log) -> Self {
            Self {
                accept: false,
                ..Self::accepting("unused", log)
            }
        }
    }

    #[async_trait]
    impl Endpoint for FakeMaster {
        type Msg = MasterMessage;

        async fn receive(
            &mut self,
            msg: MasterMessage,
            ctx: &EndpointRef<MasterMessage>,
        ) -> Result<(), RpcError> {
            let mut log = self.log.lock().unwrap();
            match msg {
                MasterMessage::RegisterApplication { descriptor, client } => {
                    log.push(format!("register:{}", descriptor.name));
                    if self.accept {
                        let _ = client.send(ClientMessage::RegisteredApplication {
                            app_id: self.app_id.clone(),
                            master: ctx.clone(),
                        });
                    }
                }
                MasterMessage::RequestExecutors { total, reply, .. } => {
                    log.push(format!("request:{total}"));
                    if self.hold_requests {
                        self.held.push(reply);
                    } else {
                        reply.ok(self.grant);
                    }
                }
                MasterMessage::KillExecutors {
                    executor_ids,
                    reply,
                    ..
                } => {
                    log.push(format!("kill:{}", executor_ids.join(",")));
                    reply.ok(self.grant);
                }
                MasterMessage::MasterChangeAcknowledged { app_id } => {
                    log.push(format!("ack:{app_id}"));
                }
                MasterMessage::UnregisterApplication { app_id } => {
                    log.push(format!("unregister:{app_id}"));
                }
            }
            Ok(())
        }
    }

    struct RecordingListener {
        tx: UnboundedSender<String>,
    }

    #[async_trait]
    impl ClientListener for RecordingListener {
        async fn connected(&self, app_id: &str) {
            let _ = self.tx.send(format!("connected:{app_id}"));
        }

        async fn disconnected(&self) {
            let _ = self.tx.send("disconnected".into());
        }

        async fn dead(&self, reason: &str) {
            let _ = self.tx.send(format!("dead:{reason}"));
        }

        async fn executor_added(
            &self,
            full_id: &str,
            _worker_id: &str,
            _host_port: &str,
            _cores: u32,
            _memory_mb: u32,
        ) {
            let _ = self.tx.send(format!("added:{full_id}"));
        }

        async fn executor_removed(
            &self,
            full_id: &str,
            _message: Option<&str>,
            exit_status: Option<i32>,
            _worker_lost: bool,
        ) {
            let _ = self.tx.send(format!("removed:{full_id}:{exit_status:?}"));
        }

        async fn worker_removed(&self, worker_id: &str, _host: &str, _message: &str) {
            let _ = self.tx.send(format!("worker:{worker_id}"));
        }
    }

    struct Harness {
        client: EndpointRef<ClientMessage>,
        events: UnboundedReceiver<String>,
        registered: Arc<AtomicBool>,
        app_id: Arc<OnceLock<String>>,
    }

    impl Harness {
        fn drain(&mut self) -> Vec<String> {
            let mut out = Vec::new();
            while let Ok(ev) = self.events.try_recv() {
                out.push(ev);
            }
            out
        }
    }

    /// Spawns an env hosting one fake master at `address`.
    async fn spawn_master(address: &Address, master: FakeMaster) -> RpcEnv {
        let env = RpcEnv::new(address.clone()).await;
        env.register(MASTER_ENDPOINT, master).await.unwrap();
        env
    }

    /// Brings up a client endpoint over the given candidates and master envs.
    async fn start_client(candidates: Vec<Address>, envs: Vec<RpcEnv>) -> Harness {
        let config = ClientConfig::new(candidates);
        let client_env = RpcEnv::new(Address::new("driver", 4040)).await;
        let (tx, events) = unbounded_channel();
        let hub = ListenerHub::new(Arc::new(RecordingListener { tx }), 64);
        let registered = Arc::new(AtomicBool::new(false));
        let app_id = Arc::new(OnceLock::new());

        let endpoint = ClientEndpoint::new(
            ApplicationDescriptor::new("test-app"),
            config,
            Arc::new(StaticResolver::new(envs)),
            hub,
            Arc::clone(&registered),
            Arc::clone(&app_id),
        );
        let client = client_env.register(CLIENT_ENDPOINT, endpoint).await.unwrap();
        Harness {
            client,
            events,
            registered,
            app_id,
        }
    }

    fn addr(host: &str) -> Address {
        Address::new(host, 7077)
    }

    // --- scenarios --------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn test_one_reachable_master_wins_round_one() {
        // Candidates [A, B, C]; only B exists. Three retries, 20s apart.
        let log = Log::default();
        let env_b = spawn_master(&addr("b"), FakeMaster::accepting("app-b-1", &log)).await;
        let mut harness =
            start_client(vec![addr("a"), addr("b"), addr("c")], vec![env_b]).await;

        assert_eq!(harness.events.recv().await.unwrap(), "connected:app-b-1");
        assert!(harness.registered.load(Ordering::SeqCst));
        assert_eq!(harness.app_id.get().map(String::as_str), Some("app-b-1"));

        // Let every retry deadline pass: rounds 2 and 3 must never start.
        time::sleep(Duration::from_secs(120)).await;
        assert_eq!(log_of(&log), vec!["register:test-app"]);
        assert!(harness.drain().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_report_dead_once() {
        let mut harness = start_client(vec![addr("a"), addr("b")], vec![]).await;

        let first = harness.events.recv().await.unwrap();
        assert!(first.starts_with("dead:"), "unexpected event {first}");
        assert!(first.contains("unresponsive"));
        assert!(!harness.registered.load(Ordering::SeqCst));

        // Nothing further fires, ever.
        time::sleep(Duration::from_secs(300)).await;
        assert!(harness.drain().is_empty());

        // The endpoint stopped itself.
        while harness
            .client
            .send(ClientMessage::RegistrationTimeout { round: 0 })
            .is_ok()
        {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_master_failover_is_acknowledged_once() {
        let log_b = Log::default();
        let log_c = Log::default();
        let env_b = spawn_master(&addr("b"), FakeMaster::accepting("app-1", &log_b)).await;
        let env_c = spawn_master(&addr("c"), FakeMaster::silent(&log_c)).await;
        let standby = env_c
            .lookup::<MasterMessage>(MASTER_ENDPOINT)
            .await
            .unwrap();

        let mut harness = start_client(vec![addr("b")], vec![env_b]).await;
        assert_eq!(harness.events.recv().await.unwrap(), "connected:app-1");

        // Active master drops; one notification per episode.
        harness.client.notify_disconnected(addr("b"));
        assert_eq!(harness.events.recv().await.unwrap(), "disconnected");
        harness.client.notify_disconnected(addr("b"));
        tokio::task::yield_now().await;
        assert!(harness.drain().is_empty());

        // Standby takes over: exactly one acknowledgment to the new master.
        harness
            .client
            .send(ClientMessage::MasterChanged {
                master: standby,
                web_ui_url: "http://c:8080".into(),
            })
            .unwrap();
        while log_of(&log_c).is_empty() {
            tokio::task::yield_now().await;
        }
        assert_eq!(log_of(&log_c), vec!["ack:app-1"]);

        // The episode latch was cleared: losing the new master notifies again.
        harness.client.notify_disconnected(addr("c"));
        assert_eq!(harness.events.recv().await.unwrap(), "disconnected");

        // The old master's address no longer matters.
        harness.client.notify_disconnected(addr("b"));
        tokio::task::yield_now().await;
        assert!(harness.drain().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_forward_without_master_answers_false() {
        let harness = start_client(vec![addr("a")], vec![]).await;

        let answer = harness
            .client
            .ask(|reply| ClientMessage::RequestExecutors { total: 4, reply })
            .await
            .unwrap();
        assert!(!answer);
    }

    #[tokio::test(start_paused = true)]
    async fn test_forward_relays_master_answer() {
        let log = Log::default();
        let env = spawn_master(&addr("b"), FakeMaster::accepting("app-1", &log)).await;
        let mut harness = start_client(vec![addr("b")], vec![env]).await;
        assert_eq!(harness.events.recv().await.unwrap(), "connected:app-1");

        let granted = harness
            .client
            .ask(|reply| ClientMessage::RequestExecutors { total: 5, reply })
            .await
            .unwrap();
        assert!(granted);

        let killed = harness
            .client
            .ask(|reply| ClientMessage::KillExecutors {
                executor_ids: vec!["app-1/0".into()],
                reply,
            })
            .await
            .unwrap();
        assert!(killed);

        let log = log_of(&log);
        assert!(log.contains(&"request:5".to_string()));
        assert!(log.contains(&"kill:app-1/0".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_forward_is_abandoned_on_shutdown() {
        let log = Log::default();
        let mut master = FakeMaster::accepting("app-1", &log);
        master.hold_requests = true;
        let env = spawn_master(&addr("b"), master).await;
        let mut harness = start_client(vec![addr("b")], vec![env]).await;
        assert_eq!(harness.events.recv().await.unwrap(), "connected:app-1");

        // Park a request inside the master, then stop the client under it.
        let client = harness.client.clone();
        let pending = tokio::spawn(async move {
            client
                .ask(|reply| ClientMessage::RequestExecutors { total: 9, reply })
                .await
        });
        while !log_of(&log).contains(&"request:9".to_string()) {
            tokio::task::yield_now().await;
        }

        let acked = harness
            .client
            .ask(|reply| ClientMessage::Stop { reply })
            .await
            .unwrap();
        assert!(acked);

        // The caller is abandoned, not failed.
        let outcome = pending.await.unwrap();
        assert!(matches!(outcome, Err(ref e) if e.is_canceled()), "{outcome:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_application_removed_is_fatal() {
        let log = Log::default();
        let env = spawn_master(&addr("b"), FakeMaster::accepting("app-1", &log)).await;
        let mut harness = start_client(vec![addr("b")], vec![env]).await;
        assert_eq!(harness.events.recv().await.unwrap(), "connected:app-1");

        harness
            .client
            .send(ClientMessage::ApplicationRemoved {
                reason: "kicked by operator".into(),
            })
            .unwrap();
        assert_eq!(
            harness.events.recv().await.unwrap(),
            "dead:kicked by operator"
        );

        // Terminal: the endpoint stops and nothing else fires.
        while harness
            .client
            .send(ClientMessage::WorkerRemoved {
                worker_id: "w".into(),
                host: "h".into(),
                message: "m".into(),
            })
            .is_ok()
        {
            tokio::task::yield_now().await;
        }
        assert!(harness.drain().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_accepting_masters_is_a_tolerated_race() {
        let log_a = Log::default();
        let log_b = Log::default();
        let env_a = spawn_master(&addr("a"), FakeMaster::accepting("app-a-1", &log_a)).await;
        let env_b = spawn_master(&addr("b"), FakeMaster::accepting("app-b-1", &log_b)).await;
        let mut harness = start_client(vec![addr("a"), addr("b")], vec![env_a, env_b]).await;

        let first = harness.events.recv().await.unwrap();
        assert!(first.starts_with("connected:"), "unexpected event {first}");
        assert!(harness.registered.load(Ordering::SeqCst));

        // Whatever the interleaving, the session stays alive and usable.
        time::sleep(Duration::from_secs(120)).await;
        let granted = harness
            .client
            .ask(|reply| ClientMessage::RequestExecutors { total: 2, reply })
            .await
            .unwrap();
        assert!(granted);
        assert!(harness.drain().iter().all(|ev| !ev.starts_with("dead:")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_executor_and_worker_events_are_forwarded_verbatim() {
        let log = Log::default();
        let env = spawn_master(&addr("b"), FakeMaster::accepting("app-1", &log)).await;
        let mut harness = start_client(vec![addr("b")], vec![env]).await;
        assert_eq!(harness.events.recv().await.unwrap(), "connected:app-1");

        let added = ClientMessage::ExecutorAdded {
            id: 0,
            worker_id: "worker-0".into(),
            host_port: "node1:4321".into(),
            cores: 4,
            memory_mb: 2048,
        };
        harness.client.send(added).unwrap();
        assert_eq!(harness.events.recv().await.unwrap(), "added:app-1/0");

        // Duplicates are forwarded without dedup.
        harness
            .client
            .send(ClientMessage::ExecutorAdded {
                id: 0,
                worker_id: "worker-0".into(),
                host_port: "node1:4321".into(),
                cores: 4,
                memory_mb: 2048,
            })
            .unwrap();
        assert_eq!(harness.events.recv().await.unwrap(), "added:app-1/0");

        // A running update is informational only; a terminal one is a removal.
        harness
            .client
            .send(ClientMessage::ExecutorUpdated {
                id: 0,
                state: ExecutorState::Running,
                message: None,
                exit_status: None,
                worker_lost: false,
            })
            .unwrap();
        harness
            .client
            .send(ClientMessage::ExecutorUpdated {
                id: 0,
                state: ExecutorState::Exited,
                message: Some("done".into()),
                exit_status: Some(0),
                worker_lost: false,
            })
            .unwrap();
        assert_eq!(
            harness.events.recv().await.unwrap(),
            "removed:app-1/0:Some(0)"
        );

        harness
            .client
            .send(ClientMessage::WorkerRemoved {
                worker_id: "worker-0".into(),
                host: "node1".into(),
                message: "lost".into(),
            })
            .unwrap();
        assert_eq!(harness.events.recv().await.unwrap(), "worker:worker-0");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreachable_candidates_never_fail_the_round() {
        // A mix of one dead address and one live master still registers.
        let log = Log::default();
        let env = spawn_master(&addr("b"), FakeMaster::accepting("app-1", &log)).await;
        let mut harness = start_client(vec![addr("dead"), addr("b")], vec![env]).await;
        assert_eq!(harness.events.recv().await.unwrap(), "connected:app-1");
    }
}
