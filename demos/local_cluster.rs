//! # Example: local cluster session
//!
//! Runs an entire session in one process: a toy master env, a driver env,
//! an `AppClient` with the tracing-backed `LogListener`, an executor grant,
//! a pool resize, and a clean stop.
//!
//! Run with: `cargo run --example local_cluster --features logging`

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use driverlink::{
    Address, AppClient, ApplicationDescriptor, ClientConfig, ClientMessage, Endpoint,
    EndpointRef, ExecutorState, LogListener, MasterMessage, RpcEnv, RpcError, StaticResolver,
    MASTER_ENDPOINT,
};

/// Accepts every application and grants a single executor.
struct ToyMaster {
    next_app: u32,
}

#[async_trait]
impl Endpoint for ToyMaster {
    type Msg = MasterMessage;

    async fn receive(
        &mut self,
        msg: MasterMessage,
        ctx: &EndpointRef<MasterMessage>,
    ) -> Result<(), RpcError> {
        match msg {
            MasterMessage::RegisterApplication { descriptor, client } => {
                self.next_app += 1;
                let app_id = format!("app-{:04}", self.next_app);
                println!("[master] registering {:?} as {app_id}", descriptor.name);

                let _ = client.send(ClientMessage::RegisteredApplication {
                    app_id,
                    master: ctx.clone(),
                });
                let _ = client.send(ClientMessage::ExecutorAdded {
                    id: 0,
                    worker_id: "worker-0".into(),
                    host_port: "127.0.0.1:4321".into(),
                    cores: 2,
                    memory_mb: descriptor.memory_per_executor_mb,
                });
            }
            MasterMessage::RequestExecutors { app_id, total, reply } => {
                println!("[master] {app_id} wants {total} executors, granting");
                reply.ok(true);
            }
            MasterMessage::KillExecutors {
                app_id,
                executor_ids,
                reply,
            } => {
                println!("[master] {app_id} kills {executor_ids:?}");
                reply.ok(true);
            }
            MasterMessage::MasterChangeAcknowledged { app_id } => {
                println!("[master] {app_id} acknowledged failover");
            }
            MasterMessage::UnregisterApplication { app_id } => {
                println!("[master] goodbye {app_id}");
            }
        }
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    let master_addr = Address::new("master-a", 7077);
    let master_env = RpcEnv::new(master_addr.clone()).await;
    master_env
        .register(MASTER_ENDPOINT, ToyMaster { next_app: 0 })
        .await?;

    let driver_env = RpcEnv::new(Address::new("driver", 4040)).await;
    let client = AppClient::new(
        driver_env.clone(),
        ApplicationDescriptor::new("local-demo"),
        ClientConfig::new(vec![master_addr]),
        Arc::new(StaticResolver::new([master_env])),
        Arc::new(LogListener),
    );

    client.start().await?;
    while !client.is_registered() {
        tokio::task::yield_now().await;
    }
    println!("[driver] registered as {:?}", client.app_id());

    let granted = client.request_total_executors(3).await?;
    println!("[driver] resize granted: {granted}");

    // The master reports the executor finishing; the listener logs a removal.
    let app_id = client.app_id().unwrap_or_default();
    if let Some(endpoint) = driver_env
        .lookup::<ClientMessage>(driverlink::CLIENT_ENDPOINT)
        .await
    {
        let _ = endpoint.send(ClientMessage::ExecutorUpdated {
            id: 0,
            state: ExecutorState::Exited,
            message: Some("work complete".into()),
            exit_status: Some(0),
            worker_lost: false,
        });
    }
    tokio::time::sleep(Duration::from_millis(50)).await;

    let killed = client.kill_executors(vec![format!("{app_id}/0")]).await?;
    println!("[driver] kill granted: {killed}");

    client.stop().await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
