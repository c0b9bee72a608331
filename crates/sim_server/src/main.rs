//! # sim_server — NATS transport for the simulation runtime.
//!
//! The server is the external collaborator of the simulation core: it maps
//! NATS messages to the inbound envelope contract and publishes the
//! runtime's acknowledgements and frames back out. All simulation state
//! stays inside the player task; this binary only moves bytes.
//!
//! ## Startup sequence
//!
//! 1. Connect to NATS (configurable URL, default `nats://localhost:4222`).
//! 2. Build the player: time component registered, `time` blueprint in the
//!    catalog, one `time` system pre-scheduled.
//! 3. Subscribe to `{prefix}.inbound` and forward envelopes to the player.
//! 4. Forward outbound messages to `{prefix}.frames` / `{prefix}.acks`.

mod subjects;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use sim_component::ComponentRegistry;
use sim_proto::{InboundEnvelope, OutboundMessage};
use sim_runtime::{RuntimeConfig, SimulationPlayer, TimeSystem, time_component};
use sim_scheduler::{System, SystemCatalog};

#[derive(Debug, Parser)]
#[command(name = "sim_server", about = "NATS transport for the simulation runtime")]
struct Args {
    /// NATS server URL.
    #[arg(long, default_value = "nats://localhost:4222")]
    nats_url: String,

    /// Subject prefix for all simulation subjects.
    #[arg(long, default_value = subjects::DEFAULT_PREFIX)]
    prefix: String,

    /// Milliseconds between simulation ticks.
    #[arg(long, default_value_t = 50)]
    tick_ms: u64,
}

/// Build a player with the stock component set and system catalog.
fn build_player(config: RuntimeConfig) -> Result<SimulationPlayer> {
    let registry = Arc::new(ComponentRegistry::new());
    registry.register(time_component())?;

    let mut catalog = SystemCatalog::new();
    catalog.register("time", |_params| {
        Ok(Box::new(TimeSystem::new()) as Box<dyn System>)
    })?;

    let mut player = SimulationPlayer::new(registry, catalog, config)?;
    player
        .scheduler_mut()
        .add_system("time", Box::new(TimeSystem::new()), None)?;
    Ok(player)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sim_server=info".parse()?))
        .init();

    let args = Args::parse();
    let instance_id = Uuid::new_v4().to_string();
    info!(%instance_id, url = %args.nats_url, "simulation server starting");

    let client = async_nats::connect(&args.nats_url).await?;
    info!("NATS connection established");

    let player = build_player(RuntimeConfig {
        tick_interval_ms: args.tick_ms,
    })?;
    let mut outbound = player.subscribe_outbound()?;
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

    // Forward outbound messages to their subjects.
    let outbound_client = client.clone();
    let prefix = args.prefix.clone();
    let forwarder = tokio::spawn(async move {
        while let Some(message) = outbound.recv().await {
            let subject = match &message {
                OutboundMessage::Frame(_) => subjects::frames(&prefix),
                OutboundMessage::Acknowledgement(_) => subjects::acks(&prefix),
            };
            match sim_proto::encode(&message) {
                Ok(bytes) => {
                    if let Err(err) = outbound_client.publish(subject, bytes.into()).await {
                        error!(%err, "failed to publish outbound message");
                    }
                }
                Err(err) => error!(%err, "failed to encode outbound message"),
            }
        }
    });

    let player_task = tokio::spawn(player.run(inbound_rx));

    let inbound_subject = subjects::inbound(&args.prefix);
    let mut commands = client.subscribe(inbound_subject.clone()).await?;
    info!(subject = %inbound_subject, "listening for commands");

    while let Some(message) = commands.next().await {
        match sim_proto::decode::<InboundEnvelope>(message.payload.as_ref()) {
            Ok(envelope) => {
                if inbound_tx.send(envelope).is_err() {
                    break;
                }
            }
            // Envelopes that fail to parse never reach the dispatcher and
            // are not acknowledged.
            Err(err) => warn!(%err, "ignoring malformed inbound message"),
        }
    }

    drop(inbound_tx);
    player_task.await??;
    forwarder.abort();
    info!("simulation server shut down");
    Ok(())
}
