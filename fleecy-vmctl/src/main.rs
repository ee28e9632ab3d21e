use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fleecy_providers::health::HealthProbe;
use fleecy_providers::monitoring::{SimulatedTelemetry, TelemetrySource};
use fleecy_providers::openstack::OpenStackClient;
use fleecy_providers::sync::sync_from_provider;
use fleecy_providers::ComputeProvider;
use serde_json::json;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod config;

use config::Settings;

#[derive(Debug, Parser)]
#[command(name = "fleecy-vmctl", about = "Inspect a participant's OpenStack VMs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Usage metrics (simulated)
    Monitor { instance_id: String },
    #[command(flatten)]
    Cloud(CloudCommand),
}

/// Commands that talk to the OpenStack endpoint.
#[derive(Debug, Subcommand)]
enum CloudCommand {
    /// List all instances with their flavors
    List,
    /// Show one instance
    Get { instance_id: String },
    /// Show one flavor
    Flavor { flavor_id: String },
    /// Health check (never fails, reports the error instead)
    Health { instance_id: String },
    /// Live status and power state
    Status { instance_id: String },
    /// Project instances into VM records for the store
    Sync {
        #[arg(long, env = "FLEECY_PARTICIPANT_ID")]
        participant: Uuid,
    },
    /// Check the VM can take a federated-learning task
    Assign { instance_id: String, task_id: String },
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    // stdout carries the JSON output, logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        // Telemetry is simulated and needs no cloud access.
        Command::Monitor { instance_id } => {
            let metrics = SimulatedTelemetry
                .instance_metrics(&instance_id)
                .await
                .context("collecting metrics failed")?;
            print_json(&metrics)
        }
        Command::Cloud(command) => run_cloud(command).await,
    }
}

async fn run_cloud(command: CloudCommand) -> Result<()> {
    let settings = Settings::from_env().context("invalid OpenStack configuration")?;
    let client = OpenStackClient::new(settings.client.clone())
        .context("failed to build OpenStack HTTP client")?;
    let credential = &settings.credential;

    match command {
        CloudCommand::List => {
            let instances = client
                .list_instances(credential)
                .await
                .context("listing instances failed")?;
            print_json(&instances)?;
        }
        CloudCommand::Get { instance_id } => {
            let instance = client
                .get_instance(credential, &instance_id)
                .await
                .with_context(|| format!("fetching instance {} failed", instance_id))?;
            print_json(&instance)?;
        }
        CloudCommand::Flavor { flavor_id } => {
            let token = client
                .authenticate(credential)
                .await
                .context("could not obtain a token")?;
            let flavor = client
                .get_flavor(credential, &token, &flavor_id)
                .await
                .with_context(|| format!("fetching flavor {} failed", flavor_id))?;
            print_json(&flavor)?;
        }
        CloudCommand::Health { instance_id } => {
            let result = HealthProbe::new(&client)
                .check(credential, &instance_id)
                .await;
            print_json(&result)?;
        }
        CloudCommand::Status { instance_id } => {
            let info = client
                .runtime_status(credential, &instance_id)
                .await
                .with_context(|| format!("fetching status of {} failed", instance_id))?;
            print_json(&info)?;
        }
        CloudCommand::Sync { participant } => {
            let records = sync_from_provider(&client, credential, participant)
                .await
                .context("syncing instances failed")?;
            print_json(&records)?;
        }
        CloudCommand::Assign {
            instance_id,
            task_id,
        } => {
            let instance = client
                .ensure_ready_for_task(credential, &instance_id)
                .await
                .with_context(|| format!("instance {} cannot take task {}", instance_id, task_id))?;
            tracing::info!("Instance {} is ready for task {}", instance.id, task_id);
            print_json(&json!({
                "task_id": task_id,
                "instance_id": instance.id,
                "status": instance.status,
            }))?;
        }
    }

    Ok(())
}
