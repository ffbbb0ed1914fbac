use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shotvault_config::{CONFIG_ENV_VAR, load, resolve_config_path};
use shotvault_core::paths::PublishPathBuilder;
use shotvault_core::proxy::ProxyEncoder;
use shotvault_core::publish::{PublishOrchestrator, PublishRequest};
use shotvault_core::version::next_version;

#[derive(Parser)]
#[command(name = "shotvaultctl", about = "Versioned publish driver for rendered assets")]
struct Cli {
    /// Convention-table TOML file; falls back to $SHOTVAULT_CONFIG
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Publish an asset into the versioned layout and print the tracking
    /// payload as JSON
    Publish {
        #[arg(long)]
        shot: String,
        #[arg(long)]
        task: String,
        /// Single file, one frame of a sequence, or the sequence directory
        #[arg(long)]
        original: String,
        /// Explicit preview movie
        #[arg(long)]
        proxy: Option<String>,
        /// Skip encoding a preview proxy for sequences
        #[arg(long)]
        no_auto_proxy: bool,
    },
    /// List the tasks defined in the convention table
    Tasks,
    /// Show the next version number for a shot/task pair
    NextVersion {
        #[arg(long)]
        shot: String,
        #[arg(long)]
        task: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config).with_context(|| {
        format!("no convention table given; pass --config or set ${CONFIG_ENV_VAR}")
    })?;
    let config = load(&config_path)?;

    match cli.command {
        Command::Publish {
            shot,
            task,
            original,
            proxy,
            no_auto_proxy,
        } => {
            let encoder = ProxyEncoder::new(config.ffmpeg.path.clone())
                .with_timeout(config.ffmpeg.timeout());
            let orchestrator = PublishOrchestrator::with_encoder(&config.table, encoder);
            let request = PublishRequest {
                shot_code: shot,
                task_name: task,
                original_path: original,
                proxy_path: proxy,
                auto_proxy: !no_auto_proxy,
            };
            let result = orchestrator
                .publish(&request)
                .await
                .context("publish failed")?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Tasks => {
            for name in config.table.task_names() {
                println!("{name}");
            }
        }
        Command::NextVersion { shot, task } => {
            let convention = config.table.convention(&task)?;
            let builder = PublishPathBuilder::new(&config.table);
            let output_dir = builder.output_dir(&shot)?;
            let task_dir = builder.task_dir(&output_dir, convention)?;
            println!("{}", next_version(convention, &task_dir)?);
        }
    }

    Ok(())
}
