use clap::Parser;
use log::{error, info, warn};
use matter_entity_discovery::config::Config;
use matter_entity_discovery::discovery::{DiscoveryMode, Platform};
use matter_entity_discovery::matter::MatterNode;
use matter_entity_discovery::{MatterAdapter, MatterEvent, Result};
use std::path::PathBuf;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tokio::sync::mpsc;

/// Discover entities on Matter node dumps and replay attribute events.
#[derive(Parser, Debug)]
#[command(name = "matter-discovery", version)]
struct Args {
    /// JSON config file
    #[arg(long, env = "MATTER_DISCOVERY_CONFIG")]
    config: Option<PathBuf>,

    /// Discovery mode (first_match or all_matches)
    #[arg(long)]
    mode: Option<DiscoveryMode>,

    /// JSON-lines file of node events to replay after the nodes are added
    #[arg(long)]
    events: Option<PathBuf>,

    /// Node dump files
    #[arg(required = true)]
    nodes: Vec<PathBuf>,
}

fn init_logger(default_filter: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?.with_env_overrides(),
        None => Config::from_env(),
    };
    if let Some(mode) = args.mode {
        config.discovery.mode = mode;
    }
    Ok(config)
}

fn print_json(value: &impl serde::Serialize) {
    match serde_json::to_string(value) {
        Ok(line) => println!("{}", line),
        Err(e) => warn!("Failed to serialize output: {}", e),
    }
}

async fn run(args: Args, config: Config) -> Result<()> {
    let adapter = Arc::new(MatterAdapter::from_config(&config));

    for platform in Platform::iter() {
        adapter.register_platform_handler(platform, |batch| {
            for entity in &batch {
                print_json(entity);
            }
        });
    }
    adapter.subscribe_state(|update| print_json(update));

    let (tx, rx) = mpsc::channel(64);
    let runner = {
        let adapter = adapter.clone();
        tokio::spawn(async move { adapter.run(rx).await })
    };

    for path in &args.nodes {
        let node = MatterNode::from_file(path)?;
        info!("Loaded node {} from {}", node.node_id, path.display());
        if tx.send(MatterEvent::NodeAdded { node }).await.is_err() {
            warn!("Event channel closed");
        }
    }

    if let Some(path) = &args.events {
        let content = tokio::fs::read_to_string(path).await?;
        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match serde_json::from_str::<MatterEvent>(line) {
                Ok(event) => {
                    if tx.send(event).await.is_err() {
                        warn!("Event channel closed");
                        break;
                    }
                }
                Err(e) => warn!("{}:{}: invalid event: {}", path.display(), lineno + 1, e),
            }
        }
    }

    drop(tx);
    if let Err(e) = runner.await {
        error!("Adapter task failed: {}", e);
    }

    info!("{} entities tracked", adapter.entities().len());
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            init_logger("info");
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    init_logger(&config.logging.default_filter);
    config.report_ignored_overrides();
    info!("Starting Matter entity discovery");
    info!("  Discovery mode: {}", config.discovery.mode);

    if let Err(e) = run(args, config).await {
        error!("{}", e);
        std::process::exit(1);
    }
}
