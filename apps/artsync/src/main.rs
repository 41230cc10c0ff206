//! artsync - synchronize build artifacts across cluster stores
//!
//! This is the CLI application that drives the synchronization pipeline in
//! the ops crate: discover manifests, validate artifacts, assess per-cluster
//! staleness, download once, upload everywhere behind.

mod cli;
mod display;
mod error;
mod events;

use crate::cli::Cli;
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use artsync_config::Config;
use artsync_events::EventReceiver;
use artsync_net::{NetClient, NetConfig};
use artsync_ops::{sync_artifacts, SyncContext, SyncContextBuilder, SyncReport};
use artsync_store::StoreClient;
use artsync_types::ColorChoice;
use clap::Parser;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    // Initialize tracing with JSON awareness
    init_tracing(json_mode, cli.global.debug);

    // Run the application and handle errors
    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        if !json_mode {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting artsync v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration with proper precedence:
    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;

    // 2. Merge environment variables
    config.merge_env()?;

    // 3. Apply CLI flags (highest precedence)
    apply_cli_config(&mut config, &cli);

    config.validate()?;

    // Create event channel
    let (event_sender, event_receiver) = artsync_events::channel();

    // Build sync context
    let ctx = build_sync_context(&config, event_sender)?;

    // Create output renderer and event handler
    let color_choice = cli.global.color.unwrap_or(config.general.color);
    let renderer = OutputRenderer::new(cli.global.json, color_choice);
    let colors_enabled = match color_choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::Term::stdout().features().colors_supported(),
    };
    let mut event_handler = EventHandler::new(colors_enabled, cli.global.debug, cli.global.json);

    // Execute the pipeline with event handling
    let report =
        execute_with_events(&ctx, &cli.project, event_receiver, &mut event_handler).await?;

    // Render final result
    renderer.render_report(&report)?;

    info!("Synchronization completed");
    Ok(())
}

/// Execute the pipeline with concurrent event handling
async fn execute_with_events(
    ctx: &Arc<SyncContext>,
    pattern: &str,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<SyncReport, CliError> {
    let mut sync_future = Box::pin(sync_artifacts(ctx, pattern));

    // Handle events concurrently with pipeline execution
    loop {
        select! {
            // Pipeline completed
            result = &mut sync_future => {
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result.map_err(CliError::from);
            }

            // Event received
            event = event_receiver.recv() => {
                match event {
                    Some(event) => event_handler.handle_event(event),
                    None => { /* Channel closed: keep waiting for the run to finish */ }
                }
            }
        }
    }
}

/// Build the sync context from configuration
fn build_sync_context(
    config: &Config,
    event_sender: artsync_events::EventSender,
) -> Result<Arc<SyncContext>, CliError> {
    let net_config = NetConfig {
        timeout: Duration::from_secs(config.network.timeout),
        connect_timeout: Duration::from_secs(config.network.connect_timeout),
        ..NetConfig::default()
    };
    let net = NetClient::new(&net_config)?;
    let store = StoreClient::new(config.store.tool.clone(), config.store.namespace.clone());
    let principal = resolve_principal(config)?;
    let cwd = std::env::current_dir()?;

    let ctx = SyncContextBuilder::new()
        .with_clusters(config.sync.clusters.clone())
        .with_net(net)
        .with_store(store)
        .with_principal(principal)
        .with_manifest_root(config.sync.manifest_root.clone())
        .with_download_root(config.download_root(&cwd))
        .with_event_sender(event_sender)
        .build()?;

    Ok(Arc::new(ctx))
}

/// Uploading principal: config override, else the invoking user
fn resolve_principal(config: &Config) -> Result<String, CliError> {
    if let Some(principal) = &config.store.principal {
        return Ok(principal.clone());
    }
    std::env::var("USER").map_err(|_| {
        CliError::Setup("no uploading principal: set store.principal or $USER".to_string())
    })
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, cli: &Cli) {
    if let Some(color) = cli.global.color {
        config.general.color = color;
    }
    if let Some(root) = &cli.root_path {
        config.sync.manifest_root = root.clone();
    }
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    // Check if debug logging is enabled
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if json_mode {
        // JSON mode: suppress all console output to avoid contaminating JSON
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else if debug_enabled {
        // Debug mode: structured JSON logs to file
        let log_dir = std::env::temp_dir().join("artsync/logs");
        if let Err(e) = std::fs::create_dir_all(&log_dir) {
            eprintln!("Warning: Failed to create log directory: {e}");
        }

        let log_file = log_dir.join(format!(
            "artsync-{}.log",
            chrono::Utc::now().format("%Y%m%d-%H%M%S")
        ));

        match std::fs::File::create(&log_file) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
                            |_| {
                                tracing_subscriber::EnvFilter::new(
                                    "info,artsync=debug,artsync_ops=debug",
                                )
                            },
                        ),
                    )
                    .init();

                eprintln!("Debug logging enabled: {}", log_file.display());
            }
            Err(e) => {
                eprintln!("Warning: Failed to create log file: {e}");
                // Fallback to stderr
                tracing_subscriber::fmt()
                    .with_env_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
                            |_| tracing_subscriber::EnvFilter::new("info,artsync=info"),
                        ),
                    )
                    .init();
            }
        }
    } else {
        // Normal mode: minimal logging to stderr
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("warn,artsync=warn,artsync_ops=warn")
                }),
            )
            .init();
    }
}
