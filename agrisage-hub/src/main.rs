use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use agrisage_hub::{
    AppState, ContractLedger, DisabledGenerator, FilePreferences, Generator, HttpGenerator,
    MemoryPreferences, PreferencesStorage, RosterState, TelemetrySource,
    config::{Config, GeneratorConfig, PreferencesConfig},
};
use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "agrisage-hub")]
#[command(about = "AgriSage farm hub")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "agrisage-hub.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "agrisage_hub=info".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .init();

    let cli = Cli::parse();

    let config = if cli.config.exists() {
        info!(path = ?cli.config, "Loading configuration");
        Config::load(&cli.config)?
    } else {
        info!("No configuration file found, using defaults");
        Config::default()
    };

    let generator: Arc<dyn Generator> = match &config.generator {
        GeneratorConfig::Http {
            endpoint,
            timeout_secs,
        } => {
            let generator =
                HttpGenerator::new(endpoint.as_str(), std::time::Duration::from_secs(*timeout_secs))?;
            info!(endpoint = %generator.endpoint(), timeout_secs, "Using HTTP generation service");
            Arc::new(generator)
        }
        GeneratorConfig::Disabled => {
            warn!("No generation service configured, advisory requests will fail");
            Arc::new(DisabledGenerator)
        }
    };

    let roster = config.telemetry.roster();
    info!(
        device_count = roster.len(),
        seed = ?config.telemetry.seed,
        outage_probability = config.telemetry.outage_probability,
        "Seeding device roster"
    );
    let telemetry = RosterState::new(roster, config.telemetry.drift(), config.telemetry.seed)
        .with_network_delay(config.telemetry.network_delay());

    let contracts = ContractLedger::new(config.contracts.settle_delay());

    match config.preferences {
        PreferencesConfig::Memory => {
            info!("Using in-memory settings storage");
            let state = AppState {
                telemetry,
                preferences: MemoryPreferences::default(),
                generator,
                contracts,
            };
            run_server(state, config.server.http_addr).await?;
        }
        PreferencesConfig::File { path } => {
            let preferences = FilePreferences::new(path);
            info!(path = ?preferences.path(), "Using file settings storage");
            let state = AppState {
                telemetry,
                preferences,
                generator,
                contracts,
            };
            run_server(state, config.server.http_addr).await?;
        }
    }

    Ok(())
}

async fn run_server<T, P>(state: AppState<T, P>, http_addr: SocketAddr) -> color_eyre::Result<()>
where
    T: TelemetrySource + Clone,
    P: PreferencesStorage + Clone,
{
    let cancel = CancellationToken::new();

    let listener = TcpListener::bind(http_addr).await?;
    info!(%http_addr, "HTTP server listening");

    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = ?e, "Failed to listen for Ctrl+C");
            return;
        }
        info!("Received Ctrl+C, shutting down...");
        shutdown.cancel();
    });

    axum::serve(listener, agrisage_hub::app(state))
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await?;

    info!("HTTP server shut down");
    Ok(())
}
