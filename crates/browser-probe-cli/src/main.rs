use std::sync::Arc;

use clap::{Parser, Subcommand};

use browser_probe_core::{Config, TestStatus};
use browser_probe_runner::{BrowserBackend, CdpBackend, ConnectivityTest, ResultStore};
use browser_probe_server::AppState;

#[derive(Parser)]
#[command(
    name = "browser-probe",
    about = "Connectivity probe for a remote WebSocket browser service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the status server (runs the connectivity test on startup)
    Serve {
        /// Port to listen on (default: PORT env or 3000)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run the connectivity test once and print the result as JSON
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    let mut config = Config::from_env();
    let backend: Arc<dyn BrowserBackend> = Arc::new(CdpBackend::new());

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            let port = config.port;
            tracing::info!("Starting browser-probe status server on port {port}");
            let state = Arc::new(AppState::new(config, backend));
            browser_probe_server::start_server(state, port).await?;
        }
        Commands::Check => {
            let store = Arc::new(ResultStore::new());
            let runner = ConnectivityTest::new(Arc::new(config), backend, store.clone());
            runner.run().await;

            let result = store.current().await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            if result.status != TestStatus::Success {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
