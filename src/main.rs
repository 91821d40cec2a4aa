//! vaultgraph CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vaultgraph_server::Credentials;

mod commands;

#[derive(Parser)]
#[command(name = "vaultgraph")]
#[command(about = "Wikilink graph and backlinks for a markdown vault", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Vault root directory
    #[arg(long, env = "KB_VAULT_PATH", default_value = "./vault", global = true)]
    vault: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "KB_PORT", default_value = "8080")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Basic auth username
        #[arg(long, env = "KB_AUTH_USER", default_value = "admin")]
        auth_user: String,

        /// Basic auth password
        #[arg(long, env = "KB_AUTH_PASS", default_value = "changeme", hide_env_values = true)]
        auth_pass: String,

        /// Serve the API without authentication
        #[arg(long)]
        no_auth: bool,

        /// Directory holding the web client
        #[arg(long, env = "KB_STATIC_DIR", default_value = "./static")]
        static_dir: PathBuf,

        /// Rebuild the graph when files change on disk
        #[arg(short, long)]
        watch: bool,
    },
    /// Build the graph once and print a summary
    Index {
        /// Print the whole graph as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the documents linking to a node id
    Backlinks {
        /// Node id, e.g. `notes/idea.md` or `projects/`
        id: String,
    },
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for command output
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vaultgraph={0},tower_http={0}", log_level)));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("vaultgraph v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Vault: {}", cli.vault.display());

    match cli.command {
        Commands::Serve {
            port,
            host,
            auth_user,
            auth_pass,
            no_auth,
            static_dir,
            watch,
        } => {
            let credentials = (!no_auth).then(|| Credentials::new(auth_user, auth_pass));
            commands::serve(cli.vault, host, port, credentials, static_dir, watch).await
        }
        Commands::Index { json } => commands::index(cli.vault, json),
        Commands::Backlinks { id } => commands::backlinks(cli.vault, &id),
        Commands::Version => {
            println!("vaultgraph v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
