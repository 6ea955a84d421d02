//! # Quill
//!
//! Command-line front end for the Quill blog client.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod config;
mod output;
mod state;
mod telemetry;

use commands::PostsCommand;
use config::{AppConfig, StorageKind};
use state::AppState;
use telemetry::TelemetryConfig;

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Quill blog client: mock auth, posts, search")]
struct Cli {
    /// Storage backend (overrides QUILL_STORAGE)
    #[arg(long, global = true, value_enum)]
    storage: Option<StorageKind>,
    /// Data directory for durable storage (overrides QUILL_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Skip the simulated network latency
    #[arg(long, global = true)]
    no_latency: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and start a session
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Display name (defaults to the part of the email before '@')
        #[arg(long)]
        name: Option<String>,
    },
    /// End the current session
    Logout,
    /// Show the current session
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage posts
    #[command(subcommand)]
    Posts(PostsCommand),
    /// List the category filter options
    Categories,
    /// Render the page at a route path, e.g. /posts/42
    Open { path: String },
}

#[tokio::main]
async fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env();
    if let Some(storage) = cli.storage {
        config.storage = storage;
    }
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if cli.no_latency {
        config = config.without_latency();
    }

    let state = AppState::new(&config).await?;

    match cli.command {
        Commands::Login { email, password } => commands::auth::login(&state, &email, &password).await,
        Commands::Register {
            email,
            password,
            name,
        } => commands::auth::register(&state, &email, &password, name.as_deref()).await,
        Commands::Logout => commands::auth::logout(&state).await,
        Commands::Whoami { json } => commands::auth::whoami(&state, json).await,
        Commands::Posts(command) => commands::posts::run(&state, command).await,
        Commands::Categories => commands::posts::categories(&state).await,
        Commands::Open { path } => commands::open::run(&state, &path).await,
    }
}
