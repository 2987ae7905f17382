//! Bugtrack CLI - serve the bug tracker HTTP API

use bugtrack::config;
use bugtrack::storage::SqliteStore;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "bugtrack")]
#[command(version = "0.1.0")]
#[command(about = "Bug tracker HTTP API - users, bugs, and comments over SQLite")]
#[command(long_about = r#"
Bugtrack persists users, bugs, and comments in SQLite and serves a JSON API:
  • POST /users, POST /bugs, GET /bugs?status=open
  • PUT /bugs/{id}/assign
  • POST /bugs/{bug_id}/comments, GET /bugs/{bug_id}/comments

Example usage:
  bugtrack init
  bugtrack serve --port 3000
  bugtrack stats --database bugtrack.db
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Path to the database file (overrides the config file)
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Port to listen on (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a bugtrack.toml config file
    Init {
        /// Database path to record in the config
        #[arg(short, long, default_value = "bugtrack.db")]
        database: String,

        /// Port to record in the config
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show row counts for a database
    Stats {
        /// Path to the database file
        #[arg(short, long, default_value = "bugtrack.db")]
        database: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Serve { database, port, config: config_path } => {
            let file_config = config::load_config(config_path.as_deref())?.unwrap_or_default();
            let database = database
                .or_else(|| file_config.database.as_ref().map(PathBuf::from))
                .unwrap_or_else(config::default_database_path);
            let port = port.or(file_config.port).unwrap_or(3000);

            config::ensure_db_dir(&database)?;
            tracing::info!("Serving {} on port {}", database.display(), port);
            bugtrack::server::start_server(port, database).await?;
        }

        Commands::Init { database, port, force } => {
            let path = config::default_config_path();
            let cfg = config::BugtrackConfig {
                database: Some(database),
                port: Some(port),
            };
            config::write_config(&path, &cfg, force)?;
            println!("✅ Wrote {}", path.display());
        }

        Commands::Stats { database } => {
            let store = SqliteStore::open(&database)?;
            let stats = store.stats()?;

            println!("📊 Bugtrack Statistics ({:?})", database);
            println!("------------------------------------");
            println!("{}", stats);
        }
    }

    Ok(())
}
