use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use dailywords::config::Config;
use dailywords::server::{self, AppState};
use dailywords::storage::{Database, DatabaseError};

/// Get the config directory path (~/.config/dailywords/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let config_dir = PathBuf::from(home).join(".config").join("dailywords");
    Ok(config_dir)
}

#[derive(Parser, Debug)]
#[command(name = "dailywords", about = "Vocabulary backend with a daily practice set")]
struct Args {
    /// Config file (default: ~/.config/dailywords/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// SQLite database file, overrides `database_path`
    #[arg(long, value_name = "FILE")]
    database: Option<PathBuf>,

    /// Address to listen on, overrides `bind_address`
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,

    /// Reset database (delete and recreate)
    #[arg(long)]
    reset_db: bool,

    /// Don't insert the starter dictionary into an empty database
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        tracing::info!(path = %config_dir.display(), "Created config directory");
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    tracing::debug!(?config, "Effective configuration");

    let db_path = args
        .database
        .clone()
        .or_else(|| config.database_path.clone())
        .unwrap_or_else(|| config_dir.join("dictionary.db"));

    if args.reset_db && db_path.exists() {
        std::fs::remove_file(&db_path).context("Failed to delete database")?;
        tracing::info!(path = %db_path.display(), "Database reset");
    }

    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(DatabaseError::InstanceLocked) => {
            eprintln!("Error: {}", DatabaseError::InstanceLocked);
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to open database: {}", e));
        }
    };

    if config.seed_on_empty && !args.no_seed {
        db.seed_defaults()
            .await
            .context("Failed to seed dictionary")?;
    }
    let count = db.count().await.context("Failed to count entries")?;
    tracing::info!(entries = count, path = %db_path.display(), "Dictionary loaded");

    let state = AppState::new(db.clone(), config.quotas(), config.admin_token());
    let address = args.bind.unwrap_or(config.bind_address);

    let result = server::serve(state, &address).await;
    db.close().await;
    result
}
