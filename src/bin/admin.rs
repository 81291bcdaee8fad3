//! CLI administration tool for the short URL service.
//!
//! Inspects and extends the mapping store without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Number of stored mappings and the next id to be assigned
//! cargo run --bin admin -- stats
//!
//! # Show the original URL behind a short id
//! cargo run --bin admin -- lookup 42
//!
//! # Show the short id of an original URL
//! cargo run --bin admin -- find https://example.com
//!
//! # Create (or fetch) a mapping, with the same validation as the API
//! cargo run --bin admin -- shorten https://example.com
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Read through the same configuration as the server:
//!
//! - `DATABASE_URL`, or `DB_HOST` / `DB_PORT` / `DB_USER` / `DB_PASSWORD` / `DB_NAME`
//! - `DNS_TIMEOUT_MS` (optional): host lookup timeout for `shorten` (default: 5000)

use shorturl_service::application::services::ShortUrlService;
use shorturl_service::config::Config;
use shorturl_service::domain::entities::UrlMapping;
use shorturl_service::domain::repositories::UrlRepository;
use shorturl_service::infrastructure::dns::DnsHostResolver;
use shorturl_service::infrastructure::persistence::PgUrlRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

/// CLI tool for managing the short URL service.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Show mapping statistics
    Stats,

    /// Show the original URL for a short id
    Lookup {
        /// Short id as shown in `short_url`
        short_id: String,
    },

    /// Show the short id for an original URL (exact match)
    Find {
        /// Original URL exactly as submitted
        url: String,
    },

    /// Create or fetch the short id for a URL
    Shorten {
        /// URL to shorten
        url: String,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL (or DB_USER, DB_PASSWORD, DB_NAME) must be set")?;
    let dns_timeout = Duration::from_millis(config.dns_timeout_ms);

    let pool = PgPool::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    let repository = Arc::new(PgUrlRepository::new(Arc::new(pool.clone())));

    match cli.command {
        Commands::Stats => handle_stats(repository.as_ref()).await?,
        Commands::Lookup { short_id } => handle_lookup(repository, dns_timeout, &short_id).await?,
        Commands::Find { url } => handle_find(repository.as_ref(), &url).await?,
        Commands::Shorten { url } => handle_shorten(repository, dns_timeout, &url).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn service(repository: Arc<PgUrlRepository>, dns_timeout: Duration) -> ShortUrlService {
    ShortUrlService::new(repository, Arc::new(DnsHostResolver::new(dns_timeout)))
}

fn print_mapping(mapping: &UrlMapping) {
    println!(
        "  {:<10} {}",
        "Short id:".bright_white().bold(),
        mapping.short_id.to_string().bright_green().bold()
    );
    println!(
        "  {:<10} {}",
        "URL:".bright_white().bold(),
        mapping.original_url.cyan()
    );
    println!(
        "  {:<10} {}",
        "Created:".bright_white().bold(),
        mapping
            .created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
    println!();
}

/// Displays the mapping count and the next id the service would assign.
async fn handle_stats(repository: &impl UrlRepository) -> Result<()> {
    println!("{}", "📊 Mapping Statistics".bright_blue().bold());
    println!();

    let count = repository
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count mappings: {}", e))?;

    println!(
        "  Mappings:  {}",
        count.to_string().bright_green().bold()
    );
    println!(
        "  Next id:   {}",
        (count + 1).to_string().bright_white()
    );
    println!();

    Ok(())
}

/// Resolves a short id the same way the redirect endpoint does.
async fn handle_lookup(
    repository: Arc<PgUrlRepository>,
    dns_timeout: Duration,
    short_id: &str,
) -> Result<()> {
    match service(repository, dns_timeout).resolve(short_id).await {
        Ok(mapping) => print_mapping(&mapping),
        Err(shorturl_service::AppError::NotFound(_)) => {
            println!("{}", format!("❌ No mapping for short id {short_id}").red());
        }
        Err(e) => anyhow::bail!("Lookup failed: {}", e),
    }

    Ok(())
}

async fn handle_find(repository: &impl UrlRepository, url: &str) -> Result<()> {
    let mapping = repository
        .find_by_original_url(url)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    match mapping {
        Some(mapping) => print_mapping(&mapping),
        None => println!("{}", "❌ URL has not been shortened".red()),
    }

    Ok(())
}

async fn handle_shorten(
    repository: Arc<PgUrlRepository>,
    dns_timeout: Duration,
    url: &str,
) -> Result<()> {
    let mapping = service(repository, dns_timeout)
        .shorten(url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to shorten URL: {}", e))?;

    println!("{}", "✅ Short URL ready".green().bold());
    println!();
    print_mapping(&mapping);

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrated: bool = sqlx::query_scalar(
                "SELECT EXISTS (SELECT 1 FROM information_schema.tables WHERE table_name = 'url_mappings')",
            )
            .fetch_one(pool)
            .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!(
                "  Schema:     {}",
                if migrated {
                    "migrated".green()
                } else {
                    "not migrated (start the server once)".yellow()
                }
            );
            println!();
        }
    }

    Ok(())
}
