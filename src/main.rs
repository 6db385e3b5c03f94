/// Main entry point for the Productivity Quest MCP server
///
/// Sets up logging, parses command line arguments, signs the user in and
/// serves JSON-RPC over stdin/stdout.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use productivity_quest::{Plan, ProductivityServer, UserId};

/// User id for a single-user install when `--user` is not given
const DEFAULT_USER: &str = "local";

/// Get the default database path with robust fallback strategy
fn get_default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    // In order of preference
    let potential_paths = [
        dirs::home_dir().map(|mut p| {
            p.push(".productivity_quest");
            p
        }),
        dirs::data_dir().map(|mut p| {
            p.push("productivity_quest");
            p
        }),
        dirs::config_dir().map(|mut p| {
            p.push("productivity_quest");
            p
        }),
        std::env::current_dir().ok().map(|mut p| {
            p.push(".productivity_quest");
            p
        }),
    ];

    for potential_path in potential_paths.iter().flatten() {
        if std::fs::create_dir_all(potential_path).is_ok() {
            // Only use a directory we can actually write to
            let test_file = potential_path.join(".test_write");
            if std::fs::write(&test_file, "test").is_ok() {
                let _ = std::fs::remove_file(&test_file);
                return Ok(potential_path.join("productivity.db"));
            }
        }
    }

    let mut temp_path = std::env::temp_dir();
    temp_path.push("productivity_quest");
    std::fs::create_dir_all(&temp_path)?;
    temp_path.push("productivity.db");

    tracing::warn!("Using temporary directory for database: {}", temp_path.display());
    Ok(temp_path)
}

/// Command line arguments for the Productivity Quest MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long)]
    database: Option<PathBuf>,

    /// Serve the built-in demo dataset from memory instead of a database
    #[arg(long, conflicts_with = "database")]
    demo: bool,

    /// User to sign in as; a random id is generated in demo mode
    #[arg(long)]
    user: Option<String>,

    /// Subscription plan deciding the feature limits (free or pro)
    #[arg(long, default_value_t = Plan::Free)]
    plan: Plan,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("productivity_quest={}", log_level))
        .with_writer(std::io::stderr) // stdout carries JSON-RPC
        .init();

    info!("Starting Productivity Quest MCP server on the {} plan", args.plan);

    let server = if args.demo {
        let user = args.user.as_deref().map(UserId::from).unwrap_or_default();
        ProductivityServer::demo(user, args.plan)?
    } else {
        let db_path = match args.database {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                path
            }
            None => get_default_database_path()?,
        };
        info!("Using database at: {}", db_path.display());

        let user = UserId::from(args.user.as_deref().unwrap_or(DEFAULT_USER));
        ProductivityServer::open(db_path, user, args.plan)?
    };

    server.run().await?;

    info!("Productivity Quest MCP server shutdown complete");
    Ok(())
}
