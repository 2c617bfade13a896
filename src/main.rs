//! Calorie Tracker
//!
//! An MCP server for calorie, meal and workout tracking.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use calorie_tracker::config::Config;
use calorie_tracker::mcp::CalorieTrackerService;
use calorie_tracker::{build_info, db};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr, stdout carries the MCP stream
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("calorie_tracker=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = Config::from_env();
    eprintln!("Database path: {}", config.database_path.display());

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    eprintln!("Initializing database...");
    let database = db::Database::new(&config.database_path)?;

    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;

    let service = CalorieTrackerService::new(config.database_path.clone(), database);

    if let Some(user_id) = &config.user_id {
        match service.sign_in_on_startup(user_id) {
            Ok(onboarded) => tracing::info!(user_id = %user_id, onboarded, "signed in from environment"),
            Err(e) => tracing::warn!(user_id = %user_id, error = %e, "could not sign in from environment"),
        }
    }

    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
