use std::sync::Arc;

use dotenv::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod shell;

use shared_config::ApiConfig;
use shared_http::{ApiClient, SessionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting MediBook client");

    // Load configuration and build the one API client every cell shares.
    let config = ApiConfig::from_env();
    let session = Arc::new(SessionStore::new());
    let api = Arc::new(ApiClient::new(&config, Arc::clone(&session)));

    let mut shell = shell::Shell::new(api);

    println!("MediBook hospital appointment client. Type 'help' for commands.");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        shell.print_prompt();
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if !shell.handle(&line, &mut lines).await {
            break;
        }
    }

    Ok(())
}
