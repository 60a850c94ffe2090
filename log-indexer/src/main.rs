use std::env;
use std::process;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use log_indexer::{run_until_shutdown, Dependencies, IndexerConfig, IndexingError};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run() -> Result<(), IndexingError> {
    let config = IndexerConfig::from_env()?;
    let dependencies = Dependencies::new(config).await?;

    let summary =
        run_until_shutdown(dependencies.orchestrator.run(), tokio::signal::ctrl_c()).await?;
    info!(
        sources = summary.sources,
        streams = summary.streams,
        pages = summary.pages,
        documents = summary.documents,
        "Log indexing finished"
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();

    if let Err(e) = run().await {
        error!(error = %e, "Log indexer failed");
        eprintln!("Error: {}", e);

        if let Some(body) = e.response_body() {
            match serde_json::from_str::<serde_json::Value>(body) {
                Ok(json) => eprintln!(
                    "{}",
                    serde_json::to_string_pretty(&json).unwrap_or_else(|_| body.to_string())
                ),
                Err(_) => eprintln!("{}", body),
            }
        }

        process::exit(1);
    }
}
