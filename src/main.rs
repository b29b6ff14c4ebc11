use tracing_subscriber::EnvFilter;

use mindquest::config::AppConfig;
use mindquest::server;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,mindquest=debug")),
        )
        .init();

    tracing::info!("MindQuest backend starting...");

    let config = AppConfig::load();

    if let Err(error) = server::serve(config).await {
        tracing::error!("Server error: {:#}", error);
        std::process::exit(1);
    }
}
