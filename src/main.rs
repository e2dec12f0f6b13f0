use doc_summarizer::{
    api::{build_router, AppState},
    observability::init_tracing,
    Config, SummaryService,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    init_tracing(&config.logging);

    let service = SummaryService::from_config(&config.summarizer)?;
    info!("Summary mode: {:?}", service.mode());

    let router = build_router(AppState::new(service), &config.server);

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Server listening on {}", address);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
}
