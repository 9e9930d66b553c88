mod config;
mod error;
mod pools;
mod providers;
mod server;

use tracing_subscriber::fmt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    fmt::init();

    let config = config::Settings::load()?;
    let credentials = config::Credentials::from_env();

    // Use configured host/port to bind the server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = server::create_app(&config, credentials)?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Failover proxy running on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
