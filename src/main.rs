use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use voxlattice::{
    GeminiLiveConnector, ServerConfig, VoiceCatalog, routes, state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; RUST_LOG wins over LOG_LEVEL
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Initialize crypto provider for TLS connections
    // This must be done before any TLS connections are attempted
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install default crypto provider"))?;

    // Handle CLI arguments
    let mut args = env::args();
    let _ = args.next();
    let mut config_path: Option<PathBuf> = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                config_path = Some(PathBuf::from(path));
            }
            other => {
                anyhow::bail!("Unknown option '{other}'. Use --config <file.yaml>");
            }
        }
    }

    // Load configuration
    let config = match &config_path {
        Some(path) => ServerConfig::from_file(path),
        None => ServerConfig::from_env(),
    }
    .map_err(|e| anyhow!(e.to_string()))?;

    // Load voice catalog, falling back to the built-in voices
    let voices_path = config.voices_file();
    let voices = VoiceCatalog::load_or_default(&voices_path)
        .map_err(|e| anyhow!("load voices failed: {e}"))?;
    tracing::info!(
        source = %voices.source(),
        count = voices.len(),
        path = %voices_path.display(),
        "Voices loaded"
    );
    tracing::info!("Supported voices: {:?}", voices.names());

    let address = config.address();
    tracing::info!(model = config.model(), "Using Gemini model");
    if config.fallback_api_key().is_none() {
        tracing::warn!("GEMINI_API_KEY not set; requests must supply their own key");
    }

    // Create application state
    let app_state = AppState::new(config, voices, Arc::new(GeminiLiveConnector::new()));

    let app = routes::api::create_api_router().with_state(app_state);

    // Create listener
    let listener = TcpListener::bind(&address).await?;

    println!("Voxlattice listening on {address}");

    // Start server
    axum::serve(listener, app).await?;

    Ok(())
}
