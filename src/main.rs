// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Context, Result};
use assis_detect::{
    api::{start_server, AppState},
    auth::{AuthGate, CredentialStore, TokenIssuer},
    cli::Cli,
    config::{DetectorConfig, FetchConfig, ServerConfig},
    vision::{
        detection::{classes::coco_labels, load_labels},
        Detector, ImageAcquirer, YoloDetector,
    },
};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let mut server_config = ServerConfig::from_env();
    let mut detector_config = DetectorConfig::from_env();
    let fetch_config = FetchConfig::from_env();
    cli.apply(&mut server_config, &mut detector_config);

    // Initialize tracing subscriber for logging
    let default_level = if server_config.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    println!("🚀 Starting assis-detect...\n");
    println!("📦 BUILD VERSION: {}", assis_detect::version::VERSION);
    println!("📅 Build Date: {}", assis_detect::version::BUILD_DATE);
    println!();

    server_config
        .validate()
        .map_err(|e| anyhow!("Invalid server configuration: {}", e))?;
    detector_config
        .validate()
        .map_err(|e| anyhow!("Invalid detector configuration: {}", e))?;
    fetch_config
        .validate()
        .map_err(|e| anyhow!("Invalid fetch configuration: {}", e))?;

    if server_config.uses_default_secret() {
        warn!("SECRET_KEY not set; signing session tokens with the built-in default");
    }

    // Auth gate
    let credentials = CredentialStore::with_extra_users(server_config.auth_users.as_deref())
        .map_err(|e| anyhow!("Invalid AUTH_USERS: {}", e))?;
    info!("Loaded {} account(s)", credentials.len());
    let tokens = TokenIssuer::new(
        &server_config.secret_key,
        chrono::Duration::hours(server_config.token_ttl_hours),
    );
    let auth = AuthGate::new(credentials, tokens);

    // Detector
    let labels = match &detector_config.labels_path {
        Some(path) => load_labels(path)?,
        None => coco_labels(),
    };
    println!("🧠 Loading detection model...");
    let detector = YoloDetector::new(
        &detector_config.model_path,
        detector_config.params.clone(),
        labels,
    )
    .with_context(|| {
        format!(
            "Failed to load detection model from {}",
            detector_config.model_path.display()
        )
    })?;
    println!("✅ Detection model loaded: {}", detector_config.model_name());
    let detector: Arc<dyn Detector> = Arc::new(detector);

    let acquirer = ImageAcquirer::new(&fetch_config).context("Failed to build HTTP client")?;

    let state = AppState::new(auth, acquirer, detector, detector_config.model_name());
    let addr = server_config
        .bind_addr()
        .map_err(|e| anyhow!(e))?;

    println!("🌐 Serving on http://{}", addr);
    start_server(addr, state).await?;

    println!("👋 Goodbye!");
    Ok(())
}
