// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use evision_node::{
    api::start_server, version, AppState, AudioStore, GoogleTts, ServerConfig, SpeechSynthesizer,
    VisionModelManager,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::parse();
    config.validate().map_err(anyhow::Error::msg)?;
    let addr = config
        .listen_addr()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.port))?;

    println!("🚀 Starting eVision Node...\n");
    println!("📦 BUILD VERSION: {}", version::VERSION);
    println!("📅 Build Date: {}", version::BUILD_DATE);
    println!("🧩 {}", version::get_version_string());
    println!("✨ Features: {}", version::FEATURES.join(", "));
    println!();

    // Static output directory for the published audio
    let audio_store = AudioStore::new(&config.static_dir, config.audio_cache_capacity);
    audio_store
        .ensure_dir()
        .await
        .with_context(|| format!("Cannot create {}", config.static_dir.display()))?;
    println!("✅ Static directory: {}", config.static_dir.display());

    // Vision analyzers; a missing model or binary only disables its endpoint
    println!("🧠 Loading vision models...");
    let vision = VisionModelManager::new(config.vision_config()).await?;
    for model in vision.list_models() {
        if model.available {
            println!("✅ {} ({}) ready", model.name, model.model_type);
        } else {
            println!(
                "⚠️  {} ({}) unavailable - endpoint will answer 503",
                model.name, model.model_type
            );
        }
    }

    let synthesizer = GoogleTts::new(config.tts_config())?;
    println!(
        "✅ Speech synthesizer: {} ({})",
        synthesizer.name(),
        synthesizer.endpoint()
    );

    let state = AppState::new(
        Arc::new(vision),
        Arc::new(synthesizer),
        Arc::new(audio_store),
    )
    .with_config(&config);

    let separator = "=".repeat(60);
    println!("\n{}", separator);
    println!("🎉 eVision Node is running!");
    println!("{}", separator);
    println!("Listen:         http://{}", addr);
    println!("Static dir:     {}", config.static_dir.display());
    println!("\nAPI Endpoints:");
    println!("  Liveness:     http://localhost:{}/", config.port);
    println!("  Health:       http://localhost:{}/health", config.port);
    println!(
        "  Objects:      POST http://localhost:{}/detect_objects",
        config.port
    );
    println!("  Text:         POST http://localhost:{}/detect_text", config.port);
    println!("  Audio:        http://localhost:{}/get_audio", config.port);
    println!("  Audio by id:  http://localhost:{}/get_audio/<id>", config.port);
    println!("\nTest with curl:");
    println!(
        "  curl -F image=@photo.jpg http://localhost:{}/detect_objects",
        config.port
    );
    println!("\nPress Ctrl+C to shutdown...");
    println!("{}\n", separator);

    start_server(state, addr).await?;

    println!("👋 Goodbye!");
    Ok(())
}
