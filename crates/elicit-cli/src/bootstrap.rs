use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use elicit_config::ElicitConfig;
use elicit_embeddings::EmbeddingEngine;
use elicit_engine::EngineContext;

use crate::cli::GlobalFlags;
use crate::progress::Progress;

/// Load layered configuration (with `.env`) and apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<ElicitConfig> {
    let mut config = ElicitConfig::load_with_dotenv().context("failed to load configuration")?;
    if let Some(dir) = &flags.artifacts {
        config.artifacts.dir = dir.to_string_lossy().into_owned();
    }
    Ok(config)
}

/// Load the encoder and every artifact off the async runtime.
///
/// The first run also embeds all symptom descriptions and writes the
/// embedding cache, which is the slow part the spinner covers.
pub async fn build_context(config: &ElicitConfig) -> anyhow::Result<Arc<EngineContext>> {
    let config = config.clone();
    let progress = Progress::spinner("Loading embedding model and symptom artifacts");

    let result = tokio::task::spawn_blocking(move || -> anyhow::Result<EngineContext> {
        let embeddings = &config.embeddings;
        let cache_dir = embeddings
            .has_cache_dir()
            .then(|| PathBuf::from(&embeddings.cache_dir));
        let embedder = EmbeddingEngine::from_name(
            &embeddings.model,
            cache_dir,
            embeddings.show_download_progress,
        )
        .context("failed to initialize embedding engine")?;

        let ctx = EngineContext::from_config(&config, Arc::new(embedder))?;
        Ok(ctx)
    })
    .await
    .context("engine initialization task panicked")?;

    match result {
        Ok(ctx) => {
            progress.finish_clear();
            tracing::debug!(?ctx, "engine ready");
            Ok(Arc::new(ctx))
        }
        Err(error) => {
            progress.finish_err("failed to load engine");
            Err(error)
        }
    }
}
