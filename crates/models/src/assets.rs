use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{ModelConfig, ModelError};

/// Resolved on-disk locations of the encoder pair (model + tokenizer).
#[derive(Debug, Clone)]
pub(crate) struct EncoderAssets {
    pub(crate) model_path: PathBuf,
    pub(crate) tokenizer_path: PathBuf,
}

/// Ensures the encoder model and tokenizer exist locally, downloading them from
/// their pinned URLs when missing.
pub(crate) async fn resolve_encoder_assets(cfg: &ModelConfig) -> Result<EncoderAssets, ModelError> {
    let model_path = ensure_local_file(&cfg.encoder_path, cfg.encoder_url.as_deref(), || {
        ModelError::EncoderNotFound(cfg.encoder_path.display().to_string())
    })
    .await?;

    let tokenizer_target = tokenizer_storage_path(cfg)?;
    let tokenizer_path = ensure_local_file(&tokenizer_target, cfg.tokenizer_url.as_deref(), || {
        ModelError::TokenizerMissing(cfg.encoder_name.clone())
    })
    .await?;

    Ok(EncoderAssets {
        model_path,
        tokenizer_path,
    })
}

/// The classifier is a locally trained artifact; there is no remote source to
/// fall back to, so a missing file is terminal.
pub(crate) fn resolve_classifier_path(cfg: &ModelConfig) -> Result<PathBuf, ModelError> {
    if cfg.classifier_path.exists() {
        Ok(cfg.classifier_path.clone())
    } else {
        Err(ModelError::ClassifierNotFound(
            cfg.classifier_path.display().to_string(),
        ))
    }
}

/// Determines where the tokenizer should be stored. When no explicit path is
/// supplied we infer a filename from the remote URL and place it next to the
/// encoder model.
fn tokenizer_storage_path(cfg: &ModelConfig) -> Result<PathBuf, ModelError> {
    if let Some(path) = &cfg.tokenizer_path {
        return Ok(path.clone());
    }

    if let Some(url) = &cfg.tokenizer_url {
        let inferred_name = infer_filename_from_url(url).unwrap_or_else(|| "tokenizer.json".into());
        let base_dir = cfg
            .encoder_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        return Ok(base_dir.join(inferred_name));
    }

    Err(ModelError::TokenizerMissing(cfg.encoder_name.clone()))
}

/// Returns `target` if it already exists, otherwise attempts to download `remote_url`.
async fn ensure_local_file<F>(
    target: &Path,
    remote_url: Option<&str>,
    on_missing: F,
) -> Result<PathBuf, ModelError>
where
    F: FnOnce() -> ModelError,
{
    if target.exists() {
        return Ok(target.to_path_buf());
    }

    if let Some(url) = remote_url {
        download_to_path(target, url).await?;
        return Ok(target.to_path_buf());
    }

    Err(on_missing())
}

/// Downloads `url` into `target`, creating parent directories as needed.
async fn download_to_path(target: &Path, url: &str) -> Result<(), ModelError> {
    if let Some(parent) = target.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    tracing::info!(url, target = %target.display(), "fetching model asset");

    let response = reqwest::get(url)
        .await
        .map_err(|e| ModelError::Download(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ModelError::Download(format!(
            "unexpected status {} while fetching {}",
            status, url
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ModelError::Download(e.to_string()))?;

    fs::write(target, &bytes)?;
    Ok(())
}

/// Extracts a filename from the provided URL, stripping query/fragment parts.
fn infer_filename_from_url(url: &str) -> Option<String> {
    url.split('/')
        .rev()
        .find(|segment| !segment.is_empty())
        .map(|segment| segment.split(['?', '#']).next().unwrap_or(segment))
        .map(|segment| segment.to_string())
}
