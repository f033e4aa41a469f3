//! Init-once holder for the loaded model pair.
//!
//! The original surfaces loaded models at different points (first UI access vs.
//! process start). This registry replaces both with one explicit resource: the
//! first [`ModelRegistry::get_or_load`] performs the load, and the outcome,
//! success or failure, is cached for the process lifetime. A failed load stays
//! failed; there is no retry and no fallback model.

use std::sync::Arc;

use models::{ModelConfig, ModelError, SentimentModels};
use tokio::sync::OnceCell;

/// Where the registry currently stands. Exposed to callers (readiness probes)
/// instead of relying on load-time side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// No load attempted yet.
    NotLoaded,
    /// Models resident and usable.
    Ready,
    /// The one permitted load attempt failed.
    Failed,
}

impl Readiness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Readiness::NotLoaded => "not_loaded",
            Readiness::Ready => "ready",
            Readiness::Failed => "failed",
        }
    }
}

/// Process-wide, initialization-once handle to the encoder/classifier pair.
pub struct ModelRegistry {
    cfg: ModelConfig,
    cell: OnceCell<Result<Arc<SentimentModels>, ModelError>>,
}

impl ModelRegistry {
    pub fn new(cfg: ModelConfig) -> Self {
        Self {
            cfg,
            cell: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.cfg
    }

    /// Load the models on first call; afterwards return the cached handle or
    /// the cached failure. Concurrent first calls are coalesced into a single
    /// load.
    pub async fn get_or_load(&self) -> Result<Arc<SentimentModels>, ModelError> {
        let outcome = self
            .cell
            .get_or_init(|| async {
                match SentimentModels::load(&self.cfg).await {
                    Ok(models) => Ok(Arc::new(models)),
                    Err(err) => {
                        tracing::error!(error = %err, "model load failed");
                        Err(err)
                    }
                }
            })
            .await;

        outcome.clone()
    }

    /// Current registry state without triggering a load.
    pub fn readiness(&self) -> Readiness {
        match self.cell.get() {
            None => Readiness::NotLoaded,
            Some(Ok(_)) => Readiness::Ready,
            Some(Err(_)) => Readiness::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub_cfg() -> ModelConfig {
        ModelConfig {
            mode: "stub".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn starts_not_loaded() {
        let registry = ModelRegistry::new(stub_cfg());
        assert_eq!(registry.readiness(), Readiness::NotLoaded);
    }

    #[tokio::test]
    async fn successful_load_becomes_ready() {
        let registry = ModelRegistry::new(stub_cfg());
        registry.get_or_load().await.unwrap();
        assert_eq!(registry.readiness(), Readiness::Ready);
    }

    #[tokio::test]
    async fn repeated_loads_share_one_handle() {
        let registry = ModelRegistry::new(stub_cfg());
        let first = registry.get_or_load().await.unwrap();
        let second = registry.get_or_load().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn failed_load_is_cached() {
        // ONNX mode with no local files and no download URLs fails at load.
        let cfg = ModelConfig {
            mode: "onnx".into(),
            encoder_path: "./missing/encoder.onnx".into(),
            encoder_url: None,
            tokenizer_path: Some("./missing/tokenizer.json".into()),
            tokenizer_url: None,
            classifier_path: "./missing/classifier.onnx".into(),
            ..Default::default()
        };
        let registry = ModelRegistry::new(cfg);

        let first = registry.get_or_load().await.unwrap_err();
        assert_eq!(registry.readiness(), Readiness::Failed);

        // Second call surfaces the same failure without retrying.
        let second = registry.get_or_load().await.unwrap_err();
        assert_eq!(format!("{first}"), format!("{second}"));
        assert_eq!(registry.readiness(), Readiness::Failed);
    }

    #[test]
    fn readiness_strings() {
        assert_eq!(Readiness::NotLoaded.as_str(), "not_loaded");
        assert_eq!(Readiness::Ready.as_str(), "ready");
        assert_eq!(Readiness::Failed.as_str(), "failed");
    }
}
