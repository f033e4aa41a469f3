//! Pretrained model adapters for hotel review sentiment.
//!
//! Two opaque artifacts drive the whole system:
//!
//! - **Encoder** - a multilingual sentence encoder (ONNX) mapping raw text to
//!   512-dimension vectors. Fetched from a version-pinned URL when not on disk.
//! - **Classifier** - a locally trained recurrent network (ONNX export) mapping
//!   one `(batch, 1, 512)` tensor to a scalar sentiment score in [0,1].
//!
//! [`SentimentModels::load`] resolves both artifacts eagerly so a missing or
//! corrupt file fails at startup, not on the first request. After that the
//! handle is cheap to share: ONNX sessions are cached per-thread and the
//! loaded weights are read-only for the process lifetime.
//!
//! A `"stub"` mode swaps both models for deterministic hash-derived
//! implementations so the pipeline and HTTP stack stay testable without
//! assets.
//!
//! ## Quick example
//!
//! ```no_run
//! use models::{ModelConfig, SentimentModels};
//!
//! #[tokio::main]
//! async fn main() {
//!     let cfg = ModelConfig::default();
//!     let models = SentimentModels::load(&cfg).await.unwrap();
//!
//!     let embeddings = models.embed(&["The room was lovely."]).unwrap();
//!     let tensor = models.reshape(embeddings).unwrap();
//!     let scores = models.score(tensor).unwrap();
//!     println!("score = {}", scores[0]);
//! }
//! ```

pub mod config;
pub mod error;

mod assets;
mod cache;
mod classifier;
mod encoder;
mod stub;

pub use crate::config::ModelConfig;
pub use crate::error::ModelError;

pub use onnxruntime::ndarray::Array3;

use onnxruntime::ndarray::Array;
use std::path::PathBuf;

use crate::assets::{resolve_classifier_path, resolve_encoder_assets, EncoderAssets};
use crate::cache::{get_or_load_classifier, get_or_load_encoder};
use crate::classifier::run_classifier;
use crate::encoder::run_encoder;
use crate::stub::{stub_embedding, stub_score};

#[derive(Debug)]
enum Backend {
    Onnx {
        encoder: EncoderAssets,
        classifier: PathBuf,
    },
    Stub,
}

/// Shared, read-only handle to the loaded encoder/classifier pair.
///
/// The handle itself holds only resolved asset paths; the actual ONNX sessions
/// live in per-thread caches, so `SentimentModels` is `Send + Sync` and can sit
/// behind an `Arc` in server state.
#[derive(Debug)]
pub struct SentimentModels {
    cfg: ModelConfig,
    backend: Backend,
}

impl SentimentModels {
    /// Resolve all model assets and construct the ONNX sessions once.
    ///
    /// Downloads the encoder model/tokenizer from their pinned URLs when the
    /// local files are missing. The classifier must already exist on disk.
    /// Any failure here is terminal for the caller; there is no fallback
    /// model and no retry.
    pub async fn load(cfg: &ModelConfig) -> Result<Self, ModelError> {
        if cfg.embedding_dim == 0 {
            return Err(ModelError::InvalidConfig(
                "embedding_dim must be non-zero".into(),
            ));
        }

        if cfg.mode == "stub" {
            tracing::info!("model backend: deterministic stub");
            return Ok(Self {
                cfg: cfg.clone(),
                backend: Backend::Stub,
            });
        }

        let encoder = resolve_encoder_assets(cfg).await?;
        let classifier = resolve_classifier_path(cfg)?;

        // Construct both sessions now so deserialization errors surface at
        // load time rather than on the first request of each worker thread.
        get_or_load_encoder(&encoder)?;
        get_or_load_classifier(&classifier)?;

        tracing::info!(
            encoder = %cfg.encoder_name,
            classifier = %classifier.display(),
            "models loaded"
        );

        Ok(Self {
            cfg: cfg.clone(),
            backend: Backend::Onnx {
                encoder,
                classifier,
            },
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.cfg
    }

    /// Encoder pass: one `embedding_dim` vector per input text.
    pub fn embed<T: AsRef<str>>(&self, texts: &[T]) -> Result<Vec<Vec<f32>>, ModelError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        match &self.backend {
            Backend::Stub => Ok(texts
                .iter()
                .map(|t| stub_embedding(t.as_ref(), self.cfg.embedding_dim))
                .collect()),
            Backend::Onnx { encoder, .. } => {
                let handle = get_or_load_encoder(encoder)?;
                run_encoder(
                    handle.as_ref(),
                    texts,
                    self.cfg.max_sequence_length,
                    self.cfg.embedding_dim,
                )
            }
        }
    }

    /// Reshape a batch of embeddings to the classifier's `(batch, 1, dim)`
    /// layout. The rule is unconditional: no introspection of the classifier's
    /// declared input rank. The leading dimension always equals the number of
    /// input embeddings; items are never truncated or padded against each
    /// other.
    pub fn reshape(&self, embeddings: Vec<Vec<f32>>) -> Result<Array3<f32>, ModelError> {
        let dim = self.cfg.embedding_dim;
        let batch = embeddings.len();

        let mut storage = Vec::with_capacity(batch * dim);
        for (idx, embedding) in embeddings.into_iter().enumerate() {
            if embedding.len() != dim {
                return Err(ModelError::Inference(format!(
                    "embedding {} has {} values, expected {}",
                    idx,
                    embedding.len(),
                    dim
                )));
            }
            storage.extend(embedding);
        }

        Array::from_shape_vec((batch, 1, dim), storage)
            .map_err(|e| ModelError::Inference(e.to_string()))
    }

    /// Classifier pass: one scalar score in [0,1] per batch item. The range is
    /// a property of the trained model, not validated here.
    pub fn score(&self, input: Array3<f32>) -> Result<Vec<f32>, ModelError> {
        match &self.backend {
            Backend::Stub => Ok(input
                .outer_iter()
                .map(|row| {
                    let flat: Vec<f32> = row.iter().copied().collect();
                    stub_score(&flat)
                })
                .collect()),
            Backend::Onnx { classifier, .. } => {
                let handle = get_or_load_classifier(classifier)?;
                run_classifier(handle.as_ref(), input)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub_models() -> SentimentModels {
        let cfg = ModelConfig {
            mode: "stub".into(),
            ..Default::default()
        };
        // Stub load never touches the network or filesystem.
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(SentimentModels::load(&cfg))
            .unwrap()
    }

    #[test]
    fn embed_returns_one_vector_per_text() {
        let models = stub_models();
        let embeddings = models.embed(&["first", "second", "third"]).unwrap();
        assert_eq!(embeddings.len(), 3);
        for embedding in &embeddings {
            assert_eq!(embedding.len(), 512);
        }
    }

    #[test]
    fn embed_empty_batch_is_noop() {
        let models = stub_models();
        let embeddings = models.embed::<&str>(&[]).unwrap();
        assert!(embeddings.is_empty());
    }

    #[test]
    fn reshape_leading_dimension_equals_batch() {
        let models = stub_models();
        for n in [1usize, 2, 7] {
            let texts: Vec<String> = (0..n).map(|i| format!("review number {i}")).collect();
            let embeddings = models.embed(&texts).unwrap();
            let tensor = models.reshape(embeddings).unwrap();
            assert_eq!(tensor.dim(), (n, 1, 512));
        }
    }

    #[test]
    fn reshape_rejects_wrong_width() {
        let models = stub_models();
        let err = models
            .reshape(vec![vec![0.0f32; 512], vec![0.0f32; 100]])
            .unwrap_err();
        assert!(matches!(err, ModelError::Inference(_)));
    }

    #[test]
    fn score_returns_one_score_per_item() {
        let models = stub_models();
        let embeddings = models.embed(&["good", "bad", "meh"]).unwrap();
        let tensor = models.reshape(embeddings).unwrap();
        let scores = models.score(tensor).unwrap();
        assert_eq!(scores.len(), 3);
        for score in scores {
            assert!((0.0..=1.0).contains(&score));
        }
    }

    #[test]
    fn scores_deterministic_per_text() {
        let models = stub_models();
        let run = |text: &str| {
            let embeddings = models.embed(&[text]).unwrap();
            let tensor = models.reshape(embeddings).unwrap();
            models.score(tensor).unwrap()[0]
        };
        assert_eq!(run("the pool was warm"), run("the pool was warm"));
    }

    #[tokio::test]
    async fn load_rejects_zero_embedding_dim() {
        let cfg = ModelConfig {
            mode: "stub".into(),
            embedding_dim: 0,
            ..Default::default()
        };
        let err = SentimentModels::load(&cfg).await.unwrap_err();
        assert!(matches!(err, ModelError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn load_fails_when_classifier_missing() {
        let dir = tempfile::tempdir().unwrap();
        let encoder_path = dir.path().join("encoder.onnx");
        let tokenizer_path = dir.path().join("tokenizer.json");
        std::fs::write(&encoder_path, b"not a real model").unwrap();
        std::fs::write(&tokenizer_path, b"{}").unwrap();

        let cfg = ModelConfig {
            encoder_path,
            encoder_url: None,
            tokenizer_path: Some(tokenizer_path),
            tokenizer_url: None,
            classifier_path: dir.path().join("missing-classifier.onnx"),
            ..Default::default()
        };

        let err = SentimentModels::load(&cfg).await.unwrap_err();
        assert!(matches!(err, ModelError::ClassifierNotFound(_)));
    }

    #[tokio::test]
    #[ignore = "requires real ONNX + tokenizer assets under models/"]
    async fn real_model_inference() {
        let cfg = ModelConfig::default();
        let models = SentimentModels::load(&cfg).await.expect("load real models");

        let embeddings = models
            .embed(&["The room was beautiful and the staff were wonderful"])
            .unwrap();
        assert_eq!(embeddings[0].len(), 512);

        let tensor = models.reshape(embeddings).unwrap();
        let scores = models.score(tensor).unwrap();
        assert_eq!(scores.len(), 1);
        assert!((0.0..=1.0).contains(&scores[0]));
    }
}
