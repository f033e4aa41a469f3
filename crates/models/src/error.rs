use std::io;
use thiserror::Error;

/// Errors surfaced while resolving or running the pretrained models.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The encoder ONNX file could not be located locally and no download URL was provided.
    #[error("encoder model not found: {0}")]
    EncoderNotFound(String),
    /// The classifier ONNX file is missing. The classifier is a local artifact only;
    /// there is no remote fallback.
    #[error("classifier model not found: {0}")]
    ClassifierNotFound(String),
    /// The tokenizer JSON is missing and there was no remote URL to fetch it from.
    #[error("tokenizer missing: {0}")]
    TokenizerMissing(String),
    /// Configuration is inconsistent (e.g., an embedding dim of zero).
    #[error("invalid model config: {0}")]
    InvalidConfig(String),
    /// Unable to download remote assets.
    #[error("download failed: {0}")]
    Download(String),
    /// Low-level IO failures while touching the filesystem.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// ONNX Runtime, tokenizer, or tensor-shape errors.
    #[error("inference failure: {0}")]
    Inference(String),
}

impl Clone for ModelError {
    fn clone(&self) -> Self {
        match self {
            ModelError::EncoderNotFound(s) => ModelError::EncoderNotFound(s.clone()),
            ModelError::ClassifierNotFound(s) => ModelError::ClassifierNotFound(s.clone()),
            ModelError::TokenizerMissing(s) => ModelError::TokenizerMissing(s.clone()),
            ModelError::InvalidConfig(s) => ModelError::InvalidConfig(s.clone()),
            ModelError::Download(s) => ModelError::Download(s.clone()),
            ModelError::Io(_) => ModelError::Inference("IO error occurred".to_string()),
            ModelError::Inference(s) => ModelError::Inference(s.clone()),
        }
    }
}
