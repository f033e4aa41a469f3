use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Pinned release of the multilingual sentence encoder. Bumping this is a
/// deliberate model upgrade, never an implicit one.
pub const DEFAULT_ENCODER_URL: &str = "https://huggingface.co/sentence-transformers/distiluse-base-multilingual-cased-v2/resolve/4c1ccff3cd39d0b52b1bbc1aeed4ee5a7f712f0a/onnx/model.onnx";
pub const DEFAULT_TOKENIZER_URL: &str = "https://huggingface.co/sentence-transformers/distiluse-base-multilingual-cased-v2/resolve/4c1ccff3cd39d0b52b1bbc1aeed4ee5a7f712f0a/tokenizer.json";

/// Runtime configuration describing where the pretrained artifacts live and how
/// text is fed through them.
///
/// The encoder (model + tokenizer) may be fetched from its pinned URL when the
/// local files are missing. The classifier is a locally trained artifact with
/// no remote source; it must already be on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    /// Backend selector: `"onnx"` (real models) or `"stub"` (deterministic
    /// hash-derived vectors and scores, for tests and development).
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Friendly encoder label surfaced in logs and readiness output.
    #[serde(default = "default_encoder_name")]
    pub encoder_name: String,
    /// Local path where the encoder ONNX file should live (also the download
    /// target when [`encoder_url`](Self::encoder_url) is set).
    #[serde(default = "default_encoder_path")]
    pub encoder_path: PathBuf,
    /// Version-pinned URL fetched when [`encoder_path`](Self::encoder_path) is missing.
    #[serde(default = "default_encoder_url")]
    pub encoder_url: Option<String>,
    /// Path to `tokenizer.json`. When absent and [`tokenizer_url`](Self::tokenizer_url)
    /// is provided we infer the filename from the URL and place it next to the encoder.
    #[serde(default = "default_tokenizer_path")]
    pub tokenizer_path: Option<PathBuf>,
    /// Version-pinned URL for fetching the tokenizer on demand.
    #[serde(default = "default_tokenizer_url")]
    pub tokenizer_url: Option<String>,
    /// Local path of the trained recurrent classifier (ONNX export). Local only.
    #[serde(default = "default_classifier_path")]
    pub classifier_path: PathBuf,
    /// Width of the encoder output. The classifier consumes `(batch, 1, embedding_dim)`.
    #[serde(default = "default_embedding_dim")]
    pub embedding_dim: usize,
    /// Token cap per review; longer inputs are truncated.
    #[serde(default = "default_max_sequence_length")]
    pub max_sequence_length: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            encoder_name: default_encoder_name(),
            encoder_path: default_encoder_path(),
            encoder_url: default_encoder_url(),
            tokenizer_path: default_tokenizer_path(),
            tokenizer_url: default_tokenizer_url(),
            classifier_path: default_classifier_path(),
            embedding_dim: default_embedding_dim(),
            max_sequence_length: default_max_sequence_length(),
        }
    }
}

fn default_mode() -> String {
    "onnx".into()
}

fn default_encoder_name() -> String {
    "distiluse-base-multilingual-cased-v2".into()
}

fn default_encoder_path() -> PathBuf {
    PathBuf::from("./models/distiluse-base-multilingual-cased-v2/model.onnx")
}

fn default_encoder_url() -> Option<String> {
    Some(DEFAULT_ENCODER_URL.to_string())
}

fn default_tokenizer_path() -> Option<PathBuf> {
    Some(PathBuf::from(
        "./models/distiluse-base-multilingual-cased-v2/tokenizer.json",
    ))
}

fn default_tokenizer_url() -> Option<String> {
    Some(DEFAULT_TOKENIZER_URL.to_string())
}

fn default_classifier_path() -> PathBuf {
    PathBuf::from("./models/hotel-sentiment-lstm/classifier.onnx")
}

fn default_embedding_dim() -> usize {
    512
}

fn default_max_sequence_length() -> usize {
    128
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let cfg = ModelConfig::default();
        assert_eq!(cfg.mode, "onnx");
        assert_eq!(cfg.encoder_name, "distiluse-base-multilingual-cased-v2");
        assert_eq!(cfg.embedding_dim, 512);
        assert_eq!(cfg.max_sequence_length, 128);
        assert!(cfg.encoder_url.is_some());
        assert!(cfg.tokenizer_url.is_some());
        assert_eq!(
            cfg.classifier_path,
            PathBuf::from("./models/hotel-sentiment-lstm/classifier.onnx")
        );
    }

    #[test]
    fn config_serde_roundtrip() {
        let cfg = ModelConfig {
            mode: "stub".into(),
            encoder_name: "custom-encoder".into(),
            encoder_path: PathBuf::from("/opt/models/encoder.onnx"),
            encoder_url: None,
            tokenizer_path: Some(PathBuf::from("/opt/models/tokenizer.json")),
            tokenizer_url: None,
            classifier_path: PathBuf::from("/opt/models/classifier.onnx"),
            embedding_dim: 512,
            max_sequence_length: 64,
        };

        let serialized = serde_json::to_string(&cfg).unwrap();
        let deserialized: ModelConfig = serde_json::from_str(&serialized).unwrap();

        assert_eq!(cfg, deserialized);
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let cfg: ModelConfig = serde_json::from_str(r#"{"mode": "stub"}"#).unwrap();
        assert_eq!(cfg.mode, "stub");
        assert_eq!(cfg.embedding_dim, 512);
        assert_eq!(cfg.encoder_url.as_deref(), Some(DEFAULT_ENCODER_URL));
    }

    #[test]
    fn encoder_url_is_version_pinned() {
        // The default URL must reference an immutable revision, not a branch.
        assert!(!DEFAULT_ENCODER_URL.contains("/main/"));
        assert!(!DEFAULT_TOKENIZER_URL.contains("/main/"));
    }
}
