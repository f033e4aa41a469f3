//! Umbrella crate for Senti Hotel sentiment analysis.
//!
//! This crate stitches the pretrained models together with the threshold
//! policies so both surfaces (dashboard and prediction API) call a single
//! predict-and-threshold routine and differ only in transport and rendering.
//!
//! The sequence is always: embed → reshape to `(batch, 1, 512)` → classify →
//! threshold. Any failure in the first three steps propagates to the caller as
//! a [`PipelineError`]; thresholding is infallible.

pub mod policy;
pub mod registry;

pub use crate::policy::{Prediction, Sentiment, ThresholdPolicy};
pub use crate::registry::{ModelRegistry, Readiness};
pub use models::{ModelConfig, ModelError, SentimentModels};

use thiserror::Error;

/// Errors that can occur while running reviews through the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Model resolution or inference failure.
    #[error("model failure: {0}")]
    Model(#[from] ModelError),
    /// The classifier returned a different number of scores than inputs.
    #[error("classifier produced {got} scores for {expected} reviews")]
    ScoreCount { expected: usize, got: usize },
}

/// Run a batch of reviews through embed → reshape → classify → threshold.
///
/// An empty batch is a no-op: `Ok(vec![])` with zero model calls. Otherwise
/// every input yields exactly one [`Prediction`], in input order.
pub fn predict_batch<T: AsRef<str>>(
    models: &SentimentModels,
    texts: &[T],
    policy: ThresholdPolicy,
) -> Result<Vec<Prediction>, PipelineError> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    let embeddings = models.embed(texts)?;
    let tensor = models.reshape(embeddings)?;
    let scores = models.score(tensor)?;

    if scores.len() != texts.len() {
        return Err(PipelineError::ScoreCount {
            expected: texts.len(),
            got: scores.len(),
        });
    }

    Ok(scores.into_iter().map(|s| policy.label(s)).collect())
}

/// Single-review convenience wrapper. Blank input (empty or whitespace-only)
/// is a no-op returning `Ok(None)` without invoking the models; callers that
/// need a user-facing "no review provided" error check before calling.
pub fn predict_review(
    models: &SentimentModels,
    text: &str,
    policy: ThresholdPolicy,
) -> Result<Option<Prediction>, PipelineError> {
    if text.trim().is_empty() {
        return Ok(None);
    }

    let mut predictions = predict_batch(models, &[text], policy)?;
    Ok(predictions.pop())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn stub_models() -> SentimentModels {
        let cfg = ModelConfig {
            mode: "stub".into(),
            ..Default::default()
        };
        SentimentModels::load(&cfg).await.unwrap()
    }

    #[tokio::test]
    async fn empty_batch_is_noop() {
        let models = stub_models().await;
        let predictions = predict_batch::<&str>(&models, &[], ThresholdPolicy::Binary).unwrap();
        assert!(predictions.is_empty());
    }

    #[tokio::test]
    async fn one_prediction_per_review_in_order() {
        let models = stub_models().await;
        let texts = ["first review", "second review", "third review"];
        let predictions = predict_batch(&models, &texts, ThresholdPolicy::TriState).unwrap();
        assert_eq!(predictions.len(), 3);

        // Order must match input: re-running each individually gives the same score.
        for (text, prediction) in texts.iter().zip(&predictions) {
            let single = predict_review(&models, text, ThresholdPolicy::TriState)
                .unwrap()
                .unwrap();
            assert_eq!(single.score, prediction.score);
        }
    }

    #[tokio::test]
    async fn blank_review_skips_models() {
        let models = stub_models().await;
        for text in ["", "   ", "\n\t"] {
            let result = predict_review(&models, text, ThresholdPolicy::Binary).unwrap();
            assert!(result.is_none(), "{text:?} should be a no-op");
        }
    }

    #[tokio::test]
    async fn policies_disagree_only_in_labeling() {
        let models = stub_models().await;
        let text = "the breakfast buffet was acceptable";

        let binary = predict_review(&models, text, ThresholdPolicy::Binary)
            .unwrap()
            .unwrap();
        let tri = predict_review(&models, text, ThresholdPolicy::TriState)
            .unwrap()
            .unwrap();

        // Same pipeline, same score; only the thresholding differs.
        assert_eq!(binary.score, tri.score);
        assert_ne!(binary.sentiment, Sentiment::Neutral);
    }

    #[tokio::test]
    async fn confidence_is_within_unit_interval() {
        let models = stub_models().await;
        let texts = [
            "wonderful spa and friendly staff",
            "cold food and a broken elevator",
            "it was a hotel",
        ];
        for policy in [ThresholdPolicy::Binary, ThresholdPolicy::TriState] {
            for p in predict_batch(&models, &texts, policy).unwrap() {
                assert!((0.0..=1.0).contains(&p.confidence));
                assert!((0.0..=1.0).contains(&p.score));
            }
        }
    }

    #[tokio::test]
    #[ignore = "requires real ONNX + tokenizer assets under models/"]
    async fn real_model_label_sanity() {
        let models = SentimentModels::load(&ModelConfig::default())
            .await
            .unwrap();

        let positive = predict_review(
            &models,
            "The room was beautiful and the staff were wonderful",
            ThresholdPolicy::Binary,
        )
        .unwrap()
        .unwrap();
        assert_eq!(positive.sentiment, Sentiment::Positive);

        let negative = predict_review(
            &models,
            "Terrible stay, rude staff, filthy room",
            ThresholdPolicy::Binary,
        )
        .unwrap()
        .unwrap();
        assert_eq!(negative.sentiment, Sentiment::Negative);
    }
}
