use fxhash::hash64;

/// Deterministic stand-in for the encoder, used when `mode` is `"stub"`.
/// Generates sinusoid values derived from a hash of the input text so tests
/// get reproducible vectors without any model assets on disk.
pub(crate) fn stub_embedding(text: &str, dim: usize) -> Vec<f32> {
    let mut v = vec![0f32; dim];
    let h = hash64(text.as_bytes());
    for (idx, value) in v.iter_mut().enumerate() {
        *value = ((h >> (idx % 32)) as f32 * 0.0001).sin();
    }
    v
}

/// Deterministic stand-in for the classifier: folds an embedding down to a
/// score in [0,1]. Not meaningful as sentiment, just stable per input.
pub(crate) fn stub_score(embedding: &[f32]) -> f32 {
    let sum: f32 = embedding.iter().sum();
    sum.sin() * 0.5 + 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_embedding_deterministic() {
        let e1 = stub_embedding("same text", 512);
        let e2 = stub_embedding("same text", 512);
        assert_eq!(e1, e2);
        assert_eq!(e1.len(), 512);
    }

    #[test]
    fn stub_embedding_different_text() {
        let e1 = stub_embedding("hello", 512);
        let e2 = stub_embedding("world", 512);
        assert_ne!(e1, e2);
    }

    #[test]
    fn stub_embedding_values_in_range() {
        let embedding = stub_embedding("test", 512);
        for (i, &val) in embedding.iter().enumerate() {
            assert!(
                (-1.0..=1.0).contains(&val),
                "value at index {i} is {val} which is outside [-1, 1]"
            );
        }
    }

    #[test]
    fn stub_embedding_empty_text_still_valid() {
        let embedding = stub_embedding("", 512);
        assert_eq!(embedding.len(), 512);
        assert!(!embedding.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn stub_embedding_unicode() {
        let embedding = stub_embedding("La habitación era preciosa 🌍", 512);
        assert_eq!(embedding.len(), 512);
        assert!(!embedding.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn stub_score_in_unit_interval() {
        for text in ["great stay", "awful", "", "中文评论", "a".repeat(5000).as_str()] {
            let score = stub_score(&stub_embedding(text, 512));
            assert!((0.0..=1.0).contains(&score), "score {score} out of range");
        }
    }

    #[test]
    fn stub_score_deterministic() {
        let embedding = stub_embedding("lovely hotel", 512);
        assert_eq!(stub_score(&embedding), stub_score(&embedding));
    }
}
