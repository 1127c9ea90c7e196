// Query embedding via a local sentence-transformer ONNX model.
//
// The keyword search maps a free-text query into the same vector space the
// topic embeddings live in, then ranks topics by cosine similarity. The
// model (paraphrase-multilingual MiniLM, 384 dimensions — German queries
// need the multilingual checkpoint) runs locally through ONNX Runtime with
// mean pooling over token embeddings, matching how the offline pipeline
// embedded the sentences.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::debug;

/// Embedding dimension of the sentence-transformer checkpoint.
pub const EMBEDDING_DIM: usize = 384;

/// Embeds search queries into 384-dimensional vectors.
///
/// Session is behind a Mutex because ort sessions take &mut for inference;
/// the tokenizer is shared across spawn_blocking via Arc.
pub struct QueryEmbedder {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
}

impl QueryEmbedder {
    /// Load model.onnx and tokenizer.json from the embedding directory.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        if !model_path.exists() || !tokenizer_path.exists() {
            anyhow::bail!(
                "Embedding model not found in {}\n\
                 Expected model.onnx and tokenizer.json. The search will use the\n\
                 keyword fallback until the model is in place.",
                model_dir.display()
            );
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| format!("Failed to load embedding model from {}", model_path.display()))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load embedding tokenizer: {}", e))?;

        debug!("Loaded query embedding model from {}", model_dir.display());

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
        })
    }

    /// Embed a single query string.
    ///
    /// Inference is CPU-bound, so it runs on the blocking pool to keep the
    /// server responsive while a search is in flight.
    pub async fn embed(&self, text: &str) -> Result<Vec<f64>> {
        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let text = text.to_string();

        tokio::task::spawn_blocking(move || embed_sync(&session, &tokenizer, &text))
            .await
            .context("spawn_blocking panicked")?
    }
}

/// Tokenize, run the model, and mean-pool the token embeddings.
fn embed_sync(
    session: &Arc<Mutex<Session>>,
    tokenizer: &Arc<Tokenizer>,
    text: &str,
) -> Result<Vec<f64>> {
    let encoding = tokenizer
        .encode(text, true)
        .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

    let ids = encoding.get_ids();
    let mask = encoding.get_attention_mask();
    let seq_len = ids.len();

    if seq_len == 0 {
        return Ok(vec![0.0; EMBEDDING_DIM]);
    }

    let input_ids: Vec<i64> = ids.iter().map(|&id| id as i64).collect();
    let attention_mask: Vec<i64> = mask.iter().map(|&m| m as i64).collect();
    let token_type_ids = vec![0i64; seq_len];

    let shape = [1i64, seq_len as i64];

    let input_ids_tensor =
        Tensor::from_array((shape, input_ids)).context("Failed to create input_ids tensor")?;
    let attention_mask_tensor = Tensor::from_array((shape, attention_mask.clone()))
        .context("Failed to create attention_mask tensor")?;
    let token_type_ids_tensor = Tensor::from_array((shape, token_type_ids))
        .context("Failed to create token_type_ids tensor")?;

    // Output is last_hidden_state: [1, seq_len, EMBEDDING_DIM]
    let hidden_states = {
        let mut session = session
            .lock()
            .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

        let outputs = session
            .run(ort::inputs! {
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
                "token_type_ids" => token_type_ids_tensor
            })
            .context("Embedding ONNX inference failed")?;

        let (_shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .context("Failed to extract embedding output tensor")?;

        data.to_vec()
    };

    // Mean pooling weighted by the attention mask, as the checkpoint
    // was trained.
    let mut pooled = vec![0.0_f64; EMBEDDING_DIM];
    let mut mask_sum = 0.0_f64;

    for (j, &mask_val) in attention_mask.iter().enumerate() {
        if mask_val > 0 {
            mask_sum += mask_val as f64;
            let offset = j * EMBEDDING_DIM;
            for k in 0..EMBEDDING_DIM {
                pooled[k] += hidden_states[offset + k] as f64;
            }
        }
    }

    if mask_sum > 0.0 {
        for val in &mut pooled {
            *val /= mask_sum;
        }
    }

    Ok(pooled)
}

/// Cosine similarity between two embedding vectors, clamped to [0, 1].
///
/// Mismatched or empty vectors score 0.0 — an outlier topic with no
/// embedding simply never matches.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    let denom = mag_a * mag_b;
    if denom < f64::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_identical_is_one() {
        let a = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn cosine_orthogonal_is_zero() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-10);
    }

    #[test]
    fn cosine_proportional_is_one() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![2.0, 4.0, 6.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn cosine_mismatched_dims_is_zero() {
        let a = vec![1.0, 2.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn cosine_empty_is_zero() {
        let a: Vec<f64> = vec![];
        assert_eq!(cosine_similarity(&a, &a), 0.0);
    }

    #[test]
    fn cosine_zero_vector_is_zero() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn cosine_opposite_clamped_to_zero() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn cosine_never_exceeds_one() {
        let a = vec![0.3, 0.7, 0.1];
        let b = vec![0.31, 0.69, 0.11];
        let sim = cosine_similarity(&a, &b);
        assert!(sim <= 1.0, "cosine must stay within [0, 1], got {sim}");
    }
}
