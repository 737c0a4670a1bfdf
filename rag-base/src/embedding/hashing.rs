//! Offline embedder: hashes tokens into a fixed-size bag-of-words vector.
//!
//! Not a semantic model. It gives lexical-overlap retrieval with no network
//! access, which is enough for local runs and tests.

use crate::{
    embedding::{EmbedFuture, EmbeddingsProvider},
    errors::rag_base_error::RagBaseError,
};

#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    model_id: String,
    dim: usize,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Result<Self, RagBaseError> {
        if dim == 0 {
            return Err(RagBaseError::InvalidConfig(
                "hashing embedder dim must be > 0".into(),
            ));
        }
        Ok(Self {
            model_id: format!("hashing-{dim}"),
            dim,
        })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Lowercased alphanumeric runs; everything else separates tokens.
    fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }

    fn bucket(&self, token: &str) -> usize {
        let hash = blake3::hash(token.as_bytes());
        let mut head = [0u8; 8];
        head.copy_from_slice(&hash.as_bytes()[..8]);
        (u64::from_le_bytes(head) % self.dim as u64) as usize
    }

    /// L2-normalised token counts; all zeros when the text has no tokens.
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dim];
        for token in Self::tokens(text) {
            v[self.bucket(&token)] += 1.0;
        }

        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        v
    }
}

impl EmbeddingsProvider for HashingEmbedder {
    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a> {
        Box::pin(async move { Ok(self.embed_sync(text)) })
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dim_is_rejected() {
        assert!(HashingEmbedder::new(0).is_err());
    }

    #[test]
    fn vectors_are_unit_length_and_deterministic() {
        let e = HashingEmbedder::new(64).unwrap();
        let a = e.embed_sync("Зарплата: 2 500 000 тенге");
        let b = e.embed_sync("Зарплата: 2 500 000 тенге");
        assert_eq!(a, b);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn case_and_punctuation_do_not_matter() {
        let e = HashingEmbedder::new(128).unwrap();
        assert_eq!(e.embed_sync("Hello, WORLD!"), e.embed_sync("hello world"));
    }

    #[test]
    fn empty_text_is_zero_vector() {
        let e = HashingEmbedder::new(16).unwrap();
        assert!(e.embed_sync(" ,.! ").iter().all(|x| *x == 0.0));
    }
}
