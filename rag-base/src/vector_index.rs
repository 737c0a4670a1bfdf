//! In-memory vector index over knowledge-base fragments.
//!
//! Built once, read-only afterwards; concurrent queries share it through `&self`.
//! Search is exact cosine similarity over every vector.

use std::{fmt, sync::Arc, time::Instant};

use futures::{StreamExt, TryStreamExt, stream};
use tracing::{debug, info};

use crate::{
    embedding::EmbeddingsProvider, errors::rag_base_error::RagBaseError,
    structs::fragment::Fragment,
};

/// Build-time knobs.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Max embedding requests in flight while building.
    pub concurrency: usize,
    /// When set, every vector must have exactly this many components.
    pub expected_dim: Option<usize>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            expected_dim: None,
        }
    }
}

/// One retrieval hit; borrows the fragment owned by the index.
#[derive(Debug, Clone, Copy)]
pub struct RetrievedFragment<'a> {
    pub fragment: &'a Fragment,
    pub score: f32,
}

pub struct VectorIndex {
    fragments: Vec<Fragment>,
    vectors: Vec<Vec<f32>>,
    norms: Vec<f32>,
    dim: usize,
    embedder: Arc<dyn EmbeddingsProvider>,
}

impl fmt::Debug for VectorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorIndex")
            .field("fragments", &self.fragments.len())
            .field("dim", &self.dim)
            .field("model", &self.embedder.model_id())
            .finish()
    }
}

impl VectorIndex {
    /// Embeds every fragment body and builds the index.
    ///
    /// Fragments keep their order; embedding runs with bounded concurrency.
    ///
    /// # Errors
    /// - [`RagBaseError::Embedding`] if any embedding call fails
    /// - [`RagBaseError::VectorSizeMismatch`] if vectors disagree on dimension
    pub async fn build(
        fragments: Vec<Fragment>,
        embedder: Arc<dyn EmbeddingsProvider>,
        cfg: &IndexConfig,
    ) -> Result<Self, RagBaseError> {
        let started = Instant::now();
        let concurrency = cfg.concurrency.max(1);

        let vectors: Vec<Vec<f32>> = stream::iter(fragments.iter())
            .map(|f| embedder.embed(&f.body))
            .buffered(concurrency)
            .try_collect()
            .await?;

        let dim = match (cfg.expected_dim, vectors.first()) {
            (Some(d), _) => d,
            (None, Some(v)) => v.len(),
            (None, None) => 0,
        };
        if let Some(bad) = vectors.iter().find(|v| v.len() != dim) {
            return Err(RagBaseError::VectorSizeMismatch {
                expected: dim,
                got: bad.len(),
            });
        }

        let norms = vectors.iter().map(|v| l2(v)).collect();

        info!(
            fragments = fragments.len(),
            dim,
            model = embedder.model_id(),
            concurrency,
            elapsed_ms = started.elapsed().as_millis(),
            "vector index built"
        );

        Ok(Self {
            fragments,
            vectors,
            norms,
            dim,
            embedder,
        })
    }

    /// Top-`top_k` fragments by descending cosine similarity to `question`.
    ///
    /// Ties keep document order. Returns everything when `top_k` exceeds the
    /// fragment count and nothing when `top_k == 0` or the index is empty; in
    /// those cases no embedding call is made.
    pub async fn query(
        &self,
        question: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedFragment<'_>>, RagBaseError> {
        if top_k == 0 || self.fragments.is_empty() {
            return Ok(Vec::new());
        }

        let q = self.embedder.embed(question).await?;
        if q.len() != self.dim {
            return Err(RagBaseError::VectorSizeMismatch {
                expected: self.dim,
                got: q.len(),
            });
        }
        let q_norm = l2(&q);

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .zip(&self.norms)
            .enumerate()
            .map(|(i, (v, n))| (i, cosine(&q, q_norm, v, *n)))
            .collect();

        // Stable: equal scores stay in document order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_k);

        debug!(
            top_k,
            returned = scored.len(),
            best = scored.first().map(|s| s.1),
            "vector index query"
        );

        Ok(scored
            .into_iter()
            .map(|(i, score)| RetrievedFragment {
                fragment: &self.fragments[i],
                score,
            })
            .collect())
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn model_id(&self) -> &str {
        self.embedder.model_id()
    }
}

fn l2(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

fn cosine(a: &[f32], a_norm: f32, b: &[f32], b_norm: f32) -> f32 {
    if a_norm == 0.0 || b_norm == 0.0 {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    dot / (a_norm * b_norm)
}
