//! Semantic scorer: sentence embeddings + cosine similarity.
//!
//! The embedding backend sits behind the `Embedder` trait. The bundled backend
//! (`FastEmbedder`, feature `semantic`) runs a multilingual E5 model locally via
//! fastembed/ONNX. It is loaded once at startup; a failed load surfaces as
//! `RankError::BackendUnavailable`, a failed inference as `RankError::ScoringFailure`.
//!
//! Empty candidate texts are not sent to the backend and score 0.0.
//!
//! Topic and candidates are embedded with the same model prefix, so a candidate
//! whose text equals the topic scores 1.0.

use super::scoring::{cosine, Scorer, Strategy};
use crate::error::{RankError, Result};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Text embedding model. Must tolerate concurrent callers.
pub trait Embedder: Send + Sync {
    /// Embed candidate texts.
    fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Embedding>>;

    /// Embed the user topic. Must land in the same space as `embed_documents`.
    fn embed_query(&self, text: &str) -> Result<Embedding>;

    /// Length of every vector this embedder returns.
    fn dimension(&self) -> usize;

    fn model_name(&self) -> &str;
}

pub struct SemanticScorer<E: Embedder> {
    embedder: E,
}

impl<E: Embedder> SemanticScorer<E> {
    pub fn new(embedder: E) -> Self {
        Self { embedder }
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }
}

impl<E: Embedder> Scorer for SemanticScorer<E> {
    fn score(&self, topic: &str, texts: &[String]) -> Result<Vec<f32>> {
        let mut scores = vec![0.0f32; texts.len()];

        let live: Vec<(usize, &str)> = texts
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.trim().is_empty())
            .map(|(i, t)| (i, t.as_str()))
            .collect();
        if live.is_empty() {
            return Ok(scores);
        }

        let query = self.embedder.embed_query(topic)?;
        let docs: Vec<&str> = live.iter().map(|(_, t)| *t).collect();
        let embedded = self.embedder.embed_documents(&docs)?;

        if embedded.len() != docs.len() {
            return Err(RankError::ScoringFailure(format!(
                "{} returned {} embeddings for {} texts",
                self.embedder.model_name(),
                embedded.len(),
                docs.len()
            )));
        }
        let dim = self.embedder.dimension();
        if let Some(bad) = std::iter::once(&query)
            .chain(embedded.iter())
            .find(|e| e.len() != dim)
        {
            return Err(RankError::ScoringFailure(format!(
                "{} declared {dim} dimensions but returned {}",
                self.embedder.model_name(),
                bad.len()
            )));
        }

        for ((idx, _), emb) in live.iter().zip(embedded.iter()) {
            scores[*idx] = cosine(&query, emb);
        }
        Ok(scores)
    }

    fn strategy(&self) -> Strategy {
        Strategy::Semantic
    }
}

/// A supported embedding model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSpec {
    pub id: &'static str,
    pub dimension: usize,
    /// Prepended to topic and candidate text alike.
    pub prefix: &'static str,
}

const MODELS: &[ModelSpec] = &[
    ModelSpec {
        id: "multilingual-e5-small",
        dimension: 384,
        prefix: "query: ",
    },
    ModelSpec {
        id: "multilingual-e5-base",
        dimension: 768,
        prefix: "query: ",
    },
    ModelSpec {
        id: "bge-small-en",
        dimension: 384,
        prefix: "",
    },
];

/// Look up a model by short id. Unknown ids are `BackendUnavailable`.
pub fn model_spec(id: &str) -> Result<ModelSpec> {
    MODELS
        .iter()
        .find(|m| m.id == id)
        .copied()
        .ok_or_else(|| RankError::BackendUnavailable(format!("unknown embedding model `{id}`")))
}

#[cfg(feature = "semantic")]
pub use fast::FastEmbedder;

#[cfg(feature = "semantic")]
mod fast {
    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
    use std::sync::Mutex;

    use super::{model_spec, Embedder, Embedding, ModelSpec};
    use crate::error::{RankError, Result};

    /// Local ONNX embedder. Inference needs `&mut`, hence the mutex.
    pub struct FastEmbedder {
        model: Mutex<TextEmbedding>,
        spec: ModelSpec,
    }

    fn backend_model(spec: &ModelSpec) -> Result<EmbeddingModel> {
        match spec.id {
            "multilingual-e5-small" => Ok(EmbeddingModel::MultilingualE5Small),
            "multilingual-e5-base" => Ok(EmbeddingModel::MultilingualE5Base),
            "bge-small-en" => Ok(EmbeddingModel::BGESmallENV15),
            other => Err(RankError::BackendUnavailable(format!(
                "no fastembed model for `{other}`"
            ))),
        }
    }

    impl FastEmbedder {
        /// Load a model by short id. Downloads weights on first use.
        ///
        /// Supported ids: `multilingual-e5-small` (384d, default),
        /// `multilingual-e5-base` (768d), `bge-small-en` (384d).
        pub fn new(model_id: &str) -> Result<Self> {
            let spec = model_spec(model_id)?;
            let inner = TextEmbedding::try_new(InitOptions::new(backend_model(&spec)?))
                .map_err(|e| RankError::BackendUnavailable(e.to_string()))?;

            Ok(Self {
                model: Mutex::new(inner),
                spec,
            })
        }

        fn run(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
            let inputs: Vec<String> = texts
                .iter()
                .map(|t| format!("{}{t}", self.spec.prefix))
                .collect();
            let mut model = self
                .model
                .lock()
                .map_err(|_| RankError::ScoringFailure("embedding model lock poisoned".into()))?;
            model
                .embed(inputs, None)
                .map_err(|e| RankError::ScoringFailure(e.to_string()))
        }
    }

    impl Embedder for FastEmbedder {
        fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
            self.run(texts)
        }

        fn embed_query(&self, text: &str) -> Result<Embedding> {
            self.run(&[text])?
                .into_iter()
                .next()
                .ok_or_else(|| RankError::ScoringFailure("model returned no embeddings".into()))
        }

        fn dimension(&self) -> usize {
            self.spec.dimension
        }

        fn model_name(&self) -> &str {
            self.spec.id
        }
    }
}
