// Keyword search — maps a free-text query to the nearest topics.
//
// The TopicMatcher trait hides which similarity backend answers the query:
// the embedding matcher reproduces the external model's similarity lookup
// (query embedding vs. topic embeddings, cosine), the keyword matcher is a
// degraded fallback for installations without the ONNX model on disk.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use super::artifact::{TopicModelArtifact, TopicRow};
use super::embedder::{cosine_similarity, QueryEmbedder};

/// A topic with its similarity to the query, before threshold filtering.
#[derive(Debug, Clone)]
pub struct TopicMatch {
    pub topic_id: i64,
    pub score: f64,
}

/// A search result row: the topic table entry plus its score.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub topic: TopicRow,
    pub score: f64,
}

/// Trait for query-to-topic similarity — swap-ready abstraction.
///
/// Scores are in [0, 1], so any threshold above 1.0 filters everything.
#[async_trait]
pub trait TopicMatcher: Send + Sync {
    /// Score every assigned topic against the query.
    async fn match_topics(&self, query: &str) -> Result<Vec<TopicMatch>>;

    /// Short backend name for logging and the status display.
    fn backend(&self) -> &'static str;
}

/// Run a search: lowercase the query (as the model was trained on cleaned
/// lowercase text), score all topics, keep those strictly above the
/// threshold, best first.
pub async fn search_topics(
    matcher: &dyn TopicMatcher,
    artifact: &TopicModelArtifact,
    query: &str,
    threshold: f64,
) -> Result<Vec<SearchHit>> {
    let query = query.to_lowercase();

    let mut matches = matcher.match_topics(&query).await?;
    matches.retain(|m| m.score > threshold);
    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    let hits = matches
        .into_iter()
        .filter_map(|m| {
            artifact.topic_by_id(m.topic_id).map(|t| SearchHit {
                topic: TopicRow {
                    id: t.id,
                    name: t.name.clone(),
                    keywords: t.keywords.clone(),
                    count: t.count,
                },
                score: m.score,
            })
        })
        .collect();

    Ok(hits)
}

/// Embedding-based matcher — the default when the ONNX model is on disk.
pub struct EmbeddingMatcher {
    embedder: QueryEmbedder,
    /// (topic id, embedding) for every assigned topic with a vector
    topics: Vec<(i64, Vec<f64>)>,
}

impl EmbeddingMatcher {
    pub fn new(embedder: QueryEmbedder, artifact: &TopicModelArtifact) -> Self {
        let topics = artifact
            .assigned_topics()
            .filter(|t| !t.embedding.is_empty())
            .map(|t| (t.id, t.embedding.clone()))
            .collect();
        Self { embedder, topics }
    }
}

#[async_trait]
impl TopicMatcher for EmbeddingMatcher {
    async fn match_topics(&self, query: &str) -> Result<Vec<TopicMatch>> {
        let query_embedding = self.embedder.embed(query).await?;

        Ok(self
            .topics
            .iter()
            .map(|(id, embedding)| TopicMatch {
                topic_id: *id,
                score: cosine_similarity(&query_embedding, embedding),
            })
            .collect())
    }

    fn backend(&self) -> &'static str {
        "embedding"
    }
}

/// Keyword-overlap fallback — no model files needed.
///
/// Each topic's keywords get rank-decayed weights; the query tokens get
/// uniform weights; the score is the weighted Jaccard of the two maps.
pub struct KeywordMatcher {
    topics: Vec<(i64, HashMap<String, f64>)>,
}

impl KeywordMatcher {
    pub fn new(artifact: &TopicModelArtifact) -> Self {
        let topics = artifact
            .assigned_topics()
            .map(|t| (t.id, keyword_weights(&t.keywords)))
            .collect();
        Self { topics }
    }
}

#[async_trait]
impl TopicMatcher for KeywordMatcher {
    async fn match_topics(&self, query: &str) -> Result<Vec<TopicMatch>> {
        let tokens: Vec<&str> = query.split_whitespace().collect();
        let mut query_weights = HashMap::new();
        for token in &tokens {
            *query_weights.entry(token.to_string()).or_insert(0.0) += 1.0 / tokens.len().max(1) as f64;
        }

        Ok(self
            .topics
            .iter()
            .map(|(id, weights)| TopicMatch {
                topic_id: *id,
                score: weighted_jaccard(&query_weights, weights),
            })
            .collect())
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}

/// Rank-decayed keyword weights, normalized to sum 1: the first keyword of
/// a topic is its most characteristic one.
fn keyword_weights(keywords: &[String]) -> HashMap<String, f64> {
    let n = keywords.len();
    let total: f64 = (1..=n).map(|i| i as f64).sum();

    let mut weights = HashMap::new();
    for (i, keyword) in keywords.iter().enumerate() {
        let rank_weight = (n - i) as f64 / total.max(1.0);
        *weights.entry(keyword.to_lowercase()).or_insert(0.0) += rank_weight;
    }
    weights
}

/// Weighted Jaccard over two keyword weight maps: sum of per-key minima
/// over sum of per-key maxima. 0.0 for disjoint maps, 1.0 for identical.
fn weighted_jaccard(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    let keys: std::collections::HashSet<&String> = a.keys().chain(b.keys()).collect();
    if keys.is_empty() {
        return 0.0;
    }

    let mut min_sum = 0.0;
    let mut max_sum = 0.0;
    for key in keys {
        let wa = a.get(key).copied().unwrap_or(0.0);
        let wb = b.get(key).copied().unwrap_or(0.0);
        min_sum += wa.min(wb);
        max_sum += wa.max(wb);
    }

    if max_sum == 0.0 {
        0.0
    } else {
        min_sum / max_sum
    }
}
