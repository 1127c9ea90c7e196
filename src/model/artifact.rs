// Topic-model artifact — everything the offline modeling run saved.
//
// The artifact holds the topic table (including the -1 outlier topic), the
// sentence-level probability matrix, and one embedding vector per topic.
// Embedding, dimensionality reduction, and clustering all happened offline;
// this module only loads and reshapes the result.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Reserved id for sentences the model left unassigned.
pub const OTHER_TOPIC_ID: i64 = -1;

/// German label for the unassigned/other topic.
pub const OTHER_LABEL: &str = "Sonstiges";

/// One topic as the model produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicInfo {
    /// Integer topic id; -1 is reserved for unassigned/other
    pub id: i64,
    /// Curated human label
    pub name: String,
    /// Representative keywords, most characteristic first
    pub keywords: Vec<String>,
    /// Number of sentences the model assigned to this topic
    pub count: u64,
    /// Topic embedding in the model's vector space; may be empty for the
    /// outlier topic, which has no meaningful centroid
    #[serde(default)]
    pub embedding: Vec<f64>,
}

/// The serialized model artifact, loaded from model/topic_model.json.
#[derive(Debug, Clone, Deserialize)]
pub struct TopicModelArtifact {
    /// When the offline modeling run produced this artifact
    pub generated_at: DateTime<Utc>,
    /// All topics, including the -1 outlier row
    pub topics: Vec<TopicInfo>,
    /// Per-sentence probabilities, one column per assigned topic in
    /// ascending id order. Rows align with sentences.json.
    pub probabilities: Vec<Vec<f64>>,
}

/// One row of the downloadable topic table. Field names match the German
/// column labels the dashboard shows.
#[derive(Debug, Clone, Serialize)]
pub struct TopicRow {
    pub id: i64,
    #[serde(rename = "Thema")]
    pub name: String,
    #[serde(rename = "Schlüsselwörter")]
    pub keywords: Vec<String>,
    #[serde(rename = "Anzahl")]
    pub count: u64,
}

impl TopicModelArtifact {
    /// Load and validate the artifact from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let artifact: TopicModelArtifact = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        artifact.validate()?;

        info!(
            topics = artifact.n_assigned(),
            sentences = artifact.probabilities.len(),
            generated_at = %artifact.generated_at,
            "Loaded topic-model artifact"
        );

        Ok(artifact)
    }

    /// Structural checks: assigned topics sorted by id, probability rows as
    /// wide as the assigned-topic count, probabilities non-negative.
    pub fn validate(&self) -> Result<()> {
        if self.assigned_topics().next().is_none() {
            anyhow::bail!("Artifact contains no assigned topics (only the outlier row?)");
        }

        let ids: Vec<i64> = self.assigned_topics().map(|t| t.id).collect();
        if !ids.windows(2).all(|w| w[0] < w[1]) {
            anyhow::bail!("Assigned topic ids must be strictly ascending, got {ids:?}");
        }

        let width = ids.len();
        for (i, row) in self.probabilities.iter().enumerate() {
            if row.len() != width {
                anyhow::bail!(
                    "Probability row {} has {} columns, expected {} (one per assigned topic)",
                    i,
                    row.len(),
                    width
                );
            }
            if let Some(p) = row.iter().find(|p| **p < 0.0 || !p.is_finite()) {
                anyhow::bail!("Probability row {} contains invalid value {}", i, p);
            }
        }

        Ok(())
    }

    /// Topics the model actually assigned (id >= 0), in column order.
    pub fn assigned_topics(&self) -> impl Iterator<Item = &TopicInfo> {
        self.topics.iter().filter(|t| t.id != OTHER_TOPIC_ID)
    }

    pub fn n_assigned(&self) -> usize {
        self.assigned_topics().count()
    }

    /// Find a topic by id, including the outlier.
    pub fn topic_by_id(&self, id: i64) -> Option<&TopicInfo> {
        self.topics.iter().find(|t| t.id == id)
    }

    /// Column index of a topic in the probability matrix.
    /// The outlier has no column — its share is the residual.
    pub fn column_of(&self, id: i64) -> Option<usize> {
        self.assigned_topics().position(|t| t.id == id)
    }

    /// Labels of the assigned topics in column order.
    pub fn assigned_labels(&self) -> Vec<String> {
        self.assigned_topics().map(|t| t.name.clone()).collect()
    }

    /// The downloadable topic table: assigned topics in id order, then the
    /// outlier row relabeled to "Sonstiges" at the end.
    pub fn topic_table(&self) -> Vec<TopicRow> {
        let mut table: Vec<TopicRow> = self
            .assigned_topics()
            .map(|t| TopicRow {
                id: t.id,
                name: t.name.clone(),
                keywords: t.keywords.clone(),
                count: t.count,
            })
            .collect();

        if let Some(other) = self.topic_by_id(OTHER_TOPIC_ID) {
            table.push(TopicRow {
                id: OTHER_TOPIC_ID,
                name: OTHER_LABEL.to_string(),
                keywords: other.keywords.clone(),
                count: other.count,
            });
        }

        table
    }
}
