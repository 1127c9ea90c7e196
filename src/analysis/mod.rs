// Aggregation layer — the memoized, read-only analysis state.
//
// `Analysis` owns the corpus and the model artifact and derives every view
// the dashboard serves. All artifacts load once at startup; each derived
// view is computed on first use and cached for the process lifetime
// (OnceLock), so repeated UI interactions reuse the same result without
// locking.

pub mod aggregate;
pub mod proportions;

use std::sync::OnceLock;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::data::models::SchoolLevel;
use crate::data::Corpus;
use crate::model::artifact::{TopicRow, OTHER_TOPIC_ID};
use crate::model::embedder::cosine_similarity;
use crate::model::TopicModelArtifact;
use aggregate::{
    curriculum_means, level_distribution, level_focus, level_radar, overall_distribution,
    region_matrix, CurriculumMeans, LevelFocusRow, LevelSelection, RadarRow, RegionMatrix,
    TopicShare,
};
use proportions::ProportionMatrix;

/// Headline numbers and data-quality counters for the overview page.
#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub bundeslaender: usize,
    pub kernlehrplaene: usize,
    pub saetze: usize,
    pub themen: usize,
    /// Rows whose residual probability had to be clamped into [0, 1]
    pub residual_clamped: usize,
    pub generated_at: DateTime<Utc>,
}

/// A sentence matching a topic-detail threshold query.
#[derive(Debug, Clone, Serialize)]
pub struct SentenceHit {
    pub phrase: String,
    pub bundesland: String,
    pub stufe: SchoolLevel,
    pub abschnitt: String,
    pub probability: f64,
}

/// Cosine similarities between the assigned topics' embeddings.
#[derive(Debug, Clone, Serialize)]
pub struct TopicSimilarity {
    pub labels: Vec<String>,
    /// values[i][j] = cosine similarity of topics i and j
    pub values: Vec<Vec<f64>>,
}

/// Region matrices for the three level selections, computed together.
struct RegionMatrices {
    sek1: RegionMatrix,
    sek2: RegionMatrix,
    combined: RegionMatrix,
}

pub struct Analysis {
    corpus: Corpus,
    artifact: TopicModelArtifact,
    matrix: ProportionMatrix,

    means: OnceLock<CurriculumMeans>,
    overall: OnceLock<Vec<TopicShare>>,
    per_level: OnceLock<[Vec<TopicShare>; 2]>,
    focus: OnceLock<Vec<LevelFocusRow>>,
    radar: OnceLock<Vec<RadarRow>>,
    regions: OnceLock<RegionMatrices>,
    table: OnceLock<Vec<TopicRow>>,
    similarity: OnceLock<TopicSimilarity>,
}

impl Analysis {
    /// Load corpus and artifact from the configured layout and wire them up.
    pub fn load(config: &Config) -> Result<Self> {
        config.require_model()?;
        let corpus = Corpus::load(config)?;
        let artifact = TopicModelArtifact::load(&config.artifact_path())?;
        Self::new(corpus, artifact)
    }

    /// Build the analysis state from already-parsed artifacts.
    pub fn new(corpus: Corpus, artifact: TopicModelArtifact) -> Result<Self> {
        let matrix = ProportionMatrix::build(&corpus, &artifact)?;

        Ok(Self {
            corpus,
            artifact,
            matrix,
            means: OnceLock::new(),
            overall: OnceLock::new(),
            per_level: OnceLock::new(),
            focus: OnceLock::new(),
            radar: OnceLock::new(),
            regions: OnceLock::new(),
            table: OnceLock::new(),
            similarity: OnceLock::new(),
        })
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn artifact(&self) -> &TopicModelArtifact {
        &self.artifact
    }

    pub fn overview(&self) -> Overview {
        Overview {
            bundeslaender: self.corpus.n_bundeslaender(),
            kernlehrplaene: self.corpus.n_curricula(),
            saetze: self.corpus.n_sentences(),
            themen: self.artifact.n_assigned(),
            residual_clamped: self.matrix.clamped_rows,
            generated_at: self.artifact.generated_at,
        }
    }

    /// Per-curriculum means — the base of every chart view.
    pub fn curriculum_means(&self) -> &CurriculumMeans {
        self.means.get_or_init(|| curriculum_means(&self.matrix))
    }

    /// Mean topic distribution across all curricula.
    pub fn overall_distribution(&self) -> &[TopicShare] {
        self.overall
            .get_or_init(|| overall_distribution(self.curriculum_means()))
    }

    /// Mean topic distribution of one level.
    pub fn level_distribution(&self, level: SchoolLevel) -> &[TopicShare] {
        let both = self.per_level.get_or_init(|| {
            [
                level_distribution(self.curriculum_means(), SchoolLevel::SekI),
                level_distribution(self.curriculum_means(), SchoolLevel::SekII),
            ]
        });
        match level {
            SchoolLevel::SekI => &both[0],
            SchoolLevel::SekII => &both[1],
        }
    }

    /// Level-focus rows, percent, sorted by diff.
    pub fn level_focus(&self) -> &[LevelFocusRow] {
        self.focus.get_or_init(|| level_focus(self.curriculum_means()))
    }

    /// Radar rows, residual dropped, prominence order.
    pub fn level_radar(&self) -> &[RadarRow] {
        self.radar.get_or_init(|| level_radar(self.curriculum_means()))
    }

    /// The regions × topics heatmap for a level selection.
    pub fn region_matrix(&self, selection: LevelSelection) -> &RegionMatrix {
        let matrices = self.regions.get_or_init(|| RegionMatrices {
            sek1: region_matrix(self.curriculum_means(), LevelSelection::Single(SchoolLevel::SekI)),
            sek2: region_matrix(
                self.curriculum_means(),
                LevelSelection::Single(SchoolLevel::SekII),
            ),
            combined: region_matrix(self.curriculum_means(), LevelSelection::Combined),
        });
        match selection {
            LevelSelection::Single(SchoolLevel::SekI) => &matrices.sek1,
            LevelSelection::Single(SchoolLevel::SekII) => &matrices.sek2,
            LevelSelection::Combined => &matrices.combined,
        }
    }

    /// The downloadable topic table, "Sonstiges" last.
    pub fn topic_table(&self) -> &[TopicRow] {
        self.table.get_or_init(|| self.artifact.topic_table())
    }

    /// Pairwise cosine similarity between assigned topic embeddings.
    /// Topics without an embedding are left out.
    pub fn topic_similarity(&self) -> &TopicSimilarity {
        self.similarity.get_or_init(|| {
            let topics: Vec<_> = self
                .artifact
                .assigned_topics()
                .filter(|t| !t.embedding.is_empty())
                .collect();

            let labels = topics.iter().map(|t| t.name.clone()).collect();
            let values = topics
                .iter()
                .map(|a| {
                    topics
                        .iter()
                        .map(|b| cosine_similarity(&a.embedding, &b.embedding))
                        .collect()
                })
                .collect();

            TopicSimilarity { labels, values }
        })
    }

    /// Sentences whose probability for the given topic strictly exceeds
    /// the threshold, in corpus order. The outlier topic is looked up via
    /// its residual column.
    pub fn topic_sentences(&self, topic_id: i64, threshold: f64) -> Result<Vec<SentenceHit>> {
        let column = if topic_id == OTHER_TOPIC_ID {
            self.matrix.width() - 1
        } else {
            self.artifact
                .column_of(topic_id)
                .ok_or_else(|| anyhow::anyhow!("Unknown topic id {topic_id}"))?
        };

        Ok(self
            .corpus
            .sentences
            .iter()
            .zip(&self.matrix.rows)
            .filter(|(_, row)| row.props[column] > threshold)
            .map(|(sentence, row)| SentenceHit {
                phrase: sentence.raw_text.clone(),
                bundesland: sentence.bundesland.clone(),
                stufe: sentence.stufe,
                abschnitt: sentence.titel.clone(),
                probability: row.props[column],
            })
            .collect())
    }

    /// All sentences of one curriculum, in corpus order.
    pub fn curriculum(&self, bundesland: &str, stufe: SchoolLevel) -> Vec<&crate::data::models::Sentence> {
        self.corpus
            .sentences
            .iter()
            .filter(|s| s.bundesland == bundesland && s.stufe == stufe)
            .collect()
    }
}
