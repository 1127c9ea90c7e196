// Proportion matrix — sentence-level topic probabilities plus the residual.
//
// Each row pairs a sentence's curriculum key (bundesland, stufe) with its
// topic probabilities and the implicit "Sonstiges" share: the probability
// mass the model did not assign to any topic, 1 − Σ p. The residual must
// land in [0, 1]; rows that violate this are clamped and counted as a
// data-quality condition rather than rejected.

use anyhow::Result;
use tracing::warn;

use crate::data::models::SchoolLevel;
use crate::data::Corpus;
use crate::model::artifact::{TopicModelArtifact, OTHER_LABEL};

/// One sentence's probabilities keyed by curriculum.
/// `props` has one entry per assigned topic plus the residual last.
#[derive(Debug, Clone)]
pub struct ProportionRow {
    pub bundesland: String,
    pub stufe: SchoolLevel,
    pub props: Vec<f64>,
}

/// The full sentence × topic proportion matrix.
#[derive(Debug, Clone)]
pub struct ProportionMatrix {
    /// Column labels: assigned topic names, then "Sonstiges"
    pub labels: Vec<String>,
    /// Rows aligned with the corpus sentence order
    pub rows: Vec<ProportionRow>,
    /// How many rows needed their residual clamped into [0, 1]
    pub clamped_rows: usize,
}

impl ProportionMatrix {
    /// Build the matrix by attaching curriculum keys and the residual
    /// column to the artifact's probability rows.
    ///
    /// Fails if the probability matrix and the corpus disagree on the
    /// number of sentences — the artifacts were produced by different runs.
    pub fn build(corpus: &Corpus, artifact: &TopicModelArtifact) -> Result<Self> {
        if corpus.sentences.len() != artifact.probabilities.len() {
            anyhow::bail!(
                "Corpus has {} sentences but the artifact has {} probability rows.\n\
                 The data and model artifacts are from different pipeline runs.",
                corpus.sentences.len(),
                artifact.probabilities.len()
            );
        }

        let mut labels = artifact.assigned_labels();
        labels.push(OTHER_LABEL.to_string());

        let mut rows = Vec::with_capacity(corpus.sentences.len());
        let mut clamped_rows = 0;

        for (sentence, probs) in corpus.sentences.iter().zip(&artifact.probabilities) {
            let assigned_sum: f64 = probs.iter().sum();
            let residual = 1.0 - assigned_sum;

            let residual = if (0.0..=1.0).contains(&residual) {
                residual
            } else {
                clamped_rows += 1;
                residual.clamp(0.0, 1.0)
            };

            let mut props = probs.clone();
            props.push(residual);

            rows.push(ProportionRow {
                bundesland: sentence.bundesland.clone(),
                stufe: sentence.stufe,
                props,
            });
        }

        if clamped_rows > 0 {
            warn!(
                rows = clamped_rows,
                total = rows.len(),
                "Residual probability outside [0, 1]; clamped"
            );
        }

        Ok(Self {
            labels,
            rows,
            clamped_rows,
        })
    }

    /// Number of columns, residual included.
    pub fn width(&self) -> usize {
        self.labels.len()
    }
}
