// Corpus loading — reads documents.json and sentences.json and joins them.
//
// The join mirrors the offline pipeline's structure: sentences reference
// their document by id, documents carry the (bundesland, stufe) metadata.
// Everything is loaded once at startup and is read-only afterwards.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::info;

use super::models::{Document, SchoolLevel, Sentence, SentenceRow};
use crate::config::Config;

/// The joined, read-only sentence corpus.
#[derive(Debug, Clone)]
pub struct Corpus {
    pub documents: Vec<Document>,
    pub sentences: Vec<Sentence>,
}

impl Corpus {
    /// Load the corpus from the configured data directory.
    pub fn load(config: &Config) -> Result<Self> {
        config.require_data()?;

        let documents: Vec<Document> = read_json_file(&config.documents_path())?;
        let rows: Vec<SentenceRow> = read_json_file(&config.sentences_path())?;

        let corpus = Self::from_parts(documents, rows)?;

        info!(
            documents = corpus.documents.len(),
            sentences = corpus.sentences.len(),
            "Loaded curriculum corpus"
        );

        Ok(corpus)
    }

    /// Join sentence rows to their owning documents.
    ///
    /// A sentence referencing an unknown document id is a broken artifact,
    /// not a recoverable condition — the error names the offending row.
    pub fn from_parts(documents: Vec<Document>, rows: Vec<SentenceRow>) -> Result<Self> {
        let by_id: HashMap<u32, &Document> = documents.iter().map(|d| (d.id, d)).collect();

        let mut sentences = Vec::with_capacity(rows.len());
        for (i, row) in rows.into_iter().enumerate() {
            let doc = by_id.get(&row.document).with_context(|| {
                format!(
                    "Sentence {} references unknown document id {}",
                    i, row.document
                )
            })?;

            sentences.push(Sentence {
                text: row.sentence,
                raw_text: row.raw_sentence,
                document: row.document,
                bundesland: doc.bundesland.clone(),
                stufe: doc.stufe,
                titel: row.titel,
            });
        }

        Ok(Self {
            documents,
            sentences,
        })
    }

    /// Sorted list of federal states present in the data.
    pub fn bundeslaender(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .documents
            .iter()
            .map(|d| d.bundesland.as_str())
            .collect();
        set.into_iter().map(String::from).collect()
    }

    /// The distinct (bundesland, stufe) pairs — one per curriculum.
    pub fn curricula(&self) -> BTreeSet<(String, SchoolLevel)> {
        self.documents
            .iter()
            .map(|d| (d.bundesland.clone(), d.stufe))
            .collect()
    }

    pub fn n_bundeslaender(&self) -> usize {
        self.bundeslaender().len()
    }

    pub fn n_curricula(&self) -> usize {
        self.curricula().len()
    }

    pub fn n_sentences(&self) -> usize {
        self.sentences.len()
    }
}

/// Read and deserialize a JSON file with a path-bearing error.
fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("Failed to parse {}", path.display()))
}
