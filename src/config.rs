use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Everything
/// has a default — the dashboard expects its artifacts in ./data and ./model
/// next to the binary, the layout the offline modeling run writes.
pub struct Config {
    /// Directory containing documents.json and sentences.json
    pub data_dir: PathBuf,
    /// Directory containing topic_model.json and the embedding/ subdirectory
    pub model_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let data_dir = env::var("KREIDE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        let model_dir = env::var("KREIDE_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./model"));

        Ok(Self {
            data_dir,
            model_dir,
        })
    }

    /// Path to the document metadata file.
    pub fn documents_path(&self) -> PathBuf {
        self.data_dir.join("documents.json")
    }

    /// Path to the sentence-level data file.
    pub fn sentences_path(&self) -> PathBuf {
        self.data_dir.join("sentences.json")
    }

    /// Path to the serialized topic-model artifact.
    pub fn artifact_path(&self) -> PathBuf {
        self.model_dir.join("topic_model.json")
    }

    /// Directory holding the optional sentence-embedding model
    /// (model.onnx + tokenizer.json) used by the keyword search.
    pub fn embedding_dir(&self) -> PathBuf {
        self.model_dir.join("embedding")
    }

    /// Check that the two JSON data files are present.
    /// Call this before loading the corpus.
    pub fn require_data(&self) -> Result<()> {
        for path in [self.documents_path(), self.sentences_path()] {
            if !path.exists() {
                anyhow::bail!(
                    "Data file not found: {}\n\
                     Set KREIDE_DATA_DIR or run the extraction pipeline to produce it.",
                    path.display()
                );
            }
        }
        Ok(())
    }

    /// Check that the topic-model artifact is present.
    /// Call this before loading the model layer.
    pub fn require_model(&self) -> Result<()> {
        let path = self.artifact_path();
        if !path.exists() {
            anyhow::bail!(
                "Topic-model artifact not found: {}\n\
                 Set KREIDE_MODEL_DIR or run the offline modeling pipeline to produce it.",
                path.display()
            );
        }
        Ok(())
    }

    /// Whether the sentence-embedding model files are on disk.
    /// When absent, the search falls back to keyword matching.
    pub fn embedding_files_present(&self) -> bool {
        let dir = self.embedding_dir();
        dir.join("model.onnx").exists() && dir.join("tokenizer.json").exists()
    }
}
