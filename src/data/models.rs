// Data models — Rust structs that map to the JSON artifact rows.
//
// These are the types that flow through the application. They're separate
// from the loading code so other modules can use them without touching
// the filesystem.

use serde::{Deserialize, Serialize};

/// One of the two German secondary school levels. Ordinal: Sek I < Sek II.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SchoolLevel {
    #[serde(rename = "Sekundarstufe I")]
    SekI,
    #[serde(rename = "Sekundarstufe II")]
    SekII,
}

impl SchoolLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchoolLevel::SekI => "Sekundarstufe I",
            SchoolLevel::SekII => "Sekundarstufe II",
        }
    }

    /// Parse the German display string, as it appears in the data files
    /// and in UI dropdowns.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Sekundarstufe I" => Some(SchoolLevel::SekI),
            "Sekundarstufe II" => Some(SchoolLevel::SekII),
            _ => None,
        }
    }

    pub const ALL: [SchoolLevel; 2] = [SchoolLevel::SekI, SchoolLevel::SekII];
}

impl std::fmt::Display for SchoolLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A curriculum document — one Kernlehrplan PDF, as extracted offline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: u32,
    /// German federal state this curriculum belongs to
    pub bundesland: String,
    pub stufe: SchoolLevel,
}

/// A sentence row as it appears in sentences.json — references its
/// document by id; region and level are joined in by the loader.
#[derive(Debug, Clone, Deserialize)]
pub struct SentenceRow {
    /// Cleaned text, the form the topic model was trained on
    pub sentence: String,
    /// Original text as extracted from the PDF, shown in the UI
    pub raw_sentence: String,
    /// Id of the owning document
    pub document: u32,
    /// Title of the curriculum section the sentence came from
    pub titel: String,
}

/// A sentence after the document join — carries its curriculum metadata.
/// Immutable once loaded.
#[derive(Debug, Clone, Serialize)]
pub struct Sentence {
    pub text: String,
    pub raw_text: String,
    pub document: u32,
    pub bundesland: String,
    pub stufe: SchoolLevel,
    pub titel: String,
}
