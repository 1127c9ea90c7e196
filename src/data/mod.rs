// Data layer — the two JSON inputs and the joined, read-only corpus.

pub mod loader;
pub mod models;

pub use loader::Corpus;
