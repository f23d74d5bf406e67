//! Error types for the pipeline.
//!
//! The first three variants are recoverable: the pipeline logs them, records
//! them in its skip report and moves on. `Unresolved*` means an id escaped the
//! registry, which is a bug, and aborts the run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed page {page}: {reason}")]
    MalformedPage { page: String, reason: String },

    #[error("malformed fragment {fragment} on page {page}: {reason}")]
    MalformedFragment {
        page: String,
        fragment: usize,
        reason: String,
    },

    #[error(
        "unsupported shape on page {page}, fragment {fragment}: \
         {languages} language(s), {lexemes} lexeme(s), {meanings} meaning(s)"
    )]
    UnsupportedShape {
        page: String,
        fragment: usize,
        languages: usize,
        lexemes: usize,
        meanings: usize,
    },

    #[error("language id {0} has no registry entry")]
    UnresolvedLanguage(u32),

    #[error("concept id {0} has no registry entry")]
    UnresolvedConcept(u32),

    #[error("input: {0}")]
    Input(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    /// Errors that only cost one page/fragment/record; everything else is fatal.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            Error::MalformedPage { .. }
                | Error::MalformedFragment { .. }
                | Error::UnsupportedShape { .. }
        )
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
