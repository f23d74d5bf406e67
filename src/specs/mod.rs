// src/specs/mod.rs
//! # Page "specs"
//!
//! One module per kind of source page. Each spec encodes *where the data
//! lives in the markup* and *how to extract it tolerantly*, returning small
//! typed row structs.
//!
//! ## What lives here
//! - **Pure HTML parsing** of saved pages (language list, per-letter concept
//!   lists, per-shift-group pages).
//! - **Structural selectors**: table/element classes and row labels
//!   (`Type`, `Language 1`, `Meaning 2`, …), never raw text positions.
//! - **Raw vs display values**: every field that is later used as a lookup key
//!   is kept trimmed but otherwise raw; display forms are derived separately.
//!
//! ## What does **not** live here
//! - **Id assignment** (`registry`), **row shaping** (`rows`), **graph
//!   aggregation** (`graph`), **file I/O** (`pipeline`, `file`).
//!
//! ## Conventions
//! - Case-insensitive tag detection via `core::html`.
//! - A field missing from a fragment is an empty match. Only the shift header
//!   and the meaning rows are mandatory; their absence is an `Error::Malformed*`.
//! - Specs are testable offline against inline fixtures.
pub mod concepts;
pub mod languages;
pub mod shift;
