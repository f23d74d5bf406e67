// src/config/options.rs
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::consts::*;
use super::overrides::{GlottocodeOverrides, GlottocodePolicy};
use crate::csv::Delim;
use crate::error::Result;

/// Everything one run needs. Loaded from an optional TOML file; CLI flags
/// are applied on top by the frontend.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub format: Delim,
    pub glottocode_policy: GlottocodePolicy,
    /// Extra `FROM\tTO` glottocode corrections merged over the built-in table.
    pub overrides_file: Option<PathBuf>,
    /// Gloss → registry table for the `concepts-mapped` output.
    pub mapping_file: Option<PathBuf>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUT_DIR),
            format: Delim::default(),
            glottocode_policy: GlottocodePolicy::default(),
            overrides_file: None,
            mapping_file: None,
        }
    }
}

impl PipelineOptions {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Built-in corrections plus the optional overrides file.
    pub fn overrides(&self) -> Result<GlottocodeOverrides> {
        let mut o = GlottocodeOverrides::builtin(self.glottocode_policy);
        if let Some(p) = &self.overrides_file {
            o.extend_from_file(p)?;
        }
        Ok(o)
    }

    pub fn languages_page(&self) -> PathBuf { self.input_dir.join(LANGUAGES_PAGE) }
    pub fn concepts_dir(&self) -> PathBuf { self.input_dir.join(CONCEPTS_SUBDIR) }
    pub fn shifts_dir(&self) -> PathBuf { self.input_dir.join(SHIFTS_SUBDIR) }

    /// `<output_dir>/<stem>.<csv|tsv>`
    pub fn out_path(&self, stem: &str) -> PathBuf {
        self.output_dir.join(format!("{stem}.{}", self.format.ext()))
    }
}
