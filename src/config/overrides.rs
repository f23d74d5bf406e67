// src/config/overrides.rs
//! Correction table for glottocodes found on the language page.
//!
//! The language page carries hand-typed cross-references; some are not codes
//! at all. Known bad values map to a replacement (empty = "no valid code").
//! What happens to a malformed code *not* in the table is decided by
//! [`GlottocodePolicy`].

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::csv::{parse_rows, Delim};
use crate::error::Result;

/// Placeholders that appear in the code column instead of a code, and
/// ISO 639-3 codes entered where the glottocode belongs.
const BUILTIN: &[(&str, &str)] = &[
    ("-", ""),
    ("—", ""),
    ("?", ""),
    ("none", ""),
    ("n/a", ""),
    ("deu", "stan1295"),
    ("eng", "stan1293"),
    ("fra", "stan1290"),
    ("lat", "lati1261"),
    ("rus", "russ1263"),
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlottocodePolicy {
    /// Keep the code as scraped.
    PassThrough,
    /// Replace it with the empty string.
    Blank,
    /// Keep it, but list it in the run report.
    #[default]
    Review,
}

impl std::str::FromStr for GlottocodePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "pass_through" | "pass" => Ok(Self::PassThrough),
            "blank" => Ok(Self::Blank),
            "review" => Ok(Self::Review),
            other => Err(format!("Unknown glottocode policy: {other}")),
        }
    }
}

/// Outcome of running one code through the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Correction {
    /// Well-formed and not listed.
    Valid(String),
    /// Listed in the table.
    Corrected { from: String, to: String },
    /// Malformed, not listed; the policy decided the value.
    Unlisted { from: String, kept: String, review: bool },
}

impl Correction {
    pub fn value(&self) -> &str {
        match self {
            Correction::Valid(v) => v,
            Correction::Corrected { to, .. } => to,
            Correction::Unlisted { kept, .. } => kept,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GlottocodeOverrides {
    table: HashMap<String, String>,
    policy: GlottocodePolicy,
}

impl Default for GlottocodeOverrides {
    fn default() -> Self {
        Self::builtin(GlottocodePolicy::default())
    }
}

impl GlottocodeOverrides {
    pub fn builtin(policy: GlottocodePolicy) -> Self {
        let table = BUILTIN.iter().map(|(f, t)| (s!(*f), s!(*t))).collect();
        Self { table, policy }
    }

    pub fn policy(&self) -> GlottocodePolicy { self.policy }

    pub fn insert(&mut self, from: &str, to: &str) {
        self.table.insert(s!(from.trim()), s!(to.trim()));
    }

    /// Merge a two-column TSV (`FROM`, `TO`) into the table.
    /// A first row starting with `FROM` is treated as a header.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<usize> {
        let text = fs::read_to_string(path)?;
        let mut added = 0;
        for row in parse_rows(&text, Delim::Tsv.sep()) {
            let Some(from) = row.first() else { continue };
            if from.eq_ignore_ascii_case("from") { continue; }
            let to = row.get(1).map(String::as_str).unwrap_or("");
            self.insert(from, to);
            added += 1;
        }
        logd!("Overrides: {} entries from {}", added, path.display());
        Ok(added)
    }

    pub fn correct(&self, raw: &str) -> Correction {
        let code = raw.trim();
        if let Some(to) = self.table.get(code) {
            return Correction::Corrected { from: s!(code), to: to.clone() };
        }
        if code.is_empty() || is_well_formed(code) {
            return Correction::Valid(s!(code));
        }
        let (kept, review) = match self.policy {
            GlottocodePolicy::PassThrough => (s!(code), false),
            GlottocodePolicy::Blank => (s!(), false),
            GlottocodePolicy::Review => (s!(code), true),
        };
        Correction::Unlisted { from: s!(code), kept, review }
    }
}

/// Four lowercase alphanumerics followed by four digits, e.g. `russ1263`.
pub fn is_well_formed(code: &str) -> bool {
    let b = code.as_bytes();
    b.len() == 8
        && b[..4].iter().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        && b[4..].iter().all(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_codes() {
        assert!(is_well_formed("russ1263"));
        assert!(is_well_formed("b10b1234"));
        assert!(!is_well_formed("Russ1263"));
        assert!(!is_well_formed("russ126"));
        assert!(!is_well_formed("russ12a3"));
    }

    #[test]
    fn table_entries_win_over_policy() {
        let mut o = GlottocodeOverrides::builtin(GlottocodePolicy::PassThrough);
        o.insert("russ1236", "russ1263");
        assert_eq!(o.correct("russ1236").value(), "russ1263");
        assert_eq!(o.correct(" - ").value(), "");
        assert_eq!(o.correct("russ1263"), Correction::Valid(s!("russ1263")));
    }

    #[test]
    fn builtin_maps_iso_codes_to_glottocodes() {
        let o = GlottocodeOverrides::builtin(GlottocodePolicy::Review);
        assert_eq!(
            o.correct("lat"),
            Correction::Corrected { from: s!("lat"), to: s!("lati1261") }
        );
        assert_eq!(o.correct(" rus ").value(), "russ1263");
        assert!(BUILTIN.iter().all(|(_, to)| to.is_empty() || is_well_formed(to)));
    }

    #[test]
    fn policy_decides_unlisted_codes() {
        let keep = GlottocodeOverrides::builtin(GlottocodePolicy::PassThrough);
        assert_eq!(keep.correct("RUSS-1").value(), "RUSS-1");

        let blank = GlottocodeOverrides::builtin(GlottocodePolicy::Blank);
        assert_eq!(blank.correct("RUSS-1").value(), "");

        let review = GlottocodeOverrides::builtin(GlottocodePolicy::Review);
        assert!(matches!(review.correct("RUSS-1"), Correction::Unlisted { review: true, .. }));
    }

    #[test]
    fn policy_from_str() {
        let pass = "pass-through".parse::<GlottocodePolicy>();
        assert_eq!(pass, Ok(GlottocodePolicy::PassThrough));
        assert_eq!("BLANK".parse::<GlottocodePolicy>(), Ok(GlottocodePolicy::Blank));
        assert!("strict".parse::<GlottocodePolicy>().is_err());
    }
}
