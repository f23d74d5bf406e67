// src/cli.rs
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::consts::PROGRESS_EVERY;
use crate::config::options::PipelineOptions;
use crate::config::overrides::GlottocodePolicy;
use crate::csv::Delim;
use crate::pipeline::{self, RunSummary, SkipKind};
use crate::progress::LogProgress;

#[derive(Debug, Parser)]
#[command(author, version, about = "Semantic-shift pages → language, concept and shift tables")]
pub struct Args {
    /// TOML file with pipeline options; flags below win over it.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding `languages.html` and the page subdirectories.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// `csv` or `tsv`.
    #[arg(long)]
    pub format: Option<Delim>,

    /// Unlisted glottocodes: `pass_through`, `blank` or `review`.
    #[arg(long)]
    pub policy: Option<GlottocodePolicy>,

    /// Extra glottocode corrections, `FROM<TAB>TO` per line.
    #[arg(long)]
    pub overrides: Option<PathBuf>,

    /// Gloss table (`ENGLISH, CONCEPTICON_ID, CONCEPTICON_GLOSS`) for `concepts-mapped`.
    #[arg(long)]
    pub mapping: Option<PathBuf>,

    /// Debug logging (RUST_LOG still wins).
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Config file (or defaults), then flags on top.
    pub fn options(&self) -> Result<PipelineOptions> {
        let mut opts = match &self.config {
            Some(p) => PipelineOptions::load(p)
                .wrap_err_with(|| format!("loading config {}", p.display()))?,
            None => PipelineOptions::default(),
        };
        if let Some(v) = &self.input { opts.input_dir = v.clone(); }
        if let Some(v) = &self.output { opts.output_dir = v.clone(); }
        if let Some(v) = self.format { opts.format = v; }
        if let Some(v) = self.policy { opts.glottocode_policy = v; }
        if let Some(v) = &self.overrides { opts.overrides_file = Some(v.clone()); }
        if let Some(v) = &self.mapping { opts.mapping_file = Some(v.clone()); }
        Ok(opts)
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .init();
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let opts = args.options()?;
    logd!("Options: {:?}", opts);

    let mut progress = LogProgress::new(PROGRESS_EVERY);
    let summary = match pipeline::run(&opts, Some(&mut progress)) {
        Ok(s) => s,
        Err(e) => {
            loge!("Run aborted: {}", e);
            return Err(e).wrap_err_with(|| format!("processing {}", opts.input_dir.display()));
        }
    };
    report(&summary);
    Ok(())
}

fn report(summary: &RunSummary) {
    logf!("{} shift pages, {} records", summary.pages, summary.records);
    for kind in [SkipKind::Page, SkipKind::Fragment, SkipKind::Shape] {
        let n = summary.skips.iter().filter(|s| s.kind == kind).count();
        if n > 0 {
            logw!("Skipped {} × {}", n, kind);
        }
    }
    if summary.violations > 0 {
        logw!("{} undirected edges disagree between their two directions", summary.violations);
    }
    for (id, code) in &summary.review {
        logw!("Review glottocode {:?} for language {}", code, id);
    }
    for path in &summary.files_written {
        println!("{}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config_defaults() {
        let args = Args::parse_from([
            "datsemshift", "--input", "pages", "--format", "csv", "--policy", "blank",
        ]);
        let opts = args.options().unwrap();
        assert_eq!(opts.input_dir, PathBuf::from("pages"));
        assert_eq!(opts.format, Delim::Csv);
        assert_eq!(opts.glottocode_policy, GlottocodePolicy::Blank);
        assert_eq!(opts.mapping_file, None);
    }
}
