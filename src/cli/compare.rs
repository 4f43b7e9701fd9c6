//! Compare command - the full grouping, diff and report pipeline.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;

use crate::config::Config;
use crate::context::Context;
use crate::models::ComparisonMode;
use crate::report::ReportWriter;
use crate::services::ComparisonService;
use crate::source::load_corpus;

/// Group documents by date and write redline reports.
#[derive(Parser)]
pub struct CompareCommand {
    /// Input directory (overrides `paths.input`).
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output directory (overrides `paths.output`).
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Comma-separated names to track, e.g. "Noel,Andy Maki".
    #[arg(long)]
    pub names: Option<String>,

    /// Compare every pair in a date group instead of baseline-vs-each.
    #[arg(long)]
    pub pairwise: bool,

    /// Compare pairs in parallel.
    #[arg(long)]
    pub parallel: bool,

    /// Keep extracted text in memory only.
    #[arg(long)]
    pub no_cache: bool,
}

impl CompareCommand {
    /// Apply command-line overrides to the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(input) = &self.input {
            config.paths.input = input.clone();
        }
        if let Some(out) = &self.out {
            config.paths.output = out.clone();
        }
        if let Some(names) = &self.names {
            config.compare.set_names_csv(names);
        }
        if self.pairwise {
            config.compare.mode = ComparisonMode::Pairwise;
        }
        if self.parallel {
            config.compare.parallel = true;
        }
        if self.no_cache {
            config.paths.cache = None;
        }
    }

    /// Run the compare command.
    pub fn run(self) -> Result<()> {
        let mut config = Config::load()?;
        self.apply(&mut config);
        let ctx = Context::new(config);

        tracing::info!(
            input = %ctx.config.paths.input.display(),
            mode = %ctx.config.compare.mode,
            names = ctx.config.compare.tracked_names().len(),
            "Starting comparison"
        );

        let inputs = load_corpus(
            &ctx.config.paths.input,
            &ctx.config.compare.extensions,
            ctx.source.as_ref(),
            &ctx.cache,
        )?;
        let run = ComparisonService::new(&ctx).run(inputs)?;
        let output = ReportWriter::new(&ctx.config.paths.output).write(&run)?;

        println!("Wrote {}", output.csv.display());
        if !output.failures.is_empty() {
            println!("{} pair(s) failed, see log for details", output.failures.len());
        }
        println!("Open {} in your browser.", output.index.display());

        Ok(())
    }
}
