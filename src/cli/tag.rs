//! Tag command - classify documents and score legal keywords.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use color_eyre::Result;
use serde::Serialize;

use crate::config::Config;
use crate::context::Context;
use crate::models::{file_name, Classification, LawMatch};
use crate::services::classify::{detect_laws, Classifier};
use crate::services::date::resolve_date;
use crate::source::load_corpus;

/// Classify every document in the input directory and print JSON.
#[derive(Parser)]
pub struct TagCommand {
    /// Input directory (overrides `paths.input`).
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

/// Tagging output for one document.
#[derive(Debug, Serialize)]
pub struct DocumentTags {
    pub path: String,
    pub date: Option<NaiveDate>,
    #[serde(flatten)]
    pub classification: Classification,
    pub laws: Vec<LawMatch>,
}

impl TagCommand {
    /// Run the tag command.
    pub fn run(self) -> Result<()> {
        let mut config = Config::load()?;
        if let Some(input) = &self.input {
            config.paths.input = input.clone();
        }
        let ctx = Context::new(config);

        let classifier = Classifier::new(&ctx.config.tagging.rules)?;
        let inputs = load_corpus(
            &ctx.config.paths.input,
            &ctx.config.compare.extensions,
            ctx.source.as_ref(),
            &ctx.cache,
        )?;

        let mut tags = Vec::with_capacity(inputs.len());
        for input in &inputs {
            let filename = file_name(&input.path);
            let classification = classifier.classify(&input.text, &filename);
            tracing::debug!(
                path = %input.path.display(),
                category = %classification.category,
                confidence = classification.confidence,
                "Classified document"
            );
            tags.push(DocumentTags {
                path: input.path.display().to_string(),
                date: resolve_date(&input.text, &filename, input.container_date.as_deref()),
                classification,
                laws: detect_laws(&input.text, &ctx.config.tagging.laws)?,
            });
        }

        println!("{}", serde_json::to_string_pretty(&tags)?);
        Ok(())
    }
}
