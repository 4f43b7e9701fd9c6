//! Date command - show how individual files resolve.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;

use crate::models::file_name;
use crate::services::date::resolve_date_with_source;
use crate::source::{PlainTextSource, TextSource};

/// Print the resolved date of each file.
#[derive(Parser)]
pub struct DateCommand {
    /// Files to inspect.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Container creation date to fall back on, e.g. "D:20231215093000".
    #[arg(long)]
    pub container_date: Option<String>,
}

impl DateCommand {
    /// Run the date command.
    pub fn run(self) -> Result<()> {
        let source = PlainTextSource::default();

        for path in &self.files {
            // Unreadable or unsupported files still resolve from their name.
            let text = match source.extract_text(path) {
                Ok(text) => text,
                Err(err) => {
                    tracing::debug!(path = %path.display(), error = %err, "Using file name only");
                    String::new()
                }
            };
            let filename = file_name(path);
            let container = self.container_date.clone().or_else(|| source.container_date(path));

            match resolve_date_with_source(&text, &filename, container.as_deref()) {
                Some((date, from)) => println!("{}\t{}\t{}", path.display(), date, from),
                None => println!("{}\tunknown", path.display()),
            }
        }

        Ok(())
    }
}
