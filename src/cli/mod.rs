//! CLI module for docket-diff.
//!
//! Subcommands:
//! - `compare`: Group the corpus by date and write redline reports
//! - `date`: Print the resolved date of individual files
//! - `tag`: Classify every document against the rule table

mod compare;
mod date;
mod tag;

use clap::{Parser, Subcommand};

pub use compare::CompareCommand;
pub use date::DateCommand;
pub use tag::TagCommand;

/// docket-diff - date-grouped tamper detection
#[derive(Parser)]
#[command(name = "docket-diff")]
#[command(about = "Compare case documents that describe the same date")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Group documents by date, diff each group and write reports
    Compare(CompareCommand),

    /// Print the resolved date of each file
    Date(DateCommand),

    /// Classify documents and score legal keywords
    Tag(TagCommand),
}

impl App {
    /// Run the CLI application.
    pub fn run(self) -> color_eyre::Result<()> {
        match self.command {
            Command::Compare(cmd) => cmd.run(),
            Command::Date(cmd) => cmd.run(),
            Command::Tag(cmd) => cmd.run(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compare_flags() {
        let app = App::try_parse_from([
            "docket-diff",
            "-v",
            "compare",
            "--input",
            "docs",
            "--names",
            "Noel,Andy Maki",
            "--pairwise",
        ])
        .unwrap();
        assert!(app.verbose);
        match app.command {
            Command::Compare(cmd) => {
                assert_eq!(cmd.input.as_deref(), Some(std::path::Path::new("docs")));
                assert_eq!(cmd.names.as_deref(), Some("Noel,Andy Maki"));
                assert!(cmd.pairwise);
                assert!(!cmd.parallel);
            }
            _ => panic!("expected compare"),
        }
    }

    #[test]
    fn test_parse_date_requires_files() {
        assert!(App::try_parse_from(["docket-diff", "date"]).is_err());
        let app = App::try_parse_from(["docket-diff", "date", "a.txt", "b.txt"]).unwrap();
        match app.command {
            Command::Date(cmd) => assert_eq!(cmd.files.len(), 2),
            _ => panic!("expected date"),
        }
    }
}
