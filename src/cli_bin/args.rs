//! Command-line argument definitions and parsing

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Main CLI application
#[derive(Parser)]
#[command(
    name = "blogmatter",
    version,
    about = "Manage drafts, publishing and the index of a markdown blog",
    long_about = "blogmatter keeps drafts and published posts in two directory trees whose \
                  sub-directories act as tag paths. It scaffolds new posts, moves drafts into \
                  the published tree without overwriting anything, and regenerates an index \
                  of everything published."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file to use instead of the discovered one
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Create a new draft
    Draft(DraftArgs),
    /// Create a post directly in the published area
    New(NewArgs),
    /// Move a draft into the published area
    Pub(PubArgs),
    /// Regenerate the index of published posts
    Gen(GenArgs),
    /// List documents of one area
    List(ListArgs),
    /// Show tag paths already in use
    Tags,
}

/// Arguments for the draft command
#[derive(Args, Debug)]
pub struct DraftArgs {
    /// Title of the draft; prompts when omitted
    pub title: Option<String>,

    /// Tag path, segments separated by commas (e.g. "Go,Basics")
    #[arg(short, long, value_name = "TAGS")]
    pub tags: Option<String>,
}

/// Arguments for the new command
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Title of the post; prompts when omitted
    pub title: Option<String>,

    /// Tag path, segments separated by slashes (e.g. "Go/Basics")
    #[arg(short, long, value_name = "TAGS")]
    pub tags: Option<String>,
}

/// Arguments for the pub command
#[derive(Args, Debug)]
pub struct PubArgs {
    /// Draft to publish, relative to the draft area or the working directory;
    /// prompts when omitted
    pub path: Option<PathBuf>,
}

/// Arguments for the gen command
#[derive(Args, Debug)]
pub struct GenArgs {
    /// Write the index here instead of the configured output
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the index instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Area to list
    #[arg(long, value_enum, default_value_t = AreaArg::Published)]
    pub area: AreaArg,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaArg {
    Draft,
    Published,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per document
    Text,
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_draft_with_tags() {
        let cli = Cli::parse_from(["blogmatter", "-v", "draft", "Hello World", "-t", "Go,Basics"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Draft(args) => {
                assert_eq!(args.title.as_deref(), Some("Hello World"));
                assert_eq!(args.tags.as_deref(), Some("Go,Basics"));
            }
            _ => panic!("expected draft"),
        }
    }

    #[test]
    fn test_parse_list_defaults() {
        let cli = Cli::parse_from(["blogmatter", "list", "--format", "json"]);
        match cli.command {
            Commands::List(args) => {
                assert_eq!(args.area, AreaArg::Published);
                assert_eq!(args.format, OutputFormat::Json);
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["blogmatter", "-v", "-q", "tags"]).is_err());
    }
}
