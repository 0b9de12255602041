use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::record::{Audience, DocType};

#[derive(Debug, Parser)]
#[command(
    name = "docfind",
    about = "Build and query a fuzzy search index for documentation"
)]
pub struct Cli {
    /// Override the XDG data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan a content directory and write the search index
    Build(BuildArgs),
    /// Query the search index
    Search(SearchArgs),
    /// Show the data directory and index statistics
    Status(StatusArgs),
    /// Start MCP server for AI agent integration
    Mcp(McpArgs),
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Build --

#[derive(Debug, Parser)]
pub struct BuildArgs {
    /// Root of the content tree
    pub content_root: PathBuf,

    /// Where to write the index (default: <data-dir>/search-index.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

// -- Search --

#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// The search query
    pub query: String,

    /// Number of results to return
    #[arg(short = 'n', long, default_value = "10")]
    pub limit: usize,

    /// Only results for this audience
    #[arg(long, value_parser = parse_audience)]
    pub audience: Option<Audience>,

    /// Only results in this category
    #[arg(short = 'c', long)]
    pub category: Option<String>,

    /// Only results of this document type
    #[arg(long = "type", value_parser = parse_doc_type)]
    pub doc_type: Option<DocType>,

    /// Match tolerance: 0.0 exact only, 1.0 anything
    #[arg(long, default_value = "0.3")]
    pub threshold: f64,

    /// Include matched ranges per field
    #[arg(long)]
    pub matches: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Index file to query (default: <data-dir>/search-index.json)
    #[arg(long)]
    pub index: Option<PathBuf>,
}

// -- Status --

#[derive(Debug, Parser)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Index file to inspect (default: <data-dir>/search-index.json)
    #[arg(long)]
    pub index: Option<PathBuf>,
}

// -- MCP --

#[derive(Debug, Parser)]
pub struct McpArgs {
    /// Index file to serve (default: <data-dir>/search-index.json)
    #[arg(long)]
    pub index: Option<PathBuf>,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "docfind",
            &mut std::io::stdout(),
        );
    }
}

fn parse_audience(s: &str) -> Result<Audience, String> {
    s.parse()
}

fn parse_doc_type(s: &str) -> Result<DocType, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn parse_search_defaults() {
        let cli = Cli::parse_from(["docfind", "search", "hello"]);
        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.query, "hello");
                assert_eq!(args.limit, 10);
                assert_eq!(args.threshold, 0.3);
                assert!(args.audience.is_none());
                assert!(args.category.is_none());
                assert!(args.doc_type.is_none());
                assert!(!args.json);
                assert!(!args.matches);
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn parse_search_facets() {
        let cli = Cli::parse_from([
            "docfind",
            "search",
            "deploy",
            "--audience",
            "operators",
            "--type",
            "how-to",
            "-c",
            "platform",
        ]);
        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.audience, Some(Audience::Operators));
                assert_eq!(args.doc_type, Some(DocType::HowTo));
                assert_eq!(args.category.as_deref(), Some("platform"));
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn rejects_unknown_audience() {
        let result =
            Cli::try_parse_from(["docfind", "search", "x", "--audience", "aliens"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_build() {
        let cli = Cli::parse_from(["docfind", "-q", "build", "content"]);
        assert!(cli.quiet);
        match cli.command {
            Command::Build(args) => {
                assert_eq!(args.content_root, PathBuf::from("content"));
                assert!(args.output.is_none());
            }
            _ => panic!("expected build command"),
        }
    }

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }
}
