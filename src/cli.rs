use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::config::QueryMode;

#[derive(Debug, Parser)]
#[command(
    name = "docsift",
    about = "Build and query search index bundles for static documentation sites"
)]
pub struct Cli {
    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Silence all log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Index a documentation directory into a bundle file
    Build(BuildArgs),
    /// Query an index bundle
    Search(SearchArgs),
    /// Show summary statistics for an index bundle
    Inspect(InspectArgs),
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Build --

#[derive(Debug, Parser)]
pub struct BuildArgs {
    /// Directory containing the documentation sources
    pub dir: PathBuf,

    /// Where to write the bundle
    #[arg(short, long, default_value = "bundle.json")]
    pub out: PathBuf,

    /// Pretty-print the bundle JSON
    #[arg(long)]
    pub pretty: bool,
}

// -- Search --

#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// The search query
    pub query: String,

    /// Bundle to query: a file path or an http(s) URL
    #[arg(short, long)]
    pub index: String,

    /// Number of results to return
    #[arg(short = 'n', long, default_value = "10")]
    pub count: usize,

    /// How query words match index terms
    #[arg(long, value_enum, default_value = "prefix-wildcard")]
    pub mode: QueryMode,

    /// Minimum number of alphanumeric characters before a query runs
    #[arg(long, default_value = "3")]
    pub min_len: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Render results through an HTML template file
    #[arg(long)]
    pub template: Option<PathBuf>,
}

// -- Inspect --

#[derive(Debug, Parser)]
pub struct InspectArgs {
    /// Bundle to inspect: a file path or an http(s) URL
    #[arg(short, long)]
    pub index: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
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
            "docsift",
            &mut std::io::stdout(),
        );
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn parse_search_defaults() {
        let cli = Cli::parse_from([
            "docsift", "search", "hello", "--index", "bundle.json",
        ]);
        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.query, "hello");
                assert_eq!(args.index, "bundle.json");
                assert_eq!(args.count, 10);
                assert_eq!(args.mode, QueryMode::PrefixWildcard);
                assert_eq!(args.min_len, 3);
                assert!(!args.json);
                assert!(args.template.is_none());
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn parse_build_defaults() {
        let cli = Cli::parse_from(["docsift", "build", "docs"]);
        match cli.command {
            Command::Build(args) => {
                assert_eq!(args.dir, PathBuf::from("docs"));
                assert_eq!(args.out, PathBuf::from("bundle.json"));
                assert!(!args.pretty);
            }
            _ => panic!("expected build command"),
        }
    }
}
