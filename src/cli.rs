use crate::index::HeaderTokens;
use crate::naming::SanitizeMode;
use crate::plan::SplitOptions;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "indexsplit")]
#[command(about = "Split a PDF into one file per chapter using a pasted page index")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split a PDF into one file per index entry
    Split(SplitArgs),

    /// Show the page ranges and file names a split would produce
    Plan(SplitArgs),

    /// Display PDF metadata
    Info {
        /// PDF file to inspect
        path: PathBuf,
    },

    /// Show page label mapping (logical vs physical page numbers)
    PageLabels {
        /// PDF file to inspect
        path: PathBuf,
    },

    /// Run as MCP server
    Mcp,
}

#[derive(Args, Debug)]
pub struct SplitArgs {
    /// PDF file to split
    pub path: PathBuf,

    /// Read the index from a file instead of stdin
    #[arg(short, long)]
    pub index: Option<PathBuf>,

    /// PDF page where the first numbered entry starts (skips the prompt)
    #[arg(short, long)]
    pub anchor_page: Option<u32>,

    /// Take the anchor page from the PDF's page labels without prompting
    #[arg(long, conflicts_with = "anchor_page")]
    pub use_page_labels: bool,

    /// Shift applied to roman-numbered front matter entries
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub front_matter_offset: i64,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Text between the sequence number and the title
    #[arg(long, default_value = " ")]
    pub separator: String,

    /// Minimum number of digits in the sequence number
    #[arg(long, default_value_t = 2)]
    pub min_width: usize,

    /// How to make titles safe as file names
    #[arg(long, value_enum, default_value_t = SanitizeMode::Portable)]
    pub sanitize: SanitizeMode,

    /// Skip malformed index lines with a warning instead of stopping
    #[arg(long)]
    pub skip_invalid: bool,

    /// Extra column name recognized in a header row (repeatable)
    #[arg(long = "header-token")]
    pub header_tokens: Vec<String>,

    /// Print the plan without writing any files
    #[arg(long)]
    pub dry_run: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl SplitArgs {
    pub fn options(&self) -> SplitOptions {
        let mut header_tokens = HeaderTokens::default();
        header_tokens.extend(&self.header_tokens);
        SplitOptions {
            output_dir: self.output_dir.clone(),
            separator: self.separator.clone(),
            min_width: self.min_width,
            sanitize: self.sanitize,
            header_tokens,
            front_matter_offset: self.front_matter_offset,
            skip_invalid: self.skip_invalid,
        }
    }
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
    fn test_split_defaults() {
        let cli = Cli::try_parse_from(["indexsplit", "split", "book.pdf"]).unwrap();
        let Commands::Split(args) = cli.command else {
            panic!("expected split");
        };
        let options = args.options();
        assert_eq!(options.output_dir, PathBuf::from("."));
        assert_eq!(options.separator, " ");
        assert_eq!(options.min_width, 2);
        assert_eq!(options.sanitize, SanitizeMode::Portable);
        assert_eq!(options.front_matter_offset, 0);
        assert!(args.anchor_page.is_none());
    }

    #[test]
    fn test_split_flags() {
        let cli = Cli::try_parse_from([
            "indexsplit",
            "-v",
            "split",
            "book.pdf",
            "--anchor-page",
            "5",
            "--front-matter-offset",
            "-2",
            "--sanitize",
            "unix",
            "--header-token",
            "Capítulo",
            "-o",
            "out",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        let Commands::Split(args) = cli.command else {
            panic!("expected split");
        };
        assert_eq!(args.anchor_page, Some(5));
        assert_eq!(args.front_matter_offset, -2);
        assert_eq!(args.sanitize, SanitizeMode::Unix);
        let options = args.options();
        assert!(options.header_tokens.is_header("capítulo", "page"));
        assert_eq!(options.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_split_requires_path() {
        assert!(Cli::try_parse_from(["indexsplit", "split"]).is_err());
    }

    #[test]
    fn test_anchor_sources_conflict() {
        assert!(Cli::try_parse_from([
            "indexsplit",
            "split",
            "book.pdf",
            "--anchor-page",
            "3",
            "--use-page-labels"
        ])
        .is_err());
    }
}
