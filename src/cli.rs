use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::config::DEFAULT_BIND;

#[derive(Debug, Parser)]
#[command(
    name = "docshelf",
    about = "Browse, filter and search folders of PDF reports"
)]
pub struct Cli {
    /// Reports root directory (defaults to the XDG data directory)
    #[arg(long, env = "DOCSHELF_ROOT", global = true)]
    pub root: Option<PathBuf>,

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
    /// Serve the HTTP API until interrupted
    Serve(ServeArgs),
    /// List folders and the documents visible at a cutoff
    Folders(FoldersArgs),
    /// Search document names and text
    Search(SearchArgs),
    /// Show metadata and text for one document
    Info(InfoArgs),
    /// Write the sample report set into the root
    Seed(SeedArgs),
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Serve --

#[derive(Debug, Parser)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "DOCSHELF_BIND", default_value = DEFAULT_BIND)]
    pub bind: String,
}

// -- Folders --

#[derive(Debug, Parser)]
pub struct FoldersArgs {
    /// Only show documents modified at or before this ISO-8601 datetime
    #[arg(long)]
    pub at: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Search --

#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// The search query
    pub query: String,

    /// Only search documents modified at or before this ISO-8601 datetime
    #[arg(long)]
    pub at: Option<String>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Info --

#[derive(Debug, Parser)]
pub struct InfoArgs {
    /// Folder name under the root
    pub folder: String,

    /// Document file name
    pub file: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Seed --

#[derive(Debug, Parser)]
pub struct SeedArgs {
    /// Overwrite sample files that already exist
    #[arg(long)]
    pub force: bool,
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
            "docshelf",
            &mut std::io::stdout(),
        );
    }
}
