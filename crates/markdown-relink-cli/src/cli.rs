use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// markdown-relink - rewrite wikilinks and reference links into relative links
///
/// ```bash
/// markdown-relink init                  # Write a default relink.toml
/// markdown-relink rewrite               # Rewrite docs/ in place
/// markdown-relink rewrite --out site/   # Write the rewritten tree elsewhere
/// markdown-relink file guide/setup.md   # Print one rewritten document
/// ```
#[derive(Parser, Debug)]
#[command(name = "markdown-relink")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: ./relink.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log every link that is left unchanged
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rewrite every markdown document of the docs tree
    Rewrite {
        /// Docs directory, overriding `docs_path` from the config
        #[arg(short, long, value_name = "DIR")]
        docs: Option<PathBuf>,

        /// Write the rewritten tree here instead of in place
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// Print one rewritten document to stdout
    File {
        /// Document path relative to the docs directory
        doc: String,

        /// Docs directory, overriding `docs_path` from the config
        #[arg(short, long, value_name = "DIR")]
        docs: Option<PathBuf>,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}
