use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::data::LogLevel;

/// Browse a directory tree annotated by its `.dirnotes.json` sidecar.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    #[clap(long, short, default_value = "warn", value_enum, global = true)]
    pub log_level: LogLevel,

    /// The root directory of the annotated tree
    #[clap(long, short, default_value = ".", global = true)]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Paths are resolved against `--root` unless absolute.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the visible tree with annotations
    Tree {
        /// Deepest level to expand; the root's children are level 1
        #[clap(long, short)]
        depth: Option<usize>,
    },
    /// Show the description and tooltip for an entry name
    Describe { name: String },
    Stat { path: PathBuf },
    /// List a directory with entry kinds
    Ls {
        #[clap(default_value = ".")]
        path: PathBuf,
    },
    Cat { path: PathBuf },
    Write {
        path: PathBuf,
        content: String,
        /// Fail instead of creating a missing file
        #[clap(long)]
        no_create: bool,
        #[clap(long)]
        overwrite: bool,
    },
    Mkdir { path: PathBuf },
    Rm {
        path: PathBuf,
        /// Remove directories and their contents
        #[clap(long, short = 'R')]
        recursive: bool,
    },
    Mv {
        from: PathBuf,
        to: PathBuf,
        #[clap(long)]
        overwrite: bool,
    },
    /// Stream classified change events until interrupted
    Watch {
        #[clap(long)]
        no_recursive: bool,
        /// Glob of root-relative paths to ignore; may be repeated
        #[clap(long = "exclude", short)]
        excludes: Vec<String>,
    },
}
