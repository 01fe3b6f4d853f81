use std::path::{Path, PathBuf};

use crate::cli::{Cli, Command};

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub root: PathBuf,
    pub command: Command,
    /// Whether stdout accepts ANSI colours.
    pub colors: bool,
}

impl RuntimeConfig {
    /// `path` relative to the workspace root; absolute paths pass through.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            root: cli.root,
            command: cli.command,
            colors: supports_color::on(supports_color::Stream::Stdout).is_some(),
        }
    }
}
