//! Configuration loading for the node runner.

use anyhow::{Context, Result};
use bookchain_node::NodeConfig;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Default config file location (`~/.config/bookchain/config.toml` or the
/// platform equivalent).
pub fn default_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("net", "bookchain", "bookchain")
        .context("could not determine config directory")?;
    Ok(dirs.config_dir().join("config.toml"))
}

/// Load the node configuration from `path`, or the default location when no
/// path is given. A missing default file is not an error as long as the
/// router URL arrives via a flag; an explicitly named file must exist.
pub fn load(path: Option<&Path>) -> Result<Option<NodeConfig>> {
    let (path, explicit) = match path {
        Some(p) => (p.to_owned(), true),
        None => (default_path()?, false),
    };

    if !path.exists() {
        if explicit {
            anyhow::bail!("config file not found: {}", path.display());
        }
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: NodeConfig = toml::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(Some(config))
}
