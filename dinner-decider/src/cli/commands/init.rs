//! Init command - write the default configuration file

use anyhow::{Context, Result, bail};
use dinner_decider_core::PipelineConfig;
use dinner_decider_core::pipeline::config::default_config_path;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::cli::app::InitArgs;

/// Handle the init command
pub async fn execute(args: InitArgs, config_path: Option<&Path>) -> Result<()> {
    let path: PathBuf = match config_path {
        Some(path) => path.to_path_buf(),
        None => default_config_path().context("No configuration directory on this platform")?,
    };

    write_default(&path, args.force)?;
    info!("Wrote default configuration to {}", path.display());
    println!("✅ Configuration written to {}", path.display());

    Ok(())
}

fn write_default(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    PipelineConfig::default().save(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_default_respects_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/config.toml");

        write_default(&path, false).unwrap();
        assert!(PipelineConfig::from_file(&path).is_ok());
        assert!(write_default(&path, false).is_err());
        assert!(write_default(&path, true).is_ok());
    }
}
