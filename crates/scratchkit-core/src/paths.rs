use crate::error::{Result, ScratchError};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const DEFINITION_FILE: &str = "project-scratch-def.json";
pub const DEFAULT_OUTPUT_DIR: &str = "config";

pub const CONFIG_DIR: &str = ".scratchkit";
pub const CONFIG_FILE: &str = "orgs.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `<base>/<output_dir>/project-scratch-def.json`.
pub fn definition_path(base: &Path, output_dir: &Path) -> PathBuf {
    base.join(output_dir).join(DEFINITION_FILE)
}

pub fn config_path(home: &Path) -> PathBuf {
    home.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// `~/.scratchkit/orgs.yaml`.
pub fn default_config_path() -> Result<PathBuf> {
    home::home_dir()
        .map(|h| config_path(&h))
        .ok_or(ScratchError::HomeNotFound)
}
