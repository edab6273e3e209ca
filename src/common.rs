use std::{
    env, fs,
    path::{Component, Path, PathBuf},
};

use anyhow::{Context, Result, anyhow, bail};
use log::{debug, info};

pub const PROJECT_NAME: &str = env!("CARGO_PKG_NAME");
pub const PROJECT_VERSION: &str = env!("GIT_VERSION");
pub const PROJECT_VERSION_HASH: &str = env!("GIT_HASH");

/// Environment variable to override the config directory.
///
/// Example usage in tests:
///   export PROMPTKIT_CONFIG_DIR="/tmp/test-config/promptkit"
const ENV_CONFIG_DIR_OVERRIDE: &str = "PROMPTKIT_CONFIG_DIR";

pub fn print_header() {
    println!("{PROJECT_NAME} {PROJECT_VERSION} ({PROJECT_VERSION_HASH})");
}

/// Returns the project data directory, creating it with secure permissions if needed.
///
/// Returns: Path to `~/.local/share/promptkit` (or equivalent)
pub fn project_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| {
        anyhow!("Unable to determine data directory. Ensure XDG_DATA_HOME or HOME environment variable is set")
    })?;

    let project_data_dir = data_dir.join(PROJECT_NAME);

    create_secure_directory(&project_data_dir)?;

    Ok(project_data_dir)
}

/// Returns the project config directory, creating it with secure permissions if needed.
///
/// If `PROMPTKIT_CONFIG_DIR` is set, uses that path directly (validated for
/// safety). Otherwise falls back to `dirs::config_dir()/promptkit`.
pub fn project_config_dir() -> Result<PathBuf> {
    let override_dir = env::var(ENV_CONFIG_DIR_OVERRIDE).ok();
    let project_config_dir = resolve_config_dir(override_dir.as_deref())?;

    create_secure_directory(&project_config_dir)?;

    Ok(project_config_dir)
}

fn resolve_config_dir(override_dir: Option<&str>) -> Result<PathBuf> {
    let Some(override_dir) = override_dir else {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            anyhow!("Unable to determine config directory. Ensure XDG_CONFIG_HOME or HOME environment variable is set")
        })?;
        return Ok(config_dir.join(PROJECT_NAME));
    };

    let path = PathBuf::from(override_dir);

    if !path.is_absolute() {
        bail!("{ENV_CONFIG_DIR_OVERRIDE} must be an absolute path: {override_dir}");
    }
    // Reject path traversal
    if path.components().any(|c| c == Component::ParentDir) {
        bail!("{ENV_CONFIG_DIR_OVERRIDE} contains parent directory references: {override_dir}");
    }

    info!(
        "Using config directory override from {ENV_CONFIG_DIR_OVERRIDE}: {}",
        path.display()
    );
    Ok(path)
}

/// Creates a directory with owner-only permissions (0700 on Unix).
///
/// Pre-existing directories have their permissions corrected.
#[cfg(unix)]
pub(crate) fn create_secure_directory(dir: &Path) -> Result<()> {
    use std::fs::DirBuilder;
    use std::os::unix::fs::DirBuilderExt;
    use std::os::unix::fs::PermissionsExt;

    debug!("Creating secure directory: {}", dir.display());

    // DirBuilder with mode sets permissions atomically at creation
    let mut builder = DirBuilder::new();
    builder.recursive(true).mode(0o700);

    builder
        .create(dir)
        .with_context(|| format!("Unable to create directory: {}", dir.display()))?;

    let perms = fs::Permissions::from_mode(0o700);
    fs::set_permissions(dir, perms)
        .with_context(|| format!("Unable to set permissions on directory: {}", dir.display()))?;

    Ok(())
}

#[cfg(not(unix))]
pub(crate) fn create_secure_directory(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Unable to create directory: {}", dir.display()))?;
    Ok(())
}
