//! Platform default locations for the ambient cache and bundled assets.

use std::fs;
use std::path::{Path, PathBuf};

use super::ResourceOptionsError;

/// Cache directory, relative to the application support directory.
pub const CACHE_SUBDIRECTORY: [&str; 2] = [".mapbox", "maps"];

pub const CACHE_FILE_NAME: &str = "ambient_cache.db";

/// Marks a directory as disposable cache for backup tools
/// (<https://bford.info/cachedir/>).
const CACHEDIR_TAG_NAME: &str = "CACHEDIR.TAG";
const CACHEDIR_TAG: &str = "Signature: 8a477f597d28d172789f06886806bc55\n\
# This file is a cache directory tag created by offline-maps.\n\
# For information about cache directory tags, see https://bford.info/cachedir/\n";

/// Roots used when a resource option leaves a location unset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DefaultLocations {
    pub app_support_dir: Option<PathBuf>,
    pub asset_dir: Option<PathBuf>,
}

impl DefaultLocations {
    /// The platform's application data directory and the directory of the
    /// running executable.
    pub fn platform() -> Self {
        Self {
            app_support_dir: dirs::data_dir(),
            asset_dir: std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(Path::to_path_buf)),
        }
    }

    pub fn new(app_support_dir: impl Into<PathBuf>, asset_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_support_dir: Some(app_support_dir.into()),
            asset_dir: Some(asset_dir.into()),
        }
    }

    /// `<app support>/.mapbox/maps/ambient_cache.db`, creating the directory
    /// and excluding it from backups.
    pub fn cache_path(&self) -> Result<PathBuf, ResourceOptionsError> {
        let app_support_dir = self
            .app_support_dir
            .as_deref()
            .ok_or(ResourceOptionsError::NoApplicationSupportDirectory)?;

        let dir = CACHE_SUBDIRECTORY
            .iter()
            .fold(app_support_dir.to_path_buf(), |dir, part| dir.join(part));

        fs::create_dir_all(&dir).map_err(|source| ResourceOptionsError::CacheDirectory {
            path: dir.clone(),
            source,
        })?;
        exclude_from_backup(&dir);

        tracing::debug!(path = %dir.display(), "using default cache directory");
        Ok(dir.join(CACHE_FILE_NAME))
    }

    pub fn asset_path(&self) -> Result<PathBuf, ResourceOptionsError> {
        self.asset_dir
            .clone()
            .ok_or(ResourceOptionsError::NoAssetDirectory)
    }
}

fn exclude_from_backup(dir: &Path) {
    let tag = dir.join(CACHEDIR_TAG_NAME);
    if tag.is_file() {
        return;
    }

    if let Err(error) = fs::write(&tag, CACHEDIR_TAG) {
        tracing::warn!(path = %tag.display(), %error, "could not exclude cache directory from backups");
    }
}
