//! Resource options: where map resources come from and where they are cached.

pub mod locations;
pub mod tile_store;

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use crate::access_token::{AccessToken, REDACTION_INDENT, redacted};

pub use locations::{CACHE_FILE_NAME, DefaultLocations};
pub use tile_store::{TileFetchRoute, TilePackLookup, TileStore, TileStoreSelection, TileStoreUsageMode};

/// Ambient cache size used when none is given: 50 MiB.
pub const DEFAULT_CACHE_SIZE: u64 = 50 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ResourceOptionsError {
    #[error("no application support directory available for the default cache path")]
    NoApplicationSupportDirectory,

    #[error("no asset directory available (executable location unknown)")]
    NoAssetDirectory,

    /// Without a cache location nothing can be stored offline; callers must
    /// handle this at startup.
    #[error("failed to create cache directory {path}: {source}")]
    CacheDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

// ============================================================================
// ResourceOptions
// ============================================================================

/// Options for accessing map resources, shared by map views and snapshotters.
///
/// Built once through [`ResourceOptions::builder`]; to change a field, build
/// a new value (see [`ResourceOptions::to_builder`]).
#[derive(Clone, Debug)]
pub struct ResourceOptions {
    access_token: AccessToken,
    base_url: Option<Url>,
    cache_path: PathBuf,
    asset_path: PathBuf,
    cache_size: u64,
    tile_store: Option<TileStore>,
    tile_store_usage_mode: TileStoreUsageMode,
}

impl ResourceOptions {
    pub fn builder(access_token: impl Into<AccessToken>) -> ResourceOptionsBuilder {
        ResourceOptionsBuilder {
            access_token: access_token.into(),
            base_url: None,
            cache_path: None,
            asset_path: None,
            cache_size: None,
            tile_store: None,
            tile_store_usage_mode: TileStoreUsageMode::default(),
        }
    }

    /// A builder preset with every field of `self`.
    pub fn to_builder(&self) -> ResourceOptionsBuilder {
        ResourceOptionsBuilder {
            access_token: self.access_token.clone(),
            base_url: self.base_url.clone(),
            cache_path: Some(self.cache_path.clone()),
            asset_path: Some(self.asset_path.clone()),
            cache_size: Some(self.cache_size),
            tile_store: self.tile_store.clone(),
            tile_store_usage_mode: self.tile_store_usage_mode,
        }
    }

    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    pub fn asset_path(&self) -> &Path {
        &self.asset_path
    }

    pub fn cache_size(&self) -> u64 {
        self.cache_size
    }

    pub fn tile_store(&self) -> Option<&TileStore> {
        self.tile_store.as_ref()
    }

    pub fn tile_store_usage_mode(&self) -> TileStoreUsageMode {
        self.tile_store_usage_mode
    }

    /// The configured tile store only applies when usage is enabled. Without
    /// one, the provisioning service opens a store at its default location
    /// and must be given the same access token.
    pub fn tile_store_selection(&self) -> TileStoreSelection {
        if !self.tile_store_usage_mode.uses_tile_store() {
            return TileStoreSelection::Ignored;
        }

        match &self.tile_store {
            Some(store) => TileStoreSelection::Configured(store.clone()),
            None => TileStoreSelection::PlatformDefault,
        }
    }

    /// Rebuild from the flat representation, filling unset locations from
    /// `defaults`.
    pub fn from_core_in(
        core: CoreResourceOptions,
        defaults: &DefaultLocations,
    ) -> Result<Self, ResourceOptionsError> {
        let base_url = core
            .base_url
            .map(|url| {
                Url::parse(&url).map_err(|source| ResourceOptionsError::InvalidBaseUrl { url, source })
            })
            .transpose()?;

        let mut builder = Self::builder(core.access_token)
            .tile_store_usage_mode(core.tile_store_usage_mode);
        builder.base_url = base_url;
        builder.cache_path = core.cache_path.map(PathBuf::from);
        builder.asset_path = core.asset_path.map(PathBuf::from);
        builder.cache_size = core.cache_size;
        builder.tile_store = core.tile_store;

        builder.build_in(defaults)
    }
}

/// Unset optional fields (`base_url`, `tile_store`) match anything; every
/// other field must be equal.
impl PartialEq for ResourceOptions {
    fn eq(&self, other: &Self) -> bool {
        fn wildcard<T: PartialEq>(a: &Option<T>, b: &Option<T>) -> bool {
            match (a, b) {
                (Some(a), Some(b)) => a == b,
                _ => true,
            }
        }

        self.access_token == other.access_token
            && wildcard(&self.base_url, &other.base_url)
            && self.cache_path == other.cache_path
            && self.asset_path == other.asset_path
            && self.cache_size == other.cache_size
            && wildcard(&self.tile_store, &other.tile_store)
            && self.tile_store_usage_mode == other.tile_store_usage_mode
    }
}

// ============================================================================
// Builder
// ============================================================================

#[derive(Clone, Debug)]
pub struct ResourceOptionsBuilder {
    access_token: AccessToken,
    base_url: Option<Url>,
    cache_path: Option<PathBuf>,
    asset_path: Option<PathBuf>,
    cache_size: Option<u64>,
    tile_store: Option<TileStore>,
    tile_store_usage_mode: TileStoreUsageMode,
}

impl ResourceOptionsBuilder {
    /// Leave unset unless resources are served from a different host.
    pub fn base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Path of the ambient cache database. Defaults to a file under the
    /// application support directory that is excluded from backups.
    pub fn cache_path(mut self, cache_path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(cache_path.into());
        self
    }

    /// Directory holding bundled assets. Defaults to the executable's directory.
    pub fn asset_path(mut self, asset_path: impl Into<PathBuf>) -> Self {
        self.asset_path = Some(asset_path.into());
        self
    }

    /// Cache size in bytes, [`DEFAULT_CACHE_SIZE`] if unset.
    pub fn cache_size(mut self, cache_size: u64) -> Self {
        self.cache_size = Some(cache_size);
        self
    }

    /// Only used when the usage mode is not [`TileStoreUsageMode::Disabled`].
    pub fn tile_store(mut self, tile_store: TileStore) -> Self {
        self.tile_store = Some(tile_store);
        self
    }

    pub fn tile_store_usage_mode(mut self, mode: TileStoreUsageMode) -> Self {
        self.tile_store_usage_mode = mode;
        self
    }

    /// Build, taking unset locations from the platform defaults.
    ///
    /// Creating the default cache directory touches the filesystem; avoid
    /// calling this repeatedly on latency-sensitive paths.
    pub fn build(self) -> Result<ResourceOptions, ResourceOptionsError> {
        self.build_in(&DefaultLocations::platform())
    }

    pub fn build_in(self, defaults: &DefaultLocations) -> Result<ResourceOptions, ResourceOptionsError> {
        let cache_path = match self.cache_path {
            Some(path) => path,
            None => defaults.cache_path()?,
        };
        let asset_path = match self.asset_path {
            Some(path) => path,
            None => defaults.asset_path()?,
        };

        Ok(ResourceOptions {
            access_token: self.access_token,
            base_url: self.base_url,
            cache_path,
            asset_path,
            cache_size: self.cache_size.unwrap_or(DEFAULT_CACHE_SIZE),
            tile_store: self.tile_store,
            tile_store_usage_mode: self.tile_store_usage_mode,
        })
    }
}

// ============================================================================
// Flat representation
// ============================================================================

/// Resource options as handed to the provisioning service: token resolved,
/// locations as plain strings.
#[derive(Clone, PartialEq)]
pub struct CoreResourceOptions {
    pub access_token: String,
    pub base_url: Option<String>,
    pub cache_path: Option<String>,
    pub asset_path: Option<String>,
    pub cache_size: Option<u64>,
    pub tile_store: Option<TileStore>,
    pub tile_store_usage_mode: TileStoreUsageMode,
}

impl fmt::Debug for CoreResourceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreResourceOptions")
            .field("access_token", &redacted(&self.access_token, REDACTION_INDENT))
            .field("base_url", &self.base_url)
            .field("cache_path", &self.cache_path)
            .field("asset_path", &self.asset_path)
            .field("cache_size", &self.cache_size)
            .field("tile_store", &self.tile_store)
            .field("tile_store_usage_mode", &self.tile_store_usage_mode)
            .finish()
    }
}

impl From<&ResourceOptions> for CoreResourceOptions {
    fn from(options: &ResourceOptions) -> Self {
        Self {
            access_token: options.access_token.resolve().to_owned(),
            base_url: options.base_url.as_ref().map(|url| url.as_str().to_owned()),
            cache_path: Some(options.cache_path.to_string_lossy().into_owned()),
            asset_path: Some(options.asset_path.to_string_lossy().into_owned()),
            cache_size: Some(options.cache_size),
            tile_store: options.tile_store.clone(),
            tile_store_usage_mode: options.tile_store_usage_mode,
        }
    }
}

impl TryFrom<CoreResourceOptions> for ResourceOptions {
    type Error = ResourceOptionsError;

    fn try_from(core: CoreResourceOptions) -> Result<Self, Self::Error> {
        Self::from_core_in(core, &DefaultLocations::platform())
    }
}
