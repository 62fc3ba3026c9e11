use std::path::PathBuf;
use std::sync::Arc;

use offline_maps_core::access_token::{AccessToken, AppBundle, REDACTION_INDENT, redacted};
use offline_maps_core::resource::{
    CoreResourceOptions, ResourceOptions, ResourceOptionsError, TileStore, TileStoreSelection,
    TileStoreUsageMode,
};
use url::Url;

use crate::error::OfflineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum TileStoreUsage {
    Disabled,
    ReadOnly,
    ReadAndUpdate,
}

impl From<TileStoreUsage> for TileStoreUsageMode {
    fn from(value: TileStoreUsage) -> Self {
        match value {
            TileStoreUsage::Disabled => Self::Disabled,
            TileStoreUsage::ReadOnly => Self::ReadOnly,
            TileStoreUsage::ReadAndUpdate => Self::ReadAndUpdate,
        }
    }
}

impl From<TileStoreUsageMode> for TileStoreUsage {
    fn from(value: TileStoreUsageMode) -> Self {
        match value {
            TileStoreUsageMode::Disabled => Self::Disabled,
            TileStoreUsageMode::ReadOnly => Self::ReadOnly,
            TileStoreUsageMode::ReadAndUpdate => Self::ReadAndUpdate,
        }
    }
}

/// Resource options as passed in from Kotlin/Swift. Unset fields take the
/// platform defaults.
#[derive(Clone, uniffi::Record)]
pub struct ResourceOptionsRecord {
    /// `None` resolves the token from `bundle_dir` (or the app's own bundle).
    #[uniffi(default = None)]
    pub access_token: Option<String>,
    #[uniffi(default = None)]
    pub bundle_dir: Option<String>,
    #[uniffi(default = None)]
    pub base_url: Option<String>,
    #[uniffi(default = None)]
    pub cache_path: Option<String>,
    #[uniffi(default = None)]
    pub asset_path: Option<String>,
    #[uniffi(default = None)]
    pub cache_size: Option<u64>,
    pub tile_store_usage: TileStoreUsage,
}

impl std::fmt::Debug for ResourceOptionsRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceOptionsRecord")
            .field(
                "access_token",
                &self
                    .access_token
                    .as_deref()
                    .map(|token| redacted(token, REDACTION_INDENT)),
            )
            .field("bundle_dir", &self.bundle_dir)
            .field("base_url", &self.base_url)
            .field("cache_path", &self.cache_path)
            .field("asset_path", &self.asset_path)
            .field("cache_size", &self.cache_size)
            .field("tile_store_usage", &self.tile_store_usage)
            .finish()
    }
}

/// The flat form handed to the native map engine. Holds the clear-text token.
#[derive(Clone, uniffi::Record)]
pub struct CoreOptionsRecord {
    pub access_token: String,
    pub base_url: Option<String>,
    pub cache_path: Option<String>,
    pub asset_path: Option<String>,
    pub cache_size: Option<u64>,
    pub tile_store_path: Option<String>,
    pub tile_store_usage: TileStoreUsage,
}

impl std::fmt::Debug for CoreOptionsRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreOptionsRecord")
            .field("access_token", &redacted(&self.access_token, REDACTION_INDENT))
            .field("cache_path", &self.cache_path)
            .finish_non_exhaustive()
    }
}

impl From<CoreResourceOptions> for CoreOptionsRecord {
    fn from(core: CoreResourceOptions) -> Self {
        Self {
            access_token: core.access_token,
            base_url: core.base_url,
            cache_path: core.cache_path,
            asset_path: core.asset_path,
            cache_size: core.cache_size,
            tile_store_path: core
                .tile_store
                .map(|store| store.path().to_string_lossy().into_owned()),
            tile_store_usage: core.tile_store_usage_mode.into(),
        }
    }
}

#[derive(Debug, uniffi::Object)]
pub struct TileStoreHandle {
    store: TileStore,
}

#[uniffi::export]
impl TileStoreHandle {
    #[uniffi::constructor]
    pub fn new(path: String) -> Arc<Self> {
        Arc::new(Self {
            store: TileStore::at(path),
        })
    }

    pub fn path(&self) -> String {
        self.store.path().to_string_lossy().into_owned()
    }
}

#[derive(Debug, uniffi::Object)]
pub struct ResourceOptionsHandle {
    options: ResourceOptions,
}

impl ResourceOptionsHandle {
    pub fn options(&self) -> &ResourceOptions {
        &self.options
    }
}

#[uniffi::export]
impl ResourceOptionsHandle {
    #[uniffi::constructor]
    pub fn new(
        record: ResourceOptionsRecord,
        tile_store: Option<Arc<TileStoreHandle>>,
    ) -> Result<Arc<Self>, OfflineError> {
        let token = match (record.access_token, record.bundle_dir) {
            (Some(token), _) => AccessToken::from(token),
            (None, Some(dir)) => AccessToken::deferred(AppBundle::new(PathBuf::from(dir))),
            (None, None) => AccessToken::default(),
        };

        let mut builder =
            ResourceOptions::builder(token).tile_store_usage_mode(record.tile_store_usage.into());

        if let Some(base_url) = record.base_url {
            let url = Url::parse(&base_url).map_err(|source| {
                ResourceOptionsError::InvalidBaseUrl {
                    url: base_url.clone(),
                    source,
                }
            })?;
            builder = builder.base_url(url);
        }
        if let Some(path) = record.cache_path {
            builder = builder.cache_path(path);
        }
        if let Some(path) = record.asset_path {
            builder = builder.asset_path(path);
        }
        if let Some(size) = record.cache_size {
            builder = builder.cache_size(size);
        }
        if let Some(handle) = tile_store {
            builder = builder.tile_store(handle.store.clone());
        }

        let options = builder.build()?;
        tracing::debug!(
            token = %options.access_token(),
            cache = %options.cache_path().display(),
            "Built resource options"
        );

        Ok(Arc::new(Self { options }))
    }

    /// The token with all but the first characters masked.
    pub fn masked_token(&self) -> String {
        redacted(self.options.access_token().resolve(), REDACTION_INDENT)
    }

    pub fn base_url(&self) -> Option<String> {
        self.options.base_url().map(|url| url.to_string())
    }

    pub fn cache_path(&self) -> String {
        self.options.cache_path().to_string_lossy().into_owned()
    }

    pub fn asset_path(&self) -> String {
        self.options.asset_path().to_string_lossy().into_owned()
    }

    pub fn cache_size(&self) -> u64 {
        self.options.cache_size()
    }

    pub fn tile_store_usage(&self) -> TileStoreUsage {
        self.options.tile_store_usage_mode().into()
    }

    /// True when usage is enabled but no tile store was given.
    pub fn uses_default_tile_store(&self) -> bool {
        self.options.tile_store_selection() == TileStoreSelection::PlatformDefault
    }

    pub fn equals(&self, other: Arc<ResourceOptionsHandle>) -> bool {
        self.options == other.options
    }

    pub fn core_options(&self) -> CoreOptionsRecord {
        CoreResourceOptions::from(&self.options).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(token: &str) -> ResourceOptionsRecord {
        ResourceOptionsRecord {
            access_token: Some(token.into()),
            bundle_dir: None,
            base_url: None,
            cache_path: Some("/data/cache.db".into()),
            asset_path: Some("/app/assets".into()),
            cache_size: None,
            tile_store_usage: TileStoreUsage::ReadOnly,
        }
    }

    #[test]
    fn test_handle_defaults() {
        let handle = ResourceOptionsHandle::new(record("pk.abcdef123456"), None).unwrap();

        assert_eq!(handle.masked_token(), format!("pk.a{}", "×".repeat(11)));
        assert_eq!(handle.cache_size(), 52_428_800);
        assert_eq!(handle.cache_path(), "/data/cache.db");
        assert_eq!(handle.base_url(), None);
        assert_eq!(handle.tile_store_usage(), TileStoreUsage::ReadOnly);
        assert!(handle.uses_default_tile_store());
    }

    #[test]
    fn test_invalid_base_url() {
        let mut bad = record("pk.test");
        bad.base_url = Some("not a url".into());

        assert!(matches!(
            ResourceOptionsHandle::new(bad, None),
            Err(OfflineError::ResourceOptions(ResourceOptionsError::InvalidBaseUrl { .. }))
        ));
    }

    #[test]
    fn test_equality_ignores_unset_optionals() {
        let store = TileStoreHandle::new("/data/tiles".into());
        let mut with_url = record("pk.test");
        with_url.base_url = Some("https://api.example.com".into());

        let full = ResourceOptionsHandle::new(with_url, Some(store)).unwrap();
        let bare = ResourceOptionsHandle::new(record("pk.test"), None).unwrap();
        let other = ResourceOptionsHandle::new(record("pk.other"), None).unwrap();

        assert!(full.equals(bare.clone()));
        assert!(bare.equals(full.clone()));
        assert!(!bare.equals(other));
        assert!(!full.uses_default_tile_store());
    }

    #[test]
    fn test_core_options() {
        let store = TileStoreHandle::new("/data/tiles".into());
        let mut record = record("pk.secret");
        record.cache_size = Some(1024);
        record.tile_store_usage = TileStoreUsage::ReadAndUpdate;

        let core = ResourceOptionsHandle::new(record, Some(store))
            .unwrap()
            .core_options();

        assert_eq!(core.access_token, "pk.secret");
        assert_eq!(core.cache_size, Some(1024));
        assert_eq!(core.tile_store_path.as_deref(), Some("/data/tiles"));
        assert_eq!(core.tile_store_usage, TileStoreUsage::ReadAndUpdate);
        assert!(!format!("{core:?}").contains("secret"));
    }

    #[test]
    fn test_record_debug_masks_token() {
        let record = record("pk.verysecretvalue");
        let dump = format!("{record:?}");

        assert!(!dump.contains("verysecretvalue"));
        assert!(dump.contains("pk.v××××××××××××××"));
        assert!(!format!("{record:#?}").contains("verysecretvalue"));
    }

    #[test]
    fn test_token_from_bundle_dir() {
        let bundle = tempfile::tempdir().unwrap();
        std::fs::write(bundle.path().join("MapboxAccessToken"), "pk.fromfile\n").unwrap();

        let mut record = record("unused");
        record.access_token = None;
        record.bundle_dir = Some(bundle.path().to_string_lossy().into_owned());

        let handle = ResourceOptionsHandle::new(record, None).unwrap();
        if std::env::var_os("MBXAccessToken").is_none() {
            assert_eq!(handle.core_options().access_token, "pk.fromfile");
        }
    }
}
