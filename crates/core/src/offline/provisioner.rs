//! Boundary to the service that actually downloads and stores offline data.
//!
//! Implementations run loads off the caller's thread, report progress through
//! the supplied callback and serialise their own writes to the tile store and
//! ambient cache. Retries and backoff are theirs too.

use std::future::Future;
use std::pin::Pin;

use super::{NetworkRestriction, StylePackId, StylePackLoadOptions, TileRegionId, TileRegionLoadOptions};
use crate::resource::CoreResourceOptions;

#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("load of {0} was canceled")]
    Canceled(String),

    #[error("no network available under restriction {0}")]
    NetworkRestricted(NetworkRestriction),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("provisioning failed: {0}")]
    Service(String),
}

pub type Result<T> = std::result::Result<T, ProvisionError>;

/// Progress of a region or style pack load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadProgress {
    pub completed_resources: u64,
    pub required_resources: u64,
    pub completed_bytes: u64,
}

impl LoadProgress {
    /// Completed fraction in `0.0..=1.0`; a load with nothing to fetch is done.
    pub fn fraction(&self) -> f64 {
        if self.required_resources == 0 {
            return 1.0;
        }
        (self.completed_resources as f64 / self.required_resources as f64).min(1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.completed_resources >= self.required_resources
    }
}

pub type ProgressCallback = Box<dyn Fn(LoadProgress) + Send + Sync>;

/// A tile region once loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileRegion {
    pub id: TileRegionId,
    pub progress: LoadProgress,
}

/// A style pack once loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StylePack {
    pub id: StylePackId,
    pub progress: LoadProgress,
}

pub trait OfflineProvisioner: Send + Sync {
    /// Resource options for subsequent loads. The service keeps any attached
    /// tile store's access token in sync with these.
    fn apply_resource_options(&self, options: &CoreResourceOptions);

    fn load_tile_region<'a>(
        &'a self,
        id: &'a TileRegionId,
        options: &'a TileRegionLoadOptions,
        progress: ProgressCallback,
    ) -> Pin<Box<dyn Future<Output = Result<TileRegion>> + Send + 'a>>;

    fn load_style_pack<'a>(
        &'a self,
        id: &'a StylePackId,
        options: &'a StylePackLoadOptions,
        progress: ProgressCallback,
    ) -> Pin<Box<dyn Future<Output = Result<StylePack>> + Send + 'a>>;

    /// Cancel an in-flight region load. Returns `false` if nothing was running.
    fn cancel_tile_region(&self, id: &TileRegionId) -> bool;
}
