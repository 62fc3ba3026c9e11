//! Tile store handle and the policy deciding how tile requests use it.
//!
//! The store itself (pack layout, storage, downloads) belongs to the
//! provisioning service. This module only decides, per tile request, whether
//! the store is consulted and what gets fetched.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use strum::{Display, EnumIter, EnumString};

use crate::map::TileId;

// ============================================================================
// Usage mode
// ============================================================================

/// How tile requests interact with the tile store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum TileStoreUsageMode {
    /// The tile store is never consulted.
    Disabled,
    /// Tiles are extracted from loaded tile packs when available; otherwise
    /// the individual tile is fetched and kept in the ambient cache.
    #[default]
    ReadOnly,
    /// Every tile request becomes a request for the enclosing tile pack. No
    /// individual tiles are fetched, so a tile already in the ambient cache
    /// can be downloaded again as part of a newer pack. Meant for predefined
    /// routes (navigation), not free panning.
    ReadAndUpdate,
}

/// What to do for a single tile request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileFetchRoute {
    /// Fetch the individual tile over the network and store it in the
    /// ambient cache. The tile store is left untouched.
    Network,
    /// The enclosing pack is loaded; extract the tile from it.
    ExtractFromTileStore { pack: TileId },
    /// Load (or refresh) the enclosing pack, then extract the tile.
    LoadTilePack { pack: TileId },
}

/// Read access to the tile store's pack index.
pub trait TilePackLookup {
    /// The pack a tile belongs to.
    fn enclosing_pack(&self, tile: TileId) -> TileId;

    fn contains_pack(&self, pack: TileId) -> bool;
}

impl TileStoreUsageMode {
    pub fn uses_tile_store(self) -> bool {
        self != Self::Disabled
    }

    /// Whether individual tiles may be requested from the network.
    pub fn issues_tile_requests(self) -> bool {
        self != Self::ReadAndUpdate
    }

    pub fn route(self, tile: TileId, store: &impl TilePackLookup) -> TileFetchRoute {
        match self {
            Self::Disabled => TileFetchRoute::Network,
            Self::ReadOnly => {
                let pack = store.enclosing_pack(tile);
                if store.contains_pack(pack) {
                    TileFetchRoute::ExtractFromTileStore { pack }
                } else {
                    TileFetchRoute::Network
                }
            }
            Self::ReadAndUpdate => TileFetchRoute::LoadTilePack {
                pack: store.enclosing_pack(tile),
            },
        }
    }
}

// ============================================================================
// Tile store handle
// ============================================================================

/// Handle to a tile store at a filesystem location.
///
/// Clones refer to the same store. Two handles are equal only if they are
/// the same store instance, even when opened at the same path.
#[derive(Clone)]
pub struct TileStore {
    inner: Arc<TileStoreInner>,
}

struct TileStoreInner {
    path: PathBuf,
}

impl TileStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(TileStoreInner { path: path.into() }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }
}

impl PartialEq for TileStore {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for TileStore {}

impl fmt::Debug for TileStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TileStore").field(&self.inner.path).finish()
    }
}

/// Which tile store a set of resource options ends up using.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TileStoreSelection {
    /// Usage is disabled; a configured store is ignored.
    Ignored,
    Configured(TileStore),
    /// Usage is enabled but no store was given: the service opens one at its
    /// default location.
    PlatformDefault,
}
