//! # offline-maps-core
//!
//! Configuration and request-building layer for offline map data.
//!
//! - **Access tokens**: explicit or resolved from an application bundle,
//!   never printed in clear text
//! - **Resource options**: base URL, cache and asset locations, cache size and
//!   tile store usage, with platform defaults
//! - **Offline requests**: validated tile region and style pack load options
//! - **Projection**: Web Mercator helpers with latitude clamping
//!
//! Downloading and storing tiles is left to an
//! [`OfflineProvisioner`](offline::OfflineProvisioner) implementation.
//!
//! ## Example
//!
//! ```
//! use offline_maps_core::prelude::*;
//! use serde_json::json;
//!
//! let descriptor = TilesetDescriptor::style("mapbox://styles/mapbox/outdoors-v11", 0, 14).unwrap();
//! let options = TileRegionLoadOptions::builder()
//!     .geometry(geo::Point::new(-73.9857, 40.7484))
//!     .descriptors([descriptor])
//!     .metadata(&json!({"name": "midtown"}))
//!     .build()
//!     .unwrap();
//! assert_eq!(options.descriptors().unwrap().len(), 1);
//!
//! // Metadata must be a JSON object.
//! assert!(TileRegionLoadOptions::builder().metadata("midtown").build().is_err());
//! ```

pub mod access_token;
pub mod map;
pub mod offline;
pub mod resource;

pub mod prelude {
    pub use crate::access_token::{AccessToken, AppBundle, redacted};
    pub use crate::map::{MercatorCoordinate, ProjectedMeters, Projection, TileId};
    pub use crate::offline::{
        GlyphsRasterizationMode, LoadOptionsError, NetworkRestriction, OfflineProvisioner,
        StylePackId, StylePackLoadOptions, TileRegionId, TileRegionLoadOptions, TilesetDescriptor,
    };
    pub use crate::resource::{
        CoreResourceOptions, DefaultLocations, ResourceOptions, ResourceOptionsError, TileStore,
        TileStoreSelection, TileStoreUsageMode,
    };
}

pub use prelude::*;
