//! Offline load options for tile regions and style packs.
//!
//! The builders here only validate and normalise. Loading, progress and
//! cancellation belong to an [`OfflineProvisioner`] implementation.

pub mod descriptor;
pub mod identifiers;
pub mod provisioner;
pub mod style_pack;
pub mod tile_region;

use serde::Serialize;
use serde_json::{Map, Value};

pub use descriptor::{GlyphsRasterizationMode, NetworkRestriction, TilesetDescriptor, TilesetSource};
pub use identifiers::{StylePackId, TileRegionId};
pub use provisioner::{LoadProgress, OfflineProvisioner, ProgressCallback, ProvisionError, StylePack, TileRegion};
pub use style_pack::{StylePackLoadOptions, StylePackLoadOptionsBuilder};
pub use tile_region::{RateWindow, TileRegionLoadOptions, TileRegionLoadOptionsBuilder};

/// Custom JSON metadata stored alongside a region or style pack.
pub type Metadata = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadOptionsError {
    #[error("metadata is not a valid JSON object: {0}")]
    InvalidMetadata(String),

    #[error("invalid zoom range {min}..={max}")]
    InvalidZoomRange { min: u8, max: u8 },
}

/// Serialise `metadata` and require a JSON object at the top level.
pub fn validate_metadata<T: Serialize + ?Sized>(metadata: &T) -> Result<Metadata, LoadOptionsError> {
    match serde_json::to_value(metadata) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(LoadOptionsError::InvalidMetadata(format!(
            "expected an object, found {}",
            json_kind(&other)
        ))),
        Err(error) => Err(LoadOptionsError::InvalidMetadata(error.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
