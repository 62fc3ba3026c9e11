use std::sync::Arc;

use geo::Geometry;
use geojson::GeoJson;
use offline_maps_core::offline::{
    GlyphsRasterizationMode, LoadOptionsError, NetworkRestriction, StylePackLoadOptions,
    TileRegionLoadOptions, TilesetDescriptor, TilesetSource,
};
use serde_json::Value;

use crate::error::OfflineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum NetworkPolicy {
    Any,
    DisallowExpensive,
    DisallowAll,
}

impl From<NetworkPolicy> for NetworkRestriction {
    fn from(value: NetworkPolicy) -> Self {
        match value {
            NetworkPolicy::Any => Self::None,
            NetworkPolicy::DisallowExpensive => Self::DisallowExpensive,
            NetworkPolicy::DisallowAll => Self::DisallowAll,
        }
    }
}

impl From<NetworkRestriction> for NetworkPolicy {
    fn from(value: NetworkRestriction) -> Self {
        match value {
            NetworkRestriction::None => Self::Any,
            NetworkRestriction::DisallowExpensive => Self::DisallowExpensive,
            NetworkRestriction::DisallowAll => Self::DisallowAll,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum GlyphsMode {
    NoGlyphsRasterizedLocally,
    IdeographsRasterizedLocally,
    AllGlyphsRasterizedLocally,
}

impl From<GlyphsMode> for GlyphsRasterizationMode {
    fn from(value: GlyphsMode) -> Self {
        match value {
            GlyphsMode::NoGlyphsRasterizedLocally => Self::NoGlyphsRasterizedLocally,
            GlyphsMode::IdeographsRasterizedLocally => Self::IdeographsRasterizedLocally,
            GlyphsMode::AllGlyphsRasterizedLocally => Self::AllGlyphsRasterizedLocally,
        }
    }
}

impl From<GlyphsRasterizationMode> for GlyphsMode {
    fn from(value: GlyphsRasterizationMode) -> Self {
        match value {
            GlyphsRasterizationMode::NoGlyphsRasterizedLocally => Self::NoGlyphsRasterizedLocally,
            GlyphsRasterizationMode::IdeographsRasterizedLocally => Self::IdeographsRasterizedLocally,
            GlyphsRasterizationMode::AllGlyphsRasterizedLocally => Self::AllGlyphsRasterizedLocally,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum TilesetKind {
    Style,
    Tileset,
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct TilesetDescriptorRecord {
    pub kind: TilesetKind,
    pub uri: String,
    pub min_zoom: u8,
    pub max_zoom: u8,
}

impl TryFrom<TilesetDescriptorRecord> for TilesetDescriptor {
    type Error = LoadOptionsError;

    fn try_from(record: TilesetDescriptorRecord) -> Result<Self, Self::Error> {
        let source = match record.kind {
            TilesetKind::Style => TilesetSource::Style(record.uri),
            TilesetKind::Tileset => TilesetSource::Tileset(record.uri),
        };
        TilesetDescriptor::new(source, record.min_zoom, record.max_zoom)
    }
}

impl From<&TilesetDescriptor> for TilesetDescriptorRecord {
    fn from(descriptor: &TilesetDescriptor) -> Self {
        let (kind, uri) = match descriptor.source() {
            TilesetSource::Style(uri) => (TilesetKind::Style, uri.clone()),
            TilesetSource::Tileset(url) => (TilesetKind::Tileset, url.clone()),
        };
        Self {
            kind,
            uri,
            min_zoom: descriptor.min_zoom(),
            max_zoom: descriptor.max_zoom(),
        }
    }
}

fn parse_geometry(geojson: &str) -> Result<Geometry, OfflineError> {
    let parsed: GeoJson = geojson
        .parse()
        .map_err(|e: geojson::Error| OfflineError::InvalidGeometry(e.to_string()))?;

    Geometry::try_from(parsed).map_err(|e| OfflineError::InvalidGeometry(e.to_string()))
}

fn parse_metadata(json: &str) -> Result<Value, OfflineError> {
    serde_json::from_str(json)
        .map_err(|e| LoadOptionsError::InvalidMetadata(e.to_string()).into())
}

/// A validated tile region request, ready to hand to the provisioning service.
#[derive(Debug, uniffi::Object)]
pub struct TileRegionRequest {
    options: TileRegionLoadOptions,
}

impl TileRegionRequest {
    pub fn options(&self) -> &TileRegionLoadOptions {
        &self.options
    }
}

/// Build tile region load options. `geometry` is GeoJSON; `metadata` must be
/// a JSON object.
#[uniffi::export]
pub fn tile_region_load_options(
    geometry: Option<String>,
    descriptors: Vec<TilesetDescriptorRecord>,
    metadata: Option<String>,
    accept_expired: bool,
    network_policy: NetworkPolicy,
    average_bytes_per_second: Option<u32>,
) -> Result<Arc<TileRegionRequest>, OfflineError> {
    let descriptors = descriptors
        .into_iter()
        .map(TilesetDescriptor::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let mut builder = TileRegionLoadOptions::builder()
        .descriptors(descriptors)
        .accept_expired(accept_expired)
        .network_restriction(network_policy.into());

    if let Some(geometry) = geometry {
        builder = builder.geometry(parse_geometry(&geometry)?);
    }
    if let Some(metadata) = metadata {
        builder = builder.metadata(&parse_metadata(&metadata)?);
    }
    if let Some(rate) = average_bytes_per_second {
        builder = builder.average_bytes_per_second(rate);
    }

    let options = builder.build()?;
    tracing::debug!(
        descriptors = options.descriptors().map_or(0, <[_]>::len),
        "Built tile region load options"
    );

    Ok(Arc::new(TileRegionRequest { options }))
}

#[uniffi::export]
impl TileRegionRequest {
    pub fn has_geometry(&self) -> bool {
        self.options.geometry().is_some()
    }

    /// Empty when the tilesets are inferred from the geometry.
    pub fn descriptors(&self) -> Vec<TilesetDescriptorRecord> {
        self.options
            .descriptors()
            .unwrap_or_default()
            .iter()
            .map(TilesetDescriptorRecord::from)
            .collect()
    }

    pub fn metadata_json(&self) -> Option<String> {
        self.options
            .metadata()
            .map(|metadata| Value::Object(metadata.clone()).to_string())
    }

    pub fn accept_expired(&self) -> bool {
        self.options.accept_expired()
    }

    pub fn network_policy(&self) -> NetworkPolicy {
        self.options.network_restriction().into()
    }

    pub fn average_bytes_per_second(&self) -> Option<u32> {
        self.options.average_bytes_per_second()
    }
}

#[derive(Debug, uniffi::Object)]
pub struct StylePackRequest {
    options: StylePackLoadOptions,
}

#[uniffi::export]
pub fn style_pack_load_options(
    glyphs_mode: Option<GlyphsMode>,
    metadata: Option<String>,
    accept_expired: bool,
) -> Result<Arc<StylePackRequest>, OfflineError> {
    let mut builder = StylePackLoadOptions::builder().accept_expired(accept_expired);

    if let Some(mode) = glyphs_mode {
        builder = builder.glyphs_rasterization_mode(mode.into());
    }
    if let Some(metadata) = metadata {
        builder = builder.metadata(&parse_metadata(&metadata)?);
    }

    Ok(Arc::new(StylePackRequest {
        options: builder.build()?,
    }))
}

#[uniffi::export]
impl StylePackRequest {
    pub fn glyphs_mode(&self) -> Option<GlyphsMode> {
        self.options.glyphs_rasterization_mode().map(Into::into)
    }

    pub fn metadata_json(&self) -> Option<String> {
        self.options
            .metadata()
            .map(|metadata| Value::Object(metadata.clone()).to_string())
    }

    pub fn accept_expired(&self) -> bool {
        self.options.accept_expired()
    }
}
