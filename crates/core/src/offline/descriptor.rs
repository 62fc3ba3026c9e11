use std::fmt;

use strum::{Display, EnumIter, EnumString};

use super::LoadOptionsError;

/// Deepest zoom level an offline tileset can target.
pub const MAX_ZOOM: u8 = 22;

/// What a [`TilesetDescriptor`] loads tiles for.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TilesetSource {
    /// Every source referenced by a style.
    Style(String),
    /// A single tileset, by URL.
    Tileset(String),
}

impl fmt::Display for TilesetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Style(uri) => write!(f, "style {uri}"),
            Self::Tileset(url) => write!(f, "tileset {url}"),
        }
    }
}

/// Which tileset and zoom range a tile region covers.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TilesetDescriptor {
    source: TilesetSource,
    min_zoom: u8,
    max_zoom: u8,
}

impl TilesetDescriptor {
    pub fn new(source: TilesetSource, min_zoom: u8, max_zoom: u8) -> Result<Self, LoadOptionsError> {
        if min_zoom > max_zoom || max_zoom > MAX_ZOOM {
            return Err(LoadOptionsError::InvalidZoomRange {
                min: min_zoom,
                max: max_zoom,
            });
        }

        Ok(Self {
            source,
            min_zoom,
            max_zoom,
        })
    }

    pub fn style(uri: impl Into<String>, min_zoom: u8, max_zoom: u8) -> Result<Self, LoadOptionsError> {
        Self::new(TilesetSource::Style(uri.into()), min_zoom, max_zoom)
    }

    pub fn tileset(url: impl Into<String>, min_zoom: u8, max_zoom: u8) -> Result<Self, LoadOptionsError> {
        Self::new(TilesetSource::Tileset(url.into()), min_zoom, max_zoom)
    }

    pub fn source(&self) -> &TilesetSource {
        &self.source
    }

    pub fn min_zoom(&self) -> u8 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> u8 {
        self.max_zoom
    }
}

impl fmt::Display for TilesetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} z{}-{}", self.source, self.min_zoom, self.max_zoom)
    }
}

/// Network types a load request may use. If none of the allowed types is
/// available, the load fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum NetworkRestriction {
    #[default]
    None,
    /// No metered connections (cellular).
    DisallowExpensive,
    DisallowAll,
}

/// Which glyphs a style pack downloads, versus rasterizes on the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum GlyphsRasterizationMode {
    /// Download every glyph.
    NoGlyphsRasterizedLocally,
    /// Download everything except ideographs, which are drawn locally.
    IdeographsRasterizedLocally,
    /// Download no glyphs.
    AllGlyphsRasterizedLocally,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_range_validation() {
        assert!(TilesetDescriptor::style("mapbox://styles/mapbox/streets-v11", 0, 16).is_ok());
        assert!(TilesetDescriptor::tileset("https://example.com/tiles.json", 5, 5).is_ok());

        assert_eq!(
            TilesetDescriptor::style("s", 10, 4),
            Err(LoadOptionsError::InvalidZoomRange { min: 10, max: 4 })
        );
        assert!(TilesetDescriptor::style("s", 0, MAX_ZOOM + 1).is_err());
    }

    #[test]
    fn test_display() {
        let descriptor = TilesetDescriptor::style("mapbox://styles/mapbox/outdoors-v11", 2, 14).unwrap();
        assert_eq!(descriptor.to_string(), "style mapbox://styles/mapbox/outdoors-v11 z2-14");
        assert_eq!(NetworkRestriction::DisallowExpensive.to_string(), "disallow-expensive");
        assert_eq!(
            "ideographs-rasterized-locally".parse::<GlyphsRasterizationMode>().unwrap(),
            GlyphsRasterizationMode::IdeographsRasterizedLocally
        );
    }
}
