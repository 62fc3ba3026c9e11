use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use geo::Geometry;
use geojson::GeoJson;
use offline_maps_core::map::{MAX_TILE_ZOOM, TileId};
use offline_maps_core::offline::{TilesetDescriptor, TilesetSource};
use offline_maps_core::resource::TilePackLookup;

/// Read a region geometry from a GeoJSON file.
/// Accepts a Geometry, a Feature, or a FeatureCollection (as a collection).
pub fn read_geometry(path: &Path) -> Result<Geometry> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read geometry file: {}", path.display()))?;

    let geojson: GeoJson = content
        .parse()
        .with_context(|| format!("Failed to parse GeoJSON from: {}", path.display()))?;

    Geometry::try_from(geojson)
        .with_context(|| format!("No usable geometry in: {}", path.display()))
}

/// A tileset descriptor given as `style:<uri>@<min>-<max>` or
/// `tileset:<url>@<min>-<max>`.
#[derive(Debug, Clone)]
pub struct DescriptorArg(pub TilesetDescriptor);

impl FromStr for DescriptorArg {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((kind, rest)) = s.split_once(':') else {
            bail!("expected <kind>:<uri>@<min>-<max>, got {s:?}");
        };
        let Some((uri, zooms)) = rest.rsplit_once('@') else {
            bail!("missing @<min>-<max> zoom range in {s:?}");
        };
        let Some((min, max)) = zooms.split_once('-') else {
            bail!("zoom range must be <min>-<max>, got {zooms:?}");
        };

        let source = match kind {
            "style" => TilesetSource::Style(uri.to_owned()),
            "tileset" => TilesetSource::Tileset(uri.to_owned()),
            other => bail!("unknown descriptor kind {other:?} (expected style or tileset)"),
        };
        let min = min.parse().with_context(|| format!("invalid min zoom {min:?}"))?;
        let max = max.parse().with_context(|| format!("invalid max zoom {max:?}"))?;

        Ok(Self(TilesetDescriptor::new(source, min, max)?))
    }
}

/// A tile given as `z/x/y`.
#[derive(Debug, Clone, Copy)]
pub struct TileArg(pub TileId);

impl FromStr for TileArg {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('/').collect();
        let [zoom, x, y] = parts.as_slice() else {
            bail!("expected z/x/y, got {s:?}");
        };

        let zoom: u8 = zoom.parse().context("invalid zoom")?;
        let x: u32 = x.parse().context("invalid x")?;
        let y: u32 = y.parse().context("invalid y")?;

        match TileId::checked(zoom, x, y) {
            Some(tile) => Ok(Self(tile)),
            None => bail!("{s:?} is not a tile (zoom at most {MAX_TILE_ZOOM}, x and y below 2^zoom)"),
        }
    }
}

/// Pack index given on the command line: packs live at a fixed zoom.
pub struct PackIndex {
    pub pack_zoom: u8,
    pub packs: HashSet<TileId>,
}

impl TilePackLookup for PackIndex {
    fn enclosing_pack(&self, tile: TileId) -> TileId {
        tile.parent_at(self.pack_zoom).unwrap_or(tile)
    }

    fn contains_pack(&self, pack: TileId) -> bool {
        self.packs.contains(&pack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_arg() {
        let DescriptorArg(descriptor) = "style:mapbox://styles/mapbox/streets-v11@0-16".parse().unwrap();
        assert_eq!(
            descriptor.source(),
            &TilesetSource::Style("mapbox://styles/mapbox/streets-v11".into())
        );
        assert_eq!((descriptor.min_zoom(), descriptor.max_zoom()), (0, 16));

        assert!("mapbox://styles/x@0-16".parse::<DescriptorArg>().is_err());
        assert!("style:mapbox://styles/x".parse::<DescriptorArg>().is_err());
        assert!("style:mapbox://styles/x@9-2".parse::<DescriptorArg>().is_err());
    }

    #[test]
    fn test_tile_arg() {
        let TileArg(tile) = "14/4824/6157".parse().unwrap();
        assert_eq!(tile, TileId::new(14, 4824, 6157));
        assert!("14/4824".parse::<TileArg>().is_err());
        assert!("42/0/0".parse::<TileArg>().is_err());
        assert!("2/4/0".parse::<TileArg>().is_err());
        assert!("32/4294967295/0".parse::<TileArg>().is_ok());
    }

    #[test]
    fn test_pack_index() {
        let index = PackIndex {
            pack_zoom: 10,
            packs: HashSet::from([TileId::new(10, 301, 385)]),
        };

        let tile = TileId::new(14, 4823, 6160);
        assert!(index.contains_pack(index.enclosing_pack(tile)));
        assert_eq!(index.enclosing_pack(TileId::new(4, 1, 1)), TileId::new(4, 1, 1));
    }
}
