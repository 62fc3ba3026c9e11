//! Web Mercator helpers for the platform UI layers.

use geo::Point;
use offline_maps_core::map::{MercatorCoordinate, ProjectedMeters, Projection, TileId};

#[derive(Debug, Clone, Copy, PartialEq, uniffi::Record)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<LatLng> for Point {
    fn from(value: LatLng) -> Self {
        Point::new(value.longitude, value.latitude)
    }
}

impl From<Point> for LatLng {
    fn from(value: Point) -> Self {
        Self {
            latitude: value.y(),
            longitude: value.x(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, uniffi::Record)]
pub struct MetersRecord {
    pub northing: f64,
    pub easting: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, uniffi::Record)]
pub struct MapPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Record)]
pub struct TileRecord {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

impl From<TileId> for TileRecord {
    fn from(tile: TileId) -> Self {
        Self {
            zoom: tile.zoom,
            x: tile.x,
            y: tile.y,
        }
    }
}

#[uniffi::export]
pub fn clamp_latitude(latitude: f64) -> f64 {
    Projection::clamp_latitude(latitude)
}

#[uniffi::export]
pub fn meters_per_point(latitude: f64, zoom: f64) -> f64 {
    Projection::meters_per_point(latitude, zoom)
}

#[uniffi::export]
pub fn projected_meters(coordinate: LatLng) -> MetersRecord {
    let meters = Projection::projected_meters(coordinate.into());
    MetersRecord {
        northing: meters.northing,
        easting: meters.easting,
    }
}

#[uniffi::export]
pub fn coordinate_for_meters(meters: MetersRecord) -> LatLng {
    Projection::coordinate(ProjectedMeters {
        northing: meters.northing,
        easting: meters.easting,
    })
    .into()
}

#[uniffi::export]
pub fn project(coordinate: LatLng, zoom_scale: f64) -> MapPoint {
    let point = Projection::project(coordinate.into(), zoom_scale);
    MapPoint {
        x: point.x,
        y: point.y,
    }
}

#[uniffi::export]
pub fn unproject(point: MapPoint, zoom_scale: f64) -> LatLng {
    Projection::unproject(
        MercatorCoordinate {
            x: point.x,
            y: point.y,
        },
        zoom_scale,
    )
    .into()
}

/// `None` for zooms too deep to address with 32-bit tile indices.
#[uniffi::export]
pub fn tile_containing(coordinate: LatLng, zoom: u8) -> Option<TileRecord> {
    TileId::containing(coordinate.into(), zoom).map(Into::into)
}
