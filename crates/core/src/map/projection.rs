//! Spherical (Web) Mercator projection helpers.
//!
//! Coordinates are `geo::Point`s with `x` = longitude and `y` = latitude, in
//! degrees. Latitudes are clamped to [`LATITUDE_MIN`, `LATITUDE_MAX`] before
//! projecting, so the poles map onto the edge of the square world.

use std::f64::consts::PI;

use geo::Point;

pub const LATITUDE_MAX: f64 = 85.051128779806604;
pub const LATITUDE_MIN: f64 = -LATITUDE_MAX;
pub const LONGITUDE_MAX: f64 = 180.0;

/// WGS84 equatorial radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Width of a tile in points; the world is `TILE_SIZE * zoom_scale` wide.
pub const TILE_SIZE: f64 = 512.0;

const DEGREES_MAX: f64 = 360.0;

/// Spherical Mercator projected coordinates, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProjectedMeters {
    pub northing: f64,
    pub easting: f64,
}

/// A point on the Mercator plane at a given zoom scale, in points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MercatorCoordinate {
    pub x: f64,
    pub y: f64,
}

pub struct Projection;

impl Projection {
    pub fn clamp_latitude(latitude: f64) -> f64 {
        latitude.clamp(LATITUDE_MIN, LATITUDE_MAX)
    }

    fn clamp_longitude(longitude: f64) -> f64 {
        longitude.clamp(-LONGITUDE_MAX, LONGITUDE_MAX)
    }

    fn world_size(zoom_scale: f64) -> f64 {
        TILE_SIZE * zoom_scale
    }

    /// Distance in meters spanned by one point at `latitude` and `zoom`.
    pub fn meters_per_point(latitude: f64, zoom: f64) -> f64 {
        let latitude = Self::clamp_latitude(latitude);
        latitude.to_radians().cos() * 2.0 * PI * EARTH_RADIUS_M
            / Self::world_size(2f64.powf(zoom))
    }

    pub fn projected_meters(coordinate: Point) -> ProjectedMeters {
        let latitude = Self::clamp_latitude(coordinate.y());
        let longitude = Self::clamp_longitude(coordinate.x());

        // Keep log() finite at the clamped poles.
        let m = 1.0 - 1e-15;
        let f = latitude.to_radians().sin().clamp(-m, m);

        ProjectedMeters {
            northing: 0.5 * EARTH_RADIUS_M * ((1.0 + f) / (1.0 - f)).ln(),
            easting: EARTH_RADIUS_M * longitude.to_radians(),
        }
    }

    pub fn coordinate(projected: ProjectedMeters) -> Point {
        let latitude =
            (2.0 * (projected.northing / EARTH_RADIUS_M).exp().atan() - PI / 2.0).to_degrees();
        let longitude = (projected.easting / EARTH_RADIUS_M).to_degrees();

        Point::new(
            Self::clamp_longitude(longitude),
            Self::clamp_latitude(latitude),
        )
    }

    /// Point on the map for `coordinate`, where the world is
    /// `TILE_SIZE * zoom_scale` points wide (`zoom_scale` = 2^zoom).
    pub fn project(coordinate: Point, zoom_scale: f64) -> MercatorCoordinate {
        let latitude = Self::clamp_latitude(coordinate.y());
        let scale = Self::world_size(zoom_scale) / DEGREES_MAX;

        MercatorCoordinate {
            x: (LONGITUDE_MAX + coordinate.x()) * scale,
            y: (LONGITUDE_MAX - (PI / 4.0 + latitude * PI / DEGREES_MAX).tan().ln().to_degrees())
                * scale,
        }
    }

    pub fn unproject(point: MercatorCoordinate, zoom_scale: f64) -> Point {
        let scale = DEGREES_MAX / Self::world_size(zoom_scale);
        let x = point.x * scale;
        let y = point.y * scale;

        let latitude = DEGREES_MAX / PI * ((LONGITUDE_MAX - y).to_radians().exp()).atan() - 90.0;
        let longitude = x - LONGITUDE_MAX;

        Point::new(longitude, latitude)
    }
}
