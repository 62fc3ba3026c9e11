use std::fmt;

use geo::Point;

use crate::map::projection::{LATITUDE_MAX, LATITUDE_MIN};

/// Deepest zoom whose tile indices still fit in a `u32`.
pub const MAX_TILE_ZOOM: u8 = 32;

/// Slippy-map tile address. `y` grows southwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

impl TileId {
    pub const WORLD: TileId = TileId { zoom: 0, x: 0, y: 0 };

    pub fn new(zoom: u8, x: u32, y: u32) -> Self {
        Self { zoom, x, y }
    }

    /// Like [`TileId::new`], but `None` unless `zoom <= MAX_TILE_ZOOM` and
    /// both indices lie inside the `2^zoom` grid.
    pub fn checked(zoom: u8, x: u32, y: u32) -> Option<Self> {
        if zoom > MAX_TILE_ZOOM {
            return None;
        }
        let max_index = u32::MAX
            .checked_shr(u32::from(MAX_TILE_ZOOM - zoom))
            .unwrap_or(0);
        (x <= max_index && y <= max_index).then_some(Self { zoom, x, y })
    }

    /// Tile at `zoom` covering a longitude/latitude point, `None` past
    /// [`MAX_TILE_ZOOM`].
    pub fn containing(point: Point, zoom: u8) -> Option<Self> {
        use std::f64::consts::PI;

        if zoom > MAX_TILE_ZOOM {
            return None;
        }

        let n = 2f64.powi(i32::from(zoom));
        let max_index = n - 1.0;
        let lon = point.x().clamp(-180.0, 180.0);
        let lat = point.y().clamp(LATITUDE_MIN, LATITUDE_MAX).to_radians();

        let x = ((lon + 180.0) / 360.0 * n).floor().clamp(0.0, max_index);
        let y = ((1.0 - lat.tan().asinh() / PI) / 2.0 * n)
            .floor()
            .clamp(0.0, max_index);

        Some(Self {
            zoom,
            x: x as u32,
            y: y as u32,
        })
    }

    /// The four tiles one zoom level down, `None` at [`MAX_TILE_ZOOM`].
    pub fn children(&self) -> Option<[TileId; 4]> {
        if self.zoom >= MAX_TILE_ZOOM {
            return None;
        }
        let x = self.x.checked_mul(2)?;
        let y = self.y.checked_mul(2)?;
        let zoom = self.zoom + 1;

        Some([
            // Bottom-left
            TileId { zoom, x, y: y + 1 },
            // Bottom-right
            TileId { zoom, x: x + 1, y: y + 1 },
            // Top-right
            TileId { zoom, x: x + 1, y },
            // Top-left
            TileId { zoom, x, y },
        ])
    }

    /// The ancestor at `zoom`, or `None` when `zoom` is deeper than this tile
    /// or this tile is past [`MAX_TILE_ZOOM`].
    pub fn parent_at(&self, zoom: u8) -> Option<TileId> {
        if self.zoom > MAX_TILE_ZOOM {
            return None;
        }
        let shift = u32::from(self.zoom.checked_sub(zoom)?);

        // A shift of 32 only happens from the deepest zoom to the world tile.
        Some(TileId {
            zoom,
            x: self.x.checked_shr(shift).unwrap_or(0),
            y: self.y.checked_shr(shift).unwrap_or(0),
        })
    }

    pub fn contains(&self, other: &TileId) -> bool {
        other.parent_at(self.zoom) == Some(*self)
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}
