pub mod projection;
pub mod tile;

pub use projection::{MercatorCoordinate, ProjectedMeters, Projection};
pub use tile::{MAX_TILE_ZOOM, TileId};
