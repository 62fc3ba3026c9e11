//! Keys the provisioning service stores offline resources under.

use std::fmt;

/// Caller-chosen name of a tile region, unique within a tile store.
/// Loading a region under an existing id replaces that region.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileRegionId(String);

impl TileRegionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TileRegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TileRegionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A style pack is keyed by the URI of the style it holds; there is at most
/// one pack per style.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StylePackId(String);

impl StylePackId {
    pub fn new(style_uri: impl Into<String>) -> Self {
        Self(style_uri.into())
    }

    pub fn style_uri(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StylePackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "style pack {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_reloading_region_replaces_entry() {
        let mut regions = BTreeMap::new();
        regions.insert(TileRegionId::new("downtown"), 1);
        regions.insert(TileRegionId::from("downtown"), 2);
        regions.insert(TileRegionId::new("airport"), 3);

        assert_eq!(regions.len(), 2);
        assert_eq!(regions[&TileRegionId::new("downtown")], 2);
        assert_eq!(
            regions.keys().map(TileRegionId::as_str).collect::<Vec<_>>(),
            ["airport", "downtown"]
        );
    }

    #[test]
    fn test_style_pack_keyed_by_uri() {
        let streets = StylePackId::new("mapbox://styles/mapbox/streets-v11");

        assert_eq!(streets, StylePackId::new(String::from("mapbox://styles/mapbox/streets-v11")));
        assert_ne!(streets, StylePackId::new("mapbox://styles/mapbox/streets-v12"));
        assert_eq!(streets.style_uri(), "mapbox://styles/mapbox/streets-v11");
        assert_eq!(streets.to_string(), "style pack mapbox://styles/mapbox/streets-v11");
    }
}
