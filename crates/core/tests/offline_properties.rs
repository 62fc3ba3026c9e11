//! Property tests for token masking, resource option equality, metadata
//! validation and projection clamping.

use geo::Point;
use offline_maps_core::access_token::{REDACTION_PLACEHOLDER, redacted};
use offline_maps_core::map::projection::{LATITUDE_MAX, LATITUDE_MIN};
use offline_maps_core::prelude::*;
use offline_maps_core::resource::DEFAULT_CACHE_SIZE;
use proptest::prelude::*;
use serde_json::{Value, json};
use url::Url;

fn builder(token: &str) -> offline_maps_core::resource::ResourceOptionsBuilder {
    ResourceOptions::builder(token)
        .cache_path("/var/cache/maps.db")
        .asset_path("/opt/app/assets")
}

// ─────────────────────────────────────────────────────────────────────────────
// Strategies
// ─────────────────────────────────────────────────────────────────────────────

fn json_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,12}".prop_map(Value::String),
    ]
}

fn json_object() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-z]{1,8}", json_scalar(), 0..6)
        .prop_map(|map| Value::Object(map.into_iter().collect()))
}

fn json_non_object() -> impl Strategy<Value = Value> {
    prop_oneof![
        json_scalar(),
        prop::collection::vec(json_scalar(), 0..4).prop_map(Value::Array),
    ]
}

proptest! {
    #[test]
    fn masking_keeps_prefix_and_length(value in "[ -~]{0,64}") {
        let masked = redacted(&value, 4);
        let kept = value.len().min(4);

        prop_assert!(masked.starts_with(&value[..kept]));
        prop_assert_eq!(masked.chars().count(), value.len());
        prop_assert_eq!(
            masked.chars().filter(|c| *c == REDACTION_PLACEHOLDER).count(),
            value.len() - kept
        );
    }

    #[test]
    fn unset_base_url_never_breaks_equality(host in "[a-z]{1,12}", size in any::<u64>()) {
        let defaults = DefaultLocations::default();
        let url = Url::parse(&format!("https://{host}.example.com")).unwrap();

        let with_url = builder("pk.token").base_url(url).cache_size(size).build_in(&defaults).unwrap();
        let without_url = builder("pk.token").cache_size(size).build_in(&defaults).unwrap();

        prop_assert_eq!(&with_url, &without_url);
        prop_assert_eq!(&without_url, &with_url);
    }

    #[test]
    fn valid_metadata_is_preserved(metadata in json_object()) {
        let region = TileRegionLoadOptions::builder().metadata(&metadata).build().unwrap();
        let pack = StylePackLoadOptions::builder().metadata(&metadata).build().unwrap();

        prop_assert_eq!(Value::Object(region.metadata().unwrap().clone()), metadata.clone());
        prop_assert_eq!(Value::Object(pack.metadata().unwrap().clone()), metadata);
    }

    #[test]
    fn invalid_metadata_fails_both_builders(metadata in json_non_object()) {
        let region = TileRegionLoadOptions::builder().metadata(&metadata).build();
        let pack = StylePackLoadOptions::builder().metadata(&metadata).build();

        prop_assert!(matches!(region, Err(LoadOptionsError::InvalidMetadata(_))));
        prop_assert!(matches!(pack, Err(LoadOptionsError::InvalidMetadata(_))));
    }

    #[test]
    fn latitude_is_clamped_before_projecting(
        longitude in -180.0f64..180.0,
        excess in 0.0f64..1000.0,
        zoom in 0.0f64..22.0,
    ) {
        let zoom_scale = 2f64.powf(zoom);

        let north = Projection::project(Point::new(longitude, LATITUDE_MAX + excess), zoom_scale);
        prop_assert_eq!(north, Projection::project(Point::new(longitude, LATITUDE_MAX), zoom_scale));

        let south = Projection::project(Point::new(longitude, LATITUDE_MIN - excess), zoom_scale);
        prop_assert_eq!(south, Projection::project(Point::new(longitude, LATITUDE_MIN), zoom_scale));
    }
}

#[test]
fn empty_descriptors_match_absent_descriptors() {
    let geometry = Point::new(2.3522, 48.8566);

    let empty = TileRegionLoadOptions::builder()
        .geometry(geometry)
        .descriptors(Vec::<TilesetDescriptor>::new())
        .build()
        .unwrap();
    let absent = TileRegionLoadOptions::builder().geometry(geometry).build().unwrap();

    assert_eq!(empty, absent);
}

#[test]
fn default_cache_size_is_fifty_mebibytes() {
    let options = builder("pk.token").build_in(&DefaultLocations::default()).unwrap();
    assert_eq!(DEFAULT_CACHE_SIZE, 52_428_800);
    assert_eq!(options.cache_size(), 52_428_800);
}

#[test]
fn token_is_masked_after_four_characters() {
    let token = AccessToken::from("pk.abcdef123456");
    assert_eq!(token.to_string(), format!("pk.a{}", "×".repeat(11)));
    assert_eq!(format!("{token:?}"), "AccessToken(<redacted>)");
}

#[test]
fn metadata_object_without_geometry_or_descriptors() {
    let options = TileRegionLoadOptions::builder()
        .descriptors([])
        .metadata(&json!({"a": 1}))
        .accept_expired(false)
        .build()
        .unwrap();

    assert!(options.geometry().is_none());
    assert!(options.descriptors().is_none());
    assert_eq!(options.metadata().unwrap()["a"], 1);
}

#[test]
fn string_metadata_fails_region_build() {
    let descriptor = TilesetDescriptor::style("mapbox://styles/mapbox/streets-v11", 0, 16).unwrap();
    let result = TileRegionLoadOptions::builder()
        .descriptors([descriptor])
        .metadata("not-an-object")
        .build();

    assert!(result.is_err());
    assert!(result.ok().is_none());
}

#[test]
fn default_cache_path_is_created_under_app_support() {
    let root = tempfile::tempdir().unwrap();
    let defaults = DefaultLocations::new(root.path(), root.path());

    let options = ResourceOptions::builder("pk.token").build_in(&defaults).unwrap();
    let expected = root.path().join(".mapbox").join("maps").join("ambient_cache.db");

    assert_eq!(options.cache_path(), expected);
    assert!(expected.parent().unwrap().is_dir());
}
