use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geo::Point;
use offline_maps_core::access_token::{AccessToken, AppBundle, REDACTION_INDENT, redacted};
use offline_maps_core::map::{MAX_TILE_ZOOM, Projection, TileId};
use offline_maps_core::offline::{NetworkRestriction, TileRegionLoadOptions};
use offline_maps_core::resource::{
    DefaultLocations, ResourceOptions, TileStore, TileStoreSelection, TileStoreUsageMode,
};
use url::Url;

mod input;

use input::{DescriptorArg, PackIndex, TileArg, read_geometry};

#[derive(Parser, Debug)]
#[command(
    name = "offline-inspect",
    author,
    version,
    about = "Inspect access tokens, resource options and offline load requests",
    long_about = "Resolves access tokens and resource options the way the mobile library \
                  does, validates tile region requests, and runs the Web Mercator helpers.\n\n\
                  Tokens are always printed masked."
)]
struct Args {
    /// Verbose output (show debug messages)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct TokenSource {
    /// Explicit access token
    #[arg(long)]
    token: Option<String>,

    /// Bundle resource directory holding a `MapboxAccessToken` file
    #[arg(long, conflicts_with = "token")]
    bundle_dir: Option<PathBuf>,
}

impl TokenSource {
    fn access_token(&self) -> AccessToken {
        match (&self.token, &self.bundle_dir) {
            (Some(token), _) => AccessToken::from(token.as_str()),
            (None, Some(dir)) => AccessToken::deferred(AppBundle::new(dir)),
            (None, None) => AccessToken::default(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve an access token and print it masked
    Token {
        #[command(flatten)]
        source: TokenSource,

        /// Number of leading characters left visible
        #[arg(long, default_value_t = REDACTION_INDENT)]
        indent: usize,
    },

    /// Build resource options and show the resolved values
    Options {
        #[command(flatten)]
        source: TokenSource,

        #[arg(long)]
        base_url: Option<Url>,

        /// Ambient cache database path (default: under the data directory)
        #[arg(long)]
        cache_path: Option<PathBuf>,

        #[arg(long)]
        asset_path: Option<PathBuf>,

        /// Cache size in bytes
        #[arg(long)]
        cache_size: Option<u64>,

        /// Tile store directory
        #[arg(long)]
        tile_store: Option<PathBuf>,

        /// disabled, read-only or read-and-update
        #[arg(long, default_value_t = TileStoreUsageMode::default())]
        usage_mode: TileStoreUsageMode,

        /// Show how this tile (z/x/y) would be fetched
        #[arg(long)]
        tile: Option<TileArg>,

        /// Loaded tile packs (z/x/y), all at the same zoom
        #[arg(long = "pack")]
        packs: Vec<TileArg>,

        /// Zoom level of tile packs, when no --pack is given
        #[arg(long, default_value_t = 10)]
        pack_zoom: u8,
    },

    /// Validate a tile region load request
    Region {
        /// GeoJSON file with the region geometry
        #[arg(short, long)]
        geometry: Option<PathBuf>,

        /// Tileset descriptor: style:<uri>@<min>-<max> or tileset:<url>@<min>-<max>
        #[arg(short, long = "descriptor")]
        descriptors: Vec<DescriptorArg>,

        /// Metadata; must be a JSON object
        #[arg(short, long)]
        metadata: Option<String>,

        #[arg(long)]
        accept_expired: bool,

        /// none, disallow-expensive or disallow-all
        #[arg(long, default_value_t = NetworkRestriction::default())]
        network_restriction: NetworkRestriction,

        #[arg(long)]
        average_bytes_per_second: Option<u32>,
    },

    /// Project a coordinate onto the Mercator plane
    Project {
        #[arg(long, allow_negative_numbers = true)]
        latitude: f64,

        #[arg(long, allow_negative_numbers = true)]
        longitude: f64,

        #[arg(long, default_value_t = 0.0)]
        zoom: f64,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    match args.command {
        Command::Token { source, indent } => {
            let token = source.access_token();
            let resolved = token.resolve();
            if resolved.is_empty() {
                log::warn!("No access token found");
            }
            println!("token: {}", redacted(resolved, indent));
            println!("deferred: {}", token.is_deferred());
        }

        Command::Options {
            source,
            base_url,
            cache_path,
            asset_path,
            cache_size,
            tile_store,
            usage_mode,
            tile,
            packs,
            pack_zoom,
        } => {
            let mut builder = ResourceOptions::builder(source.access_token()).tile_store_usage_mode(usage_mode);
            if let Some(url) = base_url {
                builder = builder.base_url(url);
            }
            if let Some(path) = cache_path {
                builder = builder.cache_path(path);
            }
            if let Some(path) = asset_path {
                builder = builder.asset_path(path);
            }
            if let Some(size) = cache_size {
                builder = builder.cache_size(size);
            }
            if let Some(path) = tile_store {
                builder = builder.tile_store(TileStore::at(path));
            }

            let options = builder
                .build_in(&DefaultLocations::platform())
                .context("Failed to build resource options")?;

            println!("token: {}", options.access_token());
            println!(
                "base url: {}",
                options.base_url().map_or("(default)", |url| url.as_str())
            );
            println!("cache path: {}", options.cache_path().display());
            println!("asset path: {}", options.asset_path().display());
            println!("cache size: {} bytes", options.cache_size());
            println!("tile store usage: {}", options.tile_store_usage_mode());
            match options.tile_store_selection() {
                TileStoreSelection::Ignored => println!("tile store: ignored"),
                TileStoreSelection::Configured(store) => {
                    println!("tile store: {}", store.path().display())
                }
                TileStoreSelection::PlatformDefault => println!("tile store: platform default"),
            }

            if let Some(TileArg(tile)) = tile {
                let index = PackIndex {
                    pack_zoom: packs.first().map_or(pack_zoom, |TileArg(pack)| pack.zoom),
                    packs: packs.into_iter().map(|TileArg(pack)| pack).collect::<HashSet<TileId>>(),
                };
                let route = options.tile_store_usage_mode().route(tile, &index);
                println!("route for {tile}: {route:?}");
            }
        }

        Command::Region {
            geometry,
            descriptors,
            metadata,
            accept_expired,
            network_restriction,
            average_bytes_per_second,
        } => {
            let mut builder = TileRegionLoadOptions::builder()
                .descriptors(descriptors.into_iter().map(|DescriptorArg(d)| d))
                .accept_expired(accept_expired)
                .network_restriction(network_restriction);

            if let Some(path) = geometry {
                builder = builder.geometry(read_geometry(&path)?);
            }
            if let Some(metadata) = metadata {
                let value: serde_json::Value =
                    serde_json::from_str(&metadata).context("Metadata is not valid JSON")?;
                builder = builder.metadata(&value);
            }
            if let Some(rate) = average_bytes_per_second {
                builder = builder.average_bytes_per_second(rate);
            }

            let options = builder.build().context("Invalid tile region load options")?;

            println!("geometry: {}", if options.geometry().is_some() { "yes" } else { "no" });
            match options.descriptors() {
                Some(descriptors) => {
                    for descriptor in descriptors {
                        println!("descriptor: {descriptor}");
                    }
                }
                None => println!("descriptors: inferred from geometry"),
            }
            if let Some(metadata) = options.metadata() {
                println!("metadata: {}", serde_json::Value::Object(metadata.clone()));
            }
            println!("accept expired: {}", options.accept_expired());
            println!("network restriction: {}", options.network_restriction());
            if let Some(rate) = options.average_bytes_per_second() {
                println!("average rate: {rate} B/s");
            }
        }

        Command::Project {
            latitude,
            longitude,
            zoom,
        } => {
            let coordinate = Point::new(longitude, latitude);
            let clamped = Projection::clamp_latitude(latitude);
            if clamped != latitude {
                log::info!("Latitude {latitude} clamped to {clamped}");
            }

            let point = Projection::project(coordinate, 2f64.powf(zoom));
            let meters = Projection::projected_meters(coordinate);
            println!("point: {:.3}, {:.3}", point.x, point.y);
            println!("meters: northing {:.3}, easting {:.3}", meters.northing, meters.easting);
            println!(
                "meters per point: {:.6}",
                Projection::meters_per_point(latitude, zoom)
            );
            let tile = (zoom >= 0.0 && zoom <= f64::from(MAX_TILE_ZOOM))
                .then(|| TileId::containing(coordinate, zoom.floor() as u8))
                .flatten();
            match tile {
                Some(tile) => println!("tile: {tile}"),
                None => log::info!("No tile address at zoom {zoom}"),
            }
        }
    }

    Ok(())
}
