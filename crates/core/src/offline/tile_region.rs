//! Load options for downloading a tile region.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use geo::{Geometry, Point};
use serde::Serialize;
use serde_json::Value;

use super::{LoadOptionsError, Metadata, NetworkRestriction, TilesetDescriptor, validate_metadata};

/// A validated tile region load request.
///
/// Descriptors are `None` when the caller gave none; the provisioning
/// service then infers the tilesets from the geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct TileRegionLoadOptions {
    geometry: Option<Geometry>,
    descriptors: Option<Vec<TilesetDescriptor>>,
    metadata: Option<Metadata>,
    accept_expired: bool,
    network_restriction: NetworkRestriction,
    average_bytes_per_second: Option<u32>,
}

impl TileRegionLoadOptions {
    pub fn builder() -> TileRegionLoadOptionsBuilder {
        TileRegionLoadOptionsBuilder::default()
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    pub fn descriptors(&self) -> Option<&[TilesetDescriptor]> {
        self.descriptors.as_deref()
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    pub fn accept_expired(&self) -> bool {
        self.accept_expired
    }

    pub fn network_restriction(&self) -> NetworkRestriction {
        self.network_restriction
    }

    /// Cap on the rolling average download rate. Not a hard limit: the
    /// download may burst above it and then pause until the trailing
    /// average is back under the cap.
    pub fn average_bytes_per_second(&self) -> Option<u32> {
        self.average_bytes_per_second
    }

    /// Reserved; loads always start from the region's own geometry.
    pub fn start_location(&self) -> Option<Point> {
        None
    }

    /// Reserved for service-specific options; never set.
    pub fn extra_options(&self) -> Option<&Value> {
        None
    }
}

#[derive(Clone, Debug, Default)]
pub struct TileRegionLoadOptionsBuilder {
    geometry: Option<Geometry>,
    descriptors: Option<Vec<TilesetDescriptor>>,
    metadata: Option<Result<Metadata, LoadOptionsError>>,
    accept_expired: bool,
    network_restriction: NetworkRestriction,
    average_bytes_per_second: Option<u32>,
}

impl TileRegionLoadOptionsBuilder {
    pub fn geometry(mut self, geometry: impl Into<Geometry>) -> Self {
        self.geometry = Some(geometry.into());
        self
    }

    /// An empty list is the same as giving none.
    pub fn descriptors(mut self, descriptors: impl IntoIterator<Item = TilesetDescriptor>) -> Self {
        let descriptors: Vec<_> = descriptors.into_iter().collect();
        self.descriptors = (!descriptors.is_empty()).then_some(descriptors);
        self
    }

    /// Custom JSON stored alongside the region. Must serialise to a JSON
    /// object, otherwise [`build`](Self::build) fails.
    pub fn metadata<T: Serialize + ?Sized>(mut self, metadata: &T) -> Self {
        self.metadata = Some(validate_metadata(metadata));
        self
    }

    pub fn accept_expired(mut self, accept_expired: bool) -> Self {
        self.accept_expired = accept_expired;
        self
    }

    pub fn network_restriction(mut self, network_restriction: NetworkRestriction) -> Self {
        self.network_restriction = network_restriction;
        self
    }

    pub fn average_bytes_per_second(mut self, bytes_per_second: u32) -> Self {
        self.average_bytes_per_second = Some(bytes_per_second);
        self
    }

    pub fn build(self) -> Result<TileRegionLoadOptions, LoadOptionsError> {
        let metadata = self.metadata.transpose()?;

        Ok(TileRegionLoadOptions {
            geometry: self.geometry,
            descriptors: self.descriptors,
            metadata,
            accept_expired: self.accept_expired,
            network_restriction: self.network_restriction,
            average_bytes_per_second: self.average_bytes_per_second,
        })
    }
}

// ============================================================================
// Rolling average
// ============================================================================

/// Trailing-window byte counter matching the semantics of
/// [`TileRegionLoadOptions::average_bytes_per_second`].
///
/// Provisioners use it to decide when to pause a download; bursts are
/// allowed as long as the average over the window stays under the cap.
#[derive(Clone, Debug)]
pub struct RateWindow {
    bytes_per_second: u32,
    window: Duration,
    samples: VecDeque<(Instant, u64)>,
    total: u64,
}

impl RateWindow {
    pub fn new(bytes_per_second: u32, window: Duration) -> Self {
        Self {
            bytes_per_second,
            window,
            samples: VecDeque::new(),
            total: 0,
        }
    }

    pub fn record(&mut self, bytes: u64, at: Instant) {
        self.evict(at);
        self.samples.push_back((at, bytes));
        self.total += bytes;
    }

    /// Average rate over the trailing window ending at `now`.
    pub fn average(&mut self, now: Instant) -> f64 {
        self.evict(now);
        if self.window.is_zero() {
            return 0.0;
        }
        self.total as f64 / self.window.as_secs_f64()
    }

    pub fn may_proceed(&mut self, now: Instant) -> bool {
        self.average(now) <= f64::from(self.bytes_per_second)
    }

    fn evict(&mut self, now: Instant) {
        while let Some(&(at, bytes)) = self.samples.front() {
            if now.saturating_duration_since(at) > self.window {
                self.samples.pop_front();
                self.total -= bytes;
            } else {
                break;
            }
        }
    }
}
