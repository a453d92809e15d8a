use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::core::{distance::haversine_distance, geohash::Geohash};

/// Identifier handed out by the provider registry, starting at 1
pub type ProviderId = u64;

/// Identifier handed out by the request store, starting at 1
pub type RequestId = u64;

/// A point on the globe in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Great-circle distance to `other` in kilometers
    #[inline]
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_distance(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Center point of the box
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    #[inline]
    pub fn contains(&self, coord: &Coordinate) -> bool {
        crate::core::distance::is_within_bounding_box(coord.latitude, coord.longitude, self)
    }
}

/// A driver known to the registry
#[derive(Debug, Clone)]
pub struct Provider {
    pub id: ProviderId,
    pub location: Coordinate,
    pub available: bool,
    pub last_active_at: DateTime<Utc>,
    /// Cell the provider is currently indexed under
    pub geohash: Geohash,
}

/// A ride request waiting for a driver
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub id: RequestId,
    pub location: Coordinate,
    pub requested_at: DateTime<Utc>,
}

impl PendingRequest {
    /// Whole seconds elapsed since the request was submitted
    pub fn age_secs(&self, now: DateTime<Utc>) -> i64 {
        (now - self.requested_at).num_seconds().max(0)
    }
}

/// Transient ranking entry built while matching
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub provider_id: ProviderId,
    pub distance_km: f64,
    pub last_active_at: DateTime<Utc>,
}

/// Result of a match attempt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchOutcome {
    Matched {
        #[serde(rename = "requestId")]
        request_id: RequestId,
        #[serde(rename = "providerId")]
        provider_id: ProviderId,
        #[serde(rename = "distanceKm")]
        distance_km: f64,
    },
    NoAvailableMatch {
        #[serde(rename = "requestId")]
        request_id: RequestId,
    },
}

impl MatchOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchOutcome::Matched { .. })
    }

    /// Provider chosen for the request, if any
    pub fn provider_id(&self) -> Option<ProviderId> {
        match self {
            MatchOutcome::Matched { provider_id, .. } => Some(*provider_id),
            MatchOutcome::NoAvailableMatch { .. } => None,
        }
    }
}

/// Per-provider line of a stats snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSnapshot {
    #[serde(rename = "providerId")]
    pub provider_id: ProviderId,
    pub latitude: f64,
    pub longitude: f64,
    pub geohash: String,
    pub available: bool,
    #[serde(rename = "idleSecs")]
    pub idle_secs: i64,
    #[serde(rename = "lastActive")]
    pub last_active: String,
}

/// Per-request line of a stats snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSnapshot {
    #[serde(rename = "requestId")]
    pub request_id: RequestId,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "waitSecs")]
    pub wait_secs: i64,
    pub waiting: String,
}

/// Point-in-time view of the whole system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemStats {
    #[serde(rename = "totalProviders")]
    pub total_providers: usize,
    #[serde(rename = "availableProviders")]
    pub available_providers: usize,
    #[serde(rename = "pendingRequests")]
    pub pending_requests: usize,
    pub providers: Vec<ProviderSnapshot>,
    pub requests: Vec<RequestSnapshot>,
}

/// Tunables for the candidate search and ranking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchPolicy {
    /// Geohash length used to index drivers and requests
    pub precision: usize,
    /// Number of leading symbols queried per candidate cell
    pub search_prefix_len: usize,
    /// Distances closer than this (km) are treated as equal
    pub tie_epsilon_km: f64,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            precision: crate::core::geohash::DEFAULT_PRECISION,
            search_prefix_len: 3,
            tie_epsilon_km: 0.001,
        }
    }
}
