use std::collections::BTreeSet;
use crate::core::{geohash::{self, Geohash}, registry::ProviderRegistry};
use crate::models::{Candidate, Coordinate, MatchPolicy, ProviderId};

/// Result of the candidate search
#[derive(Debug)]
pub struct MatchResult {
    /// Cell the request location encodes to
    pub request_hash: Geohash,
    pub best: Option<Candidate>,
    pub total_candidates: usize,
}

/// Nearest-available-driver search over the spatial index
///
/// # Pipeline Stages
/// 1. Encode the request location
/// 2. Expand to the request cell plus its sibling cells
/// 3. Query the index by each cell's coarse prefix
/// 4. Keep available drivers and measure great-circle distance
/// 5. Rank by distance, oldest activity first among near ties
#[derive(Debug, Clone)]
pub struct Matcher {
    policy: MatchPolicy,
}

impl Matcher {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    pub fn with_default_policy() -> Self {
        Self {
            policy: MatchPolicy::default(),
        }
    }

    pub fn policy(&self) -> &MatchPolicy {
        &self.policy
    }

    /// Available drivers reachable from `location`, in ascending id order
    pub fn find_candidates(
        &self,
        registry: &ProviderRegistry,
        location: &Coordinate,
    ) -> Vec<Candidate> {
        let request_hash = geohash::encode(location, self.policy.precision);
        self.candidates_around(registry, location, &request_hash)
    }

    fn candidates_around(
        &self,
        registry: &ProviderRegistry,
        location: &Coordinate,
        request_hash: &Geohash,
    ) -> Vec<Candidate> {
        let mut cells = geohash::neighbors(request_hash);
        cells.push(request_hash.clone());

        // Siblings usually collapse onto the same coarse prefix
        let prefixes: BTreeSet<&str> = cells
            .iter()
            .map(|cell| cell.prefix(self.policy.search_prefix_len))
            .collect();

        let ids: BTreeSet<ProviderId> = prefixes
            .into_iter()
            .flat_map(|prefix| registry.ids_with_prefix(prefix))
            .collect();

        ids.into_iter()
            .filter_map(|id| registry.get(id))
            .filter(|provider| provider.available)
            .map(|provider| Candidate {
                provider_id: provider.id,
                distance_km: location.distance_to(&provider.location),
                last_active_at: provider.last_active_at,
            })
            .collect()
    }

    /// Best candidate for a request at `location`, without committing anything
    pub fn find_best(&self, registry: &ProviderRegistry, location: &Coordinate) -> MatchResult {
        let request_hash = geohash::encode(location, self.policy.precision);
        let candidates = self.candidates_around(registry, location, &request_hash);
        let total_candidates = candidates.len();

        tracing::debug!(
            "Found {} available candidates near {}",
            total_candidates, request_hash
        );

        MatchResult {
            best: select_best(&candidates, self.policy.tie_epsilon_km),
            request_hash,
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_policy()
    }
}

/// Pick the nearest candidate, giving near ties to the longest-idle driver
///
/// Every candidate within `epsilon_km` of the minimum distance is tied, and
/// among those the oldest `last_active_at` wins. A full tie goes to the
/// earlier entry.
pub fn select_best(candidates: &[Candidate], epsilon_km: f64) -> Option<Candidate> {
    let nearest = candidates
        .iter()
        .map(|c| c.distance_km)
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))?;

    candidates
        .iter()
        .filter(|c| c.distance_km - nearest < epsilon_km)
        .copied()
        .fold(None, |best: Option<Candidate>, candidate| match best {
            Some(current) if current.last_active_at <= candidate.last_active_at => Some(current),
            _ => Some(candidate),
        })
}
