use chrono::Duration;
use thiserror::Error;
use crate::core::{
    clock::{Clock, SystemClock},
    geohash::Geohash,
    matcher::Matcher,
    registry::ProviderRegistry,
    requests::{RequestStore, DEFAULT_REQUEST_TIMEOUT_SECS},
    stats,
};
use crate::models::{Coordinate, MatchOutcome, MatchPolicy, ProviderId, RequestId, SystemStats};

/// Errors returned by dispatcher operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("Driver #{0} not found")]
    ProviderNotFound(ProviderId),

    #[error("Ride request #{0} not found")]
    RequestNotFound(RequestId),
}

/// Owns the registry, the request store and the matcher
///
/// Every operation takes `&mut self`, so a single lock around the dispatcher
/// makes each one atomic with respect to the others.
#[derive(Debug)]
pub struct Dispatcher<C: Clock = SystemClock> {
    registry: ProviderRegistry,
    requests: RequestStore,
    matcher: Matcher,
    request_timeout: Duration,
    clock: C,
}

impl Dispatcher<SystemClock> {
    pub fn new(policy: MatchPolicy) -> Self {
        Self::with_clock(policy, SystemClock)
    }
}

impl Default for Dispatcher<SystemClock> {
    fn default() -> Self {
        Self::new(MatchPolicy::default())
    }
}

impl<C: Clock> Dispatcher<C> {
    pub fn with_clock(policy: MatchPolicy, clock: C) -> Self {
        Self {
            registry: ProviderRegistry::new(policy.precision),
            requests: RequestStore::new(),
            matcher: Matcher::new(policy),
            request_timeout: Duration::seconds(DEFAULT_REQUEST_TIMEOUT_SECS),
            clock,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn register_provider(&mut self, location: Coordinate) -> ProviderId {
        let now = self.clock.now();
        self.registry.register(location, now)
    }

    /// Move a driver and return the cell it is now indexed under
    pub fn relocate_provider(
        &mut self,
        id: ProviderId,
        location: Coordinate,
    ) -> Result<Geohash, DispatchError> {
        let now = self.clock.now();
        self.registry
            .relocate(id, location, now)
            .map(|provider| provider.geohash.clone())
            .inspect_err(|e| tracing::warn!("{}", e))
    }

    pub fn set_provider_availability(
        &mut self,
        id: ProviderId,
        available: bool,
    ) -> Result<(), DispatchError> {
        let now = self.clock.now();
        self.registry
            .set_availability(id, available, now)
            .inspect_err(|e| tracing::warn!("{}", e))
    }

    /// Store a new request and try to match it straight away
    pub fn submit_request(&mut self, location: Coordinate) -> (RequestId, MatchOutcome) {
        let now = self.clock.now();
        let id = self.requests.submit(location, now);
        let outcome = self.match_pending(id, location);
        (id, outcome)
    }

    /// Try to match a pending request to the best available driver
    ///
    /// With no eligible driver the request stays pending and the outcome is
    /// [`MatchOutcome::NoAvailableMatch`].
    pub fn attempt_match(&mut self, request_id: RequestId) -> Result<MatchOutcome, DispatchError> {
        let location = match self.requests.get(request_id) {
            Some(request) => request.location,
            None => {
                let err = DispatchError::RequestNotFound(request_id);
                tracing::warn!("{}", err);
                return Err(err);
            }
        };

        Ok(self.match_pending(request_id, location))
    }

    fn match_pending(&mut self, request_id: RequestId, location: Coordinate) -> MatchOutcome {
        let result = self.matcher.find_best(&self.registry, &location);
        tracing::info!("Matching ride request #{} with geohash {}", request_id, result.request_hash);

        let Some(best) = result.best else {
            tracing::info!("No available drivers found for ride request #{}", request_id);
            return MatchOutcome::NoAvailableMatch { request_id };
        };

        let now = self.clock.now();
        if let Err(e) = self.registry.set_availability(best.provider_id, false, now) {
            // Candidates come from the registry, so this only fires on a broken index
            tracing::error!("Selected driver vanished while matching: {}", e);
            return MatchOutcome::NoAvailableMatch { request_id };
        }
        self.requests.remove(request_id);

        tracing::info!(
            "Matched ride request #{} with driver #{} (distance: {:.2} km)",
            request_id, best.provider_id, best.distance_km
        );

        MatchOutcome::Matched {
            request_id,
            provider_id: best.provider_id,
            distance_km: best.distance_km,
        }
    }

    /// Drop requests that have waited longer than the configured timeout
    pub fn sweep_expired(&mut self) -> Vec<RequestId> {
        let now = self.clock.now();
        self.requests.sweep_expired(now, self.request_timeout)
    }

    pub fn snapshot_stats(&self) -> SystemStats {
        stats::snapshot(&self.registry, &self.requests, self.clock.now())
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn requests(&self) -> &RequestStore {
        &self.requests
    }
}
