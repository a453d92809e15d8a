use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use crate::core::stats::describe_wait;
use crate::models::{Coordinate, PendingRequest, RequestId};

/// Default age after which a pending request is dropped
pub const DEFAULT_REQUEST_TIMEOUT_SECS: i64 = 300;

/// Pending ride requests keyed by id
#[derive(Debug)]
pub struct RequestStore {
    pending: HashMap<RequestId, PendingRequest>,
    next_id: RequestId,
}

impl RequestStore {
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn submit(&mut self, location: Coordinate, now: DateTime<Utc>) -> RequestId {
        let id = self.next_id;
        self.next_id += 1;

        self.pending.insert(id, PendingRequest {
            id,
            location,
            requested_at: now,
        });

        tracing::info!(
            "New ride request #{} at ({}, {})",
            id, location.latitude, location.longitude
        );

        id
    }

    pub fn get(&self, id: RequestId) -> Option<&PendingRequest> {
        self.pending.get(&id)
    }

    pub fn contains(&self, id: RequestId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn remove(&mut self, id: RequestId) -> Option<PendingRequest> {
        self.pending.remove(&id)
    }

    /// Drop every request older than `timeout` and return their ids in ascending order
    ///
    /// A request exactly `timeout` old is kept.
    pub fn sweep_expired(&mut self, now: DateTime<Utc>, timeout: Duration) -> Vec<RequestId> {
        let mut expired: Vec<RequestId> = self
            .pending
            .values()
            .filter(|request| now - request.requested_at > timeout)
            .map(|request| request.id)
            .collect();
        expired.sort_unstable();

        for id in &expired {
            if let Some(request) = self.pending.remove(id) {
                tracing::info!(
                    "Ride request #{} expired after waiting for {}",
                    id,
                    describe_wait(request.age_secs(now))
                );
            }
        }

        expired
    }

    /// Requests in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &PendingRequest> {
        let mut requests: Vec<&PendingRequest> = self.pending.values().collect();
        requests.sort_by_key(|r| r.id);
        requests.into_iter()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Default for RequestStore {
    fn default() -> Self {
        Self::new()
    }
}
