use chrono::{DateTime, Utc};
use crate::core::{registry::ProviderRegistry, requests::RequestStore};
use crate::models::{ProviderSnapshot, RequestSnapshot, SystemStats};

/// How long ago a driver was last active, e.g. "5 minutes ago"
pub fn describe_idle(secs: i64) -> String {
    if secs < 60 {
        format!("{} seconds ago", secs)
    } else if secs < 3600 {
        format!("{} minutes ago", secs / 60)
    } else {
        format!("{} hours ago", secs / 3600)
    }
}

/// How long a rider has waited, e.g. "2 minutes 5 seconds"
pub fn describe_wait(secs: i64) -> String {
    if secs < 60 {
        format!("{} seconds", secs)
    } else {
        format!("{} minutes {} seconds", secs / 60, secs % 60)
    }
}

/// Build a snapshot of every driver and pending request
pub fn snapshot(registry: &ProviderRegistry, requests: &RequestStore, now: DateTime<Utc>) -> SystemStats {
    let providers: Vec<ProviderSnapshot> = registry
        .iter()
        .map(|provider| {
            let idle_secs = (now - provider.last_active_at).num_seconds().max(0);
            ProviderSnapshot {
                provider_id: provider.id,
                latitude: provider.location.latitude,
                longitude: provider.location.longitude,
                geohash: provider.geohash.to_string(),
                available: provider.available,
                idle_secs,
                last_active: describe_idle(idle_secs),
            }
        })
        .collect();

    let pending: Vec<RequestSnapshot> = requests
        .iter()
        .map(|request| {
            let wait_secs = request.age_secs(now);
            RequestSnapshot {
                request_id: request.id,
                latitude: request.location.latitude,
                longitude: request.location.longitude,
                wait_secs,
                waiting: describe_wait(wait_secs),
            }
        })
        .collect();

    SystemStats {
        total_providers: registry.len(),
        available_providers: registry.available_count(),
        pending_requests: requests.len(),
        providers,
        requests: pending,
    }
}
