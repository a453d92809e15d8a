use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};
use crate::core::{dispatch::DispatchError, geohash, index::SpatialIndex};
use crate::models::{Coordinate, Provider, ProviderId};

/// Owns every provider and keeps the spatial index in step with their locations
#[derive(Debug)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderId, Provider>,
    index: SpatialIndex,
    precision: usize,
    next_id: ProviderId,
}

impl ProviderRegistry {
    pub fn new(precision: usize) -> Self {
        Self {
            providers: HashMap::new(),
            index: SpatialIndex::new(),
            precision,
            next_id: 1,
        }
    }

    /// Add an available provider at `location`
    pub fn register(&mut self, location: Coordinate, now: DateTime<Utc>) -> ProviderId {
        let id = self.next_id;
        self.next_id += 1;

        let geohash = geohash::encode(&location, self.precision);
        self.index.insert(geohash.as_str(), id);

        tracing::info!(
            "Added driver #{} at ({}, {}) with geohash {}",
            id, location.latitude, location.longitude, geohash
        );

        self.providers.insert(id, Provider {
            id,
            location,
            available: true,
            last_active_at: now,
            geohash,
        });

        id
    }

    /// Move a provider, re-indexing it under its new cell
    ///
    /// The old index entry is dropped before the new one is added, so the id
    /// is never reachable through two paths.
    pub fn relocate(
        &mut self,
        id: ProviderId,
        location: Coordinate,
        now: DateTime<Utc>,
    ) -> Result<&Provider, DispatchError> {
        let provider = self.providers.get_mut(&id).ok_or(DispatchError::ProviderNotFound(id))?;

        self.index.remove(provider.geohash.as_str(), id);

        provider.location = location;
        provider.last_active_at = now;
        provider.geohash = geohash::encode(&location, self.precision);

        self.index.insert(provider.geohash.as_str(), id);

        tracing::info!(
            "Updated driver #{} location to ({}, {}) with geohash {}",
            id, location.latitude, location.longitude, provider.geohash
        );

        Ok(provider)
    }

    /// Flip availability; becoming available counts as fresh activity
    pub fn set_availability(
        &mut self,
        id: ProviderId,
        available: bool,
        now: DateTime<Utc>,
    ) -> Result<(), DispatchError> {
        let provider = self.providers.get_mut(&id).ok_or(DispatchError::ProviderNotFound(id))?;

        provider.available = available;
        if available {
            provider.last_active_at = now;
        }

        tracing::info!(
            "Set driver #{} availability to {}",
            id,
            if available { "available" } else { "unavailable" }
        );

        Ok(())
    }

    pub fn get(&self, id: ProviderId) -> Option<&Provider> {
        self.providers.get(&id)
    }

    /// Ids indexed under any cell starting with `prefix`
    pub fn ids_with_prefix(&self, prefix: &str) -> BTreeSet<ProviderId> {
        self.index.query_by_prefix(prefix)
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    /// Providers in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &Provider> {
        let mut providers: Vec<&Provider> = self.providers.values().collect();
        providers.sort_by_key(|p| p.id);
        providers.into_iter()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn available_count(&self) -> usize {
        self.providers.values().filter(|p| p.available).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_register_assigns_sequential_ids() {
        let mut registry = ProviderRegistry::new(6);
        let now = Utc::now();

        assert_eq!(registry.register(Coordinate::new(28.61, 77.20), now), 1);
        assert_eq!(registry.register(Coordinate::new(28.62, 77.21), now), 2);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.available_count(), 2);
    }

    #[test]
    fn test_register_indexes_provider() {
        let mut registry = ProviderRegistry::new(6);
        let id = registry.register(Coordinate::new(28.61, 77.20), Utc::now());
        let provider = registry.get(id).unwrap();

        assert_eq!(provider.geohash.len(), 6);
        assert!(registry.index().occupants_at(provider.geohash.as_str()).contains(&id));
    }

    #[test]
    fn test_relocate_moves_index_entry() {
        let mut registry = ProviderRegistry::new(6);
        let start = Utc::now();
        let id = registry.register(Coordinate::new(28.61, 77.20), start);
        let old = registry.get(id).unwrap().geohash.clone();

        let later = start + Duration::seconds(30);
        let new = registry.relocate(id, Coordinate::new(19.07, 72.87), later).unwrap().geohash.clone();

        assert_ne!(old, new);
        assert!(!registry.ids_with_prefix(old.as_str()).contains(&id));
        assert!(registry.ids_with_prefix(new.as_str()).contains(&id));
        assert_eq!(registry.get(id).unwrap().last_active_at, later);
    }

    #[test]
    fn test_unknown_provider() {
        let mut registry = ProviderRegistry::new(6);
        let now = Utc::now();

        assert_eq!(
            registry.relocate(42, Coordinate::new(0.0, 0.0), now).unwrap_err(),
            DispatchError::ProviderNotFound(42)
        );
        assert_eq!(
            registry.set_availability(42, true, now),
            Err(DispatchError::ProviderNotFound(42))
        );
    }

    #[test]
    fn test_only_becoming_available_refreshes_activity() {
        let mut registry = ProviderRegistry::new(6);
        let start = Utc::now();
        let id = registry.register(Coordinate::new(28.61, 77.20), start);

        registry.set_availability(id, false, start + Duration::seconds(10)).unwrap();
        assert_eq!(registry.get(id).unwrap().last_active_at, start);
        assert!(!registry.get(id).unwrap().available);

        registry.set_availability(id, true, start + Duration::seconds(20)).unwrap();
        assert_eq!(registry.get(id).unwrap().last_active_at, start + Duration::seconds(20));
        assert_eq!(registry.available_count(), 1);
    }
}
