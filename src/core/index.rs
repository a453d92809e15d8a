use std::collections::{BTreeSet, HashMap};
use crate::models::ProviderId;

/// One node of the prefix tree. Each node owns its children outright.
#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<char, TrieNode>,
    occupants: BTreeSet<ProviderId>,
}

impl TrieNode {
    fn is_empty(&self) -> bool {
        self.occupants.is_empty() && self.children.is_empty()
    }

    /// Remove `provider_id` at the end of `path`, dropping children left empty
    fn remove_path(&mut self, mut path: std::str::Chars<'_>, provider_id: ProviderId) {
        let Some(c) = path.next() else {
            self.occupants.remove(&provider_id);
            return;
        };

        if let Some(child) = self.children.get_mut(&c) {
            child.remove_path(path, provider_id);
            if child.is_empty() {
                self.children.remove(&c);
            }
        }
    }

    fn collect_into(&self, out: &mut BTreeSet<ProviderId>) {
        out.extend(self.occupants.iter().copied());
        for child in self.children.values() {
            child.collect_into(out);
        }
    }
}

/// Character-keyed prefix tree over geohash strings
///
/// Stores provider ids only; provider records live in the registry.
/// Keeping each id under a single path is the caller's responsibility.
#[derive(Debug, Default)]
pub struct SpatialIndex {
    root: TrieNode,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `provider_id` at the node for `geohash`, creating the path as needed
    pub fn insert(&mut self, geohash: &str, provider_id: ProviderId) {
        let mut node = &mut self.root;
        for c in geohash.chars() {
            node = node.children.entry(c).or_default();
        }
        node.occupants.insert(provider_id);
    }

    /// Remove `provider_id` from the node for `geohash`; missing paths are ignored
    ///
    /// Nodes left with no occupants and no children are pruned, so the tree
    /// does not keep growing as providers move around.
    pub fn remove(&mut self, geohash: &str, provider_id: ProviderId) {
        self.root.remove_path(geohash.chars(), provider_id);
    }

    /// All ids stored at `prefix` or anywhere below it
    pub fn query_by_prefix(&self, prefix: &str) -> BTreeSet<ProviderId> {
        let mut node = &self.root;
        for c in prefix.chars() {
            match node.children.get(&c) {
                Some(child) => node = child,
                None => return BTreeSet::new(),
            }
        }

        let mut found = BTreeSet::new();
        node.collect_into(&mut found);
        found
    }

    /// Ids stored exactly at `geohash`, ignoring deeper nodes
    pub fn occupants_at(&self, geohash: &str) -> BTreeSet<ProviderId> {
        let mut node = &self.root;
        for c in geohash.chars() {
            match node.children.get(&c) {
                Some(child) => node = child,
                None => return BTreeSet::new(),
            }
        }
        node.occupants.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_query_exact() {
        let mut index = SpatialIndex::new();
        index.insert("ttnfv2", 1);

        assert_eq!(index.query_by_prefix("ttnfv2"), BTreeSet::from([1]));
        assert_eq!(index.occupants_at("ttnfv2"), BTreeSet::from([1]));
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut index = SpatialIndex::new();
        index.insert("ttnfv2", 7);
        index.insert("ttnfv2", 7);

        assert_eq!(index.occupants_at("ttnfv2").len(), 1);
    }

    #[test]
    fn test_prefix_collects_subtree() {
        let mut index = SpatialIndex::new();
        index.insert("ttnfv2", 1);
        index.insert("ttnfv8", 2);
        index.insert("ttp000", 3);
        index.insert("u00000", 4);

        assert_eq!(index.query_by_prefix("ttn"), BTreeSet::from([1, 2]));
        assert_eq!(index.query_by_prefix("tt"), BTreeSet::from([1, 2, 3]));
        assert_eq!(index.query_by_prefix(""), BTreeSet::from([1, 2, 3, 4]));
    }

    #[test]
    fn test_prefix_includes_shallow_occupants() {
        let mut index = SpatialIndex::new();
        index.insert("ttn", 1);
        index.insert("ttnfv2", 2);

        assert_eq!(index.query_by_prefix("ttn"), BTreeSet::from([1, 2]));
    }

    #[test]
    fn test_unknown_prefix_is_empty() {
        let mut index = SpatialIndex::new();
        index.insert("ttnfv2", 1);

        assert!(index.query_by_prefix("ttx").is_empty());
        assert!(index.query_by_prefix("ttnfv2z").is_empty());
    }

    #[test]
    fn test_remove() {
        let mut index = SpatialIndex::new();
        index.insert("ttnfv2", 1);
        index.insert("ttnfv2", 2);
        index.remove("ttnfv2", 1);

        assert_eq!(index.query_by_prefix("ttn"), BTreeSet::from([2]));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut index = SpatialIndex::new();
        index.insert("ttnfv2", 1);
        index.remove("zzzzzz", 1);
        index.remove("ttnfv2", 99);
        // Intermediate node holds nothing
        index.remove("ttn", 1);

        assert_eq!(index.query_by_prefix("ttnfv2"), BTreeSet::from([1]));
    }

    #[test]
    fn test_remove_prunes_empty_branch() {
        let mut index = SpatialIndex::new();
        index.insert("ttnfv2", 1);
        index.remove("ttnfv2", 1);

        assert!(index.root.children.is_empty());
    }

    #[test]
    fn test_remove_keeps_shared_path() {
        let mut index = SpatialIndex::new();
        index.insert("ttnfv2", 1);
        index.insert("ttnfv8", 2);
        index.insert("ttn", 3);
        index.remove("ttnfv2", 1);

        let ttnfv = &index.root.children[&'t'].children[&'t'].children[&'n'].children[&'f'].children[&'v'];
        assert!(!ttnfv.children.contains_key(&'2'));
        assert!(ttnfv.children.contains_key(&'8'));

        // Empty again once the deeper entry goes, but 3 still sits at "ttn"
        index.remove("ttnfv8", 2);
        let ttn = &index.root.children[&'t'].children[&'t'].children[&'n'];
        assert!(ttn.children.is_empty());
        assert_eq!(index.query_by_prefix("t"), BTreeSet::from([3]));
    }
}
