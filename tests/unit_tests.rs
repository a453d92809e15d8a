// Unit tests for Ride Match

use std::collections::BTreeSet;
use ride_match::core::{
    distance::haversine_distance,
    geohash::{decode, decode_bounds, encode, neighbors, BASE32, DEFAULT_PRECISION},
    index::SpatialIndex,
    matcher::select_best,
};
use ride_match::models::{Candidate, Coordinate};
use chrono::{Duration, Utc};

#[test]
fn test_haversine_distance_zero() {
    let distance = haversine_distance(12.9716, 77.5946, 12.9716, 77.5946);
    assert!(distance < 0.01);
}

#[test]
fn test_haversine_distance_delhi_to_mumbai() {
    // Roughly 1150 km as the crow flies
    let distance = Coordinate::new(28.6139, 77.2090).distance_to(&Coordinate::new(19.0760, 72.8777));
    assert!(distance > 1100.0 && distance < 1200.0, "got {}", distance);
}

#[test]
fn test_encode_is_deterministic() {
    let coord = Coordinate::new(40.7128, -74.0060);
    assert_eq!(encode(&coord, 8), encode(&coord, 8));
    assert_eq!(encode(&coord, 6).as_str(), "dr5reg");
}

#[test]
fn test_encode_length_and_alphabet_across_the_globe() {
    let coords = [
        Coordinate::new(-90.0, -180.0),
        Coordinate::new(90.0, 180.0),
        Coordinate::new(-45.5, 100.25),
        Coordinate::new(0.0, 0.0),
        Coordinate::new(64.1466, -21.9426),
    ];

    for coord in coords {
        for precision in [1, 3, 6, 9, 12] {
            let hash = encode(&coord, precision);
            assert_eq!(hash.len(), precision);
            assert!(hash.as_str().bytes().all(|b| BASE32.contains(&b)));
        }
    }
}

#[test]
fn test_round_trip_within_cell() {
    let coords = [
        Coordinate::new(51.5074, -0.1278),
        Coordinate::new(-33.8688, 151.2093),
        Coordinate::new(35.6762, 139.6503),
        Coordinate::new(-22.9068, -43.1729),
    ];

    for coord in coords {
        let hash = encode(&coord, DEFAULT_PRECISION);
        let bounds = decode_bounds(hash.as_str());
        let center = decode(hash.as_str());

        assert!(bounds.contains(&coord), "{:?} outside {}", coord, hash);
        assert!((center.latitude - coord.latitude).abs() <= (bounds.max_lat - bounds.min_lat) / 2.0);
        assert!((center.longitude - coord.longitude).abs() <= (bounds.max_lon - bounds.min_lon) / 2.0);
    }
}

#[test]
fn test_out_of_range_input_still_encodes() {
    // Not validated by the codec; saturates to the edge cell
    let hash = encode(&Coordinate::new(120.0, 500.0), 6);
    assert_eq!(hash.as_str(), "zzzzzz");
}

#[test]
fn test_neighbors_share_parent() {
    let hash = encode(&Coordinate::new(12.9716, 77.5946), 6);
    let cells = neighbors(&hash);
    let distinct: BTreeSet<_> = cells.iter().collect();

    assert_eq!(distinct.len(), 32);
    for cell in &cells {
        assert_eq!(cell.len(), 6);
        assert_eq!(cell.prefix(5), hash.prefix(5));
    }
}

#[test]
fn test_index_idempotent_insert() {
    let mut index = SpatialIndex::new();
    index.insert("tdr1v9", 5);
    index.insert("tdr1v9", 5);

    assert_eq!(index.query_by_prefix("tdr").len(), 1);
}

#[test]
fn test_index_move_between_cells() {
    let mut index = SpatialIndex::new();
    index.insert("tdr1v9", 5);
    index.remove("tdr1v9", 5);
    index.insert("te7ud2", 5);

    assert!(index.query_by_prefix("tdr").is_empty());
    assert_eq!(index.query_by_prefix("te7"), BTreeSet::from([5]));
}

#[test]
fn test_tie_break_prefers_older_activity() {
    let now = Utc::now();
    let just_freed = Candidate {
        provider_id: 1,
        distance_km: 2.5000,
        last_active_at: now,
    };
    let long_idle = Candidate {
        provider_id: 2,
        distance_km: 2.5009,
        last_active_at: now - Duration::minutes(20),
    };

    assert_eq!(select_best(&[just_freed, long_idle], 0.001).unwrap().provider_id, 2);
    assert_eq!(select_best(&[long_idle, just_freed], 0.001).unwrap().provider_id, 2);
}

#[test]
fn test_closer_beats_idle_outside_tolerance() {
    let now = Utc::now();
    let close = Candidate {
        provider_id: 1,
        distance_km: 0.2,
        last_active_at: now,
    };
    let idle_but_far = Candidate {
        provider_id: 2,
        distance_km: 0.9,
        last_active_at: now - Duration::hours(3),
    };

    assert_eq!(select_best(&[idle_but_far, close], 0.001).unwrap().provider_id, 1);
}

#[test]
fn test_tie_window_is_anchored_on_nearest() {
    let now = Utc::now();
    let at = |id, distance_km, idle_secs| Candidate {
        provider_id: id,
        distance_km,
        last_active_at: now - Duration::seconds(idle_secs),
    };
    let a = at(1, 1.0000, 10);
    let b = at(2, 1.0008, 20);
    // Within tolerance of 2 but not of 1, so never eligible
    let c = at(3, 1.0016, 30);

    let orders = [
        [a, b, c],
        [a, c, b],
        [b, a, c],
        [b, c, a],
        [c, a, b],
        [c, b, a],
    ];
    for order in orders {
        assert_eq!(select_best(&order, 0.001).unwrap().provider_id, 2);
    }
}
