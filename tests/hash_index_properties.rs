//! End-to-end properties an index layer relies on: covering-box
//! containment, Z-order sorting of hashes, and serialization of the
//! configuration surface.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spatial_hash::{HashConverter, Parameters, Point, SpatialHash};

#[test]
fn test_covering_box_contains_hashed_points() {
    let converter = HashConverter::new(Parameters::new(-100000000.3, 100000000.3, 32).unwrap())
        .unwrap();

    // Regression case: without the error-bound expansion this point falls
    // outside the bare cell it hashes to.
    let tricky = Point::new(-7201198.6497758823, -0.1);
    let hash = converter.hash(&tricky).unwrap();
    assert!(converter.unhash_to_box_covering(&hash).contains_point(&tricky));

    // Seeded sample across the plane.
    let mut rng = StdRng::seed_from_u64(31337);
    for _ in 0..1000 {
        let point = Point::new(
            rng.gen_range(-100000000.3..=100000000.3),
            rng.gen_range(-100000000.3..=100000000.3),
        );
        let hash = converter.hash(&point).unwrap();
        let covering = converter.unhash_to_box_covering(&hash);
        assert!(covering.contains_point(&point), "{:?} escaped {:?}", point, hash);
    }
}

#[test]
fn test_hashes_sort_in_z_order() {
    // Quantized 2x2 plane: Z-order visits (0,0), (0,1), (1,0), (1,1) when
    // x occupies the even (more significant) interleave positions.
    let converter = HashConverter::new(Parameters::new(0.0, 2.0, 1).unwrap()).unwrap();
    let mut hashes: Vec<SpatialHash> = [(1.5, 0.5), (0.5, 0.5), (1.5, 1.5), (0.5, 1.5)]
        .iter()
        .map(|&(x, y)| converter.hash(&Point::new(x, y)).unwrap())
        .collect();
    hashes.sort();

    let patterns: Vec<String> = hashes.iter().map(|h| h.to_string()).collect();
    assert_eq!(patterns, ["00", "01", "10", "11"]);
}

#[test]
fn test_recovered_corner_rehashes_to_same_cell() {
    let converter = HashConverter::new(Parameters::new(0.0, 1.0, 32).unwrap()).unwrap();
    let mut rng = StdRng::seed_from_u64(31337);
    for _ in 0..1000 {
        let point = Point::new(rng.gen_range(0.0..=1.0), rng.gen_range(0.0..=1.0));
        let hash = converter.hash(&point).unwrap();
        let corner = converter.unhash_to_point(&hash);
        assert_eq!(converter.hash(&corner).unwrap(), hash);
    }
}

#[test]
fn test_parameters_and_hash_round_trip_through_serde() {
    let params = Parameters::new(-180.0, 180.0, 32).unwrap();
    let json = serde_json::to_string(&params).unwrap();
    let restored: Parameters = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, params);

    let hash = SpatialHash::from_bit_string("1100101001").unwrap();
    let json = serde_json::to_string(&hash).unwrap();
    let restored: SpatialHash = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, hash);
}
