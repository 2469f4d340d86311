// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Properties of CO₂ aggregation that must hold for any input.

use footprint_tracker::models::{EmissionFactors, ProjectStats, TransportMode};

const EPS: f64 = 1e-6;

/// Deterministic pseudo-random legs (LCG), distances on the 0.1 km grid.
fn legs(seed: u64, count: usize) -> Vec<(TransportMode, f64)> {
    let mut state = seed;
    (0..count)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let mode = TransportMode::ALL[(state >> 33) as usize % TransportMode::ALL.len()];
            let tenths = 1 + (state >> 40) % 50_000;
            (mode, tenths as f64 / 10.0)
        })
        .collect()
}

fn assert_close(a: &ProjectStats, b: &ProjectStats) {
    for mode in TransportMode::ALL {
        let (x, y) = (a.mode(mode), b.mode(mode));
        assert_eq!(x.count, y.count, "{mode} count");
        assert!((x.co2 - y.co2).abs() < EPS, "{mode} co2 {} vs {}", x.co2, y.co2);
        assert!((x.distance - y.distance).abs() < EPS, "{mode} distance");
    }
    assert_eq!(a.total.count, b.total.count);
    assert!((a.total.co2 - b.total.co2).abs() < EPS);
}

#[test]
fn test_total_is_sum_of_distance_times_factor() {
    let factors = EmissionFactors::default();
    let input = legs(7, 500);

    let stats = ProjectStats::aggregate(&input, &factors);
    let expected: f64 = input.iter().map(|(m, d)| d * factors.factor(*m)).sum();

    assert!((stats.total.co2 - expected).abs() < EPS);
    assert_eq!(stats.total.count as usize, input.len());
}

#[test]
fn test_order_does_not_matter() {
    let factors = EmissionFactors::default();
    let input = legs(42, 300);

    let mut reversed = input.clone();
    reversed.reverse();
    let mut by_distance = input.clone();
    by_distance.sort_by(|a, b| a.1.total_cmp(&b.1));

    let forward = ProjectStats::aggregate(&input, &factors);
    assert_close(&forward, &ProjectStats::aggregate(&reversed, &factors));
    assert_close(&forward, &ProjectStats::aggregate(&by_distance, &factors));
}

#[test]
fn test_every_mode_is_present() {
    let factors = EmissionFactors::default();
    let only_boats = vec![(TransportMode::Boat, 12.0)];

    for stats in [
        ProjectStats::aggregate(Vec::<(TransportMode, f64)>::new(), &factors),
        ProjectStats::aggregate(&only_boats, &factors),
    ] {
        assert_eq!(stats.modes.len(), TransportMode::ALL.len());
        for mode in TransportMode::ALL {
            assert!(stats.modes.contains_key(&mode));
        }
    }
}

#[test]
fn test_merge_matches_aggregating_the_union() {
    let factors = EmissionFactors::default();
    let baseline = legs(1, 40);
    let participants = legs(2, 60);

    let merged = ProjectStats::aggregate(&baseline, &factors)
        .merge(&ProjectStats::aggregate(&participants, &factors));

    let union: Vec<_> = baseline.iter().chain(participants.iter()).collect();
    assert_close(&merged, &ProjectStats::aggregate(union, &factors));
}
