//! Galaxy Survey Headless Self-Check Harness
//!
//! Validates the survey pipeline against the bundled sample dump and a
//! synthetic galaxy. Runs entirely in-process; it writes no files and never calls the CLI.
//!
//! Usage:
//!   cargo run -p galaxy-survey-simtest
//!   cargo run -p galaxy-survey-simtest -- --verbose

use galaxy_survey_logic::candidates::{filter_candidates, FilterCriteria, Prioritized};
use galaxy_survey_logic::occupation::{detect_occupation_status, OccupationStatus};
use galaxy_survey_logic::proximity::{find_nearby_with_sources, ProximityConfig, ReferenceIndex};
use galaxy_survey_logic::records::{BodyRecord, MarketId, RingRecord, StationRecord, SystemRecord};
use galaxy_survey_logic::spatial::{distance, distance_from_sol, KdTree, Point3};
use galaxy_survey_logic::stats::{extract_system_stats, StatsExtractor, SystemStats};

// ── Sample dump (same file the CLI tests use) ───────────────────────────
const SAMPLE_JSON: &str = include_str!("../../../data/sample_galaxy.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Galaxy Survey Self-Check ===\n");

    let mut results = Vec::new();

    // 1. Sample dump parsing & classification
    results.extend(validate_sample_dump(verbose));

    // 2. Occupation precedence
    results.extend(validate_occupation_rules(verbose));

    // 3. Distance arithmetic
    results.extend(validate_distances(verbose));

    // 4. Candidate filter over a synthetic galaxy
    let galaxy = synthetic_galaxy(4_000, 0x5eed);
    results.extend(validate_candidate_filter(&galaxy, verbose));

    // 5. k-d tree against brute force
    results.extend(validate_kd_tree(&galaxy, verbose));

    // 6. Proximity join
    results.extend(validate_proximity(&galaxy, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── Synthetic galaxy ────────────────────────────────────────────────────

/// Deterministic hash for synthetic data, returns 0.0..1.0.
fn unit_hash(seed: u64, index: u64) -> f64 {
    let mut h = seed.wrapping_mul(6364136223846793005).wrapping_add(index);
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51afd7ed558ccd);
    h ^= h >> 33;
    (h % 1_000_000) as f64 / 1_000_000.0
}

fn station(market_id: u64, station_type: &str) -> StationRecord {
    StationRecord {
        market_id: Some(MarketId::Number(market_id)),
        station_type: Some(station_type.to_string()),
        distance_to_arrival: Some(100.0),
        ..Default::default()
    }
}

/// Systems scattered in a 1200 ly cube around Sol with a mix of body
/// counts and station setups.
fn synthetic_galaxy(count: u64, seed: u64) -> Vec<SystemStats> {
    (0..count)
        .map(|i| {
            let h = |k: u64| unit_hash(seed, i * 16 + k);
            let coords = Point3::new(
                (h(0) - 0.5) * 1200.0,
                (h(1) - 0.5) * 1200.0,
                (h(2) - 0.5) * 1200.0,
            );
            let total = (h(3) * 60.0) as usize;
            let landable = (h(4) * total as f64) as usize;
            let ringed = (h(5) * 8.0) as usize;
            let bodies = (0..total)
                .map(|b| BodyRecord {
                    landable: Some(b < landable),
                    rings: (b < ringed).then(|| vec![RingRecord::default()]),
                    ..Default::default()
                })
                .collect();
            let stations = match (h(6) * 10.0) as u32 {
                0..=5 => vec![],
                6 | 7 => vec![station(128_000_000 + i, "Coriolis Starport")],
                8 => vec![station(4_200_000_000 + i, "Outpost")],
                _ => vec![station(3_950_000_000 + i, "Space Construction Depot")],
            };
            let record = SystemRecord {
                id64: Some(i),
                name: format!("Synth {i}"),
                coords: Some(coords),
                population: 0,
                bodies,
                stations,
            };
            extract_system_stats(&record)
        })
        .collect()
}

// ── 1. Sample dump ──────────────────────────────────────────────────────

fn validate_sample_dump(verbose: bool) -> Vec<TestResult> {
    println!("--- Sample Dump ---");
    let mut results = Vec::new();

    let systems: Vec<SystemRecord> = match serde_json::from_str(SAMPLE_JSON) {
        Ok(s) => s,
        Err(e) => {
            results.push(TestResult {
                name: "sample_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "sample_not_empty".into(),
        passed: !systems.is_empty(),
        detail: format!("{} systems loaded", systems.len()),
    });

    let mut extractor = StatsExtractor::new();
    let rows: Vec<SystemStats> = systems.iter().map(|s| extractor.extract(s)).collect();
    let summary = extractor.into_summary();

    for status in OccupationStatus::ALL {
        if verbose {
            println!("  {}: {}", status, summary.count(status));
        }
        results.push(TestResult {
            name: format!("sample_has_{}", status),
            passed: summary.count(status) > 0,
            detail: format!("{} systems {}", summary.count(status), status),
        });
    }

    let stationless_ok = rows
        .iter()
        .filter(|r| !r.has_station)
        .all(|r| r.occupation_status == OccupationStatus::Uncolonised);
    results.push(TestResult {
        name: "sample_stationless_uncolonised".into(),
        passed: stationless_ok,
        detail: "systems without stations are uncolonised".into(),
    });

    results.push(TestResult {
        name: "sample_unclassified_reported".into(),
        passed: summary.unclassified_stations == 1,
        detail: format!(
            "{} unclassified station(s)",
            summary.unclassified_stations
        ),
    });

    results
}

// ── 2. Occupation rules ─────────────────────────────────────────────────

fn validate_occupation_rules(_verbose: bool) -> Vec<TestResult> {
    println!("--- Occupation Rules ---");
    let mut results = Vec::new();

    let regular = station(128_016_384, "Orbis Starport");
    let colonised = station(4_200_000_000, "Outpost");
    let colonising = station(3_950_000_000, "Planetary Construction Site");

    let cases = [
        ("none", vec![], OccupationStatus::Uncolonised),
        ("colonising_only", vec![colonising.clone()], OccupationStatus::Colonising),
        (
            "colonised_beats_colonising",
            vec![colonising.clone(), colonised.clone()],
            OccupationStatus::Colonised,
        ),
        (
            "regular_beats_colonised",
            vec![colonised, regular, colonising],
            OccupationStatus::Occupied,
        ),
    ];

    for (name, stations, expected) in cases {
        let got = detect_occupation_status(&stations);
        results.push(TestResult {
            name: format!("occupation_{}", name),
            passed: got == expected,
            detail: format!("expected {}, got {}", expected, got),
        });
    }

    results
}

// ── 3. Distances ────────────────────────────────────────────────────────

fn validate_distances(_verbose: bool) -> Vec<TestResult> {
    println!("--- Distances ---");
    vec![
        TestResult {
            name: "distance_origin".into(),
            passed: distance_from_sol(Point3::ORIGIN) == 0.0,
            detail: "|(0,0,0)| = 0".into(),
        },
        TestResult {
            name: "distance_3_4_5".into(),
            passed: distance_from_sol(Point3::new(3.0, 4.0, 0.0)) == 5.0,
            detail: "|(3,4,0)| = 5".into(),
        },
        TestResult {
            name: "distance_symmetric".into(),
            passed: distance(Point3::new(1.0, 2.0, 3.0), Point3::new(-4.0, 0.5, 9.0))
                == distance(Point3::new(-4.0, 0.5, 9.0), Point3::new(1.0, 2.0, 3.0)),
            detail: "d(a,b) = d(b,a)".into(),
        },
    ]
}

// ── 4. Candidate filter ─────────────────────────────────────────────────

fn validate_candidate_filter(galaxy: &[SystemStats], verbose: bool) -> Vec<TestResult> {
    println!("--- Candidate Filter ---");
    let mut results = Vec::new();
    let criteria = FilterCriteria::default();

    let candidates = filter_candidates(galaxy.to_vec(), &criteria);
    if verbose {
        println!("  {} of {} systems are candidates", candidates.len(), galaxy.len());
    }

    results.push(TestResult {
        name: "filter_nonempty".into(),
        passed: !candidates.is_empty(),
        detail: format!("{} candidates", candidates.len()),
    });

    let sorted = candidates
        .windows(2)
        .all(|w| w[0].priority_key() >= w[1].priority_key());
    results.push(TestResult {
        name: "filter_sorted_desc".into(),
        passed: sorted,
        detail: "adjacent rows non-increasing on (bodies, landable, rings)".into(),
    });

    let all_match = candidates.iter().all(|r| criteria.matches(r));
    results.push(TestResult {
        name: "filter_predicate_holds".into(),
        passed: all_match,
        detail: "every candidate satisfies the thresholds".into(),
    });

    let expected = galaxy.iter().filter(|r| criteria.matches(r)).count();
    results.push(TestResult {
        name: "filter_complete".into(),
        passed: expected == candidates.len(),
        detail: format!("{} expected, {} kept", expected, candidates.len()),
    });

    let again = filter_candidates(candidates.clone(), &criteria);
    results.push(TestResult {
        name: "filter_idempotent".into(),
        passed: again == candidates,
        detail: "filter(filter(x)) = filter(x)".into(),
    });

    results
}

// ── 5. k-d tree ─────────────────────────────────────────────────────────

fn validate_kd_tree(galaxy: &[SystemStats], _verbose: bool) -> Vec<TestResult> {
    println!("--- k-d Tree ---");
    let mut results = Vec::new();

    let points: Vec<Point3> = galaxy.iter().map(|r| r.position()).collect();
    let tree = KdTree::build(&points);

    let mut mismatches = 0;
    let queries = 200u64;
    for q in 0..queries {
        let center = Point3::new(
            (unit_hash(99, q * 3) - 0.5) * 1300.0,
            (unit_hash(99, q * 3 + 1) - 0.5) * 1300.0,
            (unit_hash(99, q * 3 + 2) - 0.5) * 1300.0,
        );
        let radius = 15.0 + unit_hash(7, q) * 60.0;
        let brute: Vec<usize> = points
            .iter()
            .enumerate()
            .filter(|(_, p)| distance(**p, center) <= radius)
            .map(|(i, _)| i)
            .collect();
        if tree.within_radius(center, radius) != brute {
            mismatches += 1;
        }
    }
    results.push(TestResult {
        name: "kdtree_matches_brute_force".into(),
        passed: mismatches == 0,
        detail: format!("{} of {} radius queries differ", mismatches, queries),
    });

    let self_hits = points
        .iter()
        .enumerate()
        .take(100)
        .all(|(i, p)| tree.within_radius(*p, 0.0).contains(&i));
    results.push(TestResult {
        name: "kdtree_self_match".into(),
        passed: self_hits,
        detail: "every point finds itself at radius 0".into(),
    });

    results
}

// ── 6. Proximity ────────────────────────────────────────────────────────

fn validate_proximity(galaxy: &[SystemStats], verbose: bool) -> Vec<TestResult> {
    println!("--- Proximity Join ---");
    let mut results = Vec::new();
    let config = ProximityConfig::default();

    // Sol / Proc / Far scenario.
    let make = |name: &str, pos: Point3, status: OccupationStatus| SystemStats {
        system_name: name.to_string(),
        x: pos.x,
        y: pos.y,
        z: pos.z,
        distance_from_sol: distance_from_sol(pos),
        body_count: 40,
        landable_count: 25,
        ring_count: 5,
        has_station: status == OccupationStatus::Occupied,
        occupation_status: status,
    };
    let sol = make("Sol", Point3::ORIGIN, OccupationStatus::Occupied);
    let proc_ = make("Proc", Point3::new(3.0, 4.0, 0.0), OccupationStatus::Uncolonised);
    let far = make("Far", Point3::new(100.0, 0.0, 0.0), OccupationStatus::Uncolonised);
    let all = vec![sol, proc_.clone(), far.clone()];
    let out = find_nearby_with_sources(&[proc_, far], &all, &config);
    results.push(TestResult {
        name: "proximity_sol_proc_far".into(),
        passed: out.len() == 1
            && out[0].system_name == "Proc"
            && out[0].source_systems_within_15ly == "Sol",
        detail: "Proc kept with \"Sol\", Far dropped".into(),
    });

    // Synthetic galaxy: every kept candidate really has a source in range,
    // every dropped one really has none.
    let candidates = filter_candidates(galaxy.to_vec(), &FilterCriteria::default());
    let nearby = find_nearby_with_sources(&candidates, galaxy, &config);
    let index = ReferenceIndex::build(galaxy, config.reference_status);
    if verbose {
        println!(
            "  {} of {} candidates near {} occupied systems",
            nearby.len(),
            candidates.len(),
            index.len()
        );
    }

    let kept_ok = nearby.iter().all(|row| {
        let here = Point3::new(row.x, row.y, row.z);
        row.sources().all(|name| {
            galaxy.iter().any(|s| {
                s.system_name == name
                    && s.occupation_status == OccupationStatus::Occupied
                    && distance(s.position(), here) <= config.radius_ly
            })
        })
    });
    results.push(TestResult {
        name: "proximity_sources_in_range".into(),
        passed: kept_ok,
        detail: "annotated sources are occupied and within radius".into(),
    });

    let dropped_ok = candidates
        .iter()
        .filter(|c| !nearby.iter().any(|n| n.system_name == c.system_name))
        .all(|c| match index.nearest(c.position()) {
            Some((_, d)) => d > config.radius_ly,
            None => true,
        });
    results.push(TestResult {
        name: "proximity_dropped_out_of_range".into(),
        passed: dropped_ok,
        detail: "dropped candidates have no occupied system within radius".into(),
    });

    let sorted = nearby
        .windows(2)
        .all(|w| w[0].priority_key() >= w[1].priority_key());
    results.push(TestResult {
        name: "proximity_sorted_desc".into(),
        passed: sorted,
        detail: "output re-sorted by priority".into(),
    });

    results
}
