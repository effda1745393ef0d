mod common;

use common::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tagger_lib::*;

fn population_records() -> Vec<PopulationRecord> {
    vec![
        population_record(0, "Food Bank", 5_000.0),
        population_record(1, "Food Pantry", 8_000.0),
        population_record(2, "Choir", 9_500.0),
        population_record(3, "Museum", 0.0),
        population_record(4, "Community Food Hub", 50_000.0),
        population_record(5, "Library", 75_000.0),
        population_record(6, "Food Trust", 20_000_000.0),
        population_record(7, "Gallery", 12_000_000.0),
        PopulationRecord::new("p8", "Food Stall"),
    ]
}

struct Loaded {
    _fixture: TestFixture,
    population: Population,
    universe: UniverseCounts,
}

fn load(universe_json: &str, cap: usize) -> Loaded {
    let fixture = setup_test_fixture().unwrap();
    let population_path = fixture.path("population.json");
    let universe_path = fixture.path("universe.json");
    std::fs::write(
        &population_path,
        serde_json::to_string(&population_records()).unwrap(),
    )
    .unwrap();
    std::fs::write(&universe_path, universe_json).unwrap();

    let mut rng = StdRng::seed_from_u64(11);
    let population = snapshot::load_population(&population_path, cap, &mut rng).unwrap();
    let universe = snapshot::load_universe(&universe_path).unwrap();

    Loaded {
        _fixture: fixture,
        population,
        universe,
    }
}

fn extrapolate(loaded: &Loaded, sample_size: usize) -> Extrapolation {
    let mut rng = StdRng::seed_from_u64(12);
    Extrapolator::new(sample_size)
        .extrapolate(
            &Matcher::default(),
            &PatternPair::new("food"),
            &loaded.population,
            &loaded.universe,
            &mut rng,
        )
        .unwrap()
}

#[test]
fn test_bands_scale_to_universe() {
    let loaded = load(r#"{"up_to_10k": 1000, "up_to_100k": 200, "over_10m": 10}"#, 10_000);
    let result = extrapolate(&loaded, 20);

    assert_eq!(result.matched, 5);

    let small = result.table.band(IncomeBand::UpTo10k).unwrap();
    assert_eq!((small.selected, small.population), (2, 4));
    assert_eq!(small.estimated_total, Some(500.0));

    let mid = result.table.band(IncomeBand::UpTo100k).unwrap();
    assert_eq!(mid.estimated_total, Some(100.0));

    let large = result.table.band(IncomeBand::Over10m).unwrap();
    assert_eq!(large.estimated_total, Some(5.0));

    assert!(result.table.band(IncomeBand::UpTo1m).is_none());

    // Unbanded records match but never land in a bucket.
    let total = result.table.total().unwrap();
    assert_eq!(total.selected, 4);
    assert_eq!(total.population, 8);
    assert_eq!(total.universe, Some(1210));
    assert_eq!(total.percentage, Some(0.5));
    assert_eq!(total.estimated_total, Some(605.0));

    let band_sum: f64 = result
        .table
        .bands()
        .filter_map(|row| row.estimated_total)
        .sum();
    assert!((band_sum - 605.0).abs() < 1e-9);
}

#[test]
fn test_universe_band_missing_from_sample() {
    let loaded = load(r#"{"up_to_10k": 1000, "up_to_1m": 50}"#, 10_000);
    let result = extrapolate(&loaded, 20);

    let empty = result.table.band(IncomeBand::UpTo1m).unwrap();
    assert_eq!(empty.population, 0);
    assert_eq!(empty.percentage, None);
    assert_eq!(empty.estimated_total, None);

    let unknown = result.table.band(IncomeBand::Over10m).unwrap();
    assert_eq!(unknown.universe, None);
    assert_eq!(unknown.estimated_total, None);
}

#[test]
fn test_display_sample_is_bounded_but_counts_are_not() {
    let loaded = load(r#"{"up_to_10k": 1000}"#, 10_000);
    let result = extrapolate(&loaded, 2);

    assert_eq!(result.matched, 5);
    assert_eq!(result.sample.len(), 2);
    for &index in &result.sample {
        assert!(loaded.population.corpus()[index].to_lowercase().contains("food"));
    }
    assert_eq!(result.table.total().unwrap().selected, 4);
}

#[test]
fn test_population_is_capped() {
    let loaded = load(r#"{}"#, 3);
    assert_eq!(loaded.population.len(), 3);
    assert!(loaded.universe.total().is_none());
}

#[test]
fn test_session_population_request() {
    let loaded = load(r#"{"up_to_10k": 1000, "up_to_100k": 200, "over_10m": 10}"#, 10_000);
    let fixture = setup_test_fixture().unwrap();
    let mut session = fixture
        .session(false)
        .unwrap()
        .with_population(loaded.population.clone(), loaded.universe.clone());
    let mut table = session.initialize(LabelScheme::Tags).unwrap();
    let mut rng = StdRng::seed_from_u64(13);

    let request = EvaluationRequest {
        label: "Food".to_string(),
        include: "food".to_string(),
        exclude: None,
        mode: EvaluationMode::Population,
        commit: false,
    };
    let response = session.handle(&mut table, &request, &mut rng).unwrap();

    match response {
        EvaluationResponse::Population { summary, extrapolation } => {
            assert_eq!(summary.relevant, 3);
            assert_eq!(extrapolation.table.total().unwrap().estimated_total, Some(605.0));
        }
        other => panic!("unexpected response: {:?}", other),
    }
    assert!(!table.get("Food").unwrap().has_pattern());
}
