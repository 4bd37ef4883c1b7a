// Criterion benchmarks for Food Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use food_match::core::{distance::distance_km, find_closest, Located, Matcher};
use food_match::models::{Coordinates, DonationOffer, NgoRequest};
use food_match::services::FixedGeocoder;

const NEW_YORK: Coordinates = Coordinates::new(40.7128, -74.0060);

fn scattered(i: usize) -> Coordinates {
    Coordinates::new(
        40.5 + (i % 97) as f64 * 0.005,
        -74.3 + (i % 89) as f64 * 0.006,
    )
}

fn bench_distance(c: &mut Criterion) {
    let brooklyn = Coordinates::new(40.6526, -73.9497);

    c.bench_function("distance_km", |b| {
        b.iter(|| distance_km(black_box(NEW_YORK), black_box(brooklyn)));
    });
}

fn bench_find_closest(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_closest");

    for size in [10, 100, 1000].iter() {
        let candidates: Vec<Located<usize>> = (0..*size)
            .map(|i| Located { record: i, coordinates: scattered(i) })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &candidates, |b, candidates| {
            b.iter(|| find_closest(black_box(NEW_YORK), black_box(candidates)));
        });
    }

    group.finish();
}

fn bench_match_pass(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let mut group = c.benchmark_group("match_pass");

    for size in [10, 100].iter() {
        let mut geocoder = FixedGeocoder::new();
        let donors: Vec<DonationOffer> = (0..*size)
            .map(|i| {
                let location = format!("Donor Street {}", i);
                geocoder.insert(&location, scattered(i));
                DonationOffer {
                    id: format!("donor_{}", i),
                    food_type: "Rice".to_string(),
                    quantity: "1 kg".to_string(),
                    expiry_time_hours: 24,
                    location,
                    timestamp: String::new(),
                }
            })
            .collect();
        let ngos: Vec<NgoRequest> = (0..*size)
            .map(|i| {
                let location = format!("Shelter Avenue {}", i);
                geocoder.insert(&location, scattered(i * 7 + 3));
                NgoRequest {
                    id: format!("ngo_{}", i),
                    ngo_name: format!("Shelter {}", i),
                    food_needed: "Any".to_string(),
                    location,
                    timestamp: String::new(),
                }
            })
            .collect();
        let matcher = Matcher::default();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                runtime.block_on(matcher.run(
                    black_box(donors.clone()),
                    black_box(ngos.clone()),
                    &geocoder,
                ))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_distance, bench_find_closest, bench_match_pass);
criterion_main!(benches);
