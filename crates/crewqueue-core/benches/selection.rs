use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crewqueue_logic::selector::{select_crew, Candidate, SeatRequest, SelectionQuery};

fn pool(size: usize, rng: &mut StdRng) -> Vec<Candidate> {
    let roles = ["Pilot", "Engineer", "Scientist"];
    (0..size)
        .map(|i| Candidate {
            name: format!("Crew {} Kerman", i),
            role: roles[i % roles.len()].to_string(),
            experience_level: rng.gen_range(0..=5),
            last_flown: rng.gen_range(0.0..1.0e7),
            on_vacation: rng.gen_bool(0.3),
        })
        .collect()
}

fn bench_select_crew(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_crew");
    let request = SeatRequest::new(16);
    for size in [10usize, 100, 1000] {
        let mut rng = StdRng::seed_from_u64(size as u64);
        let candidates = pool(size, &mut rng);
        group.bench_with_input(BenchmarkId::from_parameter(size), &candidates, |b, candidates| {
            let mut query = SelectionQuery::new(&request);
            query.prefer_veteran = true;
            b.iter(|| select_crew(black_box(&query), black_box(candidates), &mut rng));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_select_crew);
criterion_main!(benches);
