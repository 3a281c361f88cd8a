use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use teamdraft::{bootstrap, team_draft_interleave, AggregationMode, BootstrapOptions, Team};

fn synthetic_clicks(sessions: usize, seed: u64) -> (Vec<String>, Vec<Option<Team>>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut keys = Vec::new();
    let mut teams = Vec::new();
    for s in 0..sessions {
        for _ in 0..rng.gen_range(1..4) {
            keys.push(format!("session-{s}"));
            teams.push(match rng.gen_range(0..10) {
                0..=4 => Some(Team::A),
                5..=8 => Some(Team::B),
                _ => None,
            });
        }
    }
    (keys, teams)
}

fn bench_interleave(c: &mut Criterion) {
    let ranker_a: Vec<String> = (0..100).map(|i| format!("doc{i}")).collect();
    let ranker_b: Vec<String> = (0..100).map(|i| format!("doc{}", (i * 7) % 130)).collect();
    let mut rng = StdRng::seed_from_u64(1);
    c.bench_function("team_draft_interleave_page_20", |b| {
        b.iter(|| team_draft_interleave(black_box(&ranker_a), black_box(&ranker_b), 20, &mut rng))
    });
}

fn bench_bootstrap(c: &mut Criterion) {
    let mut group = c.benchmark_group("bootstrap_2000_iterations");
    group.sample_size(10);
    let (keys, teams) = synthetic_clicks(5_000, 7);
    for parallel in [false, true] {
        let options = BootstrapOptions {
            parallel,
            ..BootstrapOptions::new(2000, 42)
        };
        group.bench_with_input(
            BenchmarkId::new("parallel", parallel),
            &options,
            |b, options| {
                b.iter(|| bootstrap(&keys, &teams, AggregationMode::PerSession, options))
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_interleave, bench_bootstrap);
criterion_main!(benches);
