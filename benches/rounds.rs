use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use perco_msr::{Algorithm, Network};

fn dense_leader_graph(num_leaders: usize, num_agents: usize) -> Vec<(usize, usize)> {
    let mut edges = Vec::new();
    for l in 0..num_leaders {
        for f in num_leaders..num_agents {
            edges.push((l, f));
        }
    }
    // Follower chain so BP signals have multi-hop work to do
    for f in num_leaders..num_agents - 1 {
        edges.push((f, f + 1));
    }
    edges
}

fn bench_rounds(c: &mut Criterion) {
    let mut group = c.benchmark_group("rounds");

    for &num_agents in &[9usize, 30, 90] {
        let num_leaders = 3;
        let edges = dense_leader_graph(num_leaders, num_agents);
        let mut base = Network::new(num_leaders, num_agents, 1, 0.0, 0).unwrap();
        base.connect(&edges).unwrap();
        base.connect_adversaries();

        let id = format!("{}a", num_agents);

        let algorithms = [
            ("w_msr", Algorithm::WMsr),
            ("sw_msr", Algorithm::SwMsr { window: 2 }),
            (
                "bp_msr",
                Algorithm::BpMsr {
                    forced_activation: None,
                },
            ),
        ];

        for (name, algorithm) in algorithms {
            group.bench_with_input(BenchmarkId::new(name, &id), &base, |b, base| {
                b.iter_batched(
                    || base.clone(),
                    |mut net| net.run_round(0, &algorithm).unwrap(),
                    BatchSize::SmallInput,
                )
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_rounds);
criterion_main!(benches);
