// Copyright 2026 the Decay Skim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for selection and subtree compaction over synthetic events.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use decay_skim::{
    CompactScratch, EmitMode, Forest, MissingMotherPolicy, Node, NodeIndex, RadiusWindow,
    SkimConfig, Skimmer, Vertex, Whitelist, compact_with_scratch, select,
};

struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }

    fn below(&mut self, upper: u32) -> u32 {
        if upper == 0 {
            return 0;
        }
        self.next_u32() % upper
    }
}

/// An event of `trees` decay trees with up to `fanout` decays each.
///
/// Roughly one daughter in eight decays inside the default radius window, so
/// selection keeps a small fraction of the event, as in a displaced-vertex skim.
fn build_event(trees: u32, fanout: u32, seed: u64) -> Forest {
    const IDS: [i32; 6] = [9900016, 1000024, 23, 15, 211, 11];
    let mut rng = Lcg::new(seed);
    let mut forest = Forest::new();

    for _ in 0..trees {
        let top = forest.push(Node::new(IDS[rng.below(6) as usize], Vertex::ORIGIN));
        let mut frontier = vec![top];
        for _ in 0..=rng.below(fanout) {
            let Some(mother) = frontier.pop() else {
                break;
            };
            let mut daughter = |rng: &mut Lcg| {
                let r = if rng.below(8) == 0 { 500.0 } else { 10.0 };
                forest.push(
                    Node::new(IDS[rng.below(6) as usize], Vertex::new(r, 0.0, 0.0, 0.0))
                        .with_mother(mother),
                )
            };
            let a = daughter(&mut rng);
            let b = daughter(&mut rng);
            forest
                .link_daughters(mother, Some(a), Some(b))
                .expect("mother was just pushed");
            frontier.push(a);
            frontier.push(b);
        }
    }

    forest
}

fn bench_skim(c: &mut Criterion) {
    let mut group = c.benchmark_group("decay_skim");
    group.sample_size(50);

    for &(trees, fanout) in &[(64_u32, 4_u32), (1_024_u32, 4_u32), (1_024_u32, 32_u32)] {
        let event = build_event(trees, fanout, 0xDECA_0000_0000_0001);
        let roots: Vec<NodeIndex> = select(
            &event,
            RadiusWindow::default(),
            &Whitelist::new(),
            MissingMotherPolicy::Skip,
        )
        .expect("generated events are well formed")
        .roots;

        group.bench_function(format!("select(trees={trees},fanout={fanout})"), |b| {
            b.iter(|| {
                let selection = select(
                    black_box(&event),
                    RadiusWindow::default(),
                    &Whitelist::new(),
                    MissingMotherPolicy::Skip,
                );
                black_box(selection)
            });
        });

        group.bench_function(
            format!("compact_with_scratch(trees={trees},fanout={fanout})"),
            |b| {
                let mut scratch = CompactScratch::with_capacity(event.len());
                b.iter(|| {
                    let out = compact_with_scratch(black_box(&event), &roots, 4096, &mut scratch);
                    black_box(out)
                });
            },
        );

        group.bench_function(
            format!("skimmer_process(trees={trees},fanout={fanout})"),
            |b| {
                b.iter_batched(
                    || Skimmer::new(SkimConfig::default()).expect("default config is valid"),
                    |mut skimmer| black_box(skimmer.process(&event)),
                    BatchSize::SmallInput,
                );
            },
        );

        group.bench_function(
            format!("pass_through(trees={trees},fanout={fanout})"),
            |b| {
                let config = SkimConfig::default().with_emit_mode(EmitMode::PassThrough);
                let mut skimmer = Skimmer::new(config).expect("default config is valid");
                b.iter(|| black_box(skimmer.process(black_box(&event))));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_skim);
criterion_main!(benches);
