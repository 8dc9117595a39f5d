// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sluice_responder::hover::HoverState;

/// Root→leaf paths that share a prefix of `shared` nodes and differ below it.
fn paths(depth: u32, shared: u32) -> (Vec<u32>, Vec<u32>) {
    let a: Vec<u32> = (0..depth).collect();
    let b: Vec<u32> = (0..depth)
        .map(|i| if i < shared { i } else { 1_000 + i })
        .collect();
    (a, b)
}

fn bench_hover(c: &mut Criterion) {
    let mut group = c.benchmark_group("sluice_responder_hover");
    for &(depth, shared) in &[(8_u32, 6_u32), (32, 4), (128, 120)] {
        let (a, b) = paths(depth, shared);
        group.bench_function(format!("alternate(depth={depth},shared={shared})"), |bench| {
            let mut hover: HoverState<u32> = HoverState::new();
            bench.iter(|| {
                black_box(hover.update_path(&a));
                black_box(hover.update_path(&b));
            });
        });
        group.bench_function(format!("same_path(depth={depth})"), |bench| {
            let mut hover: HoverState<u32> = HoverState::new();
            hover.update_path(&a);
            bench.iter(|| black_box(hover.update_path(&a)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hover);
criterion_main!(benches);
