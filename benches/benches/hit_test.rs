// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Size};
use sluice_tree::{FrameDesc, HitTestRequest, NodeDesc, NodeFlags, Page};

/// A `cols` x `rows` grid of cells, each with a clickable child, optionally
/// nested inside an iframe covering the left half of the viewport.
fn build_page(cols: usize, rows: usize, with_frame: bool) -> Page {
    let cell = 20.0;
    let mut page = Page::new(Size::new(cols as f64 * cell, rows as f64 * cell));
    let mut doc = page.document(page.main_frame()).unwrap();
    if with_frame {
        let half = Size::new(cols as f64 * cell / 2.0, rows as f64 * cell);
        let owner = page
            .insert(doc, NodeDesc::element(Rect::from_origin_size(Point::ZERO, half)))
            .unwrap();
        let frame = page.attach_frame(owner, FrameDesc::new(half)).unwrap();
        doc = page.document(frame).unwrap();
    }
    for row in 0..rows {
        for col in 0..cols {
            let (x, y) = (col as f64 * cell, row as f64 * cell);
            let parent = page
                .insert(doc, NodeDesc::element(Rect::new(x, y, x + cell, y + cell)))
                .unwrap();
            page.insert(
                parent,
                NodeDesc::element(Rect::new(x + 4.0, y + 4.0, x + 16.0, y + 16.0))
                    .with_flags(NodeFlags::CLICKABLE),
            );
        }
    }
    page
}

fn bench_hit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("sluice_tree_hit_test");
    for &(n, with_frame) in &[(16_usize, false), (64_usize, false), (64_usize, true)] {
        let page = build_page(n, n, with_frame);
        let main = page.main_frame();
        let points: Vec<Point> = (0..256)
            .map(|i| Point::new((i * 7 % (n * 20)) as f64 + 0.5, (i * 13 % (n * 20)) as f64 + 0.5))
            .collect();
        let label = if with_frame { "iframe" } else { "flat" };

        group.bench_function(format!("point(n={n},{label})"), |b| {
            b.iter(|| {
                for &p in &points {
                    let request =
                        HitTestRequest::READ_ONLY | HitTestRequest::ALLOW_CHILD_FRAME_CONTENT;
                    black_box(page.hit_test(main, p, request, 0.0));
                }
            });
        });

        group.bench_function(format!("padded(n={n},{label})"), |b| {
            b.iter(|| {
                for &p in &points {
                    let request =
                        HitTestRequest::READ_ONLY | HitTestRequest::ALLOW_CHILD_FRAME_CONTENT;
                    black_box(page.hit_test(main, p, request, 10.0));
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hit_test);
criterion_main!(benches);
