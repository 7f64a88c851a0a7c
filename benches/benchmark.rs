// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 性能基准测试套件
//!
//! 覆盖一次监控中的两段纯计算：按选择器提取文本，以及前后快照的行集合比较。

use chrono::Utc;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use sitewatch::domain::services::change_detector::ChangeDetector;
use sitewatch::domain::services::extraction_service::ExtractionService;
use std::hint::black_box;

fn build_page(paragraphs: usize) -> String {
    let mut html = String::from("<html><head><style>p { color: red; }</style></head><body>");
    for i in 0..paragraphs {
        html.push_str(&format!(
            "<div class=\"item\"><p>Paragraph {} with <em>inline</em> text</p><script>var x = {};</script></div>",
            i, i
        ));
    }
    html.push_str("</body></html>");
    html
}

fn build_lines(count: usize, offset: usize) -> String {
    (offset..offset + count)
        .map(|i| format!("line {}", i))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 基准测试：文本提取
fn benchmark_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction");
    let selectors = vec!["p".to_string(), ".item".to_string()];

    for size in [10, 100, 1000].iter() {
        let page = build_page(*size);
        group.bench_with_input(BenchmarkId::new("extract_text", size), &page, |b, page| {
            b.iter(|| black_box(ExtractionService::extract_text(page, &selectors)));
        });
    }

    group.finish();
}

/// 基准测试：变更检测
///
/// 前后两次内容各有一半的行重叠
fn benchmark_change_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("change_detection");
    let now = Utc::now();

    for size in [100, 1000, 10000].iter() {
        let previous = build_lines(*size, 0);
        let current = build_lines(*size, size / 2);
        group.bench_with_input(
            BenchmarkId::new("detect", size),
            &(previous, current),
            |b, (previous, current)| {
                b.iter(|| black_box(ChangeDetector::detect("bench", previous, current, now, now)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_extraction, benchmark_change_detection);
criterion_main!(benches);
