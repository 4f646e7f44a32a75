//! Benchmarks for mlstock-dataset assembly.
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mlstock_dataset::{DatasetAssembler, PipelineConfig, attach_labels, filter::filter_stock_coverage};
use mlstock_primitives::TradeDate;
use polars::prelude::*;
use rand::Rng;

const FEATURES: [&str; 4] = ["mom_4w", "mom_12w", "vol_12w", "turnover_4w"];

/// `n_weeks` weekly dates ending on 2021-12-31, oldest first.
fn week_dates(n_weeks: usize) -> Vec<String> {
    let last = TradeDate::from_ymd(2021, 12, 31).unwrap_or_default();
    (0..n_weeks as u32).rev().map(|w| last.weeks_before(w).to_compact()).collect()
}

/// Panel of `n_stocks` by `n_weeks` with a few missing and extreme values.
fn random_panel(n_stocks: usize, n_weeks: usize) -> (DataFrame, DataFrame) {
    let mut rng = rand::thread_rng();
    let dates = week_dates(n_weeks);

    let mut codes = Vec::with_capacity(n_stocks * n_weeks);
    let mut trade_dates = Vec::with_capacity(n_stocks * n_weeks);
    let mut pct = Vec::with_capacity(n_stocks * n_weeks);
    for s in 0..n_stocks {
        for d in &dates {
            codes.push(format!("{s:06}.SZ"));
            trade_dates.push(d.clone());
            pct.push(rng.r#gen::<f64>() * 10.0 - 5.0);
        }
    }

    let mut columns = vec![
        Column::new("ts_code".into(), codes),
        Column::new("trade_date".into(), trade_dates),
        Column::new("pct_chg".into(), pct),
    ];
    for name in FEATURES {
        let values: Vec<Option<f64>> = (0..n_stocks * n_weeks)
            .map(|i| match i % 53 {
                0 => None,
                1 => Some(rng.r#gen::<f64>() * 1e4),
                _ => Some(rng.r#gen::<f64>()),
            })
            .collect();
        columns.push(Column::new(name.into(), values));
    }

    let index_pct: Vec<f64> = dates.iter().map(|_| rng.r#gen::<f64>() * 4.0 - 2.0).collect();
    let weekly = DataFrame::new(columns).unwrap_or_default();
    let benchmark = DataFrame::new(vec![
        Column::new("trade_date".into(), dates),
        Column::new("pct_chg".into(), index_pct),
    ])
    .unwrap_or_default();
    (weekly, benchmark)
}

fn config() -> PipelineConfig {
    PipelineConfig::new(
        TradeDate::from_ymd(2019, 1, 1).unwrap_or_default(),
        TradeDate::from_ymd(2022, 1, 1).unwrap_or_default(),
        FEATURES.iter().map(|s| s.to_string()).collect(),
    )
}

fn bench_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble");
    group.sample_size(20);

    for (n_stocks, n_weeks) in [(100, 52), (500, 104), (2000, 104)] {
        let (weekly, benchmark) = random_panel(n_stocks, n_weeks);
        let assembler = DatasetAssembler::new(config()).ok();

        group.throughput(Throughput::Elements((n_stocks * n_weeks) as u64));
        group.bench_with_input(
            BenchmarkId::new("panel", format!("{n_stocks}x{n_weeks}")),
            &(weekly, benchmark),
            |b, (weekly, benchmark)| {
                b.iter(|| {
                    assembler
                        .as_ref()
                        .map(|a| a.assemble(black_box(weekly.clone()), black_box(benchmark.clone())))
                });
            },
        );
    }

    group.finish();
}

fn bench_labels(c: &mut Criterion) {
    let mut group = c.benchmark_group("attach_labels");

    for n_stocks in [100, 1000] {
        let (weekly, benchmark) = random_panel(n_stocks, 104);
        group.throughput(Throughput::Elements(weekly.height() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n_stocks), &n_stocks, |b, _| {
            b.iter(|| attach_labels(black_box(weekly.clone()), benchmark.clone(), 1));
        });
    }

    group.finish();
}

fn bench_stock_coverage(c: &mut Criterion) {
    let mut group = c.benchmark_group("stock_coverage");
    let features: Vec<String> = FEATURES.iter().map(|s| s.to_string()).collect();

    for n_stocks in [100, 1000] {
        let (weekly, _) = random_panel(n_stocks, 104);
        group.throughput(Throughput::Elements(weekly.height() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n_stocks), &n_stocks, |b, _| {
            b.iter(|| filter_stock_coverage(black_box(weekly.clone()), &features, 0.8));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_assemble, bench_labels, bench_stock_coverage);
criterion_main!(benches);
