use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use stockfit::{
    analysis, forecast, synthetic::SeriesGenerator, AnalysisConfig, LinearFit, Observation,
    QuadraticFit, SeriesExt,
};
use std::hint::black_box;

fn gen_sample_data(days: usize) -> Vec<Observation> {
    let start = NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid date");
    SeriesGenerator::new(Some(7))
        .generate_from("BENCH", start, days)
        .expect("Failed to generate series")
}

fn criterion_benchmark(c: &mut Criterion) {
    //
    // How the closed-form solvers scale with series length
    println!("Benchmarking fit vs n...");
    let mut group = c.benchmark_group("fit_vs_n");
    for n in [100, 1_000, 10_000, 100_000] {
        let series = gen_sample_data(n);
        let (xs, ys) = (series.indices(), series.prices());

        group.bench_with_input(BenchmarkId::new("linear", n), &(&xs, &ys), |b, (xs, ys)| {
            b.iter(|| LinearFit::fit(black_box(xs), black_box(ys)));
        });
        group.bench_with_input(BenchmarkId::new("quadratic", n), &(&xs, &ys), |b, (xs, ys)| {
            b.iter(|| QuadraticFit::fit(black_box(xs), black_box(ys)));
        });
    }
    group.finish();

    //
    // Forecast cost is dominated by the residual pass over the history
    println!("Benchmarking forecast vs horizon (n=1000)...");
    let series = gen_sample_data(1_000);
    let fit = QuadraticFit::fit(&series.indices(), &series.prices()).expect("Failed to fit data");
    let mut group = c.benchmark_group("forecast_vs_horizon");
    for horizon in [7, 30, 365] {
        group.bench_with_input(BenchmarkId::from_parameter(horizon), &horizon, |b, &h| {
            b.iter(|| forecast::generate_predictions(black_box(&series), &fit, h));
        });
    }
    group.finish();

    //
    // Whole pass: two fits, metrics, baseline and forecast
    println!("Benchmarking full analysis (n=180)...");
    let series = gen_sample_data(180);
    let config = AnalysisConfig::default();
    c.bench_function("analyze_180", |b| {
        b.iter(|| analysis::analyze("BENCH", black_box(&series), &config));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
