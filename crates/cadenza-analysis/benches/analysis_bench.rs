//! Criterion benchmarks for cadenza-analysis components
//!
//! Run with: cargo bench -p cadenza-analysis

use cadenza_analysis::{
    Complex64, QTransformConfig, ResampleQuality, Resampler, SincResampler, StftAnalyzer,
    TuningEstimator, Window, WindowFunction, cqt, estimate_key, fft, ifft, rfft, vqt,
};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::f64::consts::PI;

const SAMPLE_RATE: f64 = 22050.0;

/// Generate a test sine wave
fn generate_sine(size: usize, frequency: f64) -> Vec<f64> {
    (0..size)
        .map(|i| (2.0 * PI * frequency * i as f64 / SAMPLE_RATE).sin())
        .collect()
}

/// A4 with three harmonics
fn generate_complex_signal(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE;
            let f1 = (2.0 * PI * 440.0 * t).sin();
            let f2 = 0.5 * (2.0 * PI * 880.0 * t).sin();
            let f3 = 0.25 * (2.0 * PI * 1320.0 * t).sin();
            (f1 + f2 + f3) * 0.5
        })
        .collect()
}

fn to_complex(signal: &[f64]) -> Vec<Complex64> {
    signal.iter().map(|&v| Complex64::new(v, 0.0)).collect()
}

// ============================================================================
// FFT benchmarks
// ============================================================================

fn bench_fft_radix2(c: &mut Criterion) {
    let mut group = c.benchmark_group("FFT_Radix2");

    for &size in &[256, 1024, 4096, 16384] {
        let input = to_complex(&generate_sine(size, 440.0));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(fft(black_box(&input))))
        });
    }

    group.finish();
}

fn bench_fft_bluestein(c: &mut Criterion) {
    let mut group = c.benchmark_group("FFT_Bluestein");

    for &size in &[100, 441, 1000, 4410] {
        let input = to_complex(&generate_sine(size, 440.0));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(fft(black_box(&input))))
        });
    }

    group.finish();
}

fn bench_fft_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("FFT_Roundtrip");

    for &size in &[256, 1024, 4096] {
        let input = to_complex(&generate_complex_signal(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let spectrum = fft(black_box(&input));
                black_box(ifft(&spectrum))
            })
        });
    }

    group.finish();
}

fn bench_rfft(c: &mut Criterion) {
    let input = generate_complex_signal(2048);
    c.bench_function("RFFT_2048", |b| b.iter(|| black_box(rfft(black_box(&input)))));
}

// ============================================================================
// Window function benchmarks
// ============================================================================

fn bench_window_functions(c: &mut Criterion) {
    let mut group = c.benchmark_group("Window_Coefficients");

    for window in [
        Window::Hann,
        Window::Hamming,
        Window::Blackman,
        Window::BlackmanHarris,
    ] {
        group.bench_function(window.name(), |b| {
            b.iter(|| black_box(window.coefficients(black_box(4096))))
        });
    }

    group.finish();
}

// ============================================================================
// STFT benchmarks
// ============================================================================

fn bench_stft_analyzer(c: &mut Criterion) {
    let mut group = c.benchmark_group("STFT");
    let signal = generate_complex_signal(SAMPLE_RATE as usize);

    for &hop in &[128, 256, 512] {
        let analyzer = match StftAnalyzer::new(2048, hop, &Window::Hann) {
            Ok(analyzer) => analyzer,
            Err(e) => panic!("invalid STFT setup: {e}"),
        };
        group.bench_with_input(BenchmarkId::new("hop", hop), &hop, |b, _| {
            b.iter(|| black_box(analyzer.magnitudes(black_box(&signal))))
        });
    }

    group.finish();
}

// ============================================================================
// Resampling benchmarks
// ============================================================================

fn bench_resample(c: &mut Criterion) {
    let mut group = c.benchmark_group("Resample");
    let signal = generate_complex_signal(SAMPLE_RATE as usize);

    for (name, dst, quality) in [
        ("halve_fast", SAMPLE_RATE / 2.0, ResampleQuality::Fast),
        ("halve_best", SAMPLE_RATE / 2.0, ResampleQuality::Best),
        ("to_48k_fast", 48000.0, ResampleQuality::Fast),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                black_box(SincResampler.resample(
                    black_box(&signal),
                    SAMPLE_RATE,
                    dst,
                    quality,
                    true,
                ))
            })
        });
    }

    group.finish();
}

// ============================================================================
// Q-transform benchmarks
// ============================================================================

fn bench_qtransform(c: &mut Criterion) {
    let mut group = c.benchmark_group("QTransform");
    group.sample_size(20);

    let signal = generate_complex_signal(SAMPLE_RATE as usize);
    let config = QTransformConfig {
        tuning: Some(0.0),
        ..Default::default()
    };

    group.bench_function("cqt_84_bins", |b| {
        b.iter(|| black_box(cqt(black_box(&signal), SAMPLE_RATE, &config)))
    });
    group.bench_function("vqt_84_bins", |b| {
        b.iter(|| black_box(vqt(black_box(&signal), SAMPLE_RATE, &config, 0.0)))
    });

    let estimated = QTransformConfig::default();
    group.bench_function("cqt_with_tuning", |b| {
        b.iter(|| black_box(cqt(black_box(&signal), SAMPLE_RATE, &estimated)))
    });

    group.finish();
}

fn bench_tuning(c: &mut Criterion) {
    let signal = generate_complex_signal(SAMPLE_RATE as usize);
    let estimator = TuningEstimator::default();
    c.bench_function("Tuning_Estimate", |b| {
        b.iter(|| black_box(estimator.estimate(black_box(&signal), SAMPLE_RATE, 0.0)))
    });
}

fn bench_key(c: &mut Criterion) {
    let signal = generate_complex_signal(SAMPLE_RATE as usize);
    let mut group = c.benchmark_group("Key_Estimate");
    group.sample_size(20);
    group.bench_function("estimate_key", |b| {
        b.iter(|| black_box(estimate_key(black_box(&signal), SAMPLE_RATE, 3)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_fft_radix2,
    bench_fft_bluestein,
    bench_fft_roundtrip,
    bench_rfft,
    bench_window_functions,
    bench_stft_analyzer,
    bench_resample,
    bench_qtransform,
    bench_tuning,
    bench_key,
);

criterion_main!(benches);
