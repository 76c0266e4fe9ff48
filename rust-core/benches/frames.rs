//! Performance benchmarks for streaming frame extraction

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use spectral_frames::{spectrogram, FrameConfig, SampleStream, WindowType};

fn bench_spectrogram(c: &mut Criterion) {
    // Generate synthetic audio (10 seconds at 44.1kHz)
    let samples: Vec<f64> = (0..44100 * 10)
        .map(|i| (i as f64 * 440.0 * 2.0 * std::f64::consts::PI / 44100.0).sin() * 0.5)
        .collect();
    let stream = SampleStream::new(samples);

    let config = FrameConfig {
        window_len: 2048,
        step: 512,
        window_type: WindowType::Hann,
        max_frames: None,
    };

    c.bench_function("spectrogram_10s_2048_512", |b| {
        b.iter(|| {
            let _ = spectrogram(black_box(stream.clone()), black_box(&config));
        });
    });
}

criterion_group!(benches, bench_spectrogram);
criterion_main!(benches);
