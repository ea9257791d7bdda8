//! Performance benchmarks for fingerprinting and delay estimation

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use clipsync::{estimate_delay, fingerprint_samples, AlignmentConfig, SampleBuffer};

fn synthetic_audio(seconds: usize, seed: u32) -> Vec<i16> {
    let mut state = seed.max(1);
    (0..44100 * seconds)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            ((state >> 16) as i32 - 32768) as i16 / 4
        })
        .collect()
}

fn bench_fingerprint(c: &mut Criterion) {
    let samples = synthetic_audio(60, 17);
    let config = AlignmentConfig::default();

    c.bench_function("fingerprint_60s", |b| {
        b.iter(|| {
            let _ = fingerprint_samples(black_box(&samples), black_box(&config));
        });
    });
}

fn bench_estimate_delay(c: &mut Criterion) {
    let reference = synthetic_audio(60, 17);
    let mut subject = synthetic_audio(2, 23);
    subject.extend_from_slice(&reference);

    let reference = SampleBuffer::new(reference, 44100);
    let subject = SampleBuffer::new(subject, 44100);
    let config = AlignmentConfig::default();

    c.bench_function("estimate_delay_60s", |b| {
        b.iter(|| {
            let _ = estimate_delay(black_box(&subject), black_box(&reference), black_box(&config));
        });
    });
}

criterion_group!(benches, bench_fingerprint, bench_estimate_delay);
criterion_main!(benches);
