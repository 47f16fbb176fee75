//! Benchmarks for message encoding, decoding, and stream reassembly.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use camtrig_core::protocol::messages::{
    Message, MotionStatusMessage, MotionTriggerMessage, SetUint16RequestMessage,
};
use camtrig_core::{decode_message, encode_message, Calendar, StreamDecoder};

fn make_motion_status() -> Message {
    Message::MotionStatus(MotionStatusMessage {
        timestamp: Calendar {
            seconds: 30,
            minutes: 45,
            hours: 12,
            day_of_week: 2,
            day_of_month: 9,
            month: 7,
            year: 2024,
        },
        lux: 71.3,
        lux_low_threshold: 10.0,
        lux_high_threshold: 80.0,
        temperature: 23.5,
        motion: 2053,
        motion_threshold: 1024,
        cooldown: 30.0,
        log_entries: 10,
    })
}

fn make_mixed_stream(repeats: usize) -> Vec<u8> {
    let batch = [
        make_motion_status(),
        Message::MotionTrigger(MotionTriggerMessage {
            motion: 1500,
            lux: 42.0,
        }),
        Message::SetUint16Request(SetUint16RequestMessage {
            id: 12,
            persist: false,
            value: 512,
        }),
        Message::LogReset,
    ];

    let mut stream = Vec::new();
    for _ in 0..repeats {
        for msg in &batch {
            stream.extend_from_slice(&encode_message(msg));
        }
    }
    stream
}

fn benchmark_encode(c: &mut Criterion) {
    let msg = make_motion_status();

    c.bench_function("encode_motion_status", |b| {
        b.iter(|| encode_message(black_box(&msg)))
    });
}

fn benchmark_decode(c: &mut Criterion) {
    let bytes = encode_message(&make_motion_status());

    c.bench_function("decode_motion_status", |b| {
        b.iter(|| decode_message(black_box(&bytes)).unwrap())
    });
}

fn benchmark_stream_reassembly(c: &mut Criterion) {
    let stream = make_mixed_stream(64);

    let mut group = c.benchmark_group("stream_reassembly");
    group.throughput(criterion::Throughput::Bytes(stream.len() as u64));
    group.bench_function("chunked_20_bytes", |b| {
        b.iter(|| {
            let mut decoder = StreamDecoder::new();
            let mut decoded = 0usize;
            for chunk in stream.chunks(20) {
                decoder.feed(black_box(chunk));
                while let Some(msg) = decoder.try_decode().unwrap() {
                    black_box(msg);
                    decoded += 1;
                }
            }
            decoded
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_encode,
    benchmark_decode,
    benchmark_stream_reassembly
);
criterion_main!(benches);
