use criterion::{Criterion, Throughput};
use evshell::shell::escape::EscapeDecoder;
use std::hint::black_box;

pub fn bench_decode_plain(c: &mut Criterion) {
    let mut group = c.benchmark_group("escape_plain");
    let input = b"ifconfig eth0 192.168.1.20 netmask 255.255.255.0 up\r".repeat(16);
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function("decode", |b| {
        let mut decoder = EscapeDecoder::new();
        b.iter(|| {
            let mut keys = 0usize;
            for &byte in black_box(input.as_slice()) {
                if decoder.feed(byte).is_some() {
                    keys += 1;
                }
            }
            keys
        });
    });
    group.finish();
}

pub fn bench_decode_sequences(c: &mut Criterion) {
    let mut group = c.benchmark_group("escape_sequences");
    let input = b"\x1b[A\x1b[3~\x1b[1;5C\x1b]0;title\x07\x1bOP\x1bP+q\x1b\\x".repeat(16);
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function("decode", |b| {
        let mut decoder = EscapeDecoder::new();
        b.iter(|| {
            let mut keys = 0usize;
            for &byte in black_box(input.as_slice()) {
                if decoder.feed(byte).is_some() {
                    keys += 1;
                }
            }
            keys
        });
    });
    group.finish();
}
