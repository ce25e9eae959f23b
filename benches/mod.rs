use criterion::{criterion_group, criterion_main};

mod shell;

criterion_group!(
    benches,
    shell::escape::bench_decode_plain,
    shell::escape::bench_decode_sequences,
    shell::session::bench_type_and_dispatch,
    shell::session::bench_redirect
);
criterion_main!(benches);
