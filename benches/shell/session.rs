use criterion::{Criterion, Throughput};
use evshell::{
    Command, CommandFlags, Config, Context, Events, InputConsumer, InputQueue, Shell, Terminal,
};
use std::hint::black_box;

struct Sink {
    written: usize,
}

impl Terminal for Sink {
    type Error = ();

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.written += buf.len();
        Ok(buf.len())
    }
}

fn noop(ctx: &mut dyn Context, _args: &[&str]) {
    ctx.finish();
}

fn reader(_ctx: &mut dyn Context, _args: &[&str]) {}

fn reader_event(ctx: &mut dyn Context, events: Events) {
    let consumed = ctx.redirect_input().map_or(0, |input| input.len());
    black_box(consumed);
    if events.contains(Events::INTERRUPT) {
        ctx.finish();
    }
}

static COMMANDS: [Command; 2] = [
    Command::new("noop", "Do nothing.", "noop [args]", noop),
    Command::new("reader", "Consume raw input.", "reader", reader)
        .with_flags(CommandFlags::REDIRECT_INPUT)
        .with_event_handler(reader_event),
];

fn session<'a>(input: InputConsumer<'a, 256>) -> Shell<'a, Sink> {
    let config = Config::new("bench").unwrap().with_welcome("");
    let mut shell = Shell::new(config, Sink { written: 0 }, input).unwrap();
    shell.register(&COMMANDS).unwrap();
    shell.run_until_idle();
    shell
}

pub fn bench_type_and_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_line");
    let line = b"noop \"quoted arg\" plain\\ escaped third\r";
    group.throughput(Throughput::Bytes(line.len() as u64));

    let mut queue: InputQueue<256> = InputQueue::new();
    let (mut keys, input) = queue.split();
    let mut shell = session(input);
    group.bench_function("type_and_dispatch", |b| {
        b.iter(|| {
            keys.feed(black_box(line));
            shell.run_until_idle();
        });
    });
    group.finish();
}

pub fn bench_redirect(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_redirect");
    let payload = [b'x'; 200];
    group.throughput(Throughput::Bytes(payload.len() as u64));

    let mut queue: InputQueue<256> = InputQueue::new();
    let (mut keys, input) = queue.split();
    let mut shell = session(input);
    keys.feed(b"reader\r");
    shell.run_until_idle();
    group.bench_function("forward", |b| {
        b.iter(|| {
            keys.feed(black_box(&payload));
            shell.run_until_idle();
        });
    });
    group.finish();
}
