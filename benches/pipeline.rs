// SPDX-License-Identifier: Apache-2.0 OR MIT
// Throughput of the async post path with a discarding sink: what the
// producer pays per record, not what the sink costs.

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use logrelay::sinks::Sink;
use logrelay::{
    AsyncLogger, Formatter, Level, LoggerHandle, OverflowPolicy, Record, ThreadPool,
};
use std::sync::Arc;

struct NullSink;

impl Sink for NullSink {
    fn log(&self, _record: &Record) -> logrelay::Result<()> {
        Ok(())
    }

    fn flush(&self) -> logrelay::Result<()> {
        Ok(())
    }

    fn level(&self) -> Level {
        Level::Trace
    }

    fn set_level(&self, _level: Level) {}

    fn set_formatter(&self, _formatter: Box<dyn Formatter>) {}
}

fn bench_post(c: &mut Criterion) {
    let mut group = c.benchmark_group("post");
    group.throughput(Throughput::Elements(1));

    group.bench_function("blocking", |b| {
        let pool = Arc::new(ThreadPool::new(8192, 1).unwrap());
        let logger = AsyncLogger::with_sink(
            "bench",
            Arc::new(NullSink),
            Arc::downgrade(&pool),
            OverflowPolicy::Block,
        );
        b.iter(|| logger.log(Level::Info, "benchmark payload").unwrap());
    });

    group.bench_function("overwrite", |b| {
        let pool = Arc::new(ThreadPool::new(8192, 1).unwrap());
        let logger = AsyncLogger::with_sink(
            "bench",
            Arc::new(NullSink),
            Arc::downgrade(&pool),
            OverflowPolicy::OverwriteOldest,
        );
        b.iter(|| logger.log(Level::Info, "benchmark payload").unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_post);
criterion_main!(benches);
