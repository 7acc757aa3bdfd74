// SPDX-License-Identifier: Apache-2.0 OR MIT
//! End-to-end tests for the asynchronous delivery pipeline: ordering,
//! overflow policies, flush, lifetime and shutdown behavior.

use anyhow::Result;
use logrelay::sinks::Sink;
use logrelay::{
    AsyncLogger, Error, Formatter, Level, LoggerHandle, OverflowPolicy, Record, ThreadPool,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::{Duration, Instant};

/// Sink that records payloads in memory, optionally sleeping per record
/// to simulate a slow destination
struct RecordingSink {
    payloads: Mutex<Vec<String>>,
    flushes: AtomicUsize,
    delay: Duration,
}

impl RecordingSink {
    fn new() -> Arc<Self> {
        Self::with_delay(Duration::ZERO)
    }

    fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            payloads: Mutex::new(Vec::new()),
            flushes: AtomicUsize::new(0),
            delay,
        })
    }

    fn payloads(&self) -> Vec<String> {
        self.payloads.lock().unwrap().clone()
    }

    fn flushes(&self) -> usize {
        self.flushes.load(Ordering::Relaxed)
    }
}

impl Sink for RecordingSink {
    fn log(&self, record: &Record) -> logrelay::Result<()> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        self.payloads
            .lock()
            .unwrap()
            .push(record.payload.to_string());
        Ok(())
    }

    fn flush(&self) -> logrelay::Result<()> {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn level(&self) -> Level {
        Level::Trace
    }

    fn set_level(&self, _level: Level) {}

    fn set_formatter(&self, _formatter: Box<dyn Formatter>) {}
}

fn async_logger_with(
    name: &str,
    sink: Arc<RecordingSink>,
    pool: &Arc<ThreadPool>,
    policy: OverflowPolicy,
) -> Arc<AsyncLogger> {
    AsyncLogger::with_sink(name, sink, Arc::downgrade(pool), policy)
}

#[test]
fn test_single_worker_preserves_order() -> Result<()> {
    let pool = Arc::new(ThreadPool::new(16, 1)?);
    let sink = RecordingSink::new();
    let logger = async_logger_with("ordered", sink.clone(), &pool, OverflowPolicy::Block);

    for payload in ["a", "b", "c", "d"] {
        logger.info(payload)?;
    }

    drop(logger);
    drop(pool);

    assert_eq!(sink.payloads(), vec!["a", "b", "c", "d"]);
    Ok(())
}

#[test]
fn test_single_worker_overrun_counter_stays_zero() -> Result<()> {
    let pool = Arc::new(ThreadPool::new(16, 1)?);
    let sink = RecordingSink::new();
    let logger = async_logger_with("quiet", sink.clone(), &pool, OverflowPolicy::Block);

    for i in 0..10 {
        logger.info(&format!("m{}", i))?;
    }
    assert_eq!(pool.overrun_counter(), 0);

    drop(logger);
    drop(pool);
    assert_eq!(sink.payloads().len(), 10);
    Ok(())
}

#[test]
fn test_overwrite_policy_under_pressure() -> Result<()> {
    let pool = Arc::new(ThreadPool::new(4, 1)?);
    let sink = RecordingSink::with_delay(Duration::from_millis(50));
    let logger = async_logger_with(
        "pressure",
        sink.clone(),
        &pool,
        OverflowPolicy::OverwriteOldest,
    );

    let start = Instant::now();
    for i in 0..100 {
        logger.info(&format!("m{}", i))?;
    }
    // The producer must never have waited on the slow sink
    assert!(start.elapsed() < Duration::from_millis(500));

    let overrun = pool.overrun_counter();
    drop(logger);
    drop(pool);

    // At most one record was in flight when the burst started, so nearly
    // the whole burst beyond the queue capacity was overwritten
    assert!(overrun >= 95, "overrun_counter = {}", overrun);

    let received = sink.payloads();
    assert!(received.len() >= 4, "received {}", received.len());
    assert!(received.len() <= 100);

    // Every payload is one of ours, and the survivors arrive in emission
    // order (a strictly increasing subsequence of m0..m99)
    let mut previous = None;
    for payload in &received {
        let index: usize = payload
            .strip_prefix('m')
            .and_then(|digits| digits.parse().ok())
            .unwrap_or_else(|| panic!("unexpected payload {:?}", payload));
        if let Some(previous) = previous {
            assert!(index > previous, "out of order: m{} after m{}", index, previous);
        }
        previous = Some(index);
    }
    Ok(())
}

#[test]
fn test_block_policy_under_pressure() -> Result<()> {
    let pool = Arc::new(ThreadPool::new(4, 1)?);
    let sink = RecordingSink::with_delay(Duration::from_millis(50));
    let logger = async_logger_with("blocking", sink.clone(), &pool, OverflowPolicy::Block);

    let start = Instant::now();
    for i in 0..20 {
        logger.info(&format!("m{}", i))?;
    }
    let producer_time = start.elapsed();

    // With 20 records, a 4-slot queue and one in flight, the producer must
    // have waited for at least 14 sink deliveries at 50 ms each
    assert!(
        producer_time >= Duration::from_millis(700),
        "producer finished too fast: {:?}",
        producer_time
    );
    assert_eq!(pool.overrun_counter(), 0);

    drop(logger);
    drop(pool);

    let expected: Vec<String> = (0..20).map(|i| format!("m{}", i)).collect();
    assert_eq!(sink.payloads(), expected);
    Ok(())
}

#[test]
fn test_shutdown_drains_posted_records() -> Result<()> {
    let pool = Arc::new(ThreadPool::new(1024, 2)?);
    let sink = RecordingSink::new();
    let logger = async_logger_with("drain", sink.clone(), &pool, OverflowPolicy::Block);

    for i in 0..10_000 {
        logger.info(&format!("m{}", i))?;
    }

    drop(logger);
    drop(pool);

    assert_eq!(sink.payloads().len(), 10_000);
    Ok(())
}

#[test]
fn test_flush_is_enqueued_twice_and_drains() -> Result<()> {
    let pool = Arc::new(ThreadPool::new(64, 1)?);
    let sink = RecordingSink::new();
    let logger = async_logger_with("flusher", sink.clone(), &pool, OverflowPolicy::Block);

    logger.info("before")?;
    logger.flush()?;
    logger.flush()?;

    drop(logger);
    drop(pool);

    assert_eq!(sink.payloads(), vec!["before"]);
    assert!(sink.flushes() >= 2, "flushes = {}", sink.flushes());
    Ok(())
}

#[test]
fn test_flush_on_severity_threshold() -> Result<()> {
    let pool = Arc::new(ThreadPool::new(64, 1)?);
    let sink = RecordingSink::new();
    let logger = async_logger_with("autoflush", sink.clone(), &pool, OverflowPolicy::Block);
    logger.flush_on(Level::Error);

    logger.info("calm")?;
    logger.error("alarm")?;

    drop(logger);
    drop(pool);

    assert_eq!(sink.payloads(), vec!["calm", "alarm"]);
    assert!(sink.flushes() >= 1);
    Ok(())
}

#[test]
fn test_queued_envelopes_keep_logger_alive() -> Result<()> {
    let pool = Arc::new(ThreadPool::new(64, 1)?);
    let sink = RecordingSink::with_delay(Duration::from_millis(100));
    let logger = async_logger_with("survivor", sink.clone(), &pool, OverflowPolicy::Block);
    let observer: Weak<AsyncLogger> = Arc::downgrade(&logger);

    for i in 0..5 {
        logger.info(&format!("m{}", i))?;
    }
    drop(logger);

    // The registry handle is gone, but queued envelopes still own the
    // logger
    assert!(pool.queue_len() > 0);
    assert!(observer.upgrade().is_some());

    drop(pool);

    // Drained: the last strong handle died with the final envelope
    assert!(observer.upgrade().is_none());
    assert_eq!(sink.payloads().len(), 5);
    Ok(())
}

#[test]
fn test_log_after_pool_destruction_fails() -> Result<()> {
    let pool = Arc::new(ThreadPool::new(8, 1)?);
    let sink = RecordingSink::new();
    let logger = async_logger_with("stranded", sink, &pool, OverflowPolicy::Block);

    drop(pool);

    assert!(matches!(logger.info("nobody home"), Err(Error::PoolGone)));
    assert!(matches!(logger.flush(), Err(Error::PoolGone)));
    Ok(())
}

#[test]
fn test_worker_count_validation() {
    assert!(matches!(ThreadPool::new(16, 0), Err(Error::Config(_))));
    assert!(matches!(ThreadPool::new(16, 1001), Err(Error::Config(_))));
    assert!(ThreadPool::new(16, 1000).is_ok());
}

#[test]
fn test_multi_worker_delivers_everything() -> Result<()> {
    let pool = Arc::new(ThreadPool::new(256, 4)?);
    let sink = RecordingSink::new();
    let logger = async_logger_with("fanout", sink.clone(), &pool, OverflowPolicy::Block);

    let producers: Vec<_> = (0..4)
        .map(|p| {
            let logger = Arc::clone(&logger);
            std::thread::spawn(move || {
                for i in 0..500 {
                    logger.info(&format!("p{}m{}", p, i)).unwrap();
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }

    drop(logger);
    drop(pool);

    // Ordering across workers is unspecified; nothing may be lost
    assert_eq!(sink.payloads().len(), 2000);
    assert_eq!(
        sink.payloads().iter().filter(|p| p.starts_with("p3")).count(),
        500
    );
    Ok(())
}

#[test]
fn test_multiple_loggers_share_one_pool() -> Result<()> {
    let pool = Arc::new(ThreadPool::new(128, 1)?);
    let first_sink = RecordingSink::new();
    let second_sink = RecordingSink::new();
    let first = async_logger_with("first", first_sink.clone(), &pool, OverflowPolicy::Block);
    let second = async_logger_with("second", second_sink.clone(), &pool, OverflowPolicy::Block);

    first.info("one")?;
    second.info("two")?;
    first.info("three")?;

    drop(first);
    drop(second);
    drop(pool);

    assert_eq!(first_sink.payloads(), vec!["one", "three"]);
    assert_eq!(second_sink.payloads(), vec!["two"]);
    Ok(())
}

#[test]
fn test_async_level_filter_applies_before_enqueue() -> Result<()> {
    let pool = Arc::new(ThreadPool::new(64, 1)?);
    let sink = RecordingSink::new();
    let logger = async_logger_with("filtered", sink.clone(), &pool, OverflowPolicy::Block);
    logger.set_level(Level::Warn);

    logger.debug("dropped")?;
    logger.warn("kept")?;

    drop(logger);
    drop(pool);

    assert_eq!(sink.payloads(), vec!["kept"]);
    Ok(())
}
