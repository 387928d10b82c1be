use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use strong_core::{
    CountingEntropy, FixedEntropy, Source64, StrongRand, StrongSource, chacha_from_source,
    new_source,
};

const THREADS: usize = 16;
const DRAWS_PER_THREAD: usize = 2_000;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn sources_are_thread_safe_types() {
    assert_send_sync::<StrongSource>();
    assert_send_sync::<StrongSource<FixedEntropy>>();
    assert_send_sync::<StrongSource<Arc<CountingEntropy<FixedEntropy>>>>();
}

#[test]
fn concurrent_callers_see_uncorrupted_decoding() {
    let pattern = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88];
    let expected = u64::from_le_bytes(pattern);
    let entropy = Arc::new(CountingEntropy::new(FixedEntropy::new(pattern)));
    let source = StrongSource::with_entropy(Arc::clone(&entropy));

    thread::scope(|scope| {
        for worker in 0..THREADS {
            let source = &source;
            scope.spawn(move || {
                for i in 0..DRAWS_PER_THREAD {
                    if (worker + i) % 2 == 0 {
                        assert_eq!(source.uint64(), expected);
                    } else {
                        assert_eq!(source.int63(), (expected & strong_core::INT63_MASK) as i64);
                    }
                }
            });
        }
    });

    let total = (THREADS * DRAWS_PER_THREAD) as u64;
    assert_eq!(entropy.reads(), total);
    assert_eq!(entropy.bytes_delivered(), total * 8);
}

#[test]
fn shared_os_source_feeds_per_thread_generators() {
    let source = Arc::new(new_source());

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let source = Arc::clone(&source);
            thread::spawn(move || {
                let mut rng = StrongRand::new(&*source);
                (0..64).map(|_| rng.uint64()).collect::<Vec<_>>()
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        for value in handle.join().expect("worker panicked") {
            seen.insert(value);
        }
    }
    // 1024 uniform 64-bit values practically never collide.
    assert_eq!(seen.len(), THREADS * 64);
}

#[test]
fn chacha_streams_are_independent_per_thread() {
    let source = new_source();
    let firsts: Vec<u64> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let mut rng = chacha_from_source(&source);
                    rand_core::RngCore::next_u64(&mut rng)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("worker panicked"))
            .collect()
    });
    let distinct: HashSet<_> = firsts.iter().collect();
    assert_eq!(distinct.len(), firsts.len());
}

#[test]
fn trait_objects_cross_threads() {
    let source: Arc<dyn Source64 + Send + Sync> = Arc::new(new_source());
    let workers: Vec<_> = (0..4)
        .map(|_| {
            let source = Arc::clone(&source);
            thread::spawn(move || source.int63())
        })
        .collect();
    for worker in workers {
        assert!(worker.join().expect("worker panicked") >= 0);
    }
}
