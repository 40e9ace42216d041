//! Threaded properties: teardown synchronization, concurrent publish and
//! subscribe, reentrancy, and move semantics of selector values.

use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use selectbus::select::exact;
use selectbus::Bus;

#[test]
fn teardown_waits_for_inflight_handler() {
    let bus = Bus::new();
    let entered = Arc::new(AtomicBool::new(false));
    let release = Arc::new(AtomicBool::new(false));
    let drop_done = Arc::new(AtomicBool::new(false));

    let handler_entered = entered.clone();
    let handler_release = release.clone();
    let anchor = bus.subscribe(
        move |_: &u32| {
            handler_entered.store(true, Ordering::SeqCst);
            while !handler_release.load(Ordering::SeqCst) {
                thread::yield_now();
            }
        },
        (),
    );

    let publisher = {
        let bus = bus.clone();
        thread::spawn(move || bus.publish((1u32,)))
    };
    while !entered.load(Ordering::SeqCst) {
        thread::yield_now();
    }

    let dropper = {
        let done = drop_done.clone();
        thread::spawn(move || {
            drop(anchor);
            done.store(true, Ordering::SeqCst);
        })
    };

    // The handler is still running, so the drop must be blocked.
    thread::sleep(Duration::from_millis(100));
    assert!(!drop_done.load(Ordering::SeqCst));

    release.store(true, Ordering::SeqCst);
    publisher.join().unwrap();
    dropper.join().unwrap();
    assert!(drop_done.load(Ordering::SeqCst));
}

#[test]
fn removal_completeness_under_concurrent_publish() {
    let bus = Bus::new();
    let torn_down = Arc::new(AtomicBool::new(false));

    let flag = torn_down.clone();
    let anchor = bus.subscribe(
        move |_: &u32| {
            assert!(
                !flag.load(Ordering::SeqCst),
                "handler invoked after teardown returned"
            );
        },
        (),
    );

    let stop = Arc::new(AtomicBool::new(false));
    let publisher = {
        let bus = bus.clone();
        let stop = stop.clone();
        thread::spawn(move || {
            while !stop.load(Ordering::SeqCst) {
                bus.publish((7u32,));
            }
        })
    };

    thread::sleep(Duration::from_millis(20));
    drop(anchor);
    torn_down.store(true, Ordering::SeqCst);

    thread::sleep(Duration::from_millis(20));
    stop.store(true, Ordering::SeqCst);
    publisher.join().unwrap();
}

#[test]
fn concurrent_publish_and_subscribe_hit_exact_matches() {
    let bus = Bus::new();
    let mut workers = Vec::new();

    for thread_id in 0..3u64 {
        let bus = bus.clone();
        workers.push(thread::spawn(move || {
            let mut hits = 0usize;
            for sequence in 0..200u64 {
                let seen = Arc::new(AtomicUsize::new(0));
                let sink = seen.clone();
                let anchor = bus.subscribe(
                    move |_: &u64, _: &u64| {
                        sink.fetch_add(1, Ordering::SeqCst);
                    },
                    (thread_id, sequence),
                );
                bus.publish((thread_id, sequence));
                hits += seen.load(Ordering::SeqCst);
                drop(anchor);
            }
            hits
        }));
    }

    for worker in workers {
        assert_eq!(worker.join().unwrap(), 200);
    }
}

#[test]
fn recursive_publish_same_thread() {
    let bus = Bus::new();
    let log = Arc::new(Mutex::new(Vec::new()));

    let inner_log = log.clone();
    let _strings = bus.subscribe(move |s: &String| inner_log.lock().push(s.clone()), ());

    let outer_bus = bus.clone();
    let outer_log = log.clone();
    let _ints = bus.subscribe(
        move |n: &u32| {
            outer_log.lock().push(format!("int {n}"));
            outer_bus.publish((format!("from {n}"),));
        },
        (42u32,),
    );

    bus.publish((42u32,));
    assert_eq!(
        *log.lock(),
        vec!["int 42".to_string(), "from 42".to_string()]
    );
}

#[test]
fn recursive_publish_reenters_same_anchor() {
    let bus = Bus::new();
    let log = Arc::new(Mutex::new(Vec::new()));

    let sink = log.clone();
    let rebus = bus.clone();
    let _anchor = bus.subscribe(
        move |n: &u32| {
            sink.lock().push(*n);
            if *n > 0 {
                rebus.publish((*n - 1,));
            }
        },
        (),
    );

    bus.publish((3u32,));
    assert_eq!(*log.lock(), vec![3, 2, 1, 0]);
}

#[test]
fn handler_subscribing_new_anchor_sees_it_on_next_publish() {
    let bus = Bus::new();
    let count = Arc::new(AtomicUsize::new(0));
    let stash = Arc::new(Mutex::new(Vec::new()));

    let sub_bus = bus.clone();
    let sub_count = count.clone();
    let sub_stash = stash.clone();
    let _outer = bus.subscribe(
        move |_: &u32| {
            let inner_count = sub_count.clone();
            sub_stash.lock().push(sub_bus.subscribe(
                move |_: &u32| {
                    inner_count.fetch_add(1, Ordering::SeqCst);
                },
                (9u32,),
            ));
        },
        (1u32,),
    );

    bus.publish((1u32,)); // installs one inner subscription
    bus.publish((9u32,));
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

struct CountedKey {
    value: u32,
    clones: Arc<AtomicUsize>,
}

impl Clone for CountedKey {
    fn clone(&self) -> Self {
        self.clones.fetch_add(1, Ordering::SeqCst);
        Self {
            value: self.value,
            clones: self.clones.clone(),
        }
    }
}

impl PartialEq for CountedKey {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for CountedKey {}

impl PartialOrd for CountedKey {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for CountedKey {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        self.value.cmp(&other.value)
    }
}

#[test]
fn selector_values_move_into_subscription() {
    let bus = Bus::new();
    let clones = Arc::new(AtomicUsize::new(0));
    let calls = Arc::new(AtomicUsize::new(0));

    let key = CountedKey {
        value: 42,
        clones: clones.clone(),
    };
    let sink = calls.clone();
    let _anchor = bus.subscribe(
        move |_: &CountedKey| {
            sink.fetch_add(1, Ordering::SeqCst);
        },
        (exact(key),),
    );

    bus.publish((CountedKey {
        value: 42,
        clones: clones.clone(),
    },));
    bus.publish((CountedKey {
        value: 41,
        clones: clones.clone(),
    },));

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(clones.load(Ordering::SeqCst), 0, "selector or event was copied");
}

#[test]
fn terminate_races_with_publishers() {
    let bus = Bus::new();
    let stop = Arc::new(AtomicBool::new(false));

    let mut publishers = Vec::new();
    for _ in 0..2 {
        let bus = bus.clone();
        let stop = stop.clone();
        publishers.push(thread::spawn(move || {
            while !stop.load(Ordering::SeqCst) {
                bus.publish((1u32,));
            }
        }));
    }

    for _ in 0..100 {
        let anchor = bus.subscribe(|_: &u32| {}, (1u32,));
        let term = anchor.terminator();
        let terminator_thread = thread::spawn(move || term.terminate());
        drop(anchor);
        terminator_thread.join().unwrap();
    }

    stop.store(true, Ordering::SeqCst);
    for publisher in publishers {
        publisher.join().unwrap();
    }
}
