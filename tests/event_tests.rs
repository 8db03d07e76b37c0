//! Event multiplexer tests
//!
//! Tests for:
//! - Native source connected iff at least one listener is registered
//! - Count-based registration (add twice, remove once)
//! - Translation and suppression of native values
//! - Ordered fan-out and direct emit
//! - Custom connectors (one event over several native sources)

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use moteur::events::{Event, NativeSignal, Subscription, listener};
use parking_lot::Mutex;

// ============================================================================
// Helper
// ============================================================================

fn counter() -> (Arc<AtomicUsize>, impl Fn(&u32) + Send + Sync + 'static) {
    let hits = Arc::new(AtomicUsize::new(0));
    let h = hits.clone();
    (hits, move |_: &u32| {
        h.fetch_add(1, Ordering::SeqCst);
    })
}

// ============================================================================
// Lazy Subscription
// ============================================================================

#[test]
fn native_source_is_untouched_until_first_listener() {
    let signal = NativeSignal::<u32>::new();
    let event = Event::from_signal("lazy", &signal, |v: &u32| Some(*v));
    assert!(!event.is_connected());
    assert_eq!(signal.handler_count(), 0);

    let l = event.subscribe(|_| {});
    assert!(event.is_connected());
    assert_eq!(signal.handler_count(), 1);

    assert!(event.remove(&l));
    assert!(!event.is_connected());
    assert_eq!(signal.handler_count(), 0);
}

#[test]
fn many_listeners_share_one_native_connection() {
    let signal = NativeSignal::<u32>::new();
    let event = Event::from_signal("shared", &signal, |v: &u32| Some(*v));

    let listeners: Vec<_> = (0..5).map(|_| event.subscribe(|_| {})).collect();
    assert_eq!(signal.handler_count(), 1);
    assert_eq!(event.listener_count(), 5);

    for (i, l) in listeners.iter().enumerate() {
        assert!(event.remove(l));
        let remaining = listeners.len() - i - 1;
        assert_eq!(event.is_connected(), remaining > 0);
        assert_eq!(signal.handler_count(), usize::from(remaining > 0));
    }
}

#[test]
fn add_twice_remove_once_stays_connected() {
    let signal = NativeSignal::<u32>::new();
    let event = Event::from_signal("twice", &signal, |v: &u32| Some(*v));
    let (hits, f) = counter();
    let l = listener(f);

    event.add(l.clone());
    event.add(l.clone());
    assert_eq!(event.listener_count(), 2);
    assert_eq!(signal.handler_count(), 1);

    signal.emit(&1);
    assert_eq!(hits.load(Ordering::SeqCst), 2);

    assert!(event.remove(&l));
    assert!(event.is_connected());
    signal.emit(&2);
    assert_eq!(hits.load(Ordering::SeqCst), 3);

    assert!(event.remove(&l));
    assert!(!event.is_connected());
    assert!(!event.remove(&l));
}

#[test]
fn removing_unknown_listener_is_rejected() {
    let signal = NativeSignal::<u32>::new();
    let event = Event::from_signal("unknown", &signal, |v: &u32| Some(*v));
    let kept = event.subscribe(|_| {});
    let stranger = listener(|_: &u32| {});

    assert!(!event.remove(&stranger));
    assert!(event.is_connected());
    assert!(event.remove(&kept));
}

#[test]
fn reconnects_after_full_release() {
    let connects = Arc::new(AtomicUsize::new(0));
    let disconnects = Arc::new(AtomicUsize::new(0));
    let event: Event<u32> = {
        let connects = connects.clone();
        let disconnects = disconnects.clone();
        Event::new("cycle", move |_fanout| {
            connects.fetch_add(1, Ordering::SeqCst);
            let disconnects = disconnects.clone();
            Subscription::new(move || {
                disconnects.fetch_add(1, Ordering::SeqCst);
            })
        })
    };

    for round in 1..=3 {
        let a = event.subscribe(|_| {});
        let b = event.subscribe(|_| {});
        event.remove(&a);
        event.remove(&b);
        assert_eq!(connects.load(Ordering::SeqCst), round);
        assert_eq!(disconnects.load(Ordering::SeqCst), round);
    }
}

// ============================================================================
// Delivery
// ============================================================================

#[test]
fn translate_none_suppresses_event() {
    let signal = NativeSignal::<u32>::new();
    let event = Event::from_signal("even", &signal, |v: &u32| (v % 2 == 0).then_some(*v));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = seen.clone();
    let _l = event.subscribe(move |v| s.lock().push(*v));

    for v in 0..6 {
        signal.emit(&v);
    }
    assert_eq!(*seen.lock(), vec![0, 2, 4]);
}

#[test]
fn listeners_fire_in_registration_order() {
    let signal = NativeSignal::<u32>::new();
    let event = Event::from_signal("order", &signal, |v: &u32| Some(*v));
    let order = Arc::new(Mutex::new(Vec::new()));
    for tag in ["a", "b", "c"] {
        let order = order.clone();
        event.subscribe(move |_| order.lock().push(tag));
    }

    signal.emit(&0);
    assert_eq!(*order.lock(), vec!["a", "b", "c"]);
}

#[test]
fn direct_emit_reaches_listeners_of_inert_event() {
    let event = Event::<u32>::inert("inert");
    let (hits, f) = counter();
    event.subscribe(f);
    assert!(event.is_connected());

    event.emit(&7);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn custom_connector_merges_two_sources() {
    let left = NativeSignal::<u32>::new();
    let right = NativeSignal::<u32>::new();
    let event: Event<u32> = {
        let left = left.clone();
        let right = right.clone();
        Event::new("merged", move |fanout| {
            let l = {
                let fanout = fanout.clone();
                left.connect(move |v| fanout.emit(v))
            };
            let r = right.connect(move |v| fanout.emit(&(v + 100)));
            Subscription::new(move || {
                drop(l);
                drop(r);
            })
        })
    };

    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = seen.clone();
    let l = event.subscribe(move |v| s.lock().push(*v));
    left.emit(&1);
    right.emit(&2);
    assert_eq!(*seen.lock(), vec![1, 102]);

    event.remove(&l);
    assert_eq!(left.handler_count(), 0);
    assert_eq!(right.handler_count(), 0);
}
