use std::sync::Arc;

use super::{Event, EventEmitter, EventKind, Key, KeyName};

#[test]
fn test_listeners_run_in_registration_order() {
    let emitter: EventEmitter<Vec<&'static str>> = EventEmitter::new();
    emitter.on(EventKind::Submit, |log, _| log.push("first"));
    emitter.on(EventKind::Submit, |log, _| log.push("second"));
    emitter.on(EventKind::Cancel, |log, _| log.push("cancel"));

    let mut log = Vec::new();
    emitter.emit(&mut log, &Event::Submit);

    assert_eq!(log, vec!["first", "second"]);
}

#[test]
fn test_once_listener_fires_a_single_time() {
    let emitter: EventEmitter<u32> = EventEmitter::new();
    emitter.once(EventKind::Finalize, |count, _| *count += 1);
    emitter.on(EventKind::Finalize, |count, _| *count += 10);

    let mut count = 0;
    emitter.emit(&mut count, &Event::Finalize);
    emitter.emit(&mut count, &Event::Finalize);

    assert_eq!(count, 21);
    assert_eq!(emitter.listener_count(EventKind::Finalize), 1);
}

#[test]
fn test_off_removes_by_handle() {
    let emitter: EventEmitter<u32> = EventEmitter::new();
    let first = emitter.on(EventKind::Cursor, |count, _| *count += 1);
    emitter.on(EventKind::Cursor, |count, _| *count += 100);

    assert!(emitter.off(first));
    assert!(!emitter.off(first));

    let mut count = 0;
    emitter.emit(&mut count, &Event::Cursor(3));
    assert_eq!(count, 100);
}

#[test]
fn test_identical_closures_are_distinct_listeners() {
    let emitter: EventEmitter<u32> = EventEmitter::new();
    let bump = |count: &mut u32, _: &Event<'_>| *count += 1;
    let a = emitter.once(EventKind::Submit, bump);
    let b = emitter.once(EventKind::Submit, bump);
    assert_ne!(a, b);

    emitter.off(a);
    let mut count = 0;
    emitter.emit(&mut count, &Event::Submit);
    assert_eq!(count, 1);
}

#[test]
fn test_listeners_receive_payload() {
    let emitter: EventEmitter<Vec<KeyName>> = EventEmitter::new();
    emitter.on(EventKind::Key, |seen, event| {
        if let Event::Key(key) = event {
            seen.push(key.name);
        }
    });

    let mut seen = Vec::new();
    emitter.emit(&mut seen, &Event::Key(&Key::new(KeyName::Up)));
    assert_eq!(seen, vec![KeyName::Up]);
}

#[test]
fn test_registration_from_other_threads() {
    let emitter: Arc<EventEmitter<u32>> = Arc::new(EventEmitter::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let emitter = Arc::clone(&emitter);
            std::thread::spawn(move || {
                emitter.on(EventKind::Submit, |count, _| *count += 1);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap_or_default();
    }

    let mut count = 0;
    emitter.emit(&mut count, &Event::Submit);
    assert_eq!(count, 4);
}
