//! Typed publish/subscribe scoped to a single prompt.

use std::sync::{
    Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use super::key::Key;

/// The kinds of events a prompt emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Key,
    Cursor,
    Error,
    Finalize,
    Submit,
    Cancel,
}

/// An emitted event with its payload.
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    /// A key was dispatched to the widget.
    Key(&'a Key),
    /// The cursor index changed.
    Cursor(usize),
    /// Validation rejected the value.
    Error(&'a str),
    /// Fired once, right before the terminal render.
    Finalize,
    Submit,
    Cancel,
}

impl Event<'_> {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Key(_) => EventKind::Key,
            Self::Cursor(_) => EventKind::Cursor,
            Self::Error(_) => EventKind::Error,
            Self::Finalize => EventKind::Finalize,
            Self::Submit => EventKind::Submit,
            Self::Cancel => EventKind::Cancel,
        }
    }
}

/// Identifies a registered listener so it can be removed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

type Callback<T> = Box<dyn FnMut(&mut T, &Event<'_>) + Send>;

struct Listener<T> {
    handle: ListenerHandle,
    kind: EventKind,
    once: bool,
    callback: Callback<T>,
}

/// Ordered listener registry.
///
/// Listeners for a kind run in registration order and receive mutable access
/// to the target passed to [`EventEmitter::emit`].
pub struct EventEmitter<T> {
    listeners: Mutex<Vec<Listener<T>>>,
    next_handle: AtomicU64,
}

impl<T> Default for EventEmitter<T> {
    fn default() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
            next_handle: AtomicU64::new(0),
        }
    }
}

impl<T> EventEmitter<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener that runs on every event of `kind`.
    pub fn on<F>(&self, kind: EventKind, callback: F) -> ListenerHandle
    where
        F: FnMut(&mut T, &Event<'_>) + Send + 'static,
    {
        self.register(kind, false, Box::new(callback))
    }

    /// Registers a listener that unsubscribes itself after its first call.
    pub fn once<F>(&self, kind: EventKind, callback: F) -> ListenerHandle
    where
        F: FnMut(&mut T, &Event<'_>) + Send + 'static,
    {
        self.register(kind, true, Box::new(callback))
    }

    /// Removes a listener. Returns false if it was already gone.
    pub fn off(&self, handle: ListenerHandle) -> bool {
        let mut listeners = self.lock();
        let before = listeners.len();
        listeners.retain(|l| l.handle != handle);
        listeners.len() != before
    }

    /// Number of listeners currently registered for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.lock().iter().filter(|l| l.kind == kind).count()
    }

    /// Runs every listener registered for the event's kind, in order.
    ///
    /// The registry stays locked for the duration of the dispatch, so
    /// listeners must not register or remove listeners on the same emitter.
    pub fn emit(&self, target: &mut T, event: &Event<'_>) {
        let kind = event.kind();
        let mut listeners = self.lock();
        let mut fired = Vec::new();

        for listener in listeners.iter_mut().filter(|l| l.kind == kind) {
            (listener.callback)(target, event);
            if listener.once {
                fired.push(listener.handle);
            }
        }

        if !fired.is_empty() {
            listeners.retain(|l| !fired.contains(&l.handle));
        }
    }

    fn register(&self, kind: EventKind, once: bool, callback: Callback<T>) -> ListenerHandle {
        let handle = ListenerHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        self.lock().push(Listener {
            handle,
            kind,
            once,
            callback,
        });
        handle
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Listener<T>>> {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
