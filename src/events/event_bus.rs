//! Typed publish/subscribe event bus with sync and async delivery.
//!
//! Producers and consumers of domain events are decoupled through the bus:
//! listeners register against a concrete event type and are delivered every
//! published event of exactly that type. Dispatch is by `TypeId` — an event
//! of type `B` is never delivered to listeners registered for another type,
//! supertypes included.
//!
//! Two delivery disciplines:
//! - synchronous listeners run on the publisher's own thread, in registration
//!   order, before `publish` returns;
//! - asynchronous listeners are spawned onto a worker pool and complete
//!   independently of the publisher.
//!
//! Listener failures are contained per listener: a panic is caught, logged,
//! and never reaches the publisher or the other listeners. The bus owns its
//! worker pool (or takes ownership of a caller-supplied one) and shuts it
//! down exactly once via [`close`](EventBus::close).

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::mem;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

// ---------------------------------------------------------------------------
// Event trait
// ---------------------------------------------------------------------------

/// A publishable event payload.
///
/// Blanket-implemented for every `'static + Send + Sync` type; the bus places
/// no constraint on payload shape beyond type-based dispatch.
pub trait Event: Any + Send + Sync {}

impl<T: Any + Send + Sync> Event for T {}

// ---------------------------------------------------------------------------
// ListenerId
// ---------------------------------------------------------------------------

/// Identity token for a registered listener, used with
/// [`unsubscribe`](EventBus::unsubscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

static LISTENER_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

impl ListenerId {
    fn next() -> Self {
        Self(LISTENER_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

// ---------------------------------------------------------------------------
// Internal listener storage
// ---------------------------------------------------------------------------

/// Type-erased listener. The wrapper downcasts back to the concrete event
/// type registered against; the downcast cannot fail because entries are
/// only ever invoked for their own `TypeId`.
type ErasedListener = Arc<dyn Fn(&(dyn Any + Send + Sync)) + Send + Sync>;

#[derive(Clone)]
struct ListenerEntry {
    id: ListenerId,
    listener: ErasedListener,
}

#[derive(Default)]
struct ListenerSet {
    sync: Vec<ListenerEntry>,
    asynchronous: Vec<ListenerEntry>,
}

enum Discipline {
    Sync,
    Async,
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Thread-safe event bus. Open on construction; terminally closed (and
/// idempotently so) via [`close`](EventBus::close).
pub struct EventBus {
    /// Listener sets keyed by event `TypeId`.
    listeners: RwLock<HashMap<TypeId, ListenerSet>>,

    /// Spawn handle for async delivery. Outlives the owned runtime only in
    /// the closed state, where nothing is spawned.
    handle: Handle,

    /// The worker pool. Taken exactly once by `close`, whether the bus built
    /// it or the caller supplied it.
    runtime: Mutex<Option<Runtime>>,

    /// In-flight async delivery tasks, drained by `flush` and `close`.
    pending: Mutex<Vec<JoinHandle<()>>>,

    /// Set once by `close`; checked by every mutating operation.
    closed: AtomicBool,
}

impl EventBus {
    /// Bus with its own bounded worker pool (two workers, named threads).
    pub fn new() -> Self {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("agenthub-events")
            .enable_all()
            .build()
            .expect("failed to create event bus worker runtime");
        Self::with_runtime(runtime)
    }

    /// Bus over a caller-supplied worker pool.
    ///
    /// Ownership transfers to the bus for shutdown purposes: `close` stops
    /// the pool regardless of who constructed it.
    pub fn with_runtime(runtime: Runtime) -> Self {
        Self {
            listeners: RwLock::new(HashMap::new()),
            handle: runtime.handle().clone(),
            runtime: Mutex::new(Some(runtime)),
            pending: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    // -----------------------------------------------------------------------
    // Subscription
    // -----------------------------------------------------------------------

    /// Register a synchronous listener for events of type `E`.
    ///
    /// Synchronous listeners run on the publishing thread, in registration
    /// order, before `publish` returns. On a closed bus the call is accepted
    /// silently and the listener never fires.
    pub fn subscribe<E, F>(&self, listener: F) -> ListenerId
    where
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.add_listener::<E, F>(listener, Discipline::Sync)
    }

    /// Register an asynchronous listener for events of type `E`.
    ///
    /// Asynchronous listeners run on the bus's worker pool; `publish` returns
    /// without waiting for them.
    pub fn subscribe_async<E, F>(&self, listener: F) -> ListenerId
    where
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.add_listener::<E, F>(listener, Discipline::Async)
    }

    fn add_listener<E, F>(&self, listener: F, discipline: Discipline) -> ListenerId
    where
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = ListenerId::next();
        if self.closed.load(Ordering::SeqCst) {
            return id;
        }

        let erased: ErasedListener = Arc::new(move |event: &(dyn Any + Send + Sync)| {
            if let Some(event) = event.downcast_ref::<E>() {
                listener(event);
            }
        });
        let entry = ListenerEntry { id, listener: erased };

        let mut map = self.listeners.write().unwrap();
        let set = map.entry(TypeId::of::<E>()).or_default();
        match discipline {
            Discipline::Sync => set.sync.push(entry),
            Discipline::Async => set.asynchronous.push(entry),
        }
        id
    }

    /// Remove the identity-matched listener from whichever set (sync or
    /// async) holds it. Removing an unregistered id is a no-op.
    pub fn unsubscribe<E: Event>(&self, id: ListenerId) {
        let type_id = TypeId::of::<E>();
        let mut map = self.listeners.write().unwrap();
        if let Some(set) = map.get_mut(&type_id) {
            if let Some(pos) = set.sync.iter().position(|e| e.id == id) {
                set.sync.remove(pos);
            } else if let Some(pos) = set.asynchronous.iter().position(|e| e.id == id) {
                set.asynchronous.remove(pos);
            }
            if set.sync.is_empty() && set.asynchronous.is_empty() {
                map.remove(&type_id);
            }
        }
    }

    /// Remove every sync and async listener for `E`. No-op if none exist.
    pub fn unsubscribe_all<E: Event>(&self) {
        self.listeners.write().unwrap().remove(&TypeId::of::<E>());
    }

    /// Sync + async listener count currently registered for exactly `E`.
    pub fn listener_count<E: Event>(&self) -> usize {
        let map = self.listeners.read().unwrap();
        map.get(&TypeId::of::<E>())
            .map_or(0, |set| set.sync.len() + set.asynchronous.len())
    }

    // -----------------------------------------------------------------------
    // Publishing
    // -----------------------------------------------------------------------

    /// Deliver `event` to all sync listeners for its exact type, then
    /// schedule delivery to all async listeners.
    ///
    /// Returns once synchronous delivery and async scheduling are done. A
    /// listener panic is caught, logged, and does not stop the remaining
    /// listeners. Zero registered listeners, or a closed bus, is a silent
    /// no-op.
    pub fn publish<E: Event>(&self, event: E) {
        if self.closed.load(Ordering::SeqCst) {
            log::warn!("[EventBus] publish on a closed bus ignored");
            return;
        }

        let (sync_entries, async_entries) = {
            let map = self.listeners.read().unwrap();
            match map.get(&TypeId::of::<E>()) {
                Some(set) => (set.sync.clone(), set.asynchronous.clone()),
                None => return,
            }
        };

        let event = Arc::new(event);

        for entry in &sync_entries {
            let erased: &(dyn Any + Send + Sync) = event.as_ref();
            let result = catch_unwind(AssertUnwindSafe(|| (entry.listener)(erased)));
            if result.is_err() {
                log::error!("[EventBus] synchronous listener panicked; continuing delivery");
            }
        }

        for entry in &async_entries {
            let listener = Arc::clone(&entry.listener);
            let payload = Arc::clone(&event);
            let handle = self.handle.spawn(async move {
                let erased: &(dyn Any + Send + Sync) = payload.as_ref();
                let result = catch_unwind(AssertUnwindSafe(|| listener(erased)));
                if result.is_err() {
                    log::error!("[EventBus] asynchronous listener panicked");
                }
            });
            self.track(handle);
        }
    }

    /// `Option`-lifted publish: `None` is a no-op, `Some(event)` publishes.
    pub fn publish_opt<E: Event>(&self, event: Option<E>) {
        if let Some(event) = event {
            self.publish(event);
        }
    }

    fn track(&self, handle: JoinHandle<()>) {
        let mut pending = self.pending.lock().unwrap();
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    // -----------------------------------------------------------------------
    // Flush / close
    // -----------------------------------------------------------------------

    /// Block until every in-flight async delivery completes.
    ///
    /// Returns `false` if any delivery task was cancelled. Must not be called
    /// from inside a listener running on the bus's own pool.
    pub fn flush(&self) -> bool {
        let handles: Vec<JoinHandle<()>> = {
            let mut pending = self.pending.lock().unwrap();
            mem::take(&mut *pending)
        };

        let mut all_ok = true;
        for handle in handles {
            match self.handle.block_on(handle) {
                Ok(()) => {}
                Err(e) => {
                    log::error!("[EventBus] async delivery task did not complete: {e}");
                    all_ok = false;
                }
            }
        }
        all_ok
    }

    /// Close the bus: clear every listener set, drain in-flight async
    /// deliveries, and shut down the worker pool.
    ///
    /// Idempotent — closing an already-closed bus is a no-op. After `close`
    /// returns, no listener fires for any prior or subsequent `publish`, and
    /// subsequent `subscribe`/`publish` calls are accepted silently.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        self.listeners.write().unwrap().clear();
        self.flush();

        if let Some(runtime) = self.runtime.lock().unwrap().take() {
            runtime.shutdown_background();
        }
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EventBus {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Debug, Clone)]
    struct Ping {
        n: usize,
    }

    #[derive(Debug, Clone)]
    struct Pong;

    #[test]
    fn test_sync_delivery_in_registration_order() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let seen = Arc::clone(&seen);
            bus.subscribe::<Ping, _>(move |event| {
                seen.lock().unwrap().push((tag, event.n));
            });
        }

        bus.publish(Ping { n: 7 });
        assert_eq!(
            *seen.lock().unwrap(),
            vec![("first", 7), ("second", 7), ("third", 7)]
        );
        bus.close();
    }

    #[test]
    fn test_exact_type_dispatch_only() {
        let bus = EventBus::new();
        let pings = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&pings);
        bus.subscribe::<Ping, _>(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        bus.publish(Pong);
        bus.publish(Ping { n: 1 });
        assert_eq!(pings.load(Ordering::SeqCst), 1);
        bus.close();
    }

    #[test]
    fn test_listener_count_sums_both_disciplines() {
        let bus = EventBus::new();
        bus.subscribe::<Ping, _>(|_| {});
        bus.subscribe_async::<Ping, _>(|_| {});
        bus.subscribe_async::<Ping, _>(|_| {});
        assert_eq!(bus.listener_count::<Ping>(), 3);
        assert_eq!(bus.listener_count::<Pong>(), 0);

        bus.unsubscribe_all::<Ping>();
        assert_eq!(bus.listener_count::<Ping>(), 0);
        bus.close();
    }

    #[test]
    fn test_unsubscribe_removes_exactly_one() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let a = Arc::clone(&hits);
        let keep = bus.subscribe::<Ping, _>(move |_| {
            a.fetch_add(1, Ordering::SeqCst);
        });
        let b = Arc::clone(&hits);
        let drop_me = bus.subscribe::<Ping, _>(move |_| {
            b.fetch_add(1, Ordering::SeqCst);
        });

        bus.unsubscribe::<Ping>(drop_me);
        // Unregistered id: no-op.
        bus.unsubscribe::<Ping>(drop_me);
        bus.publish(Ping { n: 0 });

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(bus.listener_count::<Ping>(), 1);
        let _ = keep;
        bus.close();
    }

    #[test]
    fn test_publish_opt_none_is_noop() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        bus.subscribe::<Ping, _>(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        bus.publish_opt::<Ping>(None);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        bus.publish_opt(Some(Ping { n: 1 }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        bus.close();
    }

    #[test]
    fn test_publish_with_no_listeners_is_silent() {
        let bus = EventBus::new();
        bus.publish(Ping { n: 1 });
        bus.close();
    }

    #[test]
    fn test_close_is_idempotent_and_terminal() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        bus.subscribe::<Ping, _>(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        bus.close();
        bus.close();
        assert!(bus.is_closed());

        // Accepted silently, never fires.
        let late = Arc::clone(&hits);
        bus.subscribe::<Ping, _>(move |_| {
            late.fetch_add(1, Ordering::SeqCst);
        });
        bus.publish(Ping { n: 1 });

        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(bus.listener_count::<Ping>(), 0);
    }

    #[test]
    fn test_supplied_runtime_is_shut_down_by_close() {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let bus = EventBus::with_runtime(runtime);

        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        bus.subscribe_async::<Ping, _>(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        bus.publish(Ping { n: 1 });
        bus.close();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        bus.publish(Ping { n: 2 });
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
