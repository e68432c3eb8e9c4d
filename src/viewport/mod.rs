//! Viewport width notifications and scoped media-query subscriptions.
//!
//! A [`ViewportPlatform`] reports the current width and notifies registered
//! listeners whenever it changes. [`MediaQuerySubscription`] ties one such
//! listener to a value's lifetime: registering on construction and
//! deregistering on drop.

pub mod media_query;
pub mod terminal;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, trace};

pub use self::media_query::{MediaQuery, MediaQueryError};
pub use self::terminal::TerminalViewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Callback receiving the new viewport width in CSS pixels.
///
/// Listeners run while the platform holds its listener table, so they must
/// not register or deregister listeners themselves.
pub type WidthListener = Box<dyn Fn(u32) + Send + Sync>;

// ── Platform trait ────────────────────────────────────────────────────────────

pub trait ViewportPlatform: Send + Sync {
    /// Current viewport width in CSS pixels.
    fn width(&self) -> u32;

    fn add_listener(&self, listener: WidthListener) -> ListenerId;

    /// Once this returns the listener is never invoked again.
    fn remove_listener(&self, id: ListenerId);
}

// ── In-memory platform ────────────────────────────────────────────────────────

/// A viewport whose width is set programmatically.
pub struct SimulatedViewport {
    width: AtomicU32,
    next_id: AtomicU64,
    listeners: Mutex<HashMap<ListenerId, WidthListener>>,
}

impl SimulatedViewport {
    pub fn new(width: u32) -> Self {
        Self {
            width: AtomicU32::new(width),
            next_id: AtomicU64::new(1),
            listeners: Mutex::new(HashMap::new()),
        }
    }

    /// Resize the viewport, notifying every listener if the width changed.
    pub fn set_width(&self, width: u32) {
        let listeners = self.listeners();
        let previous = self.width.swap(width, Ordering::SeqCst);
        if previous == width {
            return;
        }

        trace!("viewport {}px -> {}px ({} listeners)", previous, width, listeners.len());
        for listener in listeners.values() {
            listener(width);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners().len()
    }

    fn listeners(&self) -> MutexGuard<'_, HashMap<ListenerId, WidthListener>> {
        self.listeners.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ViewportPlatform for SimulatedViewport {
    fn width(&self) -> u32 {
        self.width.load(Ordering::SeqCst)
    }

    fn add_listener(&self, listener: WidthListener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners().insert(id, listener);
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners().remove(&id);
    }
}

// ── Scoped subscription ───────────────────────────────────────────────────────

/// A live media-query listener, deregistered when dropped.
pub struct MediaQuerySubscription {
    platform: Arc<dyn ViewportPlatform>,
    query: MediaQuery,
    id: ListenerId,
}

impl MediaQuerySubscription {
    /// Register `on_change` for `query`, then call it once with the current
    /// match state. Every later width notification calls it again with the
    /// recomputed state.
    pub fn register<F>(platform: Arc<dyn ViewportPlatform>, query: MediaQuery, on_change: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let on_change = Arc::new(on_change);

        let listener = {
            let on_change = Arc::clone(&on_change);
            Box::new(move |width: u32| on_change(query.matches(width)))
        };
        let id = platform.add_listener(listener);
        debug!("Subscribed to `{}` ({:?})", query, id);

        on_change(query.matches(platform.width()));

        Self {
            platform,
            query,
            id,
        }
    }

    /// Evaluate the query against the platform's current width.
    pub fn matches(&self) -> bool {
        self.query.matches(self.platform.width())
    }

    pub fn query(&self) -> MediaQuery {
        self.query
    }
}

impl Drop for MediaQuerySubscription {
    fn drop(&mut self) {
        self.platform.remove_listener(self.id);
        debug!("Unsubscribed from `{}` ({:?})", self.query, self.id);
    }
}
