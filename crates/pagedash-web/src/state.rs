//! Shared application state and global statics.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::sync::atomic::AtomicUsize;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use pagedash_core::dashboard::Dashboard;
use pagedash_core::document::RegionUpdate;

pub(crate) struct WebAppInner {
    pub(crate) dashboard: Dashboard,
    // Base URL of the persistence service, for display only.
    pub(crate) backend: String,
    // Wall-clock time of the last applied snapshot.
    pub(crate) last_success: Option<DateTime<Utc>>,
}

impl WebAppInner {
    pub(crate) fn new(backend: String) -> Self {
        Self {
            dashboard: Dashboard::new(),
            backend,
            last_success: None,
        }
    }
}

pub(crate) type SharedState = Arc<Mutex<WebAppInner>>;

/// Regions changed by one poll cycle.
pub(crate) type Changes = Arc<Vec<RegionUpdate>>;

pub(crate) type AppState = State<(SharedState, broadcast::Sender<Changes>)>;

pub(crate) static SSE_CONNECTIONS: AtomicUsize = AtomicUsize::new(0);
