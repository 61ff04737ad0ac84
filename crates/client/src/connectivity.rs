//! Connectivity signal consumed by the request orchestrator.
//!
//! The client never probes the network itself; the embedding
//! application feeds reachability changes into a [`SharedConnectivity`]
//! handle (or provides its own [`ConnectivityMonitor`] implementation).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Reports whether the device currently has network reachability.
pub trait ConnectivityMonitor: Send + Sync {
    /// Returns `true` when requests should be sent to the network.
    fn is_online(&self) -> bool;
}

/// Monitor that always reports an online device. Used as the default
/// when no platform signal is wired in.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysOnline;

impl ConnectivityMonitor for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}

/// Shared connectivity flag updated by the embedding application.
///
/// Cloning is cheap; all clones observe the same flag.
#[derive(Debug, Clone)]
pub struct SharedConnectivity {
    online: Arc<AtomicBool>,
}

impl SharedConnectivity {
    /// Creates a handle with the given initial state.
    pub fn new(online: bool) -> Self {
        Self { online: Arc::new(AtomicBool::new(online)) }
    }

    /// Records a reachability change.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

impl ConnectivityMonitor for SharedConnectivity {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}
