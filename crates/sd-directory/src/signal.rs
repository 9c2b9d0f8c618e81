//! Node → traffic signal side table.
//!
//! Signals are registered while agents are being constructed, possibly from
//! worker threads.  Reads are only possible after [`SignalTable::seal`], which
//! is the explicit barrier between "all signals exist" and "signals may be
//! looked up".  After sealing the table is immutable and reads take no lock.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use log::{debug, warn};

use sd_core::NodeId;

use crate::{DirectoryError, DirectoryResult};

/// A traffic-control device at an intersection.
///
/// The directory only needs to know where it stands; the signal's own
/// phase logic lives with the caller.
pub trait TrafficSignal: Send + Sync {
    fn node(&self) -> NodeId;
}

type SignalMap = HashMap<NodeId, Arc<dyn TrafficSignal>>;

/// At most one signal per node; write-then-seal-then-read.
#[derive(Default)]
pub struct SignalTable {
    pending: Mutex<SignalMap>,
    sealed:  OnceLock<SignalMap>,
}

impl SignalTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `signal` at its node.
    ///
    /// Returns `Ok(false)` and keeps the earlier signal when the node already
    /// has one.  Fails once the table is sealed.
    pub fn register(&self, signal: Arc<dyn TrafficSignal>) -> DirectoryResult<bool> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if self.sealed.get().is_some() {
            return Err(DirectoryError::SignalTableSealed);
        }
        let node = signal.node();
        if pending.contains_key(&node) {
            warn!("signal already registered at {node}; ignoring re-registration");
            return Ok(false);
        }
        pending.insert(node, signal);
        Ok(true)
    }

    /// Close registration and publish the table for reading.
    ///
    /// Returns `false` if the table was already sealed.
    pub fn seal(&self) -> bool {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if self.sealed.get().is_some() {
            return false;
        }
        let table = std::mem::take(&mut *pending);
        debug!("signal table sealed with {} signal(s)", table.len());
        self.sealed.set(table).is_ok()
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed.get().is_some()
    }

    /// Signal at `node`.  Always `None` before sealing.
    pub fn signal_at(&self, node: NodeId) -> Option<Arc<dyn TrafficSignal>> {
        self.sealed.get()?.get(&node).cloned()
    }

    /// Number of registered signals, sealed or not.
    pub fn len(&self) -> usize {
        match self.sealed.get() {
            Some(table) => table.len(),
            None => self.pending.lock().unwrap_or_else(PoisonError::into_inner).len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for SignalTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalTable")
            .field("signals", &self.len())
            .field("sealed", &self.is_sealed())
            .finish()
    }
}
