//! Instrumentation counters
//!
//! Two families of counters are maintained:
//!
//! - process-wide copy/move counts for `NodeData<f64>` buffers, bumped by the
//!   buffer type itself;
//! - per-primitive evaluation counts and cumulative evaluation time, keyed by
//!   `"<name>$<sequence>"` in a [`CounterRegistry`] owned by the engine.
//!
//! The engine only increments these; reporting them is up to the caller.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;

use crate::site::Site;

static COPY_CONSTRUCTIONS: AtomicU64 = AtomicU64::new(0);
static MOVE_CONSTRUCTIONS: AtomicU64 = AtomicU64::new(0);
static COPY_ASSIGNMENTS: AtomicU64 = AtomicU64::new(0);
static MOVE_ASSIGNMENTS: AtomicU64 = AtomicU64::new(0);

/// Snapshot of the `NodeData<f64>` buffer counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeDataCounts {
    /// Buffers created by copying another buffer's elements
    pub copy_constructions: u64,
    /// Buffers handed on to a new owner without copying
    pub move_constructions: u64,
    /// Element copies into an existing allocation
    pub copy_assignments: u64,
    /// Buffer replacements by move
    pub move_assignments: u64,
}

/// Read the current `NodeData<f64>` counters.
pub fn node_data_counts() -> NodeDataCounts {
    NodeDataCounts {
        copy_constructions: COPY_CONSTRUCTIONS.load(Ordering::Relaxed),
        move_constructions: MOVE_CONSTRUCTIONS.load(Ordering::Relaxed),
        copy_assignments: COPY_ASSIGNMENTS.load(Ordering::Relaxed),
        move_assignments: MOVE_ASSIGNMENTS.load(Ordering::Relaxed),
    }
}

pub(crate) fn record_copy_construction() {
    COPY_CONSTRUCTIONS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_move_construction() {
    MOVE_CONSTRUCTIONS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_copy_assignment() {
    COPY_ASSIGNMENTS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_move_assignment() {
    MOVE_ASSIGNMENTS.fetch_add(1, Ordering::Relaxed);
}

/// Evaluation counters for a single primitive instance.
#[derive(Debug, Default)]
pub struct PrimitiveCounters {
    eval_count: AtomicU64,
    eval_nanos: AtomicU64,
}

impl PrimitiveCounters {
    /// Record one completed evaluation.
    pub fn record(&self, elapsed: Duration) {
        self.eval_count.fetch_add(1, Ordering::Relaxed);
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.eval_nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    /// Number of completed evaluations
    pub fn eval_count(&self) -> u64 {
        self.eval_count.load(Ordering::Relaxed)
    }

    /// Cumulative evaluation wall time
    pub fn eval_time(&self) -> Duration {
        Duration::from_nanos(self.eval_nanos.load(Ordering::Relaxed))
    }
}

/// Snapshot of one primitive's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveCounts {
    /// Number of completed evaluations
    pub eval_count: u64,
    /// Cumulative evaluation wall time
    pub eval_time: Duration,
}

/// Registry of per-primitive counters, keyed by `"<name>$<sequence>"`.
///
/// Sequence numbers are handed out per operator name in creation order, so
/// the third `__add` created by an engine is `__add$2`.
#[derive(Debug, Default)]
pub struct CounterRegistry {
    sequences: DashMap<String, u64>,
    instances: DashMap<String, Arc<PrimitiveCounters>>,
}

impl CounterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next sequence number for `name` and register counters for
    /// the resulting instance. Returns the sequenced site and its counters.
    pub fn register(&self, site: Site) -> (Site, Arc<PrimitiveCounters>) {
        let sequence = {
            let mut next = self.sequences.entry(site.name().to_string()).or_insert(0);
            let current = *next;
            *next += 1;
            current
        };
        let site = site.with_sequence(sequence);
        let counters = Arc::new(PrimitiveCounters::default());
        self.instances.insert(site.key(), Arc::clone(&counters));
        (site, counters)
    }

    /// Counters for one instance.
    pub fn get(&self, key: &str) -> Option<PrimitiveCounts> {
        self.instances.get(key).map(|c| PrimitiveCounts {
            eval_count: c.eval_count(),
            eval_time: c.eval_time(),
        })
    }

    /// All instances, sorted by key.
    pub fn snapshot(&self) -> Vec<(String, PrimitiveCounts)> {
        let mut entries: Vec<_> = self
            .instances
            .iter()
            .map(|entry| {
                (
                    entry.key().clone(),
                    PrimitiveCounts {
                        eval_count: entry.value().eval_count(),
                        eval_time: entry.value().eval_time(),
                    },
                )
            })
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Number of registered instances
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether no instance has been registered
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
