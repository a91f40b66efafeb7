//! The flow table: a concurrent mapping from `FlowKey` to `FlowStats`.
//!
//! A single lock covers both the live table and the sampler's previous-tick
//! snapshot. The capture thread only ever calls `update`,
//! which does O(1) hash-map work under the lock and never touches I/O. The
//! display thread calls `sample_and_rank` once per tick; that pass is
//! O(live flow count) but runs at 1 Hz against a few thousand flows at
//! most, so holding the lock for its duration is fine. Neither caller may
//! hold the lock across a capture syscall, terminal paint, or CSV write —
//! those all happen after the guarded section returns its copy.

use std::collections::HashMap;
use std::time::Instant;

use parking_lot::Mutex;

use crate::net::FlowKey;

use super::stats::{Direction, FlowStats};

/// Which column the display/CSV layers rank flows by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Bytes,
    Packets,
}

struct Inner {
    current: HashMap<FlowKey, FlowStats>,
    prev: HashMap<FlowKey, FlowStats>,
}

pub struct FlowTable {
    inner: Mutex<Inner>,
}

impl FlowTable {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                current: HashMap::new(),
                prev: HashMap::new(),
            }),
        }
    }

    /// Record one packet against `key`. Creates the flow on first
    /// observation with the non-observed side's counters at zero.
    pub fn update(&self, key: FlowKey, direction: Direction, byte_count: u64, now: Instant) {
        let mut inner = self.inner.lock();
        match inner.current.get_mut(&key) {
            Some(stats) => stats.record(direction, byte_count, now),
            None => {
                inner.current.insert(key, FlowStats::new(direction, byte_count, now));
            }
        }
    }

    /// Erase a flow; a no-op if it isn't present.
    pub fn remove(&self, key: &FlowKey) {
        self.inner.lock().current.remove(key);
    }

    /// Copy of one flow's current counters, if it exists.
    pub fn get(&self, key: &FlowKey) -> Option<FlowStats> {
        self.inner.lock().current.get(key).copied()
    }

    /// A consistent copy of the whole table. Does not borrow into the
    /// table after returning.
    pub fn snapshot(&self) -> Vec<(FlowKey, FlowStats)> {
        self.inner
            .lock()
            .current
            .iter()
            .map(|(k, v)| (*k, *v))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Atomically compute rates against the previous-tick snapshot, roll
    /// the snapshot forward, rank, and truncate to `top_n`.
    pub fn sample_and_rank(
        &self,
        sort_by: SortBy,
        now: Instant,
        top_n: usize,
    ) -> Vec<(FlowKey, FlowStats)> {
        let mut inner = self.inner.lock();

        for (key, cur) in inner.current.iter_mut() {
            if let Some(prev) = inner.prev.get(key) {
                let dt = now.saturating_duration_since(prev.last_seen).as_secs_f64();
                if dt > 0.0 {
                    cur.tx_bps = (cur.bytes_sent.saturating_sub(prev.bytes_sent)) as f64 / dt;
                    cur.rx_bps =
                        (cur.bytes_received.saturating_sub(prev.bytes_received)) as f64 / dt;
                    cur.tx_pps = (cur.packets_sent.saturating_sub(prev.packets_sent)) as f64 / dt;
                    cur.rx_pps =
                        (cur.packets_received.saturating_sub(prev.packets_received)) as f64 / dt;
                } else {
                    cur.tx_bps = 0.0;
                    cur.rx_bps = 0.0;
                    cur.tx_pps = 0.0;
                    cur.rx_pps = 0.0;
                }
            } else {
                cur.tx_bps = 0.0;
                cur.rx_bps = 0.0;
                cur.tx_pps = 0.0;
                cur.rx_pps = 0.0;
            }

            // This tick's sampling instant becomes the denominator for the
            // next tick, not the flow's last packet arrival: it yields
            // stable per-interval rates instead of per-packet
            // instantaneous ones.
            cur.last_seen = now;
        }

        inner.prev = inner
            .current
            .iter()
            .map(|(k, v)| (*k, *v))
            .collect();

        let mut view: Vec<(FlowKey, FlowStats)> =
            inner.current.iter().map(|(k, v)| (*k, *v)).collect();

        match sort_by {
            SortBy::Bytes => view.sort_by(|a, b| b.1.total_bytes().cmp(&a.1.total_bytes())),
            SortBy::Packets => view.sort_by(|a, b| b.1.total_packets().cmp(&a.1.total_packets())),
        }

        view.truncate(top_n);
        view
    }
}

impl Default for FlowTable {
    fn default() -> Self {
        Self::new()
    }
}
