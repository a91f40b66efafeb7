use std::time::Instant;

/// Which side of a flow a packet counted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Source address was local: counts as transmitted.
    Tx,
    /// Destination address was local: counts as received.
    Rx,
}

/// Mutable per-flow counters. Created on first observation, mutated only
/// by `FlowTable::update` and `FlowTable::sample_and_rank` — see the
/// module docs on `FlowTable` for the concurrency contract that makes
/// this safe.
#[derive(Debug, Clone, Copy)]
pub struct FlowStats {
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub packets_sent: u64,
    pub packets_received: u64,
    pub first_seen: Instant,
    pub last_seen: Instant,
    /// Set by the sampler; zero until the first `sample_and_rank` tick a
    /// flow survives into.
    pub tx_bps: f64,
    pub rx_bps: f64,
    pub tx_pps: f64,
    pub rx_pps: f64,
}

impl FlowStats {
    /// Build the initial state for a flow's first packet.
    pub fn new(direction: Direction, byte_count: u64, now: Instant) -> Self {
        let (bytes_sent, packets_sent, bytes_received, packets_received) = match direction {
            Direction::Tx => (byte_count, 1, 0, 0),
            Direction::Rx => (0, 0, byte_count, 1),
        };

        Self {
            bytes_sent,
            bytes_received,
            packets_sent,
            packets_received,
            first_seen: now,
            last_seen: now,
            tx_bps: 0.0,
            rx_bps: 0.0,
            tx_pps: 0.0,
            rx_pps: 0.0,
        }
    }

    /// Apply one more packet's worth of traffic in `direction`.
    pub fn record(&mut self, direction: Direction, byte_count: u64, now: Instant) {
        match direction {
            Direction::Tx => {
                self.bytes_sent += byte_count;
                self.packets_sent += 1;
            }
            Direction::Rx => {
                self.bytes_received += byte_count;
                self.packets_received += 1;
            }
        }
        self.last_seen = now;
    }

    pub fn total_bytes(&self) -> u64 {
        self.bytes_sent + self.bytes_received
    }

    pub fn total_packets(&self) -> u64 {
        self.packets_sent + self.packets_received
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_flow_seeds_only_the_observed_direction() {
        let now = Instant::now();
        let stats = FlowStats::new(Direction::Tx, 74, now);

        assert_eq!(stats.bytes_sent, 74);
        assert_eq!(stats.packets_sent, 1);
        assert_eq!(stats.bytes_received, 0);
        assert_eq!(stats.packets_received, 0);
        assert_eq!(stats.first_seen, stats.last_seen);
    }

    #[test]
    fn direction_idempotence_law() {
        let now = Instant::now();
        let mut a = FlowStats::new(Direction::Tx, 100, now);
        a.record(Direction::Tx, 100, now);

        let mut b = FlowStats::new(Direction::Tx, 200, now);
        b.record(Direction::Tx, 0, now);

        assert_eq!(a.bytes_sent, b.bytes_sent);
        // packet counters track call count, not byte count
        assert_eq!(a.packets_sent, 2);
        assert_eq!(b.packets_sent, 2);
    }

    #[test]
    fn counters_monotonically_increase() {
        let now = Instant::now();
        let mut stats = FlowStats::new(Direction::Rx, 10, now);
        let before = stats.total_bytes();
        stats.record(Direction::Rx, 5, now);
        assert!(stats.total_bytes() >= before);
        assert!(stats.last_seen >= stats.first_seen);
    }
}
