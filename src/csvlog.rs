//! CSV audit log. Opened once, truncated and rewritten on every tick
//! so the file always reflects the most recent sample.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::warn;

use crate::flow::FlowStats;
use crate::net::FlowKey;

const HEADER: &str =
    "timestamp,protocol,src_ip,src_port,dst_ip,dst_port,bytes_sent,bytes_received,packets_sent,packets_received";

pub struct CsvLogger {
    path: PathBuf,
}

impl CsvLogger {
    /// Validate the path is writable. A failure here is fatal; callers
    /// should surface the `Err` and exit non-zero before starting
    /// either thread.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        File::create(&path)
            .with_context(|| format!("failed to open log file {path:?}"))?;
        Ok(Self { path })
    }

    /// Overwrite the file with the header plus one row per flow in
    /// `view`. A write failure here is best-effort: it's logged and
    /// swallowed, not propagated.
    pub fn write_tick(&self, view: &[(FlowKey, FlowStats)], now: SystemTime) {
        if let Err(e) = self.try_write_tick(view, now) {
            warn!(error = %e, path = ?self.path, "CSV flush failed");
        }
    }

    fn try_write_tick(&self, view: &[(FlowKey, FlowStats)], now: SystemTime) -> Result<()> {
        let file = File::create(&self.path)
            .with_context(|| format!("failed to open log file {:?}", self.path))?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "{HEADER}")?;

        let timestamp: DateTime<Utc> = now.into();
        let unix_seconds = timestamp.timestamp();

        for (key, stats) in view {
            writeln!(
                writer,
                "{},{},{},{},{},{},{},{},{},{}",
                unix_seconds,
                key.protocol,
                key.src.addr_text(),
                key.src.port(),
                key.dst.addr_text(),
                key.dst.port(),
                stats.bytes_sent,
                stats.bytes_received,
                stats.packets_sent,
                stats.packets_received,
            )?;
        }

        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::Direction;
    use crate::net::Protocol;
    use std::net::Ipv4Addr;
    use std::time::Instant;

    #[test]
    fn writes_header_and_one_row_per_flow() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let logger = CsvLogger::open(&path).unwrap();

        let key = FlowKey::from_ipv4(
            Ipv4Addr::new(192, 168, 1, 10),
            12345,
            Ipv4Addr::new(8, 8, 8, 8),
            80,
            Protocol::Tcp,
        );
        let stats = FlowStats::new(Direction::Tx, 74, Instant::now());

        logger.write_tick(&[(key, stats)], SystemTime::now());

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next().unwrap(), HEADER);
        let row = lines.next().unwrap();
        assert!(row.contains("TCP"));
        assert!(row.contains("192.168.1.10"));
        assert!(row.contains("8.8.8.8"));
        assert!(row.ends_with("74,0,1,0"));
    }

    #[test]
    fn each_tick_truncates_the_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let logger = CsvLogger::open(&path).unwrap();

        let key = FlowKey::from_ipv4(
            Ipv4Addr::new(10, 0, 0, 1),
            1,
            Ipv4Addr::new(10, 0, 0, 2),
            2,
            Protocol::Udp,
        );
        let stats = FlowStats::new(Direction::Tx, 1000, Instant::now());
        logger.write_tick(&[(key, stats)], SystemTime::now());
        logger.write_tick(&[], SystemTime::now());

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }
}
