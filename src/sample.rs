//! Display-thread tick loop: sample the flow table, draw, optionally log.
//! Runs at a fixed cadence (default 1 s).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use tracing::error;

use crate::csvlog::CsvLogger;
use crate::flow::{FlowTable, SortBy};
use crate::render::TerminalRenderer;

pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Runs on the display thread until `running` goes false. Owns the
/// renderer and the optional CSV logger; the flow table is shared with
/// the capture thread behind its own lock.
pub fn run(
    table: &Arc<FlowTable>,
    sort_by: SortBy,
    renderer: &mut TerminalRenderer,
    csv: Option<&CsvLogger>,
    running: &AtomicBool,
    tick_interval: Duration,
) {
    while running.load(Ordering::SeqCst) {
        let now = Instant::now();
        let view = table.sample_and_rank(sort_by, now, DEFAULT_TOP_N);

        if let Err(e) = renderer.draw(&view) {
            error!(error = %e, "failed to draw terminal frame");
        }

        if let Some(csv) = csv {
            csv.write_tick(&view, SystemTime::now());
        }

        std::thread::sleep(tick_interval);
    }
}
