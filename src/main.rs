//! flowtop entry point: parse CLI, open the capture source, spawn the
//! capture and display threads, wait for a shutdown signal, then join
//! both before exiting.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use flowtop::capture::{classify, FrameSource, PnetSource};
use flowtop::cli::{Args, Config};
use flowtop::csvlog::CsvLogger;
use flowtop::flow::FlowTable;
use flowtop::render::TerminalRenderer;
use flowtop::sample::{self, DEFAULT_TICK_INTERVAL};

fn main() -> Result<()> {
    let args = Args::parse_from_env();
    setup_logging();

    let config = Config::validate(args).context("invalid configuration")?;

    let csv_logger = config
        .log_path
        .as_ref()
        .map(CsvLogger::open)
        .transpose()
        .context("failed to open CSV log file")?;

    let mut source = PnetSource::open(&config.interface)
        .with_context(|| format!("failed to open interface '{}'", config.interface))?;
    let link_type = source.link_type();
    let locals = source.local_addresses().clone();

    info!(interface = %config.interface, ?link_type, "flowtop starting");

    let table = Arc::new(FlowTable::new());
    let running = Arc::new(AtomicBool::new(true));

    let capture_running = Arc::clone(&running);
    let capture_table = Arc::clone(&table);
    let capture_handle = std::thread::spawn(move || {
        while capture_running.load(Ordering::SeqCst) {
            match source.next_frame() {
                Ok(Some(frame)) => classify(&frame, link_type, &locals, &capture_table),
                Ok(None) => {}
                Err(e) => error!(error = %e, "capture error"),
            }
        }
    });

    let mut renderer = TerminalRenderer::init().context("failed to initialize terminal")?;

    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || {
            running.store(false, Ordering::SeqCst);
        })
        .context("failed to install signal handler")?;
    }

    sample::run(
        &table,
        config.sort_by,
        &mut renderer,
        csv_logger.as_ref(),
        &running,
        DEFAULT_TICK_INTERVAL,
    );

    running.store(false, Ordering::SeqCst);
    drop(renderer);
    let _ = capture_handle.join();

    info!("flowtop stopped");
    Ok(())
}

fn setup_logging() {
    let filter =
        EnvFilter::from_default_env().add_directive(format!("flowtop={}", Level::INFO).parse().unwrap());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}
