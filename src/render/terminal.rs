//! Concrete terminal renderer. Owns screen init/restore (crossterm's
//! alternate screen + raw mode) and paints one ratatui table per tick.
//! The engine depends only on `draw`'s signature, not on ratatui itself,
//! so this renderer is swappable.

use std::io::{self, Stdout};

use anyhow::Result;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Constraint;
use ratatui::widgets::{Block, Borders, Row, Table};
use ratatui::Terminal;

use crate::flow::FlowStats;
use crate::net::FlowKey;

use super::format::{format_byte_rate, format_packet_rate};

const COLUMN_HEADERS: [&str; 7] = [
    "Src IP:Port",
    "Dst IP:Port",
    "Proto",
    "Rx b/s",
    "Rx p/s",
    "Tx b/s",
    "Tx p/s",
];

pub struct TerminalRenderer {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalRenderer {
    pub fn init() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }

    /// Paint one tick's view. Rows are already sorted and truncated by
    /// the caller; this function only formats and draws.
    pub fn draw(&mut self, view: &[(FlowKey, FlowStats)]) -> Result<()> {
        self.terminal.draw(|frame| {
            let rows: Vec<Row> = view
                .iter()
                .map(|(key, stats)| {
                    Row::new(vec![
                        key.src.display(),
                        key.dst.display(),
                        key.protocol.to_string(),
                        format_byte_rate(stats.rx_bps),
                        format_packet_rate(stats.rx_pps),
                        format_byte_rate(stats.tx_bps),
                        format_packet_rate(stats.tx_pps),
                    ])
                })
                .collect();

            let widths = [
                Constraint::Length(25),
                Constraint::Length(25),
                Constraint::Length(8),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Length(10),
            ];

            let table = Table::new(rows, widths)
                .header(Row::new(COLUMN_HEADERS.to_vec()))
                .block(Block::default().borders(Borders::ALL).title("flowtop"));

            frame.render_widget(table, frame.area());
        })?;

        Ok(())
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
    }
}
