//! Rendering. `format` is a pure, platform-independent contract;
//! `terminal` is one concrete ratatui/crossterm renderer that consumes
//! it — only the contract between the engine and a renderer matters
//! here, not a particular UI toolkit.

pub mod format;
pub mod terminal;

pub use terminal::TerminalRenderer;
