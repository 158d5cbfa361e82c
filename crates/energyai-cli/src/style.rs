//! Terminal rendering of curriculum status.

use std::io::IsTerminal;

use energyai_core::{PositionChange, Status};

const GREEN: &str = "\x1b[32m";
const BLUE: &str = "\x1b[34m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

pub fn glyph(status: Status) -> &'static str {
    match status {
        Status::Completed => "✓",
        Status::Current => "▶",
        Status::Locked => "🔒",
    }
}

fn color(status: Status) -> &'static str {
    match status {
        Status::Completed => GREEN,
        Status::Current => BLUE,
        Status::Locked => DIM,
    }
}

fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

/// `text` prefixed with the status glyph, coloured when stdout is a terminal.
pub fn status_line(status: Status, text: &str) -> String {
    if color_enabled() {
        format!("{}{} {text}{RESET}", color(status), glyph(status))
    } else {
        format!("{} {text}", glyph(status))
    }
}

pub fn change_marker(change: PositionChange) -> &'static str {
    match change {
        PositionChange::Winner => "👑",
        PositionChange::Up => "↑",
        PositionChange::Down => "↓",
        PositionChange::Same => "–",
    }
}

pub fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}
