//! Shared terminal styles so every panel colours things the same way.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::ProvenanceTag;
use crate::ui::components::status::StatusKind;
use crate::ui::report_text::Tone;

// ============================================
// FRAME STYLES
// ============================================

pub fn title() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub fn border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn hint() -> Style {
    Style::default().fg(Color::DarkGray)
}

// ============================================
// INPUT STYLES
// ============================================

pub fn input(focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

pub fn button(enabled: bool) -> Style {
    if enabled {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

// ============================================
// REPORT STYLES
// ============================================

pub fn tone(tone: Tone) -> Style {
    match tone {
        Tone::Plain => Style::default(),
        Tone::Heading => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        Tone::Muted => Style::default().fg(Color::Gray),
        Tone::Good => Style::default().fg(Color::Green),
        Tone::Bad => Style::default().fg(Color::Red),
    }
}

pub fn provenance_badge(tag: ProvenanceTag) -> Style {
    match tag {
        ProvenanceTag::Fetched => Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD),
        ProvenanceTag::Manual => Style::default()
            .fg(Color::Black)
            .bg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    }
}

// ============================================
// STATUS STYLES
// ============================================

pub fn status(kind: StatusKind) -> Style {
    match kind {
        StatusKind::Info => Style::default().fg(Color::Cyan),
        StatusKind::Success => Style::default().fg(Color::Green),
        StatusKind::Warning => Style::default().fg(Color::Yellow),
        StatusKind::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}

pub fn status_icon(kind: StatusKind) -> &'static str {
    match kind {
        StatusKind::Info => "i",
        StatusKind::Success => "+",
        StatusKind::Warning => "!",
        StatusKind::Error => "x",
    }
}
