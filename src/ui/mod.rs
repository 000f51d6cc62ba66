pub mod components;
pub mod dashboard;
pub mod report_text;
pub mod theme;

pub use report_text::{render_report, render_report_string, ReportLine, Tone};
