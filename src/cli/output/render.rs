use std::fmt::{Display, Write};

use ansi_term::Style;
use anyhow::Result;
use chrono::Duration;
use clap::ValueEnum;

use crate::{
    layout::PositionedEvent,
    utils::time::{format_duration, format_hours_minutes, format_minute_of_day},
};

use super::summary::DaySummary;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

pub fn render_events(events: &[PositionedEvent], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(events)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(events)?),
    }
}

/// One line per event: time span, duration, pixel box, horizontal slot and label.
fn render_table(events: &[PositionedEvent]) -> String {
    let mut output = String::new();
    for PositionedEvent {
        event,
        top,
        height,
        left_percent,
        width_percent,
        ..
    } in events
    {
        // Writing into a string can't fail
        let _ = writeln!(
            output,
            "{}-{}\t{}\t{top:.0}px+{height:.0}px\t{left_percent} {width_percent}\t{}",
            format_minute_of_day(event.start_minute),
            format_minute_of_day(event.end_minute),
            format_duration(Duration::minutes(event.duration_minutes)),
            event.label
        );
    }
    output
}

pub fn render_summary(summary: &DaySummary) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "{}\t{}\t{} sessions",
        Style::new().bold().paint("Tracked"),
        format_hours_minutes(summary.tracked),
        summary.session_count
    );
    if let Some(running) = &summary.running {
        let _ = writeln!(output, "Running\t{running}");
    }
    if let Some(longest) = &summary.longest {
        let _ = writeln!(
            output,
            "Longest\t{}\t{}",
            format_hours_minutes(longest.duration),
            longest.label
        );
    }
    for usage in &summary.labels {
        let _ = writeln!(
            output,
            "{}\t{}",
            format_hours_minutes(usage.duration),
            usage.label
        );
    }
    output
}
