use std::fmt::Display;

use anyhow::Result;
use chrono::{DateTime, Local};
use chrono_english::parse_date_string;
use clap::{CommandFactory, ValueEnum};

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

pub const DATE_HELP: &str = "Examples are \"yesterday\", \"1 hour ago\", \"15/03/2025\", \"12:00 16/03/2025\", \"12 AM 16/03/2025\"";

/// Parses a human readable date relative to `now`. Falls back to `now` when nothing is given.
pub fn parse_date_or_now(
    value: Option<&str>,
    now: DateTime<Local>,
    date_style: DateStyle,
    name: &str,
) -> Result<DateTime<Local>> {
    match value.map(|s| parse_date_string(s, now, date_style.into())) {
        Some(Ok(v)) => Ok(v),
        Some(Err(e)) => Err(validation_error(format!("Failed to validate {name} {e}"))),
        None => Ok(now),
    }
}

/// Creates an error that's displayed the same way as clap's own argument errors.
pub fn validation_error(message: String) -> anyhow::Error {
    Args::command()
        .error(clap::error::ErrorKind::ValueValidation, message)
        .into()
}
