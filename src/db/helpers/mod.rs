use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::models::Interval;

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_intervals(value: &str, field: &str) -> Result<Vec<Interval>> {
    serde_json::from_str(value).with_context(|| format!("failed to parse {field}"))
}

pub fn encode_intervals(intervals: &[Interval]) -> Result<String> {
    serde_json::to_string(intervals).context("failed to encode intervals")
}
