//! Timestamp notation parsing and the canonical copy/paste text format.
//!
//! A timestamp head looks like `[~][H:]MM:SS[~] [...]`: an optional hour group,
//! minutes and seconds, optionally bracketed by the VOD marker, followed by up to
//! three level markers. Everything after the head is the description.
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::domain::{MAX_LEVEL, Timestamp, sort_by_time};

/// Brackets timestamps that are relative to a VOD.
pub const VOD_MARKER: char = '~';
/// Each leading marker nests the entry one level deeper.
pub const LEVEL_MARKER: char = '.';
/// Separates the export header from the timestamp lines.
pub const EXPORT_MARKER: &str = "--- timestamps ---";

const TIMESTAMP_PATTERN: &str = r"(~)?(?:(\d+):)?(\d+):(\d+)(~)?[ \t]*(\.{0,3})[ \t]*";
const CLOCK_PATTERN: &str = r"^\s*(?:(\d+):)?(\d+):(\d+)\s*$";

const SECS_PER_HOUR: u64 = 3600;
const SECS_PER_MINUTE: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DescriptionEnd {
    /// Description runs to the end of the line.
    Line,
    /// Description also stops where the next timestamp starts.
    NextMatch,
}

/// Parses every timestamp line in `text`, in scan order.
///
/// Lines without a `digits:digits` head are skipped.
#[must_use]
pub fn parse(text: &str) -> Vec<Timestamp> {
    scan(text, DescriptionEnd::Line)
}

/// Parses a comment body, where several timestamps may share one line.
#[must_use]
pub fn parse_comment(text: &str) -> Vec<Timestamp> {
    scan(text, DescriptionEnd::NextMatch)
}

/// Converts a bare `h:mm:ss` or `mm:ss` display string into seconds.
#[must_use]
pub fn parse_clock(display: &str) -> Option<u64> {
    let caps = clock_regex()?.captures(display)?;
    seconds_from(
        caps.get(1).map(|m| m.as_str()),
        caps.get(2)?.as_str(),
        caps.get(3)?.as_str(),
    )
}

/// Renders seconds as `H:MM:SS`.
#[must_use]
pub fn format_clock(seconds: u64) -> String {
    let hours = seconds.checked_div(SECS_PER_HOUR).unwrap_or(0);
    let minutes = seconds
        .checked_rem(SECS_PER_HOUR)
        .and_then(|rest| rest.checked_div(SECS_PER_MINUTE))
        .unwrap_or(0);
    let secs = seconds.checked_rem(SECS_PER_MINUTE).unwrap_or(0);
    format!("{}:{:02}:{:02}", hours, minutes, secs)
}

/// Renders one timestamp in the canonical copy format.
#[must_use]
pub fn format_line(timestamp: &Timestamp) -> String {
    let dots: String = std::iter::repeat_n(LEVEL_MARKER, usize::from(timestamp.level)).collect();
    format!(
        "{marker}{clock}{marker} {dots}{description}",
        marker = VOD_MARKER,
        clock = format_clock(timestamp.time),
        dots = dots,
        description = timestamp.description,
    )
}

/// Builds the clipboard text: title, source URL, marker line, then one line per entry.
#[must_use]
pub fn export_text(title: &str, url: &str, timestamps: &[Timestamp]) -> String {
    let mut lines = Vec::with_capacity(timestamps.len().saturating_add(3));
    lines.push(title.to_owned());
    lines.push(url.to_owned());
    lines.push(EXPORT_MARKER.to_owned());
    lines.extend(timestamps.iter().map(format_line));
    lines.join("\n")
}

/// Parses pasted text. Header lines are skipped when the marker line is present.
#[must_use]
pub fn import_text(text: &str) -> Vec<Timestamp> {
    let body = text
        .lines()
        .position(|line| line.trim() == EXPORT_MARKER)
        .map_or_else(
            || text.to_owned(),
            |index| {
                text.lines()
                    .skip(index.saturating_add(1))
                    .collect::<Vec<_>>()
                    .join("\n")
            },
        );
    let mut timestamps = parse(&body);
    sort_by_time(&mut timestamps);
    timestamps
}

/// Returns the `name` of a leading `name:` prefix, if the description has one.
#[must_use]
pub fn user_of(description: &str) -> Option<&str> {
    let (name, _) = description.trim_start().split_once(':')?;
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return None;
    }
    Some(name)
}

/// Splits leading level markers off a description.
#[must_use]
pub fn split_level(description: &str) -> (u8, String) {
    let trimmed = description.trim();
    let rest = trimmed.trim_start_matches(LEVEL_MARKER);
    let markers = trimmed.len().saturating_sub(rest.len());
    let level = u8::try_from(markers).unwrap_or(MAX_LEVEL).min(MAX_LEVEL);
    (level, rest.trim().to_owned())
}

fn scan(text: &str, end: DescriptionEnd) -> Vec<Timestamp> {
    let Some(regex) = timestamp_regex() else {
        return Vec::new();
    };
    let heads: Vec<Captures<'_>> = regex.captures_iter(text).collect();
    let mut timestamps = Vec::new();
    let mut resume_at = 0usize;

    for (index, caps) in heads.iter().enumerate() {
        let Some(head) = caps.get(0) else {
            continue;
        };
        if head.start() < resume_at {
            continue;
        }
        let line_end = text
            .get(head.end()..)
            .and_then(|rest| rest.find('\n'))
            .map_or(text.len(), |offset| head.end().saturating_add(offset));
        let stop = match end {
            DescriptionEnd::Line => line_end,
            DescriptionEnd::NextMatch => heads
                .get(index.saturating_add(1))
                .and_then(|next| next.get(0))
                .map_or(line_end, |next| next.start().min(line_end)),
        };
        resume_at = stop;

        let Some(timestamp) = build(caps, text.get(head.end()..stop).unwrap_or("")) else {
            tracing::debug!("Skipping malformed timestamp '{}'", head.as_str().trim());
            continue;
        };
        timestamps.push(timestamp);
    }

    timestamps
}

fn build(caps: &Captures<'_>, tail: &str) -> Option<Timestamp> {
    let time = seconds_from(
        caps.get(2).map(|m| m.as_str()),
        caps.get(3)?.as_str(),
        caps.get(4)?.as_str(),
    )?;
    let head_level = caps.get(6).map_or(0, |m| m.as_str().len());
    let level = u8::try_from(head_level).unwrap_or(MAX_LEVEL).min(MAX_LEVEL);
    let description = tail
        .trim()
        .trim_start_matches(LEVEL_MARKER)
        .trim()
        .to_owned();
    Some(Timestamp {
        time,
        level,
        description,
        is_vod_ts: caps.get(1).is_some() || caps.get(5).is_some(),
    })
}

fn seconds_from(hours: Option<&str>, minutes: &str, seconds: &str) -> Option<u64> {
    let hours = match hours {
        Some(value) => value.parse::<u64>().ok()?,
        None => 0,
    };
    let minutes = minutes.parse::<u64>().ok()?;
    let seconds = seconds.parse::<u64>().ok()?;
    hours
        .checked_mul(SECS_PER_HOUR)?
        .checked_add(minutes.checked_mul(SECS_PER_MINUTE)?)?
        .checked_add(seconds)
}

fn timestamp_regex() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| compile(TIMESTAMP_PATTERN)).as_ref()
}

fn clock_regex() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| compile(CLOCK_PATTERN)).as_ref()
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(err) => {
            tracing::error!("Invalid timestamp pattern '{}': {}", pattern, err);
            None
        }
    }
}
