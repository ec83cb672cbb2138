// src/extractors/schedule.rs
use crate::models::ScheduleEntry;
use once_cell::sync::Lazy;
use regex::Regex;

// Leading week number, optionally introduced by "Semana"/"Week".
static WEEK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:(?:semana|sem|week|wk)\.?\s*)?(\d{1,2})[.):\-]?(?:\s+(.*)|\s*$)")
        .expect("Failed to compile WEEK_RE")
});

// Short date token: ISO, or day/month with optional year.
static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2}|\d{1,2}[/\-]\d{1,2}(?:[/\-]\d{2,4})?)(?:\s+(.*)|\s*$)")
        .expect("Failed to compile DATE_RE")
});

// Trailing reference shaped like an evaluation abbreviation ("EE1", "TI").
static TRAILING_REF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(.*?)\s+)?([A-Z]{2,3}\d*)$")
        .expect("Failed to compile TRAILING_REF_RE")
});

// "Finanzas II" names a course part, not an evaluation.
fn is_roman_numeral(token: &str) -> bool {
    token.chars().all(|c| matches!(c, 'I' | 'V' | 'X' | 'L' | 'C' | 'D' | 'M'))
}

/// Parses one schedule row; lines that do not look like a row give `None`.
pub fn parse_schedule_line(line: &str) -> Option<ScheduleEntry> {
    let caps = WEEK_RE.captures(line.trim_end())?;
    let week = caps.get(1)?.as_str().parse::<u32>().ok().filter(|w| *w > 0)?;
    let rest = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");

    let (date, rest) = match DATE_RE.captures(rest) {
        Some(date_caps) => (
            date_caps.get(1).map(|m| m.as_str().to_string()),
            date_caps.get(2).map(|m| m.as_str().trim()).unwrap_or(""),
        ),
        None => (None, rest),
    };

    let (topic, evaluation_ref) = match TRAILING_REF_RE.captures(rest) {
        Some(ref_caps) if !ref_caps.get(2).is_some_and(|m| is_roman_numeral(m.as_str())) => (
            ref_caps.get(1).map(|m| m.as_str().trim()).unwrap_or(""),
            ref_caps.get(2).map(|m| m.as_str().to_string()),
        ),
        _ => (rest, None),
    };

    Some(ScheduleEntry {
        week,
        date,
        topic: topic.split_whitespace().collect::<Vec<_>>().join(" "),
        evaluation_ref,
    })
}

/// Parses the schedule section line by line, skipping lines that are not rows.
pub fn extract_schedule(section: &str) -> Vec<ScheduleEntry> {
    let mut skipped = 0usize;
    let entries: Vec<ScheduleEntry> = section
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let entry = parse_schedule_line(line);
            if entry.is_none() {
                skipped += 1;
            }
            entry
        })
        .collect();

    tracing::debug!("Extracted {} schedule entries ({} lines skipped)", entries.len(), skipped);
    entries
}
