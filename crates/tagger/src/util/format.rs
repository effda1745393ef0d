use chrono::{DateTime, Local, Utc};
use comfy_table::Color;
use console::style;
use std::ops::Range;

const UNDEFINED: &str = "-";

pub fn format_ratio(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => UNDEFINED.to_string(),
    }
}

pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v * 100.0),
        None => UNDEFINED.to_string(),
    }
}

pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn format_estimate(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => format_count(v.round() as u64),
        _ => UNDEFINED.to_string(),
    }
}

pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    let local: DateTime<Local> = DateTime::from(*dt);
    local.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Green above 0.75, yellow above 0.5, red otherwise.
pub fn metric_color(value: Option<f64>) -> Color {
    match value {
        Some(v) if v > 0.75 => Color::Green,
        Some(v) if v > 0.5 => Color::Yellow,
        Some(_) => Color::Red,
        None => Color::DarkGrey,
    }
}

/// Render `text` with every range emphasised. Ranges must be sorted and
/// non-overlapping byte offsets on char boundaries.
pub fn highlight(text: &str, ranges: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for range in ranges {
        if range.start < cursor || range.end > text.len() {
            continue;
        }
        out.push_str(&text[cursor..range.start]);
        out.push_str(&style(&text[range.clone()]).bold().yellow().to_string());
        cursor = range.end;
    }
    out.push_str(&text[cursor..]);
    out
}
