use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use std::path::Path;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use walkdiary::api::{CmdMessage, MessageLevel};
use walkdiary::geo::format_distance;
use walkdiary::model::{Entry, EpochMillis, Preferences, Trail, Unit};
use walkdiary::notify::Notifier;

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const INDENT: &str = "    ";

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        print_message(message);
    }
}

fn print_message(message: &CmdMessage) {
    match message.level {
        MessageLevel::Info => println!("{}", message.content.dimmed()),
        MessageLevel::Success => println!("{}", message.content.green()),
        MessageLevel::Warning => println!("{}", message.content.yellow()),
        MessageLevel::Error => println!("{}", message.content.red()),
    }
}

/// Prints background notifications (failed samples while recording) as they
/// happen.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, message: CmdMessage) {
        print_message(&message);
    }
}

pub fn print_entries(entries: &[Entry]) {
    if entries.is_empty() {
        println!("No notes yet.");
        return;
    }

    for (i, entry) in entries.iter().enumerate() {
        let idx_str = format!("{}. ", i + 1);
        let text: String = entry
            .text
            .chars()
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();

        let fixed_width = INDENT.width() + idx_str.width() + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let text_display = truncate_to_width(&text, available);
        let padding = available.saturating_sub(text_display.width());

        println!(
            "{}{}{}{}{}",
            INDENT,
            idx_str.yellow(),
            text_display,
            " ".repeat(padding),
            format_time_ago(entry.ts).dimmed()
        );

        let detail_indent = " ".repeat(INDENT.width() + idx_str.width());
        if let Some(loc) = &entry.loc {
            let acc = loc
                .acc
                .map(|a| format!(" (±{:.0} m)", a))
                .unwrap_or_default();
            println!(
                "{}{}",
                detail_indent,
                format!("@ {:.5}, {:.5}{}", loc.lat, loc.lng, acc).dimmed()
            );
        }
        if let Some(photo) = &entry.photo {
            println!(
                "{}{}",
                detail_indent,
                format!("photo, {} KB encoded", photo.as_str().len().div_ceil(1024)).dimmed()
            );
        }
    }
}

pub fn print_trails(trails: &[Trail], unit: Unit) {
    if trails.is_empty() {
        println!("No trails yet.");
        return;
    }

    for (i, trail) in trails.iter().enumerate() {
        let idx_str = format!("{}. ", i + 1);
        let started = local_time(trail.started_at)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown start".to_string());
        let duration = trail
            .ended_at
            .map(|end| format_duration(end - trail.started_at))
            .unwrap_or_default();
        let summary = format!(
            "{}  {:>10}  {:>4} pts  {}",
            started,
            format_distance(trail.distance_or_zero(), unit),
            trail.points.len(),
            duration
        );

        let fixed_width = INDENT.width() + idx_str.width() + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let padding = available.saturating_sub(summary.width());

        println!(
            "{}{}{}{}{}",
            INDENT,
            idx_str.yellow(),
            summary,
            " ".repeat(padding),
            format_time_ago(trail.started_at).dimmed()
        );
    }
}

/// One status line per appended point while recording.
pub fn print_progress(trail: &Trail, unit: Unit) {
    println!(
        "{} {} points, {}",
        "•".green(),
        trail.points.len(),
        format_distance(trail.distance_or_zero(), unit).bold()
    );
}

pub fn print_prefs(prefs: &Preferences) {
    println!("unit = {}", prefs.unit);
    println!("photo-max-px = {}", prefs.photo_max_px);
}

pub fn print_data_dir(dir: &Path) {
    println!("{}", format!("data-dir = {}", dir.display()).dimmed());
}

fn local_time(ts: EpochMillis) -> Option<DateTime<Local>> {
    DateTime::<Utc>::from_timestamp_millis(ts).map(|t| t.with_timezone(&Local))
}

fn format_duration(millis: EpochMillis) -> String {
    let minutes = millis.max(0) / 60_000;
    if minutes >= 60 {
        format!("{}h{:02}", minutes / 60, minutes % 60)
    } else {
        format!("{} min", minutes)
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(ts: EpochMillis) -> String {
    let now = Utc::now();
    let then = DateTime::<Utc>::from_timestamp_millis(ts).unwrap_or(now);
    let duration = now.signed_duration_since(then);

    let formatter = Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_wide_chars() {
        let out = truncate_to_width("水の音がする方向へ進もう", 10);
        assert!(out.ends_with('…'));
        assert!(out.width() <= 10);
        assert_eq!(truncate_to_width("short", 20), "short");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(5 * 60_000 + 30_000), "5 min");
        assert_eq!(format_duration(95 * 60_000), "1h35");
        assert_eq!(format_duration(-10), "0 min");
    }
}
