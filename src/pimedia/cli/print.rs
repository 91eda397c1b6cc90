use chrono::{DateTime, Utc};
use colored::Colorize;
use pimedia::api::{BatchResult, Change, CmdMessage, DoctorReport, MessageLevel};
use pimedia::model::{MediaItem, MediaKind};
use std::cmp::Ordering;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const KIND_WIDTH: usize = 7;
const FAVORITE_MARKER: &str = "★";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// Prints the per-item messages, then the new id of every moved item.
pub(super) fn print_batch(result: &BatchResult) {
    print_messages(&result.messages);
    for (id, change) in result.succeeded() {
        if let Some(new_id) = change.new_id() {
            println!("  {} -> {}", id.dimmed(), new_id);
        }
        if let Change::Favorite { is_favorite } = change {
            let state = if *is_favorite { "favorite" } else { "not favorite" };
            println!("  {} is now {}", id, state.yellow());
        }
    }
}

pub(super) fn print_report(report: &DoctorReport) {
    print_messages(&report.messages);
    let sections = [
        ("orphaned", &report.orphaned_trash_entries),
        ("stale", &report.stale_records),
        ("mismatched", &report.mismatched_records),
    ];
    for (label, ids) in sections {
        for id in ids {
            println!("    {} {}", format!("{:<10}", label).dimmed(), id);
        }
    }
}

/// Folders first, then by logical path, then by name.
pub(super) fn sort_items(items: &mut [MediaItem]) {
    items.sort_by(|a, b| {
        let a_folder = a.kind == MediaKind::Folder;
        let b_folder = b.kind == MediaKind::Folder;
        match (a_folder, b_folder) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => a
                .logical_path
                .cmp(&b.logical_path)
                .then_with(|| a.name.cmp(&b.name)),
        }
    });
}

pub(super) fn print_items(items: &[MediaItem]) {
    if items.is_empty() {
        println!("No items found.");
        return;
    }

    for item in items {
        let marker = if item.is_favorite {
            format!("{} ", FAVORITE_MARKER)
        } else {
            "  ".to_string()
        };
        let kind = format!("{:<width$}", item.kind.to_string(), width = KIND_WIDTH);

        let label = match &item.original_logical_path {
            Some(from) => format!("{}  (from {})", item.id, from),
            None => item.id.clone(),
        };

        let fixed_width = marker.width() + KIND_WIDTH + 1 + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let label_display = truncate_to_width(&label, available);
        let padding = available.saturating_sub(label_display.width());

        let kind_colored = match item.kind {
            MediaKind::Folder => kind.blue(),
            MediaKind::Image => kind.green(),
            MediaKind::Video => kind.magenta(),
            MediaKind::File => kind.normal(),
        };
        let label_colored = if item.is_trashed {
            label_display.red()
        } else {
            label_display.normal()
        };

        println!(
            "{}{} {}{}{}",
            marker.yellow(),
            kind_colored,
            label_colored,
            " ".repeat(padding),
            format_time_ago(item.created_at).dimmed()
        );
    }
}

pub(super) fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

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

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);

    let formatter = Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
