//! Display utilities for the CLI

use std::future::Future;
use std::time::Duration;

use colored::*;
use fispanel_core::format::Tone;
use fispanel_core::{Notice, NoticeLevel};
use indicatif::{ProgressBar, ProgressStyle};

use crate::context::Context;

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", "━".repeat(60).bright_black());
    println!(" {}", title.bright_white().bold());
    println!("{}", "━".repeat(60).bright_black());
}

/// Print a success message
pub fn success(message: &str) {
    println!("  {} {}", "✓".bright_green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("  {} {}", "✗".bright_red(), message.bright_red());
}

/// Print an info message
pub fn info(message: &str) {
    println!("  {} {}", "→".bright_blue(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    println!("  {} {}", "⚠".yellow(), message.yellow());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("      {}: {}", key, value.bright_cyan());
}

/// Print a labeled value
pub fn labeled(label: &str, value: &str) {
    println!("  {}: {}", label.bright_white(), value.bright_cyan());
}

/// Print a pending console notice
pub fn notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Success => success(&notice.message),
        NoticeLevel::Info => info(&notice.message),
        NoticeLevel::Error => error(&notice.message),
    }
}

/// Print and clear the context's pending notice
pub fn flush(ctx: &mut Context) {
    if let Some(pending) = ctx.take_notice() {
        notice(&pending);
    }
}

/// Color text by badge tone
pub fn toned(text: &str, tone: Tone) -> ColoredString {
    match tone {
        Tone::Success => text.bright_green(),
        Tone::Danger => text.bright_red(),
        Tone::Primary => text.bright_blue(),
        Tone::Info => text.bright_cyan(),
        Tone::Warning => text.yellow(),
        Tone::Secondary => text.bright_black(),
    }
}

/// A table cell, optionally colored as a badge
pub struct Cell {
    text: String,
    tone: Option<Tone>,
}

impl Cell {
    pub fn badge(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone: Some(tone),
        }
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Self { text, tone: None }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Self::from(text.to_string())
    }
}

/// Print an aligned table
pub fn table(headers: &[&str], rows: Vec<Vec<Cell>>) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.text.chars().count());
            }
        }
    }

    let pad = |text: &str, width: usize| {
        let fill = width.saturating_sub(text.chars().count());
        format!("{}{}", text, " ".repeat(fill))
    };

    let header: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad(h, *w))
        .collect();
    println!("  {}", header.join("  ").bright_white().bold());
    println!("  {}", "─".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)).bright_black());

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| {
                let padded = pad(&cell.text, *w);
                match cell.tone {
                    Some(tone) => toned(&padded, tone).to_string(),
                    None => padded,
                }
            })
            .collect();
        println!("  {}", line.join("  "));
    }
}

/// Print `message` centered-ish when a list is empty
pub fn empty(message: &str) {
    println!("  {}", message.bright_black());
}

/// Horizontal bar proportional to `value / max`
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * width as f64).round() as usize;
    "█".repeat(filled.clamp(1, width))
}

/// Run `future` behind a spinner
pub async fn with_spinner<F, T>(message: &str, future: F) -> T
where
    F: Future<Output = T>,
{
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    let result = future.await;
    pb.finish_and_clear();
    result
}
