// Colored terminal output for the topic table and search results.
//
// This module handles all terminal-specific formatting: colors, bars,
// tables. The main.rs subcommands delegate here.

use colored::Colorize;

use super::truncate_chars;
use crate::analysis::aggregate::TopicShare;
use crate::model::artifact::TopicRow;
use crate::model::search::SearchHit;

/// Display the topic table with a share bar per topic.
///
/// `shares` is the overall distribution (same labels as the table rows);
/// the bar makes it easy to eyeball which topics dominate the curricula.
pub fn display_topic_table(table: &[TopicRow], shares: &[TopicShare]) {
    println!(
        "\n{}",
        format!("=== Themen ({} topics) ===", table.len()).bold()
    );
    println!();

    let bar_width: usize = 20;

    for row in table {
        let share = shares
            .iter()
            .find(|s| s.label == row.name)
            .map(|s| s.share)
            .unwrap_or(0.0);

        let filled = (share * bar_width as f64).round() as usize;
        let empty = bar_width.saturating_sub(filled);
        let bar = format!("[{}{}]", "=".repeat(filled), " ".repeat(empty));

        let colored_bar = if share >= 0.10 {
            bar.bright_green()
        } else if share >= 0.05 {
            bar.bright_yellow()
        } else {
            bar.bright_blue()
        };

        println!(
            "  {:>3}  {:<58} {} {:>5.1}%  ({} Sätze)",
            row.id,
            truncate_chars(&row.name, 56).bold(),
            colored_bar,
            share * 100.0,
            row.count,
        );

        if !row.keywords.is_empty() {
            let keywords = truncate_chars(&row.keywords.join(", "), 90);
            println!("       {}", keywords.dimmed());
        }
    }

    println!();
}

/// Display search hits, best match first.
pub fn display_search_hits(query: &str, hits: &[SearchHit]) {
    if hits.is_empty() {
        println!("No topics matched \"{query}\" above the threshold.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Treffer für \"{query}\" ===").bold()
    );
    println!();
    println!(
        "  {:>5}  {:>3}  {}",
        "Score".dimmed(),
        "Id".dimmed(),
        "Thema".dimmed()
    );
    println!("  {}", "-".repeat(72).dimmed());

    for hit in hits {
        println!(
            "  {:>5.2}  {:>3}  {}",
            hit.score,
            hit.topic.id,
            hit.topic.name.bold()
        );
        if !hit.topic.keywords.is_empty() {
            let keywords = truncate_chars(&hit.topic.keywords.join(", "), 80);
            println!("             {}", keywords.dimmed());
        }
    }

    println!();
}
