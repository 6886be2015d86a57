//! Terminal rendering of a [`YearStats`].

use std::fmt::Write;
use std::path::Path;

use chrono::{DateTime, TimeZone};
use imessage_wrapped_core::config::ReportConfig;
use imessage_wrapped_core::format::{bar, format_count, month_abbrev};
use imessage_wrapped_core::YearStats;

const RULE_WIDTH: usize = 40;

/// Built-in tapback kinds shown under "Your Reaction Style"; there are six.
const REACTION_STYLE_ROWS: usize = 6;

/// Render the full report.
///
/// `source` and `generated_at` only feed the footer, so callers (and tests)
/// control everything that isn't derived from `stats`.
pub fn render<Tz: TimeZone>(
    stats: &YearStats,
    config: &ReportConfig,
    source: &Path,
    generated_at: &DateTime<Tz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_report(&mut out, stats, config, source, generated_at);
    out
}

fn write_report<Tz: TimeZone>(
    out: &mut String,
    stats: &YearStats,
    config: &ReportConfig,
    source: &Path,
    generated_at: &DateTime<Tz>,
) -> std::fmt::Result
where
    Tz::Offset: std::fmt::Display,
{
    let year = stats.year();
    writeln!(out)?;
    writeln!(out, "🎁 iMessage Wrapped {}", year)?;
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;

    if stats.total_messages() == 0 {
        writeln!(out, "No messages found for {}.", year)?;
        writeln!(
            out,
            "Try a different year: imessage-wrapped {}",
            year.saturating_sub(1)
        )?;
        return Ok(());
    }

    // Messages
    writeln!(out)?;
    writeln!(out, "📱 Messages")?;
    writeln!(out, "   Total:    {}", format_count(stats.total_messages()))?;
    writeln!(out, "   Sent:     {}", format_count(stats.total_sent()))?;
    writeln!(out, "   Received: {}", format_count(stats.total_received()))?;

    // Reactions
    writeln!(out)?;
    writeln!(out, "💬 Reactions")?;
    writeln!(
        out,
        "   Given:    {}",
        format_count(stats.reactions_given_total())
    )?;
    writeln!(
        out,
        "   Received: {}",
        format_count(stats.reactions_received_total())
    )?;

    // Reaction style: the built-in tapbacks you send
    writeln!(out)?;
    writeln!(out, "🏆 Your Reaction Style")?;
    let style: Vec<_> = stats
        .top_reactions_given(REACTION_STYLE_ROWS + 1)
        .into_iter()
        .filter(|(kind, _)| kind.is_builtin())
        .collect();
    if style.is_empty() {
        writeln!(out, "   (no reactions given)")?;
    } else {
        for (kind, count) in style {
            writeln!(out, "   {}  {}", kind.glyph(), format_count(count))?;
        }
    }

    // Custom emoji you send
    let customs = stats.top_custom_emoji_given(config.top_custom_emoji);
    if !customs.is_empty() {
        writeln!(out)?;
        writeln!(out, "🎯 Your Custom Reactions")?;
        for (emoji, count) in customs {
            writeln!(out, "   {}  {}", emoji, format_count(count))?;
        }
    }

    // Monthly volume
    writeln!(out)?;
    writeln!(out, "📈 Messages by Month")?;
    let max = stats.messages_by_month().iter().copied().max().unwrap_or(0);
    for (i, &count) in stats.messages_by_month().iter().enumerate() {
        writeln!(
            out,
            "   {}  {} {}",
            month_abbrev(i as u32 + 1),
            bar(count, max, config.bar_width),
            format_count(count)
        )?;
    }
    if let Some((month, count)) = stats.busiest_month() {
        writeln!(
            out,
            "   Busiest:  {} ({})",
            month_abbrev(month),
            format_count(count)
        )?;
    }

    // Everything, both directions
    let overall = stats.top_reactions_overall(config.top_reactions);
    writeln!(out)?;
    writeln!(out, "🌟 Top Reactions (All)")?;
    if overall.is_empty() {
        writeln!(out, "   (no reactions)")?;
    }
    for (label, count) in overall {
        writeln!(out, "   {}  {}", label.glyph(), format_count(count))?;
    }

    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "📊 Data from {}", source.display())?;
    writeln!(
        out,
        "🕐 Generated {}",
        generated_at.format("%Y-%m-%d %H:%M")
    )?;
    writeln!(out)?;

    Ok(())
}
