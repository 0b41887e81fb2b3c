//! `resgal status` — which channels point at the wrong gallery.

use std::collections::HashMap;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use resgal_core::{types::GalleryId, AccessMode, SiteStore};
use resgal_sync::{pipeline, ChannelReport, Outcome, RunOptions};

use super::{home_dir, SiteArgs};

/// Arguments for `resgal status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub site: SiteArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let home = home_dir()?;
        let resolved = self.site.resolve(&home)?;

        let mut store = SiteStore::open(&resolved.site, AccessMode::ReadOnly)
            .with_context(|| format!("failed to open site '{}'", resolved.site.display()))?;
        let options = RunOptions {
            prefix: resolved.prefix,
            dry_run: true,
        };
        let summary = pipeline::run(&mut store, &options).context("status check failed")?;

        let names: HashMap<&GalleryId, &str> = store
            .site()
            .galleries
            .iter()
            .map(|g| (&g.id, g.name.as_str()))
            .collect();
        let rows: Vec<ChannelStatus> = summary
            .channels
            .iter()
            .map(|report| ChannelStatus::from_report(report, &names))
            .collect();

        if self.json {
            print_json(rows)?;
            return Ok(());
        }
        print_table(rows);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Report rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    /// Default gallery already matches the first resolvable editor group.
    Current,
    /// A different gallery should be the default.
    Stale,
    /// No editor group has a gallery; the channel is left as it is.
    NoMatch,
}

#[derive(Debug, Clone)]
struct ChannelStatus {
    channel: String,
    signal: Signal,
    current: String,
    expected: String,
    group: String,
}

impl ChannelStatus {
    fn from_report(report: &ChannelReport, names: &HashMap<&GalleryId, &str>) -> Self {
        let signal = match report.outcome {
            Outcome::Unchanged { .. } => Signal::Current,
            Outcome::Assigned { .. } | Outcome::WouldAssign { .. } => Signal::Stale,
            Outcome::NoMatch => Signal::NoMatch,
        };
        let current = match &report.previous {
            None => "none".to_string(),
            Some(id) => names
                .get(id)
                .map(|n| n.to_string())
                .unwrap_or_else(|| format!("unknown ({id})")),
        };
        Self {
            channel: report.path.to_string(),
            signal,
            current,
            expected: report
                .outcome
                .gallery()
                .map(|g| g.name.clone())
                .unwrap_or_else(|| "—".to_string()),
            group: report
                .outcome
                .group()
                .map(|g| g.to_string())
                .unwrap_or_else(|| "—".to_string()),
        }
    }
}

#[derive(Serialize)]
struct StatusReportJson {
    summary: StatusSummaryJson,
    channels: Vec<ChannelStatusJson>,
}

#[derive(Serialize)]
struct StatusSummaryJson {
    channels: usize,
    current: usize,
    stale: usize,
    no_match: usize,
}

#[derive(Serialize)]
struct ChannelStatusJson {
    channel: String,
    status: String,
    current: String,
    expected: String,
    group: String,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "channel")]
    channel: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "current gallery")]
    current: String,
    #[tabled(rename = "expected gallery")]
    expected: String,
    #[tabled(rename = "editor group")]
    group: String,
}

fn count(rows: &[ChannelStatus], signal: Signal) -> usize {
    rows.iter().filter(|r| r.signal == signal).count()
}

fn print_json(rows: Vec<ChannelStatus>) -> Result<()> {
    let payload = StatusReportJson {
        summary: StatusSummaryJson {
            channels: rows.len(),
            current: count(&rows, Signal::Current),
            stale: count(&rows, Signal::Stale),
            no_match: count(&rows, Signal::NoMatch),
        },
        channels: rows
            .into_iter()
            .map(|row| ChannelStatusJson {
                channel: row.channel,
                status: signal_key(row.signal).to_string(),
                current: row.current,
                expected: row.expected,
                group: row.group,
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
    );
    Ok(())
}

/// Table order: stale first, then no match, then current.
fn signal_rank(signal: Signal) -> u8 {
    match signal {
        Signal::Stale => 0,
        Signal::NoMatch => 1,
        Signal::Current => 2,
    }
}

/// Rows grouped by outcome; traversal order is kept within a group.
fn grouped(mut rows: Vec<ChannelStatus>) -> Vec<ChannelStatus> {
    rows.sort_by_key(|row| signal_rank(row.signal));
    rows
}

fn print_table(rows: Vec<ChannelStatus>) {
    let stale = count(&rows, Signal::Stale);
    println!(
        "resgal v{} | {} channels | {} current | {} stale | {} no match",
        env!("CARGO_PKG_VERSION"),
        rows.len(),
        count(&rows, Signal::Current),
        stale,
        count(&rows, Signal::NoMatch),
    );

    if rows.is_empty() {
        println!("No channels found.");
        return;
    }

    println!(
        "Indicators: {} CURRENT  {} STALE  {} NO MATCH",
        signal_indicator(Signal::Current),
        signal_indicator(Signal::Stale),
        signal_indicator(Signal::NoMatch),
    );
    let table_rows: Vec<StatusTableRow> = grouped(rows)
        .into_iter()
        .map(|row| StatusTableRow {
            channel: format!("{} {}", signal_indicator(row.signal), row.channel),
            status: signal_label(row.signal).to_string(),
            current: row.current,
            expected: row.expected,
            group: row.group,
        })
        .collect();
    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("{table}");

    if stale > 0 {
        println!("Run 'resgal run' to update stale channels.");
    }
}

fn signal_key(signal: Signal) -> &'static str {
    match signal {
        Signal::Current => "current",
        Signal::Stale => "stale",
        Signal::NoMatch => "no_match",
    }
}

fn signal_label(signal: Signal) -> &'static str {
    match signal {
        Signal::Current => "CURRENT",
        Signal::Stale => "STALE",
        Signal::NoMatch => "NO MATCH",
    }
}

fn signal_indicator(signal: Signal) -> String {
    match signal {
        Signal::Current => "■".green().bold().to_string(),
        Signal::Stale => "■".yellow().bold().to_string(),
        Signal::NoMatch => "■".bright_black().bold().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(channel: &str, signal: Signal) -> ChannelStatus {
        ChannelStatus {
            channel: channel.to_string(),
            signal,
            current: "none".to_string(),
            expected: "—".to_string(),
            group: "—".to_string(),
        }
    }

    #[test]
    fn table_rows_are_grouped_by_outcome() {
        let rows = vec![
            row("/", Signal::NoMatch),
            row("/a/", Signal::Current),
            row("/b/", Signal::Stale),
            row("/c/", Signal::NoMatch),
            row("/d/", Signal::Stale),
            row("/e/", Signal::Current),
        ];
        let order: Vec<String> = grouped(rows).into_iter().map(|r| r.channel).collect();
        assert_eq!(order, vec!["/b/", "/d/", "/", "/c/", "/a/", "/e/"]);
    }
}
