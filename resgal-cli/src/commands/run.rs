//! `resgal run` — reconcile every channel of the site.

use anyhow::{Context, Result};
use clap::Args;

use resgal_sync::{pipeline, Outcome, RunOptions, RunSummary};

use super::{home_dir, SiteArgs};

/// Arguments for `resgal run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub site: SiteArgs,

    /// Show what would change without writing to the site.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the run summary as JSON.
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        let home = home_dir()?;
        let resolved = self.site.resolve(&home)?;
        let options = RunOptions {
            prefix: resolved.prefix,
            dry_run: self.dry_run,
        };

        let summary = pipeline::run_site(&resolved.site, &options).with_context(|| {
            format!("reconcile failed for '{}'", resolved.site.display())
        })?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).context("failed to serialize run JSON")?
            );
            return Ok(());
        }

        let site_name = resolved
            .site
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| resolved.site.display().to_string());
        print_summary(&site_name, &summary);
        Ok(())
    }
}

fn print_summary(site_name: &str, summary: &RunSummary) {
    let prefix = if summary.dry_run { "[dry-run] " } else { "" };

    if summary.changed() == 0 {
        println!(
            "{prefix}✓ '{site_name}' — nothing to do ({} channels, {} unchanged, {} without gallery)",
            summary.channels.len(),
            summary.unchanged(),
            summary.unmatched(),
        );
    } else {
        println!(
            "{prefix}✓ '{site_name}' reconciled ({} changed, {} unchanged, {} without gallery)",
            summary.changed(),
            summary.unchanged(),
            summary.unmatched(),
        );
    }

    for report in &summary.channels {
        match &report.outcome {
            Outcome::Assigned { gallery, .. } => {
                println!("  ✎  {} → {}", report.path, gallery.name)
            }
            Outcome::WouldAssign { gallery, .. } => {
                println!("  ~  {} → {}", report.path, gallery.name)
            }
            Outcome::Unchanged { .. } | Outcome::NoMatch => {}
        }
    }

    if !summary.groups_without_gallery.is_empty() {
        let names: Vec<String> = summary
            .groups_without_gallery
            .iter()
            .map(|g| g.to_string())
            .collect();
        println!("  ·  groups without a gallery: {}", names.join(", "));
    }
}
