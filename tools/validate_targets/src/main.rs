/// Target-table linter: parses the retention-target export and reports the
/// problems that bite later in reporting. Duplicate composite keys (last
/// row wins silently), entries without an age threshold (every reserved
/// hectare counts as mature+old), inert entries that can never produce a
/// summary row, and plan names outside the known set.
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use ogma_core::targets::{parse_rows, ResourcePlans, TargetKey, TargetRow, TargetTable};

// ── CLI ──────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "validate_targets",
    about = "Lint a retention-target table before it feeds a report run"
)]
struct Args {
    /// Delimited retention-target table
    #[arg(long, default_value = "data/targets.csv")]
    targets: PathBuf,

    /// Exit non-zero when duplicate keys are present
    #[arg(long)]
    strict: bool,
}

// ── Lints ────────────────────────────────────────────────────────────────────

/// Composite keys appearing more than once, with their occurrence counts.
fn duplicate_keys(rows: &[TargetRow]) -> Vec<(TargetKey, usize)> {
    let mut counts: BTreeMap<TargetKey, usize> = BTreeMap::new();
    for row in rows {
        *counts.entry(row.key()).or_default() += 1;
    }
    counts.into_iter().filter(|(_, n)| *n > 1).collect()
}

struct Lints {
    /// Entries with a target percentage but no age threshold.
    unthresholded: Vec<TargetKey>,
    /// Entries with no target percentage on either side.
    inert: Vec<TargetKey>,
}

fn lint_entries(table: &TargetTable) -> Lints {
    let mut unthresholded = Vec::new();
    let mut inert = Vec::new();
    for (key, target) in table.iter() {
        let has_pct = target.mature.target_pct.is_some() || target.old.target_pct.is_some();
        if !has_pct {
            inert.push(key.clone());
        } else if !target.has_age_threshold() {
            unthresholded.push(key.clone());
        }
    }
    Lints {
        unthresholded,
        inert,
    }
}

fn per_plan_counts(rows: &[TargetRow]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry(row.key().plan).or_insert(0usize) += 1;
    }
    counts
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    let text = fs::read_to_string(&args.targets)
        .with_context(|| format!("Cannot read {}", args.targets.display()))?;
    let rows = parse_rows(&text)
        .with_context(|| format!("Failed to parse {}", args.targets.display()))?;
    let table = TargetTable::from_rows(rows.clone());

    eprintln!(
        "[validate] {} rows, {} distinct entries",
        rows.len(),
        table.len()
    );

    let plans = ResourcePlans::standard();
    let known: Vec<&str> = plans.short_names().collect();
    for (plan, count) in per_plan_counts(&rows) {
        let tag = if known.contains(&plan.as_str()) {
            ""
        } else {
            "  [warn] not a known resource plan"
        };
        eprintln!("  {} → {} entries{}", plan, count, tag);
    }

    let duplicates = duplicate_keys(&rows);
    for (key, count) in &duplicates {
        eprintln!(
            "  [warn] {} / {} / {} / {} appears {} times — the last row wins",
            key.plan, key.disturbance, key.zone, key.option, count
        );
    }

    let lints = lint_entries(&table);
    for key in &lints.unthresholded {
        eprintln!(
            "  [note] {} / {} / {} / {} has targets but no age threshold — all reserved area will count",
            key.plan, key.disturbance, key.zone, key.option
        );
    }
    if !lints.inert.is_empty() {
        eprintln!(
            "  [note] {} entries carry no target percentage and produce no summary rows",
            lints.inert.len()
        );
    }

    if args.strict && !duplicates.is_empty() {
        bail!("{} duplicate keys in strict mode", duplicates.len());
    }

    eprintln!("[validate] Done.");
    Ok(())
}
