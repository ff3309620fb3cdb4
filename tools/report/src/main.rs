/// Compliance report generator: reads classified land records and the
/// retention-target table, aggregates per-landscape-unit statistics, and
/// writes one JSON report per unit (summary rows, per-operating-area rows,
/// age definitions, age-class detail, nested park report) plus a run
/// manifest.
///
/// Records arrive as a JSON array of classified records; targets as the
/// delimited table export. Records without a seral tag are classified here
/// against the target thresholds before aggregation.
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use ogma_core::age::seral_for_target;
use ogma_core::breakdown::{age_class_breakdown, AgeClassRow};
use ogma_core::overrides::PolicyOverrides;
use ogma_core::record::ClassifiedRecord;
use ogma_core::stats::{LandscapeInventory, UnitStatistics};
use ogma_core::summary::{
    effective_option, summarize_unit, AgeDefinition, Standing, SummaryContext, SummaryRow,
    UnitSummary,
};
use ogma_core::targets::{ResourcePlans, TargetTable};

// ── CLI ──────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "report",
    about = "Aggregate classified land records into per-unit OGMA compliance reports"
)]
struct Args {
    /// JSON array of classified land records
    #[arg(long, default_value = "data/records.json")]
    records: PathBuf,

    /// Delimited retention-target table
    #[arg(long, default_value = "data/targets.csv")]
    targets: PathBuf,

    /// Resource-area (TSA) name; selects the policy overrides that apply
    #[arg(long)]
    resource_area: String,

    /// Output directory (created if absent)
    #[arg(short, long, default_value = "reports")]
    output: PathBuf,

    /// Process only this landscape unit (omit to process all units)
    #[arg(long)]
    unit: Option<String>,
}

// ── Report schema ────────────────────────────────────────────────────────────

/// One summary row with its derived compliance figures written out.
#[derive(Serialize)]
struct RowReport {
    disturbance_type: String,
    zone: String,
    bio_option: String,
    area_ha: f64,
    ogma_area_ha: f64,
    corridor_area_ha: f64,
    mature_old_area_ha: f64,
    mature_old_pct: f64,
    mature_old_target_pct: Option<f64>,
    mature_old_target_ha: Option<f64>,
    mature_old_surplus_ha: Option<f64>,
    mature_old_standing: Option<Standing>,
    mature_old_corridor_ha: Option<f64>,
    old_area_ha: f64,
    old_pct: f64,
    old_target_pct: Option<f64>,
    old_target_ha: Option<f64>,
    old_surplus_ha: Option<f64>,
    old_standing: Option<Standing>,
    old_corridor_area_ha: f64,
}

fn row_report(row: &SummaryRow) -> RowReport {
    RowReport {
        disturbance_type: row.disturbance_type.clone(),
        zone: row.zone.clone(),
        bio_option: row.bio_option.clone(),
        area_ha: row.area_ha,
        ogma_area_ha: row.ogma_area_ha,
        corridor_area_ha: row.corridor_area_ha,
        mature_old_area_ha: row.mature_old_area_ha,
        mature_old_pct: row.mature_old_pct,
        mature_old_target_pct: row.mature_old_target_pct,
        mature_old_target_ha: row.mature_old_target_ha(),
        mature_old_surplus_ha: row.mature_old_surplus_ha(),
        mature_old_standing: row.mature_old_standing(),
        mature_old_corridor_ha: row.mature_old_corridor_ha,
        old_area_ha: row.old_area_ha,
        old_pct: row.old_pct,
        old_target_pct: row.old_target_pct,
        old_target_ha: row.old_target_ha(),
        old_surplus_ha: row.old_surplus_ha(),
        old_standing: row.old_standing(),
        old_corridor_area_ha: row.old_corridor_area_ha,
    }
}

#[derive(Serialize)]
struct UnitReport {
    unit_name: String,
    unit_number: String,
    resource_plan: String,
    area_ha: f64,
    rows: Vec<RowReport>,
    operating_areas: BTreeMap<String, Vec<RowReport>>,
    age_definitions: Vec<AgeDefinition>,
    age_classes: Vec<AgeClassRow>,
    park: Option<Box<UnitReport>>,
}

#[derive(Serialize)]
struct Manifest {
    resource_area: String,
    target_entries: usize,
    units: usize,
    parks: usize,
    total_area_ha: f64,
}

// ── Report assembly ──────────────────────────────────────────────────────────

/// Classify records that arrived without a seral tag, using the target
/// thresholds for their combination. Returns the number classified.
fn derive_seral_stages(
    records: &mut [ClassifiedRecord],
    targets: &TargetTable,
    plans: &ResourcePlans,
) -> Result<usize> {
    let mut derived = 0usize;
    for record in records.iter_mut() {
        if record.seral.is_some() {
            continue;
        }
        let plan = plans.short_name(&record.resource_plan).with_context(|| {
            format!(
                "record in unit {} carries an unknown resource plan",
                record.unit_name
            )
        })?;
        let option = record.bio_option.to_uppercase();
        let target = targets
            .lookup(
                plan,
                &record.disturbance_type,
                &record.zone,
                effective_option(&option),
            )
            .with_context(|| format!("classifying a record in unit {}", record.unit_name))?;
        record.seral = seral_for_target(record.age_class, target);
        derived += 1;
    }
    Ok(derived)
}

/// Summarize one unit (and its park, recursively) into the report shape.
fn build_unit_report(unit: &UnitStatistics, ctx: &SummaryContext) -> Result<UnitReport> {
    let summary =
        summarize_unit(unit, ctx).with_context(|| format!("summarizing unit {}", unit.name))?;
    let UnitSummary {
        unit_name,
        unit_number,
        rows,
        operating_areas,
        age_definitions,
    } = summary;

    let park = match unit.park() {
        Some(park) => Some(Box::new(build_unit_report(park, ctx)?)),
        None => None,
    };

    Ok(UnitReport {
        unit_name,
        unit_number,
        resource_plan: unit.resource_plan.clone(),
        area_ha: unit.area(),
        rows: rows.iter().map(row_report).collect(),
        operating_areas: operating_areas
            .iter()
            .map(|(oa, list)| (oa.clone(), list.iter().map(row_report).collect()))
            .collect(),
        age_definitions,
        age_classes: age_class_breakdown(unit),
        park,
    })
}

/// Filesystem-safe stem from a unit name: ASCII alphanumerics kept
/// lower-cased, every other run of characters becomes one underscore.
fn file_stem(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut gap = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if gap && !out.is_empty() {
                out.push('_');
            }
            gap = false;
            out.push(c.to_ascii_lowercase());
        } else {
            gap = true;
        }
    }
    if out.is_empty() {
        "unit".to_string()
    } else {
        out
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    let target_text = fs::read_to_string(&args.targets)
        .with_context(|| format!("Cannot read {}", args.targets.display()))?;
    let targets = TargetTable::parse(&target_text)
        .with_context(|| format!("Failed to parse {}", args.targets.display()))?;
    eprintln!("[report] {} target entries", targets.len());

    let records_text = fs::read_to_string(&args.records)
        .with_context(|| format!("Cannot read {}", args.records.display()))?;
    let mut records: Vec<ClassifiedRecord> =
        serde_json::from_str(&records_text).context("Failed to parse records JSON")?;
    eprintln!("[report] {} classified records", records.len());

    let plans = ResourcePlans::standard();
    let derived = derive_seral_stages(&mut records, &targets, &plans)?;
    if derived > 0 {
        eprintln!("[report] Classified {} untagged records", derived);
    }

    let mut inventory = LandscapeInventory::new();
    inventory.ingest_all(&records);
    inventory.finalize();
    eprintln!("[report] {} landscape units", inventory.len());

    let overrides = PolicyOverrides::standard();
    let ctx = SummaryContext {
        targets: &targets,
        plans: &plans,
        overrides: &overrides,
        resource_area: &args.resource_area,
    };

    fs::create_dir_all(&args.output)
        .with_context(|| format!("Cannot create {}", args.output.display()))?;

    let mut written = 0usize;
    let mut parks = 0usize;
    let mut total_area = 0.0f64;
    for unit in inventory.units() {
        if let Some(ref filter) = args.unit {
            if &unit.name != filter {
                continue;
            }
        }

        let report = build_unit_report(unit, &ctx)?;
        total_area += report.area_ha;
        if report.park.is_some() {
            parks += 1;
        }

        let out_path = args.output.join(format!("{}.json", file_stem(&unit.name)));
        fs::write(&out_path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("Write failed: {}", out_path.display()))?;

        eprintln!(
            "  {} ({}) → {} rows, {} operating areas{}",
            report.unit_name,
            report.unit_number,
            report.rows.len(),
            report.operating_areas.len(),
            if report.park.is_some() { ", park attached" } else { "" }
        );
        written += 1;
    }

    let manifest = Manifest {
        resource_area: args.resource_area.clone(),
        target_entries: targets.len(),
        units: written,
        parks,
        total_area_ha: total_area,
    };
    fs::write(
        args.output.join("manifest.json"),
        serde_json::to_string_pretty(&manifest)?,
    )?;

    eprintln!(
        "[report] Done — {} unit reports in {}",
        written,
        args.output.display()
    );
    Ok(())
}
