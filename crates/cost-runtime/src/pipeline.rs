//! End-to-end pipeline: billing files → scored report rows.
//!
//! Providers are parsed one after another in AWS, Azure, GCP order. A
//! provider whose file fails to parse is logged and left out; an empty
//! overall record set is fatal.

use std::path::{Path, PathBuf};

use cost_core::config::Config;
use cost_core::error::{CostError, Result};
use cost_core::models::{
    BillingRecord, EnrichedRow, InventoryAsset, NormalizedUsage, Provider, ReportRow,
};
use cost_core::units::SyntheticUnitRules;
use cost_data::enrichment::{aggregate_for_output, enrich};
use cost_data::normalizer::{billing_period, distinct_periods, normalize};
use cost_data::parser::BillingParser;

// ── Public types ──────────────────────────────────────────────────────────────

/// What happened to one configured billing source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome {
    /// The file parsed; `records` rows were kept.
    Loaded {
        provider: Provider,
        path: PathBuf,
        records: usize,
    },
    /// The file could not be parsed and contributed nothing.
    Failed {
        provider: Provider,
        path: PathBuf,
        error: String,
    },
}

/// Everything a run produces, ready for the reporting layer.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Period every record was normalized against.
    pub period: String,
    /// All distinct periods seen; more than one means mixed input.
    pub periods_seen: Vec<String>,
    /// Per-source load results, in processing order.
    pub sources: Vec<SourceOutcome>,
    /// Number of billing records that made it into aggregation.
    pub record_count: usize,
    pub usage: NormalizedUsage,
    pub enriched: Vec<EnrichedRow>,
    pub rows: Vec<ReportRow>,
}

impl PipelineResult {
    /// `true` when the input mixed billing periods.
    pub fn has_mixed_periods(&self) -> bool {
        self.periods_seen.len() > 1
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parse one billing source.
///
/// A recoverable failure is logged and comes back as
/// [`SourceOutcome::Failed`] with no records.
pub fn load_source(
    provider: Provider,
    path: &Path,
) -> Result<(Vec<BillingRecord>, SourceOutcome)> {
    tracing::info!("[{}] Processing billing file {}", provider, path.display());

    match BillingParser::for_provider(provider).parse(path) {
        Ok(records) => {
            let outcome = SourceOutcome::Loaded {
                provider,
                path: path.to_path_buf(),
                records: records.len(),
            };
            Ok((records, outcome))
        }
        Err(e) if e.is_recoverable() => {
            tracing::warn!("Failed to parse {} billing: {}", provider, e);
            let outcome = SourceOutcome::Failed {
                provider,
                path: path.to_path_buf(),
                error: e.to_string(),
            };
            Ok((Vec::new(), outcome))
        }
        Err(e) => Err(e),
    }
}

/// Parse every source in order, keeping the records of those that succeed.
pub fn load_billing_records(
    sources: &[(Provider, PathBuf)],
) -> Result<(Vec<BillingRecord>, Vec<SourceOutcome>)> {
    let mut all_records = Vec::new();
    let mut outcomes = Vec::with_capacity(sources.len());

    for (provider, path) in sources {
        let (records, outcome) = load_source(*provider, path)?;
        all_records.extend(records);
        outcomes.push(outcome);
    }

    Ok((all_records, outcomes))
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Run the pipeline for every billing source in `config`.
///
/// No inventory scan exists, so the inventory is empty and every type with
/// billed usage comes out ephemeral.
pub fn run(config: &Config) -> Result<PipelineResult> {
    run_with_inventory(config, &[])
}

/// Same as [`run`] with an explicit inventory snapshot.
pub fn run_with_inventory(config: &Config, inventory: &[InventoryAsset]) -> Result<PipelineResult> {
    let (records, sources) = load_billing_records(&config.billing.configured_sources())?;
    let rules = config.synthetic_unit_rules();
    process_records(records, sources, inventory, &rules)
}

/// Normalize, enrich and score already-loaded records.
///
/// Returns [`CostError::EmptyInput`] when `records` is empty.
pub fn process_records(
    records: Vec<BillingRecord>,
    sources: Vec<SourceOutcome>,
    inventory: &[InventoryAsset],
    rules: &SyntheticUnitRules,
) -> Result<PipelineResult> {
    if records.is_empty() {
        return Err(CostError::EmptyInput);
    }

    let period = billing_period(&records).to_string();
    let periods_seen: Vec<String> = distinct_periods(&records)
        .into_iter()
        .map(str::to_string)
        .collect();
    if periods_seen.len() > 1 {
        tracing::warn!(
            "Billing records span periods {:?}; normalizing all of them against {}",
            periods_seen,
            period
        );
    }

    let usage = normalize(&records, &period);
    tracing::info!("Billing period {}: {} asset types", period, usage.len());

    let enriched = enrich(inventory, &usage, rules);
    let rows = aggregate_for_output(&enriched);
    tracing::debug!("Enriched {} asset types", enriched.len());

    Ok(PipelineResult {
        period,
        periods_seen,
        sources,
        record_count: records.len(),
        usage,
        enriched,
        rows,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
