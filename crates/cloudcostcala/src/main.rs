mod bootstrap;

use anyhow::Result;
use cost_core::config::Config;
use cost_core::settings::Settings;
use cost_report::{console, excel};
use cost_runtime::pipeline::{self, SourceOutcome};

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;
    tracing::info!("cloudcostcala v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::load(&settings.config)?;

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║         CloudCostCala - Cloud Asset Inventory                ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!("\nConfiguration: {}", settings.config.display());

    let mut records = Vec::new();
    let mut sources = Vec::new();
    for (provider, path) in config.billing.configured_sources() {
        println!("\n[{provider}] Processing billing file...");
        let (loaded, outcome) = pipeline::load_source(provider, &path)?;
        match &outcome {
            SourceOutcome::Loaded { records: count, .. } => {
                println!("  ✓ Loaded {count} {provider} billing records");
            }
            SourceOutcome::Failed { .. } => {
                println!("  ✗ Skipped {provider} billing (see warning)");
            }
        }
        records.extend(loaded);
        sources.push(outcome);
    }

    // Zero loaded records aborts here, before any report is written.
    let rules = config.synthetic_unit_rules();
    let result = pipeline::process_records(records, sources, &[], &rules)?;

    println!("\n[Processing] Normalizing billing metrics...");
    println!("  ✓ Billing period: {}", result.period);
    if result.has_mixed_periods() {
        println!(
            "  ! Mixed billing periods {:?}; all normalized against {}",
            result.periods_seen, result.period
        );
    }
    let types: Vec<&str> = result.usage.keys().map(|t| t.as_str()).collect();
    println!("  ✓ Asset types found: {}", types.join(", "));

    println!("\n[Processing] Enriching assets...");
    println!("  ✓ Enriched {} asset types", result.enriched.len());

    println!("\n[Processing] Aggregating results...");
    println!();
    print!("{}", console::render_summary_table(&result.rows));

    println!("\n[Output] Generating Excel file: {}", settings.output.display());
    excel::write_excel(&settings.output, &result.rows)?;
    println!("  ✓ Excel file generated successfully!");

    println!("\n[Examples]\n");
    print!("{}", console::render_normalization_example(&result.period));
    println!();
    print!("{}", console::render_conversion_example());

    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                  Processing Complete!                        ║");
    println!("╚══════════════════════════════════════════════════════════════╝");

    Ok(())
}
