use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

use tier_merge::config::{Config, ConfigOverrides};
use tier_merge::observability::init_logging;
use tier_merge::{OutputOrder, Pipeline, PipelineResult, Tier};

#[derive(Parser)]
#[command(name = "tier_merge")]
#[command(about = "Merge tiered risk-assessment CSV exports into one classified CSV")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load, merge, deduplicate, classify and write the output CSV
    Run {
        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Tier export to load; repeat for several, loaded in the given order
        #[arg(long = "source")]
        sources: Vec<PathBuf>,
        /// Business-impact reference CSV
        #[arg(long)]
        impact: Option<PathBuf>,
        /// Output CSV path
        #[arg(long)]
        output: Option<PathBuf>,
        /// Output record order
        #[arg(long, value_enum)]
        order: Option<OutputOrder>,
        /// Write a JSON run report here
        #[arg(long)]
        report: Option<PathBuf>,
        /// Also write JSON logs to this directory
        #[arg(long)]
        log_dir: Option<PathBuf>,
    },
    /// Print the tier inferred from each path
    Tiers {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

fn print_summary(result: &PipelineResult) {
    println!("\n📊 Merge results:");
    for source in &result.sources {
        println!("   {} [{}]: {} rows", source.path, source.tier, source.rows);
    }
    println!("   Impact index: {} domains", result.impact_entries);
    println!("   Rows loaded: {}", result.rows_loaded);
    println!("   Unique domains: {}", result.unique_domains);
    println!("   Duplicates dropped: {}", result.duplicates_dropped);

    let failed: Vec<_> = result.failed_sources().collect();
    if !failed.is_empty() {
        println!("\n⚠️  Unreadable sources:");
        for source in failed {
            println!("   - {}: {}", source.path, source.error.as_deref().unwrap_or_default());
        }
    }

    match (&result.output_sha256, &result.write_error) {
        (Some(digest), _) => {
            println!("   Output file: {} ({} records)", result.output_file, result.records_written);
            println!("   sha256: {}", digest);
        }
        (None, Some(e)) => println!("❌ Output not written: {}", e),
        (None, None) => {}
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            sources,
            impact,
            output,
            order,
            report,
            log_dir,
        } => {
            let settings = match &config {
                Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
                None => Config::default(),
            }
            .apply_overrides(ConfigOverrides {
                sources,
                impact,
                output,
                order,
                report,
                log_dir,
            });

            let _guard = init_logging(settings.log_dir.as_deref());
            info!("Starting merge run");

            let result = Pipeline::with_csv_files().run(&settings.pipeline_config());
            print_summary(&result);

            if let Some(report_path) = &settings.report {
                match result.write_report(report_path) {
                    Ok(()) => info!("Run report written to {}", report_path.display()),
                    Err(e) => warn!("Failed to write run report {}: {}", report_path.display(), e),
                }
            }
        }
        Commands::Tiers { paths } => {
            for path in paths {
                println!("{}\t{}", Tier::from_path(&path), path.display());
            }
        }
    }
    Ok(())
}
