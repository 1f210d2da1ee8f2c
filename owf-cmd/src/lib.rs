//! Command implementations for the OWF CLI.
//!
//! Provides subcommands for encoding scenario dataset keys, comparing two
//! scenarios, and producing per-basin stress values joined to map features.

use anyhow::Context;
use clap::Subcommand;
use owf_geo::features::parse_features;
use owf_geo::resolver::{join_stress, BasinResolver, BASIN_CODES_CSV};
use owf_scenario::family::DatasetFamily;
use owf_scenario::scenario::ScenarioParameters;
use std::path::PathBuf;

pub mod fetch;
pub mod pipeline;

use fetch::{DirSource, ManifestSource, Source};
use pipeline::{compare, evaluate_scenario, ScenarioFault, ScenarioReport};

#[derive(Subcommand)]
pub enum Command {
    /// Print the canonical dataset key for a scenario
    Encode {
        /// Scenario in compact form, e.g. fcfs,R1,dt2,dp0,pop2030,crop2022,liv2030
        #[arg(short, long)]
        scenario: ScenarioParameters,

        /// Dataset family: meta or upper
        #[arg(long, default_value = "meta")]
        family: String,
    },

    /// Compare two scenarios: annual totals, demand composition, stress
    Compare {
        /// Left scenario in compact form
        #[arg(short, long)]
        left: ScenarioParameters,

        /// Right scenario in compact form
        #[arg(short, long)]
        right: ScenarioParameters,

        /// Dataset family: meta or upper
        #[arg(long, default_value = "meta")]
        family: String,

        /// Path to the manifest JSON mapping dataset keys to cloud file ids
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Directory of pre-downloaded dataset files, keyed by file name
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Target year for the stress index
        #[arg(long, default_value_t = 2070)]
        stress_year: i32,
    },

    /// Per-basin stress for one scenario, joined to map features
    StressMap {
        /// Scenario in compact form
        #[arg(short, long)]
        scenario: ScenarioParameters,

        /// Dataset family: meta or upper
        #[arg(long, default_value = "meta")]
        family: String,

        /// Path to the GeoJSON feature collection of basin polygons
        #[arg(short = 'g', long)]
        features: PathBuf,

        /// Feature property holding the basin identifier
        #[arg(long, default_value = "NOMBRE")]
        id_property: String,

        /// Path to a code,basin CSV when the feature set uses numeric codes
        #[arg(long)]
        codes: Option<PathBuf>,

        /// Use the embedded Meta-family code table instead of --codes
        #[arg(long, conflicts_with = "codes")]
        embedded_codes: bool,

        /// Path to the manifest JSON mapping dataset keys to cloud file ids
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Directory of pre-downloaded dataset files, keyed by file name
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Target year for the stress index
        #[arg(long, default_value_t = 2070)]
        stress_year: i32,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Encode { scenario, family } => {
            let family = family_named(&family)?;
            println!("{}", family.encode(&scenario));
            Ok(())
        }
        Command::Compare {
            left,
            right,
            family,
            manifest,
            data_dir,
            stress_year,
        } => {
            let family = family_named(&family)?;
            let source = open_source(manifest, data_dir)?;
            let report = compare(&family, &left, &right, &source, stress_year).await;
            print_report(&report.left, stress_year);
            print_report(&report.right, stress_year);
            Ok(())
        }
        Command::StressMap {
            scenario,
            family,
            features,
            id_property,
            codes,
            embedded_codes,
            manifest,
            data_dir,
            stress_year,
        } => {
            let family = family_named(&family)?;
            let source = open_source(manifest, data_dir)?;

            let feature_body = std::fs::read_to_string(&features)
                .with_context(|| format!("reading {}", features.display()))?;
            let features = parse_features(&feature_body, &id_property)?;

            let resolver = match (codes, embedded_codes) {
                (Some(path), _) => {
                    let body = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    BasinResolver::from_code_csv(&body, family.catalog().basins())?
                }
                (None, true) => {
                    BasinResolver::from_code_csv(BASIN_CODES_CSV, family.catalog().basins())?
                }
                (None, false) => BasinResolver::direct(family.catalog().basins()),
            };

            let report =
                evaluate_scenario(&family, &scenario, &source, stress_year, "Escenario 1").await;
            print_fault(&report);
            println!("# stress for {} in {stress_year}", report.key);
            for (feature_id, value) in join_stress(&report.stress, &features, &resolver) {
                println!("{feature_id},{value:.4}");
            }
            Ok(())
        }
    }
}

fn family_named(name: &str) -> anyhow::Result<DatasetFamily> {
    DatasetFamily::by_name(name)
        .ok_or_else(|| anyhow::anyhow!("unknown dataset family: {name} (expected meta or upper)"))
}

fn open_source(manifest: Option<PathBuf>, data_dir: Option<PathBuf>) -> anyhow::Result<Source> {
    match (manifest, data_dir) {
        (_, Some(dir)) => Ok(Source::Dir(DirSource::new(dir))),
        (Some(path), None) => Ok(Source::Manifest(ManifestSource::from_path(&path)?)),
        (None, None) => anyhow::bail!("either --manifest or --data-dir is required"),
    }
}

fn print_fault(report: &ScenarioReport) {
    match &report.fault {
        Some(ScenarioFault::DatasetNotFound(key)) => {
            println!("# {}: no dataset published for {key}", report.label);
        }
        Some(ScenarioFault::FetchFailed(reason)) => {
            println!("# {}: fetch failed ({reason})", report.label);
        }
        None => {}
    }
}

fn print_report(report: &ScenarioReport, stress_year: i32) {
    println!("== {} ({}) ==", report.label, report.key);
    print_fault(report);

    println!("annual supply (cmd):");
    for (year, total) in &report.annual_supply {
        println!("  {year}: {total:.1}");
    }
    println!("annual demand (cmd):");
    for (year, total) in &report.annual_demand {
        println!("  {year}: {total:.1}");
    }

    if report.composition.is_empty() {
        println!("demand composition: no data");
    } else {
        println!("demand composition:");
        for (category, percentage) in &report.composition {
            println!("  {}: {percentage:.1}%", category.label());
        }
    }

    println!("stress index ({stress_year}):");
    for (basin, value) in &report.stress {
        println!("  {basin}: {value:.3}");
    }
    println!();
}
