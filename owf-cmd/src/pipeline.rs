//! Scenario pipeline: encode -> fetch -> derived views.
//!
//! Each comparison side is evaluated independently; a failed fetch on one
//! side degrades that side to empty views and never blocks the other.

use log::warn;
use owf_data::aggregate::{
    annual_totals, demand_composition, monthly_samples, GroupSelector, MonthlySample,
};
use owf_data::stress::stress_index;
use owf_scenario::catalog::DemandCategory;
use owf_scenario::error::OwfError;
use owf_scenario::family::{DatasetFamily, DatasetKey};
use owf_scenario::scenario::ScenarioParameters;
use owf_scenario::table::TimeSeriesTable;
use std::collections::BTreeMap;

use crate::fetch::TableSource;

/// Why a scenario side has no data. Reported alongside empty views; the
/// two kinds stay separate so "not published" and "broken retrieval" can
/// be told apart downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioFault {
    DatasetNotFound(String),
    FetchFailed(String),
}

/// All derived views for one scenario side.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub key: DatasetKey,
    pub label: String,
    pub annual_supply: BTreeMap<i32, f64>,
    pub annual_demand: BTreeMap<i32, f64>,
    pub monthly_supply: Vec<MonthlySample>,
    pub monthly_demand: Vec<MonthlySample>,
    pub composition: Vec<(DemandCategory, f64)>,
    pub stress: BTreeMap<String, f64>,
    pub fault: Option<ScenarioFault>,
}

impl ScenarioReport {
    pub fn has_data(&self) -> bool {
        self.fault.is_none()
    }
}

/// Both sides of a comparison.
#[derive(Debug, Clone)]
pub struct ComparisonReport {
    pub left: ScenarioReport,
    pub right: ScenarioReport,
}

/// Evaluate one scenario: derive its dataset key, fetch the table, and
/// compute every view. Retrieval failures are recorded on the report and
/// produce empty views rather than an error.
pub async fn evaluate_scenario<S: TableSource>(
    family: &DatasetFamily,
    params: &ScenarioParameters,
    source: &S,
    stress_year: i32,
    label: &str,
) -> ScenarioReport {
    let key = family.encode(params);
    let (table, fault) = match source.fetch(&key).await {
        Ok(table) => (table, None),
        Err(OwfError::DatasetNotFound(k)) => {
            warn!("no dataset published for {k}; continuing with empty views");
            (
                TimeSeriesTable::empty(),
                Some(ScenarioFault::DatasetNotFound(k)),
            )
        }
        Err(e) => {
            warn!("fetch failed for {key}: {e}; continuing with empty views");
            (
                TimeSeriesTable::empty(),
                Some(ScenarioFault::FetchFailed(e.to_string())),
            )
        }
    };

    let catalog = family.catalog();
    ScenarioReport {
        annual_supply: annual_totals(&table, catalog, GroupSelector::Supply),
        annual_demand: annual_totals(&table, catalog, GroupSelector::AllDemand),
        monthly_supply: monthly_samples(&table, catalog, GroupSelector::Supply, label),
        monthly_demand: monthly_samples(&table, catalog, GroupSelector::AllDemand, label),
        composition: demand_composition(&table, catalog),
        stress: stress_index(&table, catalog, stress_year),
        key,
        label: label.to_string(),
        fault,
    }
}

/// Evaluate two scenario sides concurrently.
pub async fn compare<S: TableSource>(
    family: &DatasetFamily,
    left: &ScenarioParameters,
    right: &ScenarioParameters,
    source: &S,
    stress_year: i32,
) -> ComparisonReport {
    let (left, right) = tokio::join!(
        evaluate_scenario(family, left, source, stress_year, "Escenario 1"),
        evaluate_scenario(family, right, source, stress_year, "Escenario 2"),
    );
    ComparisonReport { left, right }
}
