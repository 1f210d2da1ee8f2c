use chrono::Datelike;
use owf_scenario::catalog::{ColumnCatalog, ColumnGroup, DemandCategory, DEMAND_CATEGORIES};
use owf_scenario::table::{TableRow, TimeSeriesTable};
use owf_utils::dates::month_label;
use serde::Serialize;
use std::collections::BTreeMap;

/// Which column group an aggregation runs over.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum GroupSelector {
    /// All supply columns
    Supply,
    /// All five demand categories together
    AllDemand,
    /// One demand category
    Demand(DemandCategory),
}

impl GroupSelector {
    /// Column names of the selected group, in catalog order.
    pub fn columns(&self, catalog: &ColumnCatalog) -> Vec<String> {
        match self {
            GroupSelector::Supply => catalog.columns_for(ColumnGroup::Supply),
            GroupSelector::AllDemand => DEMAND_CATEGORIES
                .iter()
                .flat_map(|category| catalog.columns_for(ColumnGroup::Demand(*category)))
                .collect(),
            GroupSelector::Demand(category) => catalog.columns_for(ColumnGroup::Demand(*category)),
        }
    }
}

/// Sum of a row over the given columns. Columns absent from the row
/// contribute nothing.
fn row_total(row: &TableRow, columns: &[String]) -> f64 {
    columns.iter().filter_map(|column| row.get(column)).sum()
}

/// Sum a column group per row, then sum rows by calendar year.
///
/// An empty table, or a table with no matching columns, yields an empty map.
pub fn annual_totals(
    table: &TimeSeriesTable,
    catalog: &ColumnCatalog,
    selector: GroupSelector,
) -> BTreeMap<i32, f64> {
    let columns: Vec<String> = selector
        .columns(catalog)
        .into_iter()
        .filter(|column| table.has_column(column))
        .collect();
    if columns.is_empty() {
        return BTreeMap::new();
    }
    let mut totals: BTreeMap<i32, f64> = BTreeMap::new();
    for row in table.rows() {
        *totals.entry(row.date.year()).or_insert(0.0) += row_total(row, &columns);
    }
    totals
}

/// One per-row sample for monthly distribution views (box plots).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySample {
    /// Three-letter month label from the canonical twelve-element set
    pub month: &'static str,
    /// Caller-supplied scenario label
    pub scenario: String,
    pub total: f64,
}

/// Tag each row's group total with its month label and a scenario label.
///
/// No cross-row aggregation happens here: the output feeds quartile
/// summarization downstream.
pub fn monthly_samples(
    table: &TimeSeriesTable,
    catalog: &ColumnCatalog,
    selector: GroupSelector,
    scenario_label: &str,
) -> Vec<MonthlySample> {
    let columns = selector.columns(catalog);
    table
        .rows()
        .iter()
        .map(|row| MonthlySample {
            month: month_label(&row.date),
            scenario: scenario_label.to_string(),
            total: row_total(row, &columns),
        })
        .collect()
}

/// Percentage share of total demand per use category.
///
/// Categories whose columns are missing from the table simply sum over
/// whatever is present. A grand total of zero means "no data": the result
/// is empty rather than five zero-percent entries.
pub fn demand_composition(
    table: &TimeSeriesTable,
    catalog: &ColumnCatalog,
) -> Vec<(DemandCategory, f64)> {
    let mut sums: Vec<(DemandCategory, f64)> = Vec::with_capacity(DEMAND_CATEGORIES.len());
    for category in DEMAND_CATEGORIES {
        let columns = catalog.columns_for(ColumnGroup::Demand(category));
        let total: f64 = table
            .rows()
            .iter()
            .map(|row| row_total(row, &columns))
            .sum();
        sums.push((category, total));
    }
    let grand_total: f64 = sums.iter().map(|(_, total)| total).sum();
    if grand_total == 0.0 {
        return Vec::new();
    }
    sums.into_iter()
        .map(|(category, total)| (category, total / grand_total * 100.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use owf_scenario::table::TimeSeriesTable;

    fn catalog() -> ColumnCatalog {
        ColumnCatalog::new(vec!["Cusiana".to_string(), "Pauto".to_string()])
    }

    #[test]
    fn test_annual_totals_empty_table() {
        let table = TimeSeriesTable::empty();
        let totals = annual_totals(&table, &catalog(), GroupSelector::Supply);
        assert!(totals.is_empty());
    }

    #[test]
    fn test_annual_totals_groups_by_year() {
        let body = "\
Date,To_downstream_from_Cusiana_cmd,To_downstream_from_Pauto_cmd,Denv_Cusiana_cmd
2070-01-01,100.0,50.0,7.0
2070-06-01,200.0,50.0,7.0
2071-01-01,10.0,,7.0
";
        let table = TimeSeriesTable::from_csv_str(body).unwrap();
        let totals = annual_totals(&table, &catalog(), GroupSelector::Supply);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&2070], 400.0);
        assert_eq!(totals[&2071], 10.0);
    }

    #[test]
    fn test_annual_totals_ignores_unknown_columns() {
        let body = "Date,Qout_somewhere,To_downstream_from_Cusiana_cmd\n2070-01-01,999.0,5.0\n";
        let table = TimeSeriesTable::from_csv_str(body).unwrap();
        let totals = annual_totals(&table, &catalog(), GroupSelector::Supply);
        assert_eq!(totals[&2070], 5.0);
    }

    #[test]
    fn test_monthly_samples_one_per_row() {
        let body = "\
Date,Denv_Cusiana_cmd
2070-01-15,3.0
2070-02-15,4.0
2070-02-28,5.0
";
        let table = TimeSeriesTable::from_csv_str(body).unwrap();
        let samples = monthly_samples(&table, &catalog(), GroupSelector::AllDemand, "Escenario 1");
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].month, "Ene");
        assert_eq!(samples[1].month, "Feb");
        assert_eq!(samples[2].total, 5.0);
        assert!(samples.iter().all(|s| s.scenario == "Escenario 1"));
    }

    #[test]
    fn test_demand_composition_percentages_sum_to_100() {
        let body = "\
Date,Denv_Cusiana_cmd,Dfwr_Cusiana_cmd,Dfwu_Cusiana_cmd,Dirr_Cusiana_cmd,Dliv_Cusiana_cmd
2070-01-01,10.0,20.0,30.0,25.0,15.0
";
        let table = TimeSeriesTable::from_csv_str(body).unwrap();
        let composition = demand_composition(&table, &catalog());
        assert_eq!(composition.len(), 5);
        let total: f64 = composition.iter().map(|(_, pct)| pct).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_demand_composition_known_shares() {
        // Denv sums to 10, Dfwr to 20, everything else absent or zero
        let body = "\
Date,Denv_Cusiana_cmd,Dfwr_Cusiana_cmd,Dfwu_Pauto_cmd
2070-01-01,4.0,8.0,0.0
2070-02-01,6.0,12.0,0.0
";
        let table = TimeSeriesTable::from_csv_str(body).unwrap();
        let composition = demand_composition(&table, &catalog());
        let by_category: std::collections::HashMap<_, _> = composition.into_iter().collect();
        assert!((by_category[&DemandCategory::Environmental] - 100.0 / 3.0).abs() < 1e-9);
        assert!((by_category[&DemandCategory::Rural] - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(by_category[&DemandCategory::Urban], 0.0);
        assert_eq!(by_category[&DemandCategory::Irrigation], 0.0);
        assert_eq!(by_category[&DemandCategory::Livestock], 0.0);
    }

    #[test]
    fn test_demand_composition_zero_total_is_empty() {
        let body = "Date,Denv_Cusiana_cmd,Dfwr_Cusiana_cmd\n2070-01-01,0.0,0.0\n";
        let table = TimeSeriesTable::from_csv_str(body).unwrap();
        assert!(demand_composition(&table, &catalog()).is_empty());
        assert!(demand_composition(&TimeSeriesTable::empty(), &catalog()).is_empty());
    }
}
