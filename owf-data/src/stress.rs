use chrono::Datelike;
use owf_scenario::catalog::{demand_column, supply_column, ColumnCatalog, DemandCategory};
use owf_scenario::table::{TableRow, TimeSeriesTable};
use std::collections::BTreeMap;

/// Stress ratio assigned when a basin's supply is exactly zero for a record.
///
/// A saturation cap meaning "extreme stress", not a missing-data marker.
/// Inherited from the published datasets; the value itself is an open
/// question for the domain owners.
pub const ZERO_SUPPLY_STRESS: f64 = 10.0;

const NON_ENV_CATEGORIES: [DemandCategory; 4] = [
    DemandCategory::Rural,
    DemandCategory::Urban,
    DemandCategory::Irrigation,
    DemandCategory::Livestock,
];

/// Per-basin mean demand/supply ratio over one calendar year.
///
/// A basin is included only when the table carries both its environmental
/// demand column and its supply column; the other four demand columns are
/// added where present. Basins lacking the required columns are omitted
/// from the result, never reported as zero. A year with no records yields
/// an empty map.
pub fn stress_index(
    table: &TimeSeriesTable,
    catalog: &ColumnCatalog,
    year: i32,
) -> BTreeMap<String, f64> {
    let rows: Vec<&TableRow> = table
        .rows()
        .iter()
        .filter(|row| row.date.year() == year)
        .collect();
    if rows.is_empty() {
        return BTreeMap::new();
    }

    let mut index = BTreeMap::new();
    for basin in catalog.basins() {
        let env_column = demand_column(DemandCategory::Environmental, basin);
        let supply = supply_column(basin);
        if !table.has_column(&env_column) || !table.has_column(&supply) {
            continue;
        }
        let other_columns: Vec<String> = NON_ENV_CATEGORIES
            .iter()
            .map(|category| demand_column(*category, basin))
            .filter(|column| table.has_column(column))
            .collect();

        let ratio_sum: f64 = rows
            .iter()
            .map(|row| {
                let demand: f64 = row.get(&env_column).unwrap_or(0.0)
                    + other_columns
                        .iter()
                        .filter_map(|column| row.get(column))
                        .sum::<f64>();
                match row.get(&supply).unwrap_or(0.0) {
                    s if s == 0.0 => ZERO_SUPPLY_STRESS,
                    s => demand / s,
                }
            })
            .sum();
        index.insert(basin.clone(), ratio_sum / rows.len() as f64);
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use owf_scenario::table::TimeSeriesTable;

    fn catalog() -> ColumnCatalog {
        ColumnCatalog::new(vec!["Cusiana".to_string(), "Pauto".to_string()])
    }

    #[test]
    fn test_stress_mean_ratio_over_year() {
        // total demand 50, supply 100 on every 2070 record -> 0.5
        let body = "\
Date,Denv_Cusiana_cmd,Dfwr_Cusiana_cmd,To_downstream_from_Cusiana_cmd
2070-01-01,30.0,20.0,100.0
2070-06-01,30.0,20.0,100.0
2070-12-01,30.0,20.0,100.0
";
        let table = TimeSeriesTable::from_csv_str(body).unwrap();
        let index = stress_index(&table, &catalog(), 2070);
        assert_eq!(index.len(), 1);
        assert!((index["Cusiana"] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_stress_zero_supply_sentinel() {
        let body = "\
Date,Denv_Cusiana_cmd,To_downstream_from_Cusiana_cmd
2070-01-01,30.0,0.0
2070-06-01,0.0,0.0
";
        let table = TimeSeriesTable::from_csv_str(body).unwrap();
        let index = stress_index(&table, &catalog(), 2070);
        assert_eq!(index["Cusiana"], ZERO_SUPPLY_STRESS);
    }

    #[test]
    fn test_stress_missing_required_column_omits_basin() {
        // Pauto lacks its environmental demand column -> absent, not zero
        let body = "\
Date,Denv_Cusiana_cmd,To_downstream_from_Cusiana_cmd,To_downstream_from_Pauto_cmd,Dfwr_Pauto_cmd
2070-01-01,10.0,100.0,100.0,10.0
";
        let table = TimeSeriesTable::from_csv_str(body).unwrap();
        let index = stress_index(&table, &catalog(), 2070);
        assert!(index.contains_key("Cusiana"));
        assert!(!index.contains_key("Pauto"));
    }

    #[test]
    fn test_stress_missing_year_is_empty() {
        let body = "\
Date,Denv_Cusiana_cmd,To_downstream_from_Cusiana_cmd
2070-01-01,10.0,100.0
";
        let table = TimeSeriesTable::from_csv_str(body).unwrap();
        assert!(stress_index(&table, &catalog(), 2071).is_empty());
    }

    #[test]
    fn test_stress_mixed_supply_records() {
        // one zero-supply record (sentinel 10) and one ratio 0.5 -> mean 5.25
        let body = "\
Date,Denv_Cusiana_cmd,To_downstream_from_Cusiana_cmd
2070-01-01,50.0,100.0
2070-02-01,50.0,0.0
";
        let table = TimeSeriesTable::from_csv_str(body).unwrap();
        let index = stress_index(&table, &catalog(), 2070);
        assert!((index["Cusiana"] - 5.25).abs() < 1e-12);
    }
}
