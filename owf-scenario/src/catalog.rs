use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Column name prefix for the supply group.
pub const SUPPLY_PREFIX: &str = "To_downstream_from_";

/// Column name suffix shared by every catalog column (cubic meters per day).
pub const COLUMN_SUFFIX: &str = "_cmd";

/// One of the five water demand use categories.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DemandCategory {
    Environmental,
    Rural,
    Urban,
    Irrigation,
    Livestock,
}

/// All demand categories in canonical presentation order.
pub const DEMAND_CATEGORIES: [DemandCategory; 5] = [
    DemandCategory::Environmental,
    DemandCategory::Rural,
    DemandCategory::Urban,
    DemandCategory::Irrigation,
    DemandCategory::Livestock,
];

impl DemandCategory {
    /// Column name prefix for this category.
    pub fn prefix(&self) -> &'static str {
        match self {
            DemandCategory::Environmental => "Denv_",
            DemandCategory::Rural => "Dfwr_",
            DemandCategory::Urban => "Dfwu_",
            DemandCategory::Irrigation => "Dirr_",
            DemandCategory::Livestock => "Dliv_",
        }
    }

    /// Display label, as published in the source datasets.
    pub fn label(&self) -> &'static str {
        match self {
            DemandCategory::Environmental => "Ambiental",
            DemandCategory::Rural => "Rural",
            DemandCategory::Urban => "Urbano",
            DemandCategory::Irrigation => "Irrigación",
            DemandCategory::Livestock => "Pecuario",
        }
    }
}

/// Semantic group of a table column.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ColumnGroup {
    /// Water flowing downstream out of a sub-basin
    Supply,
    /// Water demanded by one use category
    Demand(DemandCategory),
}

/// Static classification of table columns for one dataset family.
///
/// Built once from the family's basin set. Classification is a pure
/// prefix/suffix match; columns that belong to no group are ignored by
/// every aggregation rather than treated as errors.
#[derive(Debug, Clone)]
pub struct ColumnCatalog {
    basins: Vec<String>,
    /// column name -> (group, index into `basins`)
    by_name: HashMap<String, (ColumnGroup, usize)>,
}

impl ColumnCatalog {
    pub fn new(basins: Vec<String>) -> Self {
        let mut by_name = HashMap::new();
        for (idx, basin) in basins.iter().enumerate() {
            by_name.insert(supply_column(basin), (ColumnGroup::Supply, idx));
            for category in DEMAND_CATEGORIES {
                by_name.insert(
                    demand_column(category, basin),
                    (ColumnGroup::Demand(category), idx),
                );
            }
        }
        ColumnCatalog { basins, by_name }
    }

    /// Sub-basin identifiers, in fixture order.
    pub fn basins(&self) -> &[String] {
        &self.basins
    }

    /// Classify a column name into its group, or `None` for columns the
    /// catalog does not know about.
    pub fn classify(&self, column_name: &str) -> Option<ColumnGroup> {
        self.by_name.get(column_name).map(|(group, _)| *group)
    }

    /// The sub-basin a column belongs to, if the column is in the catalog.
    pub fn basin_of(&self, column_name: &str) -> Option<&str> {
        self.by_name
            .get(column_name)
            .map(|(_, idx)| self.basins[*idx].as_str())
    }

    /// All column names of a group, in basin order.
    pub fn columns_for(&self, group: ColumnGroup) -> Vec<String> {
        self.basins
            .iter()
            .map(|basin| match group {
                ColumnGroup::Supply => supply_column(basin),
                ColumnGroup::Demand(category) => demand_column(category, basin),
            })
            .collect()
    }
}

/// Supply column name for a sub-basin.
pub fn supply_column(basin: &str) -> String {
    format!("{SUPPLY_PREFIX}{basin}{COLUMN_SUFFIX}")
}

/// Demand column name for a category and sub-basin.
pub fn demand_column(category: DemandCategory, basin: &str) -> String {
    format!("{}{basin}{COLUMN_SUFFIX}", category.prefix())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ColumnCatalog {
        ColumnCatalog::new(vec!["Cusiana".to_string(), "Pauto".to_string()])
    }

    #[test]
    fn test_classify_supply_and_demand() {
        let catalog = catalog();
        assert_eq!(
            catalog.classify("To_downstream_from_Cusiana_cmd"),
            Some(ColumnGroup::Supply)
        );
        assert_eq!(
            catalog.classify("Denv_Pauto_cmd"),
            Some(ColumnGroup::Demand(DemandCategory::Environmental))
        );
        assert_eq!(
            catalog.classify("Dliv_Cusiana_cmd"),
            Some(ColumnGroup::Demand(DemandCategory::Livestock))
        );
    }

    #[test]
    fn test_unknown_columns_classify_to_none() {
        let catalog = catalog();
        assert_eq!(catalog.classify("Date"), None);
        assert_eq!(catalog.classify("Denv_Amazonas_cmd"), None);
        assert_eq!(catalog.classify("Qout_Cusiana_cmd"), None);
    }

    #[test]
    fn test_classify_is_a_partition() {
        // every catalog column maps back to exactly one group
        let catalog = catalog();
        let mut seen = std::collections::HashSet::new();
        for group in [
            ColumnGroup::Supply,
            ColumnGroup::Demand(DemandCategory::Environmental),
            ColumnGroup::Demand(DemandCategory::Rural),
            ColumnGroup::Demand(DemandCategory::Urban),
            ColumnGroup::Demand(DemandCategory::Irrigation),
            ColumnGroup::Demand(DemandCategory::Livestock),
        ] {
            for column in catalog.columns_for(group) {
                assert_eq!(catalog.classify(&column), Some(group));
                assert!(seen.insert(column), "column appeared in two groups");
            }
        }
        assert_eq!(seen.len(), 2 * 6);
    }

    #[test]
    fn test_basin_of() {
        let catalog = catalog();
        assert_eq!(catalog.basin_of("Dirr_Pauto_cmd"), Some("Pauto"));
        assert_eq!(catalog.basin_of("Dirr_Orinoco_cmd"), None);
    }
}
