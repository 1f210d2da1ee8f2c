use crate::features::BasinFeature;
use csv::ReaderBuilder;
use log::warn;
use owf_scenario::error::{OwfError, Result};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Embedded code table for the Meta family feature set (numeric polygon
/// codes to basin names).
pub static BASIN_CODES_CSV: &str = include_str!("../fixtures/basin_codes.csv");

/// Maps the basin identifiers used in scenario tables to the identifiers
/// used by a geospatial feature set.
///
/// Never guesses: an identifier the strategy cannot account for resolves
/// to `None`, and the join renders it as neutral stress rather than
/// attaching it to an arbitrary polygon.
#[derive(Debug, Clone)]
pub enum BasinResolver {
    /// Both sides already use the same human-readable basin names.
    Direct(HashSet<String>),
    /// The feature set carries codes; basin name -> feature code.
    CodeTable(HashMap<String, String>),
}

impl BasinResolver {
    /// Identity resolution over a known basin set.
    pub fn direct(basins: &[String]) -> Self {
        BasinResolver::Direct(basins.iter().cloned().collect())
    }

    /// Build a code-table resolver from a `code,basin` CSV.
    ///
    /// Validated at load time against the dataset family's basin set:
    /// entries naming unknown basins fail the load and are listed in the
    /// error, so spelling drift in the table is caught before any join.
    pub fn from_code_csv(csv_object: &str, known_basins: &[String]) -> Result<Self> {
        let known: HashSet<&str> = known_basins.iter().map(String::as_str).collect();
        let mut table: HashMap<String, String> = HashMap::new();
        let mut unknown: Vec<String> = Vec::new();

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(csv_object.as_bytes());
        for row in rdr.records() {
            let record = row?;
            let code = record
                .get(0)
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .ok_or_else(|| OwfError::CodeTable("row with empty code".to_string()))?;
            let basin = record
                .get(1)
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .ok_or_else(|| OwfError::CodeTable(format!("code {code} has no basin name")))?;
            if !known.contains(basin) {
                unknown.push(basin.to_string());
                continue;
            }
            table.insert(basin.to_string(), code.to_string());
        }

        if !unknown.is_empty() {
            return Err(OwfError::CodeTable(format!(
                "entries name basins outside the family set: {}",
                unknown.join(", ")
            )));
        }
        Ok(BasinResolver::CodeTable(table))
    }

    /// Resolve a table-side basin identifier to the feature-side one.
    pub fn resolve(&self, basin: &str) -> Option<&str> {
        match self {
            BasinResolver::Direct(known) => known.get(basin).map(String::as_str),
            BasinResolver::CodeTable(table) => table.get(basin).map(String::as_str),
        }
    }
}

/// Join per-basin stress values onto map features, in feature order.
///
/// Features whose identifier no stressed basin resolves to get a neutral
/// 0.0, never a borrowed value from another basin.
pub fn join_stress(
    stress: &BTreeMap<String, f64>,
    features: &[BasinFeature],
    resolver: &BasinResolver,
) -> Vec<(String, f64)> {
    let mut by_feature_id: HashMap<&str, f64> = HashMap::new();
    for (basin, value) in stress {
        match resolver.resolve(basin) {
            Some(feature_id) => {
                by_feature_id.insert(feature_id, *value);
            }
            None => warn!("basin {basin} does not resolve to any map feature"),
        }
    }
    features
        .iter()
        .map(|feature| {
            let value = by_feature_id
                .get(feature.basin_id.as_str())
                .copied()
                .unwrap_or(0.0);
            (feature.basin_id.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn basins() -> Vec<String> {
        vec!["Cusiana".to_string(), "Pauto".to_string()]
    }

    fn feature(id: &str) -> BasinFeature {
        BasinFeature {
            basin_id: id.to_string(),
            geometry: Value::Null,
        }
    }

    #[test]
    fn test_direct_resolution() {
        let resolver = BasinResolver::direct(&basins());
        assert_eq!(resolver.resolve("Cusiana"), Some("Cusiana"));
        assert_eq!(resolver.resolve("Orinoco"), None);
    }

    #[test]
    fn test_code_table_resolution() {
        let csv = "code,basin\n4,Cusiana\n24,Pauto\n";
        let resolver = BasinResolver::from_code_csv(csv, &basins()).unwrap();
        assert_eq!(resolver.resolve("Cusiana"), Some("4"));
        assert_eq!(resolver.resolve("Pauto"), Some("24"));
        assert_eq!(resolver.resolve("Humea"), None);
    }

    #[test]
    fn test_code_table_rejects_unknown_basins() {
        let csv = "code,basin\n4,Cusiana\n99,Amazonas\n";
        let err = BasinResolver::from_code_csv(csv, &basins()).unwrap_err();
        assert!(err.to_string().contains("Amazonas"));
    }

    #[test]
    fn test_embedded_code_table_covers_meta_family() {
        let family = owf_scenario::family::DatasetFamily::meta();
        let resolver =
            BasinResolver::from_code_csv(BASIN_CODES_CSV, family.catalog().basins()).unwrap();
        for basin in family.catalog().basins() {
            assert!(resolver.resolve(basin).is_some(), "no code for {basin}");
        }
    }

    #[test]
    fn test_join_stress_neutral_for_unresolved() {
        let resolver = BasinResolver::direct(&basins());
        let mut stress = BTreeMap::new();
        stress.insert("Cusiana".to_string(), 0.5);
        stress.insert("Orinoco".to_string(), 9.0); // resolves nowhere

        let features = vec![feature("Cusiana"), feature("Pauto")];
        let joined = join_stress(&stress, &features, &resolver);
        assert_eq!(joined, vec![
            ("Cusiana".to_string(), 0.5),
            ("Pauto".to_string(), 0.0),
        ]);
    }
}
