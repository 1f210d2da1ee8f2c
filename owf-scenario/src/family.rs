use crate::catalog::ColumnCatalog;
use crate::error::Result;
use crate::scenario::{Policy, ScenarioParameters};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Embedded basin set for the Meta river family (27 sub-basins).
pub static BASINS_META_CSV: &str = include_str!("../fixtures/basins_meta.csv");

/// Embedded basin set for the upper-basin family (17 sub-basins).
pub static BASINS_UPPER_CSV: &str = include_str!("../fixtures/basins_upper.csv");

/// Canonical identifier of a published scenario dataset.
///
/// Derived deterministically from scenario parameters; the sole key used
/// for manifest lookup and caching.
#[derive(Debug, PartialEq, Eq, Clone, Hash, Serialize, Deserialize)]
pub struct DatasetKey(String);

impl DatasetKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a dataset family spells scenario parameters in its file names.
///
/// The published families diverged here over time; the scheme is explicit
/// configuration so the divergence lives in one place.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum NamingScheme {
    /// `OWF_FCFS_R1_DT2_DP100_FW2030_Irr2022_Liv2030.csv`: uppercase codes,
    /// precipitation as an absolute percentage (100 + delta), replica
    /// segment when the scenario carries one.
    Classic,
    /// `owf_fcfs_t2_p0_f2030_c2022_l2030.csv`: lowercase codes, signed
    /// precipitation delta (`pn10` for -10), no replica segment.
    Compact,
}

impl NamingScheme {
    fn encode(&self, params: &ScenarioParameters) -> String {
        match self {
            NamingScheme::Classic => {
                let policy = match params.policy {
                    Policy::Fcfs => "FCFS",
                    Policy::PolicyEnforced => "PE",
                };
                let replica = params
                    .replica
                    .map(|r| format!("{}_", r.code()))
                    .unwrap_or_default();
                format!(
                    "OWF_{policy}_{replica}DT{}_DP{}_FW{}_Irr{}_Liv{}.csv",
                    params.temperature_delta,
                    100 + i16::from(params.precipitation_delta),
                    params.population_year.year(),
                    params.crop_year.year(),
                    params.livestock_year.year()
                )
            }
            NamingScheme::Compact => {
                let policy = match params.policy {
                    Policy::Fcfs => "fcfs",
                    Policy::PolicyEnforced => "pe",
                };
                let precip = if params.precipitation_delta < 0 {
                    format!("pn{}", params.precipitation_delta.unsigned_abs())
                } else {
                    format!("p{}", params.precipitation_delta)
                };
                format!(
                    "owf_{policy}_t{}_{precip}_f{}_c{}_l{}.csv",
                    params.temperature_delta,
                    params.population_year.year(),
                    params.crop_year.year(),
                    params.livestock_year.year()
                )
            }
        }
    }
}

/// Configuration for one published dataset family: its key naming scheme
/// and its sub-basin set (and therefore its column catalog).
#[derive(Debug, Clone)]
pub struct DatasetFamily {
    name: String,
    scheme: NamingScheme,
    catalog: ColumnCatalog,
}

impl DatasetFamily {
    pub fn new(name: &str, scheme: NamingScheme, basins: Vec<String>) -> Self {
        DatasetFamily {
            name: name.to_string(),
            scheme,
            catalog: ColumnCatalog::new(basins),
        }
    }

    /// The full Meta river basin family (classic naming, 27 sub-basins).
    pub fn meta() -> Self {
        let basins = parse_basin_csv(BASINS_META_CSV).expect("embedded meta basin fixture");
        DatasetFamily::new("meta", NamingScheme::Classic, basins)
    }

    /// The upper-basin family (compact naming, 17 sub-basins, no replicas).
    pub fn upper() -> Self {
        let basins = parse_basin_csv(BASINS_UPPER_CSV).expect("embedded upper basin fixture");
        DatasetFamily::new("upper", NamingScheme::Compact, basins)
    }

    /// Look up a built-in family by name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "meta" => Some(DatasetFamily::meta()),
            "upper" => Some(DatasetFamily::upper()),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn catalog(&self) -> &ColumnCatalog {
        &self.catalog
    }

    /// Encode scenario parameters into the family's dataset key.
    ///
    /// Total and deterministic: identical parameters always yield the
    /// identical key.
    pub fn encode(&self, params: &ScenarioParameters) -> DatasetKey {
        DatasetKey(self.scheme.encode(params))
    }
}

/// Parse a one-column basin fixture CSV (header `basin`) into basin names.
pub fn parse_basin_csv(csv_object: &str) -> Result<Vec<String>> {
    let mut basins: Vec<String> = Vec::new();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_object.as_bytes());
    for row in rdr.records() {
        let record = row?;
        if let Some(name) = record.get(0) {
            let name = name.trim();
            if !name.is_empty() {
                basins.push(name.to_string());
            }
        }
    }
    Ok(basins)
}
