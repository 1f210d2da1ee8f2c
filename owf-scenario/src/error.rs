/// Error types for the OWF scenario library
use thiserror::Error;

/// Main error type for OWF scenario operations
#[derive(Error, Debug)]
pub enum OwfError {
    /// The encoded dataset key has no published dataset behind it.
    /// Distinct from a transport failure: the manifest simply does not
    /// list this scenario combination.
    #[error("no dataset published for key: {0}")]
    DatasetNotFound(String),

    /// Transport or decode failure while retrieving a dataset
    #[error("failed to fetch dataset {key}: {reason}")]
    Fetch { key: String, reason: String },

    /// Failed to parse CSV data
    #[error("failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// Date parsing failed
    #[error("failed to parse date: {0}")]
    DateParse(String),

    /// A scenario parameter was outside its allowed range
    #[error("invalid scenario parameter: {0}")]
    InvalidParameter(String),

    /// A basin code table entry named a basin outside the dataset family
    #[error("invalid basin code table: {0}")]
    CodeTable(String),

    /// Geospatial feature file could not be interpreted
    #[error("invalid feature collection: {0}")]
    FeatureParse(String),

    /// Dataset manifest could not be interpreted
    #[error("invalid manifest: {0}")]
    Manifest(String),
}

/// Type alias for Results using OwfError
pub type Result<T> = std::result::Result<T, OwfError>;
