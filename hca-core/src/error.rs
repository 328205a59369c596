/// Error types for the heat allocator core library
use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for core operations
#[derive(Error, Debug)]
pub enum HcaError {
    /// Date string could not be parsed
    #[error("Failed to parse date: {0}")]
    DateParse(String),

    /// Season label string could not be parsed
    #[error("Failed to parse season label: {0}")]
    SeasonParse(String),

    /// A heating period whose start falls after its end
    #[error("Heating period starts {start} after it ends {end}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },

    /// A reading with this date is already present in the log
    #[error("A reading for {0} already exists")]
    DuplicateReading(NaiveDate),

    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// Temperature series data did not match the expected shape
    #[error("Malformed temperature series: {0}")]
    MalformedSeries(String),

    /// HTTP request failed
    #[cfg(feature = "api")]
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
}

/// Type alias for Results using HcaError
pub type Result<T> = std::result::Result<T, HcaError>;
