use thiserror::Error;

/// Errors of the superstore dashboard pipeline
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Order table missing, unreadable or malformed. Fatal at startup.
    #[error("data source error: {0}")]
    DataSource(String),

    /// Region code lookup table missing or not valid JSON. Fatal at startup.
    #[error("config data error: {0}")]
    ConfigData(String),

    /// Filter payload of an unexpected shape
    #[error("invalid filter value: {0}")]
    FilterValue(String),

    /// Projection could not produce a chart
    #[error("projection error: {0}")]
    Projection(String),
}

pub type DashboardResult<T> = Result<T, DashboardError>;
