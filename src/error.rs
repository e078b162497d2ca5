use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("data conversion error: {0}")]
    Conversion(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A report name that is not part of the catalog.
    #[error("unknown report: {0}")]
    UnknownReport(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
