use thiserror::Error;

use crate::datekey::DateKey;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No data found for {0}")]
    NotFound(DateKey),

    #[error("No data found in the requested period")]
    EmptyRange,

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Sheet not found: {0}")]
    MissingDataSource(String),

    #[error("Send failed: {0}")]
    Transport(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to initialise logging: {0}")]
    Logging(String),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// True for the recoverable "nothing to report" outcomes.
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::EmptyRange | Self::MissingDataSource(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_classification() {
        assert!(AppError::NotFound(DateKey::from("2025/06/16")).is_no_data());
        assert!(AppError::EmptyRange.is_no_data());
        assert!(AppError::MissingDataSource("202512CF".into()).is_no_data());
        assert!(!AppError::InvalidRange("start after end".into()).is_no_data());
        assert!(!AppError::Transport("エラーコード: 400".into()).is_no_data());
    }

    #[test]
    fn test_missing_sheet_and_not_found_render_differently() {
        let missing = AppError::MissingDataSource("202512CF".into()).to_string();
        let not_found = AppError::NotFound(DateKey::from("2025/12/01")).to_string();
        assert_eq!(missing, "Sheet not found: 202512CF");
        assert_eq!(not_found, "No data found for 2025/12/01");
    }
}
