use thiserror::Error;

pub type SheetmarkResult<T> = Result<T, SheetmarkError>;

#[derive(Error, Debug)]
pub enum SheetmarkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Table is empty or contains no data")]
    EmptyInput,

    #[error("No campaign name found in column A")]
    MissingCampaignColumn,

    #[error("No outlet numbers found in column B")]
    MissingOutletColumn,

    #[error("Excel error: {0}")]
    Excel(String),

    #[error("Authorization error: {0}")]
    Auth(String),

    #[error("Remote spreadsheet error: {0}")]
    Remote(String),
}

impl SheetmarkError {
    /// True for failures of the remote spreadsheet or its credentials.
    ///
    /// These abort the whole operation; the caller may retry it as a unit.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SheetmarkError::Http(_) | SheetmarkError::Remote(_) | SheetmarkError::Auth(_)
        )
    }
}
