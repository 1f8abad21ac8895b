use crate::domain::ports::Extras;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WalletError>;

#[derive(Error, Debug)]
pub enum WalletError {
    /// Required merchant identity or other upstream configuration is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// The wallet platform reported a failure code instead of a result.
    #[error("Wallet platform failed with code {code}")]
    Platform { code: i32, extras: Extras },
    #[error("Unknown sheet control: {0}")]
    UnknownControl(String),
    #[error("Unknown line item '{item}' in control '{control}'")]
    UnknownLineItem { control: String, item: String },
    #[error("Duplicate sheet control: {0}")]
    DuplicateControl(String),
    #[error("Duplicate line item '{item}' in control '{control}'")]
    DuplicateLineItem { control: String, item: String },
    #[error("Sheet control '{0}' is of the wrong kind")]
    WrongControlKind(String),
    #[error("Invalid payment payload: {0}")]
    Payload(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl WalletError {
    pub fn platform(code: i32, extras: Extras) -> Self {
        Self::Platform { code, extras }
    }
}
