use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to serialize report rows: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("Parsing errors in {errors} of {lines} lines exceed the allowed ratio {ceiling}")]
    ErrorRateExceeded {
        errors: usize,
        lines: usize,
        ceiling: f64,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
