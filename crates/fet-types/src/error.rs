use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Transport engine failed: {0}")]
    Engine(String),

    #[error("Result parse error at line {line}: {message}")]
    ResultParse { line: usize, message: String },

    #[error("Missing expansion moments: {0}")]
    MissingMoments(String),

    #[error("Numerical error: {0}")]
    Numerical(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type FetResult<T> = Result<T, FetError>;
