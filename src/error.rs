use thiserror::Error;

#[derive(Error, Debug)]
pub enum CipherForgeError {
    #[error("Length Mismatch: '{from}' has {from_len} symbols but '{to}' has {to_len}")]
    LengthMismatch {
        from: String,
        to: String,
        from_len: usize,
        to_len: usize,
    },

    #[error("Infeasible: {0}")]
    Infeasible(String),

    #[error("Empty Model: {0}")]
    EmptyModel(String),

    #[error("Unknown Symbol: '{symbol}' is not part of the {alphabet} alphabet")]
    UnknownSymbol { symbol: char, alphabet: &'static str },

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Pattern Error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),
}

pub type CfResult<T> = Result<T, CipherForgeError>;
