use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeederError {
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for SeederError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Io(_) => SeederError::SourceUnavailable(err.to_string()),
            _ => SeederError::MalformedInput(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SeederError>;
