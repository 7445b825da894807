use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid selector '{pattern}': {message}")]
    Selector { pattern: String, message: String },

    #[error("Response body from {url} is not valid UTF-8: {source}")]
    BodyDecode {
        url: String,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("Fetch cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
