use reqwest::StatusCode;
use std::{error::Error, fmt};

#[derive(Debug)]
pub enum ApiError {
    /// Game id was empty; nothing was sent.
    EmptyGameId,
    /// `.` or `..`, which the URL resolver would collapse into a different route.
    InvalidGameId(String),
    InvalidBaseUrl(String),
    Transport(reqwest::Error),
    Decode {
        status: StatusCode,
        source: serde_json::Error,
    },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::EmptyGameId => write!(f, "game id must not be empty"),
            ApiError::InvalidGameId(id) => write!(f, "invalid game id: {:?}", id),
            ApiError::InvalidBaseUrl(url) => write!(f, "invalid server url: {}", url),
            ApiError::Transport(e) => write!(f, "network error: {}", e),
            ApiError::Decode { status, source } => {
                write!(f, "malformed response (status {}): {}", status, source)
            }
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ApiError::Transport(e) => Some(e),
            ApiError::Decode { source, .. } => Some(source),
            ApiError::EmptyGameId | ApiError::InvalidGameId(_) | ApiError::InvalidBaseUrl(_) => {
                None
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e)
    }
}
