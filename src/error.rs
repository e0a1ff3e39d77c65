use std::{fmt, io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;
pub type EncodingResult<T> = std::result::Result<T, EncodingError>;
pub type AuthExchangeResult<T> = std::result::Result<T, AuthExchangeError>;
pub type StoreResult<T> = std::result::Result<T, StoreError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("OAuth sign failed : {0}")]
    Encoding(#[from] EncodingError),
    #[error("request failed : {0}")]
    Transport(#[from] reqwest::Error),
    #[error("token exchange failed : {0}")]
    AuthExchange(#[from] AuthExchangeError),
    #[error("token store failed : {0}")]
    Store(#[from] StoreError),
    #[error("configuration error : {0}")]
    Config(#[from] ConfigError),
    #[error("unexpected response body : {0}")]
    Decode(#[from] serde_json::Error),
    #[error("could not read credentials : {0}")]
    Prompt(#[source] io::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("parameter {0} is not a valid UTF-8 string")]
    InvalidUtf8(String),
    #[error("invalid HTTP method : {0:?}")]
    InvalidMethod(String),
    #[error("parameter {0} is reserved for the OAuth protocol")]
    ReservedParameter(String),
    #[error("invalid oauth_timestamp : {0}")]
    InvalidTimestamp(String),
    #[error("signing key rejected : {0}")]
    InvalidKey(String),
}

#[derive(Error, Debug, Clone)]
pub enum AuthExchangeError {
    #[error("response has malformed format: not found {0} in {1}")]
    TokenKeyNotFound(&'static str, String),
    #[error("provider rejected the exchange with status {status} ({reason}) : {message}")]
    Rejected {
        status: u16,
        reason: RejectionReason,
        message: String,
    },
}

/// Best-effort reading of why the provider refused a token exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// The username or password was not accepted.
    InvalidCredentials,
    /// The consumer key or secret (and thus the signature) was not accepted.
    InvalidConsumer,
    Unknown,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::InvalidCredentials => write!(f, "bad username or password"),
            RejectionReason::InvalidConsumer => write!(f, "bad consumer key or secret"),
            RejectionReason::Unknown => write!(f, "unknown reason"),
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("could not access token file {path} : {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("token file {path} is malformed : {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
    #[error("invalid value for {0} : {1}")]
    InvalidValue(&'static str, String),
}
