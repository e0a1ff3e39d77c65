use std::collections::HashMap;

use reqwest::blocking::Response;
use serde::Deserialize;
use url::form_urlencoded;

use crate::{
    AuthExchangeError, AuthExchangeResult, Error, RejectionReason, Result, TokenPair,
    OAUTH_TOKEN_KEY, OAUTH_TOKEN_SECRET_KEY,
};

/// Represents response of token acquisition.
#[derive(Deserialize, Debug)]
pub struct TokenResponse {
    /// OAuth Token
    pub oauth_token: String,
    /// OAuth Token Secret
    pub oauth_token_secret: String,
    /// Other contents
    #[serde(flatten)]
    pub remain: HashMap<String, String>,
}

impl From<TokenResponse> for TokenPair {
    fn from(resp: TokenResponse) -> Self {
        TokenPair::new(resp.oauth_token, resp.oauth_token_secret)
    }
}

/// Add parse_oauth_token feature to reqwest::blocking::Response.
pub trait TokenReader: private::Sealed {
    fn parse_oauth_token(self) -> Result<TokenResponse>;
}

impl TokenReader for Response {
    fn parse_oauth_token(self) -> Result<TokenResponse> {
        let status = self.status();
        let text = self.text()?;
        if !status.is_success() {
            return Err(reject(status.as_u16(), text).into());
        }
        Ok(read_oauth_token(text)?)
    }
}

/// Add parse_oauth_token feature to the result of `send()`.
pub trait TokenReaderChain: private::SealedWrapper {
    fn parse_oauth_token(self) -> Result<TokenResponse>;
}

impl<E> TokenReaderChain for std::result::Result<Response, E>
where
    E: Into<Error>,
{
    fn parse_oauth_token(self) -> Result<TokenResponse> {
        match self {
            Ok(resp) => resp.parse_oauth_token(),
            Err(err) => Err(err.into()),
        }
    }
}

fn read_oauth_token(text: String) -> AuthExchangeResult<TokenResponse> {
    let mut destructured = form_urlencoded::parse(text.as_bytes())
        .into_owned()
        .collect::<HashMap<String, String>>();
    // a blank value is as good as a missing one
    let oauth_token = destructured.remove(OAUTH_TOKEN_KEY).filter(|v| !v.is_empty());
    let oauth_token_secret = destructured
        .remove(OAUTH_TOKEN_SECRET_KEY)
        .filter(|v| !v.is_empty());
    match (oauth_token, oauth_token_secret) {
        (Some(t), Some(s)) => Ok(TokenResponse {
            oauth_token: t,
            oauth_token_secret: s,
            remain: destructured,
        }),
        (None, _) => Err(AuthExchangeError::TokenKeyNotFound(OAUTH_TOKEN_KEY, text)),
        (_, _) => Err(AuthExchangeError::TokenKeyNotFound(
            OAUTH_TOKEN_SECRET_KEY,
            text,
        )),
    }
}

fn reject(status: u16, message: String) -> AuthExchangeError {
    let message = message.trim().to_string();
    AuthExchangeError::Rejected {
        status,
        reason: classify_rejection(status, &message),
        message,
    }
}

// xAuth providers answer 401 for wrong user credentials, while a bad consumer
// key surfaces as a signature or consumer complaint, usually with 401 or 403.
fn classify_rejection(status: u16, message: &str) -> RejectionReason {
    let lowered = message.to_ascii_lowercase();
    if lowered.contains("consumer") || lowered.contains("signature") {
        RejectionReason::InvalidConsumer
    } else if lowered.contains("credential")
        || lowered.contains("password")
        || lowered.contains("username")
    {
        RejectionReason::InvalidCredentials
    } else if status == 401 {
        RejectionReason::InvalidCredentials
    } else {
        RejectionReason::Unknown
    }
}

mod private {
    use reqwest::blocking::Response;

    use crate::Error;

    pub trait Sealed {}
    impl Sealed for Response {}
    pub trait SealedWrapper {}
    impl<E> SealedWrapper for std::result::Result<Response, E> where E: Into<Error> {}
}
