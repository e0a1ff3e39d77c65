//! One-time xAuth exchange of a user's username and password for a token pair.

use std::{fmt, io};

use dialoguer::{Input, Password};
use reqwest::blocking::Client as ReqwestClient;

use crate::{
    Config, Error, OAuthClientProvider, Result, TokenPair, TokenReaderChain, TokenStore,
    X_AUTH_MODE_CLIENT_AUTH, X_AUTH_MODE_KEY, X_AUTH_PASSWORD_KEY, X_AUTH_USERNAME_KEY,
};

/// End-user login, only held for the duration of an exchange.
#[derive(Clone)]
pub struct UserCredentials {
    username: String,
    password: String,
}

impl UserCredentials {
    pub fn new<U, P>(username: U, password: P) -> Self
    where
        U: Into<String>,
        P: Into<String>,
    {
        UserCredentials {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Something that can ask the operator for their login.
pub trait CredentialSource {
    fn credentials(&mut self) -> io::Result<UserCredentials>;
}

/// Prompts on the terminal; the password is read without echo and may be blank.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl CredentialSource for TerminalPrompt {
    fn credentials(&mut self) -> io::Result<UserCredentials> {
        let username: String = Input::new()
            .with_prompt("Instapaper email")
            .interact_text()
            .map_err(prompt_error)?;
        let password = Password::new()
            .with_prompt("Instapaper password (blank if none)")
            .allow_empty_password(true)
            .interact()
            .map_err(prompt_error)?;
        Ok(UserCredentials::new(username, password))
    }
}

fn prompt_error(err: dialoguer::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

/// Exchange `credentials` for a token pair at the provider's access token endpoint.
///
/// Nothing is persisted here and nothing is retried.
pub fn exchange(
    http: &ReqwestClient,
    config: &Config,
    credentials: &UserCredentials,
) -> Result<TokenPair> {
    let secrets = config.secrets();
    let body = [
        (X_AUTH_USERNAME_KEY, credentials.username.as_str()),
        (X_AUTH_PASSWORD_KEY, credentials.password.as_str()),
        (X_AUTH_MODE_KEY, X_AUTH_MODE_CLIENT_AUTH),
    ];

    log::debug!("requesting access token from {}", config.access_token_url());
    let resp = http
        .clone()
        .oauth1(&secrets)
        .post(config.access_token_url().clone())
        .form(&body)
        .send()
        .parse_oauth_token()?;
    log::debug!(
        "access token issued with {} extra field(s)",
        resp.remain.len()
    );
    Ok(resp.into())
}

/// Ask for the login, exchange it, and store the resulting token pair.
pub fn authenticate<S>(
    http: &ReqwestClient,
    config: &Config,
    source: &mut S,
    store: &TokenStore,
) -> Result<TokenPair>
where
    S: CredentialSource + ?Sized,
{
    let credentials = source.credentials().map_err(Error::Prompt)?;
    let tokens = exchange(http, config, &credentials)?;
    drop(credentials);
    store.save(&tokens)?;
    Ok(tokens)
}
