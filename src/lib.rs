/*!
reqwest-xauth: OAuth 1.0a request signing and xAuth token exchange for
[reqwest](https://crates.io/crates/reqwest)'s blocking client.

# Overview

The crate signs requests with HMAC-SHA1 exactly as RFC 5849 describes, exchanges
a username and password for a long-lived token pair through the xAuth extension,
and keeps that token pair between runs. Defaults target the Instapaper API.

# How to use

## One-time setup - exchanging credentials for a token pair

```no_run
use reqwest_xauth::{authenticate, Config, TerminalPrompt, TokenStore};

# fn main() -> reqwest_xauth::Result<()> {
// INSTAPAPER_CONSUMER_KEY and INSTAPAPER_CONSUMER_SECRET must be set
let config = Config::from_env()?;
let http = config.http_client()?;
let store = TokenStore::from_config(&config);

authenticate(&http, &config, &mut TerminalPrompt, &store)?;
# Ok(())
# }
```

## Signed requests with a stored token pair

```no_run
use reqwest_xauth::{Config, OAuthClientProvider, TokenStore};

# fn main() -> reqwest_xauth::Result<()> {
let config = Config::from_env()?;
let tokens = match TokenStore::from_config(&config).load()? {
    Some(tokens) => tokens,
    // not set up yet, skip the feature
    None => return Ok(()),
};
let secrets = config.secrets().token_pair(&tokens);

let resp = config
    .http_client()?
    .oauth1(&secrets)
    .post("https://www.instapaper.com/api/1.1/bookmarks/list")
    .form(&[("folder_id", "starred"), ("limit", "5")])
    .send()?;
println!("{}", resp.status());
# Ok(())
# }
```

## Just the header

```
use reqwest_xauth::{build_header, Parameters};

let body: Parameters = vec![("folder_id", "starred")].into_iter().collect();
let header = build_header(
    "https://www.instapaper.com/api/1.1/bookmarks/list",
    "consumer-key",
    "consumer-secret",
    "token",
    "token-secret",
    &body,
)
.unwrap();
assert!(header.starts_with("OAuth oauth_consumer_key=\"consumer-key\""));
```
*/
mod bookmarks;
mod client;
mod config;
mod error;
mod exchange;
mod parameters;
mod request;
mod secrets;
mod signature;
mod signer;
mod store;
mod token_reader;

// exposed to external program
pub use bookmarks::{fetch_starred, Bookmark};
pub use client::{Client, OAuthClientProvider};
pub use config::{
    Config, DEFAULT_API_BASE, DEFAULT_TOKEN_FILE, ENV_API_BASE, ENV_CONSUMER_KEY,
    ENV_CONSUMER_SECRET, ENV_LIMIT, ENV_TIMEOUT_SECS, ENV_TOKEN_FILE,
};
pub use error::{
    AuthExchangeError, AuthExchangeResult, ConfigError, ConfigResult, EncodingError,
    EncodingResult, Error, RejectionReason, Result, StoreError, StoreResult,
};
pub use exchange::{authenticate, exchange, CredentialSource, TerminalPrompt, UserCredentials};
pub use parameters::{canonical_order, percent_encode, Parameters};
pub use request::RequestBuilder;
pub use secrets::{Secrets, SecretsProvider, TokenPair};
pub use signature::{base_string, sign, signing_key};
pub use signer::{build_header, OAuthParameters, Signer};
pub use store::{TokenStore, ENV_OAUTH_TOKEN, ENV_OAUTH_TOKEN_SECRET};
pub use token_reader::{TokenReader, TokenReaderChain, TokenResponse};

// exposed constant variables
/// Represents `oauth_nonce`.
pub const OAUTH_NONCE_KEY: &str = "oauth_nonce";
/// Represents `oauth_timestamp`.
pub const OAUTH_TIMESTAMP_KEY: &str = "oauth_timestamp";
/// Represents `oauth_version`.
pub const OAUTH_VERSION_KEY: &str = "oauth_version";
/// Represents `oauth_signature`.
pub const OAUTH_SIGNATURE_KEY: &str = "oauth_signature";
/// Represents `oauth_token`.
pub const OAUTH_TOKEN_KEY: &str = "oauth_token";
/// Represents `oauth_token_secret`.
pub const OAUTH_TOKEN_SECRET_KEY: &str = "oauth_token_secret";
/// Represents `x_auth_username`.
pub const X_AUTH_USERNAME_KEY: &str = "x_auth_username";
/// Represents `x_auth_password`.
pub const X_AUTH_PASSWORD_KEY: &str = "x_auth_password";
/// Represents `x_auth_mode`.
pub const X_AUTH_MODE_KEY: &str = "x_auth_mode";

// crate-private constant variables
pub(crate) const OAUTH_KEY_PREFIX: &str = "oauth_";
pub(crate) const OAUTH_SIGNATURE_METHOD_KEY: &str = "oauth_signature_method";
pub(crate) const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
pub(crate) const X_AUTH_MODE_CLIENT_AUTH: &str = "client_auth";
