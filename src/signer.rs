use std::borrow::Cow;
use std::time::{SystemTime, UNIX_EPOCH};

use http::Method;
use rand::RngCore;

use crate::parameters::Parameters;
use crate::signature::sign;
use crate::{
    EncodingError, EncodingResult, Secrets, SecretsProvider, OAUTH_CONSUMER_KEY,
    OAUTH_KEY_PREFIX, OAUTH_NONCE_KEY, OAUTH_SIGNATURE_KEY, OAUTH_SIGNATURE_METHOD_KEY,
    OAUTH_TIMESTAMP_KEY, OAUTH_TOKEN_KEY, OAUTH_VERSION_KEY,
};

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// Builds `Authorization: OAuth ...` header values for one set of secrets.
#[derive(Debug, Clone)]
pub struct Signer<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    secrets: &'a TSecretsProvider,
    parameters: OAuthParameters<'a>,
}

impl<'a, TSecretsProvider> Signer<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    pub fn new(secrets: &'a TSecretsProvider, parameters: OAuthParameters<'a>) -> Self {
        Signer {
            secrets,
            parameters,
        }
    }

    /// Sign a request and return the value of its `Authorization` header.
    ///
    /// `payload` holds the query and body parameters of the request. They are
    /// covered by the signature but not repeated in the header.
    pub fn generate_signature(
        &self,
        method: &Method,
        url: &str,
        payload: &Parameters,
    ) -> EncodingResult<String> {
        if let Some((key, _)) = payload.iter().find(|(k, _)| k.starts_with(OAUTH_KEY_PREFIX)) {
            return Err(EncodingError::ReservedParameter(key.to_string()));
        }

        let (consumer_key, consumer_secret) = self.secrets.get_consumer_key_pair();
        let token_pair = self.secrets.get_token_pair_option();

        let mut oauth = Parameters::new();
        oauth.insert(OAUTH_CONSUMER_KEY, consumer_key);
        oauth.insert(OAUTH_NONCE_KEY, self.parameters.nonce_value());
        oauth.insert(OAUTH_SIGNATURE_METHOD_KEY, SIGNATURE_METHOD);
        oauth.insert(OAUTH_TIMESTAMP_KEY, self.parameters.timestamp_value()?.to_string());
        oauth.insert(OAUTH_VERSION_KEY, OAUTH_VERSION);
        if let Some((token, _)) = token_pair {
            oauth.insert(OAUTH_TOKEN_KEY, token);
        }

        let mut all = oauth.clone();
        all.extend(payload.clone());
        let token_secret = token_pair.map(|(_, s)| s).unwrap_or_default();
        log::debug!(
            "signing {} {} with {} parameter(s), token: {}",
            method,
            url,
            all.len(),
            token_pair.is_some()
        );
        let signature = sign(method.as_str(), url, &all, consumer_secret, token_secret)?;
        oauth.insert(OAUTH_SIGNATURE_KEY, signature);

        let fields = oauth
            .canonical_pairs()
            .into_iter()
            .map(|(k, v)| format!("{}=\"{}\"", k, v))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth {}", fields))
    }
}

/// Per-request protocol values. Unset values are generated on every signature.
#[derive(Debug, Clone, Default)]
pub struct OAuthParameters<'a> {
    nonce: Option<Cow<'a, str>>,
    timestamp: Option<u64>,
}

impl<'a> OAuthParameters<'a> {
    pub fn new() -> Self {
        Default::default()
    }

    /// set the oauth_nonce value
    pub fn nonce<T>(self, nonce: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            nonce: Some(nonce.into()),
            ..self
        }
    }

    /// set the oauth_timestamp value
    pub fn timestamp<T>(self, timestamp: T) -> Self
    where
        T: Into<u64>,
    {
        OAuthParameters {
            timestamp: Some(timestamp.into()),
            ..self
        }
    }

    fn nonce_value(&self) -> String {
        match self.nonce {
            Some(ref nonce) => nonce.to_string(),
            None => generate_nonce(),
        }
    }

    fn timestamp_value(&self) -> EncodingResult<u64> {
        match self.timestamp {
            Some(timestamp) => Ok(timestamp),
            None => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .map_err(|e| EncodingError::InvalidTimestamp(e.to_string())),
        }
    }
}

/// 128 random bits, hex encoded.
pub(crate) fn generate_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Build the `Authorization` header of a `POST` to `url`.
///
/// An empty `token` leaves `oauth_token` out, as needed for the token exchange.
/// `extra_params` are the body parameters of the request.
pub fn build_header(
    url: &str,
    consumer_key: &str,
    consumer_secret: &str,
    token: &str,
    token_secret: &str,
    extra_params: &Parameters,
) -> EncodingResult<String> {
    let secrets = Secrets::new(consumer_key, consumer_secret).token(token, token_secret);
    Signer::new(&secrets, OAuthParameters::new()).generate_signature(
        &Method::POST,
        url,
        extra_params,
    )
}
