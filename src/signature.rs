//! HMAC-SHA1 signature of a request, as described in RFC 5849 section 3.4.

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use http::Method;
use sha1::Sha1;

use crate::parameters::percent_encode;
use crate::{EncodingError, EncodingResult, Parameters};

type HmacSha1 = Hmac<Sha1>;

/// Compute the base64 encoded `oauth_signature` of a request.
///
/// `params` must already hold every protocol parameter and every query/body
/// parameter that will be sent. The result only depends on the arguments.
pub fn sign(
    method: &str,
    url: &str,
    params: &Parameters,
    consumer_secret: &str,
    token_secret: &str,
) -> EncodingResult<String> {
    let base = base_string(method, url, params)?;
    let key = signing_key(consumer_secret, token_secret);

    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| EncodingError::InvalidKey(e.to_string()))?;
    mac.update(base.as_bytes());
    Ok(BASE64_STANDARD.encode(mac.finalize().into_bytes()))
}

/// `METHOD&encode(url)&encode(parameter string)`.
pub fn base_string(method: &str, url: &str, params: &Parameters) -> EncodingResult<String> {
    let method = method.to_ascii_uppercase();
    if method.is_empty() || Method::from_bytes(method.as_bytes()).is_err() {
        return Err(EncodingError::InvalidMethod(method));
    }
    Ok(format!(
        "{}&{}&{}",
        method,
        percent_encode(url),
        percent_encode(&params.parameter_string())
    ))
}

/// `encode(consumer_secret)&encode(token_secret)`; an empty token secret leaves a trailing `&`.
pub fn signing_key(consumer_secret: &str, token_secret: &str) -> String {
    format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    )
}
