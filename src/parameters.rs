use std::cmp::Ordering;

use percent_encoding::{percent_decode, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::{EncodingError, EncodingResult};

/// Everything except the RFC 3986 unreserved characters `ALPHA / DIGIT / "-" / "." / "_" / "~"`.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a string as OAuth 1.0a requires (RFC 5849 section 3.6).
pub fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, OAUTH_ENCODE_SET).to_string()
}

/// Canonical ordering of encoded parameters: byte-wise by key, then by value.
pub fn canonical_order(a: &(String, String), b: &(String, String)) -> Ordering {
    a.0.as_bytes()
        .cmp(b.0.as_bytes())
        .then_with(|| a.1.as_bytes().cmp(b.1.as_bytes()))
}

/// Request parameters of a single call, in insertion order.
///
/// Ordering is irrelevant while the set is built up; the canonical order is
/// only applied by [`Parameters::canonical_pairs`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    pairs: Vec<(String, String)>,
}

impl Parameters {
    pub fn new() -> Self {
        Default::default()
    }

    /// Set `key` to `value`, replacing any earlier value of the same key.
    pub fn insert<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Add `key` and `value`, keeping any earlier value of the same key.
    pub fn append<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.pairs.push((key.into(), value.into()));
    }

    /// Add a pair given as raw bytes. Fails if either side is not UTF-8.
    pub fn append_bytes(&mut self, key: &[u8], value: &[u8]) -> EncodingResult<()> {
        let key = String::from_utf8(key.to_vec())
            .map_err(|e| EncodingError::InvalidUtf8(String::from_utf8_lossy(e.as_bytes()).into()))?;
        let value = String::from_utf8(value.to_vec())
            .map_err(|_| EncodingError::InvalidUtf8(key.clone()))?;
        self.append(key, value);
        Ok(())
    }

    /// Decode an `application/x-www-form-urlencoded` payload.
    pub fn from_urlencoded(input: &[u8]) -> EncodingResult<Self> {
        let mut params = Parameters::new();
        for item in input.split(|b| *b == b'&').filter(|s| !s.is_empty()) {
            let mut parts = item.splitn(2, |b| *b == b'=');
            let key = decode_component(parts.next().unwrap_or_default());
            let value = decode_component(parts.next().unwrap_or_default());
            params.append_bytes(&key, &value)?;
        }
        Ok(params)
    }

    pub fn extend(&mut self, other: Parameters) {
        self.pairs.extend(other.pairs);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Percent-encoded pairs sorted by [`canonical_order`].
    pub fn canonical_pairs(&self) -> Vec<(String, String)> {
        let mut encoded = self
            .pairs
            .iter()
            .map(|(k, v)| (percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>();
        encoded.sort_by(canonical_order);
        encoded
    }

    /// The normalized parameter string, `k1=v1&k2=v2...` in canonical order.
    pub fn parameter_string(&self) -> String {
        self.canonical_pairs()
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Parameters::new();
        for (k, v) in iter {
            params.append(k, v);
        }
        params
    }
}

// form encoding writes spaces as '+'
fn decode_component(raw: &[u8]) -> Vec<u8> {
    let replaced = raw
        .iter()
        .map(|b| if *b == b'+' { b' ' } else { *b })
        .collect::<Vec<u8>>();
    percent_decode(&replaced).collect()
}
