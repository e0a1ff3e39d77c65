// ----------------------------------------------------------------------------
// This source code contains derived artifacts from seanmonstar's `reqwest`.
// for further information(including license information),
// please visit their repository: https://github.com/seanmonstar/reqwest .
// ----------------------------------------------------------------------------
use std::time::Duration;

use http::{header::AUTHORIZATION, Method};
use reqwest::{
    blocking::{RequestBuilder as ReqwestRequestBuilder, Response},
    header::HeaderName,
    header::HeaderValue,
    Url,
};
use serde::Serialize;

use crate::{Parameters, Result, SecretsProvider, Signer};

pub struct RequestBuilder<TSigner> {
    method: Method,
    inner: ReqwestRequestBuilder,
    signer: TSigner,
    url: Option<Url>,
    body: String,
}

impl<TSigner> RequestBuilder<TSigner> {
    pub(crate) fn new(
        builder: ReqwestRequestBuilder,
        method: Method,
        url: Option<Url>,
        signer: TSigner,
    ) -> Self {
        RequestBuilder {
            inner: builder,
            method,
            url,
            body: String::new(),
            signer,
        }
    }

    // ------------------------------------------------------------------------
    // Trapped with the wrapper

    /// Modify the query string of the URL.
    ///
    /// The pairs are appended to any query already present and are covered
    /// by the signature.
    pub fn query<T: Serialize + ?Sized>(mut self, query: &T) -> Self {
        // update local-captured url
        if let Some(ref mut url) = self.url {
            let mut pairs = url.query_pairs_mut();
            let serializer = serde_urlencoded::Serializer::new(&mut pairs);

            let _ = query.serialize(serializer);
        }
        // cleanup
        if let Some(ref mut url) = self.url {
            if let Some("") = url.query() {
                url.set_query(None);
            }
        }
        // passing argument into inner request builder
        self.inner = self.inner.query(query);
        self
    }

    /// Send a form body. Its pairs are covered by the signature.
    pub fn form<T: Serialize + ?Sized>(mut self, form: &T) -> Self {
        if let Ok(body) = serde_urlencoded::to_string(form) {
            self.body = body;
        }
        self.inner = self.inner.form(form);
        self
    }

    // ------------------------------------------------------------------------
    // Pass-through to inner builder

    /// Add a `Header` to this Request.
    pub fn header<K, V>(mut self, key: K, value: V) -> Self
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        self.inner = self.inner.header(key, value);
        self
    }

    /// Enables a request timeout.
    ///
    /// Overrides the timeout configured on the client for this request only.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.timeout(timeout);
        self
    }
}

impl<'a, TSecretsProvider> RequestBuilder<Signer<'a, TSecretsProvider>>
where
    TSecretsProvider: SecretsProvider,
{
    // ------------------------------------------------------------------------
    // Finish building the request and send it to server with OAuth signature

    /// Sign the request and send it, blocking until the response arrives.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::Error::Encoding`] if the request cannot be signed and
    /// with [`crate::Error::Transport`] if it could not be delivered.
    pub fn send(self) -> Result<Response> {
        Ok(self.generate_signature()?.send()?)
    }

    /// Generate an OAuth signature and return the reqwest's `RequestBuilder`.
    pub fn generate_signature(self) -> Result<ReqwestRequestBuilder> {
        let mut url = match self.url {
            Some(url) => url,
            // reqwest reports the bad URL when the request is sent
            None => return Ok(self.inner),
        };
        let mut payload = Parameters::from_urlencoded(url.query().unwrap_or_default().as_bytes())?;
        payload.extend(Parameters::from_urlencoded(self.body.as_bytes())?);
        url.set_query(None);
        url.set_fragment(None);

        let authorization = self
            .signer
            .generate_signature(&self.method, url.as_str(), &payload)?;
        Ok(self.inner.header(AUTHORIZATION, authorization))
    }
}
