//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http_body_util::BodyExt;
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;

use crate::method::Method;

/// An incoming HTTP request with its body fully buffered.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Option<String>,
    pub(crate) headers: http::HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        path: String,
        query: Option<String>,
        headers: http::HeaderMap,
        body: Bytes,
        params: HashMap<String, String>,
    ) -> Self {
        Self { method, path, query, headers, body, params }
    }

    /// Buffers the body of a hyper request and attaches the matched route params.
    pub(crate) async fn from_hyper<B>(
        req: hyper::Request<B>,
        method: Method,
        params: HashMap<String, String>,
    ) -> Result<Self, B::Error>
    where
        B: hyper::body::Body,
    {
        let (parts, body) = req.into_parts();
        let body = body.collect().await?.to_bytes();
        Ok(Self::new(
            method,
            parts.uri.path().to_owned(),
            parts.uri.query().map(str::to_owned),
            parts.headers,
            body,
            params,
        ))
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &http::HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup. Non-UTF-8 values are skipped.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/students/{id}`, `req.param("id")` on `/students/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Returns the first percent-decoded value for `key` in the query string.
    ///
    /// `+` decodes to a space, as in `application/x-www-form-urlencoded`.
    /// A key without `=` yields an empty value.
    pub fn query(&self, key: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
            .find(|(k, _)| decode_component(k) == key)
            .map(|(_, v)| decode_component(v))
    }

    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
pub(crate) fn test_request(method: Method, path: &str, query: Option<&str>, body: &str) -> Request {
    Request::new(
        method,
        path.to_owned(),
        query.map(str::to_owned),
        http::HeaderMap::new(),
        Bytes::copy_from_slice(body.as_bytes()),
        HashMap::new(),
    )
}
