//! Upstream forwarding over `reqwest`.

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, Request, Response};
use http_body_util::LengthLimitError;
use url::Url;

use crate::proxy::rules::ProxyRule;
use crate::proxy::ProxyError;

/// Headers meaningful for a single hop only.
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Largest request body buffered for forwarding.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Sends requests upstream. One client verifies certificates, the other does
/// not (rules with `secure = false`).
#[derive(Debug, Clone)]
pub struct Forwarder {
    verified: reqwest::Client,
    unverified: reqwest::Client,
    timeout: Duration,
}

impl Forwarder {
    pub fn new(timeout: Duration) -> Result<Self, ProxyError> {
        let verified = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(ProxyError::Client)?;
        let unverified = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(ProxyError::Client)?;
        Ok(Self {
            verified,
            unverified,
            timeout,
        })
    }

    /// Forward `request` to `upstream` under `rule`. The request body is
    /// buffered; the response body is streamed back.
    pub async fn forward(
        &self,
        rule: &ProxyRule,
        upstream: Url,
        request: Request<Body>,
    ) -> Result<Response<Body>, ProxyError> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, MAX_BODY_BYTES).await.map_err(|e| {
            if exceeds_limit(&e) {
                ProxyError::TooLarge(MAX_BODY_BYTES)
            } else {
                ProxyError::Body(e)
            }
        })?;

        let mut headers = parts.headers;
        strip_hop_by_hop(&mut headers);
        if rule.change_origin {
            headers.remove(header::HOST);
            if let Ok(host) = HeaderValue::from_str(&rule.authority()) {
                headers.insert(header::HOST, host);
            }
        }

        let client = if rule.secure { &self.verified } else { &self.unverified };
        let response = client
            .request(parts.method, upstream)
            .headers(headers)
            .body(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProxyError::Timeout(self.timeout)
                } else {
                    ProxyError::Upstream(e)
                }
            })?;

        let status = response.status();
        let mut headers = response.headers().clone();
        strip_hop_by_hop(&mut headers);

        let mut forwarded = Response::new(Body::from_stream(response.bytes_stream()));
        *forwarded.status_mut() = status;
        *forwarded.headers_mut() = headers;
        Ok(forwarded)
    }
}

fn exceeds_limit(err: &axum::Error) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        if cause.is::<LengthLimitError>() {
            return true;
        }
        source = cause.source();
    }
    false
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}
