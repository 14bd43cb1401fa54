//! Upstream origin resolved once at startup.

use std::fmt;
use std::str::FromStr;

use axum::http::uri::{Authority, Scheme};
use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

/// Errors produced while parsing an upstream origin.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Not a parseable URL or `host:port`.
    #[error("invalid upstream address '{address}': {reason}")]
    Invalid { address: String, reason: String },

    /// Only plain HTTP upstreams are supported.
    #[error("unsupported upstream scheme '{scheme}' in '{address}' (expected http)")]
    UnsupportedScheme { address: String, scheme: String },

    /// Upstream origins must not carry a path or query.
    #[error("upstream address '{0}' must not contain a path or query")]
    UnexpectedPath(String),
}

/// A backend origin: scheme, authority and the Host header derived from it.
#[derive(Debug, Clone)]
pub struct UpstreamTarget {
    scheme: Scheme,
    authority: Authority,
    host_header: HeaderValue,
}

impl UpstreamTarget {
    /// Parse an origin from `http://host[:port]` or a bare `host:port`.
    pub fn parse(address: &str) -> Result<Self, UpstreamError> {
        let trimmed = address.trim();
        let with_scheme = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("http://{}", trimmed)
        };

        let invalid = |reason: String| UpstreamError::Invalid {
            address: address.to_string(),
            reason,
        };

        let url = Url::parse(&with_scheme).map_err(|e| invalid(e.to_string()))?;

        if url.scheme() != "http" {
            return Err(UpstreamError::UnsupportedScheme {
                address: address.to_string(),
                scheme: url.scheme().to_string(),
            });
        }
        if (url.path() != "/" && !url.path().is_empty()) || url.query().is_some() {
            return Err(UpstreamError::UnexpectedPath(address.to_string()));
        }

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| invalid("missing host".to_string()))?;
        let authority_str = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let authority = Authority::from_str(&authority_str).map_err(|e| invalid(e.to_string()))?;
        let host_header =
            HeaderValue::from_str(authority.as_str()).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            scheme: Scheme::HTTP,
            authority,
            host_header,
        })
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Value sent as the Host header on forwarded requests.
    pub fn host_header(&self) -> &HeaderValue {
        &self.host_header
    }
}

impl fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.authority)
    }
}
