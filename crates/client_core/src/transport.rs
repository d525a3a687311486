//! Wire transport for backend routes. Bodies always come back as plain text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::EmployeeFields,
    protocol::{Method, Route},
};
use tracing::debug;
use url::Url;

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        route: &Route,
        form: Option<&EmployeeFields>,
    ) -> Result<RawResponse, ClientError>;
}

pub struct HttpTransport {
    http: Client,
    base_url: Url,
}

impl HttpTransport {
    /// `None` leaves requests without a deadline.
    pub fn new(server_url: &str, request_timeout: Option<Duration>) -> Result<Self, ClientError> {
        let base_url = normalize_base_url(server_url)?;
        let mut builder = Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| ClientError::HttpClient(err.to_string()))?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, route: &Route) -> Result<Url, ClientError> {
        self.base_url
            .join(&route.path)
            .map_err(|err| ClientError::InvalidServerUrl {
                url: self.base_url.to_string(),
                message: err.to_string(),
            })
    }
}

/// Routes are relative, so the base must end in `/` for a path prefix to survive `Url::join`.
pub fn normalize_base_url(server_url: &str) -> Result<Url, ClientError> {
    let trimmed = server_url.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash).map_err(|err| ClientError::InvalidServerUrl {
        url: server_url.to_string(),
        message: err.to_string(),
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidServerUrl {
            url: server_url.to_string(),
            message: "expected an http(s) url".to_string(),
        });
    }
    Ok(url)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        route: &Route,
        form: Option<&EmployeeFields>,
    ) -> Result<RawResponse, ClientError> {
        let url = self.endpoint(route)?;
        let mut request = match route.method {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
            Method::Delete => self.http.delete(url),
        };
        if let Some(fields) = form {
            request = request.form(fields);
        }

        let transport_err = |err: reqwest::Error| ClientError::Transport {
            route: route.to_string(),
            message: err.to_string(),
        };
        let res = request.send().await.map_err(transport_err)?;
        let status = res.status().as_u16();
        let body = res.text().await.map_err(transport_err)?;
        debug!(%route, status, bytes = body.len(), "roster: backend responded");

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
