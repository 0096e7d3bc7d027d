//! Request forwarding against a single upstream backend

use std::time::Duration;

use axum::{
    body::Bytes,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, warn};

use crate::backend::registry::Backend;
use crate::error::{GatewayError, Result};

/// A backend response passed through to the client unchanged.
#[derive(Debug, Clone)]
pub struct ProxiedResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl IntoResponse for ProxiedResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            self.body,
        )
            .into_response()
    }
}

/// Issues exactly one outbound call per inbound request, bounded by a fixed
/// timeout set at client construction.
pub struct Forwarder {
    client: Client,
}

impl Forwarder {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Forward one request to `backend` and map the outcome.
    ///
    /// A `lookup` resource name turns a backend 404 into a gateway 404;
    /// every other error status and any transport failure (connection
    /// refused, DNS failure, timeout) becomes a 503. Successful responses
    /// pass through byte for byte. No retries: one failed attempt yields
    /// the error immediately.
    pub async fn forward(
        &self,
        backend: &Backend,
        method: Method,
        path: &str,
        body: Option<&Value>,
        lookup: Option<&'static str>,
    ) -> Result<ProxiedResponse> {
        let url = backend.url(path);
        debug!(service = backend.service.name(), %method, %url, "Forwarding request");

        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(service = backend.service.name(), error = %e, "Upstream call failed");
            GatewayError::Unavailable {
                service: backend.service.display_name(),
                reason: e.to_string(),
            }
        })?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            if let Some(resource) = lookup {
                return Err(GatewayError::NotFound { resource });
            }
        }

        if status.is_client_error() || status.is_server_error() {
            warn!(
                service = backend.service.name(),
                status = status.as_u16(),
                "Upstream returned error status"
            );
            return Err(GatewayError::Unavailable {
                service: backend.service.display_name(),
                reason: format!("upstream returned {}", status),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Unavailable {
                service: backend.service.display_name(),
                reason: e.to_string(),
            })?;

        // reqwest and axum sit on different `http` major versions; bridge
        // the status through its numeric code.
        let status = StatusCode::from_u16(status.as_u16())
            .map_err(|_| GatewayError::Internal(format!("invalid upstream status {}", status)))?;

        Ok(ProxiedResponse { status, body })
    }
}
