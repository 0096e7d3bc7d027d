//! Aggregate health checking across the upstream services

use std::collections::BTreeMap;
use std::time::Duration;

use futures::future::join_all;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use crate::backend::registry::{Backend, BackendRegistry};
use crate::error::{GatewayError, Result};

/// Outcome of probing a single upstream service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProbeResult {
    Up { code: u16 },
    Down { error: String },
}

/// Overall gateway health derived from the individual probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Up,
    Degraded,
}

/// Report returned by the `/health` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: OverallStatus,
    pub services: BTreeMap<&'static str, ProbeResult>,
}

/// Probes every registered backend concurrently and reduces the results.
pub struct HealthAggregator {
    client: Client,
}

impl HealthAggregator {
    pub fn new(probe_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(probe_timeout)
            .build()
            .map_err(|e| GatewayError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Probe all backends and build the aggregate report.
    ///
    /// The probes run concurrently, each bounded by its own timeout, so the
    /// whole check completes near one probe budget rather than three. Every
    /// failure is converted to a `Down` result locally and never aborts the
    /// other probes.
    pub async fn check(&self, registry: &BackendRegistry) -> HealthReport {
        let probes = registry.all().iter().map(|backend| self.probe(backend));
        let services: BTreeMap<_, _> = join_all(probes).await.into_iter().collect();
        let status = reduce(&services);

        HealthReport { status, services }
    }

    async fn probe(&self, backend: &Backend) -> (&'static str, ProbeResult) {
        let url = backend.url(&backend.probe_path);

        let result = match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(
                    service = backend.service.name(),
                    code = response.status().as_u16(),
                    "Probe succeeded"
                );
                ProbeResult::Up {
                    code: response.status().as_u16(),
                }
            }
            Ok(response) => {
                warn!(
                    service = backend.service.name(),
                    status = response.status().as_u16(),
                    "Probe returned unexpected status"
                );
                ProbeResult::Down {
                    error: format!("unexpected status {}", response.status()),
                }
            }
            Err(e) => {
                warn!(service = backend.service.name(), error = %e, "Probe failed");
                ProbeResult::Down {
                    error: e.to_string(),
                }
            }
        };

        (backend.service.name(), result)
    }
}

/// Overall status is `Up` only when every probe reported `Up`.
fn reduce(services: &BTreeMap<&'static str, ProbeResult>) -> OverallStatus {
    if services
        .values()
        .all(|result| matches!(result, ProbeResult::Up { .. }))
    {
        OverallStatus::Up
    } else {
        OverallStatus::Degraded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn up() -> ProbeResult {
        ProbeResult::Up { code: 200 }
    }

    fn down() -> ProbeResult {
        ProbeResult::Down {
            error: "connection refused".to_string(),
        }
    }

    #[test]
    fn test_all_up_reduces_to_up() {
        let services = BTreeMap::from([("products", up()), ("orders", up()), ("customers", up())]);
        assert_eq!(reduce(&services), OverallStatus::Up);
    }

    #[test]
    fn test_single_down_degrades_overall_status() {
        let services =
            BTreeMap::from([("products", down()), ("orders", up()), ("customers", up())]);
        assert_eq!(reduce(&services), OverallStatus::Degraded);
    }

    #[test]
    fn test_probe_result_wire_shape() {
        assert_eq!(
            serde_json::to_value(up()).unwrap(),
            json!({"status": "up", "code": 200})
        );
        assert_eq!(
            serde_json::to_value(down()).unwrap(),
            json!({"status": "down", "error": "connection refused"})
        );
    }

    #[test]
    fn test_overall_status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(OverallStatus::Up).unwrap(), json!("up"));
        assert_eq!(
            serde_json::to_value(OverallStatus::Degraded).unwrap(),
            json!("degraded")
        );
    }
}
