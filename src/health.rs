//! Service health report.

use serde::Serialize;

use crate::config::APP_VERSION;
use crate::pipeline::interaction::ProbeOutcome;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    /// Running, but the inference service did not answer the probe.
    Degraded,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub version: String,
    pub model: String,
    pub inference: String,
}

/// Summarize a probe outcome into a health report.
pub fn check(probe: ProbeOutcome, model: &str) -> HealthReport {
    let status = if probe.reachable {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    };
    tracing::debug!(?status, "Health check");

    HealthReport {
        status,
        version: APP_VERSION.to_string(),
        model: model.to_string(),
        inference: probe.response,
    }
}
