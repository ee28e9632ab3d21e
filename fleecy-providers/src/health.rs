// ============================================================================
// INSTANCE HEALTH PROBE
// ============================================================================

use crate::{CloudError, ComputeProvider};
use chrono::Utc;
use fleecy_common::{Credential, HealthCheckResult, ACTIVE_STATUS};
use tokio::time::Instant;

pub const ERROR_STATUS: &str = "ERROR";

/// Health check of a single instance: authenticate, fetch, compare status
/// with ACTIVE. Failures are reported in the result, never as `Err`.
pub struct HealthProbe<'a> {
    provider: &'a dyn ComputeProvider,
}

impl<'a> HealthProbe<'a> {
    pub fn new(provider: &'a dyn ComputeProvider) -> Self {
        Self { provider }
    }

    pub async fn check(&self, credential: &Credential, instance_id: &str) -> HealthCheckResult {
        let started = Instant::now();

        let token = match self.provider.authenticate(credential).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Health check of {} could not authenticate: {}", instance_id, e);
                let message = match e {
                    // Already reads "authentication failed ...".
                    CloudError::Authentication { .. } => e.to_string(),
                    other => format!("authentication failed: {}", other),
                };
                return finish(false, ERROR_STATUS, message, started);
            }
        };

        let instance = match self
            .provider
            .fetch_instance(credential, &token, instance_id)
            .await
        {
            Ok(instance) => instance,
            Err(e) => {
                tracing::warn!("Health check of {} failed to fetch instance: {}", instance_id, e);
                return finish(false, ERROR_STATUS, format!("instance lookup failed: {}", e), started);
            }
        };

        let healthy = instance.status == ACTIVE_STATUS;
        let message = if healthy {
            "instance is running normally".to_string()
        } else {
            format!("instance status is abnormal: {}", instance.status)
        };

        tracing::info!(
            "Health check of {}: status={} healthy={}",
            instance_id,
            instance.status,
            healthy
        );
        finish(healthy, &instance.status, message, started)
    }
}

fn finish(healthy: bool, status: &str, message: String, started: Instant) -> HealthCheckResult {
    HealthCheckResult {
        healthy,
        status: status.to_string(),
        message,
        checked_at: Utc::now(),
        response_time_ms: started.elapsed().as_millis() as i64,
    }
}
