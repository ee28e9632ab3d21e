use crate::Result;
use async_trait::async_trait;
use chrono::Utc;
use fleecy_common::MonitoringInfo;

/// Source of per-instance usage metrics (Ceilometer, Prometheus, ...).
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    async fn instance_metrics(&self, instance_id: &str) -> Result<MonitoringInfo>;
}

/// Fixed illustrative readings. Not real telemetry: only `last_updated`
/// changes between calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedTelemetry;

impl SimulatedTelemetry {
    pub const CPU_USAGE: f64 = 75.5;
    pub const MEMORY_USAGE: f64 = 82.3;
    pub const DISK_USAGE: f64 = 45.8;
    pub const NETWORK_IN_BYTES: i64 = 1_024_000;
    pub const NETWORK_OUT_BYTES: i64 = 2_048_000;

    pub fn reading(&self, instance_id: &str) -> MonitoringInfo {
        MonitoringInfo {
            instance_id: instance_id.to_string(),
            cpu_usage: Self::CPU_USAGE,
            memory_usage: Self::MEMORY_USAGE,
            disk_usage: Self::DISK_USAGE,
            network_in_bytes: Self::NETWORK_IN_BYTES,
            network_out_bytes: Self::NETWORK_OUT_BYTES,
            last_updated: Utc::now(),
        }
    }
}

#[async_trait]
impl TelemetrySource for SimulatedTelemetry {
    async fn instance_metrics(&self, instance_id: &str) -> Result<MonitoringInfo> {
        Ok(self.reading(instance_id))
    }
}
