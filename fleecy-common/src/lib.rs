use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

pub mod power_state;

pub use power_state::PowerState;

/// Compute status reported by OpenStack for a running server.
pub const ACTIVE_STATUS: &str = "ACTIVE";

/// Flavor name used when the flavor lookup for an instance failed.
pub const UNKNOWN_FLAVOR_NAME: &str = "Unknown";

// --- Credentials ---

/// Application credential of a participant's OpenStack project.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credential {
    pub endpoint: String,
    pub application_credential_id: String,
    pub application_credential_secret: String,
}

impl Credential {
    pub fn new(
        endpoint: impl Into<String>,
        application_credential_id: impl Into<String>,
        application_credential_secret: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            application_credential_id: application_credential_id.into(),
            application_credential_secret: application_credential_secret.into(),
        }
    }

    /// Both the ID and the secret must be present before we talk to keystone.
    pub fn is_complete(&self) -> bool {
        !self.application_credential_id.trim().is_empty()
            && !self.application_credential_secret.trim().is_empty()
    }

    /// Endpoint without trailing slashes, ready for `format!("{}/identity/...")`.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim().trim_end_matches('/')
    }
}

// Never print the secret.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("endpoint", &self.endpoint)
            .field("application_credential_id", &self.application_credential_id)
            .field("application_credential_secret", &"<redacted>")
            .finish()
    }
}

// --- Provider descriptors ---

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, utoipa::ToSchema)]
pub struct FlavorDescriptor {
    pub id: String,
    pub name: String,
    pub vcpus: i32,
    pub ram: i32,  // MB
    pub disk: i32, // GB
}

impl FlavorDescriptor {
    /// Zero-valued stand-in for a flavor we could not resolve.
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: UNKNOWN_FLAVOR_NAME.to_string(),
            vcpus: 0,
            ram: 0,
            disk: 0,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.name == UNKNOWN_FLAVOR_NAME && self.vcpus == 0 && self.ram == 0 && self.disk == 0
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, utoipa::ToSchema)]
pub struct AddressEntry {
    pub addr: String,
    #[serde(rename = "type")]
    pub kind: String, // "fixed" | "floating"
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, utoipa::ToSchema)]
pub struct InstanceDescriptor {
    pub id: String,
    pub name: String,
    pub status: String,
    pub flavor: FlavorDescriptor,
    /// Network name -> addresses on that network.
    pub addresses: BTreeMap<String, Vec<AddressEntry>>,
    pub power_state: i32,
    pub availability_zone: String,
    // Opaque provider timestamps, kept as sent.
    pub created: String,
    pub updated: String,
}

impl InstanceDescriptor {
    pub fn is_active(&self) -> bool {
        self.status == ACTIVE_STATUS
    }
}

// --- Health / runtime / monitoring results ---

#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
pub struct HealthCheckResult {
    pub healthy: bool,
    pub status: String,
    pub message: String,
    pub checked_at: DateTime<Utc>,
    pub response_time_ms: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
pub struct RuntimeInfo {
    pub instance_id: String,
    pub status: String,
    pub power_state: i32,
    /// `PowerState` label of `power_state`, e.g. "RUNNING".
    pub power_state_label: String,
    pub last_checked: DateTime<Utc>,
}

/// Usage readings for one instance. Values come from a telemetry source,
/// which may be simulated.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, utoipa::ToSchema)]
pub struct MonitoringInfo {
    pub instance_id: String,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub disk_usage: f64,
    pub network_in_bytes: i64,
    pub network_out_bytes: i64,
    pub last_updated: DateTime<Utc>,
}

// --- Entities (SQLx Mapped) ---

/// Persistence-ready projection of an OpenStack instance. Only stable fields
/// are kept; runtime values (power state, timestamps) are queried live.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow, utoipa::ToSchema)]
pub struct VirtualMachineRecord {
    pub instance_id: String,
    pub name: String,
    pub participant_id: Uuid,
    pub status: String,
    pub flavor_id: String,
    pub flavor_name: String,
    pub vcpus: i32,
    pub ram: i32,
    pub disk: i32,
    pub ip_addresses: String, // JSON text of the address map
    pub availability_zone: String,
}
