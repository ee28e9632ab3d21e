use async_trait::async_trait;
use fleecy_common::{Credential, FlavorDescriptor, InstanceDescriptor, RuntimeInfo};

pub mod error;
pub mod health;
pub mod monitoring;
pub mod sync;

#[cfg(feature = "openstack")]
pub mod openstack;

pub use error::{CloudError, Result};

/// Read-side view of a compute cloud, as seen through one participant's credential.
///
/// Every operation that does not take a token authenticates on its own; tokens
/// are never cached between calls.
#[async_trait]
pub trait ComputeProvider: Send + Sync {
    /// Exchange the credential for a short-lived access token.
    async fn authenticate(&self, credential: &Credential) -> Result<String>;

    /// All instances of the project, flavor-enriched, in provider order.
    async fn list_instances(&self, credential: &Credential) -> Result<Vec<InstanceDescriptor>>;

    /// One instance, flavor-enriched, using an already acquired token.
    async fn fetch_instance(
        &self,
        credential: &Credential,
        token: &str,
        instance_id: &str,
    ) -> Result<InstanceDescriptor>;

    async fn get_flavor(
        &self,
        credential: &Credential,
        token: &str,
        flavor_id: &str,
    ) -> Result<FlavorDescriptor>;

    /// Live status and power state, without flavor enrichment.
    async fn runtime_status(&self, credential: &Credential, instance_id: &str)
        -> Result<RuntimeInfo>;

    /// Authenticate, then fetch one instance.
    async fn get_instance(
        &self,
        credential: &Credential,
        instance_id: &str,
    ) -> Result<InstanceDescriptor> {
        if instance_id.trim().is_empty() {
            return Err(CloudError::Configuration(
                "instance id is not set".to_string(),
            ));
        }
        let token = self.authenticate(credential).await?;
        self.fetch_instance(credential, &token, instance_id).await
    }

    /// Gate used before handing a federated-learning task to a VM: the
    /// instance must currently be ACTIVE. Dispatching the task itself happens
    /// outside of the provider.
    async fn ensure_ready_for_task(
        &self,
        credential: &Credential,
        instance_id: &str,
    ) -> Result<InstanceDescriptor> {
        let instance = self.get_instance(credential, instance_id).await?;
        if !instance.is_active() {
            return Err(CloudError::NotReady {
                instance_id: instance.id,
                status: instance.status,
            });
        }
        Ok(instance)
    }
}
