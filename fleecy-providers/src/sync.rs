use crate::{ComputeProvider, Result};
use fleecy_common::{Credential, InstanceDescriptor, VirtualMachineRecord};
use uuid::Uuid;

/// Map a provider instance to the row the store keeps for it.
pub fn project_instance(participant_id: Uuid, instance: &InstanceDescriptor) -> VirtualMachineRecord {
    // String keys and string fields only: serialization cannot fail.
    let ip_addresses =
        serde_json::to_string(&instance.addresses).expect("address map serializes to JSON");

    VirtualMachineRecord {
        instance_id: instance.id.clone(),
        name: instance.name.clone(),
        participant_id,
        status: instance.status.clone(),
        flavor_id: instance.flavor.id.clone(),
        flavor_name: instance.flavor.name.clone(),
        vcpus: instance.flavor.vcpus,
        ram: instance.flavor.ram,
        disk: instance.flavor.disk,
        ip_addresses,
        availability_zone: instance.availability_zone.clone(),
    }
}

pub fn project_instances(
    participant_id: Uuid,
    instances: &[InstanceDescriptor],
) -> Vec<VirtualMachineRecord> {
    instances
        .iter()
        .map(|i| project_instance(participant_id, i))
        .collect()
}

/// List the participant's instances and project them. Persisting the records
/// is up to the caller.
pub async fn sync_from_provider(
    provider: &dyn ComputeProvider,
    credential: &Credential,
    participant_id: Uuid,
) -> Result<Vec<VirtualMachineRecord>> {
    let instances = provider.list_instances(credential).await?;
    let records = project_instances(participant_id, &instances);
    tracing::info!(
        "Synced {} VM record(s) for participant {}",
        records.len(),
        participant_id
    );
    Ok(records)
}
