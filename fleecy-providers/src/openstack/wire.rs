//! Request/response bodies of the keystone and nova endpoints we call, and
//! their mapping into the public descriptors.

use fleecy_common::{AddressEntry, FlavorDescriptor, InstanceDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const APPLICATION_CREDENTIAL_METHOD: &str = "application_credential";

// --- POST /identity/v3/auth/tokens ---

#[derive(Debug, Serialize)]
pub struct AuthRequest<'a> {
    pub auth: Auth<'a>,
}

#[derive(Debug, Serialize)]
pub struct Auth<'a> {
    pub identity: Identity<'a>,
}

#[derive(Debug, Serialize)]
pub struct Identity<'a> {
    pub methods: Vec<&'static str>,
    pub application_credential: ApplicationCredential<'a>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationCredential<'a> {
    pub id: &'a str,
    pub secret: &'a str,
}

impl<'a> AuthRequest<'a> {
    pub fn application_credential(id: &'a str, secret: &'a str) -> Self {
        Self {
            auth: Auth {
                identity: Identity {
                    methods: vec![APPLICATION_CREDENTIAL_METHOD],
                    application_credential: ApplicationCredential { id, secret },
                },
            },
        }
    }
}

// --- GET /compute/v2.1/servers/detail and /servers/{id} ---

#[derive(Debug, Deserialize)]
pub struct ServerListEnvelope {
    #[serde(default)]
    pub servers: Vec<Server>,
}

#[derive(Debug, Deserialize)]
pub struct ServerEnvelope {
    pub server: Server,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub flavor: FlavorRef,
    #[serde(default)]
    pub addresses: BTreeMap<String, Vec<Address>>,
    #[serde(rename = "OS-EXT-STS:power_state", default)]
    pub power_state: Option<i32>,
    #[serde(rename = "OS-EXT-AZ:availability_zone", default)]
    pub availability_zone: Option<String>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct FlavorRef {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct Address {
    pub addr: String,
    #[serde(rename = "OS-EXT-IPS:type", default)]
    pub kind: Option<String>,
}

impl Server {
    pub fn into_descriptor(self, flavor: FlavorDescriptor) -> InstanceDescriptor {
        let addresses = self
            .addresses
            .into_iter()
            .map(|(network, addrs)| {
                let entries = addrs
                    .into_iter()
                    .map(|a| AddressEntry {
                        addr: a.addr,
                        kind: a.kind.unwrap_or_default(),
                    })
                    .collect();
                (network, entries)
            })
            .collect();

        InstanceDescriptor {
            id: self.id,
            name: self.name,
            status: self.status,
            flavor,
            addresses,
            power_state: self.power_state.unwrap_or_default(),
            availability_zone: self.availability_zone.unwrap_or_default(),
            created: self.created,
            updated: self.updated,
        }
    }
}

// --- GET /compute/v2.1/flavors/{id} ---

#[derive(Debug, Deserialize)]
pub struct FlavorEnvelope {
    pub flavor: Flavor,
}

#[derive(Debug, Deserialize)]
pub struct Flavor {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub vcpus: i32,
    #[serde(default)]
    pub ram: i32,
    #[serde(default)]
    pub disk: i32,
}

impl From<Flavor> for FlavorDescriptor {
    fn from(f: Flavor) -> Self {
        FlavorDescriptor {
            id: f.id,
            name: f.name,
            vcpus: f.vcpus,
            ram: f.ram,
            disk: f.disk,
        }
    }
}
