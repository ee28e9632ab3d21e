// Shared fixtures for the OpenStack integration tests (httpmock-backed).
#![allow(dead_code)]

use fleecy_common::Credential;
use fleecy_providers::openstack::{ClientConfig, FlavorFallback, OpenStackClient};
use httpmock::prelude::*;
use httpmock::Mock;
use serde_json::{json, Value};

pub const TOKEN: &str = "gAAAAABtest-token";

pub fn client() -> OpenStackClient {
    OpenStackClient::new(ClientConfig::default()).expect("failed to build test client")
}

pub fn strict_client() -> OpenStackClient {
    OpenStackClient::new(ClientConfig {
        flavor_fallback: FlavorFallback::Strict,
        ..ClientConfig::default()
    })
    .expect("failed to build test client")
}

pub fn credential(server: &MockServer) -> Credential {
    Credential::new(server.base_url(), "app-cred-id", "app-cred-secret")
}

/// Keystone answering 201 with `TOKEN` for the fixture credential.
pub fn mock_auth(server: &MockServer) -> Mock<'_> {
    server.mock(|when, then| {
        when.method(POST)
            .path("/identity/v3/auth/tokens")
            .json_body(json!({
                "auth": {
                    "identity": {
                        "methods": ["application_credential"],
                        "application_credential": {
                            "id": "app-cred-id",
                            "secret": "app-cred-secret"
                        }
                    }
                }
            }));
        then.status(201)
            .header("X-Subject-Token", TOKEN)
            .json_body(json!({"token": {"expires_at": "2030-01-01T00:00:00.000000Z"}}));
    })
}

pub fn mock_flavor(server: &MockServer, flavor: Value) -> Mock<'_> {
    let id = flavor["id"].as_str().unwrap_or_default().to_string();
    server.mock(move |when, then| {
        when.method(GET)
            .path(format!("/compute/v2.1/flavors/{}", id))
            .header("x-auth-token", TOKEN);
        then.status(200).json_body(json!({ "flavor": flavor }));
    })
}

pub fn mock_missing_flavor<'a>(server: &'a MockServer, id: &str) -> Mock<'a> {
    let path = format!("/compute/v2.1/flavors/{}", id);
    server.mock(move |when, then| {
        when.method(GET).path(path);
        then.status(404)
            .json_body(json!({"itemNotFound": {"code": 404, "message": "Flavor could not be found."}}));
    })
}

pub fn mock_server_detail(server: &MockServer, body: Value) -> Mock<'_> {
    let id = body["id"].as_str().unwrap_or_default().to_string();
    server.mock(move |when, then| {
        when.method(GET)
            .path(format!("/compute/v2.1/servers/{}", id))
            .header("x-auth-token", TOKEN);
        then.status(200).json_body(json!({ "server": body }));
    })
}

pub fn server_json(id: &str, name: &str, status: &str, flavor_id: &str) -> Value {
    let power_state = if status == "ACTIVE" { 1 } else { 4 };
    json!({
        "id": id,
        "name": name,
        "status": status,
        "flavor": {"id": flavor_id, "links": []},
        "addresses": {
            "private": [
                {"addr": "10.0.0.12", "OS-EXT-IPS:type": "fixed", "version": 4,
                 "OS-EXT-IPS-MAC:mac_addr": "fa:16:3e:00:00:01"},
                {"addr": "172.24.4.80", "OS-EXT-IPS:type": "floating", "version": 4}
            ]
        },
        "OS-EXT-STS:power_state": power_state,
        "OS-EXT-AZ:availability_zone": "nova",
        "created": "2025-03-01T10:00:00Z",
        "updated": "2025-03-02T11:30:00Z"
    })
}

pub fn flavor_json(id: &str, name: &str, vcpus: i32, ram: i32, disk: i32) -> Value {
    json!({
        "id": id,
        "name": name,
        "vcpus": vcpus,
        "ram": ram,
        "disk": disk,
        "OS-FLV-EXT-DATA:ephemeral": 0,
        "swap": ""
    })
}
