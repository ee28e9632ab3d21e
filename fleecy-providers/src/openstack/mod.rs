use crate::{CloudError, ComputeProvider, Result};
use async_trait::async_trait;
use chrono::Utc;
use fleecy_common::{Credential, FlavorDescriptor, InstanceDescriptor, PowerState, RuntimeInfo};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub mod wire;

pub const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// What to do when the flavor of an instance cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlavorFallback {
    /// Keep the instance and attach `FlavorDescriptor::placeholder`.
    #[default]
    Placeholder,
    /// Fail the whole call with the resolver error.
    Strict,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub flavor_fallback: FlavorFallback,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
            flavor_fallback: FlavorFallback::Placeholder,
        }
    }
}

/// OpenStack keystone + nova client authenticating with application credentials.
///
/// Holds a single `reqwest::Client`; the credential is passed per call so one
/// client can serve every participant.
pub struct OpenStackClient {
    client: Client,
    config: ClientConfig,
}

impl OpenStackClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        // Default reqwest client has no overall timeout; a stalled endpoint would hang the caller.
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(credential: &Credential, path: &str) -> String {
        format!("{}{}", credential.base_url(), path)
    }

    /// URL of one item under `collection`. The id is pushed as a single
    /// percent-encoded path segment.
    fn resource_url(credential: &Credential, collection: &str, id: &str) -> Result<Url> {
        let mut url = Url::parse(&Self::url(credential, collection)).map_err(|e| {
            CloudError::Configuration(format!("invalid endpoint {}: {}", credential.endpoint, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                CloudError::Configuration(format!(
                    "endpoint {} cannot take a path",
                    credential.endpoint
                ))
            })?
            .push(id);
        Ok(url)
    }

    /// GET a nova resource and decode its envelope. Anything but 200 is an error.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &str,
        resource: &'static str,
        id: &str,
    ) -> Result<T> {
        tracing::debug!("[OpenStack API] GET {}", url);

        let resp = self
            .client
            .get(url)
            .header(AUTH_TOKEN_HEADER, token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(CloudError::NotFound {
                resource,
                id: id.to_string(),
            });
        }
        if status != StatusCode::OK {
            tracing::debug!(
                "[OpenStack API] GET {} failed: status={} body={}",
                url,
                status.as_u16(),
                body
            );
            return Err(CloudError::Upstream {
                resource,
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| CloudError::ResponseParse {
            context: resource,
            source,
        })
    }

    /// Resolve the flavor of a server and build its descriptor, applying the
    /// configured fallback when the lookup fails.
    async fn enrich(
        &self,
        credential: &Credential,
        token: &str,
        server: wire::Server,
    ) -> Result<InstanceDescriptor> {
        let flavor = match self.get_flavor(credential, token, &server.flavor.id).await {
            Ok(flavor) => flavor,
            Err(e) => match self.config.flavor_fallback {
                FlavorFallback::Placeholder => {
                    tracing::warn!(
                        "[OpenStack API] flavor {} of instance {} unavailable, using placeholder: {}",
                        server.flavor.id,
                        server.id,
                        e
                    );
                    FlavorDescriptor::placeholder(server.flavor.id.clone())
                }
                FlavorFallback::Strict => return Err(e),
            },
        };
        Ok(server.into_descriptor(flavor))
    }
}

#[async_trait]
impl ComputeProvider for OpenStackClient {
    async fn authenticate(&self, credential: &Credential) -> Result<String> {
        if !credential.is_complete() {
            return Err(CloudError::Configuration(
                "application credential id and secret are required".to_string(),
            ));
        }

        let url = Self::url(credential, "/identity/v3/auth/tokens");
        let body = wire::AuthRequest::application_credential(
            credential.application_credential_id.trim(),
            credential.application_credential_secret.trim(),
        );

        tracing::debug!(
            "[OpenStack API] POST {} - application credential {}",
            url,
            credential.application_credential_id
        );

        let resp = self.client.post(&url).json(&body).send().await?;

        let status = resp.status();
        if status != StatusCode::CREATED {
            let text = resp.text().await.unwrap_or_default();
            return Err(CloudError::Authentication {
                status: Some(status.as_u16()),
                message: if text.is_empty() {
                    format!("unexpected status from {}", url)
                } else {
                    text
                },
            });
        }

        let token = resp
            .headers()
            .get(SUBJECT_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CloudError::Authentication {
                status: Some(status.as_u16()),
                message: format!("response has no {} header", SUBJECT_TOKEN_HEADER),
            })?;

        Ok(token)
    }

    async fn list_instances(&self, credential: &Credential) -> Result<Vec<InstanceDescriptor>> {
        let token = self.authenticate(credential).await?;

        let url = Self::url(credential, "/compute/v2.1/servers/detail");
        let envelope: wire::ServerListEnvelope =
            self.get_json(&url, &token, "server list", "detail").await?;

        // One flavor lookup at a time, in response order.
        let mut instances = Vec::with_capacity(envelope.servers.len());
        for server in envelope.servers {
            instances.push(self.enrich(credential, &token, server).await?);
        }

        tracing::info!(
            "[OpenStack API] listed {} instance(s) from {}",
            instances.len(),
            credential.base_url()
        );
        Ok(instances)
    }

    async fn fetch_instance(
        &self,
        credential: &Credential,
        token: &str,
        instance_id: &str,
    ) -> Result<InstanceDescriptor> {
        let instance_id = checked_id("instance", instance_id)?;

        let url = Self::resource_url(credential, "/compute/v2.1/servers", instance_id)?;
        let envelope: wire::ServerEnvelope =
            self.get_json(url.as_str(), token, "server", instance_id).await?;

        self.enrich(credential, token, envelope.server).await
    }

    async fn get_flavor(
        &self,
        credential: &Credential,
        token: &str,
        flavor_id: &str,
    ) -> Result<FlavorDescriptor> {
        let flavor_id = checked_id("flavor", flavor_id)?;

        let url = Self::resource_url(credential, "/compute/v2.1/flavors", flavor_id)?;
        let envelope: wire::FlavorEnvelope =
            self.get_json(url.as_str(), token, "flavor", flavor_id).await?;

        Ok(envelope.flavor.into())
    }

    async fn runtime_status(
        &self,
        credential: &Credential,
        instance_id: &str,
    ) -> Result<RuntimeInfo> {
        let instance_id = checked_id("instance", instance_id)?;
        let token = self.authenticate(credential).await?;

        let url = Self::resource_url(credential, "/compute/v2.1/servers", instance_id)?;
        let envelope: wire::ServerEnvelope =
            self.get_json(url.as_str(), &token, "server", instance_id).await?;

        let power_state = envelope.server.power_state.unwrap_or_default();
        Ok(RuntimeInfo {
            instance_id: instance_id.to_string(),
            status: envelope.server.status,
            power_state,
            power_state_label: PowerState::from_code(power_state).as_str().to_string(),
            last_checked: Utc::now(),
        })
    }
}

/// Trimmed id, rejected when empty or when it would not stay a single path segment.
fn checked_id<'a>(kind: &str, id: &'a str) -> Result<&'a str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(CloudError::Configuration(format!("{} id is not set", kind)));
    }
    if id == "." || id == ".." || id.contains('/') {
        return Err(CloudError::Configuration(format!(
            "invalid {} id {:?}",
            kind, id
        )));
    }
    Ok(id)
}
