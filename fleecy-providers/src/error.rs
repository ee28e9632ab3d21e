use thiserror::Error;

pub type Result<T> = std::result::Result<T, CloudError>;

#[derive(Debug, Error)]
pub enum CloudError {
    /// Missing or unusable local input (credential fields, instance id).
    /// Raised before any request is sent.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("authentication failed{}: {message}", status_suffix(.status))]
    Authentication {
        status: Option<u16>,
        message: String,
    },

    #[error("failed to parse {context} response: {source}")]
    ResponseParse {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },

    #[error("{resource} request failed: HTTP {status}, body: {body}")]
    Upstream {
        resource: &'static str,
        status: u16,
        body: String,
    },

    #[error("instance {instance_id} is not active: {status}")]
    NotReady { instance_id: String, status: String },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

impl CloudError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CloudError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_message_includes_status_when_known() {
        let e = CloudError::Authentication {
            status: Some(401),
            message: "invalid application credential".into(),
        };
        assert_eq!(
            e.to_string(),
            "authentication failed (HTTP 401): invalid application credential"
        );

        let e = CloudError::Authentication {
            status: None,
            message: "missing X-Subject-Token header".into(),
        };
        assert_eq!(
            e.to_string(),
            "authentication failed: missing X-Subject-Token header"
        );
    }

    #[test]
    fn upstream_and_not_found_render_resource() {
        let e = CloudError::Upstream {
            resource: "server list",
            status: 503,
            body: "maintenance".into(),
        };
        assert_eq!(
            e.to_string(),
            "server list request failed: HTTP 503, body: maintenance"
        );

        let e = CloudError::NotFound {
            resource: "flavor",
            id: "42".into(),
        };
        assert!(e.is_not_found());
        assert_eq!(e.to_string(), "flavor 42 not found");
    }
}
