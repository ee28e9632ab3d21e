use anyhow::{bail, Context, Result};
use fleecy_common::Credential;
use fleecy_providers::openstack::{ClientConfig, FlavorFallback};
use std::env;
use std::fs;
use std::time::Duration;

pub const ENDPOINT_VAR: &str = "OPENSTACK_ENDPOINT";
pub const CREDENTIAL_ID_VAR: &str = "OPENSTACK_APPLICATION_CREDENTIAL_ID";
pub const CREDENTIAL_SECRET_VAR: &str = "OPENSTACK_APPLICATION_CREDENTIAL_SECRET";
pub const CREDENTIAL_SECRET_FILE_VAR: &str = "OPENSTACK_APPLICATION_CREDENTIAL_SECRET_FILE";
pub const TIMEOUT_VAR: &str = "OPENSTACK_TIMEOUT_SECS";
pub const FLAVOR_STRICT_VAR: &str = "OPENSTACK_FLAVOR_STRICT";

pub struct Settings {
    pub credential: Credential,
    pub client: ClientConfig,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok(), |path| fs::read_to_string(path).ok())
    }

    /// `lookup` resolves env vars, `read_file` reads secret files.
    pub fn from_lookup<L, F>(lookup: L, read_file: F) -> Result<Self>
    where
        L: Fn(&str) -> Option<String>,
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup(ENDPOINT_VAR)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .with_context(|| format!("{} is not set", ENDPOINT_VAR))?;

        let credential_id = lookup(CREDENTIAL_ID_VAR)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        // Prefer *_FILE for secrets (Docker/K8s friendly), fallback to env var.
        let secret = lookup(CREDENTIAL_SECRET_FILE_VAR)
            .and_then(|path| read_file(path.trim()))
            .or_else(|| lookup(CREDENTIAL_SECRET_VAR))
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        let mut client = ClientConfig::default();
        if let Some(timeout) = parse_timeout_secs(lookup(TIMEOUT_VAR).as_deref())? {
            client.request_timeout = timeout;
        }
        if parse_flag(lookup(FLAVOR_STRICT_VAR).as_deref()) {
            client.flavor_fallback = FlavorFallback::Strict;
        }

        // Empty id/secret are left for the authenticator to reject.
        Ok(Self {
            credential: Credential::new(endpoint, credential_id, secret),
            client,
        })
    }
}

pub fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|s| s.trim().to_ascii_lowercase()).as_deref(),
        Some("1") | Some("true") | Some("yes") | Some("on")
    )
}

pub fn parse_timeout_secs(raw: Option<&str>) -> Result<Option<Duration>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let secs: u64 = raw
        .parse()
        .with_context(|| format!("{} must be a whole number of seconds, got {:?}", TIMEOUT_VAR, raw))?;
    if secs == 0 {
        bail!("{} must be greater than zero", TIMEOUT_VAR);
    }
    Ok(Some(Duration::from_secs(secs)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)], files: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let files: HashMap<String, String> = files
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|k| vars.get(k).cloned(), |p| files.get(p).cloned())
    }

    #[test]
    fn reads_credential_from_env() {
        let s = settings(
            &[
                (ENDPOINT_VAR, " https://cloud.example "),
                (CREDENTIAL_ID_VAR, "app-id"),
                (CREDENTIAL_SECRET_VAR, "s3cret\n"),
            ],
            &[],
        )
        .unwrap();
        assert_eq!(s.credential.endpoint, "https://cloud.example");
        assert_eq!(s.credential.application_credential_id, "app-id");
        assert_eq!(s.credential.application_credential_secret, "s3cret");
        assert_eq!(s.client.flavor_fallback, FlavorFallback::Placeholder);
        assert_eq!(s.client.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn secret_file_wins_over_env() {
        let s = settings(
            &[
                (ENDPOINT_VAR, "https://cloud.example"),
                (CREDENTIAL_ID_VAR, "app-id"),
                (CREDENTIAL_SECRET_VAR, "from-env"),
                (CREDENTIAL_SECRET_FILE_VAR, "/run/secrets/openstack"),
            ],
            &[("/run/secrets/openstack", "from-file\n")],
        )
        .unwrap();
        assert_eq!(s.credential.application_credential_secret, "from-file");
    }

    #[test]
    fn unreadable_secret_file_falls_back_to_env() {
        let s = settings(
            &[
                (ENDPOINT_VAR, "https://cloud.example"),
                (CREDENTIAL_SECRET_VAR, "from-env"),
                (CREDENTIAL_SECRET_FILE_VAR, "/missing"),
            ],
            &[],
        )
        .unwrap();
        assert_eq!(s.credential.application_credential_secret, "from-env");
        assert!(!s.credential.is_complete());
    }

    #[test]
    fn endpoint_is_required() {
        assert!(settings(&[(CREDENTIAL_ID_VAR, "app-id")], &[]).is_err());
        assert!(settings(&[(ENDPOINT_VAR, "  ")], &[]).is_err());
    }

    #[test]
    fn strict_flag_and_timeout() {
        let s = settings(
            &[
                (ENDPOINT_VAR, "https://cloud.example"),
                (TIMEOUT_VAR, "10"),
                (FLAVOR_STRICT_VAR, "TRUE"),
            ],
            &[],
        )
        .unwrap();
        assert_eq!(s.client.request_timeout, Duration::from_secs(10));
        assert_eq!(s.client.flavor_fallback, FlavorFallback::Strict);
    }

    #[test]
    fn flag_parsing() {
        for on in ["1", "true", "Yes", " on "] {
            assert!(parse_flag(Some(on)), "{on}");
        }
        for off in ["0", "false", "", "strict"] {
            assert!(!parse_flag(Some(off)), "{off}");
        }
        assert!(!parse_flag(None));
    }

    #[test]
    fn timeout_parsing() {
        assert_eq!(parse_timeout_secs(None).unwrap(), None);
        assert_eq!(parse_timeout_secs(Some(" ")).unwrap(), None);
        assert_eq!(
            parse_timeout_secs(Some("45")).unwrap(),
            Some(Duration::from_secs(45))
        );
        assert!(parse_timeout_secs(Some("0")).is_err());
        assert!(parse_timeout_secs(Some("soon")).is_err());
    }
}
