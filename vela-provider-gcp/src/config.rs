//! Provider configuration
//!
//! Credentials and the default project are taken from the environment,
//! matching what the gcloud tooling exports.

use crate::error::ComputeError;

/// Configuration for the GCP provider
#[derive(Debug, Clone)]
pub struct GcpConfig {
    /// OAuth2 access token used as bearer auth on every request
    pub access_token: String,
    /// Default project for resources that don't declare one
    pub project: Option<String>,
}

impl GcpConfig {
    pub fn new(access_token: impl Into<String>, project: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            project,
        }
    }

    /// Create GcpConfig from environment variables
    pub fn from_env() -> Result<Self, ComputeError> {
        let access_token = std::env::var("GOOGLE_OAUTH_ACCESS_TOKEN")
            .map_err(|_| ComputeError::MissingEnvVar("GOOGLE_OAUTH_ACCESS_TOKEN".to_string()))?;
        let project = std::env::var("GOOGLE_PROJECT").ok();

        Ok(Self {
            access_token,
            project,
        })
    }
}

/// Resolve the owning project for a resource: the declared `project`
/// attribute wins, then the configured default.
pub fn resolve_project(declared: Option<&str>, default: Option<&str>) -> Result<String, ComputeError> {
    declared
        .or(default)
        .map(String::from)
        .ok_or(ComputeError::MissingProject)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_project_wins() {
        let project = resolve_project(Some("declared-proj"), Some("default-proj")).unwrap();
        assert_eq!(project, "declared-proj");
    }

    #[test]
    fn falls_back_to_default_project() {
        let project = resolve_project(None, Some("default-proj")).unwrap();
        assert_eq!(project, "default-proj");
    }

    #[test]
    fn no_project_is_a_configuration_error() {
        let err = resolve_project(None, None).unwrap_err();
        assert!(matches!(err, ComputeError::MissingProject));
    }
}
