//! Error types for the GCP provider

use thiserror::Error;

/// Errors from the Compute Engine API layer
#[derive(Debug, Error)]
pub enum ComputeError {
    /// Required environment variable is not set
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// No project declared on the resource and no default configured
    #[error("No project specified: set the 'project' attribute or GOOGLE_PROJECT")]
    MissingProject,

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API-level rejection (quota, invalid field, duplicate name, ...)
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The remote object does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A reference string could not be parsed into a resource link
    #[error("Invalid resource reference: {0}")]
    InvalidReference(String),

    /// An operation reached DONE carrying errors
    #[error("Operation {name} failed: {message}")]
    OperationFailed { name: String, message: String },

    /// An operation did not reach DONE within the wait budget
    #[error("Operation {name} timed out")]
    OperationTimeout { name: String },
}

impl ComputeError {
    /// Classifier for "resource no longer exists" conditions. Read maps
    /// these into cleared local state instead of surfacing an error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ComputeError::NotFound(_))
            || matches!(self, ComputeError::Api { status: 404, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_classifier() {
        assert!(ComputeError::NotFound("proxy".to_string()).is_not_found());
        assert!(
            ComputeError::Api {
                status: 404,
                message: "not found".to_string()
            }
            .is_not_found()
        );
        assert!(
            !ComputeError::Api {
                status: 403,
                message: "forbidden".to_string()
            }
            .is_not_found()
        );
        assert!(
            !ComputeError::OperationTimeout {
                name: "op-1".to_string()
            }
            .is_not_found()
        );
    }
}
