//! Compute Engine API wire types
//!
//! Only the fields this provider reads or writes are modeled; the API
//! tolerates absent fields on insert and we ignore unknown fields on read.

use serde::{Deserialize, Serialize};

/// A TLS-terminating proxy forwarding to a backend service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSslProxy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Backend service link
    pub service: String,
    pub ssl_certificates: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
}

/// An HTTPS-terminating proxy forwarding through a URL map
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetHttpsProxy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url_map: String,
    pub ssl_certificates: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
}

/// Handle for an asynchronous remote task, polled to completion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub name: String,
    /// PENDING, RUNNING or DONE
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,
}

impl Operation {
    pub fn is_done(&self) -> bool {
        self.status == "DONE"
    }

    /// Joined error messages, if the operation carries any
    pub fn error_message(&self) -> Option<String> {
        let error = self.error.as_ref()?;
        if error.errors.is_empty() {
            return None;
        }
        Some(
            error
                .errors
                .iter()
                .map(|e| e.message.clone())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub errors: Vec<OperationErrorDetail>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

// ---- request bodies for the per-field mutation calls ----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetBackendServiceRequest {
    pub service: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetProxyHeaderRequest {
    pub proxy_header: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSslCertificatesRequest {
    pub ssl_certificates: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SslPolicyReference {
    pub ssl_policy: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlMapReference {
    pub url_map: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proxy_serializes_camel_case_and_skips_unset() {
        let proxy = TargetSslProxy {
            name: "proxy".to_string(),
            service: "projects/p/global/backendServices/svc".to_string(),
            ssl_certificates: vec!["projects/p/global/sslCertificates/cert".to_string()],
            proxy_header: Some("NONE".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_value(&proxy).unwrap();
        assert_eq!(json["name"], "proxy");
        assert_eq!(json["proxyHeader"], "NONE");
        assert!(json.get("sslPolicy").is_none());
        assert!(json.get("selfLink").is_none());
    }

    #[test]
    fn operation_error_message_joins_details() {
        let op: Operation = serde_json::from_value(serde_json::json!({
            "name": "op-1",
            "status": "DONE",
            "error": {
                "errors": [
                    {"code": "QUOTA_EXCEEDED", "message": "quota exceeded"},
                    {"code": "INVALID", "message": "bad field"}
                ]
            }
        }))
        .unwrap();

        assert!(op.is_done());
        assert_eq!(
            op.error_message().unwrap(),
            "quota exceeded; bad field"
        );
    }

    #[test]
    fn operation_without_error_has_no_message() {
        let op: Operation = serde_json::from_value(serde_json::json!({
            "name": "op-2",
            "status": "RUNNING"
        }))
        .unwrap();

        assert!(!op.is_done());
        assert!(op.error_message().is_none());
    }
}
