//! Vela GCP Provider
//!
//! Google Cloud provider implementation: global load-balancing target
//! proxy resources over the Compute Engine API.

pub mod compute;
pub mod config;
pub mod error;
pub mod refs;

mod target_https_proxy;
mod target_ssl_proxy;

use std::sync::Arc;

use vela_core::provider::{BoxFuture, Provider, ProviderError, ProviderResult, ResourceType};
use vela_core::resource::{Resource, ResourceId, State, Value};
use vela_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

use compute::{ComputeApi, ComputeClient};
use config::GcpConfig;
use error::ComputeError;

/// Target SSL Proxy resource type
pub struct TargetSslProxyType;

impl ResourceType for TargetSslProxyType {
    fn name(&self) -> &'static str {
        "compute.target_ssl_proxy"
    }

    fn schema(&self) -> ResourceSchema {
        ResourceSchema::new("compute.target_ssl_proxy")
            .with_description("SSL-terminating proxy in front of a backend service")
            .attribute(
                AttributeSchema::new("name", AttributeType::String)
                    .required()
                    .force_new(),
            )
            .attribute(AttributeSchema::new("backend_service", AttributeType::String).required())
            .attribute(
                AttributeSchema::new(
                    "ssl_certificates",
                    AttributeType::List(Box::new(AttributeType::String)),
                )
                .required()
                .min_items(1),
            )
            .attribute(AttributeSchema::new("description", AttributeType::String).force_new())
            .attribute(
                AttributeSchema::new(
                    "proxy_header",
                    AttributeType::Enum(vec!["NONE".to_string(), "PROXY_V1".to_string()]),
                )
                .with_default(Value::String("NONE".to_string())),
            )
            .attribute(AttributeSchema::new("ssl_policy", AttributeType::String))
            .attribute(AttributeSchema::new("project", AttributeType::String).force_new())
            .attribute(AttributeSchema::new("proxy_id", AttributeType::String).computed())
            .attribute(AttributeSchema::new("self_link", AttributeType::String).computed())
    }
}

/// Target HTTPS Proxy resource type
pub struct TargetHttpsProxyType;

impl ResourceType for TargetHttpsProxyType {
    fn name(&self) -> &'static str {
        "compute.target_https_proxy"
    }

    fn schema(&self) -> ResourceSchema {
        ResourceSchema::new("compute.target_https_proxy")
            .with_description("HTTPS-terminating proxy routing through a URL map")
            .attribute(
                AttributeSchema::new("name", AttributeType::String)
                    .required()
                    .force_new(),
            )
            .attribute(AttributeSchema::new("url_map", AttributeType::String).required())
            .attribute(
                AttributeSchema::new(
                    "ssl_certificates",
                    AttributeType::List(Box::new(AttributeType::String)),
                )
                .required()
                .min_items(1),
            )
            .attribute(AttributeSchema::new("description", AttributeType::String).force_new())
            .attribute(AttributeSchema::new("ssl_policy", AttributeType::String))
            .attribute(AttributeSchema::new("project", AttributeType::String).force_new())
            .attribute(AttributeSchema::new("proxy_id", AttributeType::String).computed())
            .attribute(AttributeSchema::new("self_link", AttributeType::String).computed())
    }
}

/// GCP Provider
pub struct GcpProvider {
    compute: Arc<dyn ComputeApi>,
    /// Default project for resources that don't declare one
    project: Option<String>,
}

impl GcpProvider {
    /// Create a new GCP Provider
    pub fn new(config: &GcpConfig) -> Self {
        Self {
            compute: Arc::new(ComputeClient::new(config)),
            project: config.project.clone(),
        }
    }

    /// Create with a specific API implementation (for testing)
    pub fn with_compute(compute: Arc<dyn ComputeApi>, project: Option<String>) -> Self {
        Self { compute, project }
    }

    pub(crate) fn default_project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    pub(crate) fn resolve_project(
        &self,
        resource: &Resource,
    ) -> Result<String, ComputeError> {
        config::resolve_project(resource.string_attr("project"), self.default_project())
    }

    /// Validate declared attributes before any remote call is attempted
    pub(crate) fn validate_declaration(
        &self,
        schema: &ResourceSchema,
        resource: &Resource,
    ) -> ProviderResult<()> {
        if let Err(errors) = schema.validate(&resource.attributes) {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            return Err(
                ProviderError::new(format!("Invalid configuration: {}", messages.join("; ")))
                    .for_resource(resource.id.clone()),
            );
        }
        Ok(())
    }

    /// Reject in-place updates that touch force-new attributes
    pub(crate) fn reject_force_new_changes(
        &self,
        schema: &ResourceSchema,
        id: &ResourceId,
        from: &State,
        to: &Resource,
    ) -> ProviderResult<()> {
        let forced = schema.force_new_changes(&from.attributes, &to.attributes);
        if !forced.is_empty() {
            return Err(ProviderError::new(format!(
                "Cannot update {} in place: resource replacement required",
                forced.join(", ")
            ))
            .for_resource(id.clone()));
        }
        Ok(())
    }
}

impl Provider for GcpProvider {
    fn name(&self) -> &'static str {
        "gcp"
    }

    fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
        vec![Box::new(TargetSslProxyType), Box::new(TargetHttpsProxyType)]
    }

    fn read(
        &self,
        id: &ResourceId,
        identifier: Option<&str>,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.map(String::from);
        Box::pin(async move {
            match id.resource_type.as_str() {
                "compute.target_ssl_proxy" => {
                    self.read_target_ssl_proxy(&id, identifier.as_deref()).await
                }
                "compute.target_https_proxy" => {
                    self.read_target_https_proxy(&id, identifier.as_deref())
                        .await
                }
                _ => Err(ProviderError::new(format!(
                    "Unknown resource type: {}",
                    id.resource_type
                ))
                .for_resource(id.clone())),
            }
        })
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move {
            match resource.id.resource_type.as_str() {
                "compute.target_ssl_proxy" => self.create_target_ssl_proxy(resource).await,
                "compute.target_https_proxy" => self.create_target_https_proxy(resource).await,
                _ => Err(ProviderError::new(format!(
                    "Unknown resource type: {}",
                    resource.id.resource_type
                ))
                .for_resource(resource.id.clone())),
            }
        })
    }

    fn update(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        let from = from.clone();
        let to = to.clone();
        Box::pin(async move {
            match id.resource_type.as_str() {
                "compute.target_ssl_proxy" => {
                    self.update_target_ssl_proxy(&id, &identifier, &from, &to)
                        .await
                }
                "compute.target_https_proxy" => {
                    self.update_target_https_proxy(&id, &identifier, &from, &to)
                        .await
                }
                _ => Err(ProviderError::new(format!(
                    "Unknown resource type: {}",
                    id.resource_type
                ))
                .for_resource(id.clone())),
            }
        })
    }

    fn delete(&self, id: &ResourceId, identifier: &str) -> BoxFuture<'_, ProviderResult<()>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        Box::pin(async move {
            match id.resource_type.as_str() {
                "compute.target_ssl_proxy" => {
                    self.delete_target_ssl_proxy(&id, &identifier).await
                }
                "compute.target_https_proxy" => {
                    self.delete_target_https_proxy(&id, &identifier).await
                }
                _ => Err(ProviderError::new(format!(
                    "Unknown resource type: {}",
                    id.resource_type
                ))
                .for_resource(id.clone())),
            }
        })
    }
}

/// API request errors carry a short context string
pub(crate) fn api_error(context: &str, e: ComputeError, id: &ResourceId) -> ProviderError {
    ProviderError::new(format!("{}: {}", context, e)).for_resource(id.clone())
}

/// Operation-wait errors are surfaced as-is
pub(crate) fn wait_error(e: ComputeError, id: &ResourceId) -> ProviderError {
    ProviderError::new(e.to_string()).for_resource(id.clone())
}

/// Convert a DSL enum value (provider.TypeName.value) to the API format
/// Handles patterns like:
/// - gcp.ProxyHeader.PROXY_V1 -> PROXY_V1
/// - ProxyHeader.NONE -> NONE
/// - NONE -> NONE
pub(crate) fn normalize_enum_value(value: &str) -> String {
    if value.contains('.') {
        value.split('.').next_back().unwrap_or(value).to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_enum_value() {
        assert_eq!(normalize_enum_value("gcp.ProxyHeader.PROXY_V1"), "PROXY_V1");
        assert_eq!(normalize_enum_value("ProxyHeader.NONE"), "NONE");
        assert_eq!(normalize_enum_value("NONE"), "NONE");
    }

    #[test]
    fn resource_type_names() {
        assert_eq!(TargetSslProxyType.name(), "compute.target_ssl_proxy");
        assert_eq!(TargetHttpsProxyType.name(), "compute.target_https_proxy");
    }

    #[test]
    fn ssl_proxy_schema_marks_identity_immutable() {
        let schema = TargetSslProxyType.schema();
        assert!(schema.attributes["name"].force_new);
        assert!(schema.attributes["description"].force_new);
        assert!(!schema.attributes["backend_service"].force_new);
        assert!(schema.attributes["self_link"].computed);
        assert_eq!(schema.attributes["ssl_certificates"].min_items, Some(1));
        assert_eq!(
            schema.attributes["proxy_header"].default,
            Some(Value::String("NONE".to_string()))
        );
    }
}
