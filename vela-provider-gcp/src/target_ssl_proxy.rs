//! Target SSL Proxy resource manager
//!
//! Maps the `compute.target_ssl_proxy` declaration onto the
//! targetSslProxies API: insert/get/delete plus the per-field mutation
//! calls, each blocking on its returned operation.

use std::collections::HashMap;

use vela_core::provider::{ProviderError, ProviderResult, ResourceType};
use vela_core::resource::{Resource, ResourceId, State, Value};

use crate::compute::operation::{wait_for_operation, wait_for_shared_operation};
use crate::compute::types::TargetSslProxy;
use crate::{GcpProvider, TargetSslProxyType, api_error, normalize_enum_value, refs, wait_error};

const COLLECTION: &str = "targetSslProxies";

impl GcpProvider {
    /// Create a target SSL proxy, attach the SSL policy if one is
    /// declared, and read the resulting remote state back.
    pub(crate) async fn create_target_ssl_proxy(
        &self,
        resource: Resource,
    ) -> ProviderResult<State> {
        self.validate_declaration(&TargetSslProxyType.schema(), &resource)?;

        let project = self
            .resolve_project(&resource)
            .map_err(|e| ProviderError::new(e.to_string()).for_resource(resource.id.clone()))?;

        let name = match resource.string_attr("name") {
            Some(s) => s.to_string(),
            None => {
                return Err(ProviderError::new("Proxy name is required")
                    .for_resource(resource.id.clone()));
            }
        };

        let service = match resource.string_attr("backend_service") {
            Some(s) => s.to_string(),
            None => {
                return Err(ProviderError::new("Backend service is required")
                    .for_resource(resource.id.clone()));
            }
        };

        // Schema validation already rejected an absent or empty list
        let declared_certs = resource
            .string_list_attr("ssl_certificates")
            .unwrap_or_default();
        let ssl_certificates = refs::expand_ssl_certificates(&declared_certs, &project)
            .map_err(|e| api_error("Invalid ssl certificate", e, &resource.id))?;

        let proxy_header = resource
            .string_attr("proxy_header")
            .map(normalize_enum_value)
            .unwrap_or_else(|| "NONE".to_string());

        let proxy = TargetSslProxy {
            name: name.clone(),
            service,
            ssl_certificates,
            proxy_header: Some(proxy_header),
            description: resource.string_attr("description").map(String::from),
            ..Default::default()
        };

        tracing::debug!(?proxy, "target SSL proxy insert request");
        let op = self
            .compute
            .insert_target_ssl_proxy(&project, &proxy)
            .await
            .map_err(|e| api_error("Error creating target SSL proxy", e, &resource.id))?;
        wait_for_operation(
            self.compute.as_ref(),
            &project,
            &op,
            "Creating target SSL proxy",
        )
        .await
        .map_err(|e| wait_error(e, &resource.id))?;

        if let Some(policy) = resource.string_attr("ssl_policy") {
            let link = refs::parse_ssl_policy(policy, &project)
                .map_err(|e| api_error("Invalid ssl policy", e, &resource.id))?;
            let op = self
                .compute
                .set_ssl_proxy_policy(&project, &name, &link.relative_link())
                .await
                .map_err(|e| api_error("Error setting SSL policy", e, &resource.id))?;
            wait_for_shared_operation(
                self.compute.as_ref(),
                &project,
                &op,
                "Adding target SSL proxy SSL policy",
            )
            .await
            .map_err(|e| wait_error(e, &resource.id))?;
        }

        self.read_target_ssl_proxy_in(&project, &name, resource.id.clone())
            .await
    }

    /// Read by remote identity; an absent remote object clears local state
    /// instead of failing. With an identifier this doubles as import. The
    /// identity is a relative link carrying the owning project; a bare name
    /// resolves against the configured default.
    pub(crate) async fn read_target_ssl_proxy(
        &self,
        id: &ResourceId,
        identifier: Option<&str>,
    ) -> ProviderResult<State> {
        let reference = identifier.unwrap_or(&id.name);
        let link = refs::parse_identity(reference, COLLECTION, self.default_project())
            .map_err(|e| ProviderError::new(e.to_string()).for_resource(id.clone()))?;
        self.read_target_ssl_proxy_in(&link.project, &link.name, id.clone())
            .await
    }

    async fn read_target_ssl_proxy_in(
        &self,
        project: &str,
        name: &str,
        id: ResourceId,
    ) -> ProviderResult<State> {
        let proxy = match self.compute.get_target_ssl_proxy(project, name).await {
            Ok(proxy) => proxy,
            Err(e) if e.is_not_found() => {
                tracing::info!(name, "target SSL proxy no longer exists, clearing state");
                return Ok(State::not_found(id));
            }
            Err(e) => return Err(api_error("Error reading target SSL proxy", e, &id)),
        };

        let mut attributes = HashMap::new();
        attributes.insert("name".to_string(), Value::String(proxy.name.clone()));
        attributes.insert("backend_service".to_string(), Value::String(proxy.service));
        attributes.insert(
            "ssl_certificates".to_string(),
            Value::List(
                proxy
                    .ssl_certificates
                    .into_iter()
                    .map(Value::String)
                    .collect(),
            ),
        );
        if let Some(description) = proxy.description {
            attributes.insert("description".to_string(), Value::String(description));
        }
        if let Some(header) = proxy.proxy_header {
            attributes.insert("proxy_header".to_string(), Value::String(header));
        }
        if let Some(policy) = proxy.ssl_policy {
            attributes.insert("ssl_policy".to_string(), Value::String(policy));
        }
        attributes.insert("project".to_string(), Value::String(project.to_string()));
        if let Some(self_link) = proxy.self_link {
            attributes.insert("self_link".to_string(), Value::String(self_link));
        }
        if let Some(proxy_id) = proxy.id {
            attributes.insert("proxy_id".to_string(), Value::String(proxy_id.to_string()));
        }

        // The stored identity keeps the owning project with the name, so
        // later reads and deletes target the right project.
        let identity = refs::ResourceLink {
            project: project.to_string(),
            collection: COLLECTION.to_string(),
            name: proxy.name,
        }
        .relative_link();
        Ok(State::existing(id, attributes).with_identifier(identity))
    }

    /// Update mutable field groups independently, blocking on each
    /// operation before the next. Not atomic: a failure partway through
    /// leaves earlier groups applied.
    pub(crate) async fn update_target_ssl_proxy(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> ProviderResult<State> {
        let schema = TargetSslProxyType.schema();
        self.validate_declaration(&schema, to)?;
        self.reject_force_new_changes(&schema, id, from, to)?;

        let link = refs::parse_identity(
            identifier,
            COLLECTION,
            to.string_attr("project").or(self.default_project()),
        )
        .map_err(|e| ProviderError::new(e.to_string()).for_resource(id.clone()))?;
        let project = link.project;
        let name = link.name;

        if let Some(declared) = to.string_attr("proxy_header") {
            let header = normalize_enum_value(declared);
            if from.string_attr("proxy_header") != Some(header.as_str()) {
                let op = self
                    .compute
                    .set_ssl_proxy_header(&project, &name, &header)
                    .await
                    .map_err(|e| api_error("Error updating proxy_header", e, id))?;
                wait_for_operation(
                    self.compute.as_ref(),
                    &project,
                    &op,
                    "Updating target SSL proxy",
                )
                .await
                .map_err(|e| wait_error(e, id))?;
            }
        }

        if let Some(service) = to.string_attr("backend_service") {
            let changed = from
                .string_attr("backend_service")
                .is_none_or(|old| !refs::same_reference(old, service));
            if changed {
                let op = self
                    .compute
                    .set_ssl_proxy_backend_service(&project, &name, service)
                    .await
                    .map_err(|e| api_error("Error updating backend_service", e, id))?;
                wait_for_operation(
                    self.compute.as_ref(),
                    &project,
                    &op,
                    "Updating target SSL proxy",
                )
                .await
                .map_err(|e| wait_error(e, id))?;
            }
        }

        if let Some(declared) = to.string_list_attr("ssl_certificates") {
            let expanded = refs::expand_ssl_certificates(&declared, &project)
                .map_err(|e| api_error("Invalid ssl certificate", e, id))?;
            let last_known = match from.attributes.get("ssl_certificates") {
                Some(Value::List(items)) => items
                    .iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect(),
                _ => Vec::new(),
            };
            if !refs::same_reference_list(&expanded, &last_known) {
                let op = self
                    .compute
                    .set_ssl_proxy_certificates(&project, &name, &expanded)
                    .await
                    .map_err(|e| api_error("Error updating ssl_certificates", e, id))?;
                wait_for_operation(
                    self.compute.as_ref(),
                    &project,
                    &op,
                    "Updating target SSL proxy",
                )
                .await
                .map_err(|e| wait_error(e, id))?;
            }
        }

        match (to.string_attr("ssl_policy"), from.string_attr("ssl_policy")) {
            (Some(declared), last_known) => {
                if last_known.is_none_or(|old| !refs::same_reference(old, declared)) {
                    let policy_link = refs::parse_ssl_policy(declared, &project)
                        .map_err(|e| api_error("Invalid ssl policy", e, id))?;
                    let op = self
                        .compute
                        .set_ssl_proxy_policy(&project, &name, &policy_link.relative_link())
                        .await
                        .map_err(|e| api_error("Error updating SSL policy", e, id))?;
                    wait_for_shared_operation(
                        self.compute.as_ref(),
                        &project,
                        &op,
                        "Updating target SSL proxy SSL policy",
                    )
                    .await
                    .map_err(|e| wait_error(e, id))?;
                }
            }
            // Declared no policy while one is attached: detach it
            (None, Some(_)) => {
                let op = self
                    .compute
                    .set_ssl_proxy_policy(&project, &name, "")
                    .await
                    .map_err(|e| api_error("Error clearing SSL policy", e, id))?;
                wait_for_shared_operation(
                    self.compute.as_ref(),
                    &project,
                    &op,
                    "Removing target SSL proxy SSL policy",
                )
                .await
                .map_err(|e| wait_error(e, id))?;
            }
            (None, None) => {}
        }

        self.read_target_ssl_proxy_in(&project, &name, id.clone())
            .await
    }

    /// Delete the proxy and block until the operation completes
    pub(crate) async fn delete_target_ssl_proxy(
        &self,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        let link = refs::parse_identity(identifier, COLLECTION, self.default_project())
            .map_err(|e| ProviderError::new(e.to_string()).for_resource(id.clone()))?;

        tracing::debug!(identifier, "target SSL proxy delete request");
        let op = self
            .compute
            .delete_target_ssl_proxy(&link.project, &link.name)
            .await
            .map_err(|e| api_error("Error deleting target SSL proxy", e, id))?;
        wait_for_operation(
            self.compute.as_ref(),
            &link.project,
            &op,
            "Deleting target SSL proxy",
        )
        .await
        .map_err(|e| wait_error(e, id))?;

        Ok(())
    }
}
