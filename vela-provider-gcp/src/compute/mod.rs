//! Compute Engine API surface
//!
//! `ComputeApi` is the narrow slice of the global compute API this
//! provider calls. The real implementation is the REST `ComputeClient`;
//! tests substitute an in-memory fake.

pub mod client;
pub mod operation;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;

use crate::error::ComputeError;
use types::{Operation, TargetHttpsProxy, TargetSslProxy};

pub use client::ComputeClient;

pub type ComputeResult<T> = Result<T, ComputeError>;

/// Slice of the Compute Engine API used by the proxy resource managers.
///
/// Every mutating call returns an [`Operation`] handle that must be polled
/// to completion before the mutation is considered durable.
#[async_trait]
pub trait ComputeApi: Send + Sync {
    // ---- target SSL proxies ----

    async fn insert_target_ssl_proxy(
        &self,
        project: &str,
        proxy: &TargetSslProxy,
    ) -> ComputeResult<Operation>;

    async fn get_target_ssl_proxy(
        &self,
        project: &str,
        name: &str,
    ) -> ComputeResult<TargetSslProxy>;

    async fn delete_target_ssl_proxy(&self, project: &str, name: &str)
    -> ComputeResult<Operation>;

    async fn set_ssl_proxy_backend_service(
        &self,
        project: &str,
        name: &str,
        service: &str,
    ) -> ComputeResult<Operation>;

    async fn set_ssl_proxy_header(
        &self,
        project: &str,
        name: &str,
        proxy_header: &str,
    ) -> ComputeResult<Operation>;

    async fn set_ssl_proxy_certificates(
        &self,
        project: &str,
        name: &str,
        certificates: &[String],
    ) -> ComputeResult<Operation>;

    async fn set_ssl_proxy_policy(
        &self,
        project: &str,
        name: &str,
        ssl_policy: &str,
    ) -> ComputeResult<Operation>;

    // ---- target HTTPS proxies ----

    async fn insert_target_https_proxy(
        &self,
        project: &str,
        proxy: &TargetHttpsProxy,
    ) -> ComputeResult<Operation>;

    async fn get_target_https_proxy(
        &self,
        project: &str,
        name: &str,
    ) -> ComputeResult<TargetHttpsProxy>;

    async fn delete_target_https_proxy(
        &self,
        project: &str,
        name: &str,
    ) -> ComputeResult<Operation>;

    async fn set_https_proxy_url_map(
        &self,
        project: &str,
        name: &str,
        url_map: &str,
    ) -> ComputeResult<Operation>;

    async fn set_https_proxy_certificates(
        &self,
        project: &str,
        name: &str,
        certificates: &[String],
    ) -> ComputeResult<Operation>;

    async fn set_https_proxy_policy(
        &self,
        project: &str,
        name: &str,
        ssl_policy: &str,
    ) -> ComputeResult<Operation>;

    // ---- global operations ----

    async fn get_operation(&self, project: &str, name: &str) -> ComputeResult<Operation>;
}
