//! Compute Engine REST client
//!
//! Direct implementation against the global compute v1 endpoints using
//! bearer token authentication.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::GcpConfig;
use crate::error::ComputeError;

use super::types::{
    Operation, SetBackendServiceRequest, SetProxyHeaderRequest, SetSslCertificatesRequest,
    SslPolicyReference, TargetHttpsProxy, TargetSslProxy, UrlMapReference,
};
use super::{ComputeApi, ComputeResult};

/// Base URL for the compute v1 API; resource self links share this prefix.
pub const COMPUTE_API_BASE: &str = "https://www.googleapis.com/compute/v1";

/// Compute Engine API client
pub struct ComputeClient {
    client: reqwest::Client,
    access_token: String,
}

impl ComputeClient {
    pub fn new(config: &GcpConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token: config.access_token.clone(),
        }
    }

    fn global_url(&self, project: &str, path: &str) -> String {
        format!("{}/projects/{}/global/{}", COMPUTE_API_BASE, project, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> ComputeResult<T> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> ComputeResult<T> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn delete_json<T: DeserializeOwned>(&self, url: &str) -> ComputeResult<T> {
        let response = self
            .client
            .delete(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ComputeResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = match response.json::<serde_json::Value>().await {
            Ok(body) => body["error"]["message"]
                .as_str()
                .unwrap_or("unknown error")
                .to_string(),
            Err(_) => "unknown error".to_string(),
        };

        if status.as_u16() == 404 {
            Err(ComputeError::NotFound(message))
        } else {
            Err(ComputeError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl ComputeApi for ComputeClient {
    async fn insert_target_ssl_proxy(
        &self,
        project: &str,
        proxy: &TargetSslProxy,
    ) -> ComputeResult<Operation> {
        let url = self.global_url(project, "targetSslProxies");
        self.post_json(&url, proxy).await
    }

    async fn get_target_ssl_proxy(
        &self,
        project: &str,
        name: &str,
    ) -> ComputeResult<TargetSslProxy> {
        let url = self.global_url(project, &format!("targetSslProxies/{}", name));
        self.get_json(&url).await
    }

    async fn delete_target_ssl_proxy(
        &self,
        project: &str,
        name: &str,
    ) -> ComputeResult<Operation> {
        let url = self.global_url(project, &format!("targetSslProxies/{}", name));
        self.delete_json(&url).await
    }

    async fn set_ssl_proxy_backend_service(
        &self,
        project: &str,
        name: &str,
        service: &str,
    ) -> ComputeResult<Operation> {
        let url = self.global_url(
            project,
            &format!("targetSslProxies/{}/setBackendService", name),
        );
        let body = SetBackendServiceRequest {
            service: service.to_string(),
        };
        self.post_json(&url, &body).await
    }

    async fn set_ssl_proxy_header(
        &self,
        project: &str,
        name: &str,
        proxy_header: &str,
    ) -> ComputeResult<Operation> {
        let url = self.global_url(project, &format!("targetSslProxies/{}/setProxyHeader", name));
        let body = SetProxyHeaderRequest {
            proxy_header: proxy_header.to_string(),
        };
        self.post_json(&url, &body).await
    }

    async fn set_ssl_proxy_certificates(
        &self,
        project: &str,
        name: &str,
        certificates: &[String],
    ) -> ComputeResult<Operation> {
        let url = self.global_url(
            project,
            &format!("targetSslProxies/{}/setSslCertificates", name),
        );
        let body = SetSslCertificatesRequest {
            ssl_certificates: certificates.to_vec(),
        };
        self.post_json(&url, &body).await
    }

    async fn set_ssl_proxy_policy(
        &self,
        project: &str,
        name: &str,
        ssl_policy: &str,
    ) -> ComputeResult<Operation> {
        let url = self.global_url(project, &format!("targetSslProxies/{}/setSslPolicy", name));
        let body = SslPolicyReference {
            ssl_policy: ssl_policy.to_string(),
        };
        self.post_json(&url, &body).await
    }

    async fn insert_target_https_proxy(
        &self,
        project: &str,
        proxy: &TargetHttpsProxy,
    ) -> ComputeResult<Operation> {
        let url = self.global_url(project, "targetHttpsProxies");
        self.post_json(&url, proxy).await
    }

    async fn get_target_https_proxy(
        &self,
        project: &str,
        name: &str,
    ) -> ComputeResult<TargetHttpsProxy> {
        let url = self.global_url(project, &format!("targetHttpsProxies/{}", name));
        self.get_json(&url).await
    }

    async fn delete_target_https_proxy(
        &self,
        project: &str,
        name: &str,
    ) -> ComputeResult<Operation> {
        let url = self.global_url(project, &format!("targetHttpsProxies/{}", name));
        self.delete_json(&url).await
    }

    async fn set_https_proxy_url_map(
        &self,
        project: &str,
        name: &str,
        url_map: &str,
    ) -> ComputeResult<Operation> {
        let url = self.global_url(project, &format!("targetHttpsProxies/{}/setUrlMap", name));
        let body = UrlMapReference {
            url_map: url_map.to_string(),
        };
        self.post_json(&url, &body).await
    }

    async fn set_https_proxy_certificates(
        &self,
        project: &str,
        name: &str,
        certificates: &[String],
    ) -> ComputeResult<Operation> {
        let url = self.global_url(
            project,
            &format!("targetHttpsProxies/{}/setSslCertificates", name),
        );
        let body = SetSslCertificatesRequest {
            ssl_certificates: certificates.to_vec(),
        };
        self.post_json(&url, &body).await
    }

    async fn set_https_proxy_policy(
        &self,
        project: &str,
        name: &str,
        ssl_policy: &str,
    ) -> ComputeResult<Operation> {
        let url = self.global_url(project, &format!("targetHttpsProxies/{}/setSslPolicy", name));
        let body = SslPolicyReference {
            ssl_policy: ssl_policy.to_string(),
        };
        self.post_json(&url, &body).await
    }

    async fn get_operation(&self, project: &str, name: &str) -> ComputeResult<Operation> {
        let url = self.global_url(project, &format!("operations/{}", name));
        self.get_json(&url).await
    }
}
