//! In-memory ComputeApi fake for tests
//!
//! Stores proxies in hash maps, records every call, and mints operations
//! whose polling behavior is configurable per test.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::ComputeError;

use super::types::{Operation, TargetHttpsProxy, TargetSslProxy};
use super::{ComputeApi, ComputeResult};

#[derive(Default)]
struct FakeOperation {
    remaining_polls: u32,
    error: Option<String>,
}

#[derive(Default)]
struct Inner {
    ssl_proxies: HashMap<String, TargetSslProxy>,
    https_proxies: HashMap<String, TargetHttpsProxy>,
    operations: HashMap<String, FakeOperation>,
    calls: Vec<&'static str>,
    next_op: u64,
    next_id: u64,
    pending_polls: u32,
    fail_next: Option<String>,
    drop_operations: bool,
}

#[derive(Default)]
pub struct FakeCompute {
    inner: Mutex<Inner>,
}

impl FakeCompute {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every minted operation serves this many PENDING polls before DONE
    pub fn with_pending_polls(self, polls: u32) -> Self {
        self.inner.lock().unwrap().pending_polls = polls;
        self
    }

    /// get_operation answers 404 for every operation
    pub fn with_dropped_operations(self) -> Self {
        self.inner.lock().unwrap().drop_operations = true;
        self
    }

    /// The next minted operation completes carrying this error
    pub fn fail_next_operation(&self, message: &str) {
        self.inner.lock().unwrap().fail_next = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| **c == method)
            .count()
    }

    /// Mint an operation the way the mutating calls do
    pub fn mint_operation(&self) -> Operation {
        let mut inner = self.inner.lock().unwrap();
        Self::mint(&mut inner)
    }

    fn mint(inner: &mut Inner) -> Operation {
        inner.next_op += 1;
        let name = format!("op-{}", inner.next_op);
        let error = inner.fail_next.take();

        if inner.pending_polls == 0 {
            if let Some(message) = error {
                return Operation {
                    name,
                    status: "DONE".to_string(),
                    error: Some(super::types::OperationError {
                        errors: vec![super::types::OperationErrorDetail {
                            code: "ERROR".to_string(),
                            message,
                        }],
                    }),
                };
            }
            return Operation {
                name,
                status: "DONE".to_string(),
                error: None,
            };
        }

        inner.operations.insert(
            name.clone(),
            FakeOperation {
                remaining_polls: inner.pending_polls,
                error,
            },
        );
        Operation {
            name,
            status: "PENDING".to_string(),
            error: None,
        }
    }

    fn record(&self, method: &'static str) -> std::sync::MutexGuard<'_, Inner> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(method);
        inner
    }
}

#[async_trait]
impl ComputeApi for FakeCompute {
    async fn insert_target_ssl_proxy(
        &self,
        project: &str,
        proxy: &TargetSslProxy,
    ) -> ComputeResult<Operation> {
        let mut inner = self.record("insert_target_ssl_proxy");
        inner.next_id += 1;
        let mut stored = proxy.clone();
        stored.id = Some(inner.next_id);
        stored.self_link = Some(format!(
            "https://www.googleapis.com/compute/v1/projects/{}/global/targetSslProxies/{}",
            project, proxy.name
        ));
        inner.ssl_proxies.insert(proxy.name.clone(), stored);
        Ok(Self::mint(&mut inner))
    }

    async fn get_target_ssl_proxy(
        &self,
        _project: &str,
        name: &str,
    ) -> ComputeResult<TargetSslProxy> {
        let inner = self.record("get_target_ssl_proxy");
        inner
            .ssl_proxies
            .get(name)
            .cloned()
            .ok_or_else(|| ComputeError::NotFound(format!("targetSslProxies/{}", name)))
    }

    async fn delete_target_ssl_proxy(
        &self,
        _project: &str,
        name: &str,
    ) -> ComputeResult<Operation> {
        let mut inner = self.record("delete_target_ssl_proxy");
        if inner.ssl_proxies.remove(name).is_none() {
            return Err(ComputeError::NotFound(format!("targetSslProxies/{}", name)));
        }
        Ok(Self::mint(&mut inner))
    }

    async fn set_ssl_proxy_backend_service(
        &self,
        _project: &str,
        name: &str,
        service: &str,
    ) -> ComputeResult<Operation> {
        let mut inner = self.record("set_ssl_proxy_backend_service");
        match inner.ssl_proxies.get_mut(name) {
            Some(proxy) => proxy.service = service.to_string(),
            None => return Err(ComputeError::NotFound(format!("targetSslProxies/{}", name))),
        }
        Ok(Self::mint(&mut inner))
    }

    async fn set_ssl_proxy_header(
        &self,
        _project: &str,
        name: &str,
        proxy_header: &str,
    ) -> ComputeResult<Operation> {
        let mut inner = self.record("set_ssl_proxy_header");
        match inner.ssl_proxies.get_mut(name) {
            Some(proxy) => proxy.proxy_header = Some(proxy_header.to_string()),
            None => return Err(ComputeError::NotFound(format!("targetSslProxies/{}", name))),
        }
        Ok(Self::mint(&mut inner))
    }

    async fn set_ssl_proxy_certificates(
        &self,
        _project: &str,
        name: &str,
        certificates: &[String],
    ) -> ComputeResult<Operation> {
        let mut inner = self.record("set_ssl_proxy_certificates");
        match inner.ssl_proxies.get_mut(name) {
            Some(proxy) => proxy.ssl_certificates = certificates.to_vec(),
            None => return Err(ComputeError::NotFound(format!("targetSslProxies/{}", name))),
        }
        Ok(Self::mint(&mut inner))
    }

    async fn set_ssl_proxy_policy(
        &self,
        _project: &str,
        name: &str,
        ssl_policy: &str,
    ) -> ComputeResult<Operation> {
        let mut inner = self.record("set_ssl_proxy_policy");
        match inner.ssl_proxies.get_mut(name) {
            // An empty reference detaches the policy
            Some(proxy) if ssl_policy.is_empty() => proxy.ssl_policy = None,
            Some(proxy) => proxy.ssl_policy = Some(ssl_policy.to_string()),
            None => return Err(ComputeError::NotFound(format!("targetSslProxies/{}", name))),
        }
        Ok(Self::mint(&mut inner))
    }

    async fn insert_target_https_proxy(
        &self,
        project: &str,
        proxy: &TargetHttpsProxy,
    ) -> ComputeResult<Operation> {
        let mut inner = self.record("insert_target_https_proxy");
        inner.next_id += 1;
        let mut stored = proxy.clone();
        stored.id = Some(inner.next_id);
        stored.self_link = Some(format!(
            "https://www.googleapis.com/compute/v1/projects/{}/global/targetHttpsProxies/{}",
            project, proxy.name
        ));
        inner.https_proxies.insert(proxy.name.clone(), stored);
        Ok(Self::mint(&mut inner))
    }

    async fn get_target_https_proxy(
        &self,
        _project: &str,
        name: &str,
    ) -> ComputeResult<TargetHttpsProxy> {
        let inner = self.record("get_target_https_proxy");
        inner
            .https_proxies
            .get(name)
            .cloned()
            .ok_or_else(|| ComputeError::NotFound(format!("targetHttpsProxies/{}", name)))
    }

    async fn delete_target_https_proxy(
        &self,
        _project: &str,
        name: &str,
    ) -> ComputeResult<Operation> {
        let mut inner = self.record("delete_target_https_proxy");
        if inner.https_proxies.remove(name).is_none() {
            return Err(ComputeError::NotFound(format!(
                "targetHttpsProxies/{}",
                name
            )));
        }
        Ok(Self::mint(&mut inner))
    }

    async fn set_https_proxy_url_map(
        &self,
        _project: &str,
        name: &str,
        url_map: &str,
    ) -> ComputeResult<Operation> {
        let mut inner = self.record("set_https_proxy_url_map");
        match inner.https_proxies.get_mut(name) {
            Some(proxy) => proxy.url_map = url_map.to_string(),
            None => {
                return Err(ComputeError::NotFound(format!(
                    "targetHttpsProxies/{}",
                    name
                )));
            }
        }
        Ok(Self::mint(&mut inner))
    }

    async fn set_https_proxy_certificates(
        &self,
        _project: &str,
        name: &str,
        certificates: &[String],
    ) -> ComputeResult<Operation> {
        let mut inner = self.record("set_https_proxy_certificates");
        match inner.https_proxies.get_mut(name) {
            Some(proxy) => proxy.ssl_certificates = certificates.to_vec(),
            None => {
                return Err(ComputeError::NotFound(format!(
                    "targetHttpsProxies/{}",
                    name
                )));
            }
        }
        Ok(Self::mint(&mut inner))
    }

    async fn set_https_proxy_policy(
        &self,
        _project: &str,
        name: &str,
        ssl_policy: &str,
    ) -> ComputeResult<Operation> {
        let mut inner = self.record("set_https_proxy_policy");
        match inner.https_proxies.get_mut(name) {
            Some(proxy) if ssl_policy.is_empty() => proxy.ssl_policy = None,
            Some(proxy) => proxy.ssl_policy = Some(ssl_policy.to_string()),
            None => {
                return Err(ComputeError::NotFound(format!(
                    "targetHttpsProxies/{}",
                    name
                )));
            }
        }
        Ok(Self::mint(&mut inner))
    }

    async fn get_operation(&self, _project: &str, name: &str) -> ComputeResult<Operation> {
        let mut inner = self.record("get_operation");
        if inner.drop_operations {
            return Err(ComputeError::NotFound(format!("operations/{}", name)));
        }

        let Some(op) = inner.operations.get_mut(name) else {
            // Operations minted as immediately-DONE are not tracked
            return Ok(Operation {
                name: name.to_string(),
                status: "DONE".to_string(),
                error: None,
            });
        };

        if op.remaining_polls > 0 {
            op.remaining_polls -= 1;
            return Ok(Operation {
                name: name.to_string(),
                status: "PENDING".to_string(),
                error: None,
            });
        }

        let error = op.error.take().map(|message| super::types::OperationError {
            errors: vec![super::types::OperationErrorDetail {
                code: "ERROR".to_string(),
                message,
            }],
        });
        Ok(Operation {
            name: name.to_string(),
            status: "DONE".to_string(),
            error,
        })
    }
}
