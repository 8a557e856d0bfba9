//! Long-running operation waiter
//!
//! Every mutating compute call returns an operation handle; the mutation
//! is durable only once the operation reaches DONE. The waiter polls
//! `operations.get` at a fixed interval with a bounded total wait.

use std::time::Duration;

use tokio::time::Instant;

use crate::error::ComputeError;

use super::ComputeApi;
use super::types::Operation;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(240);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Wait for an operation to complete. A DONE operation carrying errors is
/// fatal; the error message includes `what` for context.
pub async fn wait_for_operation(
    api: &dyn ComputeApi,
    project: &str,
    operation: &Operation,
    what: &str,
) -> Result<(), ComputeError> {
    wait(
        api,
        project,
        operation,
        what,
        DEFAULT_TIMEOUT,
        DEFAULT_POLL_INTERVAL,
        false,
    )
    .await
}

/// Waiter variant for operations on shared resources (SSL policy
/// attach/detach). Such operations can be finalized by another actor, so a
/// vanished operation during polling counts as completed.
pub async fn wait_for_shared_operation(
    api: &dyn ComputeApi,
    project: &str,
    operation: &Operation,
    what: &str,
) -> Result<(), ComputeError> {
    wait(
        api,
        project,
        operation,
        what,
        DEFAULT_TIMEOUT,
        DEFAULT_POLL_INTERVAL,
        true,
    )
    .await
}

/// Fully parameterized waiter; the wrappers above supply the defaults.
pub async fn wait(
    api: &dyn ComputeApi,
    project: &str,
    operation: &Operation,
    what: &str,
    timeout: Duration,
    poll_interval: Duration,
    tolerate_missing: bool,
) -> Result<(), ComputeError> {
    let deadline = Instant::now() + timeout;
    let mut current = operation.clone();

    loop {
        if current.is_done() {
            if let Some(message) = current.error_message() {
                return Err(ComputeError::OperationFailed {
                    name: current.name,
                    message: format!("{}: {}", what, message),
                });
            }
            return Ok(());
        }

        if Instant::now() >= deadline {
            return Err(ComputeError::OperationTimeout { name: current.name });
        }

        tracing::debug!(operation = %current.name, status = %current.status, "{}: waiting", what);
        tokio::time::sleep(poll_interval).await;

        current = match api.get_operation(project, &current.name).await {
            Ok(op) => op,
            Err(e) if tolerate_missing && e.is_not_found() => return Ok(()),
            Err(e) => return Err(e),
        };
    }
}
