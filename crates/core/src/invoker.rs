//! Compute invoker trait: call-by-name access to downstream functions.
//!
//! Intent handlers use an invoker to fulfil domain requests. The dispatcher
//! never calls it; failures on this path are reported to the user by the
//! handler itself.

use async_trait::async_trait;

use crate::error::InvokeError;

#[async_trait]
pub trait ComputeInvoker: Send + Sync {
    /// Human-readable invoker name (e.g. "http", "static").
    fn name(&self) -> &str;

    /// Invoke `function` with an optional JSON payload and return its result.
    async fn invoke(
        &self,
        function: &str,
        payload: Option<serde_json::Value>,
    ) -> std::result::Result<serde_json::Value, InvokeError>;
}
