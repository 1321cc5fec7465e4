//! Compute invokers for the training skill.
//!
//! - **HttpInvoker** — POSTs the payload to `{endpoint}/{function}`
//! - **StaticInvoker** — canned results, used when no endpoint is configured

use async_trait::async_trait;
use serde_json::Value;
use speechlet_config::{ComputeConfig, ComputeFunctions};
use speechlet_core::error::InvokeError;
use speechlet_core::invoker::ComputeInvoker;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};

/// Calls remote compute functions over HTTP.
pub struct HttpInvoker {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpInvoker {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, InvokeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InvokeError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }
}

#[async_trait]
impl ComputeInvoker for HttpInvoker {
    fn name(&self) -> &str {
        "http"
    }

    async fn invoke(&self, function: &str, payload: Option<Value>) -> Result<Value, InvokeError> {
        let url = format!("{}/{}", self.endpoint, function);
        debug!(function = %function, url = %url, "Invoking compute function");

        let mut request = self
            .client
            .post(&url)
            .json(&payload.unwrap_or(Value::Null));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| InvokeError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| InvokeError::Network(e.to_string()))?;

        if status == 404 {
            return Err(InvokeError::FunctionNotFound(function.to_string()));
        }
        if !(200..300).contains(&status) {
            return Err(InvokeError::Status {
                function: function.to_string(),
                status_code: status,
                message: body,
            });
        }

        // Functions may answer with bare text rather than JSON.
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }
}

/// Returns fixed results per function and records every call.
#[derive(Default)]
pub struct StaticInvoker {
    results: HashMap<String, Value>,
    calls: Mutex<Vec<(String, Option<Value>)>>,
}

impl StaticInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(mut self, function: impl Into<String>, result: Value) -> Self {
        self.results.insert(function.into(), result);
        self
    }

    /// Plausible results for every function the training skill calls.
    pub fn training_defaults(functions: &ComputeFunctions) -> Self {
        Self::new()
            .with_result(
                &functions.new_tightening_process,
                serde_json::json!({"status": "started"}),
            )
            .with_result(&functions.update_program, Value::String("3".into()))
            .with_result(&functions.battery_status, serde_json::json!({"level": 12}))
            .with_result(&functions.program_number, Value::String("5".into()))
            .with_result(
                &functions.evaluate_tightening,
                serde_json::json!({"ok": true, "torque_nm": 24.5}),
            )
    }

    /// Every `(function, payload)` pair invoked so far.
    pub fn calls(&self) -> Vec<(String, Option<Value>)> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl ComputeInvoker for StaticInvoker {
    fn name(&self) -> &str {
        "static"
    }

    async fn invoke(&self, function: &str, payload: Option<Value>) -> Result<Value, InvokeError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((function.to_string(), payload));

        self.results
            .get(function)
            .cloned()
            .ok_or_else(|| InvokeError::FunctionNotFound(function.to_string()))
    }
}

/// Pick an invoker from configuration: HTTP when an endpoint is set, canned otherwise.
pub fn build_from_config(config: &ComputeConfig) -> Result<Arc<dyn ComputeInvoker>, InvokeError> {
    match &config.endpoint {
        Some(endpoint) => {
            info!(endpoint = %endpoint, "Using HTTP compute invoker");
            let invoker = HttpInvoker::new(
                endpoint.as_str(),
                config.api_key.clone(),
                Duration::from_secs(config.timeout_secs),
            )?;
            Ok(Arc::new(invoker))
        }
        None => {
            info!("No compute endpoint configured, using canned results");
            Ok(Arc::new(StaticInvoker::training_defaults(&config.functions)))
        }
    }
}

/// Render a compute result for speech: strings verbatim, anything else as JSON.
pub fn payload_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
