//! Blocking HTTP bridge to the hosted agent platform.
//!
//! Every screen in every console reaches the outside world through this
//! one call: a free-text instruction plus an agent id goes out, a status
//! string plus an arbitrary JSON payload comes back. Nothing is retried,
//! queued, or cached; callers run the call on a worker thread and fold
//! the outcome into a single completion event.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Default inference endpoint of the hosted platform.
pub const DEFAULT_BASE_URL: &str = "https://agent-prod.studio.lyzr.ai";

/// Request timeout. Agent inference is slow; short timeouts just turn
/// slow answers into errors.
const CALL_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors from one bridge call.
///
/// Callers do not branch on the variant: every variant surfaces to the
/// user as the same one-line "call failed" log or alert.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("http error: {0}")]
    Http(String),
    /// The endpoint answered with a non-2xx status.
    #[error("agent endpoint error (status {status}): {message}")]
    Endpoint {
        /// HTTP status code.
        status: u16,
        /// Error message extracted from the body, or the raw body.
        message: String,
    },
    /// The body was not JSON at all.
    #[error("malformed agent reply: {0}")]
    Parse(String),
}

/// One normalized agent reply.
///
/// `status` is the agent platform's own verdict, distinct from HTTP
/// success: a 200 with `status: "error"` is a completed call whose
/// answer is "no". `result` has no fixed schema; callers read it
/// defensively.
#[derive(Debug, Clone)]
pub struct AgentReply {
    /// Platform status string, `"success"` when the agent ran cleanly.
    pub status: String,
    /// Agent-defined payload.
    pub result: Value,
}

impl AgentReply {
    /// Whether the platform reported the call as successful.
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Inference request body.
#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    user_id: &'a str,
    agent_id: &'a str,
    session_id: String,
    message: &'a str,
}

/// The one network client shared by all screens of a console.
///
/// Cheap to clone; clones share the underlying connection pool, so each
/// worker thread grabs its own copy.
#[derive(Debug, Clone)]
pub struct AgentBridge {
    base_url: String,
    user_id: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
}

impl AgentBridge {
    /// Create a bridge against `base_url`, identifying as `user_id`.
    pub fn new(
        base_url: impl Into<String>,
        user_id: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(CALL_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_id: user_id.into(),
            api_key,
            client,
        }
    }

    /// Send one instruction to one agent and wait for the reply.
    ///
    /// Each call opens a fresh platform session; no conversation state
    /// is carried between calls.
    pub fn call(&self, instruction: &str, agent_id: &str) -> Result<AgentReply, BridgeError> {
        let url = format!("{}/v3/inference/chat/", self.base_url);
        let request = ApiRequest {
            user_id: &self.user_id,
            agent_id,
            session_id: format!("{}-{}", agent_id, Utc::now().timestamp_millis()),
            message: instruction,
        };

        debug!(agent_id, prompt_len = instruction.len(), "Calling agent");

        let mut req = self.client.post(&url).json(&request);
        if let Some(key) = &self.api_key {
            req = req.header("x-api-key", key);
        }
        let resp = req.send().map_err(|e| BridgeError::Http(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp.text().map_err(|e| BridgeError::Http(e.to_string()))?;

        if !(200..300).contains(&status) {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| {
                    v["message"]
                        .as_str()
                        .or_else(|| v["error"].as_str())
                        .map(str::to_string)
                })
                .unwrap_or(body);
            return Err(BridgeError::Endpoint { status, message });
        }

        let envelope: Value =
            serde_json::from_str(&body).map_err(|e| BridgeError::Parse(e.to_string()))?;
        let reply = reply_from_envelope(envelope);
        debug!(agent_id, status = %reply.status, "Agent replied");
        Ok(reply)
    }
}

/// Normalize a 2xx body into an `AgentReply`.
///
/// The platform answers either with an explicit `{status, result}`
/// envelope or with a bare `{response: <text>}` wrapper where the text
/// is often JSON (sometimes inside a markdown fence). An envelope with
/// no status field counts as success: the platform only spells the
/// status out when something went wrong.
fn reply_from_envelope(envelope: Value) -> AgentReply {
    let status = envelope["status"]
        .as_str()
        .unwrap_or("success")
        .to_string();
    let result = envelope
        .get("result")
        .or_else(|| envelope.get("response"))
        .cloned()
        .unwrap_or(envelope);
    AgentReply {
        status,
        result: peel_result(result),
    }
}

/// Unwrap a result that arrived as a string of JSON.
///
/// Agents frequently hand structured answers back as text, with or
/// without a ```json fence. Non-JSON text stays as-is.
fn peel_result(result: Value) -> Value {
    let Value::String(text) = &result else {
        return result;
    };
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed);
    match serde_json::from_str::<Value>(inner) {
        Ok(parsed) => parsed,
        Err(_) => result,
    }
}
