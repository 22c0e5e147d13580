//! Shared plumbing for the generative service endpoints.

use std::time::Duration;

use serde_json::Value;

use crate::error::ServiceError;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default time to wait for the remote service.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin blocking client around the generate-content endpoint.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    api_key: Option<String>,
    timeout: Duration,
}

impl ServiceClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// A key shorter than a real credential is treated as absent.
    pub fn has_key(&self) -> bool {
        self.api_key.as_deref().map_or(false, |k| k.len() > 10)
    }

    /// POST a generate-content request to the given model.
    pub fn generate(&self, model: &str, body: Value) -> Result<Value, ServiceError> {
        if !self.has_key() {
            return Err(ServiceError::MissingKey);
        }
        let key = self.api_key.as_deref().unwrap_or_default();
        let url = format!("{}/{}:generateContent?key={}", API_BASE, model, key);

        let response = match ureq::post(&url)
            .timeout(self.timeout)
            .set("Content-Type", "application/json")
            .send_json(body)
        {
            Ok(resp) => resp,
            Err(ureq::Error::Status(code, _)) => return Err(ServiceError::BadStatus(code)),
            Err(e) => return Err(ServiceError::RemoteUnavailable(Box::new(e))),
        };

        response
            .into_json()
            .map_err(|e| ServiceError::MalformedReply(e.to_string()))
    }

    /// Pull the first candidate's text part out of a reply.
    pub fn first_text(reply: &Value) -> Result<&str, ServiceError> {
        reply["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| ServiceError::MalformedReply("no text part in reply".to_string()))
    }

    /// Pull the first candidate's inline binary payload (base64) out of a
    /// reply, scanning parts since text may precede it.
    pub fn first_inline_data(reply: &Value) -> Result<&str, ServiceError> {
        reply["candidates"][0]["content"]["parts"]
            .as_array()
            .and_then(|parts| {
                parts
                    .iter()
                    .find_map(|p| p["inlineData"]["data"].as_str())
            })
            .ok_or_else(|| ServiceError::MalformedReply("no inline data in reply".to_string()))
    }
}
