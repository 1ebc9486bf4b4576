//! Shared HTTP plumbing for providers

use crate::config::USER_AGENT;
use crate::error::SourceError;
use serde_json::Value;
use std::time::Duration;

/// Build the HTTP client shared by the providers
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, SourceError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| SourceError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Read a response as JSON, mapping non-2xx statuses to `SourceError::Status`
pub async fn read_json(response: reqwest::Response) -> Result<Value, SourceError> {
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status(status.as_u16()));
    }

    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// GET a URL and read the body as JSON
pub async fn get_json(client: &reqwest::Client, url: &str) -> Result<Value, SourceError> {
    let response = client.get(url).send().await?;
    read_json(response).await
}

/// Text at a JSON pointer, or empty when absent or not a string
pub fn text_at(value: &Value, pointer: &str) -> String {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_at() {
        let value = json!([{"timeSeries": [{"areas": [{"area": {"name": "東京地方"}}]}]}]);
        assert_eq!(text_at(&value, "/0/timeSeries/0/areas/0/area/name"), "東京地方");
        assert_eq!(text_at(&value, "/0/timeSeries/1/areas/0/area/name"), "");
        assert_eq!(text_at(&json!({"n": 3}), "/n"), "");
    }
}
