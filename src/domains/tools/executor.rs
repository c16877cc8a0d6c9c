//! Request executor - performs one authenticated outbound call per tool
//! invocation and normalizes the response.
//!
//! Operational failures (unsupported method, connection refused, timeout,
//! DNS failure) never surface as errors here. They come back as an
//! `{"error": ...}` value so tool clients always get a well-formed reply.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use serde_json::{Map, Value, json};
use tracing::{debug, instrument, warn};

use super::auth::authorization_header;
use super::error::ToolError;
use crate::domains::services::{RequestMethod, ServiceDefinition};

/// Upper bound on every outbound call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Executes outbound HTTP calls for synthesized tools.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    client: reqwest::Client,
    timeout: Duration,
}

impl Default for RequestExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestExecutor {
    /// Create an executor using the standard 5 second timeout.
    pub fn new() -> Self {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    /// Create an executor with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// The timeout applied to each call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Merge call-time arguments over the declared defaults.
    ///
    /// Every declared parameter is present in the output, taking the
    /// supplied value when given. Undeclared arguments are dropped.
    pub fn resolve_params(service: &ServiceDefinition, arguments: &Map<String, Value>) -> Map<String, Value> {
        let ignored: Vec<_> = arguments
            .keys()
            .filter(|k| !service.request.params.contains_key(*k))
            .collect();
        if !ignored.is_empty() {
            debug!("Ignoring undeclared arguments for {}: {:?}", service.name, ignored);
        }

        service
            .request
            .params
            .iter()
            .map(|(name, default)| {
                let value = arguments.get(name).unwrap_or(default).clone();
                (name.clone(), value)
            })
            .collect()
    }

    /// Perform the call and return the normalized result.
    ///
    /// `params` must already be resolved (see [`Self::resolve_params`]).
    #[instrument(skip(self, service, params), fields(service = %service.name, method = %service.request.method))]
    pub async fn execute(&self, service: &ServiceDefinition, params: &Map<String, Value>) -> Value {
        match self.dispatch(service, params).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Call to {} failed: {}", service.endpoint, e);
                e.to_payload()
            }
        }
    }

    async fn dispatch(
        &self,
        service: &ServiceDefinition,
        params: &Map<String, Value>,
    ) -> Result<Value, ToolError> {
        let method = RequestMethod::parse(&service.request.method)
            .ok_or_else(|| ToolError::UnsupportedMethod(service.request.method.to_uppercase()))?;

        let mut request = match method {
            RequestMethod::Get => self
                .client
                .get(&service.endpoint)
                .query(&query_pairs(params)),
            RequestMethod::Post => self.client.post(&service.endpoint).json(params),
        };
        request = request.timeout(self.timeout);

        if let Some(value) = authorization_header(service) {
            request = request.header(AUTHORIZATION, value);
        }

        debug!("Sending {:?} request to {}", method, service.endpoint);

        let response = request
            .send()
            .await
            .map_err(|e| ToolError::transport(e.to_string()))?;

        debug!("Received HTTP {} from {}", response.status(), service.endpoint);

        let body = response
            .text()
            .await
            .map_err(|e| ToolError::transport(e.to_string()))?;

        Ok(normalize_body(body))
    }
}

/// Parse a response body as JSON, wrapping non-JSON text as `{"result": text}`.
pub fn normalize_body(body: String) -> Value {
    match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(_) => json!({ "result": body }),
    }
}

/// Flatten parameters into query-string pairs.
///
/// Strings are sent as-is and `null` values are omitted. Everything else
/// is sent as its JSON text.
fn query_pairs(params: &Map<String, Value>) -> Vec<(String, String)> {
    params
        .iter()
        .filter_map(|(name, value)| {
            let rendered = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((name.clone(), rendered))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(value: Value) -> ServiceDefinition {
        serde_json::from_value(value).unwrap()
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_resolve_params_fills_defaults_and_drops_undeclared() {
        let svc = service(json!({
            "name": "weather",
            "auth_type": "none",
            "endpoint": "http://localhost",
            "request": { "params": { "city": "Paris", "units": "metric" } }
        }));

        let resolved =
            RequestExecutor::resolve_params(&svc, &args(json!({ "city": "Oslo", "debug": true })));

        assert_eq!(resolved, args(json!({ "city": "Oslo", "units": "metric" })));
        assert_eq!(
            resolved.keys().collect::<Vec<_>>(),
            vec!["city", "units"]
        );
    }

    #[test]
    fn test_query_pairs_rendering() {
        let pairs = query_pairs(&args(json!({
            "q": "rust",
            "limit": 10,
            "exact": false,
            "skip": null
        })));

        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "rust".to_string()),
                ("limit".to_string(), "10".to_string()),
                ("exact".to_string(), "false".to_string()),
            ]
        );
    }

    #[test]
    fn test_normalize_body() {
        assert_eq!(normalize_body(r#"{"ok":true}"#.to_string()), json!({ "ok": true }));
        assert_eq!(normalize_body("[1,2]".to_string()), json!([1, 2]));
        assert_eq!(
            normalize_body("plain text".to_string()),
            json!({ "result": "plain text" })
        );
        assert_eq!(normalize_body(String::new()), json!({ "result": "" }));
    }

    #[tokio::test]
    async fn test_get_sends_query_and_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("city", "Paris"))
            .and(query_param("days", "3"))
            .and(header("Authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "temp": 21 })))
            .expect(1)
            .mount(&server)
            .await;

        let svc = service(json!({
            "name": "weather",
            "auth_type": "token",
            "auth_config": { "token": "abc" },
            "endpoint": format!("{}/weather", server.uri()),
            "request": { "method": "get", "params": { "city": "Paris", "days": 3 } }
        }));

        let result = RequestExecutor::new()
            .execute(&svc, &svc.request.params)
            .await;

        assert_eq!(result, json!({ "temp": 21 }));
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/items"))
            .and(body_json(json!({ "a": 1 })))
            .and(header("Authorization", "Basic dTpw"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 7 })))
            .expect(1)
            .mount(&server)
            .await;

        let svc = service(json!({
            "name": "items",
            "auth_type": "basic",
            "auth_config": { "username": "u", "password": "p" },
            "endpoint": format!("{}/items", server.uri()),
            "request": { "method": "POST", "params": { "a": 0 } }
        }));

        let result = RequestExecutor::new()
            .execute(&svc, &args(json!({ "a": 1 })))
            .await;

        assert_eq!(result, json!({ "id": 7 }));
    }

    #[tokio::test]
    async fn test_non_json_body_is_wrapped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
            .mount(&server)
            .await;

        let svc = service(json!({
            "name": "ping",
            "auth_type": "none",
            "endpoint": server.uri()
        }));

        let result = RequestExecutor::new().execute(&svc, &Map::new()).await;
        assert_eq!(result, json!({ "result": "pong" }));
    }

    #[tokio::test]
    async fn test_http_error_status_is_not_validated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({ "detail": "boom" })),
            )
            .mount(&server)
            .await;

        let svc = service(json!({
            "name": "flaky",
            "auth_type": "none",
            "endpoint": server.uri()
        }));

        let result = RequestExecutor::new().execute(&svc, &Map::new()).await;
        assert_eq!(result, json!({ "detail": "boom" }));
    }

    #[tokio::test]
    async fn test_unsupported_method_makes_no_call() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let svc = service(json!({
            "name": "remove",
            "auth_type": "none",
            "endpoint": server.uri(),
            "request": { "method": "delete" }
        }));

        let result = RequestExecutor::new().execute(&svc, &Map::new()).await;
        assert_eq!(result, json!({ "error": "Unsupported request method: DELETE" }));
    }

    #[tokio::test]
    async fn test_unreachable_host_returns_error_value() {
        let svc = service(json!({
            "name": "down",
            "auth_type": "none",
            "endpoint": "http://127.0.0.1:1/unreachable"
        }));

        let result = RequestExecutor::new().execute(&svc, &Map::new()).await;

        let message = result.get("error").and_then(Value::as_str).unwrap();
        assert!(!message.is_empty());
        assert_eq!(result.as_object().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_timeout_returns_error_value() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "late": true }))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let svc = service(json!({
            "name": "slow",
            "auth_type": "none",
            "endpoint": server.uri()
        }));

        let result = RequestExecutor::with_timeout(Duration::from_millis(50))
            .execute(&svc, &Map::new())
            .await;

        assert!(result.get("error").is_some());
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(RequestExecutor::new().timeout(), Duration::from_secs(5));
    }
}
