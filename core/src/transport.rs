//! Transport core: the only component that talks to the network.
//!
//! # Design
//! `Transport` owns one `reqwest::Client` (and with it one connection pool)
//! plus the read-only settings. A request goes through three steps:
//! `build` (pure: URL, query filtering, headers, body), `send` (I/O, error
//! translation) and `parse_response` (pure: status check, JSON decoding).
//! `request` chains all three and returns untyped JSON; it knows nothing
//! about domain types.
//!
//! Nothing is mutated after construction, so concurrent requests through a
//! shared `&Transport` are independent. Dropping an in-flight future abandons
//! that request only.

use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{ClientConfig, Settings};
use crate::error::{ApiError, ConfigError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Query parameters in wire order. `None` values are dropped when building.
pub type Params<'a> = [(&'a str, Option<String>)];

#[derive(Debug)]
pub struct Transport {
    http: reqwest::Client,
    settings: Settings,
    timeout: Duration,
}

impl Transport {
    /// Acquire the connection pool. Fails before any I/O when the endpoint is
    /// not an absolute URL.
    pub fn open(config: ClientConfig) -> Result<Self, ApiError> {
        let endpoint = config.settings.api_endpoint.trim_end_matches('/');
        reqwest::Url::parse(endpoint)
            .map_err(|e| ConfigError::InvalidEndpoint(format!("{endpoint}: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            settings: Settings {
                api_key: config.settings.api_key,
                api_endpoint: endpoint.to_string(),
            },
            timeout: config.timeout,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Describe a request without sending it.
    ///
    /// `Content-Type: application/json` is set only when `body` is present.
    pub fn build<B>(
        &self,
        method: HttpMethod,
        path: &str,
        params: &Params<'_>,
        body: Option<&B>,
    ) -> Result<HttpRequest, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ApiError::Serialization(e.to_string()))?;

        let mut headers = vec![
            (
                "Authorization".to_string(),
                format!("Bearer {}", self.settings.api_key),
            ),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }

        let query = params
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.to_string(), v.clone())))
            .collect();

        Ok(HttpRequest {
            method,
            path: format!(
                "{}/{}",
                self.settings.api_endpoint,
                path.trim_start_matches('/')
            ),
            query,
            headers,
            body,
        })
    }

    /// Execute a request. Only transport-level failures are errors here; any
    /// status code the server returns comes back as a response.
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.url()?;
        debug!(
            method = request.method.as_str(),
            %url,
            has_body = request.body.is_some(),
            "sending request"
        );

        let mut builder = self.http.request(request.method.into(), url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let started = Instant::now();
        let response = builder.send().await.map_err(|e| self.translate(e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();
        let body = response.text().await.map_err(|e| self.translate(e))?;

        debug!(
            %url,
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "received response"
        );
        if !(200..300).contains(&status) {
            warn!(%url, status, "request failed with non-success status");
        }

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    /// Build, send and parse in one call.
    pub async fn request<B>(
        &self,
        method: HttpMethod,
        path: &str,
        params: &Params<'_>,
        body: Option<&B>,
    ) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.build(method, path, params, body)?;
        parse_response(self.send(request).await?)
    }

    /// Release the connection pool.
    pub fn close(self) {
        drop(self);
    }

    fn translate(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            warn!(timeout_ms = self.timeout.as_millis() as u64, "request timed out");
            ApiError::Timeout(self.timeout.as_millis() as u64)
        } else {
            warn!(error = %err, "transport failure");
            ApiError::Transport(err.to_string())
        }
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        debug!(endpoint = %self.settings.api_endpoint, "released connection pool");
    }
}

/// Turn a response into JSON. Non-2xx statuses become `ApiError::Status`; an
/// empty 2xx body becomes `Value::Null`.
pub fn parse_response(response: HttpResponse) -> Result<Value, ApiError> {
    if !response.is_success() {
        return Err(ApiError::Status {
            status: response.status,
            body: response.body,
        });
    }
    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn transport() -> Transport {
        Transport::open(ClientConfig::new(Settings {
            api_key: "secret".to_string(),
            api_endpoint: "https://backend.example/public/".to_string(),
        }))
        .unwrap()
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_without_body_omits_content_type() {
        let req = transport()
            .build::<Value>(HttpMethod::Patch, "bookings/v1/use/token/ABC", &[], None)
            .unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.path, "https://backend.example/public/bookings/v1/use/token/ABC");
        assert_eq!(req.header("authorization"), Some("Bearer secret"));
        assert_eq!(req.header("accept"), Some("application/json"));
        assert_eq!(req.header("content-type"), None);
        assert!(req.body.is_none());
    }

    #[test]
    fn build_with_body_sets_content_type() {
        let body = json!({"name": "Concert", "description": null});
        let req = transport()
            .build(HttpMethod::Post, "/offers/v1/events", &[], Some(&body))
            .unwrap();
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.path, "https://backend.example/public/offers/v1/events");
        let sent: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, body);
    }

    #[test]
    fn build_drops_absent_params_and_keeps_order() {
        let params = [
            ("venueId", Some("7".to_string())),
            ("idsAtProvider", None),
            ("firstIndex", Some("1".to_string())),
        ];
        let req = transport()
            .build::<Value>(HttpMethod::Get, "offers/v1/events", &params, None)
            .unwrap();
        assert_eq!(
            req.query,
            vec![
                ("venueId".to_string(), "7".to_string()),
                ("firstIndex".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn open_rejects_relative_endpoint() {
        let err = Transport::open(ClientConfig::new(Settings {
            api_key: "k".to_string(),
            api_endpoint: "not a url".to_string(),
        }))
        .unwrap_err();
        assert!(matches!(err, ApiError::Config(ConfigError::InvalidEndpoint(_))));
    }

    #[test]
    fn parse_response_returns_json() {
        let value = parse_response(response(200, r#"{"msg":"ok"}"#)).unwrap();
        assert_eq!(value, json!({"msg": "ok"}));
    }

    #[test]
    fn parse_response_maps_empty_body_to_null() {
        assert_eq!(parse_response(response(204, "")).unwrap(), Value::Null);
    }

    #[test]
    fn parse_response_keeps_status_and_body() {
        let err = parse_response(response(404, "no such booking")).unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 404, ref body } if body == "no such booking"));
    }

    #[test]
    fn parse_response_rejects_bad_json() {
        let err = parse_response(response(200, "<html>")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[tokio::test]
    async fn send_to_closed_port_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = Transport::open(ClientConfig::new(Settings {
            api_key: "k".to_string(),
            api_endpoint: format!("http://{addr}"),
        }))
        .unwrap();
        let err = transport
            .request::<Value>(HttpMethod::Get, "bookings/v1/token/X", &[], None)
            .await
            .unwrap_err();
        assert!(err.is_transport(), "unexpected error: {err:?}");
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
