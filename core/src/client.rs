//! Client facade: one transport, one accessor per resource family.
//!
//! # Design
//! `PassCultureClient` owns the `Transport` and therefore the connection
//! pool. `open` acquires it, `close` releases it, and because release happens
//! in `Drop` it also happens on early returns and `?` propagation. `scoped`
//! wraps the open/use/close sequence for callers that prefer a closure.
//! Facades borrow the transport, so they cannot outlive the client.

use tracing::info;

use crate::config::{ClientConfig, Settings};
use crate::endpoints::{Bookings, EventOffers, PriceCategories};
use crate::error::ApiError;
use crate::transport::Transport;

#[derive(Debug)]
pub struct PassCultureClient {
    transport: Transport,
}

impl PassCultureClient {
    /// Acquire the connection pool for `config`.
    pub fn open(config: impl Into<ClientConfig>) -> Result<Self, ApiError> {
        let config = config.into();
        let transport = Transport::open(config)?;
        info!(
            endpoint = %transport.settings().api_endpoint,
            timeout_ms = transport.timeout().as_millis() as u64,
            "opened Pass Culture client"
        );
        Ok(Self { transport })
    }

    /// Resolve settings from `API_KEY` / `API_ENDPOINT` and open a client.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::open(Settings::resolve(None, None)?)
    }

    /// Open a client, hand it to `f`, and release it whatever `f` returns.
    pub async fn scoped<T, F>(config: impl Into<ClientConfig>, f: F) -> Result<T, ApiError>
    where
        F: AsyncFnOnce(&PassCultureClient) -> Result<T, ApiError>,
    {
        let client = Self::open(config)?;
        let result = f(&client).await;
        client.close();
        result
    }

    pub fn bookings(&self) -> Bookings<'_> {
        Bookings::new(&self.transport)
    }

    pub fn event_offers(&self) -> EventOffers<'_> {
        EventOffers::new(&self.transport)
    }

    pub fn price_categories(&self) -> PriceCategories<'_> {
        PriceCategories::new(&self.transport)
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Release the connection pool.
    pub fn close(self) {
        info!(endpoint = %self.transport.settings().api_endpoint, "closing Pass Culture client");
        self.transport.close();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::ConfigError;

    fn settings(endpoint: &str) -> Settings {
        Settings {
            api_key: "key".to_string(),
            api_endpoint: endpoint.to_string(),
        }
    }

    #[test]
    fn open_applies_configured_timeout() {
        let config = ClientConfig::new(settings("https://backend.example/"))
            .with_timeout(Duration::from_secs(5));
        let client = PassCultureClient::open(config).unwrap();
        assert_eq!(client.transport().timeout(), Duration::from_secs(5));
        assert_eq!(
            client.transport().settings().api_endpoint,
            "https://backend.example"
        );
        client.close();
    }

    #[test]
    fn open_fails_on_invalid_endpoint() {
        let err = PassCultureClient::open(settings("backend.example")).unwrap_err();
        assert!(matches!(err, ApiError::Config(ConfigError::InvalidEndpoint(_))));
    }

    #[tokio::test]
    async fn scoped_propagates_closure_error() {
        let result: Result<(), ApiError> =
            PassCultureClient::scoped(settings("https://backend.example"), async |_client| {
                Err(ApiError::Transport("boom".to_string()))
            })
            .await;
        assert!(matches!(result, Err(ApiError::Transport(ref m)) if m == "boom"));
    }

    #[tokio::test]
    async fn scoped_fails_before_running_closure_on_bad_config() {
        let mut ran = false;
        let result = PassCultureClient::scoped(settings("nope"), async |_client| {
            ran = true;
            Ok(())
        })
        .await;
        assert!(result.is_err());
        assert!(!ran);
    }
}
