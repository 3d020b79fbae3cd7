//! HTTP client for the REST snapshot endpoint.
//!
//! This module provides the [`RestClient`] used to fetch full depth snapshots
//! from the Binance futures REST API. Market data endpoints are public, so no
//! request signing is involved.

use reqwest::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::error::{ApiError, Error};
use crate::types::messages::DepthSnapshot;

/// Error body returned by the venue on non-2xx responses
#[derive(Debug, Deserialize)]
struct VenueError {
    code: i64,
    msg: String,
}

/// HTTP client for Binance futures market data
#[derive(Debug)]
pub struct RestClient {
    client: Client,
    base_url: String,
}

impl RestClient {
    /// Create a new REST client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.rest_base_url().to_string(),
        })
    }

    /// Fetch a full depth snapshot for the given symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Contract symbol, e.g. `BTCUSD_PERP`
    /// * `limit` - Levels per side (venue caps at 1000)
    ///
    /// # Errors
    ///
    /// `Error::Timeout`/`Error::Http` on transport failure (retryable),
    /// `Error::Api` when the venue rejects the request.
    pub async fn depth_snapshot(&self, symbol: &str, limit: u32) -> Result<DepthSnapshot, Error> {
        let url = format!(
            "{}/dapi/v1/depth?symbol={}&limit={}",
            self.base_url, symbol, limit
        );

        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    /// Decode a response body, mapping venue errors to [`ApiError`]
    async fn handle_response<T>(&self, response: reqwest::Response) -> Result<T, Error>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let error = match serde_json::from_str::<VenueError>(&body) {
            Ok(venue) => ApiError::with_code(status.as_u16(), venue.code, venue.msg),
            Err(_) => ApiError::new(status.as_u16(), body),
        };

        Err(Error::Api(error))
    }
}
