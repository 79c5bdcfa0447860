//! Client for the local info-service endpoints

use crate::error::{ToolsError, ToolsResult};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

/// Default base URL of the local info service
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Weather conditions for a city
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherReport {
    /// Temperature in degrees Celsius, rounded by the service
    pub temperature: i32,
    /// Short condition description
    pub description: String,
    /// Relative humidity in percent
    pub humidity: u8,
    /// Wind speed in m/s
    #[serde(rename = "windSpeed")]
    pub wind_speed: f64,
    /// Resolved city name
    pub city: String,
    /// ISO country code
    pub country: String,
}

/// Quote for a stock symbol
#[derive(Debug, Clone, Deserialize)]
pub struct StockQuote {
    /// Last traded price
    #[serde(rename = "currentPrice")]
    pub current_price: f64,
    /// Absolute change since previous close
    pub change: f64,
    /// Percentage change since previous close
    #[serde(rename = "percentChange")]
    pub percent_change: f64,
    /// Session high
    #[serde(rename = "highPrice")]
    pub high_price: f64,
    /// Session low
    #[serde(rename = "lowPrice")]
    pub low_price: f64,
    /// Session open
    #[serde(rename = "openPrice")]
    pub open_price: f64,
    /// Previous close
    #[serde(rename = "previousClose")]
    pub previous_close: f64,
    /// Upper-cased symbol
    pub symbol: String,
}

/// HTTP client for the local info service
///
/// One request per call; failures are reported to the caller with the HTTP
/// status or underlying cause. No retry, no caching, no auth.
pub struct ToolsClient {
    base_url: String,
    client: reqwest::Client,
}

impl ToolsClient {
    /// Create a client against the given base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// The next upcoming calendar appointment
    ///
    /// The payload shape is server-defined: an event object when one is
    /// scheduled, or a `message` object when nothing qualifies, so it is
    /// returned as parsed JSON.
    pub async fn next_appointment(&self) -> ToolsResult<Value> {
        self.get_json("/calendar/next").await
    }

    /// Current weather for a city
    pub async fn weather(&self, city: &str) -> ToolsResult<WeatherReport> {
        let value = self.get_json(&format!("/weather/{}", city)).await?;
        serde_json::from_value(value).map_err(|e| ToolsError::InvalidResponse {
            reason: e.to_string(),
        })
    }

    /// Current quote for a stock symbol
    pub async fn stock_price(&self, symbol: &str) -> ToolsResult<StockQuote> {
        let value = self.get_json(&format!("/stock/{}", symbol)).await?;
        serde_json::from_value(value).map_err(|e| ToolsError::InvalidResponse {
            reason: e.to_string(),
        })
    }

    async fn get_json(&self, path: &str) -> ToolsResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "info service request");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            error!(%url, %status, "info service returned an error status");
            return Err(ToolsError::Status {
                status: status.as_u16(),
                url,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ToolsError::InvalidResponse {
                reason: e.to_string(),
            })
    }
}

impl Default for ToolsClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
