use std::env;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::ApiError;

pub const GOOGLE_MAPS_API_URL: &str = "https://maps.googleapis.com/maps/api";

#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleMapsCredentials {
    pub api_key: String,
    pub rate_limit_per_minute: Option<u64>,
    pub proxy: Option<String>,
}

impl GoogleMapsCredentials {
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            rate_limit_per_minute: None,
            proxy: None,
        }
    }

    /// Reads `GOOGLE_MAPS_API_KEY` and the optional
    /// `GOOGLE_MAPS_RATE_LIMIT_PER_MINUTE` and `GOOGLE_MAPS_PROXY`.
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("GOOGLE_MAPS_API_KEY").ok()?;
        let rate_limit_per_minute = match env::var("GOOGLE_MAPS_RATE_LIMIT_PER_MINUTE") {
            Ok(limit) => Some(limit.parse().ok()?),
            Err(_) => None,
        };
        let proxy = env::var("GOOGLE_MAPS_PROXY").ok();
        Some(Self {
            api_key,
            rate_limit_per_minute,
            proxy,
        })
    }
}

struct GoogleMapsClientState {
    pub available_requests: u64,
    pub last_refill: chrono::DateTime<Local>,
}

pub struct GoogleMapsClient {
    pub credentials: GoogleMapsCredentials,
    http: reqwest::Client,
    state: RwLock<GoogleMapsClientState>,
}

impl GoogleMapsClient {
    pub fn new(credentials: &GoogleMapsCredentials) -> Result<Self, ApiError> {
        /* build the http client once, with optional proxy */
        let http = match &credentials.proxy {
            Some(proxy_url) => {
                log::info!("Using proxy '{proxy_url}' for Google Maps requests.");
                reqwest::Client::builder()
                    .proxy(reqwest::Proxy::all(proxy_url)?)
                    .build()?
            }
            None => reqwest::Client::new(),
        };

        Ok(Self {
            credentials: credentials.clone(),
            http,
            state: RwLock::new(GoogleMapsClientState {
                available_requests: credentials.rate_limit_per_minute.unwrap_or(0),
                last_refill: Local::now(),
            }),
        })
    }

    pub async fn available_requests(&self) -> u64 {
        self.state.read().await.available_requests
    }

    async fn try_decrement_available_requests(&self) -> Result<(), ApiError> {
        if let Some(rate_limit_per_minute) = self.credentials.rate_limit_per_minute {
            let mut state = self.state.write().await;

            let minutes_since_last_refill = (Local::now() - state.last_refill).num_minutes();
            if minutes_since_last_refill >= 1 {
                state.available_requests = rate_limit_per_minute;
                state.last_refill = Local::now();
            }

            if state.available_requests != 0 {
                state.available_requests -= 1;
            } else {
                return Err(ApiError::RateLimitReached);
            }
        }
        Ok(())
    }

    /// Fetch json from a web service endpoint, e.g. `geocode/json`. The api
    /// key is appended to `params`.
    pub async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.try_decrement_available_requests().await?;

        log::debug!("Requesting endpoint '{endpoint}'.");
        let url = format!("{GOOGLE_MAPS_API_URL}/{endpoint}");
        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", &self.credentials.api_key)])
            .header("accept", "application/json")
            .send()
            .await?;

        /* parse response */
        match response.status() {
            reqwest::StatusCode::OK => Ok(serde_json::from_str(&response.text().await?)?),
            other => Err(ApiError::InvalidResponse {
                status_code: other,
                endpoint: endpoint.to_owned(),
                response: response.text().await.ok(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rate_limit_is_enforced_locally() {
        let credentials = GoogleMapsCredentials {
            rate_limit_per_minute: Some(2),
            ..GoogleMapsCredentials::new("test-key")
        };
        let client = GoogleMapsClient::new(&credentials).unwrap();
        assert_eq!(client.available_requests().await, 2);

        client.try_decrement_available_requests().await.unwrap();
        client.try_decrement_available_requests().await.unwrap();
        assert!(matches!(
            client.try_decrement_available_requests().await,
            Err(ApiError::RateLimitReached)
        ));
    }

    #[tokio::test]
    async fn no_rate_limit_means_unlimited() {
        let client = GoogleMapsClient::new(&GoogleMapsCredentials::new("test-key")).unwrap();
        for _ in 0..100 {
            client.try_decrement_available_requests().await.unwrap();
        }
    }
}
