use std::error;
use std::fmt;
use std::sync::Arc;

use service_zones::ProviderError;

pub mod client;
pub mod directions;
pub mod geocoding;
pub mod model;
pub mod polyline;

#[derive(Debug, Clone)]
pub enum ApiError {
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    /// Non-200 HTTP answer.
    InvalidResponse {
        status_code: reqwest::StatusCode,
        endpoint: String,
        response: Option<String>,
    },
    /// HTTP 200, but the body reports a failure status.
    Status {
        status: String,
        message: Option<String>,
    },
    QuotaExceeded {
        status: String,
        message: Option<String>,
    },
    RateLimitReached,
    InvalidPolyline(String),
    Other(String),
}

impl error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ApiError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            ApiError::InvalidResponse {
                status_code,
                endpoint,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, text, endpoint)
                }
                None => write!(f, "Invalid Response ({}) {}", status_code, endpoint),
            },
            ApiError::Status { status, message }
            | ApiError::QuotaExceeded { status, message } => match message {
                Some(message) => write!(f, "{status}: {message}"),
                None => write!(f, "{status}"),
            },
            ApiError::RateLimitReached => write!(f, "Rate limit reached."),
            ApiError::InvalidPolyline(encoded) => {
                write!(f, "Malformed encoded polyline: {encoded}")
            }
            ApiError::Other(e) => write!(f, "{e}"),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::JsonError(Arc::new(e))
    }
}

impl From<ApiError> for ProviderError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::RequestError(why) if why.is_timeout() => ProviderError::Timeout,
            ApiError::RequestError(why) => ProviderError::Network(why),
            ApiError::RateLimitReached => {
                ProviderError::Quota("local rate limit reached".to_owned())
            }
            ApiError::QuotaExceeded { status, message } => {
                ProviderError::Quota(message.unwrap_or(status))
            }
            ApiError::Status { status, message } => {
                ProviderError::InvalidResponse { status, message }
            }
            ApiError::InvalidResponse {
                status_code,
                response,
                ..
            } => ProviderError::InvalidResponse {
                status: status_code.to_string(),
                message: response,
            },
            ApiError::JsonError(why) => ProviderError::InvalidResponse {
                status: "MALFORMED_BODY".to_owned(),
                message: Some(why.to_string()),
            },
            ApiError::InvalidPolyline(encoded) => ProviderError::InvalidResponse {
                status: "MALFORMED_POLYLINE".to_owned(),
                message: Some(encoded),
            },
            ApiError::Other(message) => ProviderError::Other(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_errors_map_to_provider_quota() {
        let error: ProviderError = ApiError::QuotaExceeded {
            status: "OVER_QUERY_LIMIT".to_owned(),
            message: None,
        }
        .into();
        assert!(matches!(error, ProviderError::Quota(status) if status == "OVER_QUERY_LIMIT"));
        assert!(matches!(
            ProviderError::from(ApiError::RateLimitReached),
            ProviderError::Quota(_)
        ));
    }

    #[test]
    fn failure_status_maps_to_invalid_response() {
        let error: ProviderError = ApiError::Status {
            status: "REQUEST_DENIED".to_owned(),
            message: Some("The provided API key is invalid.".to_owned()),
        }
        .into();
        assert!(matches!(
            error,
            ProviderError::InvalidResponse { status, message: Some(_) } if status == "REQUEST_DENIED"
        ));
    }
}
