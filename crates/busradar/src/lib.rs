use std::{error, fmt};

use public_transport::ProviderError;

pub mod client;
pub mod feed;

pub const BUSRADAR_API_URL: &str = "https://rest.busradar.conterra.de/prod";

#[derive(Debug)]
pub enum ApiError {
    RequestError(reqwest::Error),
    JsonError(serde_json::Error),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
    InvalidStop(String),
}

impl error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ApiError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            ApiError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, text, url)
                }
                None => write!(f, "Invalid Response({}) {}", status_code, url),
            },
            ApiError::InvalidStop(why) => write!(f, "Invalid stop: {}", why),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::RequestError(e)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::JsonError(e)
    }
}

impl From<ApiError> for ProviderError {
    fn from(value: ApiError) -> Self {
        match value {
            ApiError::RequestError(e) if e.is_timeout() => ProviderError::Timeout,
            ApiError::RequestError(e) => ProviderError::unreachable(e),
            ApiError::JsonError(e) => ProviderError::Malformed(e.to_string()),
            ApiError::InvalidResponse {
                status_code, url, ..
            } => ProviderError::Status {
                status_code: status_code.as_u16(),
                url,
            },
            ApiError::InvalidStop(why) => ProviderError::Malformed(why),
        }
    }
}
