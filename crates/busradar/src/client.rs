use std::time::Duration;

use async_trait::async_trait;
use model::{ride::Ride, stop::Stop, WithId};
use public_transport::{
    provider::{RideListProvider, StopListProvider},
    ProviderError,
};
use serde::de::DeserializeOwned;
use utility::id::Id;

use crate::{
    feed::{Departure, StopCollection, StopFeature},
    ApiError, BUSRADAR_API_URL,
};

/// Client for the conterra busradar REST API. Serves as stop directory and as
/// live departure feed.
#[derive(Debug, Clone)]
pub struct BusradarClient {
    http: reqwest::Client,
    base_url: String,
}

impl BusradarClient {
    pub fn new<S: Into<String>>(base_url: S, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    pub fn with_default_url(timeout: Duration) -> Result<Self, ApiError> {
        Self::new(BUSRADAR_API_URL, timeout)
    }

    pub fn stops_url(&self) -> String {
        format!("{}/haltestellen", self.base_url)
    }

    pub fn departures_url(&self, stop: &Id<Stop>, lookahead: Duration) -> String {
        format!(
            "{}/haltestellen/{}/abfahrten?sekunden={}",
            self.base_url,
            stop,
            lookahead.as_secs()
        )
    }

    /// Fetch and parse a JSON document.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        log::debug!("Requesting '{url}'.");
        let response = self.http.get(url).send().await?;

        match response.status() {
            reqwest::StatusCode::OK => Ok(serde_json::from_str(&response.text().await?)?),
            other => match response.text().await {
                Ok(val) => Err(ApiError::InvalidResponse {
                    status_code: other,
                    url: url.to_owned(),
                    response: Some(val),
                }),
                Err(_) => Err(ApiError::InvalidResponse {
                    status_code: other,
                    url: url.to_owned(),
                    response: None,
                }),
            },
        }
    }

    pub async fn stops(&self) -> Result<Vec<WithId<Stop>>, ApiError> {
        let collection: StopCollection = self.get(&self.stops_url()).await?;
        collection
            .features
            .into_iter()
            .map(StopFeature::into_stop)
            .collect()
    }

    pub async fn departures(
        &self,
        stop: &Id<Stop>,
        lookahead: Duration,
    ) -> Result<Vec<Ride>, ApiError> {
        let departures: Vec<Departure> =
            self.get(&self.departures_url(stop, lookahead)).await?;
        Ok(departures.into_iter().map(Ride::from).collect())
    }
}

#[async_trait]
impl StopListProvider for BusradarClient {
    async fn fetch_stops(&self) -> Result<Vec<WithId<Stop>>, ProviderError> {
        Ok(self.stops().await?)
    }
}

#[async_trait]
impl RideListProvider for BusradarClient {
    async fn fetch_rides(
        &self,
        stop: &Id<Stop>,
        lookahead: Duration,
    ) -> Result<Vec<Ride>, ProviderError> {
        Ok(self.departures(stop, lookahead).await?)
    }
}
