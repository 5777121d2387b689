use std::sync::Arc;

use crate::api::WeatherApi;
use crate::classify::{classify, RawFailure};
use crate::error::{DomainError, DomainResult};
use crate::messages::MessageTable;
use crate::model::{CompleteWeatherData, GeocodingResponse};

const MIN_GEOCODING_LIMIT: u32 = 1;
const MAX_GEOCODING_LIMIT: u32 = 5;

/// Fetches weather and turns every transport failure into a [`DomainError`].
pub struct WeatherClient {
    api: Arc<dyn WeatherApi>,
    messages: MessageTable,
    geocoding_limit: u32,
}

impl WeatherClient {
    pub fn new(api: Arc<dyn WeatherApi>, messages: MessageTable) -> Self {
        Self {
            api,
            messages,
            geocoding_limit: MIN_GEOCODING_LIMIT,
        }
    }

    /// The geocoding service returns between 1 and 5 candidates.
    pub fn with_geocoding_limit(mut self, limit: u32) -> Self {
        self.geocoding_limit = limit.clamp(MIN_GEOCODING_LIMIT, MAX_GEOCODING_LIMIT);
        self
    }

    pub fn messages(&self) -> &MessageTable {
        &self.messages
    }

    pub fn weather_by_city_name(&self, city_name: &str) -> DomainResult<CompleteWeatherData> {
        let hits = self
            .api
            .coordinates(city_name, self.geocoding_limit)
            .map_err(|raw| self.classify(raw))?;
        let Some(first) = hits.first() else {
            tracing::debug!(city = city_name, "geocoding returned no match");
            return Err(DomainError::LocationNotFoundError {
                message: self.messages.location_not_found(city_name),
            });
        };
        self.weather_by_coordinates(first.lat, first.lon)
    }

    pub fn weather_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> DomainResult<CompleteWeatherData> {
        let weather = self
            .api
            .weather(latitude, longitude)
            .map_err(|raw| self.classify(raw))?;
        if !weather.is_well_formed() {
            tracing::warn!(latitude, longitude, "weather payload missing required fields");
            return Err(DomainError::MalformedDataError {
                message: self.messages.malformed_data.clone(),
            });
        }

        let location = GeocodingResponse {
            name: weather.name.clone(),
            lat: latitude,
            lon: longitude,
            country: weather.sys.country.clone(),
            state: None,
        };
        Ok(CompleteWeatherData { weather, location })
    }

    fn classify(&self, raw: RawFailure) -> DomainError {
        let err = classify(&raw, &self.messages);
        tracing::warn!(raw = %raw, status = ?err.status_code(), "weather request failed");
        err
    }
}
