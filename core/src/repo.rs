use std::sync::Mutex;

use crate::client::WeatherClient;
use crate::error::{CoreError, CoreResult, DomainResult};
use crate::model::CompleteWeatherData;
use crate::prefs::{MemoryPreferences, PreferenceStore};

pub trait WeatherRepo: Send + Sync {
    fn weather_by_city_name(&self, city_name: &str) -> DomainResult<CompleteWeatherData>;
    fn weather_by_coordinates(&self, latitude: f64, longitude: f64)
        -> DomainResult<CompleteWeatherData>;
}

/// Weather lookups backed by [`WeatherClient`], remembering the last city
/// that was found.
pub struct WeatherRepoImpl {
    client: WeatherClient,
    prefs: Mutex<Box<dyn PreferenceStore>>,
}

impl WeatherRepoImpl {
    pub fn new(client: WeatherClient) -> Self {
        Self {
            client,
            prefs: Mutex::new(Box::new(MemoryPreferences::default())),
        }
    }

    pub fn with_preferences(mut self, prefs: Box<dyn PreferenceStore>) -> Self {
        self.prefs = Mutex::new(prefs);
        self
    }

    pub fn last_searched_city(&self) -> CoreResult<String> {
        let prefs = self
            .prefs
            .lock()
            .map_err(|_| CoreError::Storage("preferences lock poisoned".to_string()))?;
        prefs.last_searched_city()
    }

    fn remember_city(&self, city_name: &str) -> CoreResult<()> {
        let mut prefs = self
            .prefs
            .lock()
            .map_err(|_| CoreError::Storage("preferences lock poisoned".to_string()))?;
        prefs.save_last_searched_city(city_name)
    }
}

impl WeatherRepo for WeatherRepoImpl {
    fn weather_by_city_name(&self, city_name: &str) -> DomainResult<CompleteWeatherData> {
        let data = self.client.weather_by_city_name(city_name)?;
        if let Err(err) = self.remember_city(city_name) {
            tracing::warn!(city = city_name, error = %err, "could not save last searched city");
        }
        Ok(data)
    }

    fn weather_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> DomainResult<CompleteWeatherData> {
        self.client.weather_by_coordinates(latitude, longitude)
    }
}
