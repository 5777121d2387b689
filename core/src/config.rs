use std::env;

use crate::error::{CoreError, CoreResult};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub user_agent: String,
    /// Upper bound on geocoding candidates; the service accepts at most 5.
    pub geocoding_limit: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            connect_timeout_secs: 30,
            read_timeout_secs: 30,
            user_agent: "weather-core/0.1".to_string(),
            geocoding_limit: 1,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `WEATHER_API_KEY`, `WEATHER_BASE_URL` and
    /// `WEATHER_TIMEOUT_SECS`.
    pub fn from_env() -> CoreResult<Self> {
        let mut config = Self::default();
        if let Ok(key) = env::var("WEATHER_API_KEY") {
            config.api_key = key;
        }
        if let Ok(url) = env::var("WEATHER_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(value) = env::var("WEATHER_TIMEOUT_SECS") {
            let secs = value.trim().parse::<u64>().map_err(|err| {
                CoreError::Config(format!("WEATHER_TIMEOUT_SECS={}: {}", value, err))
            })?;
            config.connect_timeout_secs = secs.max(1);
            config.read_timeout_secs = secs.max(1);
        }
        Ok(config)
    }
}
