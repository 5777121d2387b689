use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::ErrorKind;
use crate::error::{CoreError, CoreResult};

const CITY_PLACEHOLDER: &str = "{city}";

/// Looks up the user-facing string for a failure category.
pub trait MessageResolver: Send + Sync {
    fn resolve(&self, kind: ErrorKind) -> String;
}

impl<F> MessageResolver for F
where
    F: Fn(ErrorKind) -> String + Send + Sync,
{
    fn resolve(&self, kind: ErrorKind) -> String {
        self(kind)
    }
}

/// Localized strings shown for failed lookups.
///
/// Loaded tables may omit keys; omitted keys keep the English default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageTable {
    pub http_error: String,
    pub network_error: String,
    pub parsing_error: String,
    pub unknown_error: String,
    pub malformed_data: String,
    pub location_not_found: String,
}

impl Default for MessageTable {
    fn default() -> Self {
        Self {
            http_error: "The weather service returned an error.".to_string(),
            network_error: "Network error. Check your connection and try again.".to_string(),
            parsing_error: "Could not read the weather data.".to_string(),
            unknown_error: "Something went wrong.".to_string(),
            malformed_data: "The weather data is incomplete.".to_string(),
            location_not_found: "Location '{city}' not found.".to_string(),
        }
    }
}

impl MessageTable {
    pub fn from_json_str(value: &str) -> CoreResult<Self> {
        serde_json::from_str(value).map_err(|err| CoreError::Config(err.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|err| CoreError::Io(format!("{}: {}", path.display(), err)))?;
        Self::from_json_str(&raw)
    }

    pub fn location_not_found(&self, city: &str) -> String {
        self.location_not_found.replace(CITY_PLACEHOLDER, city)
    }
}

impl MessageResolver for MessageTable {
    fn resolve(&self, kind: ErrorKind) -> String {
        match kind {
            ErrorKind::Http => self.http_error.clone(),
            ErrorKind::Network => self.network_error.clone(),
            ErrorKind::Parsing => self.parsing_error.clone(),
            ErrorKind::Unknown => self.unknown_error.clone(),
        }
    }
}
