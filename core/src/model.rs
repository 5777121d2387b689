use serde::{Deserialize, Serialize};

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn/";
const KELVIN_OFFSET: f64 = 273.15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub id: i64,
    pub main: String,
    pub description: String,
    pub icon: String,
}

impl Weather {
    pub fn icon_url(&self) -> String {
        icon_url(&self.icon)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Main {
    #[serde(default = "missing_temperature")]
    pub temp: f64,
    #[serde(default)]
    pub feels_like: f64,
    #[serde(default)]
    pub temp_min: f64,
    #[serde(default)]
    pub temp_max: f64,
    #[serde(default)]
    pub pressure: i64,
    #[serde(default)]
    pub humidity: i64,
    pub sea_level: Option<i64>,
    pub grnd_level: Option<i64>,
}

impl Default for Main {
    fn default() -> Self {
        Self {
            temp: missing_temperature(),
            feels_like: 0.0,
            temp_min: 0.0,
            temp_max: 0.0,
            pressure: 0,
            humidity: 0,
            sea_level: None,
            grnd_level: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    pub deg: i64,
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rain {
    #[serde(rename = "1h")]
    pub one_hour: Option<f64>,
    #[serde(rename = "3h")]
    pub three_hours: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    pub all: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sys {
    #[serde(rename = "type")]
    pub kind: Option<i64>,
    pub id: Option<i64>,
    pub country: Option<String>,
    #[serde(default)]
    pub sunrise: i64,
    #[serde(default)]
    pub sunset: i64,
}

/// Current conditions payload of `data/2.5/weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    pub coord: Option<Coord>,
    #[serde(default)]
    pub weather: Vec<Weather>,
    #[serde(default)]
    pub base: String,
    #[serde(default)]
    pub main: Main,
    #[serde(default)]
    pub visibility: i64,
    #[serde(default)]
    pub wind: Wind,
    pub rain: Option<Rain>,
    #[serde(default)]
    pub clouds: Clouds,
    #[serde(default)]
    pub dt: i64,
    #[serde(default)]
    pub sys: Sys,
    #[serde(default)]
    pub timezone: i64,
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cod: i64,
}

impl WeatherResponse {
    /// A payload that decoded but lacks the fields a forecast needs.
    pub fn is_well_formed(&self) -> bool {
        !self.name.is_empty() && !self.main.temp.is_nan() && !self.weather.is_empty()
    }

    pub fn condition(&self) -> Option<&Weather> {
        self.weather.first()
    }
}

/// One hit of `geo/1.0/direct`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodingResponse {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub country: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteWeatherData {
    pub weather: WeatherResponse,
    pub location: GeocodingResponse,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperature {
    pub kelvin: f64,
}

impl Temperature {
    pub fn from_kelvin(kelvin: f64) -> Self {
        Self { kelvin }
    }

    pub fn celsius(&self) -> f64 {
        self.kelvin - KELVIN_OFFSET
    }

    pub fn fahrenheit(&self) -> f64 {
        self.celsius() * 9.0 / 5.0 + 32.0
    }

    pub fn display_pair(&self) -> (String, String) {
        (
            format!("{:.2}°C", self.celsius()),
            format!("{:.2}°F", self.fahrenheit()),
        )
    }
}

pub fn icon_url(icon_code: &str) -> String {
    format!("{}{}@2x.png", ICON_BASE_URL, icon_code)
}

fn missing_temperature() -> f64 {
    f64::NAN
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONDON: &str = r#"{
        "coord": {"lon": -0.1257, "lat": 51.5085},
        "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
        "base": "stations",
        "main": {"temp": 288.15, "feels_like": 287.0, "temp_min": 286.0, "temp_max": 290.0,
                 "pressure": 1012, "humidity": 76},
        "visibility": 10000,
        "wind": {"speed": 3.6, "deg": 350, "gust": 7.2},
        "clouds": {"all": 0},
        "dt": 1605182400,
        "sys": {"type": 1, "id": 1414, "country": "GB", "sunrise": 1605166710, "sunset": 1605200085},
        "timezone": 0,
        "id": 2643743,
        "name": "London",
        "cod": 200
    }"#;

    #[test]
    fn decodes_full_payload() {
        let resp: WeatherResponse = serde_json::from_str(LONDON).unwrap();
        assert_eq!(resp.name, "London");
        assert_eq!(resp.sys.country.as_deref(), Some("GB"));
        assert_eq!(resp.sys.kind, Some(1));
        assert!(resp.rain.is_none());
        assert!(resp.is_well_formed());
        assert_eq!(
            resp.condition().map(Weather::icon_url).as_deref(),
            Some("https://openweathermap.org/img/wn/01d@2x.png")
        );
    }

    #[test]
    fn rain_uses_hour_keys() {
        let rain: Rain = serde_json::from_str(r#"{"1h": 0.25}"#).unwrap();
        assert_eq!(rain.one_hour, Some(0.25));
        assert_eq!(rain.three_hours, None);
    }

    #[test]
    fn sparse_payload_decodes_but_is_not_well_formed() {
        let resp: WeatherResponse = serde_json::from_str(r#"{"cod": 200}"#).unwrap();
        assert!(resp.main.temp.is_nan());
        assert!(!resp.is_well_formed());

        let resp: WeatherResponse =
            serde_json::from_str(r#"{"name": "Oslo", "main": {"temp": 270.0}}"#).unwrap();
        assert!(!resp.is_well_formed(), "no weather conditions");
    }

    #[test]
    fn temperature_conversion() {
        let (c, f) = Temperature::from_kelvin(288.15).display_pair();
        assert_eq!(c, "15.00°C");
        assert_eq!(f, "59.00°F");
    }
}
