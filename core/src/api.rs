use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::classify::RawFailure;
use crate::config::ClientConfig;
use crate::error::{CoreError, CoreResult};
use crate::model::{GeocodingResponse, WeatherResponse};

const GEOCODING_PATH: &str = "geo/1.0/direct";
const WEATHER_PATH: &str = "data/2.5/weather";

/// Remote weather service. Failures are returned unclassified.
pub trait WeatherApi: Send + Sync {
    fn coordinates(&self, query: &str, limit: u32) -> Result<Vec<GeocodingResponse>, RawFailure>;
    fn weather(&self, latitude: f64, longitude: f64) -> Result<WeatherResponse, RawFailure>;
}

#[derive(Clone)]
pub struct ReqwestWeatherApi {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl ReqwestWeatherApi {
    pub fn new(config: &ClientConfig) -> CoreResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.read_timeout_secs))
            .build()
            .map_err(|err| CoreError::Network(err.to_string()))?;
        Ok(Self {
            client,
            base_url: parse_base_url(&config.base_url)?,
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, RawFailure> {
        let mut url = self.base_url.join(path).map_err(RawFailure::other)?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("appid", &self.api_key);
        }
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, RawFailure> {
        tracing::debug!(path = url.path(), "weather api request");
        let resp = self.client.get(url).send()?;
        let resp = check_status(resp)?;
        let body = resp.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl WeatherApi for ReqwestWeatherApi {
    fn coordinates(&self, query: &str, limit: u32) -> Result<Vec<GeocodingResponse>, RawFailure> {
        let url = self.endpoint(
            GEOCODING_PATH,
            &[("q", query.to_string()), ("limit", limit.to_string())],
        )?;
        self.get_json(url)
    }

    fn weather(&self, latitude: f64, longitude: f64) -> Result<WeatherResponse, RawFailure> {
        let url = self.endpoint(
            WEATHER_PATH,
            &[("lat", latitude.to_string()), ("lon", longitude.to_string())],
        )?;
        self.get_json(url)
    }
}

fn check_status(resp: Response) -> Result<Response, RawFailure> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let reason = status.canonical_reason().unwrap_or("unexpected status");
    Err(RawFailure::http(status.as_u16(), format!("{} {}", reason, resp.url())))
}

fn parse_base_url(value: &str) -> CoreResult<Url> {
    let mut value = value.trim().to_string();
    if !value.ends_with('/') {
        value.push('/');
    }
    Url::parse(&value).map_err(|err| CoreError::Config(format!("base url {}: {}", value, err)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Serves one canned response and hands back the request line.
    fn serve_once(status_line: &str, body: &str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let text = String::from_utf8_lossy(&request).to_string();
            let first = text.lines().next().unwrap_or_default().to_string();
            stream.write_all(response.as_bytes()).unwrap();
            let _ = tx.send(first);
        });
        (base, rx)
    }

    fn api_for(base: String) -> ReqwestWeatherApi {
        let config = ClientConfig {
            base_url: base,
            api_key: "secret".to_string(),
            ..ClientConfig::default()
        };
        ReqwestWeatherApi::new(&config).unwrap()
    }

    #[test]
    fn geocoding_request_carries_query_and_key() {
        let (base, rx) = serve_once(
            "200 OK",
            r#"[{"name": "Dallas", "lat": 32.7767, "lon": -96.797, "country": "US", "state": "Texas"}]"#,
        );
        let hits = api_for(base).coordinates("Dallas", 1).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].state.as_deref(), Some("Texas"));
        let line = rx.recv().unwrap();
        assert!(line.starts_with("GET /geo/1.0/direct?q=Dallas&limit=1&appid=secret"), "{}", line);
    }

    #[test]
    fn error_status_becomes_http_failure() {
        let (base, _rx) = serve_once("401 Unauthorized", r#"{"cod": 401, "message": "Invalid API key"}"#);
        let raw = api_for(base).weather(1.0, 2.0).unwrap_err();
        assert_eq!(raw.status_code(), Some(401));
    }

    #[test]
    fn undecodable_body_becomes_parse_failure() {
        let (base, _rx) = serve_once("200 OK", "<html>maintenance</html>");
        let raw = api_for(base).weather(1.0, 2.0).unwrap_err();
        assert!(raw.is_parse());
    }

    #[test]
    fn base_url_without_trailing_slash_is_accepted() {
        let url = parse_base_url("https://api.openweathermap.org").unwrap();
        assert_eq!(url.join(WEATHER_PATH).unwrap().path(), "/data/2.5/weather");
    }

    #[test]
    fn bad_base_url_is_config_error() {
        let err = parse_base_url("::nope").unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }
}
