use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use weather_core::api::ReqwestWeatherApi;
use weather_core::config::ClientConfig;
use weather_core::model::{CompleteWeatherData, Temperature};
use weather_core::prefs::SqlitePreferences;
use weather_core::{CoreError, DomainError, MessageTable, WeatherClient, WeatherRepo, WeatherRepoImpl};

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return ExitCode::FAILURE;
    }

    let repo = match build_repo() {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let result = match args[1].as_str() {
        "city" => {
            if args.len() < 3 {
                print_usage();
                return ExitCode::FAILURE;
            }
            let name = args[2..].join(" ");
            repo.weather_by_city_name(name.trim())
        }
        "coords" => {
            let (Some(lat), Some(lon)) = (parse_coord(&args, 2), parse_coord(&args, 3)) else {
                eprintln!("invalid coordinates");
                print_usage();
                return ExitCode::FAILURE;
            };
            repo.weather_by_coordinates(lat, lon)
        }
        "last" => {
            return match repo.last_searched_city() {
                Ok(city) if city.is_empty() => {
                    println!("no city searched yet");
                    ExitCode::SUCCESS
                }
                Ok(city) => {
                    println!("{}", city);
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    eprintln!("error: {}", err);
                    ExitCode::FAILURE
                }
            };
        }
        _ => {
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(data) => {
            println!("{}", summary(&data));
            ExitCode::SUCCESS
        }
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_repo() -> Result<WeatherRepoImpl, CoreError> {
    let config = ClientConfig::from_env()?;
    let messages = match env::var("WEATHER_MESSAGES") {
        Ok(path) => MessageTable::from_json_file(path)?,
        Err(_) => MessageTable::default(),
    };
    let api = ReqwestWeatherApi::new(&config)?;
    let client = WeatherClient::new(Arc::new(api), messages)
        .with_geocoding_limit(config.geocoding_limit);
    let mut repo = WeatherRepoImpl::new(client);
    if let Ok(path) = env::var("WEATHER_DB") {
        let prefs = SqlitePreferences::new(path)?;
        repo = repo.with_preferences(Box::new(prefs));
    }
    Ok(repo)
}

fn parse_coord(args: &[String], idx: usize) -> Option<f64> {
    args.get(idx)
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

fn summary(data: &CompleteWeatherData) -> String {
    let weather = &data.weather;
    let (celsius, fahrenheit) = Temperature::from_kelvin(weather.main.temp).display_pair();
    let place = match &data.location.country {
        Some(country) => format!("{}, {}", data.location.name, country),
        None => data.location.name.clone(),
    };
    let (condition, icon) = match weather.condition() {
        Some(condition) => (condition.description.clone(), condition.icon_url()),
        None => ("--".to_string(), String::new()),
    };
    format!(
        "{}\t{}\t{} / {}\thumidity {}%\twind {} m/s\t{}",
        place, condition, celsius, fahrenheit, weather.main.humidity, weather.wind.speed, icon
    )
}

fn report(err: &DomainError) {
    match err.status_code() {
        Some(code) => eprintln!("error: {} (status {})", err, code),
        None => eprintln!("error: {}", err),
    }
}

const USAGE: &str = "Usage: weather-cli <command> [args]
Commands:
  city <name>          Current weather for a city
  coords <lat> <lon>   Current weather at coordinates
  last                 Show the last searched city (needs WEATHER_DB;
                       without it nothing is kept between runs)
Environment:
  WEATHER_API_KEY          OpenWeatherMap API key
  WEATHER_BASE_URL         Override the API base url
  WEATHER_TIMEOUT_SECS     Connect/read timeout
  WEATHER_DB=/path/to/db   Persist the last searched city in SQLite
  WEATHER_MESSAGES=file    JSON table of error messages
  RUST_LOG                 Log filter (default warn)";

fn print_usage() {
    eprintln!("{}", USAGE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_says_last_needs_a_database() {
        let last = USAGE
            .lines()
            .position(|line| line.trim_start().starts_with("last"))
            .unwrap();
        let entry: String = USAGE.lines().skip(last).take(2).collect();
        assert!(entry.contains("WEATHER_DB"), "{}", entry);
    }
}
