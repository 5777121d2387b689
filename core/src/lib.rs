pub mod api;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod messages;
pub mod model;
pub mod prefs;
pub mod repo;


pub use crate::classify::{classify, ErrorKind, RawFailure};
pub use crate::client::WeatherClient;
pub use crate::error::{CoreError, DomainError, DomainResult};
pub use crate::messages::{MessageResolver, MessageTable};
pub use crate::repo::{WeatherRepo, WeatherRepoImpl};
