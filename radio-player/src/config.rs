use std::env;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_STATION_ID: &str = "lima";
pub const DEFAULT_BRAND: &str = "Exitosa";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    Message(String),
}

/// Knobs for one player session. `PlayerConfig::new` gives the production
/// defaults; `load` reads overrides from the environment.
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    pub api_base_url: Url,
    pub default_station_id: String,
    pub brand: String,
    pub load_timeout: Duration,
    pub autoplay_delay: Duration,
    pub metadata_interval: Duration,
    pub progress_tick: Duration,
    pub request_timeout: Duration,
    pub tv_embed_url: Option<Url>,
}

impl PlayerConfig {
    pub fn new(api_base_url: Url) -> Self {
        Self {
            api_base_url,
            default_station_id: DEFAULT_STATION_ID.to_string(),
            brand: DEFAULT_BRAND.to_string(),
            load_timeout: Duration::from_secs(10),
            autoplay_delay: Duration::from_secs(1),
            metadata_interval: Duration::from_secs(60),
            progress_tick: Duration::from_secs(1),
            request_timeout: Duration::from_secs(10),
            tv_embed_url: None,
        }
    }

    pub fn load() -> Result<Self, ConfigError> {
        let raw_base = env::var("RADIO_API_BASE_URL")
            .map_err(|_| ConfigError::Message("RADIO_API_BASE_URL must be set".into()))?;
        let api_base_url = parse_http_url("RADIO_API_BASE_URL", &raw_base)?;
        let mut config = Self::new(api_base_url);

        if let Some(station) = env_non_empty("PLAYER_DEFAULT_STATION") {
            config.default_station_id = station;
        }
        if let Some(brand) = env_non_empty("PLAYER_BRAND") {
            config.brand = brand;
        }
        config.load_timeout = env_millis("PLAYER_LOAD_TIMEOUT_MS", config.load_timeout)?;
        config.autoplay_delay = env_millis("PLAYER_AUTOPLAY_DELAY_MS", config.autoplay_delay)?;
        config.metadata_interval =
            env_millis("PLAYER_METADATA_INTERVAL_MS", config.metadata_interval)?;
        config.request_timeout = env_millis("PLAYER_REQUEST_TIMEOUT_MS", config.request_timeout)?;
        config.tv_embed_url = env_non_empty("PLAYER_TV_EMBED_URL")
            .map(|raw| parse_http_url("PLAYER_TV_EMBED_URL", &raw))
            .transpose()?;

        if config.load_timeout.is_zero() {
            return Err(ConfigError::Message(
                "PLAYER_LOAD_TIMEOUT_MS must be greater than zero".into(),
            ));
        }
        if config.metadata_interval.is_zero() {
            return Err(ConfigError::Message(
                "PLAYER_METADATA_INTERVAL_MS must be greater than zero".into(),
            ));
        }
        Ok(config)
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_millis(key: &str, default: Duration) -> Result<Duration, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::Message(format!("{key} must be a whole number of milliseconds"))),
        Err(_) => Ok(default),
    }
}

fn parse_http_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|err| ConfigError::Message(format!("Invalid {key}: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::Message(format!(
            "{key} must use http or https"
        ))),
    }
}
