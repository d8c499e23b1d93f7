use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use url::Url;

use crate::config::PlayerConfig;
use crate::models::{LiveMetadataResponse, Station, StationList};

const USER_AGENT: &str = concat!("radio-player/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{endpoint} returned {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

/// Read side of the station data service.
#[async_trait]
pub trait StationDirectory: Send + Sync {
    async fn active_stations(&self) -> Result<Vec<Station>, DirectoryError>;

    async fn live_metadata(&self, station_id: &str) -> Result<LiveMetadataResponse, DirectoryError>;
}

#[derive(Clone)]
pub struct HttpStationDirectory {
    client: Client,
    base_url: Url,
}

impl HttpStationDirectory {
    pub fn new(config: &PlayerConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, config.api_base_url.clone()))
    }

    pub fn with_client(client: Client, mut base_url: Url) -> Self {
        // `Url::join` replaces the last segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { client, base_url }
    }

    fn endpoint(&self, path: &str) -> Result<Url, DirectoryError> {
        Ok(self.base_url.join(path)?)
    }
}

#[async_trait]
impl StationDirectory for HttpStationDirectory {
    async fn active_stations(&self) -> Result<Vec<Station>, DirectoryError> {
        let mut url = self.endpoint("stations")?;
        url.query_pairs_mut().append_pair("active", "true");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(DirectoryError::Status {
                endpoint: "stations",
                status: response.status(),
            });
        }
        let list: StationList = response.json().await?;
        Ok(list.items)
    }

    async fn live_metadata(&self, station_id: &str) -> Result<LiveMetadataResponse, DirectoryError> {
        let mut url = self.endpoint("live-metadata")?;
        url.query_pairs_mut().append_pair("stationId", station_id);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(DirectoryError::Status {
                endpoint: "live-metadata",
                status: response.status(),
            });
        }
        Ok(response.json().await?)
    }
}
