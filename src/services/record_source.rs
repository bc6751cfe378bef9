use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::SourceConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct RawMapInfo {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPlayer {
    #[serde(default)]
    pub steamid: String,
    #[serde(default)]
    pub personaname: String,
    #[serde(default)]
    pub profileurl: String,
    #[serde(default)]
    pub avatarmedium: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSpeedrun {
    #[serde(default)]
    pub map: String,
    pub mission: String,
    #[serde(default)]
    pub time: f64,
    #[serde(default, rename = "timeAdded")]
    pub time_added: i64,
    #[serde(default)]
    pub players: Vec<RawPlayer>,
}

/// Everything fetched for one map.
#[derive(Debug, Clone)]
pub struct MapBatch {
    pub map: String,
    pub speedruns: Vec<RawSpeedrun>,
    pub mission_info: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    pub maps_requested: usize,
    pub batches: Vec<MapBatch>,
    pub warnings: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("invalid json from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("gave up on {url} after {attempts} attempts: {last}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last: Box<SourceError>,
    },
}

#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn map_names(&self) -> Result<Vec<String>, SourceError>;
    async fn speedruns(&self, map: &str) -> Result<Vec<RawSpeedrun>, SourceError>;
    async fn mission_info(&self, map: &str) -> Result<Vec<serde_json::Value>, SourceError>;
}

/// Fetches every map concurrently and collects batches in completion order.
/// A failing map becomes a warning; only the map list itself is fatal.
pub async fn fetch_all(source: &dyn RecordSource) -> Result<FetchOutcome, SourceError> {
    let maps = source.map_names().await?;
    let mut outcome = FetchOutcome {
        maps_requested: maps.len(),
        ..FetchOutcome::default()
    };
    if maps.is_empty() {
        tracing::warn!("Record source returned no maps");
        return Ok(outcome);
    }

    let mut pending: FuturesUnordered<_> = maps
        .into_iter()
        .map(|map| async move {
            let fetched = futures::try_join!(source.speedruns(&map), source.mission_info(&map));
            (map, fetched)
        })
        .collect();

    while let Some((map, fetched)) = pending.next().await {
        match fetched {
            Ok((speedruns, mission_info)) if speedruns.is_empty() || mission_info.is_empty() => {
                tracing::debug!(map = %map, "Map has no speedrun or mission data, skipping");
            }
            Ok((speedruns, mission_info)) => {
                tracing::debug!(map = %map, runs = speedruns.len(), "Fetched map");
                outcome.batches.push(MapBatch {
                    map,
                    speedruns,
                    mission_info,
                });
            }
            Err(e) => {
                tracing::warn!(map = %map, error = %e, "Failed to fetch map, continuing without it");
                outcome.warnings.push(format!("{map}: {e}"));
            }
        }
    }

    Ok(outcome)
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

#[derive(Debug, Clone)]
pub struct HttpRecordSource {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl HttpRecordSource {
    pub fn new(config: &SourceConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy {
                attempts: config.retry_attempts.max(1),
                delay: Duration::from_millis(config.retry_delay_ms),
            },
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let url = self.url(path);
        let mut last = None;
        for attempt in 1..=self.retry.attempts {
            match self.try_get_json(&url, query).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::warn!(url = %url, attempt, error = %e, "Record source request failed");
                    last = Some(e);
                    if attempt < self.retry.attempts {
                        tokio::time::sleep(self.retry.delay).await;
                    }
                }
            }
        }
        Err(match last {
            Some(e) if self.retry.attempts > 1 => SourceError::RetriesExhausted {
                url,
                attempts: self.retry.attempts,
                last: Box::new(e),
            },
            Some(e) => e,
            None => SourceError::Status { url, status: 0 },
        })
    }

    async fn try_get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let response = self.client.get(url).query(query).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| SourceError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl RecordSource for HttpRecordSource {
    async fn map_names(&self) -> Result<Vec<String>, SourceError> {
        let maps: Option<Vec<RawMapInfo>> = self.get_json("api/mapinfo", &[]).await?;
        Ok(maps
            .unwrap_or_default()
            .into_iter()
            .map(|m| m.name)
            .collect())
    }

    async fn speedruns(&self, map: &str) -> Result<Vec<RawSpeedrun>, SourceError> {
        let runs: Option<Vec<RawSpeedrun>> =
            self.get_json("api/speedrun", &[("map", map)]).await?;
        Ok(runs.unwrap_or_default())
    }

    async fn mission_info(&self, map: &str) -> Result<Vec<serde_json::Value>, SourceError> {
        let info: Option<serde_json::Value> =
            self.get_json("api/missioninfo", &[("map", map)]).await?;
        Ok(match info {
            Some(serde_json::Value::Array(items)) => items,
            Some(serde_json::Value::Null) | None => Vec::new(),
            Some(other) => vec![other],
        })
    }
}
