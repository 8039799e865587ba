//! Climate-event feed client. Each client owns its cache; nothing is global.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::core::{DisruptionRegion, Supplier};
use crate::geo::GeoPoint;

#[derive(Debug, thiserror::Error)]
pub enum ClimateError {
    #[error("config error: {0}")]
    Config(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("request timeout: {0}")]
    Timeout(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ClimateError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            return Self::Timeout(value.to_string());
        }
        Self::Request(value.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateConfig {
    #[serde(default)]
    pub feed_url: Option<String>,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            feed_url: None,
            ttl_secs: default_ttl_secs(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    300
}

fn default_timeout_ms() -> u64 {
    10_000
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateEvent {
    pub id: String,
    /// Free tag such as `typhoon`, `flood` or `wildfire`.
    pub kind: String,
    pub location: GeoPoint,
    pub radius_km: f64,
    /// 0-100.
    pub severity: f64,
    #[serde(default)]
    pub description: String,
}

impl ClimateEvent {
    /// A disruption region covering the event footprint, with its impact zone
    /// filled from `suppliers`.
    pub fn to_region(&self, suppliers: &[Supplier], recovery_days: u32) -> DisruptionRegion {
        DisruptionRegion::new(self.location.lat, self.location.lng, self.radius_km.max(0.0))
            .with_impact_zone(suppliers, self.severity.clamp(0.0, 100.0), recovery_days)
    }
}

#[derive(Debug, Deserialize)]
struct FeedResponse {
    #[serde(default)]
    events: Vec<ClimateEvent>,
}

#[derive(Debug, Clone)]
struct CachedFeed {
    fetched_at: Instant,
    events: Arc<Vec<ClimateEvent>>,
}

pub struct ClimateRiskClient {
    feed_url: String,
    ttl: Duration,
    client: reqwest::Client,
    cache: DashMap<String, CachedFeed>,
}

impl ClimateRiskClient {
    pub fn new(config: &ClimateConfig) -> Result<Self, ClimateError> {
        let feed_url = config.feed_url.as_deref().unwrap_or("").trim().to_string();
        if feed_url.is_empty() {
            return Err(ClimateError::Config("climate feedUrl cannot be empty".to_string()));
        }
        reqwest::Url::parse(&feed_url).map_err(|error| {
            ClimateError::Config(format!("invalid climate feedUrl '{feed_url}': {error}"))
        })?;
        if config.timeout_ms == 0 {
            return Err(ClimateError::Config(
                "climate timeout must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            feed_url,
            ttl: Duration::from_secs(config.ttl_secs),
            client: reqwest::Client::builder()
                .timeout(Duration::from_millis(config.timeout_ms))
                .build()
                .map_err(|error| ClimateError::Config(error.to_string()))?,
            cache: DashMap::new(),
        })
    }

    /// Current events, served from cache while younger than the TTL.
    pub async fn events(&self) -> Result<Arc<Vec<ClimateEvent>>, ClimateError> {
        if let Some(events) = self.cached(&self.feed_url) {
            tracing::debug!("climate feed cache hit: {}", self.feed_url);
            return Ok(events);
        }

        let events = Arc::new(self.fetch().await?);
        self.cache.insert(
            self.feed_url.clone(),
            CachedFeed {
                fetched_at: Instant::now(),
                events: Arc::clone(&events),
            },
        );
        tracing::debug!("climate feed refreshed: {} events", events.len());
        Ok(events)
    }

    pub fn invalidate(&self) {
        self.cache.clear();
    }

    fn cached(&self, key: &str) -> Option<Arc<Vec<ClimateEvent>>> {
        let entry = self.cache.get(key)?;
        if entry.fetched_at.elapsed() < self.ttl {
            return Some(Arc::clone(&entry.events));
        }
        drop(entry);
        self.cache.remove(key);
        None
    }

    async fn fetch(&self) -> Result<Vec<ClimateEvent>, ClimateError> {
        let response = self.client.get(&self.feed_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClimateError::Request(format!(
                "climate feed returned status {}: {text}",
                status.as_u16()
            )));
        }
        let feed: FeedResponse = response.json().await.map_err(|error| {
            ClimateError::InvalidResponse(format!("failed to parse climate feed JSON: {error}"))
        })?;
        Ok(feed.events)
    }
}
