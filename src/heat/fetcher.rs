//! Forecast fetcher for heat grid samples.

use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use super::{grid_points, HeatPoint};
use crate::config::HeatConfig;
use crate::error::AssetError;

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    hourly: HourlyForecast,
}

#[derive(Debug, Deserialize)]
struct HourlyForecast {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
}

/// Hour key in the forecast's `time` format, e.g. `2026-10-19T14:00`
pub fn current_hour_key(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:00").to_string()
}

/// Index of `key` in `times`, or the first hour when it is not listed
pub fn select_hour_index(times: &[String], key: &str) -> usize {
    times.iter().position(|t| t == key).unwrap_or(0)
}

/// Samples forecast temperatures on the configured grid
pub struct HeatFetcher {
    client: Client,
    endpoint: String,
    concurrency: usize,
}

impl HeatFetcher {
    pub fn new(cfg: &HeatConfig) -> Result<Self, AssetError> {
        let client = Client::builder()
            .user_agent("baltic-region/0.1 (heat grid)")
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| AssetError::Http {
                url: cfg.endpoint.clone(),
                source: e,
            })?;

        Ok(Self {
            client,
            endpoint: cfg.endpoint.clone(),
            concurrency: cfg.concurrency.max(1),
        })
    }

    /// Current-hour temperature at one grid position
    pub async fn fetch_point(&self, lat: f64, lon: f64) -> Result<HeatPoint, AssetError> {
        let http_err = |e| AssetError::Http {
            url: self.endpoint.clone(),
            source: e,
        };

        let url = Url::parse_with_params(
            &self.endpoint,
            &[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                (
                    "hourly",
                    "temperature_2m,pressure_msl,winddirection_10m,windspeed_10m".to_string(),
                ),
                ("forecast_days", "1".to_string()),
                ("timezone", "UTC".to_string()),
            ],
        )
        .map_err(|e| AssetError::InvalidUrl {
            url: self.endpoint.clone(),
            source: e,
        })?;

        let response = self.client.get(url).send().await.map_err(http_err)?;

        if !response.status().is_success() {
            return Err(AssetError::Status {
                url: self.endpoint.clone(),
                status: response.status(),
            });
        }

        let body = response.text().await.map_err(http_err)?;
        let forecast: ForecastResponse =
            serde_json::from_str(&body).map_err(|e| AssetError::Json {
                origin: self.endpoint.clone(),
                source: e,
            })?;

        let index = select_hour_index(&forecast.hourly.time, &current_hour_key(Utc::now()));
        let value = forecast
            .hourly
            .temperature_2m
            .get(index)
            .copied()
            .flatten()
            .ok_or_else(|| AssetError::MissingHour {
                url: self.endpoint.clone(),
                index,
            })?;

        debug!("Forecast at ({}, {}): {}", lat, lon, value);

        Ok(HeatPoint { lat, lon, value })
    }

    /// Fetch every grid position, in grid order. Failed positions are
    /// skipped.
    pub async fn load(&self, cfg: &HeatConfig) -> Vec<HeatPoint> {
        let positions = grid_points(cfg);
        info!(
            "Fetching forecast for {} grid points ({} in flight)...",
            positions.len(),
            self.concurrency
        );

        let results: Vec<_> = stream::iter(positions)
            .map(|(lat, lon)| async move { (lat, lon, self.fetch_point(lat, lon).await) })
            .buffered(self.concurrency)
            .collect()
            .await;

        let total = results.len();
        let points: Vec<HeatPoint> = results
            .into_iter()
            .filter_map(|(lat, lon, res)| match res {
                Ok(point) => Some(point),
                Err(e) => {
                    warn!("Skipping grid point ({}, {}): {}", lat, lon, e);
                    None
                }
            })
            .collect();

        info!("Fetched {}/{} heat points", points.len(), total);
        points
    }
}
