//! Client for the remote clinic search API.
//!
//! The API authenticates with an `X-API-Key` header and rate-limits per key.
//! Clinics in its responses are normalized through [`RawClinic`] like any
//! other source, and tagged with the `"api"` source when they carry none.

use super::RawClinic;
use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::types::Clinic;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const API_KEY_HEADER: &str = "X-API-Key";
const DEFAULT_RADIUS_M: u32 = 5000;
const DEFAULT_LIMIT: u32 = 50;

/// Parameters for the `/search` endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiQuery {
  /// Free text or a postcode such as "NW6", which the API geocodes.
  pub query: Option<String>,
  pub area: Option<String>,
  pub lat: Option<f64>,
  pub lon: Option<f64>,
  /// Search radius in meters.
  pub radius: u32,
  pub limit: u32,
}

impl Default for ApiQuery {
  fn default() -> Self {
    Self {
      query: None,
      area: None,
      lat: None,
      lon: None,
      radius: DEFAULT_RADIUS_M,
      limit: DEFAULT_LIMIT,
    }
  }
}

impl ApiQuery {
  pub fn text(query: impl Into<String>) -> Self {
    Self {
      query: Some(query.into()),
      ..Default::default()
    }
  }

  pub fn near(lat: f64, lon: f64) -> Self {
    Self {
      lat: Some(lat),
      lon: Some(lon),
      ..Default::default()
    }
  }

  pub fn area(mut self, area: impl Into<String>) -> Self {
    self.area = Some(area.into());
    self
  }

  pub fn radius(mut self, radius: u32) -> Self {
    self.radius = radius;
    self
  }

  pub fn limit(mut self, limit: u32) -> Self {
    self.limit = limit;
    self
  }

  /// Query-string pairs. Blank text and area are left out; `radius` and
  /// `limit` are always sent.
  pub fn params(&self) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(q) = self.query.as_deref().filter(|q| !q.trim().is_empty()) {
      params.push(("q", q.to_string()));
    }
    if let Some(area) = self.area.as_deref().filter(|a| !a.trim().is_empty()) {
      params.push(("area", area.to_string()));
    }
    if let Some(lat) = self.lat {
      params.push(("lat", lat.to_string()));
    }
    if let Some(lon) = self.lon {
      params.push(("lon", lon.to_string()));
    }
    params.push(("radius", self.radius.to_string()));
    params.push(("limit", self.limit.to_string()));
    params
  }
}

/// A normalized `/search` response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSearchResponse {
  pub clinics: Vec<Clinic>,
  pub total: usize,
  pub search_time_ms: u64,
  pub remaining_requests: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct WireSearchResponse {
  #[serde(default)]
  clinics: Vec<RawClinic>,
  #[serde(default)]
  total: Option<usize>,
  #[serde(default)]
  search_time_ms: u64,
  #[serde(default)]
  remaining_requests: Option<u64>,
}

impl From<WireSearchResponse> for ApiSearchResponse {
  fn from(wire: WireSearchResponse) -> Self {
    let clinics: Vec<Clinic> = wire
      .clinics
      .into_iter()
      .map(|raw| {
        let mut clinic = Clinic::from(raw);
        if clinic.source.is_empty() {
          clinic.source = "api".to_string();
        }
        clinic
      })
      .collect();
    Self {
      total: wire.total.unwrap_or(clinics.len()),
      clinics,
      search_time_ms: wire.search_time_ms,
      remaining_requests: wire.remaining_requests,
    }
  }
}

impl ApiSearchResponse {
  /// Parses and normalizes a response body.
  pub fn from_json(body: &str) -> Result<Self> {
    let wire: WireSearchResponse = serde_json::from_str(body)?;
    Ok(wire.into())
  }
}

#[derive(Debug, Deserialize)]
struct AreasResponse {
  #[serde(default)]
  areas: Vec<String>,
}

/// Maps a response status to the API's error conditions.
pub fn check_status(status: u16) -> std::result::Result<(), ApiError> {
  match status {
    200..=299 => Ok(()),
    401 => Err(ApiError::ApiKeyRequired),
    403 => Err(ApiError::InvalidApiKey),
    429 => Err(ApiError::RateLimited),
    other => Err(ApiError::Status(other)),
  }
}

/// Async client for the clinic search API.
#[derive(Debug, Clone)]
pub struct ApiClient {
  client: Client,
  base_url: String,
  api_key: String,
  defaults: ApiQuery,
}

impl ApiClient {
  pub fn new(config: &ApiConfig) -> Result<Self> {
    let client = ClientBuilder::new()
      .timeout(Duration::from_secs(30))
      .connect_timeout(Duration::from_secs(10))
      .build()
      .map_err(ApiError::from)?;
    Ok(Self {
      client,
      base_url: config.base_url.trim_end_matches('/').to_string(),
      api_key: config.api_key.clone(),
      defaults: ApiQuery::default().radius(config.radius_m).limit(config.limit),
    })
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// A query carrying the configured radius and limit.
  pub fn query(&self) -> ApiQuery {
    self.defaults.clone()
  }

  fn url(&self, path: &str) -> String {
    format!("{}/{}", self.base_url, path)
  }

  async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<String> {
    let response = self
      .client
      .get(self.url(path))
      .header(API_KEY_HEADER, &self.api_key)
      .query(params)
      .send()
      .await
      .map_err(ApiError::from)?;

    let status = response.status().as_u16();
    if let Err(err) = check_status(status) {
      warn!(path, status, error = %err, "clinic API request rejected");
      return Err(err.into());
    }
    Ok(response.text().await.map_err(ApiError::from)?)
  }

  /// Runs a search.
  pub async fn search(&self, query: &ApiQuery) -> Result<ApiSearchResponse> {
    let body = self.get("search", &query.params()).await?;
    let response = ApiSearchResponse::from_json(&body)?;
    debug!(
      total = response.total,
      search_time_ms = response.search_time_ms,
      remaining = ?response.remaining_requests,
      "clinic API search"
    );
    Ok(response)
  }

  /// Clinics around a point, using the `/nearby` endpoint.
  pub async fn nearby(&self, lat: f64, lon: f64, radius: u32, limit: u32) -> Result<ApiSearchResponse> {
    let query = ApiQuery::near(lat, lon).radius(radius).limit(limit);
    let body = self.get("nearby", &query.params()).await?;
    ApiSearchResponse::from_json(&body)
  }

  /// The London areas the API can search by name.
  pub async fn areas(&self) -> Result<Vec<String>> {
    let body = self.get("areas", &[]).await?;
    let areas: AreasResponse = serde_json::from_str(&body)?;
    Ok(areas.areas)
  }

  /// Whether the API answers its health check. Never fails; any transport
  /// error counts as unhealthy.
  pub async fn health(&self) -> bool {
    match self.client.get(self.url("health")).send().await {
      Ok(response) => response.status().is_success(),
      Err(err) => {
        debug!(error = %err, "clinic API health check failed");
        false
      }
    }
  }
}
