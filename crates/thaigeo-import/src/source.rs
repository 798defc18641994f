//! Sources of raw geography collections.
//!
//! [`HttpSource`] fetches the three JSON collections over HTTP;
//! [`MemorySource`] serves fixed collections and is used for tests and
//! offline seeding. Both hand back whole collections: a payload that does not
//! decode completely is rejected outright.

use std::{collections::HashMap, future::Future, sync::Mutex, time::Duration};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thaigeo_core::geo::Level;

use crate::{error::FetchError, layout::RawRecord};

/// Fixed request timeout for every collection fetch.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_BASE: &str =
  "https://raw.githubusercontent.com/thailand-geography-data/thailand-geography-json/main/src";

/// Anything that can produce the raw records of one level.
pub trait GeoSource: Send + Sync {
  fn fetch(
    &self,
    level: Level,
  ) -> impl Future<Output = Result<Vec<RawRecord>, FetchError>> + Send + '_;
}

// ─── HTTP ────────────────────────────────────────────────────────────────────

/// Locations of the three collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUrls {
  #[serde(default = "default_provinces_url")]
  pub provinces_url:    String,
  #[serde(default = "default_districts_url")]
  pub districts_url:    String,
  #[serde(default = "default_subdistricts_url")]
  pub subdistricts_url: String,
}

fn default_provinces_url() -> String { format!("{DEFAULT_BASE}/provinces.json") }
fn default_districts_url() -> String { format!("{DEFAULT_BASE}/districts.json") }
fn default_subdistricts_url() -> String { format!("{DEFAULT_BASE}/subdistricts.json") }

impl Default for SourceUrls {
  fn default() -> Self {
    Self {
      provinces_url:    default_provinces_url(),
      districts_url:    default_districts_url(),
      subdistricts_url: default_subdistricts_url(),
    }
  }
}

impl SourceUrls {
  pub fn for_level(&self, level: Level) -> &str {
    match level {
      Level::Province => &self.provinces_url,
      Level::District => &self.districts_url,
      Level::Subdistrict => &self.subdistricts_url,
    }
  }
}

/// Fetches collections with a shared [`reqwest::Client`].
///
/// Cheap to clone; the inner client is `Arc`-based.
#[derive(Clone)]
pub struct HttpSource {
  client: Client,
  urls:   SourceUrls,
}

impl HttpSource {
  pub fn new(urls: SourceUrls) -> Result<Self, reqwest::Error> {
    let client = Client::builder().timeout(FETCH_TIMEOUT).build()?;
    Ok(Self { client, urls })
  }

  /// `GET url` and decode the body as a JSON array of records.
  async fn fetch_json(&self, url: &str) -> Result<Vec<RawRecord>, FetchError> {
    let resp = self.client.get(url).send().await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(FetchError::Status { status: status.as_u16(), body });
    }

    let body = resp.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
  }
}

impl GeoSource for HttpSource {
  async fn fetch(&self, level: Level) -> Result<Vec<RawRecord>, FetchError> {
    let url = self.urls.for_level(level);
    tracing::info!(%level, url, "fetching collection");
    let records = self.fetch_json(url).await?;
    tracing::info!(%level, count = records.len(), "collection fetched");
    Ok(records)
  }
}

// ─── In-memory ───────────────────────────────────────────────────────────────

enum Canned {
  Records(Vec<RawRecord>),
  Unavailable,
}

/// A source that serves fixed collections.
///
/// Levels without a collection serve an empty one. Every fetch is logged so
/// callers can assert on the order of fetches.
#[derive(Default)]
pub struct MemorySource {
  collections: HashMap<Level, Canned>,
  fetched:     Mutex<Vec<Level>>,
}

impl MemorySource {
  pub fn new() -> Self { Self::default() }

  /// Serve `payload` for `level`. The payload goes through the same decoding
  /// as an HTTP body, so it must be a JSON array of objects.
  pub fn with(mut self, level: Level, payload: Value) -> Result<Self, FetchError> {
    let records: Vec<RawRecord> = serde_json::from_value(payload)?;
    self.collections.insert(level, Canned::Records(records));
    Ok(self)
  }

  /// Make every fetch of `level` fail with a 503.
  pub fn unavailable(mut self, level: Level) -> Self {
    self.collections.insert(level, Canned::Unavailable);
    self
  }

  /// Levels fetched so far, in order.
  pub fn fetched(&self) -> Vec<Level> {
    self
      .fetched
      .lock()
      .map(|log| log.clone())
      .unwrap_or_default()
  }
}

impl GeoSource for MemorySource {
  async fn fetch(&self, level: Level) -> Result<Vec<RawRecord>, FetchError> {
    if let Ok(mut log) = self.fetched.lock() {
      log.push(level);
    }
    match self.collections.get(&level) {
      Some(Canned::Records(records)) => Ok(records.clone()),
      Some(Canned::Unavailable) => Err(FetchError::Status {
        status: 503,
        body:   format!("{} unavailable", level.table()),
      }),
      None => Ok(Vec::new()),
    }
  }
}

#[cfg(test)]
mod tests {
  use axum::{Router, http::StatusCode, routing::get};
  use serde_json::json;
  use tokio::net::TcpListener;

  use super::*;

  /// Serve a tiny router on an ephemeral port and return its base URL.
  async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr     = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
  }

  fn urls(base: &str) -> SourceUrls {
    SourceUrls {
      provinces_url:    format!("{base}/provinces.json"),
      districts_url:    format!("{base}/districts.json"),
      subdistricts_url: format!("{base}/subdistricts.json"),
    }
  }

  #[tokio::test]
  async fn fetches_and_decodes_array() {
    let app = Router::new().route(
      "/provinces.json",
      get(|| async { r#"[{"id":1,"provinceCode":10},{"id":2,"provinceCode":11}]"# }),
    );
    let base   = serve(app).await;
    let source = HttpSource::new(urls(&base)).unwrap();

    let records = source.fetch(Level::Province).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["provinceCode"], json!(10));
  }

  #[tokio::test]
  async fn non_success_status_carries_body() {
    let app = Router::new().route(
      "/districts.json",
      get(|| async { (StatusCode::NOT_FOUND, "no such file") }),
    );
    let base   = serve(app).await;
    let source = HttpSource::new(urls(&base)).unwrap();

    let err = source.fetch(Level::District).await.unwrap_err();
    match err {
      FetchError::Status { status, body } => {
        assert_eq!(status, 404);
        assert_eq!(body, "no such file");
      }
      other => panic!("expected status error, got {other}"),
    }
  }

  #[tokio::test]
  async fn partially_valid_payload_is_rejected_whole() {
    let app = Router::new().route(
      "/subdistricts.json",
      get(|| async { r#"[{"id":1},"not an object",{"id":3}]"# }),
    );
    let base   = serve(app).await;
    let source = HttpSource::new(urls(&base)).unwrap();

    let err = source.fetch(Level::Subdistrict).await.unwrap_err();
    assert_eq!(err.cause(), "decode");
  }

  #[tokio::test]
  async fn unreachable_host_is_a_network_error() {
    // Bind and immediately drop to get a port that is almost certainly closed.
    let port = {
      let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
      l.local_addr().unwrap().port()
    };
    let source = HttpSource::new(urls(&format!("http://127.0.0.1:{port}"))).unwrap();

    let err = source.fetch(Level::Province).await.unwrap_err();
    assert_eq!(err.cause(), "network");
  }

  #[tokio::test]
  async fn memory_source_logs_fetch_order() {
    let source = MemorySource::new()
      .with(Level::Province, json!([{ "provinceCode": 1 }]))
      .unwrap()
      .unavailable(Level::District);

    assert_eq!(source.fetch(Level::Province).await.unwrap().len(), 1);
    assert_eq!(source.fetch(Level::District).await.unwrap_err().cause(), "http-status");
    assert!(source.fetch(Level::Subdistrict).await.unwrap().is_empty());
    assert_eq!(
      source.fetched(),
      [Level::Province, Level::District, Level::Subdistrict]
    );
  }

  #[test]
  fn memory_source_rejects_non_array_payloads() {
    assert!(MemorySource::new().with(Level::Province, json!({ "id": 1 })).is_err());
  }
}
