//! Price providers: where raw series payloads come from.
//!
//! [`HttpProvider`] talks to the dashboard REST API. [`JsonFileProvider`]
//! serves previously saved responses from disk (offline mode, fixtures).
//! Any `Fn(&ProviderRequest) -> Result<Value>` closure is also a provider.

use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use flate2::read::GzDecoder;
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::config;
use crate::error::{DashboardError, Result};
use crate::request::ProviderRequest;

/// Source of raw price payloads.
///
/// Implementations return the payload untouched; shape checks and record
/// parsing happen in the normalizer.
pub trait PriceProvider: Send + Sync {
    fn fetch(&self, request: &ProviderRequest) -> Result<Value>;
}

impl<F> PriceProvider for F
where
    F: Fn(&ProviderRequest) -> Result<Value> + Send + Sync,
{
    fn fetch(&self, request: &ProviderRequest) -> Result<Value> {
        self(request)
    }
}

// ---------------------------------------------------------------------------
// HttpProvider
// ---------------------------------------------------------------------------

/// Blocking HTTP provider for `GET {base_url}/DataFiltered`.
pub struct HttpProvider {
    base_url: String,
    client: Client,
}

impl HttpProvider {
    /// Create a provider with its own HTTP client.
    ///
    /// `timeout` bounds each request; a timed-out request surfaces as a
    /// failed fetch.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl PriceProvider for HttpProvider {
    fn fetch(&self, request: &ProviderRequest) -> Result<Value> {
        let url = config::data_url(&self.base_url);
        info!(%url, asset = %request.asset(), interval = %request.interval(), "fetching price series");

        let resp = self.client.get(&url).query(&request.query_pairs()).send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(DashboardError::Fetch(format!(
                "{} returned {}: {}",
                url,
                status,
                body.trim()
            )));
        }

        let payload: Value = resp.json()?;
        debug!(%url, "provider responded");
        Ok(payload)
    }
}

// ---------------------------------------------------------------------------
// JsonFileProvider
// ---------------------------------------------------------------------------

/// Serves payloads from `<dir>/<ASSET>_<interval>.json` (or `.json.gz`).
pub struct JsonFileProvider {
    dir: PathBuf,
}

impl JsonFileProvider {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the plain JSON file for a request (whether or not it exists).
    pub fn path_for(&self, request: &ProviderRequest) -> PathBuf {
        self.dir.join(config::offline_file_name(
            request.asset().as_str(),
            request.interval().as_str(),
        ))
    }

    fn load(path: &Path) -> Result<Value> {
        let contents = if path.extension().and_then(|e| e.to_str()) == Some("gz") {
            let file = fs::File::open(path)?;
            let mut decoder = BufReader::new(GzDecoder::new(BufReader::new(file)));
            let mut contents = String::new();
            decoder.read_to_string(&mut contents)?;
            contents
        } else {
            fs::read_to_string(path)?
        };
        Ok(serde_json::from_str(&contents)?)
    }
}

impl PriceProvider for JsonFileProvider {
    fn fetch(&self, request: &ProviderRequest) -> Result<Value> {
        let plain = self.path_for(request);
        let gzipped = plain.with_extension("json.gz");

        let path = [plain, gzipped]
            .into_iter()
            .find(|p| p.exists())
            .ok_or_else(|| {
                DashboardError::NotFound(format!(
                    "No saved response for {} ({}) in {}",
                    request.asset(),
                    request.interval(),
                    self.dir.display()
                ))
            })?;

        debug!(path = %path.display(), "loading saved price series");
        Self::load(&path)
    }
}
