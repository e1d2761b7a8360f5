// src/search_api.rs
//! SerpApi Google Jobs client. Thin wrapper: fetch a page of raw results,
//! optionally dump them to disk for debugging, and hand them to the
//! normalizer untouched.

use crate::normalize::ApiJob;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

const SEARCH_ENDPOINT: &str = "https://serpapi.com/search.json";

/// Results per page of the google_jobs engine.
const PAGE_SIZE: u32 = 10;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    jobs_results: Vec<ApiJob>,
}

pub struct JobSearchClient {
    client: Client,
    api_key: String,
    query: String,
    location: String,
}

impl JobSearchClient {
    pub fn new(api_key: String, query: String, location: String) -> Result<Self> {
        let client = Client::builder()
            .user_agent("jobscout/0.1")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            query,
            location,
        })
    }

    /// Fetch one page of job results. Pages start at 0.
    pub async fn fetch_page(&self, page: u32) -> Result<Vec<ApiJob>> {
        info!("Fetching job results page {}", page);

        let start = (page * PAGE_SIZE).to_string();
        let params = [
            ("engine", "google_jobs"),
            ("q", self.query.as_str()),
            ("location", self.location.as_str()),
            ("api_key", self.api_key.as_str()),
            ("start", start.as_str()),
        ];

        let response = self
            .client
            .get(SEARCH_ENDPOINT)
            .query(&params)
            .send()
            .await
            .context("Failed to fetch job results")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        let body: SearchResponse = response
            .json()
            .await
            .context("Failed to parse search response")?;

        info!("Fetched {} job results", body.jobs_results.len());
        Ok(body.jobs_results)
    }
}

/// Dump raw fetched results to a timestamped JSON file so a bad scrape can
/// be inspected later. Returns the written path.
pub async fn store_raw_results(jobs: &[ApiJob], results_dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(results_dir)
        .await
        .context("Failed to create results directory")?;

    let path = results_dir.join(format!(
        "jobs_results_{}.json",
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    ));

    let payload =
        serde_json::to_string_pretty(jobs).context("Failed to serialize job results")?;
    tokio::fs::write(&path, payload)
        .await
        .with_context(|| format!("Failed to write results file: {}", path.display()))?;

    info!("Raw results stored at {}", path.display());
    Ok(path)
}
