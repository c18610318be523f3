use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::COOKIE;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::sync::Semaphore;
use tracing::{info, warn};

const STASH_URL: &str = "https://www.pathofexile.com/character-window/get-stash-items";
pub const STATION_TYPE: &str = "Horticrafting Station";

const CONCURRENCY: usize = 4;
const MAX_RETRIES: u32 = 3;
const BASE_BACKOFF_MS: u64 = 2000;

/// One page of the stash API. Metadata requests only carry `numTabs`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StashResponse {
    #[serde(default)]
    pub num_tabs: Option<usize>,
    #[serde(default)]
    pub items: Vec<StashItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StashItem {
    #[serde(default)]
    pub type_line: String,
    #[serde(default)]
    pub crafted_mods: Vec<String>,
}

impl StashResponse {
    /// Craft texts of every horticrafting station in this tab, in item order.
    pub fn station_crafts(self) -> Vec<String> {
        self.items
            .into_iter()
            .filter(|item| item.type_line == STATION_TYPE)
            .flat_map(|item| item.crafted_mods)
            .collect()
    }
}

pub fn parse_response(body: &str) -> Result<StashResponse> {
    serde_json::from_str(body).context("Unexpected stash API response")
}

/// Account whose stash is read.
#[derive(Debug, Clone)]
pub struct StashSource {
    pub account_name: String,
    pub poesessid: String,
    pub league: String,
}

pub struct StashClient {
    client: Client,
    source: StashSource,
}

impl StashClient {
    pub fn new(source: StashSource) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("hortiscan/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, source })
    }

    /// Number of stash tabs in the league.
    pub async fn tab_count(&self) -> Result<usize> {
        let meta = self.get(None).await?;
        meta.num_tabs
            .ok_or_else(|| anyhow!("Stash metadata has no numTabs"))
    }

    pub async fn fetch_tab(&self, tab: usize) -> Result<Vec<String>> {
        Ok(self.get(Some(tab)).await?.station_crafts())
    }

    /// Fetch every tab concurrently and flatten the crafts in tab order.
    pub async fn fetch_all(self: Arc<Self>) -> Result<Vec<String>> {
        let total = self.tab_count().await?;
        info!("Fetching {} stash tabs from {}", total, self.source.league);

        let semaphore = Arc::new(Semaphore::new(CONCURRENCY));
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40} {pos}/{len} tabs")?
                .progress_chars("=> "),
        );

        let (tx, mut rx) = tokio::sync::mpsc::channel::<(usize, Result<Vec<String>>)>(CONCURRENCY * 2);
        for tab in 0..total {
            let client = Arc::clone(&self);
            let sem = Arc::clone(&semaphore);
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = match sem.acquire().await {
                    Ok(_permit) => client.fetch_tab(tab).await,
                    Err(e) => Err(e.into()),
                };
                let _ = tx.send((tab, result)).await;
            });
        }
        drop(tx);

        let mut pages: Vec<Vec<String>> = vec![Vec::new(); total];
        while let Some((tab, result)) = rx.recv().await {
            pages[tab] = result.with_context(|| format!("Failed to fetch stash tab {}", tab))?;
            pb.inc(1);
        }
        pb.finish_and_clear();

        let crafts: Vec<String> = pages.into_iter().flatten().collect();
        info!("Found {} crafts across {} tabs", crafts.len(), total);
        Ok(crafts)
    }

    async fn get(&self, tab: Option<usize>) -> Result<StashResponse> {
        let mut query = vec![
            ("league", self.source.league.clone()),
            ("accountName", self.source.account_name.clone()),
        ];
        if let Some(tab) = tab {
            query.push(("tabs", "1".to_string()));
            query.push(("tabIndex", tab.to_string()));
        }

        let mut attempt = 0;
        loop {
            let response = self
                .client
                .get(STASH_URL)
                .query(&query)
                .header(COOKIE, format!("POESESSID={}", self.source.poesessid))
                .send()
                .await?;

            let status = response.status();
            let retryable = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            if retryable && attempt < MAX_RETRIES {
                let backoff = Duration::from_millis(BASE_BACKOFF_MS * 2u64.pow(attempt));
                warn!(
                    "Stash API returned {} (attempt {}/{}), backing off {:.1}s",
                    status,
                    attempt + 1,
                    MAX_RETRIES,
                    backoff.as_secs_f64()
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
                continue;
            }

            let body = response
                .error_for_status()?
                .text()
                .await
                .context("Failed to read stash API response")?;
            return parse_response(&body);
        }
    }
}

/// Crafts from the stash API: a single tab when `tab` is set, otherwise all of them.
pub async fn fetch_crafts(source: StashSource, tab: Option<usize>) -> Result<Vec<String>> {
    let client = StashClient::new(source)?;
    match tab {
        Some(tab) => {
            info!("Fetching stash tab {}", tab);
            client.fetch_tab(tab).await
        }
        None => Arc::new(client).fetch_all().await,
    }
}

/// Offline input: a saved stash response (object or array of objects), or one craft per line.
pub fn read_crafts_file(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read crafts from {}", path.display()))?;
    parse_crafts(&raw).with_context(|| format!("Invalid crafts file {}", path.display()))
}

pub fn parse_crafts(raw: &str) -> Result<Vec<String>> {
    let trimmed = raw.trim_start();
    if trimmed.starts_with('{') {
        return Ok(parse_response(trimmed)?.station_crafts());
    }
    if trimmed.starts_with('[') {
        let tabs: Vec<StashResponse> =
            serde_json::from_str(trimmed).context("Unexpected stash tab list")?;
        return Ok(tabs.into_iter().flat_map(StashResponse::station_crafts).collect());
    }
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}
