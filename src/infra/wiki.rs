//! Async client for the OSRS wiki real-time prices API.
//!
//! - One `latest?id=` request per item, all five issued together.
//! - The first failing lookup fails the whole fetch; nothing partial escapes.

use std::{collections::HashMap, time::Duration, time::SystemTime};

use futures::future::try_join_all;
use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{
    CatalogEntry, CraftedItemOption, ItemCatalog, PriceSnapshot, PriceTriple, Provenance,
};

pub const DEFAULT_BASE_URL: &str = "https://prices.runescape.wiki/api/v1/osrs/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum PriceClientError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("no high/low price returned for id={0}")]
    MissingPrice(u32),
    #[error("{name} fetch: {source}")]
    Lookup {
        name: String,
        #[source]
        source: Box<PriceClientError>,
    },
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    data: HashMap<String, LatestEntry>,
}

#[derive(Debug, Deserialize)]
struct LatestEntry {
    #[serde(default)]
    high: Option<i64>,
    #[serde(default)]
    low: Option<i64>,
}

#[derive(Clone)]
pub struct PriceClient {
    http: Client,
    base_url: Url,
}

impl PriceClient {
    pub fn new(user_agent: &str) -> Result<Self, PriceClientError> {
        Self::with_base_url(DEFAULT_BASE_URL, user_agent, DEFAULT_TIMEOUT)
    }

    pub fn with_base_url(
        base: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, PriceClientError> {
        let base_url = Url::parse(base)?;
        let http = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { http, base_url })
    }

    /// Looks up every catalog item and assembles a fetched snapshot.
    pub async fn fetch_snapshot(
        &self,
        catalog: &ItemCatalog,
    ) -> Result<(PriceSnapshot, Provenance), PriceClientError> {
        info!("Fetching prices for {} items", catalog.items.len() + 2);

        let lookups = [&catalog.ingredient_a, &catalog.ingredient_b]
            .into_iter()
            .chain(catalog.items.iter())
            .map(|entry| self.fetch_labelled(entry));

        let mut triples = try_join_all(lookups).await?.into_iter();

        let ingredient_a = triples.next().unwrap_or_default();
        let ingredient_b = triples.next().unwrap_or_default();
        let items = catalog
            .items
            .iter()
            .zip(triples)
            .map(|(entry, price)| CraftedItemOption::new(entry.name.clone(), entry.id, price))
            .collect();

        let snapshot = PriceSnapshot {
            ingredient_a,
            ingredient_b,
            items,
        };
        Ok((snapshot, Provenance::fetched(SystemTime::now())))
    }

    async fn fetch_labelled(&self, entry: &CatalogEntry) -> Result<PriceTriple, PriceClientError> {
        self.fetch_triple(entry.id).await.map_err(|err| {
            warn!("Price lookup for {} (id={}) failed: {err}", entry.name, entry.id);
            PriceClientError::Lookup {
                name: entry.name.clone(),
                source: Box::new(err),
            }
        })
    }

    pub async fn fetch_triple(&self, id: u32) -> Result<PriceTriple, PriceClientError> {
        let mut url = self.url("latest")?;
        url.query_pairs_mut().append_pair("id", &id.to_string());
        debug!("Requesting prices from {url}");

        let response: LatestResponse = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        triple_from_latest(id, response)
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}

fn triple_from_latest(id: u32, response: LatestResponse) -> Result<PriceTriple, PriceClientError> {
    let entry = response
        .data
        .get(&id.to_string())
        .ok_or(PriceClientError::MissingPrice(id))?;

    match (entry.high, entry.low) {
        (Some(high), Some(low)) => Ok(PriceTriple::from_high_low(high, low)),
        _ => Err(PriceClientError::MissingPrice(id)),
    }
}
