//! Workbook Catalog Client
//!
//! Downloads the per-economy workbooks listed in a `<select>` element of the
//! statistics catalog page.

use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;
use reqwest::{Client, Url};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::config::CatalogConfig;
use crate::error::{FdiError, FdiResult};

const SERVICE: &str = "Workbook Catalog";

/// Non-empty `value` attributes of the `<option>` elements inside the
/// `<select>` whose id is `select_id`, in document order.
pub fn extract_option_values(html: &str, select_id: &str) -> Vec<String> {
    let (Ok(select), Ok(id), Ok(option)) = (
        Regex::new(r"(?is)<select\b([^>]*)>(.*?)</select>"),
        Regex::new(r#"(?i)(?:^|\s)id\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#),
        Regex::new(r#"(?is)<option\b[^>]*?\svalue\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#),
    ) else {
        return Vec::new();
    };

    let body = select.captures_iter(html).find_map(|caps| {
        let attributes = caps.get(1)?.as_str();
        let found = id.captures(attributes).and_then(|found| first_group(&found))?;
        (found == select_id).then(|| caps.get(2).map_or("", |body| body.as_str()))
    });
    let Some(body) = body else {
        return Vec::new();
    };

    option
        .captures_iter(body)
        .filter_map(|caps| first_group(&caps))
        .map(|value| decode_entities(value.trim()))
        .filter(|value| !value.is_empty())
        .collect()
}

/// Value of whichever quoting alternative matched.
fn first_group<'h>(caps: &regex::Captures<'h>) -> Option<&'h str> {
    (1..=3).find_map(|group| caps.get(group)).map(|m| m.as_str())
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Resolve option values against the page URL. Unparseable values are skipped.
pub fn resolve_links(page_url: &Url, values: &[String]) -> Vec<Url> {
    values
        .iter()
        .filter_map(|value| match page_url.join(value) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(value = %value, error = %e, "Skipping unresolvable link");
                None
            }
        })
        .collect()
}

/// Final non-empty path segment of `url`.
pub fn file_name_for(url: &Url) -> Option<String> {
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(str::to_string)
}

/// Files saved by one fetch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub files: Vec<PathBuf>,
    pub bytes: u64,
}

pub struct CatalogClient {
    client: Client,
    page_url: Url,
    select_id: String,
    download_dir: PathBuf,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> FdiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Self::with_client(client, config)
    }

    pub fn with_client(client: Client, config: &CatalogConfig) -> FdiResult<Self> {
        let page_url = Url::parse(&config.page_url).map_err(|e| {
            FdiError::configuration(format!("invalid catalog page url '{}': {}", config.page_url, e))
        })?;

        Ok(Self {
            client,
            page_url,
            select_id: config.select_id.clone(),
            download_dir: config.download_dir.clone(),
        })
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Absolute URLs of every workbook listed on the catalog page.
    pub async fn list_workbooks(&self) -> FdiResult<Vec<Url>> {
        let response = self
            .client
            .get(self.page_url.clone())
            .send()
            .await?
            .error_for_status()?;
        let html = response.text().await?;

        let values = extract_option_values(&html, &self.select_id);
        if values.is_empty() {
            warn!(select_id = %self.select_id, "No workbook links found on catalog page");
        }
        let links = resolve_links(&self.page_url, &values);
        info!(count = links.len(), page = %self.page_url, "Found workbook links");
        Ok(links)
    }

    /// Stream one workbook into the download directory. Returns the saved path and size.
    pub async fn download(&self, url: &Url) -> FdiResult<(PathBuf, u64)> {
        let file_name = file_name_for(url).ok_or_else(|| {
            FdiError::external_service(SERVICE, format!("no file name in url {}", url))
        })?;
        let path = self.download_dir.join(file_name);

        let mut response = self.client.get(url.clone()).send().await?.error_for_status()?;

        tokio::fs::create_dir_all(&self.download_dir).await?;
        let mut file = tokio::fs::File::create(&path).await?;
        let mut bytes = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            bytes += chunk.len() as u64;
        }
        file.flush().await?;

        info!(url = %url, path = %path.display(), bytes, "Downloaded workbook");
        Ok((path, bytes))
    }

    /// List the catalog and download every workbook, one at a time.
    pub async fn fetch_all(&self) -> FdiResult<FetchSummary> {
        let mut summary = FetchSummary::default();
        for url in self.list_workbooks().await? {
            let (path, bytes) = self.download(&url).await?;
            summary.files.push(path);
            summary.bytes += bytes;
        }
        info!(files = summary.files.len(), bytes = summary.bytes, "Catalog fetch complete");
        Ok(summary)
    }
}
