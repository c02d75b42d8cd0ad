use std::fmt;
use std::future::Future;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

/// One school-year observation as served by the directory API. Upstream rows
/// carry dozens of other fields; everything beyond these five is ignored at
/// deserialization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SchoolRecord {
    /// Opaque key. The API serializes it as a JSON string or number
    /// depending on the endpoint version, so both are accepted.
    #[serde(deserialize_with = "opaque_id")]
    pub school_id: String,
    pub school_name: String,
    pub year: u32,
    pub enrollment: Option<i64>,
    pub teachers_fte: Option<f64>,
}

/// One page of the paginated listing: a batch of records plus the link to
/// the next page, absent or null on the last page.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub results: Vec<SchoolRecord>,
    #[serde(default)]
    pub next: Option<String>,
}

fn opaque_id<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string or integer school id")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_owned())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    d.deserialize_any(IdVisitor)
}

/// Capability to fetch one JSON page given its URL.
///
/// Production uses [`HttpSource`]; tests script responses without a server.
pub trait PageSource {
    fn fetch_page(&self, url: &Url) -> impl Future<Output = Result<Page>> + Send;
}

/// [`PageSource`] backed by a shared `reqwest::Client`.
#[derive(Clone)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl PageSource for HttpSource {
    async fn fetch_page(&self, url: &Url) -> Result<Page> {
        debug!(%url, "GET page");
        self.client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?
            .error_for_status()
            .with_context(|| format!("non-success status from {url}"))?
            .json::<Page>()
            .await
            .with_context(|| format!("decoding page body from {url}"))
    }
}

/// Build the first page URL for one year: `<root><year>/?state=<state>`.
pub fn first_page_url(root: &Url, year: u32, state: &str) -> Result<Url> {
    let mut url = root
        .join(&format!("{year}/"))
        .with_context(|| format!("joining year {year} onto {root}"))?;
    url.query_pairs_mut().append_pair("state", state);
    Ok(url)
}

/// Fetch every page for one year, following `next` links until the server
/// stops supplying one. A failed or unparseable page ends pagination for the
/// year and whatever was accumulated up to that point is returned: partial
/// data is acceptable, a lost year is never fatal to the run.
pub async fn fetch_year<S: PageSource>(
    source: &S,
    root: &Url,
    year: u32,
    state: &str,
) -> Vec<SchoolRecord> {
    let first = match first_page_url(root, year, state) {
        Ok(url) => url,
        Err(e) => {
            warn!(year, error = %e, "could not build page URL; skipping year");
            return Vec::new();
        }
    };

    let mut records = Vec::new();
    let mut next = Some(first);
    let mut page_no = 0usize;

    while let Some(url) = next.take() {
        page_no += 1;
        let page = match source.fetch_page(&url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(year, page = page_no, error = %e, "page fetch failed; keeping partial year");
                break;
            }
        };
        info!(year, page = page_no, records = page.results.len(), "fetched page");
        records.extend(page.results);

        next = match page.next.as_deref() {
            Some(link) if !link.is_empty() => match Url::parse(link) {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!(year, page = page_no, error = %e, "bad next link; stopping pagination");
                    None
                }
            },
            _ => None,
        };
    }

    records
}
