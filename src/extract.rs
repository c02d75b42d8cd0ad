use futures::future::join_all;
use tracing::info;

use crate::config::Config;
use crate::fetch::{fetch_year, PageSource, SchoolRecord};

/// Fetch every configured year through `source`, concurrently. The per-year
/// fetches share nothing; results come back in configured-year order. A
/// failed year contributes an empty list and never aborts the others.
pub async fn extract_all<S: PageSource>(source: &S, config: &Config) -> Vec<Vec<SchoolRecord>> {
    let fetches = config.years.iter().map(|&year| {
        let root = &config.api_root;
        let state = config.state.as_str();
        async move {
            info!(year, "fetching school year");
            let records = fetch_year(source, root, year, state).await;
            info!(year, records = records.len(), "year complete");
            records
        }
    });

    join_all(fetches).await
}
