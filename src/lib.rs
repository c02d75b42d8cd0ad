use anyhow::Result;
use tracing::info;

pub mod config;
pub mod extract;
pub mod fetch;
pub mod output;
pub mod reshape;

use config::Config;
use fetch::PageSource;

/// Run the whole pipeline once: extract every configured year through
/// `source`, reshape into the wide table, write it to the configured path.
///
/// Fetch failures degrade to missing data; only the final file write is fatal.
pub async fn run<S: PageSource>(source: &S, config: &Config) -> Result<()> {
    let per_year = extract::extract_all(source, config).await;

    let table = reshape::reshape(per_year);
    info!(
        schools = table.rows.len(),
        columns = table.header().len(),
        "reshaped records into wide table"
    );

    output::write_csv(&table, &config.output)?;
    Ok(())
}
