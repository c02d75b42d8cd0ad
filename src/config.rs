use std::path::PathBuf;

use url::Url;

/// Run configuration, injected into the pipeline entry point. The core
/// modules only see this value; nothing reads process-global state.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the paginated directory API. Must end with a slash so year
    /// segments can be joined onto it.
    pub api_root: Url,
    /// School years to fetch, in the order their fetches are merged.
    pub years: Vec<u32>,
    /// Two-letter state filter passed as the `state` query parameter.
    pub state: String,
    /// Destination CSV path. Overwritten on every run.
    pub output: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_root: Url::parse("https://educationdata.urban.org/api/v1/schools/ccd/directory/")
                .expect("default API root should be a valid URL"),
            years: vec![2018, 2019, 2020],
            state: "CA".to_string(),
            output: PathBuf::from("school_data_wide_format.csv"),
        }
    }
}
