//! End-to-end runs against a scripted page source: extract, reshape, and
//! the written CSV checked byte-for-byte.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use tempfile::tempdir;
use url::Url;

use edscraper::config::Config;
use edscraper::fetch::{Page, PageSource, SchoolRecord};

/// Serves each scripted URL exactly once; unknown URLs fail like a dead
/// server would.
struct ScriptedSource {
    pages: Mutex<HashMap<String, Page>>,
}

impl ScriptedSource {
    fn new(pages: impl IntoIterator<Item = (&'static str, Page)>) -> Self {
        Self {
            pages: Mutex::new(
                pages
                    .into_iter()
                    .map(|(url, page)| (url.to_string(), page))
                    .collect(),
            ),
        }
    }
}

impl PageSource for ScriptedSource {
    async fn fetch_page(&self, url: &Url) -> Result<Page> {
        self.pages
            .lock()
            .unwrap()
            .remove(url.as_str())
            .ok_or_else(|| anyhow!("no scripted response for {url}"))
    }
}

fn config(years: &[u32], output: PathBuf) -> Config {
    Config {
        api_root: Url::parse("http://api.test/schools/").unwrap(),
        years: years.to_vec(),
        state: "CA".to_string(),
        output,
    }
}

fn record(id: &str, name: &str, year: u32, enrollment: i64, teachers_fte: f64) -> SchoolRecord {
    SchoolRecord {
        school_id: id.to_string(),
        school_name: name.to_string(),
        year,
        enrollment: Some(enrollment),
        teachers_fte: Some(teachers_fte),
    }
}

fn page(results: Vec<SchoolRecord>, next: Option<&str>) -> Page {
    Page {
        results,
        next: next.map(str::to_string),
    }
}

#[tokio::test]
async fn two_years_one_school() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("schools.csv");
    let source = ScriptedSource::new([
        (
            "http://api.test/schools/2018/?state=CA",
            page(vec![record("1", "A", 2018, 100, 5.5)], None),
        ),
        (
            "http://api.test/schools/2019/?state=CA",
            page(vec![record("1", "A", 2019, 110, 6.2)], None),
        ),
    ]);

    edscraper::run(&source, &config(&[2018, 2019], out.clone()))
        .await
        .unwrap();

    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "school_id,school_name,students_2018,students_2019,teachers_2018,teachers_2019\n\
         1,A,100,110,5,6\n"
    );
}

#[tokio::test]
async fn failed_year_leaves_no_trace_in_columns() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("schools.csv");
    // 2018 has no scripted response at all: its first page fetch fails
    let source = ScriptedSource::new([(
        "http://api.test/schools/2019/?state=CA",
        page(vec![record("1", "A", 2019, 110, 6.2)], None),
    )]);

    edscraper::run(&source, &config(&[2018, 2019], out.clone()))
        .await
        .unwrap();

    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "school_id,school_name,students_2019,teachers_2019\n1,A,110,6\n"
    );
}

#[tokio::test]
async fn paginated_year_and_partial_school_coverage() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("schools.csv");
    // 2018 spans two pages; school 2 never shows up in 2019
    let source = ScriptedSource::new([
        (
            "http://api.test/schools/2018/?state=CA",
            page(
                vec![record("1", "A", 2018, 100, 5.0)],
                Some("http://api.test/schools/2018/?state=CA&page=2"),
            ),
        ),
        (
            "http://api.test/schools/2018/?state=CA&page=2",
            page(vec![record("2", "B", 2018, 50, 3.0)], None),
        ),
        (
            "http://api.test/schools/2019/?state=CA",
            page(vec![record("1", "A", 2019, 110, 6.0)], None),
        ),
    ]);

    edscraper::run(&source, &config(&[2018, 2019], out.clone()))
        .await
        .unwrap();

    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "school_id,school_name,students_2018,students_2019,teachers_2018,teachers_2019\n\
         1,A,100,110,5,6\n\
         2,B,50,0,3,0\n"
    );
}

#[tokio::test]
async fn all_years_failing_still_writes_header_only_file() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("schools.csv");
    let no_pages: [(&'static str, Page); 0] = [];
    let source = ScriptedSource::new(no_pages);

    edscraper::run(&source, &config(&[2018, 2019], out.clone()))
        .await
        .unwrap();

    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "school_id,school_name\n"
    );
}
