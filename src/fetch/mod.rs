pub mod pages;

pub use pages::{fetch_year, first_page_url, HttpSource, Page, PageSource, SchoolRecord};
