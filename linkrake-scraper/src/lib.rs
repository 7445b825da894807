pub mod error;
pub mod extract;
pub mod fetch;
pub mod scrape;

pub use error::ScrapeError;
pub use extract::{DEFAULT_SELECTORS, SelectorSet};
pub use fetch::{FetchOutcome, HttpGetter, dispatch};
pub use scrape::{LinkScraper, scrape_urls};
