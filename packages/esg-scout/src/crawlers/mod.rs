//! On-site discovery.
//!
//! [`SiteCrawler::crawl`] runs one bounded pass;
//! [`SiteCrawler::crawl_with_fallback`] runs the focused pass and, when it
//! finds too little, a broad one.

mod fallback;
mod site;

pub use site::{
    is_esg_pdf, is_pdf_link, is_same_domain, looks_relevant, root_domain, SiteCrawler,
    CRAWL_KEYWORDS,
};
