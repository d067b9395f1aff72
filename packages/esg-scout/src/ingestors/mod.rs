//! Content retrieval: HTTP fetching, HTML normalization, PDF text.
//!
//! # Example
//!
//! ```rust,ignore
//! use esg_scout::ingestors::{html_to_text, HttpFetcher};
//!
//! let fetcher = HttpFetcher::new()?;
//! let html = fetcher.fetch_html("https://acme.com/esg", Duration::from_secs(15)).await?;
//! let text = html_to_text(&html);
//! ```

mod html;
mod http;
mod pdf;

pub use html::{extract_anchors, html_to_text, Anchor};
pub use http::HttpFetcher;
pub use pdf::{decode_pdf_pages, PdfDecoder, PdfExtractor};
