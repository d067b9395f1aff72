//! Off-site discovery: ESG source search and the domain resolver.

mod domain;
mod esg;
mod serper;

pub use domain::{unwrap_redirect, DomainResolver};
pub use esg::{
    is_pdf, looks_esg, snippet_text, EsgSourceSearch, HTML_QUERY_TEMPLATES, PDF_QUERY_TEMPLATES,
    SEARCH_KEYWORDS, SNIPPET_QUERY_TEMPLATES,
};
pub use serper::SerperSearcher;
