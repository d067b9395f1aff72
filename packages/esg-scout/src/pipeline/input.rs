//! User input normalization: company name or URL to a root URL.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, ScoutError};
use crate::search::DomainResolver;

/// A root URL to crawl, plus the company name when the user gave one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedInput {
    pub url: String,

    /// Set only when the input was a bare company name; drives external search
    pub company_hint: Option<String>,
}

fn is_full_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Turn user input into a crawlable URL.
///
/// - `http(s)://...` passes through unchanged
/// - anything containing a dot gets `https://` prepended
/// - anything else is a company name: resolved through `resolver`, falling
///   back to `https://<name>.com`
pub async fn normalize_input(raw: &str, resolver: &DomainResolver) -> Result<NormalizedInput> {
    let input = raw.trim();
    if input.is_empty() {
        return Err(ScoutError::InvalidInput {
            reason: "expected a company name or URL".to_string(),
        });
    }

    if is_full_url(input) {
        return Ok(NormalizedInput {
            url: input.to_string(),
            company_hint: None,
        });
    }

    if input.contains('.') {
        return Ok(NormalizedInput {
            url: format!("https://{input}"),
            company_hint: None,
        });
    }

    info!(company = %input, "Looking up official domain");
    let url = match resolver.lookup_domain(input).await {
        Some(site) => site,
        None => {
            let guess = format!("https://{input}.com");
            info!(company = %input, url = %guess, "Domain not found, using .com guess");
            guess
        }
    };

    Ok(NormalizedInput {
        url,
        company_hint: Some(input.to_string()),
    })
}
