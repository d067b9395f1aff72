//! Source aggregation: merge, prioritize, chunk.
//!
//! Corpus groups, highest priority first:
//!
//! 1. PDF text (on-site and external PDFs, deduplicated)
//! 2. External ESG HTML pages
//! 3. Search snippets
//! 4. On-site crawled pages
//!
//! Groups are joined internally and with each other by a blank line.

use futures::stream::{self, StreamExt};
use indexmap::IndexSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{Result, ScoutError};
use crate::ingestors::{html_to_text, PdfExtractor};
use crate::traits::fetcher::PageFetcher;
use crate::types::{
    config::AggregatorConfig,
    page::{CrawlOutcome, PageRecord},
    sources::ExternalSources,
};

const BLOCK_SEPARATOR: &str = "\n\n";

/// Remove duplicates, keeping the first occurrence of each item.
pub fn dedupe<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    items.into_iter().collect::<IndexSet<_>>().into_iter().collect()
}

/// Join crawled pages into one block, each tagged with its URL.
///
/// Pages whose text is blank are left out.
pub fn combine_pages_text(pages: &[PageRecord]) -> String {
    pages
        .iter()
        .filter(|page| page.has_content())
        .map(|page| format!("[URL: {}]\n{}\n", page.url, page.text.trim()))
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

/// Concatenate the four source groups in priority order.
///
/// Empty entries inside a group and empty groups are skipped; the result is
/// trimmed.
pub fn combine_text_sources(
    pdf_texts: &[String],
    external_html_texts: &[String],
    snippets: &[String],
    on_site_text: &str,
) -> String {
    let join_group = |texts: &[String]| {
        texts
            .iter()
            .filter(|t| !t.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(BLOCK_SEPARATOR)
    };

    [
        join_group(pdf_texts),
        join_group(external_html_texts),
        join_group(snippets),
        on_site_text.to_string(),
    ]
    .into_iter()
    .filter(|group| !group.is_empty())
    .collect::<Vec<_>>()
    .join(BLOCK_SEPARATOR)
    .trim()
    .to_string()
}

/// Split text into windows of `chunk_size` characters, each starting
/// `chunk_size - overlap` characters after the previous one.
///
/// The last chunk may be shorter. Text no longer than `chunk_size` is one
/// chunk; empty text is no chunks.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<String>> {
    if chunk_size == 0 {
        return Err(ScoutError::invalid_config("chunk_size must be at least 1"));
    }
    if overlap >= chunk_size {
        return Err(ScoutError::invalid_config(format!(
            "overlap ({overlap}) must be smaller than chunk_size ({chunk_size})"
        )));
    }

    let chars: Vec<char> = text.chars().collect();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start = end - overlap;
    }

    Ok(chunks)
}

/// Re-join chunks for the signal extractor, within a character budget.
///
/// Each chunk is appended with a blank-line prefix; appending stops at the
/// first chunk that would push the running length past `max_chars`.
pub fn join_chunks_for_extraction(chunks: &[String], max_chars: usize) -> String {
    let mut combined = String::new();
    let mut combined_chars = 0usize;

    for chunk in chunks {
        let chunk_chars = chunk.chars().count();
        if combined_chars + chunk_chars > max_chars {
            break;
        }
        combined.push_str(BLOCK_SEPARATOR);
        combined.push_str(chunk);
        combined_chars += BLOCK_SEPARATOR.len() + chunk_chars;
    }

    combined
}

/// Fetches external HTML and PDFs and builds the corpus.
#[derive(Clone)]
pub struct SourceAggregator {
    fetcher: Arc<dyn PageFetcher>,
    pdf: PdfExtractor,
    config: AggregatorConfig,
    html_timeout: Duration,
}

impl SourceAggregator {
    /// Create an aggregator with default settings.
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            pdf: PdfExtractor::new(fetcher.clone()),
            fetcher,
            config: AggregatorConfig::default(),
            html_timeout: Duration::from_secs(15),
        }
    }

    /// Replace the aggregator settings.
    pub fn with_config(mut self, config: AggregatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the PDF extractor.
    pub fn with_pdf_extractor(mut self, pdf: PdfExtractor) -> Self {
        self.pdf = pdf;
        self
    }

    /// Set the timeout for external HTML pages.
    pub fn with_html_timeout(mut self, timeout: Duration) -> Self {
        self.html_timeout = timeout;
        self
    }

    /// Fetch and normalize external pages, at most `max_workers` at a time.
    ///
    /// Output follows input order; failed or empty pages are dropped.
    pub async fn fetch_external_html_texts(&self, urls: &[String]) -> Vec<String> {
        if urls.is_empty() {
            return Vec::new();
        }

        info!(count = urls.len(), "Fetching external ESG HTML pages");

        let texts: Vec<String> = stream::iter(urls.iter().map(|url| async move {
            match self.fetcher.fetch_html(url, self.html_timeout).await {
                Ok(html) => html_to_text(&html).trim().to_string(),
                Err(e) => {
                    warn!(url = %url, error = %e, "External page fetch failed");
                    String::new()
                }
            }
        }))
        .buffered(self.config.max_workers.max(1))
        .filter(|text| std::future::ready(!text.is_empty()))
        .collect()
        .await;

        info!(
            fetched = texts.len(),
            total_chars = texts.iter().map(|t| t.chars().count()).sum::<usize>(),
            "External HTML text collected"
        );

        texts
    }

    /// Gather every source into one prioritized corpus.
    pub async fn build_corpus(&self, crawl: &CrawlOutcome, external: &ExternalSources) -> String {
        let all_pdf_urls = dedupe(
            crawl
                .pdf_urls
                .iter()
                .chain(external.pdf_urls.iter())
                .cloned(),
        );

        let on_site_text = combine_pages_text(&crawl.records());
        debug!(chars = on_site_text.chars().count(), "On-site text combined");

        let (pdf_texts, external_html_texts) = tokio::join!(
            self.pdf
                .extract_pdf_texts(&all_pdf_urls, self.config.max_workers),
            self.fetch_external_html_texts(&external.html_urls),
        );

        let corpus = combine_text_sources(
            &pdf_texts,
            &external_html_texts,
            &external.snippets,
            &on_site_text,
        );

        info!(
            pdfs = all_pdf_urls.len(),
            external_pages = external_html_texts.len(),
            snippets = external.snippets.len(),
            corpus_chars = corpus.chars().count(),
            "Corpus assembled"
        );

        corpus
    }

    /// Chunk the corpus and re-join it within the extraction budget.
    pub fn extraction_input(&self, corpus: &str) -> Result<String> {
        let chunks = chunk_text(corpus, self.config.chunk_size, self.config.overlap)?;
        let input = join_chunks_for_extraction(&chunks, self.config.max_extraction_chars);
        debug!(
            chunks = chunks.len(),
            input_chars = input.chars().count(),
            "Extraction input prepared"
        );
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockFetcher;
    use proptest::prelude::*;

    #[test]
    fn test_dedupe_preserves_first_occurrence() {
        let items = ["a", "b", "a", "c"].map(String::from);
        assert_eq!(dedupe(items), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_combine_pages_text() {
        let pages = [
            PageRecord::new("https://acme.com", "  Home \n"),
            PageRecord::new("https://acme.com/blank", "   "),
            PageRecord::new("https://acme.com/esg", "Net zero"),
        ];

        assert_eq!(
            combine_pages_text(&pages),
            "[URL: https://acme.com]\nHome\n\n\n[URL: https://acme.com/esg]\nNet zero\n"
        );
    }

    #[test]
    fn test_combine_text_sources_priority_order() {
        let corpus = combine_text_sources(
            &["pdf one".into(), "".into(), "pdf two".into()],
            &["external page".into()],
            &[],
            "[URL: https://acme.com]\nhome\n",
        );

        assert_eq!(
            corpus,
            "pdf one\n\npdf two\n\nexternal page\n\n[URL: https://acme.com]\nhome"
        );
    }

    #[test]
    fn test_combine_text_sources_all_empty() {
        assert_eq!(combine_text_sources(&["".into()], &[], &[], ""), "");
    }

    #[test]
    fn test_chunk_text_defaults() {
        let text = "x".repeat(4500);
        let chunks = chunk_text(&text, 2000, 200).unwrap();
        let lens: Vec<usize> = chunks.iter().map(String::len).collect();
        assert_eq!(lens, vec![2000, 2000, 900]);
    }

    #[test]
    fn test_chunk_text_short_and_empty() {
        assert_eq!(chunk_text("short", 2000, 200).unwrap(), vec!["short"]);
        assert!(chunk_text("", 2000, 200).unwrap().is_empty());
    }

    #[test]
    fn test_chunk_text_counts_characters_not_bytes() {
        let chunks = chunk_text("ééééé", 3, 1).unwrap();
        assert_eq!(chunks, vec!["ééé", "ééé"]);
    }

    #[test]
    fn test_chunk_text_rejects_bad_config() {
        assert!(matches!(
            chunk_text("abc", 10, 10),
            Err(ScoutError::InvalidConfig { .. })
        ));
        assert!(matches!(
            chunk_text("abc", 0, 0),
            Err(ScoutError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_join_chunks_for_extraction_budget() {
        let chunks = vec!["a".repeat(10), "b".repeat(10), "c".repeat(10)];

        assert_eq!(
            join_chunks_for_extraction(&chunks, 25),
            format!("\n\n{}\n\n{}", "a".repeat(10), "b".repeat(10))
        );
        assert_eq!(join_chunks_for_extraction(&chunks, 5), "");
    }

    #[tokio::test]
    async fn test_external_html_drops_failures_and_keeps_order() {
        let fetcher = MockFetcher::new()
            .with_html("https://news.test/a", "<p>Alpha</p>")
            .with_delay("https://news.test/a", Duration::from_millis(30))
            .with_failure("https://news.test/b", 403)
            .with_html("https://news.test/c", "<p>Gamma</p>")
            .with_html("https://news.test/d", "<script>x()</script>");

        let aggregator = SourceAggregator::new(Arc::new(fetcher));
        let urls = ["a", "b", "c", "d"].map(|p| format!("https://news.test/{p}"));

        let texts = aggregator.fetch_external_html_texts(&urls).await;
        assert_eq!(texts, vec!["Alpha", "Gamma"]);
    }

    #[tokio::test]
    async fn test_build_corpus_order_and_pdf_dedupe() {
        fn decoder(bytes: &[u8]) -> std::result::Result<Vec<String>, String> {
            Ok(vec![String::from_utf8_lossy(bytes).into_owned()])
        }

        let fetcher = Arc::new(
            MockFetcher::new()
                .with_bytes("https://acme.com/esg.pdf", b"PDF TEXT".to_vec())
                .with_html("https://news.test/acme", "<p>EXTERNAL</p>"),
        );
        let aggregator = SourceAggregator::new(fetcher.clone())
            .with_pdf_extractor(PdfExtractor::new(fetcher.clone()).with_decoder(decoder));

        let mut crawl = CrawlOutcome::new();
        crawl
            .pages
            .insert("https://acme.com".into(), "ON SITE".into());
        crawl.pdf_urls.insert("https://acme.com/esg.pdf".into());

        let external = ExternalSources {
            pdf_urls: vec!["https://acme.com/esg.pdf".into()],
            html_urls: vec!["https://news.test/acme".into()],
            snippets: vec!["SNIPPET".into()],
        };

        let corpus = aggregator.build_corpus(&crawl, &external).await;

        assert_eq!(
            corpus,
            "PDF TEXT\n\nEXTERNAL\n\nSNIPPET\n\n[URL: https://acme.com]\nON SITE"
        );
        assert_eq!(fetcher.call_count("https://acme.com/esg.pdf"), 1);
    }

    fn size_and_overlap() -> impl Strategy<Value = (usize, usize)> {
        (1usize..64).prop_flat_map(|size| (Just(size), 0..size))
    }

    proptest! {
        #[test]
        fn prop_chunks_reconstruct_text(
            text in "\\PC{0,400}",
            (size, overlap) in size_and_overlap(),
        ) {
            let chunks = chunk_text(&text, size, overlap).unwrap();
            let step = size - overlap;

            let mut rebuilt = String::new();
            for (i, chunk) in chunks.iter().enumerate() {
                prop_assert!(chunk.chars().count() <= size);
                if i + 1 == chunks.len() {
                    rebuilt.push_str(chunk);
                } else {
                    rebuilt.extend(chunk.chars().take(step));
                }
            }
            prop_assert_eq!(rebuilt, text);
        }

        #[test]
        fn prop_dedupe_keeps_first_seen_order(items in prop::collection::vec("[a-e]", 0..30)) {
            let unique = dedupe(items.clone());

            let mut seen = std::collections::HashSet::new();
            let expected: Vec<String> = items
                .into_iter()
                .filter(|item| seen.insert(item.clone()))
                .collect();
            prop_assert_eq!(unique, expected);
        }
    }
}
