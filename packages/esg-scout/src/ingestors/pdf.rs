//! PDF download and text extraction.
//!
//! PDFs are fetched concurrently (bounded) and decoded on the blocking pool.
//! Output is index-aligned with the input URLs; a URL that fails for any
//! reason contributes an empty string at its index.

use futures::stream::{self, StreamExt};
use pdf_extract::{Document, PlainTextOutput};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::PageFetcher;

/// Decodes raw PDF bytes into per-page text.
pub type PdfDecoder = fn(&[u8]) -> std::result::Result<Vec<String>, String>;

/// Default decoder backed by `pdf-extract`.
///
/// Pages are decoded one at a time. A page that errors or panics inside
/// the decoder yields an empty string and the remaining pages still run.
/// Only an unloadable document is an error.
pub fn decode_pdf_pages(bytes: &[u8]) -> std::result::Result<Vec<String>, String> {
    let mut doc = Document::load_mem(bytes).map_err(|e| e.to_string())?;
    if doc.is_encrypted() {
        // owner-password-only PDFs open with an empty user password
        doc.decrypt("").map_err(|e| e.to_string())?;
    }

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    let pages = page_numbers
        .into_iter()
        .map(|page_num| decode_page(&doc, page_num).unwrap_or_default())
        .collect();

    Ok(pages)
}

fn decode_page(doc: &Document, page_num: u32) -> Option<String> {
    let mut text = String::new();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut output = PlainTextOutput::new(&mut text);
        pdf_extract::output_doc_page(doc, &mut output, page_num)
    }));

    match outcome {
        Ok(Ok(())) => Some(text),
        Ok(Err(e)) => {
            debug!(page = page_num, error = %e, "PDF page skipped");
            None
        }
        Err(_) => {
            debug!(page = page_num, "PDF page skipped after decoder panic");
            None
        }
    }
}

/// Downloads PDFs and extracts their text.
#[derive(Clone)]
pub struct PdfExtractor {
    fetcher: Arc<dyn PageFetcher>,
    timeout: Duration,
    decoder: PdfDecoder,
}

impl PdfExtractor {
    /// Create an extractor with the default 40 second download timeout.
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            timeout: Duration::from_secs(40),
            decoder: decode_pdf_pages,
        }
    }

    /// Set the per-download timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the byte decoder.
    pub fn with_decoder(mut self, decoder: PdfDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    /// Extract text from every URL, at most `max_workers` at a time.
    ///
    /// The returned vector has the same length and order as `urls`.
    pub async fn extract_pdf_texts(&self, urls: &[String], max_workers: usize) -> Vec<String> {
        if urls.is_empty() {
            return Vec::new();
        }

        info!(count = urls.len(), max_workers, "Extracting PDF texts");

        let texts: Vec<String> = stream::iter(urls.iter().map(|url| async move {
            match self.extract_single(url).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(url = %url, error = %e, "PDF contributes no text");
                    String::new()
                }
            }
        }))
        .buffered(max_workers.max(1))
        .collect()
        .await;

        let extracted = texts.iter().filter(|t| !t.is_empty()).count();
        info!(
            requested = urls.len(),
            extracted,
            total_chars = texts.iter().map(|t| t.chars().count()).sum::<usize>(),
            "PDF extraction complete"
        );

        texts
    }

    /// Download and decode one PDF, keeping every page that has text.
    pub async fn extract_single(&self, url: &str) -> FetchResult<String> {
        let bytes = self.fetcher.fetch_bytes(url, self.timeout).await?;

        let decoder = self.decoder;
        let pages = tokio::task::spawn_blocking(move || decoder(&bytes))
            .await
            .map_err(|e| FetchError::Pdf {
                url: url.to_string(),
                reason: e.to_string(),
            })?
            .map_err(|reason| FetchError::Pdf {
                url: url.to_string(),
                reason,
            })?;

        let total_pages = pages.len();
        let kept: Vec<String> = pages
            .into_iter()
            .filter(|page| !page.trim().is_empty())
            .collect();
        debug!(url = %url, total_pages, text_pages = kept.len(), "PDF decoded");

        Ok(kept.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockFetcher;

    /// Treats bytes as UTF-8 with form feeds between pages.
    fn plain_text_decoder(bytes: &[u8]) -> std::result::Result<Vec<String>, String> {
        let text = std::str::from_utf8(bytes).map_err(|e| e.to_string())?;
        if text.starts_with("CORRUPT") {
            return Err("corrupt xref table".to_string());
        }
        Ok(text.split('\u{c}').map(str::to_string).collect())
    }

    fn extractor(fetcher: MockFetcher) -> PdfExtractor {
        PdfExtractor::new(Arc::new(fetcher)).with_decoder(plain_text_decoder)
    }

    #[tokio::test]
    async fn test_failed_url_leaves_empty_slot() {
        let fetcher = MockFetcher::new()
            .with_bytes("https://acme.com/a.pdf", b"text A".to_vec())
            .with_failure("https://acme.com/b.pdf", 404)
            .with_bytes("https://acme.com/c.pdf", b"text C".to_vec());

        let urls = vec![
            "https://acme.com/a.pdf".to_string(),
            "https://acme.com/b.pdf".to_string(),
            "https://acme.com/c.pdf".to_string(),
        ];

        let texts = extractor(fetcher).extract_pdf_texts(&urls, 5).await;
        assert_eq!(texts, vec!["text A", "", "text C"]);
    }

    #[tokio::test]
    async fn test_order_preserved_when_first_is_slowest() {
        let fetcher = MockFetcher::new()
            .with_bytes("https://acme.com/slow.pdf", b"slow".to_vec())
            .with_delay("https://acme.com/slow.pdf", Duration::from_millis(50))
            .with_bytes("https://acme.com/fast.pdf", b"fast".to_vec());

        let urls = vec![
            "https://acme.com/slow.pdf".to_string(),
            "https://acme.com/fast.pdf".to_string(),
        ];

        let texts = extractor(fetcher).extract_pdf_texts(&urls, 2).await;
        assert_eq!(texts, vec!["slow", "fast"]);
    }

    #[tokio::test]
    async fn test_blank_pages_skipped_and_corrupt_file_empty() {
        let fetcher = MockFetcher::new()
            .with_bytes("https://acme.com/pages.pdf", b"page one\x0c   \x0cpage three".to_vec())
            .with_bytes("https://acme.com/corrupt.pdf", b"CORRUPT".to_vec());

        let urls = vec![
            "https://acme.com/pages.pdf".to_string(),
            "https://acme.com/corrupt.pdf".to_string(),
        ];

        let texts = extractor(fetcher).extract_pdf_texts(&urls, 1).await;
        assert_eq!(texts, vec!["page one\npage three", ""]);
    }

    #[tokio::test]
    async fn test_default_decoder_rejects_garbage() {
        let fetcher = MockFetcher::new()
            .with_bytes("https://acme.com/junk.pdf", b"definitely not a pdf".to_vec());
        let extractor = PdfExtractor::new(Arc::new(fetcher));

        let err = extractor
            .extract_single("https://acme.com/junk.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Pdf { .. }));
    }

    #[tokio::test]
    async fn test_download_failure_is_fetch_error() {
        let fetcher = MockFetcher::new().with_timeout("https://acme.com/slow.pdf");
        let err = extractor(fetcher)
            .extract_single("https://acme.com/slow.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Timeout { .. }));
    }

    /// Builds a PDF with one Helvetica text line per page. `None` makes a
    /// page with no MediaBox anywhere in its tree.
    fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
        use pdf_extract::{Dictionary, Object, Stream};

        let name = |n: &str| Object::Name(n.as_bytes().to_vec());
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut font = Dictionary::new();
        font.set("Type", name("Font"));
        font.set("Subtype", name("Type1"));
        font.set("BaseFont", name("Helvetica"));
        let font_id = doc.add_object(font);

        let mut fonts = Dictionary::new();
        fonts.set("F1", font_id);
        let mut resources = Dictionary::new();
        resources.set("Font", fonts);
        let resources_id = doc.add_object(resources);

        let mut kids = Vec::new();
        for text in pages {
            let content = match text {
                Some(text) => format!("BT /F1 12 Tf 72 712 Td ({text}) Tj ET"),
                None => "BT /F1 12 Tf 72 712 Td (BROKEN) Tj ET".to_string(),
            };
            let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

            let mut page = Dictionary::new();
            page.set("Type", name("Page"));
            page.set("Parent", pages_id);
            page.set("Contents", content_id);
            page.set("Resources", resources_id);
            if text.is_some() {
                let media_box: Vec<Object> = [0, 0, 612, 792].map(Object::Integer).to_vec();
                page.set("MediaBox", media_box);
            }
            kids.push(Object::from(doc.add_object(page)));
        }

        let mut page_tree = Dictionary::new();
        page_tree.set("Type", name("Pages"));
        page_tree.set("Count", kids.len() as i64);
        page_tree.set("Kids", kids);
        doc.objects.insert(pages_id, Object::Dictionary(page_tree));

        let mut catalog = Dictionary::new();
        catalog.set("Type", name("Catalog"));
        catalog.set("Pages", pages_id);
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_broken_page_does_not_drop_the_rest() {
        let bytes = build_pdf(&[Some("PAGEONE"), None, Some("PAGETHREE")]);

        let pages = decode_pdf_pages(&bytes).unwrap();

        assert_eq!(pages.len(), 3);
        assert!(pages[0].contains("PAGEONE"));
        assert!(pages[1].trim().is_empty());
        assert!(pages[2].contains("PAGETHREE"));
    }

    #[tokio::test]
    async fn test_default_decoder_keeps_readable_pages() {
        let fetcher = MockFetcher::new().with_bytes(
            "https://acme.com/esg-2023.pdf",
            build_pdf(&[Some("PAGEONE"), None, Some("PAGETHREE")]),
        );
        let extractor = PdfExtractor::new(Arc::new(fetcher));

        let text = extractor
            .extract_single("https://acme.com/esg-2023.pdf")
            .await
            .unwrap();

        assert!(text.contains("PAGEONE"));
        assert!(text.contains("PAGETHREE"));
        assert!(!text.contains("BROKEN"));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let texts = extractor(MockFetcher::new()).extract_pdf_texts(&[], 5).await;
        assert!(texts.is_empty());
    }
}
