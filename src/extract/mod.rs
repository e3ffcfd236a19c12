// src/extract/mod.rs
// =============================================================================
// This module pulls raw link targets out of fetched pages.
//
// The extractor is deliberately dumb: it reports every anchor href exactly
// as written (relative, absolute, "#top", "mailto:...", even garbage). The
// crawl engine decides what to resolve, keep, or skip.
// =============================================================================

mod html;

pub use html::HtmlLinkExtractor;

use crate::fetch::Page;

/// Yields the href values of all anchor elements in a page, in document order.
pub trait LinkExtractor: Send + Sync {
    fn extract(&self, page: &Page) -> Vec<String>;
}
