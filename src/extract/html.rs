// src/extract/html.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Rust concepts:
// - LazyLock: build a value once, on first use, shared by every thread
// - Iterators: filter_map + collect instead of a manual loop
// =============================================================================

use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::LinkExtractor;
use crate::fetch::Page;

// Every <a> with an href inside the document body
//
// The selector is a constant and known to be valid, so failing to parse it
// is a programmer error, not something a page can trigger.
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body a[href]").expect("anchor selector is valid CSS"));

#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlLinkExtractor;

impl HtmlLinkExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    fn extract(&self, page: &Page) -> Vec<String> {
        // html5ever never fails: broken markup is repaired the way a
        // browser would repair it
        let document = Html::parse_document(&page.html);

        document
            .select(&ANCHOR_SELECTOR)
            .filter_map(|element| element.value().attr("href"))
            .map(str::to_string)
            .collect()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why doesn't this resolve URLs like a browser would?
//    - Resolution needs the crawl's base URL and its error reporting
//    - Keeping it in the engine means one place decides what "malformed" is
//
// 2. What does "body a[href]" mean?
//    - "all <a> tags that have an href attribute, somewhere under <body>"
//    - <a> without href (named anchors) are skipped
//
// 3. Why is duplication allowed?
//    - A page may link to the same place five times
//    - The shared visited set filters repeats, so the extractor doesn't have to
// -----------------------------------------------------------------------------
