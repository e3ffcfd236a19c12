// src/crawl/scope.rs
// =============================================================================
// This module decides what a raw href points at, and whether we care.
//
// Two steps, both pure functions of (seed, href):
// 1. resolve(): turn a possibly-relative href into an absolute URL
// 2. HostScope::contains(): is that URL on the seed's host?
//
// Hosts are compared exactly. Substring checks over-match: a seed of
// "example.test" must not admit "evil-example.test" or a mailto address
// that happens to mention it.
// =============================================================================

use thiserror::Error;
use url::Url;

/// Why an href could not be turned into an absolute URL.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("malformed link '{raw}': {source}")]
    Malformed {
        raw: String,
        #[source]
        source: url::ParseError,
    },

    #[error("malformed link '{raw}': invalid control character")]
    ControlCharacter { raw: String },

    // "foo: bar" has no valid scheme, so it's a relative path whose first
    // segment contains a colon. That is ambiguous and rejected.
    #[error("malformed link '{raw}': first path segment cannot contain a colon")]
    ColonInFirstSegment { raw: String },
}

impl ResolveError {
    /// The href as it appeared on the page.
    pub fn raw(&self) -> &str {
        match self {
            ResolveError::Malformed { raw, .. }
            | ResolveError::ControlCharacter { raw }
            | ResolveError::ColonInFirstSegment { raw } => raw,
        }
    }
}

/// Resolves `raw` against `base` and normalizes the result.
///
/// The fragment is dropped: `/a#intro` and `/a` are the same document and
/// must share one visited entry.
pub fn resolve(base: &Url, raw: &str) -> Result<Url, ResolveError> {
    // Browsers ignore surrounding whitespace in href values
    let href = raw.trim_matches(|c: char| c.is_ascii_whitespace());

    if href.chars().any(|c| c.is_ascii_control()) {
        return Err(ResolveError::ControlCharacter {
            raw: raw.to_string(),
        });
    }

    if !has_scheme(href) && first_segment(href).contains(':') {
        return Err(ResolveError::ColonInFirstSegment {
            raw: raw.to_string(),
        });
    }

    let mut absolute = base.join(href).map_err(|source| ResolveError::Malformed {
        raw: raw.to_string(),
        source,
    })?;
    absolute.set_fragment(None);

    Ok(absolute)
}

// RFC 3986: scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"
fn has_scheme(href: &str) -> bool {
    let Some((scheme, _)) = href.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

fn first_segment(href: &str) -> &str {
    let end = href.find(['/', '?', '#']).unwrap_or(href.len());
    &href[..end]
}

// The set of hosts a crawl is allowed to record and fetch
#[derive(Debug, Clone)]
pub struct HostScope {
    host: String,
    // Only enforced when the seed spelled a port out
    port: Option<u16>,
    allow_subdomains: bool,
}

impl HostScope {
    pub fn new(seed: &Url, allow_subdomains: bool) -> Self {
        Self {
            host: seed.host_str().unwrap_or_default().to_ascii_lowercase(),
            port: seed.port(),
            allow_subdomains,
        }
    }

    /// True when `url` is an http(s) URL on the seed's host.
    pub fn contains(&self, url: &Url) -> bool {
        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }

        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();

        let host_matches = host == self.host
            || (self.allow_subdomains
                && host
                    .strip_suffix(self.host.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.')));

        let port_matches = match self.port {
            Some(port) => url.port_or_known_default() == Some(port),
            None => true,
        };

        host_matches && port_matches
    }
}
