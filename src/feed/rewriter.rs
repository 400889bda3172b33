//! Link and enclosure rewriting.
//!
//! Two independent passes over the raw text:
//! 1. `<link ...>URL</link>` element content
//! 2. the first `url="..."` / `url='...'` attribute of each `<enclosure ...>`
//!
//! Only values starting with `http://` or `https://` are touched. Shapes the
//! patterns do not recognize (self-closing `<link/>`, CDATA content) are left
//! as they are. A second pass over rewritten output proxies the URLs again.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::{Captures, Regex};

/// Characters left unescaped, matching JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

static LINK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<link(\s[^>]*)?>([^<]*)</link>").unwrap());

static ENCLOSURE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(<enclosure\s(?:[^>]*?\s)?url=)(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// Public base URL of this proxy with one trailing `/` removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyBase(String);

impl ProxyBase {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        if base.ends_with('/') {
            base.pop();
        }
        Self(base)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProxyBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// `{base}/proxy?url={encoded}` for an absolute URL.
pub fn proxied_url(base: &ProxyBase, url: &str) -> String {
    format!("{}/proxy?url={}", base, utf8_percent_encode(url, URI_COMPONENT))
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Rewrite every absolute link and enclosure URL in `document`.
pub fn rewrite_links(document: &str, base: &ProxyBase) -> String {
    let links = rewrite_link_elements(document, base);
    rewrite_enclosures(&links, base).into_owned()
}

fn rewrite_link_elements<'a>(document: &'a str, base: &ProxyBase) -> Cow<'a, str> {
    LINK_REGEX.replace_all(document, |caps: &Captures| {
        let whole = &caps[0];
        let text = &caps[2];
        let url = text.trim();
        if !is_absolute(url) {
            return whole.to_string();
        }

        // Whitespace around the URL stays where it was.
        let lead = &text[..text.len() - text.trim_start().len()];
        let trail = &text[text.trim_end().len()..];
        format!(
            "<link{}>{}{}{}</link>",
            caps.get(1).map_or("", |m| m.as_str()),
            lead,
            proxied_url(base, url),
            trail
        )
    })
}

fn rewrite_enclosures<'a>(document: &'a str, base: &ProxyBase) -> Cow<'a, str> {
    ENCLOSURE_REGEX.replace_all(document, |caps: &Captures| {
        let prefix = &caps[1];
        let (quote, url) = match (caps.get(2), caps.get(3)) {
            (Some(m), _) => ('"', m.as_str()),
            (None, Some(m)) => ('\'', m.as_str()),
            (None, None) => return caps[0].to_string(),
        };

        if !is_absolute(url) {
            return caps[0].to_string();
        }

        format!("{prefix}{quote}{}{quote}", proxied_url(base, url))
    })
}
