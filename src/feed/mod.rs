//! Feed rewriting subsystem.
//!
//! Rewrites absolute URLs inside syndication documents so that they point
//! back through this proxy. Matching is textual: everything outside the
//! rewritten URL values is preserved byte-for-byte.

pub mod rewriter;

pub use rewriter::{proxied_url, rewrite_links, ProxyBase};
