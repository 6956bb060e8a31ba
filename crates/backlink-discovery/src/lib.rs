//! Webmention endpoint discovery parsers.
//!
//! Pure synchronous functions over header values and HTML documents; no
//! HTTP dependencies. The resolver in `backlink-protocol` does the fetching
//! and feeds the results through here.
//!
//! # Quick start
//!
//! ```
//! use backlink_discovery::{Candidate, find_in_html, find_in_link_headers};
//!
//! let header = "</relative/error>; rel=\"other\", </webmention>; rel=\"webmention\"";
//! assert_eq!(find_in_link_headers([header]).as_deref(), Some("/webmention"));
//!
//! let html = "<html><a href='/wm' rel='webmention'>wm</a></html>";
//! assert_eq!(find_in_html(html), Some(Candidate::Href("/wm".into())));
//! ```

mod html;
mod link_header;

pub use html::{Candidate, find_in_html, webmention_links};
pub use link_header::{LinkValue, find_in_link_headers, parse_link_header};

/// The link relation that marks a webmention receiver.
pub const WEBMENTION_REL: &str = "webmention";

/// `true` if the space-separated relation list `rel` contains the
/// `webmention` token. Tokens compare case-sensitively.
pub fn has_webmention_rel(rel: &str) -> bool {
  rel.split_whitespace().any(|token| token == WEBMENTION_REL)
}
