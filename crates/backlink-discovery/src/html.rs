//! HTML discovery of `rel="webmention"` on `<link>` and `<a>` elements.
//!
//! Documents are parsed with html5ever (via `scraper`), so markup inside
//! comments or produced by escaped text never shows up as an element.

use scraper::{ElementRef, Html};

use crate::has_webmention_rel;

/// What the HTML scan settled on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
  /// The `href` of the first qualifying element, unresolved.
  Href(String),
  /// Only `rel=webmention` elements without a usable `href` were found; the
  /// page itself is the endpoint.
  SelfReference,
}

/// Scan `html` in document order for the webmention endpoint.
///
/// Elements with a missing or blank `href` are skipped in favour of later
/// ones. Returns `None` when no `<link>`/`<a>` carries the relation at all.
pub fn find_in_html(html: &str) -> Option<Candidate> {
  let document = Html::parse_document(html);
  let mut saw_rel = false;

  for element in webmention_elements(&document) {
    match usable_href(element) {
      Some(href) => return Some(Candidate::Href(href.to_owned())),
      None => saw_rel = true,
    }
  }

  saw_rel.then_some(Candidate::SelfReference)
}

/// Every usable `href` on a `rel=webmention` `<link>`/`<a>` in `html`, in
/// document order, duplicates included.
pub fn webmention_links(html: &str) -> Vec<String> {
  let document = Html::parse_fragment(html);
  webmention_elements(&document)
    .filter_map(usable_href)
    .map(str::to_owned)
    .collect()
}

fn webmention_elements(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
  document
    .root_element()
    .descendants()
    .filter_map(ElementRef::wrap)
    .filter(|element| matches!(element.value().name(), "link" | "a"))
    .filter(|element| element.value().attr("rel").is_some_and(has_webmention_rel))
}

fn usable_href(element: ElementRef<'_>) -> Option<&str> {
  element
    .value()
    .attr("href")
    .map(str::trim)
    .filter(|href| !href.is_empty())
}
