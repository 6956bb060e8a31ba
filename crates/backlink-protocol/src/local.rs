//! [`RouteTable`]: the site's served paths, built from configuration.
//!
//! Two kinds of entries:
//!
//! - **routes** use axum's path syntax: literal segments, `{name}` for one
//!   segment, and a trailing `{*rest}` for one or more segments;
//! - **pages** are flat pages, matched exactly.

use backlink_core::local::LocalTargets;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
  Literal(String),
  Param,
  CatchAll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Route(Vec<Segment>);

impl Route {
  fn parse(pattern: &str) -> Self {
    let segments = segments(pattern)
      .map(|s| {
        if s.starts_with("{*") && s.ends_with('}') {
          Segment::CatchAll
        } else if s.starts_with('{') && s.ends_with('}') {
          Segment::Param
        } else {
          Segment::Literal(s.to_owned())
        }
      })
      .collect();
    Self(segments)
  }

  fn matches(&self, path: &str) -> bool {
    let mut parts = segments(path);
    for (i, segment) in self.0.iter().enumerate() {
      match segment {
        // Only meaningful in last position; anywhere else it never matches.
        Segment::CatchAll => return i + 1 == self.0.len() && parts.next().is_some(),
        Segment::Param => {
          if parts.next().is_none() {
            return false;
          }
        }
        Segment::Literal(lit) => {
          if parts.next() != Some(lit.as_str()) {
            return false;
          }
        }
      }
    }
    parts.next().is_none()
  }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
  path.split('/').filter(|s| !s.is_empty())
}

/// `/about` and `about/` both become `/about/`.
fn normalise_page(page: &str) -> String {
  let trimmed = page.trim_matches('/');
  if trimmed.is_empty() {
    "/".to_owned()
  } else {
    format!("/{trimmed}/")
  }
}

/// Paths served by this site.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
  routes: Vec<Route>,
  pages:  Vec<String>,
}

impl RouteTable {
  pub fn new<R, P>(routes: R, pages: P) -> Self
  where
    R: IntoIterator,
    R::Item: AsRef<str>,
    P: IntoIterator,
    P::Item: AsRef<str>,
  {
    let mut table = Self::default();
    for route in routes {
      table.add_route(route.as_ref());
    }
    for page in pages {
      table.add_page(page.as_ref());
    }
    table
  }

  pub fn add_route(&mut self, pattern: &str) { self.routes.push(Route::parse(pattern)); }

  pub fn add_page(&mut self, url: &str) { self.pages.push(normalise_page(url)); }

  pub fn is_empty(&self) -> bool { self.routes.is_empty() && self.pages.is_empty() }
}

impl LocalTargets for RouteTable {
  fn path_exists(&self, path: &str) -> bool {
    let page = normalise_page(path);
    self.pages.iter().any(|p| *p == page) || self.routes.iter().any(|r| r.matches(path))
  }
}
