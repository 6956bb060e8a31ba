//! `Link` header parser (RFC 8288), tolerant of the shapes found in the
//! wild: single-quoted and bare parameter values, bare values containing
//! spaces, and several link-values folded into one header.
//!
//! Pipeline:
//!   header value
//!     └─ parse_link_header()  → Vec<LinkValue>
//!          └─ parse_params()  → (name, value) pairs up to the next `,`

use crate::has_webmention_rel;

/// One `<uri>; param=value…` entry of a `Link` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkValue {
  /// The URI reference between `<` and `>`, unresolved.
  pub uri: String,
  /// The raw `rel` parameter; empty when absent.
  pub rel: String,
}

impl LinkValue {
  pub fn is_webmention(&self) -> bool { has_webmention_rel(&self.rel) }
}

/// Split one header value into its link-values, in order.
///
/// Commas only separate link-values at the top level; a comma inside
/// `<…>` or inside a quoted parameter does not.
pub fn parse_link_header(input: &str) -> Vec<LinkValue> {
  let mut links = Vec::new();
  let mut rest = input;

  loop {
    rest = rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
    if rest.is_empty() {
      break;
    }

    let Some(after_lt) = rest.strip_prefix('<') else {
      // Not a link-value; resynchronise on the next top-level comma.
      let (_, remaining) = parse_params(rest);
      rest = remaining;
      continue;
    };
    let Some(gt) = after_lt.find('>') else {
      break;
    };

    let uri = after_lt[..gt].trim().to_owned();
    let (params, remaining) = parse_params(&after_lt[gt + 1..]);
    rest = remaining;

    let rel = params
      .into_iter()
      .find(|(name, _)| name == "rel")
      .map(|(_, value)| value)
      .unwrap_or_default();

    links.push(LinkValue { uri, rel });
  }

  links
}

/// First link whose `rel` contains `webmention`, scanning header instances
/// in order and link-values within each instance in order.
pub fn find_in_link_headers<'a, I>(values: I) -> Option<String>
where
  I: IntoIterator<Item = &'a str>,
{
  values
    .into_iter()
    .flat_map(parse_link_header)
    .find(LinkValue::is_webmention)
    .map(|link| link.uri)
}

/// Parse `; name=value` pairs until the end of the current link-value.
///
/// Returns the pairs (names lower-cased) and the input following the
/// terminating `,`.
fn parse_params(mut s: &str) -> (Vec<(String, String)>, &str) {
  let mut params = Vec::new();

  loop {
    s = s.trim_start();
    match s.chars().next() {
      None => return (params, s),
      Some(',') => return (params, &s[1..]),
      Some(';') => s = &s[1..],
      Some(_) => {
        let end = s.find([';', ',']).unwrap_or(s.len());
        s = &s[end..];
        continue;
      }
    }

    let name_end = s.find(['=', ';', ',']).unwrap_or(s.len());
    let name = s[..name_end].trim().to_ascii_lowercase();
    s = &s[name_end..];

    let value = match s.strip_prefix('=') {
      Some(after_eq) => {
        let after_eq = after_eq.trim_start();
        match after_eq.chars().next() {
          Some(quote @ ('"' | '\'')) => {
            let inner = &after_eq[1..];
            let close = inner.find(quote).unwrap_or(inner.len());
            s = inner.get(close + 1..).unwrap_or("");
            inner[..close].to_owned()
          }
          _ => {
            let end = after_eq.find([';', ',']).unwrap_or(after_eq.len());
            s = &after_eq[end..];
            after_eq[..end].trim().to_owned()
          }
        }
      }
      None => String::new(),
    };

    if !name.is_empty() {
      params.push((name, value));
    }
  }
}
