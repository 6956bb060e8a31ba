//! The local target contract: does this site actually serve a path?

use url::Url;

/// Routing collaborator consulted before a notification is accepted.
///
/// Implementations answer for the union of the site's route table and its
/// flat pages.
pub trait LocalTargets: Send + Sync {
  fn path_exists(&self, path: &str) -> bool;
}

impl<T: LocalTargets + ?Sized> LocalTargets for std::sync::Arc<T> {
  fn path_exists(&self, path: &str) -> bool { (**self).path_exists(path) }
}

/// `true` when the path component of `target` is served locally.
///
/// A target that does not parse as an absolute URL is never local.
pub fn is_local_resource<L: LocalTargets + ?Sized>(local: &L, target: &str) -> bool {
  match Url::parse(target) {
    Ok(url) => local.path_exists(url.path()),
    Err(_) => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct Only(&'static str);

  impl LocalTargets for Only {
    fn path_exists(&self, path: &str) -> bool { path == self.0 }
  }

  #[test]
  fn uses_path_component_only() {
    let local = Only("/blog/hello/");
    assert!(is_local_resource(&local, "https://mysite.com/blog/hello/?utm=x#top"));
    assert!(!is_local_resource(&local, "https://mysite.com/blog/other/"));
  }

  #[test]
  fn bare_origin_maps_to_root() {
    assert!(is_local_resource(&Only("/"), "http://mysite.com"));
    assert!(!is_local_resource(&Only("/page"), "http://mysite.com"));
  }

  #[test]
  fn unparseable_target_is_not_local() {
    assert!(!is_local_resource(&Only("/"), "kaboom"));
  }
}
