//! Hyperlinks for REST resources
//!
//! Resources returned by the API carry a `self` link and optional child
//! links derived from the request path.

use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;

/// A named hyperlink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Relation name ("self" or a child name)
    pub rel: String,
    /// Absolute URL
    pub href: String,
}

impl Link {
    /// Create a link
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
        }
    }
}

/// Resource that can carry links
pub trait Linked {
    /// Identifier appended to collection paths
    fn id(&self) -> &str;

    /// Replace the resource's links
    fn set_links(&mut self, links: Vec<Link>);
}

/// Builds links for resources
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkHydrator {
    accessed_via_https: bool,
}

impl LinkHydrator {
    /// Create a hydrator
    pub fn new(accessed_via_https: bool) -> Self {
        Self { accessed_via_https }
    }

    /// Create a hydrator from API configuration
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.accessed_via_https)
    }

    /// Rewrite the scheme of `path` to https when the API sits behind TLS
    pub fn prefix_for_https(&self, path: &str) -> String {
        if self.accessed_via_https && !path.to_lowercase().starts_with("https") {
            if let Some(idx) = path.find("://") {
                return format!("https{}", &path[idx..]);
            }
        }
        path.to_string()
    }

    /// Hydrate every resource of a collection with links under `absolute_path`
    pub fn hydrate_all<'a, T: Linked>(
        &self,
        resources: &'a mut [T],
        absolute_path: &str,
        children: &[&str],
    ) -> &'a mut [T] {
        let path = self.prefix_for_https(absolute_path);
        for resource in resources.iter_mut() {
            hydrate_with(resource, &path, false, children);
        }
        resources
    }

    /// Hydrate a single resource
    ///
    /// `path_for_specific_resource` says whether `absolute_path` already ends
    /// with the resource id; otherwise the id is appended.
    pub fn hydrate<'a, T: Linked>(
        &self,
        resource: &'a mut T,
        absolute_path: &str,
        path_for_specific_resource: bool,
        children: &[&str],
    ) -> &'a mut T {
        let path = self.prefix_for_https(absolute_path);
        hydrate_with(resource, &path, path_for_specific_resource, children);
        resource
    }
}

fn hydrate_with<T: Linked>(
    resource: &mut T,
    path: &str,
    path_for_specific_resource: bool,
    children: &[&str],
) {
    let mut path = path.to_string();
    if !path_for_specific_resource {
        if !path.ends_with('/') {
            path.push('/');
        }
        path.push_str(resource.id());
    }

    let mut links = Vec::with_capacity(children.len() + 1);
    links.push(Link::new("self", path.clone()));
    for child in children {
        links.push(Link::new(*child, format!("{}/{}", path, child)));
    }

    resource.set_links(links);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Alarm {
        id: String,
        links: Vec<Link>,
    }

    impl Alarm {
        fn new(id: &str) -> Self {
            Self {
                id: id.to_string(),
                links: Vec::new(),
            }
        }
    }

    impl Linked for Alarm {
        fn id(&self) -> &str {
            &self.id
        }

        fn set_links(&mut self, links: Vec<Link>) {
            self.links = links;
        }
    }

    #[test]
    fn test_prefix_for_https() {
        let hydrator = LinkHydrator::new(true);
        assert_eq!(
            hydrator.prefix_for_https("http://api.example.com/v2.0"),
            "https://api.example.com/v2.0"
        );
        assert_eq!(
            hydrator.prefix_for_https("HTTPS://api.example.com"),
            "HTTPS://api.example.com"
        );

        let plain = LinkHydrator::new(false);
        assert_eq!(
            plain.prefix_for_https("http://api.example.com"),
            "http://api.example.com"
        );
    }

    #[test]
    fn test_hydrate_collection_path() {
        let hydrator = LinkHydrator::default();
        let mut alarm = Alarm::new("42");
        hydrator.hydrate(&mut alarm, "http://host/v2.0/alarms", false, &["history"]);

        assert_eq!(
            alarm.links,
            vec![
                Link::new("self", "http://host/v2.0/alarms/42"),
                Link::new("history", "http://host/v2.0/alarms/42/history"),
            ]
        );
    }

    #[test]
    fn test_hydrate_trailing_slash() {
        let hydrator = LinkHydrator::default();
        let mut alarm = Alarm::new("42");
        hydrator.hydrate(&mut alarm, "http://host/alarms/", false, &[]);
        assert_eq!(alarm.links, vec![Link::new("self", "http://host/alarms/42")]);
    }

    #[test]
    fn test_hydrate_specific_resource() {
        let hydrator = LinkHydrator::new(true);
        let mut alarm = Alarm::new("42");
        hydrator.hydrate(&mut alarm, "http://host/alarms/42", true, &[]);
        assert_eq!(alarm.links, vec![Link::new("self", "https://host/alarms/42")]);
    }

    #[test]
    fn test_hydrate_all() {
        let hydrator = LinkHydrator::default();
        let mut alarms = vec![Alarm::new("1"), Alarm::new("2")];
        hydrator.hydrate_all(&mut alarms, "http://host/alarms", &[]);

        assert_eq!(alarms[0].links[0].href, "http://host/alarms/1");
        assert_eq!(alarms[1].links[0].href, "http://host/alarms/2");
    }
}
