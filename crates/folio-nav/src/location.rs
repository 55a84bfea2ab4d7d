//! Browser-style location, the sole input to navigation resolution.

use serde::{Deserialize, Serialize};

/// URL scheme of the current location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
    /// Local filesystem checkout, no host.
    File,
}

/// The current location the site is served from.
///
/// Mirrors the parts of a browser location the navigation cares about:
/// protocol, hostname and path. The path always starts with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub protocol: Protocol,
    pub host: String,
    pub path: String,
}

impl Location {
    /// Build a location from explicit parts, normalizing the path to start
    /// with `/`.
    pub fn new(protocol: Protocol, host: impl Into<String>, path: impl Into<String>) -> Self {
        let mut path = path.into();
        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        Self {
            protocol,
            host: host.into(),
            path,
        }
    }

    /// Parse a location from a URL string like `https://host/path` or
    /// `file:///home/me/site/index.html`.
    ///
    /// Returns `None` for schemes other than `http`, `https` and `file`.
    pub fn parse(url: &str) -> Option<Self> {
        let (scheme, rest) = url.split_once("://")?;
        let protocol = match scheme {
            "http" => Protocol::Http,
            "https" => Protocol::Https,
            "file" => Protocol::File,
            _ => return None,
        };
        if protocol == Protocol::File {
            // file:///path/to/site - everything after the scheme is path
            return Some(Self::new(protocol, "", format!("/{}", rest.trim_start_matches('/'))));
        }
        match rest.split_once('/') {
            Some((host, path)) => Some(Self::new(protocol, host, format!("/{}", path))),
            None => Some(Self::new(protocol, rest, "/")),
        }
    }

    /// Non-empty path segments, in order.
    pub fn segments(&self) -> Vec<&str> {
        self.path.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// Whether the host is a `github.io`-style project page, where the
    /// first path segment is the project name rather than site content.
    pub fn is_project_page(&self) -> bool {
        self.host.ends_with("github.io")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_https() {
        let loc = Location::parse("https://example.com/articles/post.html").unwrap();
        assert_eq!(loc.protocol, Protocol::Https);
        assert_eq!(loc.host, "example.com");
        assert_eq!(loc.path, "/articles/post.html");
    }

    #[test]
    fn test_parse_host_only() {
        let loc = Location::parse("http://example.com").unwrap();
        assert_eq!(loc.path, "/");
    }

    #[test]
    fn test_parse_file() {
        let loc = Location::parse("file:///home/me/site/index.html").unwrap();
        assert_eq!(loc.protocol, Protocol::File);
        assert_eq!(loc.host, "");
        assert_eq!(loc.path, "/home/me/site/index.html");
    }

    #[test]
    fn test_parse_unknown_scheme() {
        assert_eq!(Location::parse("ftp://example.com/x"), None);
    }

    #[test]
    fn test_new_normalizes_path() {
        let loc = Location::new(Protocol::Http, "h", "index.html");
        assert_eq!(loc.path, "/index.html");
    }

    #[test]
    fn test_segments() {
        let loc = Location::new(Protocol::Https, "h", "/a//b/c.html");
        assert_eq!(loc.segments(), vec!["a", "b", "c.html"]);
    }

    #[test]
    fn test_project_page_detection() {
        assert!(Location::new(Protocol::Https, "me.github.io", "/").is_project_page());
        assert!(!Location::new(Protocol::Https, "example.com", "/").is_project_page());
    }
}
