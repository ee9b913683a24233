//! Path matching logic.
//!
//! # Responsibilities
//! - Match a path under a prefix on a segment boundary
//! - Match a raw string prefix (dev-tooling paths such as `/__nextjs_original-stack-frame`)
//! - Match single-segment root files by extension
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - No regex to guarantee O(n) matching

/// Trait for matching request paths against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

/// Matches a path prefix on a segment boundary.
///
/// `/web` matches `/web` and `/web/...` but not `/website`.
#[derive(Debug, Clone)]
pub struct SegmentPrefixMatcher {
    prefix: String,
}

impl SegmentPrefixMatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Returns the part of `path` after the prefix, or `None` if it does not match.
    pub fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() || rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }
}

impl Matcher for SegmentPrefixMatcher {
    fn matches(&self, path: &str) -> bool {
        self.strip(path).is_some()
    }
}

/// Matches a raw string prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}

/// Matches `/<name>.<ext>` at the root for a fixed set of extensions.
#[derive(Debug, Clone)]
pub struct RootExtensionMatcher {
    extensions: Vec<String>,
}

impl RootExtensionMatcher {
    pub fn new(extensions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }
}

impl Matcher for RootExtensionMatcher {
    fn matches(&self, path: &str) -> bool {
        let Some(file) = path.strip_prefix('/') else {
            return false;
        };
        if file.contains('/') {
            return false;
        }
        match file.rsplit_once('.') {
            Some((name, ext)) => !name.is_empty() && self.extensions.iter().any(|e| e == ext),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_prefix_matcher() {
        let matcher = SegmentPrefixMatcher::new("/web");

        assert_eq!(matcher.strip("/web"), Some(""));
        assert_eq!(matcher.strip("/web/"), Some("/"));
        assert_eq!(matcher.strip("/web/chat/1"), Some("/chat/1"));
        assert_eq!(matcher.strip("/website"), None);
        assert_eq!(matcher.strip("/api/web"), None);
        assert!(!matcher.matches("/WEB/chat")); // Case sensitive
    }

    #[test]
    fn test_path_prefix_matcher() {
        let matcher = PathPrefixMatcher::new("/__next");

        assert!(matcher.matches("/__nextjs_original-stack-frame"));
        assert!(matcher.matches("/__next/webpack-hmr"));
        assert!(!matcher.matches("/_next/static/chunk.js"));
    }

    #[test]
    fn test_root_extension_matcher() {
        let matcher = RootExtensionMatcher::new(["svg", "png", "jpg"]);

        assert!(matcher.matches("/logo.svg"));
        assert!(matcher.matches("/vercel.png"));
        assert!(matcher.matches("/photo.min.jpg"));
        assert!(!matcher.matches("/images/logo.svg"));
        assert!(!matcher.matches("/.svg"));
        assert!(!matcher.matches("/logo.gif"));
        assert!(!matcher.matches("/logo.SVG"));
        assert!(!matcher.matches("/svg"));
    }
}
