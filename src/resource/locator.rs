//! Cursor over the components of one request path.

use std::fmt;

use crate::mapping::escape::{decode_component, encode_component};

/// Request path split into components, plus a cursor.
///
/// The path never changes during a dispatch; only `index` moves, and only
/// forward. `is_leaf()` holds exactly when every component was consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathLocator {
    root: String,
    segments: Vec<String>,
    index: usize,
    trailing: bool,
}

impl PathLocator {
    /// Split `path` on `/`, dropping empty components. Components are
    /// percent-decoded.
    pub fn parse(path: &str) -> Self {
        Self::with_root("", path)
    }

    /// Like [`PathLocator::parse`], for a path served under `root`.
    /// `uri()` re-adds the root.
    pub fn with_root(root: &str, path: &str) -> Self {
        Self {
            root: root.to_string(),
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(|s| decode_component(s).into_owned())
                .collect(),
            index: 0,
            trailing: path.ends_with('/'),
        }
    }

    /// Component under the cursor; `None` at the leaf.
    pub fn current(&self) -> Option<&str> {
        self.segments.get(self.index).map(String::as_str)
    }

    /// Component after the current one.
    pub fn peek_next(&self) -> Option<&str> {
        self.segments.get(self.index + 1).map(String::as_str)
    }

    /// Consume the current component. Saturates at the leaf.
    pub fn advance(&mut self) -> &mut Self {
        if self.index < self.segments.len() {
            self.index += 1;
        }
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.index == self.segments.len()
    }

    /// Whether the request path ended in `/`.
    pub fn trailing(&self) -> bool {
        self.trailing
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Components not yet consumed.
    pub fn remaining(&self) -> &[String] {
        &self.segments[self.index..]
    }

    /// Rejoin the first `upto` components (all when `None`) under the root,
    /// with a trailing `/` if the request had one.
    pub fn uri(&self, upto: Option<usize>) -> String {
        let upto = upto.unwrap_or(self.segments.len()).min(self.segments.len());
        let mut uri = self.root.clone();
        for segment in &self.segments[..upto] {
            uri.push('/');
            uri.push_str(&encode_component(segment));
        }
        if self.trailing {
            uri.push('/');
        }
        uri
    }

    /// The part of the request consumed so far.
    pub fn current_uri(&self) -> String {
        self.uri(Some(self.index))
    }
}

impl fmt::Display for PathLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<PathLocator {:?} {}>", self.segments, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(path: &str, segments: &[&str], trailing: bool) {
        let loc = PathLocator::parse(path);
        assert_eq!(loc.segments(), segments);
        assert_eq!(loc.trailing(), trailing);
        assert_eq!(loc.uri(None), path);
    }

    #[test]
    fn test_parse() {
        check("", &[], false);
        check("/", &[], true);
        check("/bli", &["bli"], false);
        check("/bli/", &["bli"], true);
        check("/bli/gugu", &["bli", "gugu"], false);
        check("/bli/gugu/", &["bli", "gugu"], true);
    }

    #[test]
    fn test_duplicate_slashes_are_normalized() {
        let loc = PathLocator::parse("//users///martin");
        assert_eq!(loc.segments(), ["users", "martin"]);
        assert_eq!(loc.uri(None), "/users/martin");
    }

    #[test]
    fn test_cursor() {
        let mut loc = PathLocator::parse("/users/martin/name");
        assert_eq!(loc.current(), Some("users"));
        assert_eq!(loc.peek_next(), Some("martin"));
        assert!(!loc.is_leaf());

        loc.advance().advance();
        assert_eq!(loc.current(), Some("name"));
        assert_eq!(loc.current_uri(), "/users/martin");
        assert_eq!(loc.remaining(), ["name"]);

        loc.advance().advance();
        assert!(loc.is_leaf());
        assert_eq!(loc.current(), None);
        assert_eq!(loc.index(), 3);
    }

    #[test]
    fn test_components_are_decoded() {
        let loc = PathLocator::parse("/users/a%2Fb/x%3Fy/");
        assert_eq!(loc.segments(), ["users", "a/b", "x?y"]);
        assert_eq!(loc.uri(None), "/users/a%2Fb/x%3Fy/");
    }

    #[test]
    fn test_root_is_prefixed() {
        let loc = PathLocator::with_root("/app", "/fold/");
        assert_eq!(loc.uri(None), "/app/fold/");
        assert_eq!(loc.uri(Some(0)), "/app/");
        let empty = PathLocator::with_root("/app", "");
        assert_eq!(empty.uri(None), "/app");
    }
}
