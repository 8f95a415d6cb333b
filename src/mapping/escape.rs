//! Percent-encoding of single path components.
//!
//! Rendered URLs carry variable values encoded so that `/`, `?` and `#` in a
//! value stay inside one component. The dispatcher decodes components before
//! resources see them, and matching runs against the canonical encoding.

use std::borrow::Cow;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped in a path component (the WHATWG path-segment set).
const COMPONENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

pub fn encode_component(raw: &str) -> Cow<'_, str> {
    utf8_percent_encode(raw, COMPONENT).into()
}

pub fn decode_component(encoded: &str) -> Cow<'_, str> {
    percent_decode_str(encoded).decode_utf8_lossy()
}

/// Re-encode every component of `path` the way the renderer does, dropping
/// empty components. Leading and trailing slashes are kept.
pub(crate) fn canonical_path(path: &str) -> String {
    let components: Vec<_> = path
        .split('/')
        .filter(|c| !c.is_empty())
        .map(|c| encode_component(&decode_component(c)).into_owned())
        .collect();
    let mut canonical = format!("/{}", components.join("/"));
    if path.ends_with('/') && !components.is_empty() {
        canonical.push('/');
    }
    canonical
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_characters_stay_in_component() {
        assert_eq!(encode_component("a/b"), "a%2Fb");
        assert_eq!(encode_component("x?y#z"), "x%3Fy%23z");
        assert_eq!(encode_component("+7"), "+7");
        assert_eq!(decode_component("a%2Fb"), "a/b");
    }

    #[test]
    fn test_canonical_path() {
        assert_eq!(canonical_path("/users/a b/name"), "/users/a%20b/name");
        assert_eq!(canonical_path("/users/a%20b/name"), "/users/a%20b/name");
        assert_eq!(canonical_path("/p/%2B7"), "/p/+7");
        assert_eq!(canonical_path("//fold//"), "/fold/");
        assert_eq!(canonical_path("/"), "/");
    }
}
