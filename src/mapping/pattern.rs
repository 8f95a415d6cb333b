//! URL pattern mini-language.
//!
//! ```text
//! http://example.com/u/(user)/home   external, absolute
//! /documents/legal                   absolute on this site
//! users/(user)/(uid%08d)             relative to the mapper's root location
//! fold/                              trailing slash: non-terminal
//! ```

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::mapping::enumerator::PathDescriptor;
use crate::mapping::error::{MappingError, Result};
use crate::mapping::format::Format;
use crate::mapping::segment::{Segment, Variable};
use crate::mapping::value::Value;

static COMPONENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(([A-Za-z_][A-Za-z0-9_]*)(?:%([A-Za-z0-9.+\-]+))?\)$")
        .expect("component regex is valid")
});

static SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*):").expect("scheme regex is valid"));

/// Scheme and network location of an external mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Origin {
    pub scheme: String,
    pub netloc: String,
}

/// Parsed shape of a URL, before compilation into a `Mapping`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrlShape {
    pub origin: Option<Origin>,
    /// Absolute shapes ignore the mapper's root location.
    pub absolute: bool,
    pub segments: Vec<Segment>,
    pub optional: Vec<Variable>,
    pub non_terminal: bool,
    pub query: String,
    pub fragment: String,
}

impl From<&PathDescriptor> for UrlShape {
    fn from(desc: &PathDescriptor) -> Self {
        Self {
            origin: None,
            absolute: false,
            segments: desc.segments.clone(),
            optional: desc.optional.clone(),
            non_terminal: desc.non_terminal,
            query: String::new(),
            fragment: String::new(),
        }
    }
}

/// Split a URL into `(scheme, netloc, path, query, fragment)`.
pub(crate) fn split_url(url: &str) -> (&str, &str, &str, &str, &str) {
    let (rest, fragment) = url.split_once('#').unwrap_or((url, ""));
    let (rest, query) = rest.split_once('?').unwrap_or((rest, ""));

    let (scheme, rest) = match SCHEME.captures(rest).and_then(|c| c.get(1)) {
        Some(m) if rest[m.end() + 1..].starts_with("//") => (m.as_str(), &rest[m.end() + 1..]),
        _ => ("", rest),
    };

    let (netloc, path) = match rest.strip_prefix("//") {
        Some(after) => match after.find('/') {
            Some(i) => (&after[..i], &after[i..]),
            None => (after, ""),
        },
        None => ("", rest),
    };
    (scheme, netloc, path, query, fragment)
}

/// Parse a URL pattern, attaching `defaults` to the variables they name.
pub fn parse_pattern(pattern: &str, defaults: &BTreeMap<String, Value>) -> Result<UrlShape> {
    let (scheme, netloc, path, query, fragment) = split_url(pattern);

    let absolute = !scheme.is_empty() || !netloc.is_empty() || path.starts_with('/');
    let path = path.strip_prefix('/').unwrap_or(path);
    let non_terminal = path.ends_with('/');
    let path = path.strip_suffix('/').unwrap_or(path);

    let mut remaining = defaults.clone();
    let mut segments = Vec::new();
    for component in path.split('/') {
        let Some(caps) = COMPONENT.captures(component) else {
            if component.contains('(') || component.contains(')') {
                return Err(MappingError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: format!("malformed component '{}'", component),
                });
            }
            segments.push(Segment::fixed(component));
            continue;
        };

        let name = &caps[1];
        let mut variable = Variable::new(name);
        if let Some(spec) = caps.get(2) {
            variable = variable.with_format(Format::parse(spec.as_str())?);
        }
        if let Some(default) = remaining.remove(name) {
            variable = variable.with_default(default);
        }
        segments.push(Segment::Var(variable));
    }

    if !remaining.is_empty() {
        return Err(MappingError::ExtraDefaults {
            pattern: pattern.to_string(),
            names: remaining.into_keys().collect(),
        });
    }

    let origin = (!scheme.is_empty() || !netloc.is_empty()).then(|| Origin {
        scheme: scheme.to_string(),
        netloc: netloc.to_string(),
    });

    Ok(UrlShape {
        origin,
        absolute,
        segments,
        optional: Vec::new(),
        non_terminal,
        query: query.to_string(),
        fragment: fragment.to_string(),
    })
}
