//! Compiled, render-ready URL mapping for one resource-id.

use std::collections::{BTreeMap, HashSet};

use regex::Regex;
use url::form_urlencoded;

use crate::mapping::error::{MappingError, RenderError, Result};
use crate::mapping::escape::{canonical_path, decode_component, encode_component};
use crate::mapping::pattern::{Origin, UrlShape};
use crate::mapping::segment::{Segment, Variable};
use crate::mapping::value::Value;
use crate::resource::tree::NodeId;

/// Values to substitute, keyed by variable name. `None` means unset.
pub(crate) type Slots = BTreeMap<String, Option<Value>>;

/// Compiled mapping.
///
/// Built once at table construction and read-only afterward; an alias is a
/// clone with a different id.
#[derive(Debug, Clone)]
pub struct Mapping {
    id: String,
    node: Option<NodeId>,
    origin: Option<Origin>,
    absolute: bool,
    segments: Vec<Segment>,
    optional: Vec<Variable>,
    non_terminal: bool,
    query: String,
    fragment: String,
    template: String,
    untyped_template: String,
    positional: Vec<String>,
    pattern: Regex,
    exact: Regex,
}

impl Mapping {
    /// Compile `shape`, rejecting variable-name collisions.
    pub(crate) fn compile(
        id: impl Into<String>,
        shape: UrlShape,
        node: Option<NodeId>,
        root: Option<&str>,
    ) -> Result<Self> {
        let id = id.into();
        let UrlShape {
            origin,
            absolute,
            segments,
            optional,
            non_terminal,
            query,
            fragment,
        } = shape;

        let mut seen = HashSet::new();
        let names = segments
            .iter()
            .filter_map(Segment::variable)
            .chain(optional.iter())
            .map(Variable::name);
        for name in names {
            if !seen.insert(name) {
                return Err(MappingError::VariableCollision {
                    id,
                    name: name.to_string(),
                });
            }
        }

        let positional = segments
            .iter()
            .filter_map(Segment::variable)
            .map(|v| v.name().to_string())
            .collect();

        let template = join_segments(&segments, |v| match v.format() {
            Some(format) => format!("{{{}:{}}}", v.name(), format.as_str()),
            None => format!("{{{}}}", v.name()),
        });
        let untyped_template = join_segments(&segments, |v| format!("{{{}}}", v.name()));

        let source = regex_source(absolute, &segments, root);
        let invalid = |e: regex::Error| MappingError::InvalidPattern {
            pattern: untyped_template.clone(),
            reason: e.to_string(),
        };
        let pattern = Regex::new(&source).map_err(invalid)?;
        let exact = Regex::new(&format!("^{}$", source)).map_err(invalid)?;

        Ok(Self {
            id,
            node,
            origin,
            absolute,
            segments,
            optional,
            non_terminal,
            query,
            fragment,
            template,
            untyped_template,
            positional,
            pattern,
            exact,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Tree node this mapping was enumerated from; `None` for static mappings.
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    pub fn is_non_terminal(&self) -> bool {
        self.non_terminal
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn optional(&self) -> &[Variable] {
        &self.optional
    }

    /// Typed template, e.g. `formatted/{uid:08d}`.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Template ignoring formats, e.g. `formatted/{uid}`.
    pub fn untyped_template(&self) -> &str {
        &self.untyped_template
    }

    /// Positional variable names, root to leaf.
    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    /// Unanchored matching regex over the path.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub(crate) fn with_id(&self, id: impl Into<String>) -> Self {
        let mut alias = self.clone();
        alias.id = id.into();
        alias
    }

    /// Initial slot table: positional variables with their defaults,
    /// optional parameters unset.
    pub(crate) fn slots(&self) -> Slots {
        let positional = self
            .segments
            .iter()
            .filter_map(Segment::variable)
            .map(|v| (v.name().to_string(), v.default().cloned()));
        let optional = self.optional.iter().map(|v| (v.name().to_string(), None));
        positional.chain(optional).collect()
    }

    /// Substitute filled slots into a URL.
    pub(crate) fn render(&self, slots: &Slots, root: Option<&str>, trailing: bool) -> std::result::Result<String, RenderError> {
        let mut parts = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            match segment {
                Segment::Fixed(literal) => parts.push(encode_component(literal).into_owned()),
                Segment::Var(variable) => {
                    let value = slots.get(variable.name()).cloned().flatten().ok_or_else(|| {
                        RenderError::Missing {
                            id: self.id.clone(),
                            names: vec![variable.name().to_string()],
                        }
                    })?;
                    parts.push(encode_component(&render_value(variable, &value)?).into_owned());
                }
            }
        }

        let mut query = form_urlencoded::Serializer::for_suffix(self.query.clone(), 0);
        for variable in &self.optional {
            if let Some(Some(value)) = slots.get(variable.name()) {
                query.append_pair(variable.name(), &render_value(variable, value)?);
            }
        }
        let query = query.finish();

        Ok(self.assemble(&parts.join("/"), root, trailing, &query))
    }

    /// Render with every variable replaced by its `(name)` placeholder.
    pub(crate) fn render_pattern(&self, root: Option<&str>, trailing: bool) -> String {
        let body = join_segments(&self.segments, Variable::placeholder);
        self.assemble(&body, root, trailing, &self.query)
    }

    /// Match a bare path; captures are decoded, then coerced per variable
    /// format. A capture the format rejects fails the whole match.
    pub(crate) fn match_path(&self, path: &str) -> Option<BTreeMap<String, Value>> {
        let path = canonical_path(path);
        let caps = self.exact.captures(&path)?;
        let variables = self.segments.iter().filter_map(Segment::variable);
        let mut values = BTreeMap::new();
        for (variable, m) in variables.zip(caps.iter().skip(1)) {
            let Some(m) = m else { continue };
            let value = variable.try_coerce(&decode_component(m.as_str()))?;
            values.insert(variable.name().to_string(), value);
        }
        Some(values)
    }

    fn assemble(&self, body: &str, root: Option<&str>, trailing: bool, query: &str) -> String {
        let first = if self.absolute { "" } else { root.unwrap_or("") };
        let mut path = format!("{}/{}", first, body);
        if trailing && self.non_terminal && !path.ends_with('/') {
            path.push('/');
        }

        let mut url = String::new();
        if let Some(origin) = &self.origin {
            if !origin.scheme.is_empty() {
                url.push_str(&origin.scheme);
                url.push(':');
            }
            url.push_str("//");
            url.push_str(&origin.netloc);
        }
        url.push_str(&path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(query);
        }
        if !self.fragment.is_empty() {
            url.push('#');
            url.push_str(&self.fragment);
        }
        url
    }
}

/// Render one value; an empty result would collapse the component.
fn render_value(variable: &Variable, value: &Value) -> std::result::Result<String, RenderError> {
    variable.render(value).filter(|r| !r.is_empty()).ok_or_else(|| RenderError::BadValue {
        name: variable.name().to_string(),
        value: value.to_string(),
        format: variable.format().map(|f| f.as_str().to_string()).unwrap_or_default(),
    })
}

fn join_segments(segments: &[Segment], var: impl Fn(&Variable) -> String) -> String {
    segments
        .iter()
        .map(|s| match s {
            Segment::Fixed(literal) => literal.clone(),
            Segment::Var(variable) => var(variable),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Path-only regex: literals escaped, variables captured by format class,
/// trailing slash optional.
fn regex_source(absolute: bool, segments: &[Segment], root: Option<&str>) -> String {
    let body = segments
        .iter()
        .map(|segment| match segment {
            Segment::Fixed(literal) => regex::escape(&encode_component(literal)),
            Segment::Var(variable) => format!("({})", variable.capture_class()),
        })
        .collect::<Vec<_>>()
        .join("/");

    let first = if absolute { String::new() } else { regex::escape(root.unwrap_or("")) };
    let source = format!("{}/{}", first, body);
    if source.ends_with('/') {
        format!("{}?", source)
    } else {
        format!("{}/?", source)
    }
}
