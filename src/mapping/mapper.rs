//! The mapping table: resource-id ↔ URL shape.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use regex::Regex;

use crate::config::schema::MapperConfig;
use crate::mapping::enumerator::enumerate;
use crate::mapping::error::{MappingError, RenderError, Result};
use crate::mapping::mapping::Mapping;
use crate::mapping::naming::NamingTransform;
use crate::mapping::params::Params;
use crate::mapping::pattern::{parse_pattern, split_url, UrlShape};
use crate::mapping::value::Value;
use crate::resource::tree::{NodeId, Tree};

/// Mapper settings.
#[derive(Debug, Clone)]
pub struct MapperOptions {
    /// Prefix under which the tree is served, e.g. `/app`.
    pub root_location: Option<String>,
    pub naming: NamingTransform,
    /// Append `/` to non-terminal mappings when rendering.
    pub render_trailing: bool,
}

impl Default for MapperOptions {
    fn default() -> Self {
        Self {
            root_location: None,
            naming: NamingTransform::default(),
            render_trailing: true,
        }
    }
}

impl From<&MapperConfig> for MapperOptions {
    fn from(config: &MapperConfig) -> Self {
        Self {
            root_location: config.root_location.clone(),
            naming: NamingTransform::Prefix(config.naming_prefix.clone()),
            render_trailing: config.render_trailing,
        }
    }
}

/// Bidirectional URL mapper.
///
/// Mutation (`initialize`, `add_static`, `add_alias`) happens during setup;
/// afterward the mapper is shared read-only, typically behind an `Arc`.
#[derive(Debug, Default)]
pub struct Mapper {
    options: MapperOptions,
    mappings: HashMap<String, Mapping>,
    tree: Option<Arc<Tree>>,
    node_ids: Vec<String>,
}

impl Mapper {
    pub fn new(options: MapperOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Enumerate `tree` and register one mapping per servable path.
    pub fn initialize(&mut self, tree: Arc<Tree>) -> Result<()> {
        let node_ids: Vec<String> = tree
            .iter()
            .map(|(_, resource)| {
                let identity = resource.identity();
                identity
                    .explicit_id()
                    .map(str::to_owned)
                    .unwrap_or_else(|| self.options.naming.resource_id(identity.type_name()))
            })
            .collect();

        let paths = enumerate(&tree)?;
        for desc in &paths {
            let id = node_ids[desc.node.index()].clone();
            let mapping = Mapping::compile(
                id,
                UrlShape::from(desc),
                Some(desc.node),
                self.root_location(),
            )?;
            self.insert(mapping)?;
        }

        tracing::info!(
            paths = paths.len(),
            mappings = self.mappings.len(),
            nodes = tree.len(),
            "resource tree mapped"
        );
        self.node_ids = node_ids;
        self.tree = Some(tree);
        Ok(())
    }

    /// Register a mapping from an explicit URL pattern.
    pub fn add_static(&mut self, id: &str, pattern: &str) -> Result<()> {
        self.add_static_with_defaults(id, pattern, BTreeMap::new())
    }

    /// Register a static mapping whose variables may have defaults.
    pub fn add_static_with_defaults(
        &mut self,
        id: &str,
        pattern: &str,
        defaults: BTreeMap<String, Value>,
    ) -> Result<()> {
        let shape = parse_pattern(pattern, &defaults)?;
        let mapping = Mapping::compile(id, shape, None, self.root_location())?;
        self.insert(mapping)
    }

    /// Register `alias` as a second id for the mapping of `existing`.
    pub fn add_alias(&mut self, alias: &str, existing: &str) -> Result<()> {
        let mapping = self
            .mappings
            .get(existing)
            .ok_or_else(|| MappingError::UnknownAlias {
                alias: alias.to_string(),
                target: existing.to_string(),
            })?
            .with_id(alias);
        self.insert(mapping)
    }

    fn insert(&mut self, mapping: Mapping) -> Result<()> {
        if let Some(existing) = self.mappings.get(mapping.id()) {
            return Err(MappingError::DuplicateId {
                id: mapping.id().to_string(),
                existing: self.pattern_of(existing),
                attempted: self.pattern_of(&mapping),
            });
        }
        tracing::debug!(resource_id = %mapping.id(), template = %mapping.template(), "mapping registered");
        self.mappings.insert(mapping.id().to_string(), mapping);
        Ok(())
    }

    pub fn options(&self) -> &MapperOptions {
        &self.options
    }

    pub fn root_location(&self) -> Option<&str> {
        self.options.root_location.as_deref()
    }

    /// The tree this mapper was initialized from, if any.
    pub fn tree(&self) -> Option<&Arc<Tree>> {
        self.tree.as_ref()
    }

    /// Resource-id of any node of the initialized tree.
    pub fn resource_id(&self, node: NodeId) -> Option<&str> {
        self.node_ids.get(node.index()).map(String::as_str)
    }

    pub fn get(&self, id: &str) -> Option<&Mapping> {
        self.mappings.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.mappings.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn mappings(&self) -> impl Iterator<Item = &Mapping> {
        self.mappings.values()
    }

    fn mapping(&self, id: &str) -> std::result::Result<&Mapping, RenderError> {
        self.mappings.get(id).ok_or_else(|| RenderError::unknown_id(id))
    }

    fn pattern_of(&self, mapping: &Mapping) -> String {
        mapping.render_pattern(self.root_location(), self.options.render_trailing)
    }

    /// Backward map: render the URL of `id`.
    pub fn render(&self, id: &str, params: Params<'_>) -> std::result::Result<String, RenderError> {
        let mapping = self.mapping(id)?;
        let mut slots = mapping.slots();
        let mut named = params.named.clone();

        if params.has_source() {
            if !params.positional.is_empty() {
                return Err(RenderError::SourceWithPositional { id: id.to_string() });
            }
            for (name, slot) in slots.iter_mut() {
                if slot.is_none() {
                    *slot = params.lookup_source(name);
                }
            }
        } else {
            let max = mapping.positional().len();
            if params.positional.len() > max {
                return Err(RenderError::TooManyArguments {
                    id: id.to_string(),
                    max,
                });
            }
            for (name, value) in mapping.positional().iter().zip(&params.positional) {
                if named.contains_key(name) {
                    return Err(RenderError::DuplicateValue {
                        id: id.to_string(),
                        name: name.clone(),
                    });
                }
                named.insert(name.clone(), value.clone());
            }
        }

        for (name, value) in named {
            match slots.get_mut(&name) {
                Some(slot) => *slot = Some(value),
                None => {
                    return Err(RenderError::UnknownParameter {
                        id: id.to_string(),
                        name,
                    })
                }
            }
        }

        let missing: Vec<String> = mapping
            .positional()
            .iter()
            .filter(|name| matches!(slots.get(*name), Some(None) | None))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(RenderError::Missing {
                id: id.to_string(),
                names: missing,
            });
        }

        mapping.render(&slots, self.root_location(), self.options.render_trailing)
    }

    /// Non-throwing render: logs and returns `None` on failure.
    pub fn render_opt(&self, id: &str, params: Params<'_>) -> Option<String> {
        match self.render(id, params) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(resource_id = %id, error = %e, "cannot render URL");
                None
            }
        }
    }

    /// Render with each variable replaced by its `(name)` placeholder.
    pub fn render_pattern(&self, id: &str) -> std::result::Result<String, RenderError> {
        Ok(self.pattern_of(self.mapping(id)?))
    }

    /// Unanchored regex matching the path of `id`.
    pub fn matching_pattern(&self, id: &str) -> std::result::Result<&Regex, RenderError> {
        Ok(self.mapping(id)?.pattern())
    }

    /// Match `url` (scheme, host, query ignored) against the shape of `id`.
    ///
    /// Returns `Ok(None)` when the URL does not match.
    pub fn match_url(
        &self,
        id: &str,
        url: &str,
    ) -> std::result::Result<Option<BTreeMap<String, Value>>, RenderError> {
        let mapping = self.mapping(id)?;
        let (_, _, path, _, _) = split_url(url);
        Ok(mapping.match_path(path))
    }

    /// Positional variable names of `id`, root to leaf.
    pub fn url_variables(&self, id: &str) -> std::result::Result<Vec<String>, RenderError> {
        Ok(self.mapping(id)?.positional().to_vec())
    }
}
