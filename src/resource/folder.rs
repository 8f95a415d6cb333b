//! Folders: resources that route on a literal path component.
//!
//! # Responsibilities
//! - Map literal child names to child nodes
//! - Resolve the default child when the folder itself is requested
//! - Optionally list children as a menu
//!
//! # Design Decisions
//! - A folder with a default is only enumerable as a leaf when it carries
//!   an explicit id; otherwise every such folder would need one
//! - Reaching a folder without a trailing slash redirects the client to the
//!   slashed URI so relative links resolve inside the folder

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::dispatch::DispatchError;
use crate::mapping::enumerator::Declaration;
use crate::mapping::error::MappingError;
use crate::resource::context::Context;
use crate::resource::tree::NodeId;
use crate::resource::{DeclareBranches, HandleRequest, Identity, Outcome, Resource};

/// Picks a child for a component that names none.
pub type Fallback = Arc<dyn Fn(&mut Context<'_>, &str) -> Option<NodeId> + Send + Sync>;

#[derive(Debug, Clone)]
enum DefaultChild {
    Node(NodeId),
    /// Resolved against the children by name.
    Named(String),
}

/// Container of named children.
pub struct Folder {
    identity: Identity,
    children: BTreeMap<String, NodeId>,
    default: Option<DefaultChild>,
    menu: bool,
    redirect_to_directory: bool,
    fallback: Option<Fallback>,
}

impl Folder {
    pub fn new() -> Self {
        Self::named("Folder")
    }

    /// Folder whose own page lists its children.
    pub fn with_menu() -> Self {
        Self::named("FolderWithMenu").listing()
    }

    pub fn named(type_name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            identity: Identity::new(type_name),
            children: BTreeMap::new(),
            default: None,
            menu: false,
            redirect_to_directory: true,
            fallback: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.identity = self.identity.with_id(id);
        self
    }

    /// Serve a menu of the children when the folder itself is requested.
    pub fn listing(mut self) -> Self {
        self.menu = true;
        self
    }

    pub fn child(mut self, name: impl Into<String>, node: NodeId) -> Self {
        self.children.insert(name.into(), node);
        self
    }

    /// Serve `node` when the folder itself is requested.
    pub fn default_child(mut self, node: NodeId) -> Self {
        self.default = Some(DefaultChild::Node(node));
        self
    }

    /// Like [`Folder::default_child`], by child name. The child may be added
    /// after this call.
    pub fn default_named(mut self, name: impl Into<String>) -> Self {
        self.default = Some(DefaultChild::Named(name.into()));
        self
    }

    pub fn fallback<F>(mut self, fallback: F) -> Self
    where
        F: Fn(&mut Context<'_>, &str) -> Option<NodeId> + Send + Sync + 'static,
    {
        self.fallback = Some(Arc::new(fallback));
        self
    }

    /// Whether a request for the folder without a trailing slash is
    /// redirected to the slashed URI. On by default.
    pub fn redirect_to_directory(mut self, enabled: bool) -> Self {
        self.redirect_to_directory = enabled;
        self
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.children.iter().map(|(name, node)| (name.as_str(), *node))
    }

    fn resolve_default(&self) -> Result<Option<NodeId>, String> {
        match &self.default {
            None => Ok(None),
            Some(DefaultChild::Node(node)) => Ok(Some(*node)),
            Some(DefaultChild::Named(name)) => {
                self.children.get(name).copied().map(Some).ok_or_else(|| name.clone())
            }
        }
    }

    fn render_menu(&self, ctx: &mut Context<'_>) -> Outcome {
        let base = ctx.locator().uri(None);
        let base = base.trim_end_matches('/');
        let mut html = String::from("<h1>Resources menu</h1>\n<ul>\n");
        for name in self.children.keys() {
            html.push_str(&format!("  <li><a href=\"{base}/{name}\">{name}</a></li>\n"));
        }
        html.push_str("</ul>\n");

        let response = ctx.response();
        response.set_content_type("text/html");
        response.write(&html);
        Outcome::Handled
    }

    fn handle_default(&self, ctx: &mut Context<'_>) -> Result<Outcome, DispatchError> {
        if self.menu {
            return Ok(self.render_menu(ctx));
        }
        match self.resolve_default() {
            Ok(Some(node)) => ctx.delegate(node),
            Ok(None) => {
                tracing::debug!("folder has no default");
                Ok(Outcome::NotFound)
            }
            Err(name) => Err(DispatchError::MissingDefaultChild { name }),
        }
    }
}

impl Default for Folder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Folder")
            .field("identity", &self.identity)
            .field("children", &self.children)
            .field("default", &self.default)
            .field("menu", &self.menu)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

impl DeclareBranches for Folder {
    fn declare(&self, decl: &mut Declaration) -> Result<(), MappingError> {
        for (name, node) in &self.children {
            decl.branch_fixed(name.clone(), *node);
        }

        let default = self
            .resolve_default()
            .map_err(|name| MappingError::MissingDefaultChild { name })?;
        let explicit = self.identity.has_explicit_id();
        if let Some(node) = default {
            if explicit {
                decl.serve()?;
            } else if !self.children.values().any(|child| *child == node) {
                decl.branch_anonymous(node);
            }
        }

        if self.menu && !(default.is_some() && explicit) {
            decl.serve()?;
        }
        Ok(())
    }
}

impl HandleRequest for Folder {
    fn handle(&self, ctx: &mut Context<'_>) -> Result<Outcome, DispatchError> {
        let Some(name) = ctx.locator().current().map(str::to_owned) else {
            if !ctx.locator().trailing() && self.redirect_to_directory {
                let target = format!("{}/", ctx.locator().uri(None));
                tracing::debug!(%target, "redirecting folder to directory form");
                ctx.response().redirect(&target);
                return Ok(Outcome::Handled);
            }
            return self.handle_default(ctx);
        };

        let child = match self.children.get(&name) {
            Some(node) => Some(*node),
            None => self.fallback.as_ref().and_then(|fallback| fallback(ctx, &name)),
        };
        let Some(child) = child else {
            tracing::debug!(child = %name, "child not found");
            return Ok(Outcome::NotFound);
        };

        tracing::debug!(child = %name, "child found");
        ctx.locator_mut().advance();
        ctx.delegate(child)
    }
}

impl Resource for Folder {
    fn identity(&self) -> &Identity {
        &self.identity
    }
}
