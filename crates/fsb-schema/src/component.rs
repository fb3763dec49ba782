//! Schema components.
//!
//! A [`Component`] is a cheap handle to a node in the schema tree. Builder
//! methods configure the node in place and hand the handle back, so a tree is
//! written as one expression:
//!
//! ```
//! use fsb_schema::Component;
//! use serde_json::json;
//!
//! let address = Component::field("address").schema(vec![
//!     Component::field("street"),
//!     Component::field("city").default_state(json!("Paris")),
//! ])?;
//! assert_eq!(address.get_state_path(), "address");
//! # Ok::<(), fsb_schema::SchemaError>(())
//! ```
//!
//! Components without a state path segment are transparent: they group
//! children visually without adding a level to the state tree.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use fsb_state::{PathExpression, join};
use serde_json::Value;

use crate::config::SchemaConfig;
use crate::error::{Result, SchemaError};
use crate::flag::Flag;
use crate::hooks::{Get, HookContext, HookKind, HookResult, Hooks, Set};
use crate::schema::{Schema, SchemaNode, SharedStore};

#[derive(Debug, Default)]
pub(crate) struct ComponentConfig {
    pub(crate) key: Option<String>,
    pub(crate) state_path: Option<String>,
    pub(crate) default_state: Option<Value>,
    pub(crate) hidden: Option<Flag>,
    pub(crate) visible: Option<Flag>,
    pub(crate) disabled: Option<Flag>,
    pub(crate) dehydrated: Option<Flag>,
    pub(crate) dehydrated_when_hidden: bool,
    pub(crate) dehydrated_when_disabled: bool,
    pub(crate) rules: Vec<String>,
    pub(crate) hooks: Hooks,
}

/// Per-fill bookkeeping, cleared by every `fill`.
#[derive(Debug, Default)]
pub(crate) struct RuntimeState {
    /// State passed to the last `after_state_updated` call.
    pub(crate) last_updated_state: Option<Value>,
    /// Whether `before_state_dehydrated` already ran.
    pub(crate) before_dehydrated_called: bool,
}

pub(crate) struct ComponentNode {
    pub(crate) config: RefCell<ComponentConfig>,
    pub(crate) container: RefCell<Weak<SchemaNode>>,
    pub(crate) child: RefCell<Option<Schema>>,
    pub(crate) runtime: RefCell<RuntimeState>,
}

/// A node in the schema tree.
#[derive(Clone)]
pub struct Component {
    pub(crate) node: Rc<ComponentNode>,
}

impl Component {
    /// Create a transparent component.
    pub fn new() -> Self {
        Self {
            node: Rc::new(ComponentNode {
                config: RefCell::new(ComponentConfig::default()),
                container: RefCell::new(Weak::new()),
                child: RefCell::new(None),
                runtime: RefCell::new(RuntimeState::default()),
            }),
        }
    }

    /// Create a component bound to `name` within its container.
    pub fn field(name: impl Into<String>) -> Self {
        Self::new().state_path(name)
    }

    pub(crate) fn from_node(node: Rc<ComponentNode>) -> Self {
        Self { node }
    }

    fn configure(self, apply: impl FnOnce(&mut ComponentConfig)) -> Self {
        apply(&mut self.node.config.borrow_mut());
        self
    }

    /// True if both handles point at the same node.
    pub fn ptr_eq(&self, other: &Component) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    // =========================================================================
    // Builder
    // =========================================================================

    /// Set the key used by `Schema::get_component`.
    pub fn key(self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.configure(|config| config.key = Some(key))
    }

    /// Set the path segment this component adds. An empty segment makes the
    /// component transparent.
    pub fn state_path(self, segment: impl Into<String>) -> Self {
        let segment = join([segment.into().as_str()]);
        self.configure(|config| config.state_path = (!segment.is_empty()).then_some(segment))
    }

    /// Value used by `fill` when no explicit or existing value applies.
    pub fn default_state(self, value: Value) -> Self {
        self.configure(|config| config.default_state = Some(value))
    }

    /// Hide the component.
    pub fn hidden(self) -> Self {
        self.hidden_if(true)
    }

    /// Hide the component when `hidden` is true.
    pub fn hidden_if(self, hidden: bool) -> Self {
        self.configure(|config| config.hidden = Some(Flag::Static(hidden)))
    }

    /// Hide the component whenever `predicate` holds.
    pub fn hidden_when(self, predicate: impl Fn(&Component) -> bool + 'static) -> Self {
        self.configure(|config| config.hidden = Some(Flag::when(predicate)))
    }

    /// Show the component only when `visible` is true.
    pub fn visible_if(self, visible: bool) -> Self {
        self.configure(|config| config.visible = Some(Flag::Static(visible)))
    }

    /// Show the component only while `predicate` holds.
    pub fn visible_when(self, predicate: impl Fn(&Component) -> bool + 'static) -> Self {
        self.configure(|config| config.visible = Some(Flag::when(predicate)))
    }

    /// Disable the component.
    pub fn disabled(self) -> Self {
        self.configure(|config| config.disabled = Some(Flag::Static(true)))
    }

    /// Disable the component whenever `predicate` holds.
    pub fn disabled_when(self, predicate: impl Fn(&Component) -> bool + 'static) -> Self {
        self.configure(|config| config.disabled = Some(Flag::when(predicate)))
    }

    /// Force the component in or out of the dehydrated output.
    pub fn dehydrated(self, dehydrated: bool) -> Self {
        self.configure(|config| config.dehydrated = Some(Flag::Static(dehydrated)))
    }

    /// Include the component in the dehydrated output whenever `predicate`
    /// holds.
    pub fn dehydrated_when(self, predicate: impl Fn(&Component) -> bool + 'static) -> Self {
        self.configure(|config| config.dehydrated = Some(Flag::when(predicate)))
    }

    /// Keep the component in the dehydrated output while hidden.
    pub fn dehydrated_when_hidden(self, dehydrated: bool) -> Self {
        self.configure(|config| config.dehydrated_when_hidden = dehydrated)
    }

    /// Keep the component in the dehydrated output while disabled.
    pub fn dehydrated_when_disabled(self, dehydrated: bool) -> Self {
        self.configure(|config| config.dehydrated_when_disabled = dehydrated)
    }

    /// Add a validation rule.
    pub fn rule(self, rule: impl Into<String>) -> Self {
        let rule = rule.into();
        self.configure(|config| config.rules.push(rule))
    }

    /// Add several validation rules.
    pub fn rules<I, R>(self, rules: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        let rules: Vec<String> = rules.into_iter().map(Into::into).collect();
        self.configure(|config| config.rules.extend(rules))
    }

    /// Add the `required` rule.
    pub fn required(self) -> Self {
        self.rule("required")
    }

    /// Run `hook` after `fill` wrote this component's state.
    pub fn after_state_hydrated(
        self,
        hook: impl Fn(&HookContext<'_>) -> HookResult + 'static,
    ) -> Self {
        self.configure(|config| config.hooks.after_state_hydrated = Some(Rc::new(hook)))
    }

    /// Run `hook` after a write at or below this component's path.
    pub fn after_state_updated(
        self,
        hook: impl Fn(&HookContext<'_>) -> HookResult + 'static,
    ) -> Self {
        self.configure(|config| config.hooks.after_state_updated = Some(Rc::new(hook)))
    }

    /// Run `hook` before this component's state is dehydrated.
    pub fn before_state_dehydrated(
        self,
        hook: impl Fn(&HookContext<'_>) -> HookResult + 'static,
    ) -> Self {
        self.configure(|config| config.hooks.before_state_dehydrated = Some(Rc::new(hook)))
    }

    /// Replace this component's dehydrated value with what `hook` returns.
    pub fn dehydrate_state_using(
        self,
        hook: impl Fn(&HookContext<'_>) -> HookResult<Value> + 'static,
    ) -> Self {
        self.configure(|config| config.hooks.dehydrate_state_using = Some(Rc::new(hook)))
    }

    /// Rewrite this component's value in a dehydrated mapping.
    pub fn mutate_dehydrated_state_using(
        self,
        hook: impl Fn(&HookContext<'_>) -> HookResult<Value> + 'static,
    ) -> Self {
        self.configure(|config| {
            config.hooks.mutate_dehydrated_state_using = Some(Rc::new(hook));
        })
    }

    /// Nest `components` in a child schema.
    pub fn schema(self, components: Vec<Component>) -> Result<Self> {
        let schema = Schema::new().components(components)?;
        self.child_schema(schema)
    }

    /// Attach `schema` as this component's child schema, replacing any
    /// previous one.
    ///
    /// # Errors
    ///
    /// Fails if `schema` is a root schema or already belongs to a component.
    pub fn child_schema(self, schema: Schema) -> Result<Self> {
        schema.attach_to(&self.node)?;
        if let Some(previous) = self.node.child.replace(Some(schema)) {
            previous.detach();
        }
        Ok(self)
    }

    // =========================================================================
    // Tree navigation
    // =========================================================================

    /// The schema this component is mounted in.
    pub fn container(&self) -> Option<Schema> {
        self.node.container.borrow().upgrade().map(Schema::from_node)
    }

    /// The component owning this component's container.
    pub fn parent_component(&self) -> Option<Component> {
        self.container()?.parent_component()
    }

    /// This component's child schema.
    pub fn child(&self) -> Option<Schema> {
        self.node.child.borrow().clone()
    }

    /// The root schema of the tree this component is mounted in.
    ///
    /// # Errors
    ///
    /// Fails with [`SchemaError::StoreNotBound`] for a component that is not
    /// mounted under a root schema.
    pub fn root_schema(&self) -> Result<Schema> {
        let root = self
            .container()
            .map(|container| container.root_schema())
            .filter(Schema::is_root);
        root.ok_or_else(|| SchemaError::StoreNotBound {
            path: self.get_state_path(),
        })
    }

    pub(crate) fn store(&self) -> Result<SharedStore> {
        self.root_schema()?.store()
    }

    pub(crate) fn schema_config(&self) -> SchemaConfig {
        self.container()
            .map(|container| container.config())
            .unwrap_or_default()
    }

    // =========================================================================
    // Identity and paths
    // =========================================================================

    /// The explicit key, falling back to the absolute state path.
    pub fn get_key(&self) -> Option<String> {
        if let Some(key) = self.node.config.borrow().key.clone() {
            return Some(key);
        }
        self.has_state_path().then(|| self.get_state_path())
    }

    /// The segment this component adds to its container's path.
    pub fn get_state_path_segment(&self) -> Option<String> {
        self.node.config.borrow().state_path.clone()
    }

    /// False for transparent components.
    pub fn has_state_path(&self) -> bool {
        self.node.config.borrow().state_path.is_some()
    }

    /// The absolute path of the container this component is mounted in.
    pub fn container_state_path(&self) -> String {
        self.container()
            .map(|container| container.get_state_path())
            .unwrap_or_default()
    }

    /// The absolute path of this component's state. A transparent component
    /// shares its container's path.
    pub fn get_state_path(&self) -> String {
        let segment = self.get_state_path_segment().unwrap_or_default();
        join([self.container_state_path().as_str(), segment.as_str()])
    }

    pub(crate) fn resolve_path(&self, expression: &PathExpression<'_>) -> Result<String> {
        let resolver = self.schema_config().path_resolver();
        Ok(resolver.resolve(&self.container_state_path(), expression)?)
    }

    // =========================================================================
    // State access
    // =========================================================================

    /// Read this component's state. A missing path reads as `null`.
    pub fn get_state(&self) -> Result<Value> {
        let store = self.store()?;
        let value = store.borrow().get(&self.get_state_path());
        Ok(value.unwrap_or(Value::Null))
    }

    /// Write this component's state without firing any hooks.
    pub fn set_state(&self, value: Value) -> Result<()> {
        let store = self.store()?;
        store.borrow_mut().set(&self.get_state_path(), value);
        Ok(())
    }

    /// The configured default state.
    pub fn get_default_state(&self) -> Option<Value> {
        self.node.config.borrow().default_state.clone()
    }

    /// Read helper relative to this component.
    pub fn make_get(&self) -> Get<'_> {
        Get::new(self)
    }

    /// Write helper relative to this component.
    pub fn make_set(&self) -> Set<'_> {
        Set::new(self)
    }

    // =========================================================================
    // Visibility and dehydration
    // =========================================================================

    /// Hidden by its own flags or by any ancestor.
    pub fn is_hidden(&self) -> bool {
        let (hidden, visible) = {
            let config = self.node.config.borrow();
            (config.hidden.clone(), config.visible.clone())
        };
        if hidden.is_some_and(|flag| flag.evaluate(self)) {
            return true;
        }
        if visible.is_some_and(|flag| !flag.evaluate(self)) {
            return true;
        }
        self.parent_component()
            .is_some_and(|parent| parent.is_hidden())
    }

    /// Negation of [`Component::is_hidden`].
    pub fn is_visible(&self) -> bool {
        !self.is_hidden()
    }

    /// Disabled by its own flag or by any ancestor.
    pub fn is_disabled(&self) -> bool {
        let disabled = self.node.config.borrow().disabled.clone();
        if disabled.is_some_and(|flag| flag.evaluate(self)) {
            return true;
        }
        self.parent_component()
            .is_some_and(|parent| parent.is_disabled())
    }

    /// Opted into dehydration while hidden, directly or through an ancestor.
    pub fn is_dehydrated_when_hidden(&self) -> bool {
        self.node.config.borrow().dehydrated_when_hidden
            || self
                .parent_component()
                .is_some_and(|parent| parent.is_dehydrated_when_hidden())
    }

    /// Opted into dehydration while disabled, directly or through an ancestor.
    pub fn is_dehydrated_when_disabled(&self) -> bool {
        self.node.config.borrow().dehydrated_when_disabled
            || self
                .parent_component()
                .is_some_and(|parent| parent.is_dehydrated_when_disabled())
    }

    /// Whether this component's state reaches the dehydrated output.
    ///
    /// An excluded ancestor excludes the whole subtree. Otherwise an explicit
    /// `dehydrated` flag decides; without one, hidden or disabled components
    /// are excluded unless they opted in.
    pub fn is_dehydrated(&self) -> bool {
        if self
            .parent_component()
            .is_some_and(|parent| !parent.is_dehydrated())
        {
            return false;
        }

        let explicit = self.node.config.borrow().dehydrated.clone();
        if let Some(flag) = explicit {
            return flag.evaluate(self);
        }
        if self.is_hidden() && !self.is_dehydrated_when_hidden() {
            return false;
        }
        if self.is_disabled() && !self.is_dehydrated_when_disabled() {
            return false;
        }
        true
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validation rules attached to this component.
    pub fn get_validation_rules(&self) -> Vec<String> {
        self.node.config.borrow().rules.clone()
    }

    /// True if the rules include `required`.
    pub fn is_required(&self) -> bool {
        self.node
            .config
            .borrow()
            .rules
            .iter()
            .any(|rule| rule == "required")
    }

    // =========================================================================
    // Hook plumbing
    // =========================================================================

    pub(crate) fn hooks(&self) -> Hooks {
        self.node.config.borrow().hooks.clone()
    }

    pub(crate) fn run_hook<T>(
        &self,
        kind: HookKind,
        call: impl FnOnce() -> HookResult<T>,
    ) -> Result<T> {
        tracing::trace!(hook = %kind, path = %self.get_state_path(), "Running hook");
        call().map_err(|source| {
            let path = self.get_state_path();
            tracing::warn!(hook = %kind, path = %path, error = %source, "Hook failed");
            SchemaError::Hook {
                hook: kind,
                path,
                source,
            }
        })
    }

    pub(crate) fn mount(&self, container: &Rc<SchemaNode>) -> Result<()> {
        if self.node.container.borrow().upgrade().is_some() {
            return Err(SchemaError::ComponentAlreadyMounted {
                component: self.get_key().unwrap_or_default(),
            });
        }
        *self.node.container.borrow_mut() = Rc::downgrade(container);
        Ok(())
    }

    pub(crate) fn reset_runtime_state(&self) {
        *self.node.runtime.borrow_mut() = RuntimeState::default();
    }
}

impl Default for Component {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.node.config.borrow();
        f.debug_struct("Component")
            .field("key", &config.key)
            .field("state_path", &config.state_path)
            .field("hooks", &config.hooks)
            .field("child", &self.node.child.borrow().is_some())
            .finish()
    }
}
