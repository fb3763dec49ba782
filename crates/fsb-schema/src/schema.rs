//! Schema containers.
//!
//! A [`Schema`] holds an ordered list of components. The root schema of a tree
//! owns the state store handle and the [`SchemaConfig`]; nested schemas belong
//! to a component and find both by walking up to the root.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::{Rc, Weak};

use fsb_state::{StateStore, data_get, join};
use serde_json::Value;

use crate::component::{Component, ComponentNode};
use crate::config::SchemaConfig;
use crate::error::{Result, SchemaError};

/// Store handle shared by every component of a tree.
pub type SharedStore = Rc<RefCell<dyn StateStore>>;

pub(crate) struct SchemaNode {
    pub(crate) state_path: RefCell<Option<String>>,
    pub(crate) components: RefCell<Vec<Component>>,
    pub(crate) parent: RefCell<Weak<ComponentNode>>,
    pub(crate) store: Option<SharedStore>,
    pub(crate) config: Cell<SchemaConfig>,
    /// Store snapshots taken by nested `update_state` calls, innermost last.
    pub(crate) old_states: RefCell<Vec<Value>>,
}

/// An ordered container of components.
#[derive(Clone)]
pub struct Schema {
    pub(crate) node: Rc<SchemaNode>,
}

impl Schema {
    fn with_store(store: Option<SharedStore>) -> Self {
        Self {
            node: Rc::new(SchemaNode {
                state_path: RefCell::new(None),
                components: RefCell::new(Vec::new()),
                parent: RefCell::new(Weak::new()),
                store,
                config: Cell::new(SchemaConfig::default()),
                old_states: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Create a schema to nest under a component.
    pub fn new() -> Self {
        Self::with_store(None)
    }

    /// Create the root schema of a tree, bound to `store`.
    pub fn root<S>(store: Rc<RefCell<S>>) -> Self
    where
        S: StateStore + 'static,
    {
        let store: SharedStore = store;
        Self::with_store(Some(store))
    }

    pub(crate) fn from_node(node: Rc<SchemaNode>) -> Self {
        Self { node }
    }

    /// Set the path segment this schema adds below its parent component.
    pub fn state_path(self, segment: impl Into<String>) -> Self {
        let segment = join([segment.into().as_str()]);
        *self.node.state_path.borrow_mut() = (!segment.is_empty()).then_some(segment);
        self
    }

    /// Set the configuration.
    ///
    /// Only a root schema's configuration is read. Nested schemas use their
    /// root's, so calling this on a schema mounted under a component has no
    /// effect.
    pub fn with_config(self, config: SchemaConfig) -> Self {
        self.node.config.set(config);
        self
    }

    /// Replace the schema's components.
    ///
    /// # Errors
    ///
    /// Fails if a component is already mounted elsewhere (or listed twice) or
    /// two components share an explicit key.
    pub fn components(self, components: Vec<Component>) -> Result<Self> {
        let mut keys = BTreeSet::new();
        for component in &components {
            let key = component.node.config.borrow().key.clone();
            if let Some(key) = key
                && !keys.insert(key.clone())
            {
                return Err(SchemaError::DuplicateKey { key });
            }
        }

        for component in &components {
            component.mount(&self.node)?;
        }

        let previous = self.node.components.replace(components);
        for component in previous {
            *component.node.container.borrow_mut() = Weak::new();
        }
        Ok(self)
    }

    // =========================================================================
    // Tree navigation
    // =========================================================================

    /// True for the schema that owns the store.
    pub fn is_root(&self) -> bool {
        self.node.store.is_some()
    }

    /// The component this schema is nested under.
    pub fn parent_component(&self) -> Option<Component> {
        self.node
            .parent
            .borrow()
            .upgrade()
            .map(Component::from_node)
    }

    /// The topmost schema reachable from this one.
    pub fn root_schema(&self) -> Schema {
        let mut current = self.clone();
        while let Some(parent) = current
            .parent_component()
            .and_then(|component| component.container())
        {
            current = parent;
        }
        current
    }

    /// The store bound to the root schema.
    pub fn store(&self) -> Result<SharedStore> {
        self.root_schema()
            .node
            .store
            .clone()
            .ok_or_else(|| SchemaError::StoreNotBound {
                path: self.get_state_path(),
            })
    }

    /// The root schema's configuration.
    pub fn config(&self) -> SchemaConfig {
        self.root_schema().node.config.get()
    }

    /// The schema's direct components, in order.
    pub fn get_components(&self) -> Vec<Component> {
        self.node.components.borrow().clone()
    }

    /// Every component in the tree below this schema, depth first.
    pub fn flat_components(&self) -> Vec<Component> {
        let mut out = Vec::new();
        for component in self.get_components() {
            let child = component.child();
            out.push(component);
            if let Some(child) = child {
                out.extend(child.flat_components());
            }
        }
        out
    }

    /// Find a component by key. Components without an explicit key are keyed
    /// by their absolute state path.
    pub fn get_component(&self, key: &str) -> Option<Component> {
        self.flat_components()
            .into_iter()
            .find(|component| component.get_key().as_deref() == Some(key))
    }

    // =========================================================================
    // State
    // =========================================================================

    /// The absolute path of this schema's state.
    pub fn get_state_path(&self) -> String {
        let parent = self
            .parent_component()
            .map(|component| component.get_state_path())
            .unwrap_or_default();
        let own = self.node.state_path.borrow().clone().unwrap_or_default();
        join([parent.as_str(), own.as_str()])
    }

    /// Read the state at this schema's path. A missing path reads as `null`.
    pub fn get_state(&self) -> Result<Value> {
        let store = self.store()?;
        let value = store.borrow().get(&self.get_state_path());
        Ok(value.unwrap_or(Value::Null))
    }

    pub(crate) fn attach_to(&self, parent: &Rc<ComponentNode>) -> Result<()> {
        if self.is_root() || self.node.parent.borrow().upgrade().is_some() {
            return Err(SchemaError::SchemaAlreadyMounted {
                path: self.get_state_path(),
            });
        }
        *self.node.parent.borrow_mut() = Rc::downgrade(parent);
        Ok(())
    }

    pub(crate) fn detach(&self) {
        *self.node.parent.borrow_mut() = Weak::new();
    }

    /// The value at `path` before the innermost running `update_state` wrote.
    pub(crate) fn old_state(&self, path: &str) -> Option<Value> {
        let root = self.root_schema();
        let snapshots = root.node.old_states.borrow();
        snapshots
            .last()
            .and_then(|snapshot| data_get(snapshot, path).cloned())
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("state_path", &self.node.state_path.borrow())
            .field("root", &self.is_root())
            .field("components", &self.node.components.borrow())
            .finish()
    }
}
