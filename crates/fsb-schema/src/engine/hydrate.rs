//! Hydration.
//!
//! `fill` walks the tree in declared order and writes one value per bound
//! component. The value comes from the first source that has one:
//!
//! 1. a mapping already written by an ancestor from explicit data or a default
//! 2. the explicit data passed to `fill`
//! 3. the store as it was before the pass (`FillStrategy::Merge` only)
//! 4. the component's default
//! 5. `null`
//!
//! Children are hydrated after their parent, so a parent's default mapping
//! seeds its children and child defaults only fill the keys it left out.

use std::rc::Rc;

use fsb_state::{data_get, data_has, data_set};
use serde_json::{Map, Value};

use crate::component::Component;
use crate::config::FillStrategy;
use crate::error::Result;
use crate::hooks::{HookContext, HookKind};
use crate::schema::{Schema, SharedStore};

/// Switches for a single `fill_with` pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillOptions {
    /// Fire `after_state_hydrated` hooks.
    pub call_hydration_hooks: bool,
    /// Write `null` at every bound path still missing after the pass.
    pub fill_missing_with_null: bool,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            call_hydration_hooks: true,
            fill_missing_with_null: true,
        }
    }
}

impl FillOptions {
    /// Options that skip `after_state_hydrated`.
    pub fn without_hooks() -> Self {
        Self {
            call_hydration_hooks: false,
            ..Default::default()
        }
    }
}

struct FillPass {
    store: SharedStore,
    strategy: FillStrategy,
    options: FillOptions,
    /// Explicit data placed under the schema's path.
    explicit: Option<Value>,
    /// Store contents below the schema's path when the pass started.
    existing: Value,
    /// Values written from explicit data or defaults, which descendants keep.
    claimed: Value,
}

impl FillPass {
    /// The value to write at `path`, and whether descendants must keep it.
    /// `None` when an ancestor already wrote it.
    fn incoming(&self, component: &Component, path: &str) -> Option<(Value, bool)> {
        if data_has(&self.claimed, path) {
            return None;
        }
        if let Some(value) = self
            .explicit
            .as_ref()
            .and_then(|explicit| data_get(explicit, path))
        {
            return Some((value.clone(), true));
        }
        if self.strategy == FillStrategy::Merge
            && let Some(value) = data_get(&self.existing, path)
        {
            return Some((value.clone(), false));
        }
        if let Some(value) = component.get_default_state() {
            return Some((value, true));
        }
        Some((Value::Null, false))
    }
}

/// Place `value` at `path` in an otherwise empty mapping.
fn rooted(path: &str, value: Option<Value>) -> Value {
    let mut root = Value::Object(Map::new());
    if let Some(value) = value {
        data_set(&mut root, path, value);
    }
    root
}

impl Schema {
    /// Hydrate the tree with default options.
    ///
    /// `state` is the explicit data for this schema, keyed relative to its
    /// state path.
    pub fn fill(&self, state: Option<Value>) -> Result<()> {
        self.fill_with(state, FillOptions::default())
    }

    /// Hydrate the tree.
    ///
    /// Resets update de-duplication and the once-per-fill
    /// `before_state_dehydrated` marker for every component below this schema.
    pub fn fill_with(&self, state: Option<Value>, options: FillOptions) -> Result<()> {
        let store = self.store()?;
        let strategy = self.config().fill_strategy;
        let path = self.get_state_path();
        tracing::debug!(
            path = %path,
            strategy = ?strategy,
            explicit = state.is_some(),
            "Filling schema"
        );

        let existing = rooted(&path, store.borrow().get(&path));
        let explicit = state.map(|state| rooted(&path, Some(state)));

        for component in self.flat_components() {
            component.reset_runtime_state();
        }

        let mut pass = FillPass {
            store: Rc::clone(&store),
            strategy,
            options,
            explicit,
            existing,
            claimed: Value::Object(Map::new()),
        };
        self.hydrate_components(&mut pass)?;

        if options.fill_missing_with_null {
            self.fill_missing_with_null(&store);
        }
        tracing::debug!(path = %path, "Schema filled");
        Ok(())
    }

    /// Fire `after_state_hydrated` for every component, children before their
    /// parent.
    pub fn call_after_state_hydrated(&self) -> Result<()> {
        for component in self.get_components() {
            if let Some(child) = component.child() {
                child.call_after_state_hydrated()?;
            }
            component.call_after_state_hydrated()?;
        }
        Ok(())
    }

    fn hydrate_components(&self, pass: &mut FillPass) -> Result<()> {
        for component in self.get_components() {
            component.hydrate(pass)?;
        }
        Ok(())
    }

    fn fill_missing_with_null(&self, store: &SharedStore) {
        for component in self.get_components() {
            if component.has_state_path() {
                let path = component.get_state_path();
                let missing = !store.borrow().has(&path);
                if missing {
                    tracing::trace!(path = %path, "Filling missing state with null");
                    store.borrow_mut().set(&path, Value::Null);
                }
            }
            if let Some(child) = component.child() {
                child.fill_missing_with_null(store);
            }
        }
    }
}

impl Component {
    fn hydrate(&self, pass: &mut FillPass) -> Result<()> {
        if self.has_state_path() {
            let path = self.get_state_path();
            match pass.incoming(self, &path) {
                Some((value, claims)) => {
                    if claims {
                        data_set(&mut pass.claimed, &path, value.clone());
                    }
                    pass.store.borrow_mut().set(&path, value);
                }
                None => tracing::trace!(path = %path, "State already written by parent"),
            }
        }

        if let Some(child) = self.child() {
            child.hydrate_components(pass)?;
        }

        if pass.options.call_hydration_hooks {
            self.call_after_state_hydrated()?;
        }
        Ok(())
    }

    /// Fire `after_state_hydrated` with the component's current state.
    pub fn call_after_state_hydrated(&self) -> Result<()> {
        let Some(hook) = self.hooks().after_state_hydrated else {
            return Ok(());
        };
        let state = self.get_state()?;
        self.run_hook(HookKind::AfterStateHydrated, || {
            hook(&HookContext::new(self, state, None))
        })
    }
}
