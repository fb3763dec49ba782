//! Update propagation.

use fsb_state::{data_set, is_ancestor_or_self};
use serde_json::{Map, Value};

use crate::component::Component;
use crate::error::Result;
use crate::hooks::{HookContext, HookKind};
use crate::schema::Schema;

impl Schema {
    /// Fire `after_state_updated` for the deepest component whose path is
    /// `path` or an ancestor of it, then for each of its ancestor components.
    ///
    /// Transparent components bind their container's path, so they fire for
    /// any change inside the container unless a descendant owns the path and
    /// reaches them by bubbling.
    ///
    /// Returns whether any component claimed the path.
    pub fn call_after_state_updated(&self, path: &str) -> Result<bool> {
        let in_container = is_ancestor_or_self(&self.get_state_path(), path);
        let mut claimed = false;

        for component in self.get_components() {
            if !component.has_state_path() {
                let child_claimed = match component.child() {
                    Some(child) if !claimed => child.call_after_state_updated(path)?,
                    _ => false,
                };
                if child_claimed {
                    claimed = true;
                } else if in_container {
                    component.fire_after_state_updated()?;
                }
                continue;
            }

            if claimed || !is_ancestor_or_self(&component.get_state_path(), path) {
                continue;
            }
            claimed = true;

            let child_claimed = match component.child() {
                Some(child) => child.call_after_state_updated(path)?,
                None => false,
            };
            if !child_claimed {
                component.call_after_state_updated(true)?;
            }
        }
        Ok(claimed)
    }

    /// Write `value` at the absolute `path` and notify the owning component.
    ///
    /// Hooks fired by this call see the state before the write through
    /// [`HookContext::old`]. Calls may nest: a hook can update another path.
    pub fn update_state(&self, path: &str, value: Value) -> Result<bool> {
        let root = self.root_schema();
        let store = root.store()?;

        let root_path = root.get_state_path();
        let mut snapshot = Value::Object(Map::new());
        if let Some(current) = store.borrow().get(&root_path) {
            data_set(&mut snapshot, &root_path, current);
        }

        tracing::debug!(path = %path, "Updating state");
        root.node.old_states.borrow_mut().push(snapshot);
        store.borrow_mut().set(path, value);
        let handled = root.call_after_state_updated(path);
        root.node.old_states.borrow_mut().pop();

        let handled = handled?;
        if !handled {
            tracing::debug!(path = %path, "No component owns the updated path");
        }
        Ok(handled)
    }
}

impl Component {
    /// Fire this component's `after_state_updated`, then optionally every
    /// ancestor's.
    pub fn call_after_state_updated(&self, bubble: bool) -> Result<()> {
        self.fire_after_state_updated()?;
        if bubble {
            let mut parent = self.parent_component();
            while let Some(component) = parent {
                component.fire_after_state_updated()?;
                parent = component.parent_component();
            }
        }
        Ok(())
    }

    fn fire_after_state_updated(&self) -> Result<()> {
        let state = self.get_state()?;
        let dedupe = self.schema_config().dedupe_updates;

        if dedupe {
            let mut runtime = self.node.runtime.borrow_mut();
            if runtime.last_updated_state.as_ref() == Some(&state) {
                tracing::debug!(
                    path = %self.get_state_path(),
                    "State unchanged since last update hook, skipping"
                );
                return Ok(());
            }
            runtime.last_updated_state = Some(state.clone());
        }

        let Some(hook) = self.hooks().after_state_updated else {
            return Ok(());
        };
        let old = self
            .container()
            .and_then(|container| container.old_state(&self.get_state_path()));
        let result = self.run_hook(HookKind::AfterStateUpdated, || {
            hook(&HookContext::new(self, state, old))
        });
        if result.is_err() && dedupe {
            // Only successful runs count towards de-duplication.
            self.node.runtime.borrow_mut().last_updated_state = None;
        }
        result
    }
}
