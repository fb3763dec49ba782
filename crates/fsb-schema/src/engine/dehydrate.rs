//! Dehydration.
//!
//! `dehydrate_state` copies each dehydrated component's state into a fresh
//! mapping, parents before children and in declared order, so later writes win.
//! An excluded component removes its path from the output, which also strips
//! it from an ancestor's raw mapping.

use fsb_state::{data_forget, data_get, data_set};
use serde_json::{Map, Value};

use crate::component::Component;
use crate::error::Result;
use crate::hooks::{HookContext, HookKind};
use crate::schema::Schema;

impl Schema {
    /// Build the submitted mapping, keyed from the store root.
    ///
    /// Runs any `before_state_dehydrated` hook that has not fired since the
    /// last `fill`.
    pub fn dehydrate_state(&self) -> Result<Value> {
        self.call_before_state_dehydrated()?;

        tracing::debug!(path = %self.get_state_path(), "Dehydrating schema");
        let mut state = Value::Object(Map::new());
        self.dehydrate_into(&mut state, true)?;
        Ok(state)
    }

    /// Fire `before_state_dehydrated` for every dehydrated component, parents
    /// first. Each hook fires at most once per fill pass.
    pub fn call_before_state_dehydrated(&self) -> Result<()> {
        for component in self.get_components() {
            if !component.is_dehydrated() {
                continue;
            }
            component.call_before_state_dehydrated()?;
            if let Some(child) = component.child() {
                child.call_before_state_dehydrated()?;
            }
        }
        Ok(())
    }

    /// Apply `mutate_dehydrated_state_using` hooks to an already dehydrated
    /// mapping. Components whose path is missing from `state` are skipped.
    pub fn mutate_dehydrated_state(&self, mut state: Value) -> Result<Value> {
        self.mutate_into(&mut state)?;
        Ok(state)
    }

    fn dehydrate_into(&self, state: &mut Value, dehydrated: bool) -> Result<()> {
        for component in self.get_components() {
            component.dehydrate_into(state, dehydrated)?;
        }
        Ok(())
    }

    fn mutate_into(&self, state: &mut Value) -> Result<()> {
        for component in self.get_components() {
            if !component.is_dehydrated() {
                continue;
            }
            component.mutate_dehydrated_state(state)?;
            if let Some(child) = component.child() {
                child.mutate_into(state)?;
            }
        }
        Ok(())
    }
}

impl Component {
    /// Fire `before_state_dehydrated` unless it already ran since the last
    /// `fill`.
    pub fn call_before_state_dehydrated(&self) -> Result<()> {
        if self.node.runtime.borrow().before_dehydrated_called {
            return Ok(());
        }
        let Some(hook) = self.hooks().before_state_dehydrated else {
            return Ok(());
        };

        let state = self.get_state()?;
        self.run_hook(HookKind::BeforeStateDehydrated, || {
            hook(&HookContext::new(self, state, None))
        })?;
        self.node.runtime.borrow_mut().before_dehydrated_called = true;
        Ok(())
    }

    /// The value this component contributes to the dehydrated mapping.
    pub fn get_dehydrated_state(&self) -> Result<Value> {
        let state = self.get_state()?;
        match self.hooks().dehydrate_state_using {
            Some(hook) => self.run_hook(HookKind::DehydrateStateUsing, || {
                hook(&HookContext::new(self, state, None))
            }),
            None => Ok(state),
        }
    }

    fn dehydrate_into(&self, state: &mut Value, dehydrated: bool) -> Result<()> {
        if !(dehydrated && self.is_dehydrated()) {
            if self.has_state_path() {
                let path = self.get_state_path();
                tracing::trace!(path = %path, "Excluding state from dehydration");
                data_forget(state, &path);
            } else if let Some(child) = self.child() {
                child.dehydrate_into(state, false)?;
            }
            return Ok(());
        }

        if self.has_state_path() {
            let value = self.get_dehydrated_state()?;
            data_set(state, &self.get_state_path(), value);
        }
        if let Some(child) = self.child() {
            child.dehydrate_into(state, true)?;
        }
        Ok(())
    }

    fn mutate_dehydrated_state(&self, state: &mut Value) -> Result<()> {
        if !self.has_state_path() {
            return Ok(());
        }
        let Some(hook) = self.hooks().mutate_dehydrated_state_using else {
            return Ok(());
        };

        let path = self.get_state_path();
        let Some(current) = data_get(state, &path).cloned() else {
            return Ok(());
        };
        let mutated = self.run_hook(HookKind::MutateDehydratedStateUsing, || {
            hook(&HookContext::new(self, current, None))
        })?;
        data_set(state, &path, mutated);
        Ok(())
    }
}
