//! Lifecycle hooks and the `get`/`set` helpers they receive.
//!
//! Hooks are plain closures registered on a component. Every hook receives a
//! [`HookContext`] with the component, its current state and, for update hooks,
//! the state it had before the triggering write.
//!
//! ```
//! use fsb_schema::Component;
//! use serde_json::json;
//!
//! let slug = Component::field("slug");
//! let title = Component::field("title").after_state_updated(|ctx| {
//!     let title = ctx.state().as_str().unwrap_or_default().to_lowercase();
//!     ctx.set().set("slug", json!(title))?;
//!     Ok(())
//! });
//! # let _ = (slug, title);
//! ```

use std::error::Error;
use std::fmt;
use std::rc::Rc;

use fsb_state::PathExpression;
use serde_json::Value;

use crate::component::Component;
use crate::error::Result;

/// Error type hooks may return.
pub type HookError = Box<dyn Error + Send + Sync>;

/// Result type returned by hooks.
pub type HookResult<T = ()> = std::result::Result<T, HookError>;

/// Hook run for its side effects.
pub type StateHook = Rc<dyn Fn(&HookContext<'_>) -> HookResult>;

/// Hook that maps a state value to a new one.
pub type TransformHook = Rc<dyn Fn(&HookContext<'_>) -> HookResult<Value>>;

/// The lifecycle points a component can hook into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// After `fill` wrote the component's state.
    AfterStateHydrated,
    /// After a write at or below the component's path.
    AfterStateUpdated,
    /// Before the component's state is read for dehydration.
    BeforeStateDehydrated,
    /// Transforms the state written to the dehydrated output.
    DehydrateStateUsing,
    /// Transforms the component's value in an already dehydrated mapping.
    MutateDehydratedStateUsing,
}

impl HookKind {
    /// Name of the builder method that registers this hook.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AfterStateHydrated => "after_state_hydrated",
            Self::AfterStateUpdated => "after_state_updated",
            Self::BeforeStateDehydrated => "before_state_dehydrated",
            Self::DehydrateStateUsing => "dehydrate_state_using",
            Self::MutateDehydratedStateUsing => "mutate_dehydrated_state_using",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hooks registered on one component.
#[derive(Clone, Default)]
pub(crate) struct Hooks {
    pub(crate) after_state_hydrated: Option<StateHook>,
    pub(crate) after_state_updated: Option<StateHook>,
    pub(crate) before_state_dehydrated: Option<StateHook>,
    pub(crate) dehydrate_state_using: Option<TransformHook>,
    pub(crate) mutate_dehydrated_state_using: Option<TransformHook>,
}

impl Hooks {
    pub(crate) fn registered(&self) -> Vec<HookKind> {
        [
            (self.after_state_hydrated.is_some(), HookKind::AfterStateHydrated),
            (self.after_state_updated.is_some(), HookKind::AfterStateUpdated),
            (self.before_state_dehydrated.is_some(), HookKind::BeforeStateDehydrated),
            (self.dehydrate_state_using.is_some(), HookKind::DehydrateStateUsing),
            (
                self.mutate_dehydrated_state_using.is_some(),
                HookKind::MutateDehydratedStateUsing,
            ),
        ]
        .into_iter()
        .filter_map(|(present, kind)| present.then_some(kind))
        .collect()
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.registered()).finish()
    }
}

/// Arguments passed to a hook.
pub struct HookContext<'a> {
    component: &'a Component,
    state: Value,
    old: Option<Value>,
}

impl<'a> HookContext<'a> {
    pub(crate) fn new(component: &'a Component, state: Value, old: Option<Value>) -> Self {
        Self {
            component,
            state,
            old,
        }
    }

    /// The component that owns the hook.
    pub fn component(&self) -> &'a Component {
        self.component
    }

    /// The component's state when the hook was invoked.
    pub fn state(&self) -> &Value {
        &self.state
    }

    /// The state before the write that triggered an update hook. `None` for
    /// other hooks and for writes that did not go through `update_state`.
    pub fn old(&self) -> Option<&Value> {
        self.old.as_ref()
    }

    /// Read helper bound to the component.
    pub fn get(&self) -> Get<'a> {
        Get::new(self.component)
    }

    /// Write helper bound to the component.
    pub fn set(&self) -> Set<'a> {
        Set::new(self.component)
    }
}

impl fmt::Debug for HookContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookContext")
            .field("component", &self.component.get_state_path())
            .field("state", &self.state)
            .field("old", &self.old)
            .finish()
    }
}

/// Reads other components' state relative to a component.
///
/// Relative expressions resolve against the component's container path, so a
/// plain key names a sibling and each leading `../` climbs one level.
#[derive(Debug, Clone, Copy)]
pub struct Get<'a> {
    component: &'a Component,
}

impl<'a> Get<'a> {
    pub(crate) fn new(component: &'a Component) -> Self {
        Self { component }
    }

    /// Resolve `expression` to an absolute store path.
    pub fn path(&self, expression: &str, is_absolute: bool) -> Result<String> {
        self.component
            .resolve_path(&PathExpression::parse(expression, is_absolute))
    }

    /// Read the value `expression` names. Missing paths read as `null`.
    pub fn value(&self, expression: &str, is_absolute: bool) -> Result<Value> {
        let path = self.path(expression, is_absolute)?;
        let store = self.component.store()?;
        let value = store.borrow().get(&path).unwrap_or(Value::Null);
        Ok(value)
    }

    /// Read a relative expression.
    pub fn get(&self, expression: &str) -> Result<Value> {
        self.value(expression, false)
    }

    /// Read an absolute path.
    pub fn get_absolute(&self, path: &str) -> Result<Value> {
        self.value(path, true)
    }
}

/// Writes other components' state relative to a component.
#[derive(Debug, Clone, Copy)]
pub struct Set<'a> {
    component: &'a Component,
}

impl<'a> Set<'a> {
    pub(crate) fn new(component: &'a Component) -> Self {
        Self { component }
    }

    /// Write `value` at the path `expression` names, without firing any hooks.
    pub fn value(&self, expression: &str, value: Value, is_absolute: bool) -> Result<()> {
        let path = Get::new(self.component).path(expression, is_absolute)?;
        let store = self.component.store()?;
        store.borrow_mut().set(&path, value);
        Ok(())
    }

    /// Write a relative expression.
    pub fn set(&self, expression: &str, value: Value) -> Result<()> {
        self.value(expression, value, false)
    }

    /// Write an absolute path.
    pub fn set_absolute(&self, path: &str, value: Value) -> Result<()> {
        self.value(path, value, true)
    }

    /// Write a relative expression and fire `after_state_updated` for the
    /// component that owns the written path.
    pub fn set_and_notify(&self, expression: &str, value: Value) -> Result<bool> {
        let path = Get::new(self.component).path(expression, false)?;
        self.component.root_schema()?.update_state(&path, value)
    }
}
