//! Static or computed boolean component settings.

use std::fmt;
use std::rc::Rc;

use crate::component::Component;

/// Predicate evaluated against the component that owns it.
pub type Predicate = Rc<dyn Fn(&Component) -> bool>;

/// A boolean setting such as `hidden` or `dehydrated`.
///
/// Dynamic flags are evaluated every time the setting is read, so they can
/// depend on state that changes between hydration and dehydration.
#[derive(Clone)]
pub enum Flag {
    /// A fixed value.
    Static(bool),
    /// Computed from the component at evaluation time.
    Dynamic(Predicate),
}

impl Flag {
    /// Create a dynamic flag.
    pub fn when(predicate: impl Fn(&Component) -> bool + 'static) -> Self {
        Self::Dynamic(Rc::new(predicate))
    }

    /// Evaluate for `component`.
    pub fn evaluate(&self, component: &Component) -> bool {
        match self {
            Self::Static(value) => *value,
            Self::Dynamic(predicate) => predicate(component),
        }
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        Self::Static(value)
    }
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}
