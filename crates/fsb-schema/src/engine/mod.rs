//! State lifecycle passes over a schema tree.
//!
//! - `hydrate`: `fill` writes incoming, existing or default state for every
//!   component and fires `after_state_hydrated`
//! - `update`: `update_state` writes one path and fires `after_state_updated`
//!   on the component owning it and on its ancestors
//! - `dehydrate`: `dehydrate_state` builds the submitted mapping from the
//!   components that pass `is_dehydrated`
//!
//! All passes walk components in declared order and read the store through
//! short borrows, so hooks are free to read and write state.

mod dehydrate;
mod hydrate;
mod update;

pub use hydrate::FillOptions;
