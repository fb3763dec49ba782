//! Validation rule wiring.
//!
//! Rules are opaque strings collected per state path for an external
//! validator. Nothing here runs them.

use std::collections::BTreeMap;

use crate::schema::Schema;

impl Schema {
    /// Rules of every bound component that will be validated, keyed by
    /// absolute state path.
    ///
    /// Hidden subtrees are skipped unless they are dehydrated while hidden.
    pub fn get_validation_rules(&self) -> BTreeMap<String, Vec<String>> {
        let mut rules = BTreeMap::new();
        self.collect_validation_rules(&mut rules);
        rules
    }

    fn collect_validation_rules(&self, out: &mut BTreeMap<String, Vec<String>>) {
        for component in self.get_components() {
            if component.is_hidden() && !component.is_dehydrated_when_hidden() {
                continue;
            }
            if component.has_state_path() {
                let rules = component.get_validation_rules();
                if !rules.is_empty() {
                    out.entry(component.get_state_path())
                        .or_default()
                        .extend(rules);
                }
            }
            if let Some(child) = component.child() {
                child.collect_validation_rules(out);
            }
        }
    }
}
