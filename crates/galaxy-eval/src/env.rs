//! The definition table: names bound to terms.

use galaxy_types::{Primitive, TermId, TermStore};
use std::collections::HashMap;

/// Name → term table consulted when a reference is first evaluated.
///
/// Populated once at load time from the primitive registry and the parsed
/// equations; later bindings of the same name replace earlier ones.
#[derive(Debug, Clone, Default)]
pub struct Definitions {
    bindings: HashMap<String, TermId>,
}

impl Definitions {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table holding `nil` and every primitive.
    pub fn with_primitives(store: &TermStore) -> Self {
        let mut defs = Self::new();
        defs.define("nil", store.nil());
        for &p in Primitive::ALL {
            defs.define(p.name(), store.primitive(p));
        }
        defs
    }

    /// Bind `name`, returning the previous binding if there was one.
    pub fn define(&mut self, name: &str, term: TermId) -> Option<TermId> {
        self.bindings.insert(name.to_string(), term)
    }

    /// Look up a name.
    pub fn get(&self, name: &str) -> Option<TermId> {
        self.bindings.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
