//! Session-scoped operator registry.
//!
//! Each evaluator owns its registry. Registering a custom operation extends
//! that one registry only; there is no process-wide operator table.

use std::collections::HashMap;
use std::sync::Arc;

use crate::operators;
use crate::types::OperatorDefinition;

#[derive(Clone, Default)]
pub struct OperatorRegistry {
    map: HashMap<String, Arc<OperatorDefinition>>,
}

impl OperatorRegistry {
    /// An empty registry. Nothing evaluates except literals.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in operator.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for def in operators::all_operators() {
            registry.register_operation(def);
        }
        registry
    }

    /// Registers `def` under its name and aliases.
    ///
    /// A later registration of the same id replaces the earlier one; the
    /// replaced definition is returned.
    pub fn register_operation(&mut self, def: OperatorDefinition) -> Option<Arc<OperatorDefinition>> {
        let def = Arc::new(def);
        for alias in &def.aliases {
            self.map.insert(alias.clone(), Arc::clone(&def));
        }
        self.map.insert(def.name.clone(), def)
    }

    pub fn get(&self, id: &str) -> Option<&Arc<OperatorDefinition>> {
        self.map.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.map.contains_key(id)
    }

    /// All registered ids (names and aliases), sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.map.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl std::fmt::Debug for OperatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorRegistry").field("ids", &self.ids()).finish()
    }
}
