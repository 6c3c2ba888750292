//! `Supports` (spec.md §3, §4.5): a nested engine per `@supports` condition.

use indexmap::IndexMap;

use crate::model::engine::Engine;

/// `{ name, rules: condition -> Engine }` (spec.md §3).
///
/// Two `@supports` blocks whose conditions overlap are merged entity-wise
/// into one nested [`Engine`] rather than kept as separate entries
/// (spec.md §4.5).
#[derive(Debug, Clone, PartialEq)]
pub struct Supports {
  pub name: String,
  pub rules: IndexMap<String, Engine>,
}

impl Supports {
  pub fn new(name: impl Into<String>) -> Supports {
    Supports { name: name.into(), rules: IndexMap::new() }
  }

  pub fn engine_for(&mut self, condition: &str) -> &mut Engine {
    self.rules.entry(condition.to_string()).or_insert_with(Engine::new)
  }

  pub fn supports_equal(a: &Supports, b: &Supports) -> bool {
    crate::equivalence::maps_equal(&a.rules, &b.rules, Engine::engines_equal)
  }
}
