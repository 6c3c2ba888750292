//! `Property` and the per-sheet cascade (spec.md §3, §4.3).

use indexmap::IndexMap;

use crate::value::{Value, ValueFactory};

pub const ALL_CONDITION: &str = "all";

/// A `(value, important)` pair stored under one condition (spec.md
/// glossary: "Binding").
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
  pub value: Value,
  pub important: bool,
}

impl Binding {
  /// Two bindings compare equal iff values are equal AND importance flags
  /// match (spec.md §4.8, last paragraph).
  pub fn bindings_equal(a: &Binding, b: &Binding) -> bool {
    a.important == b.important && Value::values_equal(&a.value, &b.value)
  }
}

/// `{ name, bindings: condition -> Value }` (spec.md §3).
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
  pub name: String,
  pub bindings: IndexMap<String, Binding>,
}

impl Property {
  pub fn new(name: impl Into<String>) -> Property {
    Property { name: name.into(), bindings: IndexMap::new() }
  }

  /// Applies one declaration's value under every condition in `conditions`
  /// (or just `all` if the list is empty), following the three-rule cascade
  /// of spec.md §4.3.
  pub fn add_declaration(&mut self, raw_value: &str, important: bool, conditions: &[String]) {
    let value = ValueFactory::from_resolved(raw_value);
    if conditions.is_empty() {
      self.merge_one(ALL_CONDITION, value, important);
    } else {
      for condition in conditions {
        self.merge_one(condition, value.clone(), important);
      }
    }
  }

  fn merge_one(&mut self, condition: &str, value: Value, important: bool) {
    let all_important = self.bindings.get(ALL_CONDITION).map(|b| b.important).unwrap_or(false);

    // Rule 1: no binding for `condition`, and no important `all` binding.
    if !self.bindings.contains_key(condition) && !all_important {
      self.bindings.insert(condition.to_string(), Binding { value, important });
      return;
    }

    // Rule 2: an important `all` binding exists and `condition != all`.
    if all_important && condition != ALL_CONDITION {
      if important {
        self.bindings.insert(condition.to_string(), Binding { value, important });
      } else {
        let all_binding = self.bindings.get(ALL_CONDITION).unwrap().clone();
        self.bindings.insert(condition.to_string(), all_binding);
      }
      return;
    }

    // Rule 3: a binding for `condition` exists; replace iff new wins or ties.
    if let Some(existing) = self.bindings.get(condition) {
      if important || !existing.important {
        self.bindings.insert(condition.to_string(), Binding { value, important });
      }
    } else {
      self.bindings.insert(condition.to_string(), Binding { value, important });
    }
  }

  /// Structural equality: same condition keys, pairwise-equal bindings
  /// (spec.md §4.9).
  pub fn properties_equal(a: &Property, b: &Property) -> bool {
    crate::equivalence::maps_equal(&a.bindings, &b.bindings, Binding::bindings_equal)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn conds(s: &[&str]) -> Vec<String> {
    s.iter().map(|s| s.to_string()).collect()
  }

  #[test]
  fn important_survives_later_non_important() {
    let mut p = Property::new("color");
    p.add_declaration("red", true, &conds(&["all"]));
    p.add_declaration("blue", false, &conds(&["all"]));
    assert_eq!(p.bindings["all"].value, Value::Literal("red".to_string()));
    assert!(p.bindings["all"].important);
  }

  #[test]
  fn later_important_overrides_earlier_important() {
    let mut p = Property::new("color");
    p.add_declaration("red", true, &conds(&["all"]));
    p.add_declaration("blue", true, &conds(&["all"]));
    assert_eq!(p.bindings["all"].value, Value::Literal("blue".to_string()));
  }

  #[test]
  fn later_non_important_overrides_earlier_non_important() {
    let mut p = Property::new("color");
    p.add_declaration("red", false, &conds(&["all"]));
    p.add_declaration("blue", false, &conds(&["all"]));
    assert_eq!(p.bindings["all"].value, Value::Literal("blue".to_string()));
  }

  #[test]
  fn important_all_propagates_to_new_condition() {
    let mut p = Property::new("color");
    p.add_declaration("red", true, &conds(&["all"]));
    p.add_declaration("blue", false, &conds(&["screen"]));
    assert_eq!(p.bindings["screen"].value, Value::Literal("red".to_string()));
    assert!(p.bindings["screen"].important);
  }

  #[test]
  fn important_condition_beats_important_all() {
    let mut p = Property::new("color");
    p.add_declaration("red", true, &conds(&["all"]));
    p.add_declaration("green", true, &conds(&["screen"]));
    assert_eq!(p.bindings["screen"].value, Value::Literal("green".to_string()));
  }
}
