//! `Keyframes` and `KeyframesSelector` (spec.md §3, §4.4).

use indexmap::IndexMap;

use crate::property::Property;

#[derive(Debug, Clone, PartialEq)]
pub struct KeyframesSelector {
  pub offset: String,
  pub properties: IndexMap<String, Property>,
}

impl KeyframesSelector {
  pub fn new(offset: impl Into<String>) -> KeyframesSelector {
    KeyframesSelector { offset: normalize_offset(&offset.into()), properties: IndexMap::new() }
  }

  pub fn add_declaration(&mut self, name: &str, raw_value: &str, important: bool) {
    let property = self.properties.entry(name.to_string()).or_insert_with(|| Property::new(name));
    property.add_declaration(raw_value, important, &[]);
  }

  pub fn keyframes_selectors_equal(a: &KeyframesSelector, b: &KeyframesSelector) -> bool {
    crate::equivalence::maps_equal(&a.properties, &b.properties, Property::properties_equal)
  }
}

/// Normalizes the `from`/`to` keywords to `0%`/`100%` (spec.md §3 invariant).
pub fn normalize_offset(offset: &str) -> String {
  match offset.trim().to_ascii_lowercase().as_str() {
    "from" => "0%".to_string(),
    "to" => "100%".to_string(),
    other => other.to_string(),
  }
}

/// `{ name, rules: condition -> offset -> KeyframesSelector }` (spec.md §3).
///
/// Invariant: re-declaration under the same condition *replaces* prior rules
/// rather than merging, matching CSS `@keyframes` semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframes {
  pub name: String,
  pub rules: IndexMap<String, IndexMap<String, KeyframesSelector>>,
}

impl Keyframes {
  pub fn new(name: impl Into<String>) -> Keyframes {
    Keyframes { name: name.into(), rules: IndexMap::new() }
  }

  /// Replaces whatever rules existed for `condition` with `offsets` wholesale.
  pub fn replace_rules(&mut self, condition: &str, offsets: IndexMap<String, KeyframesSelector>) {
    self.rules.insert(condition.to_string(), offsets);
  }

  pub fn keyframes_equal(a: &Keyframes, b: &Keyframes) -> bool {
    crate::equivalence::maps_equal(&a.rules, &b.rules, |ra, rb| {
      crate::equivalence::maps_equal(ra, rb, KeyframesSelector::keyframes_selectors_equal)
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn keyword_offsets_normalize() {
    assert_eq!(normalize_offset("from"), "0%");
    assert_eq!(normalize_offset("to"), "100%");
    assert_eq!(normalize_offset("50%"), "50%");
  }

  #[test]
  fn redeclaration_replaces_not_merges() {
    let mut k = Keyframes::new("k");
    let mut first = IndexMap::new();
    first.insert("0%".to_string(), KeyframesSelector::new("0%"));
    first.insert("50%".to_string(), KeyframesSelector::new("50%"));
    k.replace_rules("all", first);

    let mut second = IndexMap::new();
    second.insert("0%".to_string(), KeyframesSelector::new("0%"));
    k.replace_rules("all", second);

    assert_eq!(k.rules["all"].len(), 1);
  }
}
