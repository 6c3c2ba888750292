//! `Selector` (spec.md §3): a canonical selector name plus its properties.

use indexmap::IndexMap;

use crate::property::Property;

#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
  pub canonical_name: String,
  pub properties: IndexMap<String, Property>,
}

impl Selector {
  pub fn new(canonical_name: impl Into<String>) -> Selector {
    Selector { canonical_name: canonical_name.into(), properties: IndexMap::new() }
  }

  pub fn add_declaration(&mut self, name: &str, raw_value: &str, important: bool, conditions: &[String]) {
    let property = self.properties.entry(name.to_string()).or_insert_with(|| Property::new(name));
    property.add_declaration(raw_value, important, conditions);
  }

  pub fn selectors_equal(a: &Selector, b: &Selector) -> bool {
    crate::equivalence::maps_equal(&a.properties, &b.properties, Property::properties_equal)
  }
}
