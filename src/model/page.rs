//! `PageSelector` and `MarginBox` (spec.md §3, §4.6).

use indexmap::IndexMap;

use crate::property::Property;

/// The synthetic margin symbol for declarations outside any explicit
/// margin box.
pub const ALL_MARGIN: &str = "@all";

/// Layout-dependent media terms that invalidate a margin box's `size`
/// property per the CSS-page spec (spec.md §4.6).
const SIZE_INVALIDATING_TERMS: [&str; 4] = ["width", "height", "aspect-ratio", "orientation"];

/// Structurally identical to [`crate::model::selector_entry::Selector`],
/// with one override: a `size` property drops any binding whose condition
/// mentions a layout/orientation media term.
#[derive(Debug, Clone, PartialEq)]
pub struct MarginBox {
  pub name: String,
  pub properties: IndexMap<String, Property>,
}

impl MarginBox {
  pub fn new(name: impl Into<String>) -> MarginBox {
    MarginBox { name: name.into(), properties: IndexMap::new() }
  }

  pub fn add_declaration(&mut self, name: &str, raw_value: &str, important: bool, conditions: &[String]) {
    let effective_conditions: Vec<String>;
    let conditions = if name.eq_ignore_ascii_case("size") {
      effective_conditions = conditions
        .iter()
        .filter(|c| {
          let lower = c.to_ascii_lowercase();
          !SIZE_INVALIDATING_TERMS.iter().any(|term| lower.contains(term))
        })
        .cloned()
        .collect();
      &effective_conditions
    } else {
      conditions
    };

    if conditions.is_empty() && name.eq_ignore_ascii_case("size") {
      // Every condition for this declaration was invalidated; nothing to store.
      return;
    }

    let property = self.properties.entry(name.to_string()).or_insert_with(|| Property::new(name));
    property.add_declaration(raw_value, important, conditions);
  }

  pub fn margin_boxes_equal(a: &MarginBox, b: &MarginBox) -> bool {
    crate::equivalence::maps_equal(&a.properties, &b.properties, Property::properties_equal)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageSelector {
  pub page_selector: String,
  pub margin_boxes: IndexMap<String, MarginBox>,
}

impl PageSelector {
  pub fn new(page_selector: impl Into<String>) -> PageSelector {
    PageSelector { page_selector: page_selector.into(), margin_boxes: IndexMap::new() }
  }

  pub fn margin_box_mut(&mut self, symbol: &str) -> &mut MarginBox {
    self.margin_boxes.entry(symbol.to_string()).or_insert_with(|| MarginBox::new(symbol))
  }

  pub fn page_selectors_equal(a: &PageSelector, b: &PageSelector) -> bool {
    crate::equivalence::maps_equal(&a.margin_boxes, &b.margin_boxes, MarginBox::margin_boxes_equal)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn size_dropped_when_condition_mentions_width() {
    let mut margin = MarginBox::new(ALL_MARGIN);
    margin.add_declaration("size", "auto", false, &["screen and (width: 300px)".to_string()]);
    assert!(margin.properties.get("size").map_or(true, |p| p.bindings.is_empty()));
  }

  #[test]
  fn size_kept_when_condition_is_unrelated() {
    let mut margin = MarginBox::new(ALL_MARGIN);
    margin.add_declaration("size", "auto", false, &["print".to_string()]);
    assert!(margin.properties["size"].bindings.contains_key("print"));
  }
}
