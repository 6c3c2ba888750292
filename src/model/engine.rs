//! The `Engine` (spec.md §3) and its Evaluator/Equivalence Checker
//! (spec.md §4.1, §4.9).

use indexmap::IndexMap;

use crate::ast::AstNode;
use crate::model::font_face::FontFace;
use crate::model::keyframes::{Keyframes, KeyframesSelector};
use crate::model::page::{MarginBox, PageSelector, ALL_MARGIN};
use crate::model::selector_entry::Selector;
use crate::model::supports::Supports;
use crate::property::ALL_CONDITION;
use crate::selector::canonicalize_list;

/// The root of the semantic model built from one stylesheet (spec.md §3).
///
/// Two stylesheets are semantically equivalent iff their `Engine`s are
/// equivalent entity-family by entity-family (spec.md §4.9).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Engine {
  pub selectors: IndexMap<String, Selector>,
  pub keyframes: IndexMap<String, Keyframes>,
  pub namespaces: IndexMap<String, String>,
  pub pages: IndexMap<String, PageSelector>,
  pub supports: IndexMap<String, Supports>,
  pub font_faces: IndexMap<String, FontFace>,
  pub charset: Option<String>,
  /// Verbatim `(name, value)` text of at-rules this engine does not model,
  /// kept so two stylesheets differing only in an unsupported at-rule are
  /// not reported equivalent (spec.md §4.1, "unsupported" row).
  pub unsupported: IndexMap<String, String>,
}

impl Engine {
  pub fn new() -> Engine {
    Engine::default()
  }

  /// Runs the Evaluator over a parsed node list, starting from the `all`
  /// condition (spec.md §4.1).
  pub fn build(nodes: &[AstNode]) -> Engine {
    let mut engine = Engine::new();
    engine.process_nodes(nodes, &[ALL_CONDITION.to_string()]);
    engine
  }

  pub fn selector_mut(&mut self, canonical_name: &str) -> &mut Selector {
    self.selectors.entry(canonical_name.to_string()).or_insert_with(|| Selector::new(canonical_name))
  }

  fn page_mut(&mut self, condition: &str, page_selector: &str) -> &mut PageSelector {
    let key = page_key(condition, page_selector);
    self.pages.entry(key).or_insert_with(|| PageSelector::new(page_selector))
  }

  fn keyframes_mut(&mut self, name: &str) -> &mut Keyframes {
    self.keyframes.entry(name.to_string()).or_insert_with(|| Keyframes::new(name))
  }

  /// The Evaluator: dispatches each node by kind, threading the active
  /// condition stack (spec.md §4.1 table).
  pub fn process_nodes(&mut self, nodes: &[AstNode], conditions: &[String]) {
    for node in nodes {
      self.process_node(node, conditions);
    }
  }

  fn process_node(&mut self, node: &AstNode, conditions: &[String]) {
    match node {
      AstNode::Rule { selectors, children } => {
        let canonical = canonicalize_list(selectors);
        for child in children {
          match child {
            AstNode::Property { resolved_name, resolved_value } => {
              let important = is_important(resolved_value);
              let value_text = strip_important(resolved_value);
              self.selector_mut(&canonical).add_declaration(resolved_name, value_text, important, conditions);
            }
            other => self.process_node(other, conditions),
          }
        }
      }
      AstNode::Property { .. } => {
        // Top-level declarations outside any rule are not addressable by a
        // selector and carry no semantic weight on their own.
      }
      AstNode::Media { query, children } => {
        let composed = compose_stack(conditions, query);
        self.process_nodes(children, &composed);
      }
      AstNode::Supports { name: _, condition, children } => {
        let nested = self.supports_entry(&canonicalize_supports_condition(condition));
        nested.process_nodes(children, &[ALL_CONDITION.to_string()]);
      }
      AstNode::Directive { name, value, resolved_value, children } => {
        self.process_directive(name, value.as_deref(), resolved_value.as_deref(), children, conditions);
      }
      AstNode::KeyframeRule { .. } => {
        // Only meaningful as a child of an `@keyframes` directive; handled
        // in `process_keyframes`.
      }
      AstNode::Charset { name } => {
        self.charset = Some(name.clone());
      }
      AstNode::Import { .. } => {
        // Resolved (or silently skipped) upstream by the loader before the
        // Evaluator ever sees the tree (spec.md §5, import resolution).
      }
    }
  }

  fn supports_entry(&mut self, condition: &str) -> &mut Engine {
    let key = "@supports".to_string();
    let bucket = self.supports.entry(key.clone()).or_insert_with(|| Supports::new(key));
    bucket.engine_for(condition)
  }

  fn process_directive(
    &mut self,
    name: &str,
    value: Option<&str>,
    resolved_value: Option<&str>,
    children: &[AstNode],
    conditions: &[String],
  ) {
    match name.to_ascii_lowercase().as_str() {
      "@font-face" => self.process_font_face(children, conditions),
      "@page" => self.process_page(value.unwrap_or(""), children, conditions),
      "@namespace" => {
        let prefix = match value.map(str::trim) {
          Some(p) if !p.is_empty() => p.to_string(),
          _ => "default".to_string(),
        };
        self.namespaces.insert(prefix, resolved_value.unwrap_or("").trim().to_string());
      }
      "@keyframes" => self.process_keyframes(value.unwrap_or(""), children, conditions),
      other => {
        let raw = resolved_value.unwrap_or("").to_string();
        for condition in conditions {
          let key = format!("{}\u{0}{}", condition, other);
          self.unsupported.insert(key, raw.clone());
        }
      }
    }
  }

  fn process_font_face(&mut self, children: &[AstNode], conditions: &[String]) {
    let mut face = FontFace::new();
    for child in children {
      if let AstNode::Property { resolved_name, resolved_value } = child {
        face.set_descriptor(resolved_name, resolved_value);
      }
    }
    let face = face.with_defaults();
    if !face.is_valid() {
      return;
    }
    let family = face.family().unwrap_or_default().to_string();
    let src = face.src().unwrap_or_default().to_string();
    for condition in conditions {
      let key = format!("{}\u{0}{}\u{0}{}", condition, family, src);
      self.font_faces.insert(key, face.clone());
    }
  }

  fn process_page(&mut self, page_selector: &str, children: &[AstNode], conditions: &[String]) {
    for condition in conditions {
      let page = self.page_mut(condition, page_selector);
      for child in children {
        match child {
          AstNode::Property { resolved_name, resolved_value } => {
            let important = is_important(resolved_value);
            let value_text = strip_important(resolved_value);
            page.margin_box_mut(ALL_MARGIN).add_declaration(
              resolved_name,
              value_text,
              important,
              &[condition.clone()],
            );
          }
          AstNode::Directive { name: margin_name, children: margin_children, .. } => {
            let margin: &mut MarginBox = page.margin_box_mut(margin_name);
            for margin_child in margin_children {
              if let AstNode::Property { resolved_name, resolved_value } = margin_child {
                let important = is_important(resolved_value);
                let value_text = strip_important(resolved_value);
                margin.add_declaration(resolved_name, value_text, important, &[condition.clone()]);
              }
            }
          }
          _ => {}
        }
      }
    }
  }

  fn process_keyframes(&mut self, name: &str, children: &[AstNode], conditions: &[String]) {
    let mut offsets: IndexMap<String, KeyframesSelector> = IndexMap::new();
    for child in children {
      if let AstNode::KeyframeRule { resolved_value, children: rule_children } = child {
        for offset_text in resolved_value.split(',') {
          let mut selector = KeyframesSelector::new(offset_text.trim());
          for prop in rule_children {
            if let AstNode::Property { resolved_name, resolved_value } = prop {
              let important = is_important(resolved_value);
              let value_text = strip_important(resolved_value);
              selector.add_declaration(resolved_name, value_text, important);
            }
          }
          offsets.insert(selector.offset.clone(), selector);
        }
      }
    }
    let keyframes = self.keyframes_mut(name);
    for condition in conditions {
      keyframes.replace_rules(condition, offsets.clone());
    }
  }

  /// Structural equality over every entity family (spec.md §4.9).
  pub fn engines_equal(a: &Engine, b: &Engine) -> bool {
    a.charset == b.charset
      && crate::equivalence::maps_equal(&a.selectors, &b.selectors, Selector::selectors_equal)
      && crate::equivalence::maps_equal(&a.keyframes, &b.keyframes, Keyframes::keyframes_equal)
      && crate::equivalence::maps_equal(&a.namespaces, &b.namespaces, |x, y| x == y)
      && crate::equivalence::maps_equal(&a.pages, &b.pages, PageSelector::page_selectors_equal)
      && crate::equivalence::maps_equal(&a.supports, &b.supports, Supports::supports_equal)
      && crate::equivalence::maps_equal(&a.font_faces, &b.font_faces, FontFace::font_faces_equal)
      && crate::equivalence::maps_equal(&a.unsupported, &b.unsupported, |x, y| x == y)
  }

  pub fn equivalent(a: &Engine, b: &Engine) -> bool {
    Engine::engines_equal(a, b)
  }
}

/// Composes a parent condition stack with a child `@media` query list
/// (parser-split on top-level commas, i.e. logical OR) into the cartesian
/// product of composed conditions, eliding `all` on either side
/// (spec.md §4.1, condition-stack composition).
fn compose_stack(parent_conditions: &[String], child_query: &[String]) -> Vec<String> {
  let mut result = Vec::with_capacity(parent_conditions.len() * child_query.len().max(1));
  if child_query.is_empty() {
    return parent_conditions.to_vec();
  }
  for parent in parent_conditions {
    for child in child_query {
      result.push(compose_one(parent, child.trim()));
    }
  }
  result
}

fn compose_one(parent: &str, child: &str) -> String {
  if parent == ALL_CONDITION {
    child.to_string()
  } else if child == ALL_CONDITION || child.is_empty() {
    parent.to_string()
  } else {
    format!("{} > {}", parent, child)
  }
}

fn page_key(condition: &str, page_selector: &str) -> String {
  format!("{}\u{0}{}", condition, page_selector)
}

/// Canonicalizes an `@supports` condition for use as a nested-engine key:
/// all whitespace is removed and a trailing `!important` marker is stripped,
/// so `(display:grid)` and `(display: grid)` key the same nested engine
/// (spec.md §4.1 "@supports" row, §4.5).
fn canonicalize_supports_condition(condition: &str) -> String {
  strip_important(condition).chars().filter(|c| !c.is_whitespace()).collect()
}

fn is_important(raw_value: &str) -> bool {
  raw_value.trim_end().to_ascii_lowercase().ends_with("!important")
}

fn strip_important(raw_value: &str) -> &str {
  let trimmed = raw_value.trim_end();
  if is_important(raw_value) {
    trimmed[..trimmed.len() - "!important".len()].trim_end()
  } else {
    trimmed
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn prop(name: &str, value: &str) -> AstNode {
    AstNode::Property { resolved_name: name.to_string(), resolved_value: value.to_string() }
  }

  fn class_rule(class: &str, children: Vec<AstNode>) -> AstNode {
    AstNode::Rule {
      selectors: vec![crate::ast::ComplexSelector {
        sequences: vec![crate::ast::SimpleSequence {
          members: vec![crate::ast::SimpleMember::Class(class.to_string())],
        }],
        combinators: vec![],
      }],
      children,
    }
  }

  #[test]
  fn simple_rule_adds_one_selector() {
    let nodes = vec![class_rule("a", vec![prop("color", "red")])];
    let engine = Engine::build(&nodes);
    assert_eq!(engine.selectors.len(), 1);
    assert!(engine.selectors.contains_key(".a"));
  }

  #[test]
  fn media_query_composes_condition() {
    let rule = class_rule("a", vec![prop("color", "red")]);
    let nodes = vec![AstNode::Media { query: vec!["screen".to_string()], children: vec![rule] }];
    let engine = Engine::build(&nodes);
    assert!(engine.selectors[".a"].properties["color"].bindings.contains_key("screen"));
  }

  #[test]
  fn nested_media_composes_with_separator() {
    let rule = class_rule("a", vec![prop("color", "red")]);
    let inner = AstNode::Media { query: vec!["(min-width: 100px)".to_string()], children: vec![rule] };
    let nodes = vec![AstNode::Media { query: vec!["screen".to_string()], children: vec![inner] }];
    let engine = Engine::build(&nodes);
    assert!(engine.selectors[".a"].properties["color"].bindings.contains_key("screen > (min-width: 100px)"));
  }

  #[test]
  fn important_declaration_strips_marker_and_flags() {
    let nodes = vec![class_rule("a", vec![prop("color", "red !important")])];
    let engine = Engine::build(&nodes);
    let binding = &engine.selectors[".a"].properties["color"].bindings["all"];
    assert!(binding.important);
    assert_eq!(binding.value, crate::value::Value::Literal("red".to_string()));
  }

  #[test]
  fn page_size_invalidated_by_outer_media_condition() {
    let page = AstNode::Directive {
      name: "@page".to_string(),
      value: None,
      resolved_value: None,
      children: vec![prop("size", "300px")],
    };
    let media = AstNode::Media { query: vec!["(width: 300px)".to_string()], children: vec![page] };
    let engine = Engine::build(&[media]);
    let margin = &engine.pages.values().next().unwrap().margin_boxes[ALL_MARGIN];
    assert!(margin.properties.get("size").map_or(true, |p| p.bindings.is_empty()));
  }

  #[test]
  fn supports_condition_spacing_does_not_split_the_key() {
    let nodes = vec![AstNode::Supports {
      name: "@supports".to_string(),
      condition: "(display:grid)".to_string(),
      children: vec![class_rule("a", vec![prop("color", "red")])],
    }];
    let mut engine = Engine::new();
    engine.process_nodes(&nodes, &[ALL_CONDITION.to_string()]);
    engine.process_node(
      &AstNode::Supports {
        name: "@supports".to_string(),
        condition: "(display: grid)".to_string(),
        children: vec![class_rule("b", vec![prop("color", "blue")])],
      },
      &[ALL_CONDITION.to_string()],
    );
    assert_eq!(engine.supports["@supports"].rules.len(), 1);
    let nested = &engine.supports["@supports"].rules["(display:grid)"];
    assert_eq!(nested.selectors.len(), 2);
  }

  #[test]
  fn namespace_without_prefix_uses_default() {
    let nodes = vec![AstNode::Directive {
      name: "@namespace".to_string(),
      value: None,
      resolved_value: Some("http://example.com/ns".to_string()),
      children: vec![],
    }];
    let engine = Engine::build(&nodes);
    assert_eq!(engine.namespaces.get("default").map(String::as_str), Some("http://example.com/ns"));
  }

  #[test]
  fn equivalent_is_reflexive_and_symmetric() {
    let nodes = vec![class_rule("a", vec![prop("color", "red")])];
    let a = Engine::build(&nodes);
    let b = Engine::build(&nodes);
    assert!(Engine::equivalent(&a, &a));
    assert!(Engine::equivalent(&a, &b));
    assert!(Engine::equivalent(&b, &a));
  }
}
