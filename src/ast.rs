//! The syntax-tree contract the evaluator consumes.
//!
//! Per spec.md §6, the tokenizer/parser is an external collaborator: any
//! conformant CSS parser producing these node kinds is acceptable. This enum
//! is the "duck-typed dispatch → tagged variants" redesign (spec.md §9) — a
//! single exhaustive `match` replaces the source's is-a dispatch chain.

/// One top-level or nested node in a parsed stylesheet.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
  /// A plain ruleset: `selector { declarations }`.
  Rule { selectors: SelectorList, children: Vec<AstNode> },
  /// A single declaration: `name: value`.
  Property { resolved_name: String, resolved_value: String },
  /// `@media <query-list> { ... }`.
  Media { query: Vec<String>, children: Vec<AstNode> },
  /// The generic at-rule catch-all: `@namespace`, `@page`, `@font-face`,
  /// `@keyframes`, and anything the evaluator does not recognize.
  Directive {
    name: String,
    value: Option<String>,
    resolved_value: Option<String>,
    children: Vec<AstNode>,
  },
  /// `@supports <condition> { ... }`.
  Supports { name: String, condition: String, children: Vec<AstNode> },
  /// One `<offset> { declarations }` entry inside an `@keyframes` directive.
  KeyframeRule { resolved_value: String, children: Vec<AstNode> },
  /// `@charset "<name>";`.
  Charset { name: String },
  /// `@import <uri> <query-list>;`.
  Import { resolved_uri: String, query: Vec<String> },
}

/// A complex selector: simple sequences joined by combinators.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
  /// `sequences.len() == combinators.len() + 1`.
  pub sequences: Vec<SimpleSequence>,
  pub combinators: Vec<Combinator>,
}

pub type SelectorList = Vec<ComplexSelector>;

/// The combinator joining two adjacent simple sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
  /// ` ` (whitespace).
  Descendant,
  /// `>`.
  Child,
  /// `+`.
  NextSibling,
  /// `~`.
  SubsequentSibling,
}

impl Combinator {
  pub fn as_str(self) -> &'static str {
    match self {
      Combinator::Descendant => " ",
      Combinator::Child => " > ",
      Combinator::NextSibling => " + ",
      Combinator::SubsequentSibling => " ~ ",
    }
  }
}

/// A maximal run of selector atoms not separated by a combinator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimpleSequence {
  pub members: Vec<SimpleMember>,
}

/// One atom of a simple-selector-sequence, typed per spec.md §6.
#[derive(Debug, Clone, PartialEq)]
pub enum SimpleMember {
  Universal,
  Element(String),
  Id(String),
  Class(String),
  /// A pseudo-element, e.g. `::before`.
  Placeholder(String),
  /// A pseudo-class, e.g. `:hover`, `:nth-child(2)`.
  Pseudo(String),
  /// An attribute selector, e.g. `[type="text"]`. Carries the raw inner
  /// text (without the surrounding brackets) so the canonicalizer can glue
  /// it onto the preceding member per §4.2 rule 2.
  Attribute(String),
}
