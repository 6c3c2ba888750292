//! Turns CSS source text into the [`AstNode`] tree the Evaluator consumes
//! (spec.md §6), driven by `cssparser`'s rule-list/at-rule/declaration
//! traits. Each node keeps its prelude/value as resolved text rather than
//! a typed CSS value: the cascade only ever compares raw content
//! (spec.md §4.8), so there is no need for a typed property/value system
//! here.

use cssparser::{
  AtRuleParser, CowRcStr, DeclarationListParser, DeclarationParser, ParseError, Parser, ParserInput,
  ParserState, QualifiedRuleParser, RuleListParser, Token,
};

use crate::ast::AstNode;
use crate::selector;

/// Parses one complete stylesheet into its top-level node list.
///
/// Individual malformed rules are skipped rather than aborting the whole
/// parse, matching how real CSS user agents recover from syntax errors.
pub fn parse_stylesheet(css: &str) -> Vec<AstNode> {
  let mut input = ParserInput::new(css);
  let mut parser = Parser::new(&mut input);
  let mut nodes = Vec::new();
  let mut iter = RuleListParser::new_for_stylesheet(&mut parser, TopLevelRuleParser);
  while let Some(result) = iter.next() {
    if let Ok(Some(node)) = result {
      nodes.push(node);
    }
  }
  nodes
}

/// The shape of an at-rule prelude, before its block (if any) is parsed.
enum AtRulePrelude {
  Charset(String),
  Import(String, Vec<String>),
  Namespace(Option<String>, String),
  Media(Vec<String>),
  Supports(String),
  FontFace,
  Keyframes(String),
  Page(Option<String>),
  /// Any at-rule this parser does not model; kept verbatim so it still
  /// shows up as a distinguishing "unsupported" entity (spec.md §4.1).
  Generic(String, String),
}

struct TopLevelRuleParser;

impl TopLevelRuleParser {
  fn nested(&mut self) -> NestedRuleParser {
    NestedRuleParser
  }
}

impl<'i> AtRuleParser<'i> for TopLevelRuleParser {
  type Prelude = AtRulePrelude;
  type AtRule = Option<AstNode>;
  type Error = ();

  fn parse_prelude<'t>(
    &mut self,
    name: CowRcStr<'i>,
    input: &mut Parser<'i, 't>,
  ) -> Result<AtRulePrelude, ParseError<'i, ()>> {
    parse_at_rule_prelude(&name, input)
  }

  fn parse_block<'t>(
    &mut self,
    prelude: AtRulePrelude,
    start: &ParserState,
    input: &mut Parser<'i, 't>,
  ) -> Result<Self::AtRule, ParseError<'i, ()>> {
    AtRuleParser::parse_block(&mut self.nested(), prelude, start, input)
  }

  fn rule_without_block(&mut self, prelude: AtRulePrelude, _start: &ParserState) -> Result<Self::AtRule, ()> {
    rule_without_block(prelude)
  }
}

impl<'i> QualifiedRuleParser<'i> for TopLevelRuleParser {
  type Prelude = crate::ast::SelectorList;
  type QualifiedRule = Option<AstNode>;
  type Error = ();

  fn parse_prelude<'t>(
    &mut self,
    input: &mut Parser<'i, 't>,
  ) -> Result<Self::Prelude, ParseError<'i, ()>> {
    QualifiedRuleParser::parse_prelude(&mut self.nested(), input)
  }

  fn parse_block<'t>(
    &mut self,
    prelude: Self::Prelude,
    start: &ParserState,
    input: &mut Parser<'i, 't>,
  ) -> Result<Self::QualifiedRule, ParseError<'i, ()>> {
    QualifiedRuleParser::parse_block(&mut self.nested(), prelude, start, input)
  }
}

/// Handles rules nested inside a block: `@media`/`@supports`/style rules
/// all delegate their inner rule lists back through this same parser.
struct NestedRuleParser;

impl<'i> AtRuleParser<'i> for NestedRuleParser {
  type Prelude = AtRulePrelude;
  type AtRule = Option<AstNode>;
  type Error = ();

  fn parse_prelude<'t>(
    &mut self,
    name: CowRcStr<'i>,
    input: &mut Parser<'i, 't>,
  ) -> Result<AtRulePrelude, ParseError<'i, ()>> {
    parse_at_rule_prelude(&name, input)
  }

  fn parse_block<'t>(
    &mut self,
    prelude: AtRulePrelude,
    _start: &ParserState,
    input: &mut Parser<'i, 't>,
  ) -> Result<Self::AtRule, ParseError<'i, ()>> {
    let node = match prelude {
      AtRulePrelude::Media(query) => AstNode::Media { query, children: parse_nested_rules(input) },
      AtRulePrelude::Supports(condition) => AstNode::Supports {
        name: "@supports".to_string(),
        condition,
        children: parse_nested_rules(input),
      },
      AtRulePrelude::FontFace => AstNode::Directive {
        name: "@font-face".to_string(),
        value: None,
        resolved_value: None,
        children: parse_declarations_only(input),
      },
      AtRulePrelude::Keyframes(name) => AstNode::Directive {
        name: "@keyframes".to_string(),
        value: Some(name),
        resolved_value: None,
        children: parse_keyframe_rules(input),
      },
      AtRulePrelude::Page(selector) => AstNode::Directive {
        name: "@page".to_string(),
        value: selector,
        resolved_value: None,
        children: parse_page_block(input),
      },
      AtRulePrelude::Generic(name, prelude_text) => {
        let block_text = consume_raw_value(input);
        AstNode::Directive {
          name,
          value: None,
          resolved_value: Some(format!("{} {{{}}}", prelude_text, block_text)),
          children: vec![],
        }
      }
      AtRulePrelude::Charset(_) | AtRulePrelude::Import(..) | AtRulePrelude::Namespace(..) => {
        // These never carry a block; cssparser would not reach here.
        return Ok(None);
      }
    };
    Ok(Some(node))
  }

  fn rule_without_block(&mut self, prelude: AtRulePrelude, _start: &ParserState) -> Result<Self::AtRule, ()> {
    rule_without_block(prelude)
  }
}

impl<'i> QualifiedRuleParser<'i> for NestedRuleParser {
  type Prelude = crate::ast::SelectorList;
  type QualifiedRule = Option<AstNode>;
  type Error = ();

  fn parse_prelude<'t>(
    &mut self,
    input: &mut Parser<'i, 't>,
  ) -> Result<Self::Prelude, ParseError<'i, ()>> {
    let start = input.position();
    while input.next_including_whitespace_and_comments().is_ok() {}
    let text = input.slice_from(start).trim().to_string();
    Ok(selector::parse_selector_list(&text))
  }

  fn parse_block<'t>(
    &mut self,
    selectors: Self::Prelude,
    _start: &ParserState,
    input: &mut Parser<'i, 't>,
  ) -> Result<Self::QualifiedRule, ParseError<'i, ()>> {
    Ok(Some(AstNode::Rule { selectors, children: parse_declarations_only(input) }))
  }
}

fn rule_without_block(prelude: AtRulePrelude) -> Result<Option<AstNode>, ()> {
  let node = match prelude {
    AtRulePrelude::Charset(name) => AstNode::Charset { name },
    AtRulePrelude::Import(uri, query) => AstNode::Import { resolved_uri: uri, query },
    AtRulePrelude::Namespace(prefix, uri) => {
      AstNode::Directive { name: "@namespace".to_string(), value: prefix, resolved_value: Some(uri), children: vec![] }
    }
    _ => return Err(()),
  };
  Ok(Some(node))
}

fn parse_at_rule_prelude<'i, 't>(
  name: &str,
  input: &mut Parser<'i, 't>,
) -> Result<AtRulePrelude, ParseError<'i, ()>> {
  cssparser::match_ignore_ascii_case! { name,
    "charset" => {
      let value = input.expect_string()?.as_ref().to_owned();
      Ok(AtRulePrelude::Charset(value))
    },
    "import" => {
      let uri = input.expect_url_or_string()?.as_ref().to_owned();
      let query = parse_media_query_list(input);
      Ok(AtRulePrelude::Import(uri, query))
    },
    "namespace" => {
      let prefix = input.try_parse(|input| input.expect_ident_cloned()).map(|v| v.as_ref().to_owned()).ok();
      let uri = input.expect_url_or_string()?.as_ref().to_owned();
      Ok(AtRulePrelude::Namespace(prefix, uri))
    },
    "media" => Ok(AtRulePrelude::Media(parse_media_query_list(input))),
    "supports" => {
      let start = input.position();
      while input.next_including_whitespace_and_comments().is_ok() {}
      Ok(AtRulePrelude::Supports(input.slice_from(start).trim().to_string()))
    },
    "font-face" => Ok(AtRulePrelude::FontFace),
    "keyframes" | "-webkit-keyframes" | "-moz-keyframes" | "-o-keyframes" | "-ms-keyframes" => {
      let location = input.current_source_location();
      let name = match input.next()?.clone() {
        Token::Ident(s) => s.as_ref().to_owned(),
        Token::QuotedString(s) => s.as_ref().to_owned(),
        t => return Err(location.new_unexpected_token_error(t)),
      };
      Ok(AtRulePrelude::Keyframes(name))
    },
    "page" => {
      let start = input.position();
      while input.next_including_whitespace_and_comments().is_ok() {}
      let text = input.slice_from(start).trim();
      let selector = if text.is_empty() { None } else { Some(text.to_string()) };
      Ok(AtRulePrelude::Page(selector))
    },
    _ => {
      let start = input.position();
      while input.next_including_whitespace_and_comments().is_ok() {}
      let text = input.slice_from(start).trim().to_string();
      Ok(AtRulePrelude::Generic(format!("@{}", name), text))
    },
  }
}

fn parse_media_query_list<'i, 't>(input: &mut Parser<'i, 't>) -> Vec<String> {
  let start = input.position();
  while input.next_including_whitespace_and_comments().is_ok() {}
  let text = input.slice_from(start).trim().to_string();
  if text.is_empty() {
    return vec!["all".to_string()];
  }
  split_top_level_commas(&text).into_iter().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
}

/// Splits `text` on commas outside parens/brackets/quotes (a media query
/// list is a comma-separated list of alternatives, i.e. logical OR).
fn split_top_level_commas(text: &str) -> Vec<&str> {
  let bytes = text.as_bytes();
  let mut parts = Vec::new();
  let mut depth = 0i32;
  let mut start = 0usize;
  let mut quote: Option<u8> = None;
  for (i, &c) in bytes.iter().enumerate() {
    if let Some(q) = quote {
      if c == q {
        quote = None;
      }
      continue;
    }
    match c {
      b'"' | b'\'' => quote = Some(c),
      b'(' | b'[' => depth += 1,
      b')' | b']' => depth -= 1,
      b',' if depth == 0 => {
        parts.push(&text[start..i]);
        start = i + 1;
      }
      _ => {}
    }
  }
  parts.push(&text[start..]);
  parts
}

fn parse_nested_rules<'i, 't>(input: &mut Parser<'i, 't>) -> Vec<AstNode> {
  let mut nodes = Vec::new();
  let mut iter = RuleListParser::new_for_nested_rule(input, NestedRuleParser);
  while let Some(result) = iter.next() {
    if let Ok(Some(node)) = result {
      nodes.push(node);
    }
  }
  nodes
}

/// A `DeclarationParser`/`AtRuleParser` pair that only ever yields
/// `AstNode::Property` leaves and rejects nested at-rules — used for
/// `@font-face` blocks and individual margin boxes.
struct DeclarationOnlyParser;

impl<'i> DeclarationParser<'i> for DeclarationOnlyParser {
  type Declaration = AstNode;
  type Error = ();

  fn parse_value<'t>(
    &mut self,
    name: CowRcStr<'i>,
    input: &mut Parser<'i, 't>,
  ) -> Result<AstNode, ParseError<'i, ()>> {
    Ok(AstNode::Property { resolved_name: name.as_ref().to_owned(), resolved_value: consume_raw_value(input) })
  }
}

impl<'i> AtRuleParser<'i> for DeclarationOnlyParser {
  type Prelude = ();
  type AtRule = AstNode;
  type Error = ();
}

fn parse_declarations_only<'i, 't>(input: &mut Parser<'i, 't>) -> Vec<AstNode> {
  let mut parser = DeclarationListParser::new(input, DeclarationOnlyParser);
  let mut nodes = Vec::new();
  while let Some(result) = parser.next() {
    if let Ok(node) = result {
      nodes.push(node);
    }
  }
  nodes
}

/// `@page` blocks mix plain declarations with nested margin-box at-rules
/// (`@top-left { ... }`); both land as `AstNode` so they can share one
/// `DeclarationListParser` pass.
struct PageBlockParser;

impl<'i> DeclarationParser<'i> for PageBlockParser {
  type Declaration = AstNode;
  type Error = ();

  fn parse_value<'t>(
    &mut self,
    name: CowRcStr<'i>,
    input: &mut Parser<'i, 't>,
  ) -> Result<AstNode, ParseError<'i, ()>> {
    Ok(AstNode::Property { resolved_name: name.as_ref().to_owned(), resolved_value: consume_raw_value(input) })
  }
}

impl<'i> AtRuleParser<'i> for PageBlockParser {
  type Prelude = String;
  type AtRule = AstNode;
  type Error = ();

  fn parse_prelude<'t>(
    &mut self,
    name: CowRcStr<'i>,
    _input: &mut Parser<'i, 't>,
  ) -> Result<String, ParseError<'i, ()>> {
    Ok(format!("@{}", name))
  }

  fn parse_block<'t>(
    &mut self,
    prelude: String,
    _start: &ParserState,
    input: &mut Parser<'i, 't>,
  ) -> Result<AstNode, ParseError<'i, ()>> {
    Ok(AstNode::Directive { name: prelude, value: None, resolved_value: None, children: parse_declarations_only(input) })
  }
}

fn parse_page_block<'i, 't>(input: &mut Parser<'i, 't>) -> Vec<AstNode> {
  let mut parser = DeclarationListParser::new(input, PageBlockParser);
  let mut nodes = Vec::new();
  while let Some(result) = parser.next() {
    if let Ok(node) = result {
      nodes.push(node);
    }
  }
  nodes
}

/// One `<offset-list> { declarations }` entry inside `@keyframes`.
struct KeyframesBlockParser;

impl<'i> QualifiedRuleParser<'i> for KeyframesBlockParser {
  type Prelude = String;
  type QualifiedRule = Option<AstNode>;
  type Error = ();

  fn parse_prelude<'t>(&mut self, input: &mut Parser<'i, 't>) -> Result<String, ParseError<'i, ()>> {
    let start = input.position();
    while input.next_including_whitespace_and_comments().is_ok() {}
    Ok(input.slice_from(start).trim().to_string())
  }

  fn parse_block<'t>(
    &mut self,
    prelude: String,
    _start: &ParserState,
    input: &mut Parser<'i, 't>,
  ) -> Result<Self::QualifiedRule, ParseError<'i, ()>> {
    Ok(Some(AstNode::KeyframeRule { resolved_value: prelude, children: parse_declarations_only(input) }))
  }
}

impl<'i> AtRuleParser<'i> for KeyframesBlockParser {
  type Prelude = ();
  type AtRule = Option<AstNode>;
  type Error = ();
}

fn parse_keyframe_rules<'i, 't>(input: &mut Parser<'i, 't>) -> Vec<AstNode> {
  let mut nodes = Vec::new();
  let mut iter = RuleListParser::new_for_nested_rule(input, KeyframesBlockParser);
  while let Some(result) = iter.next() {
    if let Ok(Some(node)) = result {
      nodes.push(node);
    }
  }
  nodes
}

/// Consumes the remainder of a declaration's value as raw text, `!important`
/// marker included — the cascade strips and interprets it later
/// (spec.md §4.3).
fn consume_raw_value<'i, 't>(input: &mut Parser<'i, 't>) -> String {
  let start = input.position();
  while input.next_including_whitespace_and_comments().is_ok() {}
  input.slice_from(start).trim().to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_simple_rule() {
    let nodes = parse_stylesheet(".a { color: red; }");
    assert_eq!(nodes.len(), 1);
    match &nodes[0] {
      AstNode::Rule { children, .. } => {
        assert_eq!(children.len(), 1);
        match &children[0] {
          AstNode::Property { resolved_name, resolved_value } => {
            assert_eq!(resolved_name, "color");
            assert_eq!(resolved_value, "red");
          }
          other => panic!("unexpected node {:?}", other),
        }
      }
      other => panic!("unexpected node {:?}", other),
    }
  }

  #[test]
  fn parses_important_marker_verbatim() {
    let nodes = parse_stylesheet(".a { color: red !important; }");
    if let AstNode::Rule { children, .. } = &nodes[0] {
      if let AstNode::Property { resolved_value, .. } = &children[0] {
        assert!(resolved_value.to_ascii_lowercase().contains("!important"));
      }
    }
  }

  #[test]
  fn parses_media_query_list() {
    let nodes = parse_stylesheet("@media screen, print { .a { color: red; } }");
    match &nodes[0] {
      AstNode::Media { query, .. } => assert_eq!(query, &vec!["screen".to_string(), "print".to_string()]),
      other => panic!("unexpected node {:?}", other),
    }
  }

  #[test]
  fn parses_keyframes_with_from_to() {
    let nodes = parse_stylesheet("@keyframes spin { from { opacity: 0; } to { opacity: 1; } }");
    match &nodes[0] {
      AstNode::Directive { name, value, children, .. } => {
        assert_eq!(name, "@keyframes");
        assert_eq!(value.as_deref(), Some("spin"));
        assert_eq!(children.len(), 2);
      }
      other => panic!("unexpected node {:?}", other),
    }
  }

  #[test]
  fn unknown_at_rule_is_captured_generically() {
    let nodes = parse_stylesheet("@layer base { .a { color: red; } }");
    match &nodes[0] {
      AstNode::Directive { name, .. } => assert_eq!(name, "@layer"),
      other => panic!("unexpected node {:?}", other),
    }
  }
}
