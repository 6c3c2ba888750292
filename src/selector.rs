//! Selector parsing and canonicalization (spec.md §4.2).
//!
//! This only ever looks at a selector's own text — specificity, pseudo-class
//! matching semantics and a live element tree are never needed, so a small
//! hand-written scanner stands in for a full selector-matching engine
//! (see DESIGN.md).

use crate::ast::{Combinator, ComplexSelector, SelectorList, SimpleMember, SimpleSequence};

/// Parses a comma-separated selector list, e.g. `a, .b > c`.
pub fn parse_selector_list(text: &str) -> SelectorList {
  split_top_level(text, ',')
    .into_iter()
    .map(|part| parse_complex_selector(part.trim()))
    .filter(|sel| !sel.sequences.is_empty())
    .collect()
}

/// Parses one complex selector: simple sequences joined by combinators.
fn parse_complex_selector(text: &str) -> ComplexSelector {
  let chars: Vec<char> = text.chars().collect();
  let mut i = 0usize;
  let len = chars.len();

  let mut sequences = Vec::new();
  let mut combinators = Vec::new();
  let mut current = SimpleSequence::default();

  while i < len {
    let saw_space = skip_whitespace(&chars, &mut i);
    if i >= len {
      break;
    }

    if let Some(combinator) = explicit_combinator(chars[i]) {
      if !current.members.is_empty() {
        sequences.push(std::mem::take(&mut current));
      }
      combinators.push(combinator);
      i += 1;
      skip_whitespace(&chars, &mut i);
      continue;
    }

    if saw_space && !current.members.is_empty() {
      sequences.push(std::mem::take(&mut current));
      combinators.push(Combinator::Descendant);
    }

    match chars[i] {
      '*' => {
        current.members.push(SimpleMember::Universal);
        i += 1;
      }
      '#' => {
        i += 1;
        let ident = read_ident(&chars, &mut i);
        current.members.push(SimpleMember::Id(ident));
      }
      '.' => {
        i += 1;
        let ident = read_ident(&chars, &mut i);
        current.members.push(SimpleMember::Class(ident));
      }
      ':' => {
        i += 1;
        let is_element = i < len && chars[i] == ':';
        if is_element {
          i += 1;
        }
        let name = read_pseudo(&chars, &mut i);
        if is_element {
          current.members.push(SimpleMember::Placeholder(name));
        } else {
          current.members.push(SimpleMember::Pseudo(name));
        }
      }
      '[' => {
        let inner = read_bracketed(&chars, &mut i);
        current.members.push(SimpleMember::Attribute(inner));
      }
      _ => {
        let ident = read_ident(&chars, &mut i);
        if ident.is_empty() {
          // Unrecognized character; skip it rather than looping forever.
          i += 1;
        } else {
          current.members.push(SimpleMember::Element(ident));
        }
      }
    }
  }

  if !current.members.is_empty() {
    sequences.push(current);
  }

  // Combinators are recorded alongside sequence boundaries as they are
  // discovered, so the count may be one ahead if the selector ended in a
  // combinator (malformed input) or the last sequence was empty.
  combinators.truncate(sequences.len().saturating_sub(1));

  ComplexSelector { sequences, combinators }
}

fn explicit_combinator(c: char) -> Option<Combinator> {
  match c {
    '>' => Some(Combinator::Child),
    '+' => Some(Combinator::NextSibling),
    '~' => Some(Combinator::SubsequentSibling),
    _ => None,
  }
}

fn skip_whitespace(chars: &[char], i: &mut usize) -> bool {
  let start = *i;
  while *i < chars.len() && chars[*i].is_whitespace() {
    *i += 1;
  }
  *i > start
}

fn is_ident_char(c: char) -> bool {
  c.is_alphanumeric() || c == '-' || c == '_' || c == '\\' || !c.is_ascii()
}

fn read_ident(chars: &[char], i: &mut usize) -> String {
  let start = *i;
  while *i < chars.len() && is_ident_char(chars[*i]) {
    *i += 1;
  }
  chars[start..*i].iter().collect()
}

/// Reads a pseudo-class/pseudo-element name, including a functional
/// argument list such as `nth-child(2n+1)` if present.
fn read_pseudo(chars: &[char], i: &mut usize) -> String {
  let mut name = read_ident(chars, i);
  if *i < chars.len() && chars[*i] == '(' {
    let start = *i;
    skip_balanced(chars, i, '(', ')');
    name.push_str(&chars[start..*i].iter().collect::<String>());
  }
  name
}

/// Reads a `[...]` attribute selector, returning its inner text.
fn read_bracketed(chars: &[char], i: &mut usize) -> String {
  debug_assert_eq!(chars[*i], '[');
  let start = *i + 1;
  skip_balanced(chars, i, '[', ']');
  let end = if *i > start { *i - 1 } else { start };
  chars[start..end].iter().collect()
}

/// Advances `i` past a balanced `open`/`close` span starting at `chars[i] ==
/// open`, honoring quoted strings so brackets/parens inside them don't count.
fn skip_balanced(chars: &[char], i: &mut usize, open: char, close: char) {
  debug_assert_eq!(chars[*i], open);
  *i += 1;
  let mut depth = 1usize;
  while *i < chars.len() && depth > 0 {
    match chars[*i] {
      '"' | '\'' => {
        let quote = chars[*i];
        *i += 1;
        while *i < chars.len() && chars[*i] != quote {
          *i += 1;
        }
        *i += 1;
      }
      c if c == open => {
        depth += 1;
        *i += 1;
      }
      c if c == close => {
        depth -= 1;
        *i += 1;
      }
      _ => *i += 1,
    }
  }
}

/// Splits `text` on top-level occurrences of `sep`, honoring `()`, `[]` and
/// quoted strings so commas inside `:not(a, b)` or `[a="x,y"]` don't split.
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
  let bytes = text.as_bytes();
  let mut parts = Vec::new();
  let mut depth = 0i32;
  let mut start = 0usize;
  let mut quote: Option<u8> = None;
  let mut i = 0usize;
  while i < bytes.len() {
    let c = bytes[i];
    if let Some(q) = quote {
      if c == q {
        quote = None;
      }
    } else {
      match c {
        b'"' | b'\'' => quote = Some(c),
        b'(' | b'[' => depth += 1,
        b')' | b']' => depth -= 1,
        _ if c as char == sep && depth == 0 => {
          parts.push(&text[start..i]);
          start = i + 1;
        }
        _ => {}
      }
    }
    i += 1;
  }
  parts.push(&text[start..]);
  parts
}

/// Bucket order for §4.2 step 1.
const BUCKET_ORDER: [fn(&SimpleMember) -> bool; 6] = [
  |m| matches!(m, SimpleMember::Universal),
  |m| matches!(m, SimpleMember::Element(_)),
  |m| matches!(m, SimpleMember::Id(_)),
  |m| matches!(m, SimpleMember::Class(_)),
  |m| matches!(m, SimpleMember::Placeholder(_)),
  |m| matches!(m, SimpleMember::Pseudo(_)),
];

fn member_token(m: &SimpleMember) -> String {
  match m {
    SimpleMember::Universal => "*".to_string(),
    SimpleMember::Element(n) => n.clone(),
    SimpleMember::Id(n) => format!("#{}", n),
    SimpleMember::Class(n) => format!(".{}", n),
    SimpleMember::Placeholder(n) => format!("::{}", n),
    SimpleMember::Pseudo(n) => format!(":{}", n),
    SimpleMember::Attribute(inner) => format!("[{}]", inner),
  }
}

/// Canonicalizes one simple-selector-sequence per spec.md §4.2 steps 1-4:
/// bucketize, glue attributes onto the preceding member, dedup + sort within
/// bucket, emit buckets in fixed order with no separator.
fn canonicalize_sequence(seq: &SimpleSequence) -> String {
  // Step 2: glue each Attribute onto the member immediately preceding it.
  let mut glued: Vec<(SimpleMember, String)> = Vec::new();
  for member in &seq.members {
    if let SimpleMember::Attribute(inner) = member {
      let attr_text = format!("[{}]", inner);
      if let Some(last) = glued.last_mut() {
        last.1.push_str(&attr_text);
        continue;
      }
      // No preceding member: attach to an implicit universal selector.
      glued.push((SimpleMember::Universal, format!("*{}", attr_text)));
      continue;
    }
    glued.push((member.clone(), member_token(member)));
  }

  // Step 1 + 3: bucketize, dedup, sort lexicographically within each bucket.
  let mut buckets: Vec<Vec<String>> = vec![Vec::new(); BUCKET_ORDER.len()];
  for (member, token) in &glued {
    if let Some(idx) = BUCKET_ORDER.iter().position(|matches| matches(member)) {
      buckets[idx].push(token.clone());
    }
  }

  let mut out = String::new();
  for bucket in &mut buckets {
    bucket.sort();
    bucket.dedup();
    for token in bucket {
      out.push_str(token);
    }
  }
  out
}

/// Canonicalizes a full complex selector: canonicalize each simple sequence,
/// join with the original combinators verbatim (§4.2: "combinators and
/// descendant whitespace between simple sequences are preserved verbatim").
pub fn canonicalize(selector: &ComplexSelector) -> String {
  let mut out = String::new();
  for (idx, seq) in selector.sequences.iter().enumerate() {
    if idx > 0 {
      let combinator = selector.combinators.get(idx - 1).copied().unwrap_or(Combinator::Descendant);
      out.push_str(combinator.as_str());
    }
    out.push_str(&canonicalize_sequence(seq));
  }
  out
}

/// Canonicalizes every complex selector in a list and joins with `, `,
/// giving the canonical name for a whole `Selector` entity (spec.md §3).
pub fn canonicalize_list(selectors: &SelectorList) -> String {
  selectors.iter().map(canonicalize).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn canon_one(text: &str) -> String {
    let list = parse_selector_list(text);
    canonicalize(&list[0])
  }

  #[test]
  fn duplicate_tokens_collapse() {
    assert_eq!(canon_one(".a.b.a"), canon_one(".a.b"));
  }

  #[test]
  fn intra_sequence_order_is_erased() {
    assert_eq!(canon_one("div#id.x"), canon_one("div.x#id"));
  }

  #[test]
  fn descendant_order_is_preserved() {
    assert_ne!(canon_one(".a .b"), canon_one(".b .a"));
  }

  #[test]
  fn attribute_glues_onto_preceding_member() {
    let canon = canon_one("input[type=\"text\"]");
    assert!(canon.starts_with("input["));
  }

  #[test]
  fn canonicalization_is_idempotent() {
    let list = parse_selector_list("div.x#id:hover");
    let once = canonicalize(&list[0]);
    let twice_list = parse_selector_list(&once);
    let twice = canonicalize(&twice_list[0]);
    assert_eq!(once, twice);
  }

  #[test]
  fn child_combinator_preserved() {
    let list = parse_selector_list("a > b");
    assert_eq!(canonicalize(&list[0]), "a > b");
  }
}
