//! `FontFace` (spec.md §3, §4.7).

use indexmap::IndexMap;

/// Descriptors with a defined default when absent, per spec.md §4.7.
const DEFAULTS: &[(&str, &str)] = &[
  ("font-style", "normal"),
  ("font-weight", "normal"),
  ("font-stretch", "normal"),
  ("unicode-range", "U+0-10FFFF"),
  ("font-variant", "normal"),
  ("font-feature-settings", "normal"),
  ("font-kerning", "auto"),
  ("font-variant-ligatures", "normal"),
  ("font-variant-position", "normal"),
  ("font-variant-caps", "normal"),
  ("font-variant-numeric", "normal"),
  ("font-variant-alternates", "normal"),
  ("font-variant-east-asian", "normal"),
  ("font-language-override", "normal"),
];

/// Raw descriptor values that are synonymous, normalized before comparison.
fn normalize_synonym(name: &str, value: &str) -> String {
  let lower = value.trim().to_ascii_lowercase();
  match name {
    "font-weight" => match lower.as_str() {
      "normal" => "400".to_string(),
      "bold" => "600".to_string(),
      other => other.to_string(),
    },
    "font-stretch" => lower,
    _ => lower,
  }
}

fn normalize_family(raw: &str) -> String {
  let trimmed = raw.trim();
  let unquoted = trimmed
    .strip_prefix('"')
    .and_then(|s| s.strip_suffix('"'))
    .or_else(|| trimmed.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
    .unwrap_or(trimmed);
  unquoted.to_ascii_lowercase()
}

/// Strips wrapping quotes (bare or inside a `url(...)` wrapper) from each
/// whitespace-separated token of a `src` list, per spec.md §3/§4.7.
fn normalize_src(raw: &str) -> String {
  raw
    .split_whitespace()
    .map(strip_src_token_quotes)
    .collect::<Vec<_>>()
    .join(" ")
}

fn strip_src_token_quotes(token: &str) -> String {
  if let Some(inner) = token.strip_prefix("url(").and_then(|s| s.strip_suffix(')')) {
    return format!("url({})", unquote(inner));
  }
  unquote(token)
}

fn unquote(s: &str) -> String {
  let bytes = s.as_bytes();
  if bytes.len() >= 2 {
    let first = bytes[0];
    let last = bytes[bytes.len() - 1];
    if (first == b'"' || first == b'\'') && first == last {
      return s[1..s.len() - 1].to_string();
    }
  }
  s.to_string()
}

/// `{ descriptors: name -> value }`, keyed in the Equivalence Checker by
/// `(condition, family, src)` (spec.md §4.7).
#[derive(Debug, Clone, PartialEq)]
pub struct FontFace {
  pub descriptors: IndexMap<String, String>,
}

impl FontFace {
  pub fn new() -> FontFace {
    FontFace { descriptors: IndexMap::new() }
  }

  pub fn set_descriptor(&mut self, name: &str, raw_value: &str) {
    let normalized = match name {
      "font-family" => normalize_family(raw_value),
      "src" => normalize_src(raw_value),
      other => normalize_synonym(other, raw_value),
    };
    self.descriptors.insert(name.to_string(), normalized);
  }

  /// Present and valid iff both `font-family` and `src` were declared.
  pub fn is_valid(&self) -> bool {
    self.descriptors.contains_key("font-family") && self.descriptors.contains_key("src")
  }

  pub fn family(&self) -> Option<&str> {
    self.descriptors.get("font-family").map(String::as_str)
  }

  pub fn src(&self) -> Option<&str> {
    self.descriptors.get("src").map(String::as_str)
  }

  /// Fills in descriptor defaults for anything left unset.
  pub fn with_defaults(mut self) -> FontFace {
    for (name, default) in DEFAULTS {
      self.descriptors.entry((*name).to_string()).or_insert_with(|| (*default).to_string());
    }
    self
  }

  pub fn font_faces_equal(a: &FontFace, b: &FontFace) -> bool {
    crate::equivalence::maps_equal(&a.descriptors, &b.descriptors, |va, vb| va == vb)
  }
}

impl Default for FontFace {
  fn default() -> Self {
    FontFace::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn invalid_without_family_or_src() {
    let mut f = FontFace::new();
    assert!(!f.is_valid());
    f.set_descriptor("font-family", "Arial");
    assert!(!f.is_valid());
    f.set_descriptor("src", "url(a.woff)");
    assert!(f.is_valid());
  }

  #[test]
  fn weight_synonyms_normalize_equal() {
    let mut a = FontFace::new();
    a.set_descriptor("font-weight", "bold");
    let mut b = FontFace::new();
    b.set_descriptor("font-weight", "600");
    assert_eq!(a.descriptors["font-weight"], b.descriptors["font-weight"]);
  }

  #[test]
  fn src_quotes_are_stripped_case_preserved() {
    let mut a = FontFace::new();
    a.set_descriptor("src", "url(\"MyFont.woff\")");
    let mut b = FontFace::new();
    b.set_descriptor("src", "url('MyFont.woff')");
    assert_eq!(a.descriptors["src"], b.descriptors["src"]);
    assert_eq!(a.descriptors["src"], "url(MyFont.woff)");
  }

  #[test]
  fn family_is_unquoted_and_lowercased() {
    let mut f = FontFace::new();
    f.set_descriptor("font-family", "\"My Font\"");
    assert_eq!(f.family(), Some("my font"));
  }

  #[test]
  fn defaults_fill_missing_descriptors() {
    let mut f = FontFace::new();
    f.set_descriptor("font-family", "arial");
    f.set_descriptor("src", "url(a.woff)");
    let f = f.with_defaults();
    assert_eq!(f.descriptors["font-weight"], "normal");
    assert_eq!(f.descriptors["unicode-range"], "U+0-10FFFF");
  }
}
