//! The value model (spec.md §4.8).
//!
//! `ValueFactory::from_resolved` is the one function spec.md §7 marks "fatal
//! per-call" on an unrecognized kind; in this implementation `Literal` is the
//! universal fallback so that path is unreachable, matching the narrative
//! that it "indicates a parser/engine mismatch" rather than ordinary input.

use crate::color;

/// A classified CSS value, tagged per spec.md §3.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Literal(String),
  ListLiteral(Vec<String>),
  Function { name: String, args: Vec<String> },
  Url(String),
}

/// Builds a [`Value`] from a declaration's raw, already-`!important`-stripped
/// text.
pub struct ValueFactory;

impl ValueFactory {
  pub fn from_resolved(raw: &str) -> Value {
    let raw = raw.trim();

    if let Some(items) = split_top_level_commas(raw) {
      return Value::ListLiteral(items.into_iter().map(|s| s.trim().to_string()).collect());
    }

    if let Some((name, args)) = function_call(raw) {
      if name.eq_ignore_ascii_case("url") {
        return Value::Url(args.into_iter().next().unwrap_or_default());
      }
      return Value::Function { name, args };
    }

    Value::Literal(raw.to_string())
  }
}

/// Splits `raw` on top-level commas (outside parens/brackets/quotes) and
/// returns `Some` only when there is more than one element, so a lone
/// trailing comma or a comma inside a function call does not force a list.
fn split_top_level_commas(raw: &str) -> Option<Vec<&str>> {
  let bytes = raw.as_bytes();
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
        parts.push(&raw[start..i]);
        start = i + 1;
      }
      _ => {}
    }
  }
  parts.push(&raw[start..]);
  if parts.len() > 1 {
    Some(parts)
  } else {
    None
  }
}

/// Recognizes `name(args)` where `args` is a comma-separated argument list,
/// and the whole string is exactly that call (nothing trailing).
fn function_call(raw: &str) -> Option<(String, Vec<String>)> {
  let open = raw.find('(')?;
  if !raw.ends_with(')') {
    return None;
  }
  let name = &raw[..open];
  if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
    return None;
  }
  let inner = &raw[open + 1..raw.len() - 1];
  let args = split_top_level_commas(inner)
    .unwrap_or_else(|| vec![inner])
    .into_iter()
    .map(|s| s.trim().to_string())
    .collect();
  Some((name.to_string(), args))
}

/// Strips wrapping single/double quotes and converts inner single-quotes to
/// double-quotes, per spec.md §4.8's Literal string normalization.
fn normalize_string(s: &str) -> String {
  let unwrapped = if s.len() >= 2 {
    let bytes = s.as_bytes();
    let first = bytes[0];
    let last = bytes[bytes.len() - 1];
    if (first == b'"' || first == b'\'') && first == last {
      &s[1..s.len() - 1]
    } else {
      s
    }
  } else {
    s
  };
  unwrapped.replace('\'', "\"")
}

/// Normalizes a `url(...)` argument: strips quotes and a leading `./`.
fn normalize_url(s: &str) -> String {
  let unwrapped = normalize_string(s.trim());
  unwrapped.strip_prefix("./").unwrap_or(&unwrapped).to_string()
}

impl Value {
  /// Structural equality per spec.md §4.8. `important` is intentionally not
  /// a parameter here — it belongs to the binding, not the value (enforced
  /// by callers comparing both fields, see `crate::property`).
  pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
      (Value::Literal(x), Value::Literal(y)) => literals_equal(x, y),
      (Value::ListLiteral(xs), Value::ListLiteral(ys)) => {
        xs.len() == ys.len() && xs.iter().zip(ys.iter()).all(|(x, y)| literals_equal(x, y))
      }
      (Value::Function { name: nx, args: xs }, Value::Function { name: ny, args: ys }) => {
        if color::is_color_function_name(nx) && color::is_color_function_name(ny) {
          let cx = color::parse_color(&format!("{}({})", nx, xs.join(",")));
          let cy = color::parse_color(&format!("{}({})", ny, ys.join(",")));
          match (cx, cy) {
            (Some(cx), Some(cy)) => cx == cy,
            _ => false,
          }
        } else {
          xs.len() == ys.len() && xs.iter().zip(ys.iter()).all(|(x, y)| literals_equal(x, y))
        }
      }
      (Value::Url(x), Value::Url(y)) => normalize_url(x) == normalize_url(y),
      (Value::Literal(x), Value::Function { name, args }) | (Value::Function { name, args }, Value::Literal(x)) => {
        color::is_color_like(x)
          && color::is_color_function_name(name)
          && color::parse_color(x) == color::parse_color(&format!("{}({})", name, args.join(",")))
      }
      _ => false,
    }
  }
}

fn literals_equal(a: &str, b: &str) -> bool {
  if color::is_color_like(a) && color::is_color_like(b) {
    return color::parse_color(a) == color::parse_color(b);
  }
  normalize_string(a) == normalize_string(b)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn literal_color_equivalence() {
    let a = ValueFactory::from_resolved("red");
    let b = ValueFactory::from_resolved("#ff0000");
    assert!(Value::values_equal(&a, &b));
  }

  #[test]
  fn list_literal_pairwise_equal() {
    let a = ValueFactory::from_resolved("1px, red");
    let b = ValueFactory::from_resolved("1px, #ff0000");
    assert!(Value::values_equal(&a, &b));
  }

  #[test]
  fn literal_and_function_color_equivalence() {
    let a = ValueFactory::from_resolved("red");
    let b = ValueFactory::from_resolved("rgb(255,0,0)");
    assert!(Value::values_equal(&a, &b));
    assert!(Value::values_equal(&b, &a));

    let c = ValueFactory::from_resolved("#ff0000");
    let d = ValueFactory::from_resolved("hsl(0,100%,50%)");
    assert!(Value::values_equal(&c, &d));
  }

  #[test]
  fn function_color_equivalence() {
    let a = ValueFactory::from_resolved("rgb(255,0,0)");
    let b = ValueFactory::from_resolved("hsl(0,100%,50%)");
    assert!(Value::values_equal(&a, &b));
  }

  #[test]
  fn function_non_color_arity_and_args() {
    let a = ValueFactory::from_resolved("calc(1px + 2px)");
    let b = ValueFactory::from_resolved("calc(1px + 2px)");
    assert!(Value::values_equal(&a, &b));

    let c = ValueFactory::from_resolved("calc(1px + 3px)");
    assert!(!Value::values_equal(&a, &c));
  }

  #[test]
  fn url_normalization() {
    let a = ValueFactory::from_resolved("url(\"./a.png\")");
    let b = ValueFactory::from_resolved("url('a.png')");
    let c = ValueFactory::from_resolved("url(a.png)");
    assert!(Value::values_equal(&a, &b));
    assert!(Value::values_equal(&b, &c));
  }

  #[test]
  fn quote_normalization() {
    let a = ValueFactory::from_resolved("'Helvetica Neue'");
    let b = ValueFactory::from_resolved("\"Helvetica Neue\"");
    assert!(Value::values_equal(&a, &b));
  }
}
