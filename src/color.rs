//! Color equivalence primitives: a named-color table plus hex/`rgb()`/
//! `hsl()` recognizers and a single `Rgba` comparison point, built directly
//! on `cssparser`'s tokenizer (spec.md §4.8).

use cssparser::{match_ignore_ascii_case, Parser, ParserInput, Token};

/// An 8-bit-per-channel color, alpha included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}

impl Rgba {
  const fn opaque(r: u8, g: u8, b: u8) -> Rgba {
    Rgba { r, g, b, a: 255 }
  }
}

/// Returns `true` if `text` is recognizable as a color: a CSS named color or
/// a hex pattern `#rgb`/`#rrggbb`/`#rgba`/`#rrggbba` (case-insensitive).
pub fn is_color_like(text: &str) -> bool {
  parse_color(text).is_some()
}

/// Parses `text` as a color, trying (in order) a hex literal, a named
/// color, and an `rgb()`/`rgba()`/`hsl()`/`hsla()` function call.
pub fn parse_color(text: &str) -> Option<Rgba> {
  let text = text.trim();
  if let Some(hex) = text.strip_prefix('#') {
    return parse_hex(hex);
  }
  if let Some(rgba) = named_color(text) {
    return Some(rgba);
  }
  parse_color_function(text)
}

/// `true` if `name` (without parens) is one of the functional color
/// notations this module understands.
pub fn is_color_function_name(name: &str) -> bool {
  matches!(
    name.to_ascii_lowercase().as_str(),
    "rgb" | "rgba" | "hsl" | "hsla"
  )
}

fn parse_hex(hex: &str) -> Option<Rgba> {
  let digit = |c: char| c.to_digit(16);
  let expand = |c: char| -> Option<u8> {
    let d = digit(c)? as u8;
    Some(d * 16 + d)
  };

  match hex.len() {
    3 => {
      let mut cs = hex.chars();
      Some(Rgba::opaque(
        expand(cs.next()?)?,
        expand(cs.next()?)?,
        expand(cs.next()?)?,
      ))
    }
    4 => {
      let mut cs = hex.chars();
      let r = expand(cs.next()?)?;
      let g = expand(cs.next()?)?;
      let b = expand(cs.next()?)?;
      let a = expand(cs.next()?)?;
      Some(Rgba { r, g, b, a })
    }
    6 => {
      let byte = |s: &str| u8::from_str_radix(s, 16).ok();
      Some(Rgba::opaque(byte(&hex[0..2])?, byte(&hex[2..4])?, byte(&hex[4..6])?))
    }
    8 => {
      let byte = |s: &str| u8::from_str_radix(s, 16).ok();
      Some(Rgba {
        r: byte(&hex[0..2])?,
        g: byte(&hex[2..4])?,
        b: byte(&hex[4..6])?,
        a: byte(&hex[6..8])?,
      })
    }
    _ => None,
  }
}

fn parse_color_function(text: &str) -> Option<Rgba> {
  let mut input = ParserInput::new(text);
  let mut parser = Parser::new(&mut input);
  let name = parser.expect_function().ok()?.to_owned();
  if !is_color_function_name(&name) {
    return None;
  }

  parser
    .parse_nested_block(|input| -> Result<Rgba, cssparser::ParseError<()>> {
      let is_hsl = name.to_ascii_lowercase().starts_with("hsl");
      let nums = parse_numeric_args(input)?;
      if is_hsl {
        if nums.len() < 3 {
          return Err(input.new_custom_error(()));
        }
        let (r, g, b) = hsl_to_rgb(nums[0], nums[1].min(100.0).max(0.0) / 100.0, nums[2].min(100.0).max(0.0) / 100.0);
        let a = nums.get(3).map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8).unwrap_or(255);
        Ok(Rgba { r, g, b, a })
      } else {
        if nums.len() < 3 {
          return Err(input.new_custom_error(()));
        }
        let a = nums.get(3).map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8).unwrap_or(255);
        Ok(Rgba {
          r: nums[0].round().clamp(0.0, 255.0) as u8,
          g: nums[1].round().clamp(0.0, 255.0) as u8,
          b: nums[2].round().clamp(0.0, 255.0) as u8,
          a,
        })
      }
    })
    .ok()
}

/// Reads a comma- or space-separated list of numbers/percentages/angles,
/// normalizing percentages for rgb channels to 0-255 and angles to degrees.
fn parse_numeric_args<'i>(input: &mut Parser<'i, '_>) -> Result<Vec<f32>, cssparser::ParseError<'i, ()>> {
  let mut values = Vec::new();
  loop {
    input.skip_whitespace();
    let _ = input.try_parse(|input| input.expect_comma());
    input.skip_whitespace();
    if input.is_exhausted() {
      break;
    }
    let location = input.current_source_location();
    match input.next()? {
      Token::Number { value, .. } => values.push(*value),
      Token::Percentage { unit_value, .. } => values.push(unit_value * 100.0),
      Token::Dimension { value, .. } => values.push(*value),
      t => return Err(location.new_unexpected_token_error(t.clone())),
    }
  }
  Ok(values)
}

/// Standard HSL → RGB conversion (hue in degrees, saturation/lightness in [0,1]).
fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
  if s == 0.0 {
    let v = (l * 255.0).round() as u8;
    return (v, v, v);
  }

  let h = ((h % 360.0) + 360.0) % 360.0 / 360.0;
  let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
  let p = 2.0 * l - q;

  let hue_to_rgb = |p: f32, q: f32, mut t: f32| {
    if t < 0.0 {
      t += 1.0;
    }
    if t > 1.0 {
      t -= 1.0;
    }
    if t < 1.0 / 6.0 {
      return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
      return q;
    }
    if t < 2.0 / 3.0 {
      return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
  };

  let r = (hue_to_rgb(p, q, h + 1.0 / 3.0) * 255.0).round() as u8;
  let g = (hue_to_rgb(p, q, h) * 255.0).round() as u8;
  let b = (hue_to_rgb(p, q, h - 1.0 / 3.0) * 255.0).round() as u8;
  (r, g, b)
}

/// The subset of CSS named colors worth carrying for equivalence testing.
/// Not exhaustive (spec.md does not require full CSS Color Module coverage,
/// only recognizing named colors for equivalence), but covers the common
/// basic and extended keyword set transpilers are likely to emit.
fn named_color(name: &str) -> Option<Rgba> {
  match_ignore_ascii_case! { name,
    "transparent" => Some(Rgba { r: 0, g: 0, b: 0, a: 0 }),
    "black" => Some(Rgba::opaque(0, 0, 0)),
    "white" => Some(Rgba::opaque(255, 255, 255)),
    "red" => Some(Rgba::opaque(255, 0, 0)),
    "green" => Some(Rgba::opaque(0, 128, 0)),
    "lime" => Some(Rgba::opaque(0, 255, 0)),
    "blue" => Some(Rgba::opaque(0, 0, 255)),
    "yellow" => Some(Rgba::opaque(255, 255, 0)),
    "cyan" | "aqua" => Some(Rgba::opaque(0, 255, 255)),
    "magenta" | "fuchsia" => Some(Rgba::opaque(255, 0, 255)),
    "silver" => Some(Rgba::opaque(192, 192, 192)),
    "gray" | "grey" => Some(Rgba::opaque(128, 128, 128)),
    "maroon" => Some(Rgba::opaque(128, 0, 0)),
    "olive" => Some(Rgba::opaque(128, 128, 0)),
    "purple" => Some(Rgba::opaque(128, 0, 128)),
    "teal" => Some(Rgba::opaque(0, 128, 128)),
    "navy" => Some(Rgba::opaque(0, 0, 128)),
    "orange" => Some(Rgba::opaque(255, 165, 0)),
    "pink" => Some(Rgba::opaque(255, 192, 203)),
    "brown" => Some(Rgba::opaque(165, 42, 42)),
    "gold" => Some(Rgba::opaque(255, 215, 0)),
    "indigo" => Some(Rgba::opaque(75, 0, 130)),
    "violet" => Some(Rgba::opaque(238, 130, 238)),
    "coral" => Some(Rgba::opaque(255, 127, 80)),
    "salmon" => Some(Rgba::opaque(250, 128, 114)),
    "khaki" => Some(Rgba::opaque(240, 230, 140)),
    "crimson" => Some(Rgba::opaque(220, 20, 60)),
    "chocolate" => Some(Rgba::opaque(210, 105, 30)),
    "tan" => Some(Rgba::opaque(210, 180, 140)),
    "turquoise" => Some(Rgba::opaque(64, 224, 208)),
    "plum" => Some(Rgba::opaque(221, 160, 221)),
    "orchid" => Some(Rgba::opaque(218, 112, 214)),
    "beige" => Some(Rgba::opaque(245, 245, 220)),
    "ivory" => Some(Rgba::opaque(255, 255, 240)),
    "lavender" => Some(Rgba::opaque(230, 230, 250)),
    "skyblue" => Some(Rgba::opaque(135, 206, 235)),
    "slategray" | "slategrey" => Some(Rgba::opaque(112, 128, 144)),
    "steelblue" => Some(Rgba::opaque(70, 130, 180)),
    "tomato" => Some(Rgba::opaque(255, 99, 71)),
    "wheat" => Some(Rgba::opaque(245, 222, 179)),
    "yellowgreen" => Some(Rgba::opaque(154, 205, 50)),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hex_forms_agree() {
    assert_eq!(parse_color("#ff0000"), parse_color("#FF0000"));
    assert_eq!(parse_color("#f00"), parse_color("#ff0000"));
    assert_eq!(parse_color("#ff0000ff"), parse_color("#ff0000"));
  }

  #[test]
  fn named_matches_hex() {
    assert_eq!(parse_color("red"), parse_color("#ff0000"));
    assert_eq!(parse_color("Red"), parse_color("#ff0000"));
  }

  #[test]
  fn rgb_function_matches_hex() {
    assert_eq!(parse_color("rgb(255,0,0)"), parse_color("#ff0000"));
    assert_eq!(parse_color("rgb(255, 0, 0)"), parse_color("red"));
  }

  #[test]
  fn hsl_function_matches_red() {
    assert_eq!(parse_color("hsl(0,100%,50%)"), parse_color("red"));
  }

  #[test]
  fn non_color_is_none() {
    assert_eq!(parse_color("1px"), None);
    assert_eq!(parse_color("solid"), None);
  }
}
