//! Canonical code normalization.
//!
//! Source datasets encode codes as JSON numbers, short strings, or strings that
//! are already zero-padded. Everything is folded into a fixed-width digit
//! string here, before any record reaches the importer or the store. Values are
//! padded but never truncated.

use std::fmt;

use serde_json::{Number, Value};

use crate::geo::Level;

/// The kind of code being normalized, which fixes its width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
  Province,
  District,
  Subdistrict,
  Postal,
}

impl CodeKind {
  pub const fn width(self) -> usize {
    match self {
      CodeKind::Province => 2,
      CodeKind::District => 4,
      CodeKind::Subdistrict => 6,
      CodeKind::Postal => 5,
    }
  }

  /// Postal codes may be absent; the three level codes may not.
  pub const fn is_optional(self) -> bool { matches!(self, CodeKind::Postal) }
}

impl From<Level> for CodeKind {
  fn from(level: Level) -> Self {
    match level {
      Level::Province => CodeKind::Province,
      Level::District => CodeKind::District,
      Level::Subdistrict => CodeKind::Subdistrict,
    }
  }
}

/// A data-quality problem noticed while normalizing. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QualityWarning {
  /// A required code was absent or empty.
  Missing,
  /// The raw value was neither a string nor a number.
  UnrecognizedType(&'static str),
  /// The value is wider than the canonical width and was kept as-is.
  Overlong { len: usize },
  /// The value contains something other than ASCII digits.
  NonDigit,
}

impl fmt::Display for QualityWarning {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      QualityWarning::Missing => f.write_str("missing value"),
      QualityWarning::UnrecognizedType(t) => write!(f, "unrecognized {t} value"),
      QualityWarning::Overlong { len } => write!(f, "{len} characters, wider than canonical"),
      QualityWarning::NonDigit => f.write_str("non-digit characters"),
    }
  }
}

/// Result of normalizing one raw field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
  pub code:    String,
  pub warning: Option<QualityWarning>,
}

impl Normalized {
  fn clean(code: String) -> Self { Self { code, warning: None } }

  fn warn(code: String, warning: QualityWarning) -> Self {
    Self { code, warning: Some(warning) }
  }

  pub fn is_empty(&self) -> bool { self.code.is_empty() }
}

/// Normalize `raw` into the canonical representation for `kind`.
///
/// `None` and JSON `null` are treated alike. For postal codes, zero and
/// all-zero strings also normalize to the empty code.
pub fn normalize(kind: CodeKind, raw: Option<&Value>) -> Normalized {
  let width = kind.width();
  match raw {
    None | Some(Value::Null) => absent(kind),
    Some(Value::Number(n)) => number(kind, n),
    Some(Value::String(s)) => {
      let s = s.trim();
      if s.is_empty() || (kind.is_optional() && s.bytes().all(|b| b == b'0')) {
        return absent(kind);
      }
      let padded = pad(s, width);
      if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Normalized::warn(padded, QualityWarning::NonDigit);
      }
      check_width(padded, width)
    }
    Some(other @ Value::Bool(_)) => {
      Normalized::warn(other.to_string(), QualityWarning::UnrecognizedType("boolean"))
    }
    Some(other @ Value::Array(_)) => {
      Normalized::warn(other.to_string(), QualityWarning::UnrecognizedType("array"))
    }
    Some(other @ Value::Object(_)) => {
      Normalized::warn(other.to_string(), QualityWarning::UnrecognizedType("object"))
    }
  }
}

/// Extract a lookup key from a source identifier field.
///
/// Integral numbers print without a fraction; strings are trimmed. Anything
/// else (including empty strings) yields no key.
pub fn source_key(raw: Option<&Value>) -> Option<String> {
  match raw? {
    Value::Number(n) => Some(match n.as_i64() {
      Some(i) => i.to_string(),
      None => n.to_string(),
    }),
    Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
    _ => None,
  }
}

/// Integral digits of `n`, formatted without going through a narrower type.
fn number(kind: CodeKind, n: &Number) -> Normalized {
  let digits = if let Some(u) = n.as_u64() {
    u.to_string()
  } else if let Some(i) = n.as_i64() {
    return Normalized::warn(i.to_string(), QualityWarning::NonDigit);
  } else {
    match n.as_f64().map(f64::trunc) {
      Some(f) if f >= 0.0 && f < u64::MAX as f64 => (f as u64).to_string(),
      Some(f) if f < 0.0 && f > i64::MIN as f64 => {
        return Normalized::warn((f as i64).to_string(), QualityWarning::NonDigit);
      }
      // Exponent notation; keep the source spelling.
      _ => return Normalized::warn(n.to_string(), QualityWarning::NonDigit),
    }
  };
  if kind.is_optional() && digits.bytes().all(|b| b == b'0') {
    return Normalized::clean(String::new());
  }
  check_width(pad(&digits, kind.width()), kind.width())
}

fn absent(kind: CodeKind) -> Normalized {
  if kind.is_optional() {
    Normalized::clean(String::new())
  } else {
    Normalized::warn(String::new(), QualityWarning::Missing)
  }
}

fn pad(s: &str, width: usize) -> String {
  let len = s.chars().count();
  if len >= width {
    s.to_owned()
  } else {
    let mut out = "0".repeat(width - len);
    out.push_str(s);
    out
  }
}

fn check_width(code: String, width: usize) -> Normalized {
  let len = code.chars().count();
  if len > width {
    Normalized::warn(code, QualityWarning::Overlong { len })
  } else {
    Normalized::clean(code)
  }
}
