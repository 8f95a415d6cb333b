//! printf-style component formats.
//!
//! A format is attached to a variable component as in `(uid%08d)`. It drives
//! three things at once: how a value is rendered into a URL, which characters
//! the matching regex accepts, and how a matched string is converted back.
//!
//! Supported grammar: `[%][-+0]*[width][.precision](d|i|f|F|s)`.

use std::fmt;
use std::str::FromStr;

use crate::mapping::error::MappingError;
use crate::mapping::value::Value;

/// Conversion kind of a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    Integer,
    Float,
    Text,
}

/// A parsed component format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    spec: String,
    left: bool,
    zero: bool,
    plus: bool,
    width: usize,
    precision: Option<usize>,
    conversion: Conversion,
}

impl Format {
    /// Parse a format spec, with or without its leading `%`.
    pub fn parse(spec: &str) -> Result<Self, MappingError> {
        let invalid = || MappingError::InvalidFormat {
            spec: spec.to_string(),
        };
        let body = spec.strip_prefix('%').unwrap_or(spec);
        let mut chars = body.chars().peekable();

        let (mut left, mut zero, mut plus) = (false, false, false);
        while let Some(&c) = chars.peek() {
            match c {
                '-' => left = true,
                '0' => zero = true,
                '+' => plus = true,
                _ => break,
            }
            chars.next();
        }

        let mut width = 0usize;
        while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
            width = width * 10 + d as usize;
            chars.next();
        }

        let mut precision = None;
        if chars.peek() == Some(&'.') {
            chars.next();
            let mut p = 0usize;
            while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
                p = p * 10 + d as usize;
                chars.next();
            }
            precision = Some(p);
        }

        let conversion = match chars.next() {
            Some('d') | Some('i') => Conversion::Integer,
            Some('f') | Some('F') => Conversion::Float,
            Some('s') => Conversion::Text,
            _ => return Err(invalid()),
        };
        if chars.next().is_some() {
            return Err(invalid());
        }

        Ok(Self {
            spec: body.to_string(),
            left,
            zero,
            plus,
            width,
            precision,
            conversion,
        })
    }

    /// The spec without its leading `%`, e.g. `08d`.
    pub fn as_str(&self) -> &str {
        &self.spec
    }

    pub fn conversion(&self) -> Conversion {
        self.conversion
    }

    /// Render a value, or `None` if the value does not fit the conversion.
    pub fn apply(&self, value: &Value) -> Option<String> {
        match self.conversion {
            Conversion::Integer => {
                let mut digits = value.as_int()?.unsigned_abs().to_string();
                if let Some(p) = self.precision {
                    digits = format!("{:0>p$}", digits, p = p);
                }
                Some(self.pad_numeric(value.as_int()? < 0, digits))
            }
            Conversion::Float => {
                let v = value.as_float().filter(|v| v.is_finite())?;
                let digits = format!("{:.p$}", v.abs(), p = self.precision.unwrap_or(6));
                Some(self.pad_numeric(v.is_sign_negative() && v != 0.0, digits))
            }
            Conversion::Text => {
                let mut text = value.to_string();
                if let Some(p) = self.precision {
                    text = text.chars().take(p).collect();
                }
                Some(self.pad_text(text))
            }
        }
    }

    /// Regex fragment (no group) accepted for this conversion, over the
    /// percent-encoded component. Space padding shows up as `%20`.
    ///
    /// Accepts exactly the encodings of what [`Format::try_coerce`] accepts.
    pub fn capture_class(&self) -> &'static str {
        match self.conversion {
            Conversion::Integer => "(?:%20)*[+-]?[0-9]+(?:%20)*",
            Conversion::Float => r"(?:%20)*[+-]?[0-9]+(?:\.[0-9]*)?(?:%20)*",
            Conversion::Text => "[^/]+",
        }
    }

    /// Convert a decoded component back to a typed value, or `None` if it
    /// does not fit the conversion. Padding spaces are ignored for numbers.
    pub fn try_coerce(&self, raw: &str) -> Option<Value> {
        let number = raw.trim_matches(' ');
        match self.conversion {
            Conversion::Integer if is_numeral(number, false) => number.parse().ok().map(Value::Int),
            Conversion::Float if is_numeral(number, true) => number.parse().ok().map(Value::Float),
            Conversion::Text if !raw.is_empty() => Some(Value::from(raw)),
            _ => None,
        }
    }

    fn pad_numeric(&self, negative: bool, digits: String) -> String {
        let sign = if negative {
            "-"
        } else if self.plus {
            "+"
        } else {
            ""
        };
        let len = sign.len() + digits.len();
        if len >= self.width {
            return format!("{}{}", sign, digits);
        }
        let fill = self.width - len;
        if self.left {
            format!("{}{}{}", sign, digits, " ".repeat(fill))
        } else if self.zero {
            format!("{}{}{}", sign, "0".repeat(fill), digits)
        } else {
            format!("{}{}{}", " ".repeat(fill), sign, digits)
        }
    }

    fn pad_text(&self, text: String) -> String {
        let len = text.chars().count();
        if len >= self.width {
            text
        } else if self.left {
            format!("{}{}", text, " ".repeat(self.width - len))
        } else {
            format!("{}{}", " ".repeat(self.width - len), text)
        }
    }
}

/// `[+-]?[0-9]+`, plus `(\.[0-9]*)?` when `fraction` is set.
fn is_numeral(s: &str, fraction: bool) -> bool {
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (whole, frac) = match unsigned.split_once('.') {
        Some((whole, frac)) if fraction => (whole, frac),
        Some(_) => return false,
        None => (unsigned, ""),
    };
    !whole.is_empty()
        && whole.bytes().all(|b| b.is_ascii_digit())
        && frac.bytes().all(|b| b.is_ascii_digit())
}

impl FromStr for Format {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::parse(s)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.spec)
    }
}
