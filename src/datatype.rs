// used for time-like values
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
// used to gate string to time parsing
use lazy_static::lazy_static;
use regex::Regex;

// used to print out readable forms of a value
use std::fmt;

use crate::error::CoercionError;

lazy_static! {
    // a date has to lead the string before chrono gets a look at it
    static ref DATE_PREFIX: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap();
}

/// Whatever a caller hands to a setter before coercion.
///
/// Plain Rust values convert into `Raw` through `From`, so setters can take
/// `impl Into<Raw>` and accept `5`, `"5"`, `2.5f32`, `true`, `"TRUE"`,
/// a chrono timestamp, a `serde_json::Value` or an already coerced [`Value`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Raw {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Time(DateTime<FixedOffset>),
    /// Anything structured (lists, objects); never coercible to a scalar.
    Other(&'static str),
}

impl Raw {
    pub fn is_null(&self) -> bool {
        matches!(self, Raw::Null)
    }
    fn describe(&self) -> String {
        match self {
            Raw::Null => String::from("null"),
            Raw::Bool(b) => b.to_string(),
            Raw::Int(i) => i.to_string(),
            Raw::UInt(u) => u.to_string(),
            Raw::Float(f) => f.to_string(),
            Raw::Str(s) => s.clone(),
            Raw::Time(t) => t.to_rfc3339(),
            Raw::Other(shape) => String::from(*shape),
        }
    }
    fn shape(&self) -> &'static str {
        match self {
            Raw::Null => "null",
            Raw::Bool(_) => "boolean",
            Raw::Int(_) | Raw::UInt(_) => "integer",
            Raw::Float(_) => "float",
            Raw::Str(_) => "string",
            Raw::Time(_) => "time",
            Raw::Other(shape) => *shape,
        }
    }
}

macro_rules! raw_from {
    ($variant:ident as $target:ty: $($t:ty),+) => {
        $(
            impl From<$t> for Raw {
                fn from(v: $t) -> Self {
                    Raw::$variant(v as $target)
                }
            }
        )+
    };
}
raw_from!(Int as i64: i8, i16, i32, i64, u8, u16, u32);
raw_from!(UInt as u64: u64, usize);
raw_from!(Float as f64: f32, f64);

impl From<bool> for Raw {
    fn from(v: bool) -> Self {
        Raw::Bool(v)
    }
}
impl From<&str> for Raw {
    fn from(v: &str) -> Self {
        Raw::Str(v.to_owned())
    }
}
impl From<String> for Raw {
    fn from(v: String) -> Self {
        Raw::Str(v)
    }
}
impl From<&String> for Raw {
    fn from(v: &String) -> Self {
        Raw::Str(v.clone())
    }
}
impl From<DateTime<FixedOffset>> for Raw {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Raw::Time(v)
    }
}
impl From<DateTime<Utc>> for Raw {
    fn from(v: DateTime<Utc>) -> Self {
        Raw::Time(v.fixed_offset())
    }
}
impl From<NaiveDateTime> for Raw {
    fn from(v: NaiveDateTime) -> Self {
        Raw::Time(v.and_utc().fixed_offset())
    }
}
impl From<NaiveDate> for Raw {
    fn from(v: NaiveDate) -> Self {
        Raw::Time(v.and_time(NaiveTime::MIN).and_utc().fixed_offset())
    }
}
impl From<&Raw> for Raw {
    fn from(v: &Raw) -> Self {
        v.clone()
    }
}
impl<T: Into<Raw>> From<Option<T>> for Raw {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Raw::Null)
    }
}
impl From<Value> for Raw {
    fn from(v: Value) -> Self {
        match v {
            Value::Integer(i) => Raw::Int(i),
            Value::Float(f) => Raw::Float(f),
            Value::String(s) => Raw::Str(s),
            Value::Boolean(b) => Raw::Bool(b),
            Value::Time(t) => Raw::Time(t),
            Value::Null => Raw::Null,
        }
    }
}
impl From<&Value> for Raw {
    fn from(v: &Value) -> Self {
        Raw::from(v.clone())
    }
}
impl From<serde_json::Value> for Raw {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Raw::Null,
            serde_json::Value::Bool(b) => Raw::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Raw::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Raw::UInt(u)
                } else {
                    Raw::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Raw::Str(s),
            serde_json::Value::Array(_) => Raw::Other("list"),
            serde_json::Value::Object(_) => Raw::Other("map"),
        }
    }
}

// ------------- Value -------------
/// The canonical form every coerced input ends up in.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Time(DateTime<FixedOffset>),
    #[default]
    Null,
}

impl Value {
    /// Coerces into `Integer` or `Float`. Null and the empty string are absent.
    pub fn number(raw: impl Into<Raw>) -> Result<Value, CoercionError> {
        let raw = raw.into();
        match raw {
            Raw::Null => Ok(Value::Null),
            Raw::Int(i) => Ok(Value::Integer(i)),
            Raw::UInt(u) => unsigned(u).ok_or_else(|| CoercionError::NotNumeric(u.to_string())),
            Raw::Float(f) => finite(f),
            Raw::Str(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(Value::Null);
                }
                parse_number(trimmed).unwrap_or_else(|| Err(CoercionError::NotNumeric(s)))
            }
            other => Err(CoercionError::NotNumeric(other.describe())),
        }
    }

    /// Coerces into `Boolean`; accepts `"true"` and `"false"` in any case.
    pub fn boolean(raw: impl Into<Raw>) -> Result<Value, CoercionError> {
        let raw = raw.into();
        match raw {
            Raw::Null => Ok(Value::Null),
            Raw::Bool(b) => Ok(Value::Boolean(b)),
            Raw::Str(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Ok(Value::Null)
                } else if trimmed.eq_ignore_ascii_case("true") {
                    Ok(Value::Boolean(true))
                } else if trimmed.eq_ignore_ascii_case("false") {
                    Ok(Value::Boolean(false))
                } else {
                    Err(CoercionError::NotBoolean(s))
                }
            }
            other => Err(CoercionError::NotBoolean(other.describe())),
        }
    }

    /// Typed passthrough, then number, then time, then the string as is.
    pub fn string_number_or_time(raw: impl Into<Raw>) -> Result<Value, CoercionError> {
        let raw = raw.into();
        match raw {
            Raw::Null => Ok(Value::Null),
            Raw::Int(_) | Raw::UInt(_) | Raw::Float(_) => Value::number(raw),
            Raw::Time(t) => Ok(Value::Time(t)),
            Raw::Str(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(Value::Null);
                }
                if let Some(Ok(number)) = parse_number(trimmed) {
                    return Ok(number);
                }
                if let Some(time) = parse_time(trimmed) {
                    return Ok(Value::Time(time));
                }
                Ok(Value::String(s))
            }
            other => Err(CoercionError::Unsupported {
                expected: "string, number or time",
                found: other.shape(),
            }),
        }
    }

    /// Like [`Value::string_number_or_time`] but booleans are fine too.
    pub fn coerce(raw: impl Into<Raw>) -> Result<Value, CoercionError> {
        match raw.into() {
            Raw::Bool(b) => Ok(Value::Boolean(b)),
            other => Value::string_number_or_time(other),
        }
    }

    /// Strings only; numbers are rendered, everything else is rejected.
    pub fn string(raw: impl Into<Raw>) -> Result<Value, CoercionError> {
        match raw.into() {
            Raw::Null => Ok(Value::Null),
            Raw::Str(s) if s.is_empty() => Ok(Value::Null),
            Raw::Str(s) => Ok(Value::String(s)),
            Raw::Int(i) => Ok(Value::String(i.to_string())),
            Raw::UInt(u) => Ok(Value::String(u.to_string())),
            Raw::Float(f) if f.is_finite() => Ok(Value::String(f.to_string())),
            other => Err(CoercionError::Unsupported {
                expected: "string",
                found: other.shape(),
            }),
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Null)
    }
    /// True for an absent value or the zero value of its type.
    pub fn is_nil_or_zero(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Integer(i) => *i == 0,
            Value::Float(f) => *f == 0.0,
            Value::String(s) => s.is_empty(),
            Value::Boolean(b) => !*b,
            Value::Time(_) => false,
        }
    }
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
    pub fn as_time(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Value::Time(t) => Some(t),
            _ => None,
        }
    }
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::Time(_) => "time",
            Value::Null => "null",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::String(s) => write!(f, "{}", s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Time(t) => write!(f, "{}", format_time(t)),
            Value::Null => write!(f, "null"),
        }
    }
}

/// Canonical wire rendering of a time value.
pub fn format_time(t: &DateTime<FixedOffset>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses the time formats the wire uses, UTC unless an offset is given.
pub fn parse_time(s: &str) -> Option<DateTime<FixedOffset>> {
    if !DATE_PREFIX.is_match(s) {
        return None;
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, format) {
            return Some(t.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc().fixed_offset())
}

fn parse_number(s: &str) -> Option<Result<Value, CoercionError>> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Ok(Value::Integer(i)));
    }
    if let Ok(u) = s.parse::<u64>() {
        return Some(unsigned(u).ok_or_else(|| CoercionError::NotNumeric(s.to_owned())));
    }
    // "inf" and "nan" parse as floats but are words, not numbers
    if !s.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<f64>().ok().map(finite)
}

fn unsigned(u: u64) -> Option<Value> {
    if let Ok(i) = i64::try_from(u) {
        return Some(Value::Integer(i));
    }
    let f = u as f64;
    // only keep it when the float holds it exactly
    if f < 18446744073709551616.0 && f as u64 == u {
        Some(Value::Float(f))
    } else {
        None
    }
}

fn finite(f: f64) -> Result<Value, CoercionError> {
    if f.is_finite() {
        Ok(Value::Float(f))
    } else {
        Err(CoercionError::NotFinite(f))
    }
}
