//! Parameter mixins.
//!
//! Every mixin is a small value type owning one or two wire keys. A kind
//! composes the mixins it needs as plain fields, so the set of parameters a
//! kind carries is fixed at definition time. Each mixin knows its default,
//! how to coerce loose input, and how to write itself into and read itself
//! out of the intermediate [`Map`] shared by both wire formats.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use crate::codec::{Map, Node};
use crate::datatype::{Raw, Value};
use crate::error::{CoercionError, ParamError};

// ------------- Defaults -------------
pub const DEFAULT_FORMAT: &str = "strict_date_optional_time||epoch_millis";
pub const DEFAULT_FUZZINESS: &str = "0";
pub const DEFAULT_MAX_EXPANSIONS: u32 = 50;
pub const DEFAULT_TRANSPOSITIONS: bool = true;
pub const DEFAULT_NORMS: bool = true;
pub const DEFAULT_DOC_VALUES: bool = true;
pub const DEFAULT_INDEX: bool = true;
pub const DEFAULT_STORE: bool = false;
pub const DEFAULT_IGNORE_MALFORMED: bool = false;
pub const DEFAULT_POSITIVE_SCORE_IMPACT: bool = true;
pub const DEFAULT_FUZZY_TRANSPOSITIONS: bool = true;
pub const DEFAULT_PREFIX_LENGTH: i64 = 0;
pub const DEFAULT_BOOST: f64 = 1.0;

lazy_static! {
    static ref TOP_TERMS: Regex =
        Regex::new(r"^top_terms_(?:(blended_freqs|boost)_)?([0-9]+)$").unwrap();
}

/// Storage for a parameter that distinguishes "never touched" from
/// "explicitly set", even when the explicit value equals the default.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Setting<T> {
    #[default]
    Unset,
    Explicit(T),
}

/// What a caller can observe about a [`Setting`] given the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Unset,
    ExplicitDefault,
    ExplicitNonDefault,
}

impl<T> Setting<T> {
    pub fn explicit(&self) -> Option<&T> {
        match self {
            Setting::Explicit(v) => Some(v),
            Setting::Unset => None,
        }
    }
    pub fn is_set(&self) -> bool {
        matches!(self, Setting::Explicit(_))
    }
    pub fn get_or<'a>(&'a self, default: &'a T) -> &'a T {
        self.explicit().unwrap_or(default)
    }
    pub fn state(&self, default: &T) -> State
    where
        T: PartialEq,
    {
        match self {
            Setting::Unset => State::Unset,
            Setting::Explicit(v) if v == default => State::ExplicitDefault,
            Setting::Explicit(_) => State::ExplicitNonDefault,
        }
    }
}

impl<T> From<Option<T>> for Setting<T> {
    fn from(v: Option<T>) -> Self {
        v.map(Setting::Explicit).unwrap_or(Setting::Unset)
    }
}

/// Shared surface of every mixin.
pub trait Param {
    /// Wire keys owned by this mixin.
    const KEYS: &'static [&'static str];
    /// True when unset or holding the value the wire treats as default.
    fn is_default(&self) -> bool;
    fn encode(&self, out: &mut Map) -> Result<(), ParamError>;
    /// Present keys overwrite whatever is held; absent keys are left alone.
    fn decode(&mut self, wire: &Map) -> Result<(), ParamError>;
    fn clear(&mut self);
}

fn string_of(param: &'static str, raw: impl Into<Raw>) -> Result<Option<String>, ParamError> {
    match Value::string(raw).map_err(|e| ParamError::coercion(param, e))? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn put(out: &mut Map, key: &str, value: Value) {
    out.insert(key.to_owned(), Node::Value(value));
}

/// Mixins that leave defaults off the wire compare by what their getters
/// report, so an explicit default equals unset. `state()` still tells them apart.
macro_rules! eq_by {
    ($name:ident, $($getter:ident),+) => {
        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                true $(&& self.$getter() == other.$getter())+
            }
        }
    };
}

// ------------- Boolean flags -------------
macro_rules! bool_param {
    ($(#[$doc:meta])* $name:ident, $key:literal, $getter:ident, $setter:ident, $default:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default)]
        pub struct $name {
            value: Setting<bool>,
        }
        eq_by!($name, $getter);
        impl $name {
            pub fn $getter(&self) -> bool {
                *self.value.get_or(&$default)
            }
            /// Null or an empty string resets to unset.
            pub fn $setter(&mut self, v: impl Into<Raw>) -> Result<(), ParamError> {
                let coerced = Value::boolean(v).map_err(|e| ParamError::coercion($key, e))?;
                self.value = coerced.as_bool().into();
                Ok(())
            }
            pub fn state(&self) -> State {
                self.value.state(&$default)
            }
        }
        impl Param for $name {
            const KEYS: &'static [&'static str] = &[$key];
            fn is_default(&self) -> bool {
                self.$getter() == $default
            }
            fn encode(&self, out: &mut Map) -> Result<(), ParamError> {
                if !self.is_default() {
                    put(out, $key, Value::Boolean(self.$getter()));
                }
                Ok(())
            }
            fn decode(&mut self, wire: &Map) -> Result<(), ParamError> {
                if let Some(node) = wire.get($key) {
                    self.$setter(node)?;
                }
                Ok(())
            }
            fn clear(&mut self) {
                self.value = Setting::Unset;
            }
        }
    };
}

bool_param!(
    /// Whether edits include transpositions of two adjacent characters (ab → ba).
    TranspositionsParam, "transpositions", transpositions, set_transpositions, DEFAULT_TRANSPOSITIONS
);
bool_param!(
    /// Whether field length is taken into account when scoring queries.
    /// Norms can be disabled but not re-enabled after the fact.
    NormsParam, "norms", norms, set_norms, DEFAULT_NORMS
);
bool_param!(
    /// Whether the field is stored on disk in a column-stride fashion for
    /// sorting, aggregations and scripting.
    DocValuesParam, "doc_values", doc_values, set_doc_values, DEFAULT_DOC_VALUES
);
bool_param!(
    /// Whether the field is searchable.
    IndexParam, "index", index, set_index, DEFAULT_INDEX
);
bool_param!(
    /// Whether the field value is stored apart from `_source`.
    StoreParam, "store", store, set_store, DEFAULT_STORE
);
bool_param!(
    /// Whether malformed values are ignored instead of rejecting the document.
    IgnoreMalformedParam, "ignore_malformed", ignore_malformed, set_ignore_malformed, DEFAULT_IGNORE_MALFORMED
);
bool_param!(
    /// Whether fuzzy matching of the terms counts transpositions as one edit.
    FuzzyTranspositionsParam, "fuzzy_transpositions", fuzzy_transpositions, set_fuzzy_transpositions,
    DEFAULT_FUZZY_TRANSPOSITIONS
);

// ------------- Optional strings -------------
macro_rules! string_param {
    ($(#[$doc:meta])* $name:ident, $key:literal, $getter:ident, $setter:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct $name {
            value: Setting<String>,
        }
        impl $name {
            pub fn $getter(&self) -> Option<&str> {
                self.value.explicit().map(String::as_str)
            }
            pub fn $setter(&mut self, v: impl Into<Raw>) -> Result<(), ParamError> {
                self.value = string_of($key, v)?.into();
                Ok(())
            }
        }
        impl Param for $name {
            const KEYS: &'static [&'static str] = &[$key];
            fn is_default(&self) -> bool {
                !self.value.is_set()
            }
            fn encode(&self, out: &mut Map) -> Result<(), ParamError> {
                if let Some(v) = self.$getter() {
                    put(out, $key, Value::String(v.to_owned()));
                }
                Ok(())
            }
            fn decode(&mut self, wire: &Map) -> Result<(), ParamError> {
                if let Some(node) = wire.get($key) {
                    self.$setter(node)?;
                }
                Ok(())
            }
            fn clear(&mut self) {
                self.value = Setting::Unset;
            }
        }
    };
}

string_param!(
    /// Coordinated Universal Time (UTC) offset or IANA time zone used to
    /// convert date values in the query to UTC.
    TimeZoneParam, "time_zone", time_zone, set_time_zone
);
string_param!(
    /// Analyzer used to convert text into tokens.
    AnalyzerParam, "analyzer", analyzer, set_analyzer
);
string_param!(
    /// Name used to identify the clause in `matched_queries`.
    NameParam, "_name", name, set_name
);
string_param!(
    /// Minimum number of optional clauses that must match, as a count
    /// (`2`, `-1`) or a percentage (`"75%"`).
    MinimumShouldMatchParam, "minimum_should_match", minimum_should_match, set_minimum_should_match
);

// ------------- Required strings -------------
macro_rules! required_string_param {
    ($(#[$doc:meta])* $name:ident, $key:literal, $getter:ident, $setter:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct $name {
            value: Option<String>,
        }
        impl $name {
            pub fn $getter(&self) -> Option<&str> {
                self.value.as_deref()
            }
            pub fn $setter(&mut self, v: impl Into<Raw>) -> Result<(), ParamError> {
                match string_of($key, v)? {
                    Some(s) => {
                        self.value = Some(s);
                        Ok(())
                    }
                    None => Err(ParamError::Required { param: $key }),
                }
            }
            pub fn require(&self) -> Result<(), ParamError> {
                match self.value {
                    Some(_) => Ok(()),
                    None => Err(ParamError::Required { param: $key }),
                }
            }
        }
        impl Param for $name {
            const KEYS: &'static [&'static str] = &[$key];
            fn is_default(&self) -> bool {
                self.value.is_none()
            }
            fn encode(&self, out: &mut Map) -> Result<(), ParamError> {
                let v = self.value.as_ref().ok_or(ParamError::Required { param: $key })?;
                put(out, $key, Value::String(v.clone()));
                Ok(())
            }
            fn decode(&mut self, wire: &Map) -> Result<(), ParamError> {
                if let Some(node) = wire.get($key) {
                    self.$setter(node)?;
                }
                Ok(())
            }
            fn clear(&mut self) {
                self.value = None;
            }
        }
    };
}

required_string_param!(
    /// Text to search for.
    QueryParam, "query", query, set_query
);
required_string_param!(
    /// Term to find in the field.
    TermParam, "value", value, set_value
);

// ------------- Format -------------
/// The date format(s) that can be parsed.
///
/// Defaults to `strict_date_optional_time||epoch_millis`, which accepts dates
/// with optional timestamps or milliseconds since the epoch.
#[derive(Debug, Clone, Default)]
pub struct FormatParam {
    value: Setting<String>,
}

eq_by!(FormatParam, format);

impl FormatParam {
    pub fn format(&self) -> &str {
        self.value.explicit().map(String::as_str).unwrap_or(DEFAULT_FORMAT)
    }
    pub fn set_format(&mut self, v: impl Into<Raw>) -> Result<(), ParamError> {
        self.value = string_of("format", v)?.into();
        Ok(())
    }
    pub fn state(&self) -> State {
        match &self.value {
            Setting::Unset => State::Unset,
            Setting::Explicit(v) if v == DEFAULT_FORMAT => State::ExplicitDefault,
            Setting::Explicit(_) => State::ExplicitNonDefault,
        }
    }
}

impl Param for FormatParam {
    const KEYS: &'static [&'static str] = &["format"];
    fn is_default(&self) -> bool {
        self.format() == DEFAULT_FORMAT
    }
    fn encode(&self, out: &mut Map) -> Result<(), ParamError> {
        if !self.is_default() {
            put(out, "format", Value::String(self.format().to_owned()));
        }
        Ok(())
    }
    fn decode(&mut self, wire: &Map) -> Result<(), ParamError> {
        if let Some(node) = wire.get("format") {
            self.set_format(node)?;
        }
        Ok(())
    }
    fn clear(&mut self) {
        self.value = Setting::Unset;
    }
}

// ------------- Rewrite -------------
/// Method used to rewrite a multi-term query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rewrite {
    ConstantScore,
    ConstantScoreBoolean,
    ScoringBoolean,
    TopTermsBlendedFreqs(u32),
    TopTermsBoost(u32),
    TopTerms(u32),
}

const REWRITES: &[&str] = &[
    "constant_score",
    "constant_score_boolean",
    "scoring_boolean",
    "top_terms_blended_freqs_N",
    "top_terms_boost_N",
    "top_terms_N",
];

impl FromStr for Rewrite {
    type Err = CoercionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoercionError::InvalidEnum { value: s.to_owned(), expected: REWRITES };
        match s {
            "constant_score" => return Ok(Rewrite::ConstantScore),
            "constant_score_boolean" => return Ok(Rewrite::ConstantScoreBoolean),
            "scoring_boolean" => return Ok(Rewrite::ScoringBoolean),
            _ => (),
        }
        let caps = TOP_TERMS.captures(s).ok_or_else(invalid)?;
        let n = caps[2].parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(invalid)?;
        Ok(match caps.get(1).map(|m| m.as_str()) {
            Some("blended_freqs") => Rewrite::TopTermsBlendedFreqs(n),
            Some(_) => Rewrite::TopTermsBoost(n),
            None => Rewrite::TopTerms(n),
        })
    }
}

impl fmt::Display for Rewrite {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Rewrite::ConstantScore => write!(f, "constant_score"),
            Rewrite::ConstantScoreBoolean => write!(f, "constant_score_boolean"),
            Rewrite::ScoringBoolean => write!(f, "scoring_boolean"),
            Rewrite::TopTermsBlendedFreqs(n) => write!(f, "top_terms_blended_freqs_{}", n),
            Rewrite::TopTermsBoost(n) => write!(f, "top_terms_boost_{}", n),
            Rewrite::TopTerms(n) => write!(f, "top_terms_{}", n),
        }
    }
}

impl From<Rewrite> for Raw {
    fn from(r: Rewrite) -> Self {
        Raw::Str(r.to_string())
    }
}

// ------------- Fuzziness -------------
/// Maximum edit distance allowed for matching, plus the rewrite method used
/// when fuzziness is in play.
///
/// The default rewrite depends on fuzziness: `constant_score` while fuzziness
/// is `"0"`, `top_terms_blended_freqs_50` otherwise.
#[derive(Debug, Clone, Default)]
pub struct FuzzinessParam {
    fuzziness: Setting<String>,
    fuzzy_rewrite: Setting<Rewrite>,
}

eq_by!(FuzzinessParam, fuzziness, fuzzy_rewrite);

impl FuzzinessParam {
    pub fn fuzziness(&self) -> &str {
        self.fuzziness.explicit().map(String::as_str).unwrap_or(DEFAULT_FUZZINESS)
    }
    /// Accepts `"AUTO"`, `"AUTO:3,6"` or an edit distance as number or string.
    pub fn set_fuzziness(&mut self, v: impl Into<Raw>) -> Result<(), ParamError> {
        self.fuzziness = string_of("fuzziness", v)?.into();
        Ok(())
    }
    pub fn fuzzy_rewrite(&self) -> Rewrite {
        self.fuzzy_rewrite.explicit().copied().unwrap_or_else(|| self.default_fuzzy_rewrite())
    }
    pub fn default_fuzzy_rewrite(&self) -> Rewrite {
        if self.fuzziness() != DEFAULT_FUZZINESS {
            Rewrite::TopTermsBlendedFreqs(DEFAULT_MAX_EXPANSIONS)
        } else {
            Rewrite::ConstantScore
        }
    }
    pub fn set_fuzzy_rewrite(&mut self, v: impl Into<Raw>) -> Result<(), ParamError> {
        self.fuzzy_rewrite = match string_of("fuzzy_rewrite", v)? {
            Some(s) => Setting::Explicit(
                s.parse::<Rewrite>().map_err(|e| ParamError::coercion("fuzzy_rewrite", e))?,
            ),
            None => Setting::Unset,
        };
        Ok(())
    }
}

impl Param for FuzzinessParam {
    const KEYS: &'static [&'static str] = &["fuzziness", "fuzzy_rewrite"];
    fn is_default(&self) -> bool {
        self.fuzziness() == DEFAULT_FUZZINESS && self.fuzzy_rewrite() == self.default_fuzzy_rewrite()
    }
    fn encode(&self, out: &mut Map) -> Result<(), ParamError> {
        if self.fuzziness() != DEFAULT_FUZZINESS {
            put(out, "fuzziness", Value::String(self.fuzziness().to_owned()));
        }
        // compared against the default derived from the current fuzziness
        if self.fuzzy_rewrite() != self.default_fuzzy_rewrite() {
            put(out, "fuzzy_rewrite", Value::String(self.fuzzy_rewrite().to_string()));
        }
        Ok(())
    }
    fn decode(&mut self, wire: &Map) -> Result<(), ParamError> {
        if let Some(node) = wire.get("fuzziness") {
            self.set_fuzziness(node)?;
        }
        if let Some(node) = wire.get("fuzzy_rewrite") {
            self.set_fuzzy_rewrite(node)?;
        }
        Ok(())
    }
    fn clear(&mut self) {
        *self = Self::default();
    }
}

// ------------- Zero terms query -------------
/// What a match query returns when the analyzer removes every token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ZeroTermsQuery {
    #[default]
    None,
    All,
}

impl FromStr for ZeroTermsQuery {
    type Err = CoercionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("none") {
            Ok(ZeroTermsQuery::None)
        } else if s.eq_ignore_ascii_case("all") {
            Ok(ZeroTermsQuery::All)
        } else {
            Err(CoercionError::InvalidEnum { value: s.to_owned(), expected: &["none", "all"] })
        }
    }
}

impl fmt::Display for ZeroTermsQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ZeroTermsQuery::None => write!(f, "none"),
            ZeroTermsQuery::All => write!(f, "all"),
        }
    }
}

impl From<ZeroTermsQuery> for Raw {
    fn from(z: ZeroTermsQuery) -> Self {
        Raw::Str(z.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ZeroTermsQueryParam {
    value: Setting<ZeroTermsQuery>,
}

eq_by!(ZeroTermsQueryParam, zero_terms_query);

impl ZeroTermsQueryParam {
    pub fn zero_terms_query(&self) -> ZeroTermsQuery {
        self.value.explicit().copied().unwrap_or_default()
    }
    pub fn set_zero_terms_query(&mut self, v: impl Into<Raw>) -> Result<(), ParamError> {
        self.value = match string_of("zero_terms_query", v)? {
            Some(s) => Setting::Explicit(
                s.parse::<ZeroTermsQuery>()
                    .map_err(|e| ParamError::coercion("zero_terms_query", e))?,
            ),
            None => Setting::Unset,
        };
        Ok(())
    }
}

impl Param for ZeroTermsQueryParam {
    const KEYS: &'static [&'static str] = &["zero_terms_query"];
    fn is_default(&self) -> bool {
        self.zero_terms_query() == ZeroTermsQuery::default()
    }
    fn encode(&self, out: &mut Map) -> Result<(), ParamError> {
        if !self.is_default() {
            put(out, "zero_terms_query", Value::String(self.zero_terms_query().to_string()));
        }
        Ok(())
    }
    fn decode(&mut self, wire: &Map) -> Result<(), ParamError> {
        if let Some(node) = wire.get("zero_terms_query") {
            self.set_zero_terms_query(node)?;
        }
        Ok(())
    }
    fn clear(&mut self) {
        self.value = Setting::Unset;
    }
}

// ------------- Operator -------------
/// How the terms of an analyzed query are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operator {
    #[default]
    Or,
    And,
}

impl FromStr for Operator {
    type Err = CoercionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("or") {
            Ok(Operator::Or)
        } else if s.eq_ignore_ascii_case("and") {
            Ok(Operator::And)
        } else {
            Err(CoercionError::InvalidEnum { value: s.to_owned(), expected: &["or", "and"] })
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operator::Or => write!(f, "or"),
            Operator::And => write!(f, "and"),
        }
    }
}

impl From<Operator> for Raw {
    fn from(o: Operator) -> Self {
        Raw::Str(o.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct OperatorParam {
    value: Setting<Operator>,
}

eq_by!(OperatorParam, operator);

impl OperatorParam {
    pub fn operator(&self) -> Operator {
        self.value.explicit().copied().unwrap_or_default()
    }
    pub fn set_operator(&mut self, v: impl Into<Raw>) -> Result<(), ParamError> {
        self.value = match string_of("operator", v)? {
            Some(s) => Setting::Explicit(s.parse::<Operator>().map_err(|e| ParamError::coercion("operator", e))?),
            None => Setting::Unset,
        };
        Ok(())
    }
    pub fn state(&self) -> State {
        self.value.state(&Operator::default())
    }
}

impl Param for OperatorParam {
    const KEYS: &'static [&'static str] = &["operator"];
    fn is_default(&self) -> bool {
        self.operator() == Operator::default()
    }
    fn encode(&self, out: &mut Map) -> Result<(), ParamError> {
        if !self.is_default() {
            put(out, "operator", Value::String(self.operator().to_string()));
        }
        Ok(())
    }
    fn decode(&mut self, wire: &Map) -> Result<(), ParamError> {
        if let Some(node) = wire.get("operator") {
            self.set_operator(node)?;
        }
        Ok(())
    }
    fn clear(&mut self) {
        self.value = Setting::Unset;
    }
}

// ------------- Prefix length -------------
/// Number of leading characters left unchanged by fuzzy matching.
#[derive(Debug, Clone, Default)]
pub struct PrefixLengthParam {
    value: Setting<i64>,
}

eq_by!(PrefixLengthParam, prefix_length);

impl PrefixLengthParam {
    pub fn prefix_length(&self) -> i64 {
        *self.value.get_or(&DEFAULT_PREFIX_LENGTH)
    }
    /// Takes a non-negative integer, as number or string.
    pub fn set_prefix_length(&mut self, v: impl Into<Raw>) -> Result<(), ParamError> {
        let n = Value::number(v).map_err(|e| ParamError::coercion("prefix_length", e))?;
        self.value = match n {
            Value::Null => Setting::Unset,
            Value::Integer(i) if i >= 0 => Setting::Explicit(i),
            other => {
                return Err(ParamError::coercion(
                    "prefix_length",
                    CoercionError::Unsupported { expected: "non-negative integer", found: other.type_name() },
                ));
            }
        };
        Ok(())
    }
    pub fn state(&self) -> State {
        self.value.state(&DEFAULT_PREFIX_LENGTH)
    }
}

impl Param for PrefixLengthParam {
    const KEYS: &'static [&'static str] = &["prefix_length"];
    fn is_default(&self) -> bool {
        self.prefix_length() == DEFAULT_PREFIX_LENGTH
    }
    fn encode(&self, out: &mut Map) -> Result<(), ParamError> {
        if !self.is_default() {
            put(out, "prefix_length", Value::Integer(self.prefix_length()));
        }
        Ok(())
    }
    fn decode(&mut self, wire: &Map) -> Result<(), ParamError> {
        if let Some(node) = wire.get("prefix_length") {
            self.set_prefix_length(node)?;
        }
        Ok(())
    }
    fn clear(&mut self) {
        self.value = Setting::Unset;
    }
}

// ------------- Null value -------------
/// Value indexed in place of an explicit null.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NullValueParam {
    value: Value,
}

impl NullValueParam {
    pub fn null_value(&self) -> &Value {
        &self.value
    }
    pub fn set_null_value(&mut self, v: impl Into<Raw>) -> Result<(), ParamError> {
        self.value = Value::coerce(v).map_err(|e| ParamError::coercion("null_value", e))?;
        Ok(())
    }
}

impl Param for NullValueParam {
    const KEYS: &'static [&'static str] = &["null_value"];
    fn is_default(&self) -> bool {
        self.value.is_nil()
    }
    fn encode(&self, out: &mut Map) -> Result<(), ParamError> {
        if !self.value.is_nil() {
            put(out, "null_value", self.value.clone());
        }
        Ok(())
    }
    fn decode(&mut self, wire: &Map) -> Result<(), ParamError> {
        if let Some(node) = wire.get("null_value") {
            self.set_null_value(node)?;
        }
        Ok(())
    }
    fn clear(&mut self) {
        self.value = Value::Null;
    }
}

// ------------- Meta -------------
/// Free-form string metadata attached to a field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetaParam {
    value: BTreeMap<String, String>,
}

impl MetaParam {
    pub fn meta(&self) -> &BTreeMap<String, String> {
        &self.value
    }
    pub fn set_meta<K, V>(&mut self, entries: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.value = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
    }
}

impl Param for MetaParam {
    const KEYS: &'static [&'static str] = &["meta"];
    fn is_default(&self) -> bool {
        self.value.is_empty()
    }
    fn encode(&self, out: &mut Map) -> Result<(), ParamError> {
        if !self.value.is_empty() {
            let map = self
                .value
                .iter()
                .map(|(k, v)| (k.clone(), Node::Value(Value::String(v.clone()))))
                .collect();
            out.insert(String::from("meta"), Node::Map(map));
        }
        Ok(())
    }
    fn decode(&mut self, wire: &Map) -> Result<(), ParamError> {
        let node = match wire.get("meta") {
            Some(node) => node,
            None => return Ok(()),
        };
        let entries = match node {
            Node::Map(entries) => entries,
            Node::Value(Value::Null) => {
                self.value.clear();
                return Ok(());
            }
            other => {
                return Err(ParamError::coercion(
                    "meta",
                    CoercionError::Unsupported { expected: "map of strings", found: other.shape() },
                ));
            }
        };
        let mut meta = BTreeMap::new();
        for (k, v) in entries {
            // empty strings are kept; null entries are not strings at all
            let s = match v {
                Node::Value(Value::String(s)) => s.clone(),
                other => string_of("meta", other)?.ok_or_else(|| {
                    ParamError::coercion(
                        "meta",
                        CoercionError::Unsupported { expected: "string", found: other.shape() },
                    )
                })?,
            };
            meta.insert(k.clone(), s);
        }
        self.value = meta;
        Ok(())
    }
    fn clear(&mut self) {
        self.value.clear();
    }
}

// ------------- Scaling factor -------------
/// The factor values are multiplied by at index time before rounding to the
/// closest long. There is no default: it must be supplied.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScalingFactorParam {
    value: Option<f64>,
}

impl ScalingFactorParam {
    pub fn scaling_factor(&self) -> Option<f64> {
        self.value
    }
    pub fn set_scaling_factor(&mut self, v: impl Into<Raw>) -> Result<(), ParamError> {
        let n = Value::number(v)
            .map_err(|e| ParamError::ScalingFactorRequired { source: Some(e) })?;
        match n.as_f64() {
            Some(f) => {
                self.value = Some(f);
                Ok(())
            }
            None => Err(ParamError::ScalingFactorRequired { source: None }),
        }
    }
    pub fn require(&self) -> Result<(), ParamError> {
        match self.value {
            Some(_) => Ok(()),
            None => Err(ParamError::ScalingFactorRequired { source: None }),
        }
    }
}

impl Param for ScalingFactorParam {
    const KEYS: &'static [&'static str] = &["scaling_factor"];
    fn is_default(&self) -> bool {
        self.value.is_none()
    }
    fn encode(&self, out: &mut Map) -> Result<(), ParamError> {
        let f = self.value.ok_or(ParamError::ScalingFactorRequired { source: None })?;
        put(out, "scaling_factor", Value::Float(f));
        Ok(())
    }
    fn decode(&mut self, wire: &Map) -> Result<(), ParamError> {
        if let Some(node) = wire.get("scaling_factor") {
            self.set_scaling_factor(node)?;
        }
        Ok(())
    }
    fn clear(&mut self) {
        self.value = None;
    }
}

// ------------- Positive score impact -------------
/// Whether a rank feature correlates positively with the score.
///
/// Reports `true` while unset but is only written when explicitly set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PositiveScoreImpactParam {
    value: Setting<bool>,
}

impl PositiveScoreImpactParam {
    pub fn positive_score_impact(&self) -> bool {
        *self.value.get_or(&DEFAULT_POSITIVE_SCORE_IMPACT)
    }
    pub fn explicit(&self) -> Option<bool> {
        self.value.explicit().copied()
    }
    pub fn set_positive_score_impact(&mut self, v: impl Into<Raw>) -> Result<(), ParamError> {
        let coerced = Value::boolean(v).map_err(|e| ParamError::coercion("positive_score_impact", e))?;
        self.value = coerced.as_bool().into();
        Ok(())
    }
}

impl Param for PositiveScoreImpactParam {
    const KEYS: &'static [&'static str] = &["positive_score_impact"];
    fn is_default(&self) -> bool {
        !self.value.is_set()
    }
    fn encode(&self, out: &mut Map) -> Result<(), ParamError> {
        if let Some(b) = self.explicit() {
            put(out, "positive_score_impact", Value::Boolean(b));
        }
        Ok(())
    }
    fn decode(&mut self, wire: &Map) -> Result<(), ParamError> {
        if let Some(node) = wire.get("positive_score_impact") {
            self.set_positive_score_impact(node)?;
        }
        Ok(())
    }
    fn clear(&mut self) {
        self.value = Setting::Unset;
    }
}

// ------------- Boost -------------
/// Multiplier applied to the relevance score of a clause.
#[derive(Debug, Clone, Default)]
pub struct BoostParam {
    value: Setting<f64>,
}

eq_by!(BoostParam, boost);

impl BoostParam {
    pub fn boost(&self) -> f64 {
        *self.value.get_or(&DEFAULT_BOOST)
    }
    /// Zero counts as "not given" and leaves the boost unset.
    pub fn set_boost(&mut self, v: impl Into<Raw>) -> Result<(), ParamError> {
        let n = Value::number(v).map_err(|e| ParamError::coercion("boost", e))?;
        self.value = if n.is_nil_or_zero() { Setting::Unset } else { n.as_f64().into() };
        Ok(())
    }
}

impl Param for BoostParam {
    const KEYS: &'static [&'static str] = &["boost"];
    fn is_default(&self) -> bool {
        self.boost() == DEFAULT_BOOST
    }
    fn encode(&self, out: &mut Map) -> Result<(), ParamError> {
        if !self.is_default() {
            put(out, "boost", Value::Float(self.boost()));
        }
        Ok(())
    }
    fn decode(&mut self, wire: &Map) -> Result<(), ParamError> {
        if let Some(node) = wire.get("boost") {
            self.set_boost(node)?;
        }
        Ok(())
    }
    fn clear(&mut self) {
        self.value = Setting::Unset;
    }
}

// ------------- Range bounds -------------
macro_rules! bound_param {
    ($(#[$doc:meta])* $name:ident, $key:literal, $getter:ident, $setter:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct $name {
            value: Option<Value>,
        }
        impl $name {
            pub fn $getter(&self) -> Option<&Value> {
                self.value.as_ref()
            }
            /// A failed coercion leaves the bound unset.
            pub fn $setter(&mut self, v: impl Into<Raw>) -> Result<(), ParamError> {
                self.value = None;
                let coerced = Value::string_number_or_time(v).map_err(|e| ParamError::coercion($key, e))?;
                if !coerced.is_nil() {
                    self.value = Some(coerced);
                }
                Ok(())
            }
        }
        impl Param for $name {
            const KEYS: &'static [&'static str] = &[$key];
            fn is_default(&self) -> bool {
                self.value.is_none()
            }
            fn encode(&self, out: &mut Map) -> Result<(), ParamError> {
                if let Some(v) = &self.value {
                    put(out, $key, v.clone());
                }
                Ok(())
            }
            fn decode(&mut self, wire: &Map) -> Result<(), ParamError> {
                if let Some(node) = wire.get($key) {
                    self.$setter(node)?;
                }
                Ok(())
            }
            fn clear(&mut self) {
                self.value = None;
            }
        }
    };
}

bound_param!(
    /// Greater than.
    GreaterThanParam, "gt", greater_than, set_greater_than
);
bound_param!(
    /// Greater than or equal to.
    GreaterThanOrEqualToParam, "gte", greater_than_or_equal_to, set_greater_than_or_equal_to
);
bound_param!(
    /// Less than.
    LessThanParam, "lt", less_than, set_less_than
);
bound_param!(
    /// Less than or equal to.
    LessThanOrEqualToParam, "lte", less_than_or_equal_to, set_less_than_or_equal_to
);
