//! Query clauses.

use crate::datatype::Raw;
use crate::envelope::{EnvelopeParams, Kind, Params, envelope, kind};
use crate::error::{BuildErrors, Result, SearchdocError};
use crate::param::{
    AnalyzerParam, BoostParam, FormatParam, FuzzinessParam, FuzzyTranspositionsParam,
    GreaterThanOrEqualToParam, GreaterThanParam, LessThanOrEqualToParam, LessThanParam,
    MinimumShouldMatchParam, NameParam, OperatorParam, PrefixLengthParam, QueryParam, TermParam,
    TimeZoneParam, TranspositionsParam, ZeroTermsQueryParam,
};

pub const REGEXP_TAG: &str = "regexp";

// ------------- Range -------------
kind! {
    /// Matches documents containing terms within the given bounds.
    ///
    /// Bounds take numbers, times, or strings that look like either; any
    /// other string (date math such as `now-1d/d`) is kept as is.
    RangeQuery => "range" {
        greater_than: GreaterThanParam,
        greater_than_or_equal_to: GreaterThanOrEqualToParam,
        less_than: LessThanParam,
        less_than_or_equal_to: LessThanOrEqualToParam,
        format: FormatParam,
        time_zone: TimeZoneParam,
        boost: BoostParam,
        name: NameParam,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeParams {
    pub greater_than: Raw,
    pub greater_than_or_equal_to: Raw,
    pub less_than: Raw,
    pub less_than_or_equal_to: Raw,
    pub format: Raw,
    pub time_zone: Raw,
    pub boost: Raw,
    pub name: Raw,
}

impl Params for RangeParams {
    type Output = RangeQuery;
    fn tag(&self) -> &'static str {
        RangeQuery::TAG
    }
    fn build(&self) -> (RangeQuery, BuildErrors) {
        let tag = RangeQuery::TAG;
        let mut q = RangeQuery::new();
        let mut errors = BuildErrors::new();
        errors.collect(tag, q.greater_than.set_greater_than(&self.greater_than));
        errors.collect(
            tag,
            q.greater_than_or_equal_to.set_greater_than_or_equal_to(&self.greater_than_or_equal_to),
        );
        errors.collect(tag, q.less_than.set_less_than(&self.less_than));
        errors.collect(tag, q.less_than_or_equal_to.set_less_than_or_equal_to(&self.less_than_or_equal_to));
        errors.collect(tag, q.format.set_format(&self.format));
        errors.collect(tag, q.time_zone.set_time_zone(&self.time_zone));
        errors.collect(tag, q.boost.set_boost(&self.boost));
        errors.collect(tag, q.name.set_name(&self.name));
        (q, errors)
    }
}

// ------------- Match phrase -------------
kind! {
    /// Analyzes the text and creates a phrase query out of it.
    MatchPhraseQuery => "match_phrase" {
        query: QueryParam,
        analyzer: AnalyzerParam,
        zero_terms_query: ZeroTermsQueryParam,
        boost: BoostParam,
        name: NameParam,
    }
    requires [query]
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchPhraseParams {
    pub query: Raw,
    pub analyzer: Raw,
    pub zero_terms_query: Raw,
    pub boost: Raw,
    pub name: Raw,
}

impl Params for MatchPhraseParams {
    type Output = MatchPhraseQuery;
    fn tag(&self) -> &'static str {
        MatchPhraseQuery::TAG
    }
    fn build(&self) -> (MatchPhraseQuery, BuildErrors) {
        let tag = MatchPhraseQuery::TAG;
        let mut q = MatchPhraseQuery::new();
        let mut errors = BuildErrors::new();
        errors.collect(tag, q.query.set_query(&self.query));
        errors.collect(tag, q.analyzer.set_analyzer(&self.analyzer));
        errors.collect(tag, q.zero_terms_query.set_zero_terms_query(&self.zero_terms_query));
        errors.collect(tag, q.boost.set_boost(&self.boost));
        errors.collect(tag, q.name.set_name(&self.name));
        (q, errors)
    }
}

// ------------- Match bool prefix -------------
kind! {
    /// Analyzes its input and builds a bool query from the terms. Every term
    /// but the last is a term query; the last is a prefix query.
    MatchBoolPrefixQuery => "match_bool_prefix" {
        query: QueryParam,
        minimum_should_match: MinimumShouldMatchParam,
        operator: OperatorParam,
        analyzer: AnalyzerParam,
        fuzziness: FuzzinessParam,
        prefix_length: PrefixLengthParam,
        fuzzy_transpositions: FuzzyTranspositionsParam,
        boost: BoostParam,
        name: NameParam,
    }
    requires [query]
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchBoolPrefixParams {
    pub query: Raw,
    pub minimum_should_match: Raw,
    pub operator: Raw,
    pub analyzer: Raw,
    pub fuzziness: Raw,
    pub fuzzy_rewrite: Raw,
    pub prefix_length: Raw,
    pub fuzzy_transpositions: Raw,
    pub boost: Raw,
    pub name: Raw,
}

impl Params for MatchBoolPrefixParams {
    type Output = MatchBoolPrefixQuery;
    fn tag(&self) -> &'static str {
        MatchBoolPrefixQuery::TAG
    }
    fn build(&self) -> (MatchBoolPrefixQuery, BuildErrors) {
        let tag = MatchBoolPrefixQuery::TAG;
        let mut q = MatchBoolPrefixQuery::new();
        let mut errors = BuildErrors::new();
        errors.collect(tag, q.query.set_query(&self.query));
        errors.collect(tag, q.minimum_should_match.set_minimum_should_match(&self.minimum_should_match));
        errors.collect(tag, q.operator.set_operator(&self.operator));
        errors.collect(tag, q.analyzer.set_analyzer(&self.analyzer));
        errors.collect(tag, q.fuzziness.set_fuzziness(&self.fuzziness));
        errors.collect(tag, q.fuzziness.set_fuzzy_rewrite(&self.fuzzy_rewrite));
        errors.collect(tag, q.prefix_length.set_prefix_length(&self.prefix_length));
        errors.collect(tag, q.fuzzy_transpositions.set_fuzzy_transpositions(&self.fuzzy_transpositions));
        errors.collect(tag, q.boost.set_boost(&self.boost));
        errors.collect(tag, q.name.set_name(&self.name));
        (q, errors)
    }
}

// ------------- Fuzzy -------------
kind! {
    /// Matches terms similar to the given value within an edit distance.
    FuzzyQuery => "fuzzy" {
        value: TermParam,
        fuzziness: FuzzinessParam,
        transpositions: TranspositionsParam,
        boost: BoostParam,
        name: NameParam,
    }
    requires [value]
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FuzzyParams {
    pub value: Raw,
    pub fuzziness: Raw,
    pub fuzzy_rewrite: Raw,
    pub transpositions: Raw,
    pub boost: Raw,
    pub name: Raw,
}

impl Params for FuzzyParams {
    type Output = FuzzyQuery;
    fn tag(&self) -> &'static str {
        FuzzyQuery::TAG
    }
    fn build(&self) -> (FuzzyQuery, BuildErrors) {
        let tag = FuzzyQuery::TAG;
        let mut q = FuzzyQuery::new();
        let mut errors = BuildErrors::new();
        errors.collect(tag, q.value.set_value(&self.value));
        errors.collect(tag, q.fuzziness.set_fuzziness(&self.fuzziness));
        errors.collect(tag, q.fuzziness.set_fuzzy_rewrite(&self.fuzzy_rewrite));
        errors.collect(tag, q.transpositions.set_transpositions(&self.transpositions));
        errors.collect(tag, q.boost.set_boost(&self.boost));
        errors.collect(tag, q.name.set_name(&self.name));
        (q, errors)
    }
}

// ------------- Regexp -------------
/// Input for a `regexp` clause, which cannot be built yet.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RegexpParams;

impl RegexpParams {
    pub fn build(&self) -> Result<(Clause, BuildErrors)> {
        Err(SearchdocError::Unimplemented { kind: REGEXP_TAG, operation: "build" })
    }
}

// ------------- Clause -------------
/// A query clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Range(RangeQuery),
    MatchPhrase(MatchPhraseQuery),
    MatchBoolPrefix(MatchBoolPrefixQuery),
    Fuzzy(FuzzyQuery),
}

envelope! {
    Clause, ClauseParams,
    supported {
        Range(RangeQuery),
        MatchPhrase(MatchPhraseQuery),
        MatchBoolPrefix(MatchBoolPrefixQuery),
        Fuzzy(FuzzyQuery),
    }
    unsupported { "regexp" }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClauseParams {
    Range(RangeParams),
    MatchPhrase(MatchPhraseParams),
    MatchBoolPrefix(MatchBoolPrefixParams),
    Fuzzy(FuzzyParams),
    Regexp(RegexpParams),
}

impl EnvelopeParams for ClauseParams {
    type Envelope = Clause;
    fn tag(&self) -> &'static str {
        match self {
            ClauseParams::Range(p) => p.tag(),
            ClauseParams::MatchPhrase(p) => p.tag(),
            ClauseParams::MatchBoolPrefix(p) => p.tag(),
            ClauseParams::Fuzzy(p) => p.tag(),
            ClauseParams::Regexp(_) => REGEXP_TAG,
        }
    }
    fn build_envelope(&self) -> Result<(Clause, BuildErrors)> {
        fn wrap<K: Into<Clause>>((kind, errors): (K, BuildErrors)) -> Result<(Clause, BuildErrors)> {
            Ok((kind.into(), errors))
        }
        match self {
            ClauseParams::Range(p) => wrap(p.build()),
            ClauseParams::MatchPhrase(p) => wrap(p.build()),
            ClauseParams::MatchBoolPrefix(p) => wrap(p.build()),
            ClauseParams::Fuzzy(p) => wrap(p.build()),
            ClauseParams::Regexp(p) => p.build(),
        }
    }
}

impl From<RangeParams> for ClauseParams {
    fn from(p: RangeParams) -> Self {
        ClauseParams::Range(p)
    }
}
impl From<MatchPhraseParams> for ClauseParams {
    fn from(p: MatchPhraseParams) -> Self {
        ClauseParams::MatchPhrase(p)
    }
}
impl From<MatchBoolPrefixParams> for ClauseParams {
    fn from(p: MatchBoolPrefixParams) -> Self {
        ClauseParams::MatchBoolPrefix(p)
    }
}
impl From<FuzzyParams> for ClauseParams {
    fn from(p: FuzzyParams) -> Self {
        ClauseParams::Fuzzy(p)
    }
}
impl From<RegexpParams> for ClauseParams {
    fn from(p: RegexpParams) -> Self {
        ClauseParams::Regexp(p)
    }
}
