use searchdoc::codec::Node;
use searchdoc::param::{
    BoostParam, FormatParam, FuzzinessParam, GreaterThanOrEqualToParam, MetaParam, NormsParam,
    OperatorParam, Param, PositiveScoreImpactParam, PrefixLengthParam, ScalingFactorParam, DEFAULT_FORMAT,
};
use searchdoc::{
    Envelope, FuzzyQuery, Kind, Map, MatchBoolPrefixQuery, Operator, ParamError, RangeQuery, Rewrite, State,
    TextField, Value,
};

fn encoded<P: Param>(param: &P) -> Map {
    let mut out = Map::new();
    param.encode(&mut out).expect("encodes");
    out
}

#[test]
fn norms_tri_state() {
    let mut norms = NormsParam::default();
    assert_eq!(norms.state(), State::Unset);
    assert!(norms.norms());
    assert!(encoded(&norms).is_empty());

    norms.set_norms(true).unwrap();
    assert_eq!(norms.state(), State::ExplicitDefault);
    assert!(encoded(&norms).is_empty(), "explicit default is still omitted");

    norms.set_norms("false").unwrap();
    assert_eq!(norms.state(), State::ExplicitNonDefault);
    assert_eq!(encoded(&norms).get("norms"), Some(&Node::Value(Value::Boolean(false))));

    norms.clear();
    assert_eq!(norms.state(), State::Unset);
}

#[test]
fn text_field_omits_defaults() {
    let mut text = TextField::new();
    assert!(text.is_empty());
    text.norms.set_norms(true).unwrap();
    text.index.set_index(true).unwrap();
    text.store.set_store(false).unwrap();
    assert!(text.is_empty());
    let wire = searchdoc::Field::from(text.clone()).encode().unwrap();
    assert_eq!(wire.keys().collect::<Vec<_>>(), vec!["type"]);

    text.store.set_store(true).unwrap();
    assert!(!text.is_empty());
    let wire = searchdoc::Field::from(text).encode().unwrap();
    assert_eq!(wire.get("store"), Some(&Node::Value(Value::Boolean(true))));
}

#[test]
fn format_default_elision() {
    let mut format = FormatParam::default();
    assert_eq!(format.format(), DEFAULT_FORMAT);
    format.set_format(DEFAULT_FORMAT).unwrap();
    assert_eq!(format.state(), State::ExplicitDefault);
    assert!(encoded(&format).is_empty());
    format.set_format("epoch_second").unwrap();
    assert_eq!(
        encoded(&format).get("format"),
        Some(&Node::Value(Value::String(String::from("epoch_second"))))
    );
    format.set_format("").unwrap();
    assert_eq!(format.state(), State::Unset);
}

#[test]
fn fuzzy_rewrite_default_follows_fuzziness() {
    let mut fuzziness = FuzzinessParam::default();
    assert_eq!(fuzziness.fuzziness(), "0");
    assert_eq!(fuzziness.fuzzy_rewrite(), Rewrite::ConstantScore);

    fuzziness.set_fuzziness("AUTO").unwrap();
    assert_eq!(fuzziness.fuzzy_rewrite(), Rewrite::TopTermsBlendedFreqs(50));
    let out = encoded(&fuzziness);
    assert_eq!(out.get("fuzziness"), Some(&Node::Value(Value::String(String::from("AUTO")))));
    assert!(!out.contains_key("fuzzy_rewrite"), "derived default is omitted");

    fuzziness.set_fuzzy_rewrite("top_terms_blended_freqs_50").unwrap();
    assert!(!encoded(&fuzziness).contains_key("fuzzy_rewrite"));

    fuzziness.set_fuzzy_rewrite(Rewrite::ScoringBoolean).unwrap();
    assert_eq!(
        encoded(&fuzziness).get("fuzzy_rewrite"),
        Some(&Node::Value(Value::String(String::from("scoring_boolean"))))
    );
}

#[test]
fn explicit_rewrite_emitted_once_fuzziness_changes() {
    let mut fuzziness = FuzzinessParam::default();
    fuzziness.set_fuzzy_rewrite("constant_score").unwrap();
    assert!(encoded(&fuzziness).is_empty());
    fuzziness.set_fuzziness(2).unwrap();
    let out = encoded(&fuzziness);
    assert_eq!(out.get("fuzziness"), Some(&Node::Value(Value::String(String::from("2")))));
    assert_eq!(
        out.get("fuzzy_rewrite"),
        Some(&Node::Value(Value::String(String::from("constant_score"))))
    );
}

#[test]
fn invalid_rewrite_is_rejected() {
    let mut fuzziness = FuzzinessParam::default();
    let err = fuzziness.set_fuzzy_rewrite("top_terms_0").unwrap_err();
    assert_eq!(err.param(), "fuzzy_rewrite");
    assert_eq!(fuzziness.fuzzy_rewrite(), Rewrite::ConstantScore);
}

#[test]
fn boost_zero_means_unset() {
    let mut boost = BoostParam::default();
    boost.set_boost(0).unwrap();
    assert_eq!(boost.boost(), 1.0);
    assert!(encoded(&boost).is_empty());
    boost.set_boost("2.5").unwrap();
    assert_eq!(encoded(&boost).get("boost"), Some(&Node::Value(Value::Float(2.5))));
    assert!(boost.set_boost("lots").is_err());
}

#[test]
fn positive_score_impact_written_when_set() {
    let mut impact = PositiveScoreImpactParam::default();
    assert!(impact.positive_score_impact());
    assert!(encoded(&impact).is_empty());
    impact.set_positive_score_impact(true).unwrap();
    assert_eq!(
        encoded(&impact).get("positive_score_impact"),
        Some(&Node::Value(Value::Boolean(true)))
    );
}

#[test]
fn scaling_factor_is_required() {
    let mut factor = ScalingFactorParam::default();
    assert_eq!(factor.scaling_factor(), None);
    let mut out = Map::new();
    assert_eq!(
        factor.encode(&mut out),
        Err(ParamError::ScalingFactorRequired { source: None })
    );
    let err = factor.set_scaling_factor("ten").unwrap_err();
    assert!(matches!(err, ParamError::ScalingFactorRequired { source: Some(_) }));
    factor.set_scaling_factor("10").unwrap();
    assert_eq!(factor.scaling_factor(), Some(10.0));
    assert_eq!(encoded(&factor).get("scaling_factor"), Some(&Node::Value(Value::Float(10.0))));
}

#[test]
fn meta_omitted_when_empty() {
    let mut meta = MetaParam::default();
    assert!(encoded(&meta).is_empty());
    meta.set_meta([("unit", "ms")]);
    let out = encoded(&meta);
    let inner = out.get("meta").and_then(Node::as_map).expect("meta is a map");
    assert_eq!(inner.get("unit"), Some(&Node::Value(Value::String(String::from("ms")))));
}

#[test]
fn zero_is_a_valid_range_bound() {
    let mut gte = GreaterThanOrEqualToParam::default();
    gte.set_greater_than_or_equal_to(0).unwrap();
    assert_eq!(gte.greater_than_or_equal_to(), Some(&Value::Integer(0)));
    assert_eq!(encoded(&gte).get("gte"), Some(&Node::Value(Value::Integer(0))));
    gte.set_greater_than_or_equal_to("").unwrap();
    assert_eq!(gte.greater_than_or_equal_to(), None);
}

#[test]
fn range_bounds_are_independent() {
    let mut range = RangeQuery::new();
    range.greater_than.set_greater_than(1).unwrap();
    range.greater_than_or_equal_to.set_greater_than_or_equal_to(2).unwrap();
    range.less_than_or_equal_to.set_less_than_or_equal_to("2020-01-01").unwrap();
    let mut out = Map::new();
    range.encode_params(&mut out).unwrap();
    assert_eq!(out.get("gt"), Some(&Node::Value(Value::Integer(1))));
    assert_eq!(out.get("gte"), Some(&Node::Value(Value::Integer(2))));
    assert!(matches!(out.get("lte"), Some(Node::Value(Value::Time(_)))));
    assert!(!out.contains_key("lt"));
}

#[test]
fn clear_resets_a_kind() {
    let mut fuzzy = FuzzyQuery::new();
    fuzzy.value.set_value("rust").unwrap();
    fuzzy.transpositions.set_transpositions(false).unwrap();
    assert!(!fuzzy.is_empty());
    Kind::clear(&mut fuzzy);
    assert!(fuzzy.is_empty());
    assert_eq!(fuzzy, FuzzyQuery::default());
}

#[test]
fn kinds_declare_their_keys() {
    assert_eq!(
        RangeQuery::KEYS,
        &["gt", "gte", "lt", "lte", "format", "time_zone", "boost", "_name"]
    );
    assert_eq!(FuzzyQuery::KEYS.len(), 6);
    assert!(FuzzyQuery::KEYS.contains(&"fuzzy_rewrite"));
}

#[test]
fn explicit_default_equals_unset() {
    let mut norms = NormsParam::default();
    norms.set_norms(true).unwrap();
    assert_eq!(norms, NormsParam::default());
    assert_ne!(norms.state(), NormsParam::default().state());
    norms.set_norms(false).unwrap();
    assert_ne!(norms, NormsParam::default());

    let mut boost = BoostParam::default();
    boost.set_boost(1).unwrap();
    assert_eq!(boost, BoostParam::default());

    let mut format = FormatParam::default();
    format.set_format(DEFAULT_FORMAT).unwrap();
    assert_eq!(format, FormatParam::default());
}

#[test]
fn fuzzy_rewrite_equality_follows_derived_default() {
    let mut explicit = FuzzinessParam::default();
    explicit.set_fuzziness("AUTO").unwrap();
    explicit.set_fuzzy_rewrite("top_terms_blended_freqs_50").unwrap();
    let mut derived = FuzzinessParam::default();
    derived.set_fuzziness("AUTO").unwrap();
    assert_eq!(explicit, derived);

    derived.set_fuzzy_rewrite("scoring_boolean").unwrap();
    assert_ne!(explicit, derived);
}

#[test]
fn operator_defaults_to_or() {
    let mut operator = OperatorParam::default();
    assert_eq!(operator.operator(), Operator::Or);
    operator.set_operator("OR").unwrap();
    assert_eq!(operator.state(), State::ExplicitDefault);
    assert!(encoded(&operator).is_empty());
    operator.set_operator(Operator::And).unwrap();
    assert_eq!(encoded(&operator).get("operator"), Some(&Node::Value(Value::String(String::from("and")))));
    assert_eq!(operator.set_operator("xor").unwrap_err().param(), "operator");
}

#[test]
fn prefix_length_takes_non_negative_integers() {
    let mut prefix = PrefixLengthParam::default();
    assert_eq!(prefix.prefix_length(), 0);
    prefix.set_prefix_length(0).unwrap();
    assert_eq!(prefix.state(), State::ExplicitDefault);
    assert!(encoded(&prefix).is_empty());
    prefix.set_prefix_length("3").unwrap();
    assert_eq!(encoded(&prefix).get("prefix_length"), Some(&Node::Value(Value::Integer(3))));
    assert!(prefix.set_prefix_length(-1).is_err());
    assert!(prefix.set_prefix_length(1.5).is_err());
    assert_eq!(prefix.prefix_length(), 3);
}

#[test]
fn match_bool_prefix_declares_its_keys() {
    assert_eq!(
        MatchBoolPrefixQuery::KEYS,
        &[
            "query",
            "minimum_should_match",
            "operator",
            "analyzer",
            "fuzziness",
            "fuzzy_rewrite",
            "prefix_length",
            "fuzzy_transpositions",
            "boost",
            "_name"
        ]
    );
}
