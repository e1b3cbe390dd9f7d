//! Field mappings.
//!
//! Each kind declares, as plain fields, the mixins that make up its mapping
//! parameters. [`Field`] is the closed set of kinds a mapping document can
//! hold, and every kind has a loosely typed `*Params` counterpart used to
//! build it from user input while collecting every failure at once.

use std::collections::BTreeMap;

use crate::datatype::Raw;
use crate::envelope::{EnvelopeParams, Kind, Params, envelope, kind};
use crate::error::{BuildErrors, Result};
use crate::param::{
    AnalyzerParam, DocValuesParam, FormatParam, IgnoreMalformedParam, IndexParam, MetaParam,
    NormsParam, NullValueParam, PositiveScoreImpactParam, ScalingFactorParam, StoreParam,
};

// ------------- Dates -------------
macro_rules! date_kind {
    ($(#[$doc:meta])* $name:ident, $params:ident => $tag:literal) => {
        kind! {
            $(#[$doc])*
            $name => $tag {
                doc_values: DocValuesParam,
                format: FormatParam,
                ignore_malformed: IgnoreMalformedParam,
                index: IndexParam,
                null_value: NullValueParam,
                store: StoreParam,
                meta: MetaParam,
            }
        }

        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $params {
            pub doc_values: Raw,
            pub format: Raw,
            pub ignore_malformed: Raw,
            pub index: Raw,
            pub null_value: Raw,
            pub store: Raw,
            pub meta: BTreeMap<String, String>,
        }

        impl Params for $params {
            type Output = $name;
            fn tag(&self) -> &'static str {
                $name::TAG
            }
            fn build(&self) -> ($name, BuildErrors) {
                let mut field = $name::new();
                let mut errors = BuildErrors::new();
                errors.collect($tag, field.doc_values.set_doc_values(&self.doc_values));
                errors.collect($tag, field.format.set_format(&self.format));
                errors.collect($tag, field.ignore_malformed.set_ignore_malformed(&self.ignore_malformed));
                errors.collect($tag, field.index.set_index(&self.index));
                errors.collect($tag, field.null_value.set_null_value(&self.null_value));
                errors.collect($tag, field.store.set_store(&self.store));
                field.meta.set_meta(self.meta.clone());
                (field, errors)
            }
        }
    };
}

date_kind!(
    /// A date with millisecond resolution, stored internally as a long
    /// counting milliseconds since the epoch.
    DateField, DateParams => "date"
);
date_kind!(
    /// A date with nanosecond resolution. Dates are limited to the range
    /// 1970 through 2262.
    DateNanosField, DateNanosParams => "date_nanos"
);

// ------------- Rank features -------------
kind! {
    /// A numeric feature used to boost hits at query time.
    RankFeatureField => "rank_feature" {
        positive_score_impact: PositiveScoreImpactParam,
    }
}

kind! {
    /// Numeric features used to boost hits at query time, one per key.
    RankFeaturesField => "rank_features" {
        positive_score_impact: PositiveScoreImpactParam,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankFeatureParams {
    pub positive_score_impact: Raw,
}

impl Params for RankFeatureParams {
    type Output = RankFeatureField;
    fn tag(&self) -> &'static str {
        RankFeatureField::TAG
    }
    fn build(&self) -> (RankFeatureField, BuildErrors) {
        let mut field = RankFeatureField::new();
        let mut errors = BuildErrors::new();
        errors.collect(
            RankFeatureField::TAG,
            field.positive_score_impact.set_positive_score_impact(&self.positive_score_impact),
        );
        (field, errors)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankFeaturesParams {
    pub positive_score_impact: Raw,
}

impl Params for RankFeaturesParams {
    type Output = RankFeaturesField;
    fn tag(&self) -> &'static str {
        RankFeaturesField::TAG
    }
    fn build(&self) -> (RankFeaturesField, BuildErrors) {
        let mut field = RankFeaturesField::new();
        let mut errors = BuildErrors::new();
        errors.collect(
            RankFeaturesField::TAG,
            field.positive_score_impact.set_positive_score_impact(&self.positive_score_impact),
        );
        (field, errors)
    }
}

// ------------- Scaled float -------------
kind! {
    /// A floating point number stored as a long scaled by a fixed factor.
    ScaledFloatField => "scaled_float" {
        scaling_factor: ScalingFactorParam,
        doc_values: DocValuesParam,
        ignore_malformed: IgnoreMalformedParam,
        index: IndexParam,
        null_value: NullValueParam,
        store: StoreParam,
        meta: MetaParam,
    }
    requires [scaling_factor]
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScaledFloatParams {
    pub scaling_factor: Raw,
    pub doc_values: Raw,
    pub ignore_malformed: Raw,
    pub index: Raw,
    pub null_value: Raw,
    pub store: Raw,
    pub meta: BTreeMap<String, String>,
}

impl Params for ScaledFloatParams {
    type Output = ScaledFloatField;
    fn tag(&self) -> &'static str {
        ScaledFloatField::TAG
    }
    fn build(&self) -> (ScaledFloatField, BuildErrors) {
        let tag = ScaledFloatField::TAG;
        let mut field = ScaledFloatField::new();
        let mut errors = BuildErrors::new();
        errors.collect(tag, field.scaling_factor.set_scaling_factor(&self.scaling_factor));
        errors.collect(tag, field.doc_values.set_doc_values(&self.doc_values));
        errors.collect(tag, field.ignore_malformed.set_ignore_malformed(&self.ignore_malformed));
        errors.collect(tag, field.index.set_index(&self.index));
        errors.collect(tag, field.null_value.set_null_value(&self.null_value));
        errors.collect(tag, field.store.set_store(&self.store));
        field.meta.set_meta(self.meta.clone());
        (field, errors)
    }
}

// ------------- Text -------------
kind! {
    /// Full text, analyzed into individual terms before indexing.
    TextField => "text" {
        norms: NormsParam,
        index: IndexParam,
        store: StoreParam,
        analyzer: AnalyzerParam,
        meta: MetaParam,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextParams {
    pub norms: Raw,
    pub index: Raw,
    pub store: Raw,
    pub analyzer: Raw,
    pub meta: BTreeMap<String, String>,
}

impl Params for TextParams {
    type Output = TextField;
    fn tag(&self) -> &'static str {
        TextField::TAG
    }
    fn build(&self) -> (TextField, BuildErrors) {
        let tag = TextField::TAG;
        let mut field = TextField::new();
        let mut errors = BuildErrors::new();
        errors.collect(tag, field.norms.set_norms(&self.norms));
        errors.collect(tag, field.index.set_index(&self.index));
        errors.collect(tag, field.store.set_store(&self.store));
        errors.collect(tag, field.analyzer.set_analyzer(&self.analyzer));
        field.meta.set_meta(self.meta.clone());
        (field, errors)
    }
}

// ------------- Field -------------
/// A mapping entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Date(DateField),
    DateNanos(DateNanosField),
    RankFeature(RankFeatureField),
    RankFeatures(RankFeaturesField),
    ScaledFloat(ScaledFloatField),
    Text(TextField),
}

envelope! {
    Field, FieldParams,
    supported {
        Date(DateField),
        DateNanos(DateNanosField),
        RankFeature(RankFeatureField),
        RankFeatures(RankFeaturesField),
        ScaledFloat(ScaledFloatField),
        Text(TextField),
    }
    unsupported {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldParams {
    Date(DateParams),
    DateNanos(DateNanosParams),
    RankFeature(RankFeatureParams),
    RankFeatures(RankFeaturesParams),
    ScaledFloat(ScaledFloatParams),
    Text(TextParams),
}

impl FieldParams {
    fn build(&self) -> (Field, BuildErrors) {
        fn wrap<K: Into<Field>>((kind, errors): (K, BuildErrors)) -> (Field, BuildErrors) {
            (kind.into(), errors)
        }
        match self {
            FieldParams::Date(p) => wrap(p.build()),
            FieldParams::DateNanos(p) => wrap(p.build()),
            FieldParams::RankFeature(p) => wrap(p.build()),
            FieldParams::RankFeatures(p) => wrap(p.build()),
            FieldParams::ScaledFloat(p) => wrap(p.build()),
            FieldParams::Text(p) => wrap(p.build()),
        }
    }
}

impl EnvelopeParams for FieldParams {
    type Envelope = Field;
    fn tag(&self) -> &'static str {
        match self {
            FieldParams::Date(p) => p.tag(),
            FieldParams::DateNanos(p) => p.tag(),
            FieldParams::RankFeature(p) => p.tag(),
            FieldParams::RankFeatures(p) => p.tag(),
            FieldParams::ScaledFloat(p) => p.tag(),
            FieldParams::Text(p) => p.tag(),
        }
    }
    fn build_envelope(&self) -> Result<(Field, BuildErrors)> {
        Ok(self.build())
    }
}

macro_rules! field_params_from {
    ($($variant:ident($params:ty)),+ $(,)?) => {
        $(
            impl From<$params> for FieldParams {
                fn from(p: $params) -> Self {
                    FieldParams::$variant(p)
                }
            }
        )+
    };
}

field_params_from!(
    Date(DateParams),
    DateNanos(DateNanosParams),
    RankFeature(RankFeatureParams),
    RankFeatures(RankFeaturesParams),
    ScaledFloat(ScaledFloatParams),
    Text(TextParams),
);
