//! Searchdoc – typed mapping and query documents for a document search engine.
//!
//! A search engine is configured with two kinds of JSON objects: *mappings*,
//! which describe how each field of an indexed document is stored, and
//! *queries*, which are trees of clauses matched against those fields. Both are
//! named collections of small polymorphic objects whose `"type"` decides which
//! parameters are allowed:
//! * A [`field::Field`] is one mapping entry (`date`, `scaled_float`, `text`, ...).
//! * A [`clause::Clause`] is one query clause (`range`, `fuzzy`, `match_phrase`, ...).
//! * A [`document::Document`] names a set of either and round trips it through
//!   JSON or CBOR.
//!
//! Parameters are assembled from reusable mixins (see the `param` module) that
//! know their defaults and leave them out of the wire output, so an encoded
//! document only mentions what differs from the engine's own defaults.
//!
//! ## Modules
//! * [`datatype`] – Loose input ([`datatype::Raw`]) and its coercion into the
//!   canonical [`datatype::Value`] (number, boolean, string, time).
//! * [`param`] – Tri-state parameter mixins with default elision.
//! * [`envelope`] – The [`envelope::Kind`] and [`envelope::Envelope`] traits plus
//!   the params builder traits.
//! * [`field`] / [`clause`] – The concrete kinds and their `*Params` builders.
//! * [`document`] – Named envelopes, schema driven decoding.
//! * [`codec`] – The format neutral [`codec::Node`] tree and the JSON / CBOR codec.
//! * [`settings`] – Defaults, optional file and `SEARCHDOC_*` environment layers.
//!
//! ## Loose Input
//! Setters take anything convertible into [`datatype::Raw`]: `5`, `"5"`, `true`,
//! `"TRUE"`, a chrono timestamp or a `serde_json::Value`. Null or an empty string
//! means "not given" and leaves the parameter unset.
//!
//! ## Quick Start
//! ```
//! use searchdoc::{Document, Envelope, Field, ScaledFloatParams, TextParams};
//! let mut mapping: Document<Field> = Document::new();
//! mapping
//!     .add_params("price", ScaledFloatParams { scaling_factor: 100.into(), ..Default::default() })
//!     .unwrap();
//! mapping
//!     .add_params("title", TextParams { norms: false.into(), ..Default::default() })
//!     .unwrap();
//! let json = searchdoc::Codec::json().encode_document(&mapping).unwrap();
//! assert_eq!(
//!     String::from_utf8(json).unwrap(),
//!     r#"{"price":{"scaling_factor":100.0,"type":"scaled_float"},"title":{"norms":false,"type":"text"}}"#
//! );
//! assert!(!mapping.get("title").unwrap().is_empty());
//! ```
//!
//! ## Status
//! The `regexp` clause is recognized but not supported yet; building or
//! decoding one reports [`error::SearchdocError::Unimplemented`].

pub mod clause;
pub mod codec;
pub mod datatype;
pub mod document;
pub mod envelope;
pub mod error;
pub mod field;
pub mod param;
pub mod settings;

pub use clause::{
    Clause, ClauseParams, FuzzyParams, FuzzyQuery, MatchBoolPrefixParams, MatchBoolPrefixQuery,
    MatchPhraseParams, MatchPhraseQuery, RangeParams, RangeQuery, RegexpParams,
};
pub use codec::{Codec, Format, Map, Node};
pub use datatype::{Raw, Value};
pub use document::{Document, Schema};
pub use envelope::{Envelope, EnvelopeParams, Kind, Params, UNNAMED};
pub use error::{BuildErrors, CoercionError, ParamError, Result, SearchdocError};
pub use field::{
    DateField, DateNanosField, DateNanosParams, DateParams, Field, FieldParams, RankFeatureField,
    RankFeatureParams, RankFeaturesField, RankFeaturesParams, ScaledFloatField, ScaledFloatParams,
    TextField, TextParams,
};
pub use param::{Operator, Rewrite, Setting, State, ZeroTermsQuery};
pub use settings::Settings;
