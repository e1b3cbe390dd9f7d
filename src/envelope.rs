//! The polymorphic envelope.
//!
//! A concrete kind (a `date` field, a `range` clause, ...) is a struct of
//! parameter mixins implementing [`Kind`]. The closed enums [`Field`] and
//! [`Clause`] wrap those structs and implement [`Envelope`], which is what a
//! document stores. On the wire every envelope is an object carrying its kind
//! under `"type"` next to the parameters that differ from their defaults.
//!
//! [`Field`]: crate::field::Field
//! [`Clause`]: crate::clause::Clause

use std::fmt;

use crate::codec::{Codec, Map, Node};
use crate::datatype::Value;
use crate::error::{BuildErrors, ParamError, Result, SearchdocError};

/// Wire key holding the kind tag.
pub const TYPE_KEY: &str = "type";

/// Entry name reported by errors on a standalone envelope, which has none.
pub const UNNAMED: &str = "<envelope>";

/// A concrete kind made of parameter mixins.
pub trait Kind: Default + Clone + PartialEq + fmt::Debug {
    const TAG: &'static str;
    /// Every wire key declared by the kind's mixins.
    const KEYS: &'static [&'static str];
    fn is_empty(&self) -> bool;
    fn encode_params(&self, out: &mut Map) -> std::result::Result<(), ParamError>;
    fn decode_params(&mut self, wire: &Map) -> std::result::Result<(), ParamError>;
    fn clear(&mut self) {
        *self = Self::default();
    }

    /// Decodes a fresh value, rejecting keys the kind does not declare.
    fn decode(wire: &Map) -> std::result::Result<Self, DecodeFailure> {
        if let Some(key) = wire.keys().find(|k| k.as_str() != TYPE_KEY && !Self::KEYS.contains(&k.as_str())) {
            return Err(DecodeFailure::UnknownParam { kind: Self::TAG, key: key.clone() });
        }
        let mut kind = Self::default();
        kind.decode_params(wire)
            .map_err(|source| DecodeFailure::Param { kind: Self::TAG, source })?;
        Ok(kind)
    }
}

/// Why a single envelope could not be decoded; named by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeFailure {
    UnknownKind(String),
    UnknownParam { kind: &'static str, key: String },
    Param { kind: &'static str, source: ParamError },
    Unimplemented { kind: &'static str },
}

impl DecodeFailure {
    pub fn named(self, name: &str) -> SearchdocError {
        let name = name.to_owned();
        match self {
            DecodeFailure::UnknownKind(tag) => SearchdocError::UnknownKind { name, tag },
            DecodeFailure::UnknownParam { kind, key } => SearchdocError::UnknownParam { name, kind, key },
            DecodeFailure::Param { kind, source } => SearchdocError::Param { name, kind, source },
            DecodeFailure::Unimplemented { kind } => SearchdocError::Unimplemented { kind, operation: "decode" },
        }
    }
}

/// Loosely typed construction input for one envelope family.
pub trait EnvelopeParams {
    type Envelope;
    fn tag(&self) -> &'static str;
    /// Applies every setter and collects each failure. Kinds that cannot be
    /// built at all fail with [`SearchdocError::Unimplemented`].
    fn build_envelope(&self) -> Result<(Self::Envelope, BuildErrors)>;
}

/// Loosely typed construction input for one concrete kind.
pub trait Params {
    type Output;
    fn tag(&self) -> &'static str;
    /// Applies every setter; never stops at the first failure.
    fn build(&self) -> (Self::Output, BuildErrors);
    fn try_build(&self) -> std::result::Result<Self::Output, BuildErrors> {
        let (output, errors) = self.build();
        errors.into_result(output)
    }
}

/// What a document stores: one of a closed family of kinds.
pub trait Envelope: Sized + Clone + PartialEq + fmt::Debug {
    type Params: EnvelopeParams<Envelope = Self>;

    /// Tags this family knows about, including the unsupported ones.
    const TAGS: &'static [&'static str];

    fn tag(&self) -> &'static str;
    fn is_empty(&self) -> bool;
    fn clear(&mut self);
    fn encode_params(&self, out: &mut Map) -> std::result::Result<(), ParamError>;
    fn decode(tag: &str, wire: &Map) -> std::result::Result<Self, DecodeFailure>;

    /// `"type"` first, then every mixin hook.
    fn encode(&self) -> std::result::Result<Map, ParamError> {
        let mut out = Map::new();
        out.insert(TYPE_KEY.to_owned(), Node::Value(Value::String(self.tag().to_owned())));
        self.encode_params(&mut out)?;
        Ok(out)
    }

    /// Envelope level encoding; errors carry [`UNNAMED`] as the entry name.
    fn to_map(&self) -> Result<Map> {
        self.encode().map_err(|source| SearchdocError::Param {
            name: UNNAMED.to_owned(),
            kind: self.tag(),
            source,
        })
    }
    /// The object must carry its own `"type"`.
    fn from_map(wire: &Map) -> Result<Self> {
        let tag = type_of(wire).ok_or_else(|| SearchdocError::MissingKind { name: UNNAMED.to_owned() })?;
        Self::decode(tag, wire).map_err(|failure| failure.named(UNNAMED))
    }
    fn to_json(&self) -> Result<Vec<u8>> {
        Codec::json().encode_envelope(self)
    }
    fn to_binary(&self) -> Result<Vec<u8>> {
        Codec::binary().encode_envelope(self)
    }
    fn from_json(bytes: &[u8]) -> Result<Self> {
        Codec::json().decode_envelope(bytes)
    }
    fn from_binary(bytes: &[u8]) -> Result<Self> {
        Codec::binary().decode_envelope(bytes)
    }
}

/// The `"type"` of an encoded envelope, when it is a non-empty string.
pub fn type_of(wire: &Map) -> Option<&str> {
    match wire.get(TYPE_KEY) {
        Some(Node::Value(Value::String(tag))) if !tag.is_empty() => Some(tag),
        _ => None,
    }
}

/// Declares a kind struct from its mixins.
///
/// Mixins listed under `requires` must hold a value after decoding.
macro_rules! kind {
    (
        $(#[$doc:meta])*
        $name:ident => $tag:literal {
            $($field:ident: $param:ty),+ $(,)?
        }
        $(requires [$($required:ident),+])?
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct $name {
            $(pub $field: $param,)+
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }
        }

        impl $crate::envelope::Kind for $name {
            const TAG: &'static str = $tag;
            const KEYS: &'static [&'static str] = &{
                const N: usize = 0 $(+ <$param as $crate::param::Param>::KEYS.len())+;
                let mut keys: [&'static str; N] = [""; N];
                let mut at = 0;
                $(
                    let mut i = 0;
                    while i < <$param as $crate::param::Param>::KEYS.len() {
                        keys[at] = <$param as $crate::param::Param>::KEYS[i];
                        at += 1;
                        i += 1;
                    }
                )+
                keys
            };
            fn is_empty(&self) -> bool {
                use $crate::param::Param;
                true $(&& self.$field.is_default())+
            }
            fn encode_params(&self, out: &mut $crate::codec::Map) -> std::result::Result<(), $crate::error::ParamError> {
                use $crate::param::Param;
                $(self.$field.encode(out)?;)+
                Ok(())
            }
            fn decode_params(&mut self, wire: &$crate::codec::Map) -> std::result::Result<(), $crate::error::ParamError> {
                use $crate::param::Param;
                $(self.$field.decode(wire)?;)+
                $($(self.$required.require()?;)+)?
                Ok(())
            }
            fn clear(&mut self) {
                use $crate::param::Param;
                $(self.$field.clear();)+
            }
        }
    };
}

/// Implements [`Envelope`] for a closed enum whose variants wrap kinds.
macro_rules! envelope {
    (
        $envelope:ident, $params:ty,
        supported { $($variant:ident($kind:ty)),+ $(,)? }
        unsupported { $($unsupported:literal),* $(,)? }
    ) => {
        impl $crate::envelope::Envelope for $envelope {
            type Params = $params;
            const TAGS: &'static [&'static str] = &[
                $(<$kind as $crate::envelope::Kind>::TAG,)+ $($unsupported,)*
            ];
            fn tag(&self) -> &'static str {
                match self {
                    $($envelope::$variant(_) => <$kind as $crate::envelope::Kind>::TAG,)+
                }
            }
            fn is_empty(&self) -> bool {
                use $crate::envelope::Kind;
                match self {
                    $($envelope::$variant(k) => k.is_empty(),)+
                }
            }
            fn clear(&mut self) {
                use $crate::envelope::Kind;
                match self {
                    $($envelope::$variant(k) => k.clear(),)+
                }
            }
            fn encode_params(&self, out: &mut $crate::codec::Map) -> std::result::Result<(), $crate::error::ParamError> {
                use $crate::envelope::Kind;
                match self {
                    $($envelope::$variant(k) => k.encode_params(out),)+
                }
            }
            fn decode(tag: &str, wire: &$crate::codec::Map) -> std::result::Result<Self, $crate::envelope::DecodeFailure> {
                use $crate::envelope::Kind;
                $(
                    if tag == <$kind as Kind>::TAG {
                        return <$kind>::decode(wire).map($envelope::$variant);
                    }
                )+
                $(
                    if tag == $unsupported {
                        return Err($crate::envelope::DecodeFailure::Unimplemented { kind: $unsupported });
                    }
                )*
                Err($crate::envelope::DecodeFailure::UnknownKind(tag.to_owned()))
            }
        }

        $(
            impl From<$kind> for $envelope {
                fn from(kind: $kind) -> Self {
                    $envelope::$variant(kind)
                }
            }
        )+
    };
}

pub(crate) use envelope;
pub(crate) use kind;
