use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::datatype::{Raw, Value, format_time};
use crate::document::{Document, Schema};
use crate::envelope::Envelope;
use crate::error::{Result, SearchdocError};
use crate::settings::Settings;

/// Key order is deterministic so both formats encode the same way every time.
pub type Map = BTreeMap<String, Node>;

/// The format-neutral tree every envelope is written into and read from.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Value(Value),
    Map(Map),
    List(Vec<Node>),
}

impl Node {
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Node::Map(m) => Some(m),
            _ => None,
        }
    }
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Node::Value(v) => Some(v),
            _ => None,
        }
    }
    pub fn shape(&self) -> &'static str {
        match self {
            Node::Value(v) => v.type_name(),
            Node::Map(_) => "map",
            Node::List(_) => "list",
        }
    }
}

impl From<Value> for Node {
    fn from(v: Value) -> Self {
        Node::Value(v)
    }
}

impl From<Map> for Node {
    fn from(m: Map) -> Self {
        Node::Map(m)
    }
}

impl From<&Node> for Raw {
    fn from(node: &Node) -> Self {
        match node {
            Node::Value(v) => Raw::from(v),
            Node::Map(_) => Raw::Other("map"),
            Node::List(_) => Raw::Other("list"),
        }
    }
}

// ------------- Serde -------------
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Time(t) => serializer.serialize_str(&format_time(t)),
            Value::Null => serializer.serialize_unit(),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Node::Value(v) => v.serialize(serializer),
            Node::Map(m) => m.serialize(serializer),
            Node::List(l) => l.serialize(serializer),
        }
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a scalar, a list or a map with string keys")
    }
    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Node, E> {
        Ok(Node::Value(Value::Boolean(v)))
    }
    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Node, E> {
        Ok(Node::Value(Value::Integer(v)))
    }
    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Node, E> {
        match i64::try_from(v) {
            Ok(i) => Ok(Node::Value(Value::Integer(i))),
            Err(_) => Err(E::custom(format!("integer {} is out of range", v))),
        }
    }
    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Node, E> {
        if v.is_finite() {
            Ok(Node::Value(Value::Float(v)))
        } else {
            Err(E::custom(format!("{} is not a finite number", v)))
        }
    }
    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Node, E> {
        Ok(Node::Value(Value::String(v.to_owned())))
    }
    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Node, E> {
        Ok(Node::Value(Value::String(v)))
    }
    fn visit_unit<E: de::Error>(self) -> std::result::Result<Node, E> {
        Ok(Node::Value(Value::Null))
    }
    fn visit_none<E: de::Error>(self) -> std::result::Result<Node, E> {
        Ok(Node::Value(Value::Null))
    }
    fn visit_some<D: Deserializer<'de>>(self, d: D) -> std::result::Result<Node, D::Error> {
        Node::deserialize(d)
    }
    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Node, A::Error> {
        let mut list = Vec::new();
        while let Some(node) = seq.next_element::<Node>()? {
            list.push(node);
        }
        Ok(Node::List(list))
    }
    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Node, A::Error> {
        let mut map = Map::new();
        while let Some((key, node)) = access.next_entry::<String, Node>()? {
            map.insert(key, node);
        }
        Ok(Node::Map(map))
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

// ------------- Format -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    /// CBOR, mirroring the JSON layout key for key.
    Binary,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Format::Json => write!(f, "json"),
            Format::Binary => write!(f, "binary"),
        }
    }
}

impl FromStr for Format {
    type Err = SearchdocError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "binary" | "cbor" => Ok(Format::Binary),
            other => Err(SearchdocError::Config(format!("unknown format {:?}", other))),
        }
    }
}

// ------------- Codec -------------
/// Turns a [`Map`] into bytes and back in one of the two wire formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    format: Format,
    pretty: bool,
    max_bytes: Option<usize>,
}

impl Default for Codec {
    fn default() -> Self {
        Self::new(Format::Json)
    }
}

impl Codec {
    pub fn new(format: Format) -> Self {
        Self { format, pretty: false, max_bytes: None }
    }
    pub fn json() -> Self {
        Self::new(Format::Json)
    }
    pub fn binary() -> Self {
        Self::new(Format::Binary)
    }
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            format: settings.format,
            pretty: settings.pretty,
            max_bytes: settings.max_document_bytes,
        }
    }
    /// Only affects JSON output.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }
    pub fn format(&self) -> Format {
        self.format
    }
    pub fn max_bytes(&self) -> Option<usize> {
        self.max_bytes
    }

    pub fn write(&self, map: &Map) -> Result<Vec<u8>> {
        let bytes = match self.format {
            Format::Json if self.pretty => serde_json::to_vec_pretty(map).map_err(|e| self.encode_error(e))?,
            Format::Json => serde_json::to_vec(map).map_err(|e| self.encode_error(e))?,
            Format::Binary => serde_cbor::to_vec(map).map_err(|e| self.encode_error(e))?,
        };
        trace!(format = %self.format, bytes = bytes.len(), "wrote map");
        Ok(bytes)
    }

    /// Input above the size limit is rejected before any parsing happens.
    pub fn read(&self, bytes: &[u8]) -> Result<Map> {
        if let Some(max) = self.max_bytes {
            if bytes.len() > max {
                return Err(SearchdocError::Decode {
                    format: self.format,
                    message: format!("payload of {} bytes exceeds the limit of {} bytes", bytes.len(), max),
                });
            }
        }
        let map: Map = match self.format {
            Format::Json => serde_json::from_slice(bytes)?,
            Format::Binary => serde_cbor::from_slice(bytes)?,
        };
        trace!(format = %self.format, bytes = bytes.len(), keys = map.len(), "read map");
        Ok(map)
    }

    pub fn encode_envelope<E: Envelope>(&self, envelope: &E) -> Result<Vec<u8>> {
        self.write(&envelope.to_map()?)
    }
    pub fn decode_envelope<E: Envelope>(&self, bytes: &[u8]) -> Result<E> {
        E::from_map(&self.read(bytes)?)
    }

    pub fn encode_document<E: Envelope>(&self, document: &Document<E>) -> Result<Vec<u8>> {
        self.write(&document.to_map()?)
    }
    pub fn decode_document<E: Envelope>(&self, bytes: &[u8]) -> Result<Document<E>> {
        Document::from_map(self.read(bytes)?)
    }
    pub fn decode_document_with_schema<E: Envelope>(&self, bytes: &[u8], schema: &Schema) -> Result<Document<E>> {
        Document::from_map_with_schema(self.read(bytes)?, schema)
    }

    fn encode_error(&self, e: impl fmt::Display) -> SearchdocError {
        SearchdocError::Encode { format: self.format, message: e.to_string() }
    }
}
