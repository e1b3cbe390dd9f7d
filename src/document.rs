//! Named collections of envelopes: a mapping is a `Document<Field>` and a
//! query is a `Document<Clause>`.

use std::collections::BTreeMap;
use std::collections::btree_map;

use tracing::{debug, warn};

use crate::codec::{Map, Node};
use crate::envelope::{Envelope, EnvelopeParams, type_of};
use crate::error::{Result, SearchdocError};

/// Name to kind tag, used to decode objects that omit their `"type"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    kinds: BTreeMap<String, String>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn insert(&mut self, name: impl Into<String>, tag: impl Into<String>) -> Option<String> {
        self.kinds.insert(name.into(), tag.into())
    }
    pub fn with(mut self, name: impl Into<String>, tag: impl Into<String>) -> Self {
        self.insert(name, tag);
        self
    }
    pub fn kind(&self, name: &str) -> Option<&str> {
        self.kinds.get(name).map(String::as_str)
    }
    pub fn len(&self) -> usize {
        self.kinds.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.kinds.iter().map(|(n, t)| (n.as_str(), t.as_str()))
    }
}

impl<N: Into<String>, T: Into<String>> FromIterator<(N, T)> for Schema {
    fn from_iter<I: IntoIterator<Item = (N, T)>>(iter: I) -> Self {
        Self { kinds: iter.into_iter().map(|(n, t)| (n.into(), t.into())).collect() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document<E> {
    entries: BTreeMap<String, E>,
}

impl<E> Default for Document<E> {
    fn default() -> Self {
        Self { entries: BTreeMap::new() }
    }
}

impl<E: Envelope> Document<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails when the name is empty or already taken.
    pub fn add(&mut self, name: impl Into<String>, envelope: impl Into<E>) -> Result<()> {
        let name = name.into();
        let envelope = envelope.into();
        if name.is_empty() {
            return Err(SearchdocError::NameRequired { kind: envelope.tag() });
        }
        if let Some(existing) = self.entries.get(&name) {
            return Err(SearchdocError::FieldExists { kind: existing.tag(), name });
        }
        debug!(name = %name, kind = envelope.tag(), "adding entry");
        self.entries.insert(name, envelope);
        Ok(())
    }

    /// Inserts or overwrites, handing back what was there before.
    pub fn assign(&mut self, name: impl Into<String>, envelope: impl Into<E>) -> Result<Option<E>> {
        let name = name.into();
        let envelope = envelope.into();
        if name.is_empty() {
            return Err(SearchdocError::NameRequired { kind: envelope.tag() });
        }
        debug!(name = %name, kind = envelope.tag(), "assigning entry");
        let previous = self.entries.insert(name.clone(), envelope);
        if let Some(previous) = &previous {
            warn!(name = %name, kind = previous.tag(), "overwrote existing entry");
        }
        Ok(previous)
    }

    pub fn add_params(&mut self, name: impl Into<String>, params: impl Into<E::Params>) -> Result<()> {
        let name = name.into();
        let envelope = Self::build(&name, params.into())?;
        self.add(name, envelope)
    }

    pub fn assign_params(&mut self, name: impl Into<String>, params: impl Into<E::Params>) -> Result<Option<E>> {
        let name = name.into();
        let envelope = Self::build(&name, params.into())?;
        self.assign(name, envelope)
    }

    fn build(name: &str, params: E::Params) -> Result<E> {
        let (envelope, errors) = params.build_envelope()?;
        if errors.has_errors() {
            return Err(SearchdocError::Build { name: name.to_owned(), kind: params.tag(), errors });
        }
        Ok(envelope)
    }

    /// Replaces every entry. The document is untouched unless all succeed.
    pub fn set_all<N, V>(&mut self, entries: impl IntoIterator<Item = (N, V)>) -> Result<()>
    where
        N: Into<String>,
        V: Into<E>,
    {
        let mut fresh = Self::new();
        for (name, envelope) in entries {
            fresh.add(name, envelope)?;
        }
        *self = fresh;
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<E> {
        let removed = self.entries.remove(name);
        if removed.is_some() {
            debug!(name = %name, "removed entry");
        }
        removed
    }
    pub fn get(&self, name: &str) -> Option<&E> {
        self.entries.get(name)
    }
    pub fn get_mut(&mut self, name: &str) -> Option<&mut E> {
        self.entries.get_mut(name)
    }
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
    pub fn iter(&self) -> btree_map::Iter<'_, String, E> {
        self.entries.iter()
    }

    /// Resets the named envelope to its zero value; absent names are ignored.
    pub fn clear_entry(&mut self, name: &str) {
        if let Some(envelope) = self.entries.get_mut(name) {
            envelope.clear();
        }
    }

    pub fn schema(&self) -> Schema {
        self.entries.iter().map(|(name, e)| (name.clone(), e.tag())).collect()
    }

    pub fn to_map(&self) -> Result<Map> {
        let mut map = Map::new();
        for (name, envelope) in &self.entries {
            let encoded = envelope.encode().map_err(|source| SearchdocError::Param {
                name: name.clone(),
                kind: envelope.tag(),
                source,
            })?;
            map.insert(name.clone(), Node::Map(encoded));
        }
        Ok(map)
    }

    pub fn from_map(map: Map) -> Result<Self> {
        Self::from_map_with_schema(map, &Schema::new())
    }

    /// An object's own `"type"` wins; the schema covers objects without one.
    pub fn from_map_with_schema(map: Map, schema: &Schema) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for (name, node) in map {
            let wire = match node {
                Node::Map(wire) => wire,
                other => return Err(SearchdocError::NotAnObject { name, found: other.shape() }),
            };
            let tag = match (type_of(&wire), schema.kind(&name)) {
                (Some(found), Some(expected)) if found != expected => {
                    return Err(SearchdocError::KindMismatch {
                        name,
                        expected: expected.to_owned(),
                        found: found.to_owned(),
                    });
                }
                (Some(tag), _) | (None, Some(tag)) => tag.to_owned(),
                (None, None) => return Err(SearchdocError::MissingKind { name }),
            };
            let envelope = E::decode(&tag, &wire).map_err(|failure| failure.named(&name))?;
            entries.insert(name, envelope);
        }
        Ok(Self { entries })
    }
}

impl<'a, E> IntoIterator for &'a Document<E> {
    type Item = (&'a String, &'a E);
    type IntoIter = btree_map::Iter<'a, String, E>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
