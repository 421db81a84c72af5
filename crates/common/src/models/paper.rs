//! Paper records and the catalog they are loaded into

use crate::errors::{AppError, Result};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::slice;

/// One paper of the adjacency-list data file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaperRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default, alias = "authors", deserialize_with = "null_as_default")]
    pub author: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub journal: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,

    /// Short generated display label, may carry markdown emphasis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Ids of the papers this one cites, in source order
    #[serde(default, deserialize_with = "null_as_default")]
    pub references: Vec<String>,

    /// Stored summary embedding; `None` when the paper was never embedded
    #[serde(default, alias = "vector", skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,

    /// Accepted incoming citations, recomputed on every graph build
    #[serde(default, rename = "citations", deserialize_with = "null_as_default")]
    pub citation_count: u32,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl PaperRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_references<I, S>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.references = references.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }
}

/// Paper id -> record, iterated in the order the ids first appeared.
///
/// Graph construction and similarity tie-breaks depend on iteration order,
/// so the catalog keeps the data file's key order and never exposes an
/// unordered view. Re-inserting an id replaces its record in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaperCatalog {
    entries: Vec<(String, PaperRecord)>,
    index: HashMap<String, usize>,
}

impl PaperCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the adjacency-list JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| AppError::DataLoad {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let catalog = Self::from_json_str(&raw).map_err(|e| AppError::DataLoad {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        tracing::info!(
            path = %path.display(),
            papers = catalog.len(),
            "Loaded paper catalog"
        );

        Ok(catalog)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn insert(&mut self, id: impl Into<String>, record: PaperRecord) -> Option<PaperRecord> {
        let id = id.into();
        match self.index.get(&id) {
            Some(&slot) => Some(std::mem::replace(&mut self.entries[slot].1, record)),
            None => {
                self.index.insert(id.clone(), self.entries.len());
                self.entries.push((id, record));
                None
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&PaperRecord> {
        self.index.get(id).map(|&slot| &self.entries[slot].1)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut PaperRecord> {
        let slot = *self.index.get(id)?;
        Some(&mut self.entries[slot].1)
    }

    /// Like `get` but reports unknown ids as `PaperNotFound`
    pub fn require(&self, id: &str) -> Result<&PaperRecord> {
        self.get(id).ok_or_else(|| AppError::PaperNotFound { id: id.to_string() })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut PaperRecord)> {
        self.entries.iter_mut().map(|(id, record)| (&*id, record))
    }
}

/// Borrowing iterator over a catalog in insertion order
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: slice::Iter<'a, (String, PaperRecord)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a String, &'a PaperRecord);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(id, record)| (id, record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a PaperCatalog {
    type Item = (&'a String, &'a PaperRecord);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, PaperRecord)> for PaperCatalog {
    fn from_iter<T: IntoIterator<Item = (K, PaperRecord)>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for (id, record) in iter {
            catalog.insert(id, record);
        }
        catalog
    }
}

impl Serialize for PaperCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, record) in &self.entries {
            map.serialize_entry(id, record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PaperCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(CatalogVisitor)
    }
}

/// Reads the JSON object entry by entry so file order survives
struct CatalogVisitor;

impl<'de> Visitor<'de> for CatalogVisitor {
    type Value = PaperCatalog;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping paper ids to records")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        let mut catalog = PaperCatalog::new();
        while let Some((id, record)) = access.next_entry::<String, PaperRecord>()? {
            catalog.insert(id, record);
        }
        Ok(catalog)
    }
}
