use std::path::Path;

use indexmap::IndexMap;

use crate::registry_encoding::TextEncoding;
use crate::registry_key::KeyEntries;
use crate::registry_parser::{ParseError, RegistryParser};
use crate::registry_value::{RegistryValue, ValueDecodeError};

/// A value dropped under [`InvalidValuePolicy::Skip`](crate::InvalidValuePolicy::Skip).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedValue {
    pub key: String,
    pub name: String,
    pub raw_data: String,
    pub error: ValueDecodeError,
}

/// A parsed `.reg` file: key paths mapped to their values.
///
/// Keys iterate in order of first appearance in the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryDocument {
    keys: IndexMap<String, KeyEntries>,
    encoding: TextEncoding,
    skipped: Vec<SkippedValue>,
}

impl RegistryDocument {
    pub(crate) fn new(encoding: TextEncoding) -> Self {
        Self {
            keys: IndexMap::new(),
            encoding,
            skipped: Vec::new(),
        }
    }

    /// Parses a file with the default options.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        RegistryParser::default().load_from_file(path)
    }

    /// Parses text with the default options.
    pub fn from_text(text: &str) -> Result<Self, ParseError> {
        RegistryParser::default().load_from_text(text)
    }

    pub(crate) fn insert_key(&mut self, entries: KeyEntries) {
        self.keys.insert(entries.path().to_string(), entries);
    }

    pub(crate) fn record_skipped(&mut self, skipped: SkippedValue) {
        self.skipped.push(skipped);
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn get_key(&self, path: &str) -> Option<&KeyEntries> {
        self.keys.get(path)
    }

    pub fn get_value(&self, key: &str, name: &str) -> Option<&RegistryValue> {
        self.get_key(key).and_then(|k| k.get_value(name))
    }

    pub fn contains_key(&self, path: &str) -> bool {
        self.keys.contains_key(path)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyEntries> {
        self.keys.values()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of values across all keys.
    pub fn value_count(&self) -> usize {
        self.keys.values().map(KeyEntries::len).sum()
    }

    pub fn skipped(&self) -> &[SkippedValue] {
        &self.skipped
    }
}

impl<'a> IntoIterator for &'a RegistryDocument {
    type Item = &'a KeyEntries;
    type IntoIter = indexmap::map::Values<'a, String, KeyEntries>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.values()
    }
}
