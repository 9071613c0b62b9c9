use indexmap::IndexMap;

use crate::registry_hive::Hive;
use crate::registry_value::RegistryValue;

/// The values of one registry key, keyed by value name.
///
/// The default value is stored under the empty name.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEntries {
    path: String,
    values: IndexMap<String, RegistryValue>,
}

impl KeyEntries {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            values: IndexMap::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn hive(&self) -> Option<Hive> {
        Hive::split_key_path(&self.path).0
    }

    pub fn path_without_root(&self) -> &str {
        Hive::split_key_path(&self.path).1
    }

    pub fn values(&self) -> &IndexMap<String, RegistryValue> {
        &self.values
    }

    pub fn get_value(&self, name: &str) -> Option<&RegistryValue> {
        self.values.get(name)
    }

    pub fn default_value(&self) -> Option<&RegistryValue> {
        self.values.get("")
    }

    pub fn contains_value(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegistryValue> {
        self.values.values()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn set_value_for_loading(&mut self, value: RegistryValue) {
        self.values.insert(value.name().to_string(), value);
    }
}

impl<'a> IntoIterator for &'a KeyEntries {
    type Item = &'a RegistryValue;
    type IntoIter = indexmap::map::Values<'a, String, RegistryValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.values()
    }
}
