//! Parameter table: canonical name to literal value, one name per value

use super::naming::base_name;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashSet;
use tracing::trace;

/// A captured literal and the name it was assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

/// Ordered, value-deduplicated store of parameters for one document run.
///
/// Entries are only ever appended. Two entries never share a value once
/// surrounding quotes and whitespace are ignored, and a name is never
/// handed out twice.
#[derive(Debug, Clone, Default)]
pub struct ParameterTable {
    entries: Vec<Parameter>,
    names: HashSet<String>,
    seeded: usize,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the name for `value`, minting a new one from `hint` if the value
    /// has not been seen.
    ///
    /// `None` means the candidate has no usable value or hint and nothing was
    /// recorded.
    pub fn resolve_or_create(&mut self, hint: &str, value: &str) -> Option<String> {
        let stored = strip_quotes(value);
        if stored.trim().is_empty() {
            return None;
        }

        if let Some(existing) = self.name_for_value(stored) {
            return Some(existing.to_string());
        }

        let base = base_name(hint)?;
        let name = self.mint(base);
        trace!(name = %name, value = %stored, "minted parameter");

        self.names.insert(name.clone());
        self.entries.push(Parameter {
            name: name.clone(),
            value: stored.to_string(),
        });
        Some(name)
    }

    /// Records an already-declared parameter, e.g. one read back from an
    /// existing header cell. Ignored if the name or the value is taken.
    pub fn seed(&mut self, name: &str, value: &str) -> bool {
        let stored = strip_quotes(value);
        if name.is_empty()
            || stored.trim().is_empty()
            || self.names.contains(name)
            || self.name_for_value(stored).is_some()
        {
            return false;
        }

        self.names.insert(name.to_string());
        self.entries.push(Parameter {
            name: name.to_string(),
            value: stored.to_string(),
        });
        self.seeded += 1;
        true
    }

    /// Looks up the name whose value equals `value` after trimming
    pub fn name_for_value(&self, value: &str) -> Option<&str> {
        let wanted = strip_quotes(value).trim();
        self.entries
            .iter()
            .find(|p| p.value.trim() == wanted)
            .map(|p| p.name.as_str())
    }

    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Entries in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries that came from `seed` rather than detection
    pub fn seeded_len(&self) -> usize {
        self.seeded
    }

    /// Number of entries minted during this run
    pub fn minted_len(&self) -> usize {
        self.entries.len() - self.seeded
    }

    fn mint(&self, base: String) -> String {
        if !self.names.contains(&base) {
            return base;
        }
        let mut counter = 2;
        loop {
            let candidate = format!("{}_{}", base, counter);
            if !self.names.contains(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }
}

impl Serialize for ParameterTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for p in &self.entries {
            map.serialize_entry(&p.name, &p.value)?;
        }
        map.end()
    }
}

impl<'a> IntoIterator for &'a ParameterTable {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn strip_quotes(value: &str) -> &str {
    value.trim().trim_matches('"').trim_matches('\'')
}
