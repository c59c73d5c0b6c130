use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// A record kept in a [`Collection`]: identified by a string id and
/// updatable through a partial `Patch`.
pub trait Record {
    /// Partial update applied by [`Collection::update`].
    type Patch;

    /// Prefix for generated ids, e.g. `symptom` → `symptom_1f0c…`.
    const ID_PREFIX: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn apply(&mut self, patch: Self::Patch);

    /// Re-establish per-field invariants after a write.
    fn normalize(&mut self) {}
}

/// Ordered records with identifiers unique within the collection.
///
/// Unknown ids are never an error: `update` and `remove` on a missing id
/// are no-ops that report `false`.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Record> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and return its id. A blank id, or one already used
    /// in this collection, is replaced by a freshly generated one.
    pub fn add(&mut self, mut record: T) -> String {
        if record.id().trim().is_empty() || self.contains(record.id()) {
            record.set_id(generate_id(T::ID_PREFIX));
        }
        record.normalize();
        let id = record.id().to_string();
        self.items.push(record);
        id
    }

    /// Apply `patch` to the record with `id`. Returns `false` if no such record.
    pub fn update(&mut self, id: &str, patch: T::Patch) -> bool {
        match self.get_mut(id) {
            Some(record) => {
                record.apply(patch);
                record.normalize();
                true
            }
            None => false,
        }
    }

    /// Remove the record with `id`. Returns `false` if it was not present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|r| r.id() != id);
        self.items.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|r| r.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.items.iter_mut().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }
}

impl<T> Collection<T> {
    /// Records in insertion order.
    pub fn list(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Record> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut collection = Self::new();
        for record in iter {
            collection.add(record);
        }
        collection
    }
}

impl<T: Serialize> Serialize for Collection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

/// Loading goes through [`Collection::add`], so blank or duplicated ids in
/// a stored blob are reassigned and every record is normalized.
impl<'de, T> Deserialize<'de> for Collection<T>
where
    T: Record + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<T>::deserialize(deserializer)?;
        let mut seen = HashSet::new();
        let reassigned = items.iter().filter(|r| !seen.insert(r.id().to_string())).count();
        if reassigned > 0 {
            tracing::warn!(
                count = reassigned,
                prefix = T::ID_PREFIX,
                "Duplicate record ids in stored data, reassigning"
            );
        }
        Ok(items.into_iter().collect())
    }
}

/// `{prefix}_{32 hex chars}`; unique for the lifetime of the process.
pub fn generate_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}
