use ahash::RandomState;
use indexmap::IndexMap;

/// A string-keyed multiset with stable iteration order.
///
/// The table copies every key on insert and is the sole owner of both keys
/// and values: `find` borrows, `delete` transfers the value back to the
/// caller. Iteration follows insertion order and is stable within a single
/// process lifetime; deletions perturb it deterministically (swap-removal),
/// and the hash seed makes it undefined across runs.
#[derive(Debug, Clone, Default)]
pub struct KmerTable<V> {
    entries: IndexMap<Box<str>, V, RandomState>,
}

impl<V> KmerTable<V> {
    pub fn new() -> Self {
        Self { entries: IndexMap::default() }
    }

    /// Size the bucket array up front; the table still grows on demand to
    /// keep the load factor bounded.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: IndexMap::with_capacity_and_hasher(capacity, RandomState::default()) }
    }

    /// Insert `(key, value)`. When the key is already present the
    /// first-inserted value is kept, and `false` ("not inserted") returned.
    pub fn add(&mut self, key: &str, value: V) -> bool {
        if self.entries.contains_key(key) {
            return false
        }
        self.entries.insert(Box::from(key), value);
        true
    }

    pub fn find(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn find_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    /// Remove an entry, transferring ownership of its value to the caller.
    pub fn delete(&mut self, key: &str) -> Option<V> {
        self.entries.swap_remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Borrowing iteration over `(key, value)` pairs, in table order.
    /// Callers must not mutate the table while holding the iterator.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_ref(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(AsRef::as_ref)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.entries.values_mut()
    }
}
