use crate::any_value::AnyValue;
use crate::assertion::{Mismatch, MismatchSink};
use crate::error::StoreError;
use crate::mutable::MutableDataStore;
use crate::store::DataStore;
use crate::type_tag::TypeTag;
use parking_lot::RwLock;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// The standard in-memory store.
///
/// `GenericStore` owns a single map from key to [`AnyValue`]. Any type implementing
/// [`Value`](crate::Value) can be stored under any key; reads are checked against the
/// requested type and come back empty on a mismatch.
///
/// Every operation takes the internal lock once and releases it before returning, so a
/// store can be shared behind an `Arc` and even pulled into itself.
///
/// # Examples
///
/// ```
/// use datastore::{AnyValue, DataStoreExt, GenericStore, MutableDataStoreExt};
///
/// let store = GenericStore::of([
///     ("name", AnyValue::new(String::from("Ada"))),
///     ("age", AnyValue::new(36i32)),
/// ]);
///
/// assert_eq!(store.get::<String>("name").as_deref(), Some("Ada"));
/// assert_eq!(store.get::<String>("age"), None);
/// assert_eq!(store.get_or("age", 0i32), 36);
///
/// store.put("age", 37i32);
/// assert_eq!(store.as_map_of::<i32>()["age"], 37);
/// ```
pub struct GenericStore {
    values: RwLock<HashMap<String, AnyValue>>,
    sink: Option<Arc<dyn MismatchSink>>,
}

impl GenericStore {
    /// Creates a new, empty store with no mismatch reporting
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            sink: None,
        }
    }

    /// Creates an empty store that reports failed typed reads to `sink`
    pub fn with_sink(sink: Arc<dyn MismatchSink>) -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            sink: Some(sink),
        }
    }

    /// Replaces the mismatch sink; `None` silences reporting
    pub fn set_sink(&mut self, sink: Option<Arc<dyn MismatchSink>>) {
        self.sink = sink;
    }

    /// Builds a store from key/value pairs, applied in order so later duplicates win
    pub fn of<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, AnyValue)>,
    {
        pairs.into_iter().collect()
    }

    /// Clones of every stored value
    pub fn values(&self) -> Vec<AnyValue> {
        self.values.read().values().cloned().collect()
    }

    /// Gets a value by executing a closure with read access
    ///
    /// This avoids cloning the stored value. The closure runs while the store is locked,
    /// so it must not call back into the same store. A mismatch is reported to the sink
    /// once the lock has been released.
    ///
    /// # Examples
    ///
    /// ```
    /// use datastore::{GenericStore, MutableDataStoreExt, StoreError};
    ///
    /// let store = GenericStore::new();
    /// store.put("greeting", String::from("hello"));
    ///
    /// let len = store.with("greeting", |s: &String| s.len())?;
    /// assert_eq!(len, 5);
    /// # Ok::<(), StoreError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// - Returns `StoreError::KeyNotFound` if the key doesn't exist
    /// - Returns `StoreError::TypeMismatch` if the value is not a `T`
    #[track_caller]
    pub fn with<T: 'static, F, R>(&self, id: &str, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&T) -> R,
    {
        let location = Location::caller();
        let (found, report) = {
            let values = self.values.read();
            let value = values
                .get(id)
                .ok_or_else(|| StoreError::KeyNotFound(id.to_string()))?;
            if let Some(narrowed) = value.downcast_ref::<T>() {
                return Ok(f(narrowed));
            }
            (value.type_tag(), self.describe::<T>(value, location))
        };
        self.report(report);
        Err(mismatch::<T>(id, found))
    }

    /// Gets a value by executing a closure with write access
    ///
    /// Modifies the stored value in place. The same locking caveat as
    /// [`with`](GenericStore::with) applies.
    ///
    /// # Errors
    ///
    /// - Returns `StoreError::KeyNotFound` if the key doesn't exist
    /// - Returns `StoreError::TypeMismatch` if the value is not a `T`
    #[track_caller]
    pub fn with_mut<T: 'static, F, R>(&self, id: &str, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut T) -> R,
    {
        let location = Location::caller();
        let (found, report) = {
            let mut values = self.values.write();
            let value = values
                .get_mut(id)
                .ok_or_else(|| StoreError::KeyNotFound(id.to_string()))?;
            if let Some(narrowed) = value.downcast_mut::<T>() {
                return Ok(f(narrowed));
            }
            (value.type_tag(), self.describe::<T>(value, location))
        };
        self.report(report);
        Err(mismatch::<T>(id, found))
    }

    /// Builds the sink's view of a failed narrowing, if anyone is listening
    fn describe<T: 'static>(
        &self,
        value: &AnyValue,
        location: &'static Location<'static>,
    ) -> Option<Mismatch> {
        self.sink.as_ref().map(|_| Mismatch::at::<T>(value, location))
    }

    // Must only be called with the lock released.
    fn report(&self, mismatch: Option<Mismatch>) {
        if let (Some(sink), Some(mismatch)) = (&self.sink, mismatch) {
            sink.report(&mismatch);
        }
    }
}

fn mismatch<T: 'static>(id: &str, found: TypeTag) -> StoreError {
    StoreError::TypeMismatch {
        key: id.to_string(),
        expected: TypeTag::of::<T>(),
        found,
    }
}

impl DataStore for GenericStore {
    fn keys(&self) -> HashSet<String> {
        self.values.read().keys().cloned().collect()
    }

    fn get_untyped(&self, id: &str) -> Option<AnyValue> {
        self.values.read().get(id).cloned()
    }

    fn with_untyped(&self, id: &str, f: &mut dyn FnMut(&AnyValue)) {
        if let Some(value) = self.values.read().get(id) {
            f(value);
        }
    }

    fn entries(&self) -> Vec<(String, AnyValue)> {
        self.values
            .read()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    fn contains_key(&self, id: &str) -> bool {
        self.values.read().contains_key(id)
    }

    fn len(&self) -> usize {
        self.values.read().len()
    }

    fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }

    fn mismatch_sink(&self) -> Option<Arc<dyn MismatchSink>> {
        self.sink.clone()
    }
}

impl MutableDataStore for GenericStore {
    fn put_untyped(&self, id: String, value: AnyValue) {
        self.values.write().insert(id, value);
    }

    fn put_if_absent_untyped(&self, id: String, value: AnyValue) -> bool {
        match self.values.write().entry(id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    fn remove(&self, id: &str) -> bool {
        self.values.write().remove(id).is_some()
    }

    fn remove_if(
        &self,
        id: &str,
        predicate: &mut dyn FnMut(&AnyValue) -> bool,
    ) -> Option<AnyValue> {
        let mut values = self.values.write();
        let matches = values.get(id).map_or(false, |value| predicate(value));
        if matches {
            values.remove(id)
        } else {
            None
        }
    }

    fn clear(&self) {
        self.values.write().clear();
    }
}

impl Default for GenericStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Clones are independent snapshots; they share only the mismatch sink.
impl Clone for GenericStore {
    fn clone(&self) -> Self {
        Self {
            values: RwLock::new(self.values.read().clone()),
            sink: self.sink.clone(),
        }
    }
}

impl fmt::Debug for GenericStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericStore")
            .field("values", &*self.values.read())
            .field("reports_mismatches", &self.sink.is_some())
            .finish()
    }
}

impl<K: Into<String>> FromIterator<(K, AnyValue)> for GenericStore {
    fn from_iter<I: IntoIterator<Item = (K, AnyValue)>>(iter: I) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}

impl<K: Into<String>> Extend<(K, AnyValue)> for GenericStore {
    fn extend<I: IntoIterator<Item = (K, AnyValue)>>(&mut self, iter: I) {
        let values = self.values.get_mut();
        for (key, value) in iter {
            values.insert(key.into(), value);
        }
    }
}
