use crate::any_value::{AnyValue, Value};
use crate::masked::Masked;
use crate::store::DataStore;
use std::sync::Arc;

/// Write access on top of [`DataStore`].
///
/// Writes take `&self` so that any number of handles and [`Masked`] views can share one
/// store and see each other's changes immediately. No type is enforced on write; values
/// are only checked when read.
pub trait MutableDataStore: DataStore {
    /// Stores `value` at `id`, replacing whatever was there regardless of its type
    fn put_untyped(&self, id: String, value: AnyValue);

    /// Stores `value` only if `id` holds nothing (of any type).
    ///
    /// Returns true if the value was inserted.
    fn put_if_absent_untyped(&self, id: String, value: AnyValue) -> bool;

    /// Returns true if the key was present and removed
    fn remove(&self, id: &str) -> bool;

    /// Removes and returns the value at `id` if `predicate` accepts it.
    ///
    /// The check and the removal happen as one step, so no other writer can swap the
    /// value in between. A rejected value stays where it is.
    fn remove_if(
        &self,
        id: &str,
        predicate: &mut dyn FnMut(&AnyValue) -> bool,
    ) -> Option<AnyValue>;

    /// Removes every entry
    fn clear(&self);
}

/// Typed writes over any [`MutableDataStore`]
pub trait MutableDataStoreExt: MutableDataStore {
    /// Stores `value` at `id`, replacing any previous value of any type
    fn put<T: Value>(&self, id: impl Into<String>, value: T) {
        self.put_untyped(id.into(), AnyValue::new(value));
    }

    /// Stores `value` if there is one. `None` is ignored: it never clears the key.
    fn put_opt<T: Value>(&self, id: impl Into<String>, value: Option<T>) {
        if let Some(value) = value {
            self.put(id, value);
        }
    }

    /// Stores `value` unless `id` already holds something, even a value of another type.
    ///
    /// Returns true if the value was inserted.
    fn put_if_absent<T: Value>(&self, id: impl Into<String>, value: T) -> bool {
        self.put_if_absent_untyped(id.into(), AnyValue::new(value))
    }

    /// Copies every entry of `other` into this store, overwriting on collision.
    /// `other` is left untouched.
    fn pull_from<O: DataStore + ?Sized>(&self, other: &O) {
        for (key, value) in other.entries() {
            self.put_untyped(key, value);
        }
    }

    /// A view of this store that only reads and writes `T`s
    ///
    /// # Examples
    ///
    /// ```
    /// use datastore::{DataStoreExt, GenericStore, MutableDataStoreExt};
    ///
    /// let store = GenericStore::new();
    /// store.put("count", 3i32);
    ///
    /// let names = store.masked::<String>();
    /// names.set("greeting", String::from("hi"));
    ///
    /// assert_eq!(names.get("greeting").as_deref(), Some("hi"));
    /// assert_eq!(names.get("count"), None);
    /// assert_eq!(store.get::<String>("greeting").as_deref(), Some("hi"));
    /// ```
    fn masked<T: Value + Clone>(&self) -> Masked<'_, Self, T> {
        Masked::new(self)
    }
}

impl<S: MutableDataStore + ?Sized> MutableDataStoreExt for S {}

macro_rules! forward_mutable_data_store {
    ($($ptr:ty),*) => {$(
        impl<S: MutableDataStore + ?Sized> MutableDataStore for $ptr {
            fn put_untyped(&self, id: String, value: AnyValue) {
                (**self).put_untyped(id, value)
            }

            fn put_if_absent_untyped(&self, id: String, value: AnyValue) -> bool {
                (**self).put_if_absent_untyped(id, value)
            }

            fn remove(&self, id: &str) -> bool {
                (**self).remove(id)
            }

            fn remove_if(
                &self,
                id: &str,
                predicate: &mut dyn FnMut(&AnyValue) -> bool,
            ) -> Option<AnyValue> {
                (**self).remove_if(id, predicate)
            }

            fn clear(&self) {
                (**self).clear()
            }
        }
    )*};
}

forward_mutable_data_store!(&S, Box<S>, Arc<S>);
