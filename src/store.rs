use crate::any_value::{AnyValue, Value};
use crate::assertion::{assert_type, Mismatch, MismatchSink};
use crate::error::StoreError;
use crate::generic::GenericStore;
use crate::mutable::MutableDataStoreExt;
use crate::type_tag::TypeTag;
use std::collections::{HashMap, HashSet};
use std::panic::Location;
use std::sync::Arc;

/// Read access to a heterogeneous string-keyed store.
///
/// This trait is object safe and only deals in type-erased [`AnyValue`]s. The typed
/// accessors live on [`DataStoreExt`], which every `DataStore` (including
/// `dyn DataStore`) gets for free.
pub trait DataStore {
    /// All keys currently present
    fn keys(&self) -> HashSet<String>;

    /// The raw stored value, whatever its type
    fn get_untyped(&self, id: &str) -> Option<AnyValue>;

    /// Calls `f` with a borrow of the value at `id`, if there is one.
    ///
    /// The default goes through [`get_untyped`](DataStore::get_untyped); stores that can
    /// lend out their values should override it to skip the copy. `f` may run while the
    /// store is locked and must not call back into it.
    fn with_untyped(&self, id: &str, f: &mut dyn FnMut(&AnyValue)) {
        if let Some(value) = self.get_untyped(id) {
            f(&value);
        }
    }

    /// A snapshot of every entry.
    ///
    /// The default pairs [`keys`](DataStore::keys) with [`get_untyped`](DataStore::get_untyped);
    /// implementations backed by a single map should return the snapshot in one pass.
    fn entries(&self) -> Vec<(String, AnyValue)> {
        self.keys()
            .into_iter()
            .filter_map(|key| self.get_untyped(&key).map(|value| (key, value)))
            .collect()
    }

    fn contains_key(&self, id: &str) -> bool {
        self.get_untyped(id).is_some()
    }

    fn len(&self) -> usize {
        self.keys().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Where failed typed lookups are reported. `None` keeps mismatches silent.
    fn mismatch_sink(&self) -> Option<Arc<dyn MismatchSink>> {
        None
    }
}

/// Typed reads over any [`DataStore`].
///
/// A missing key and a value of the wrong type look the same through `get`/`get_or`;
/// use [`try_get`](DataStoreExt::try_get) or [`DataStore::contains_key`] to tell them apart.
pub trait DataStoreExt: DataStore {
    /// Returns a clone of the value at `id` if it is stored as a `T`
    ///
    /// # Examples
    ///
    /// ```
    /// use datastore::{DataStoreExt, GenericStore, MutableDataStoreExt};
    ///
    /// let store = GenericStore::new();
    /// store.put("name", String::from("Ada"));
    ///
    /// assert_eq!(store.get::<String>("name").as_deref(), Some("Ada"));
    /// assert_eq!(store.get::<i32>("name"), None);
    /// assert_eq!(store.get::<String>("missing"), None);
    /// ```
    #[track_caller]
    fn get<T: Value + Clone>(&self, id: &str) -> Option<T> {
        lookup::<Self, T>(self, id)?.ok()
    }

    /// Returns the value at `id` if it is a `T`, otherwise `default`.
    ///
    /// The default's type is the type checked for, so a value of any other type stored
    /// under `id` yields the default rather than an error.
    #[track_caller]
    fn get_or<T: Value + Clone>(&self, id: &str, default: T) -> T {
        self.get(id).unwrap_or(default)
    }

    /// Like [`get`](DataStoreExt::get), but says why nothing was returned
    ///
    /// # Errors
    ///
    /// - Returns `StoreError::KeyNotFound` if the key doesn't exist
    /// - Returns `StoreError::TypeMismatch` if the value is not a `T`
    #[track_caller]
    fn try_get<T: Value + Clone>(&self, id: &str) -> Result<T, StoreError> {
        match lookup::<Self, T>(self, id) {
            Some(Ok(value)) => Ok(value),
            Some(Err(found)) => Err(StoreError::TypeMismatch {
                key: id.to_string(),
                expected: TypeTag::of::<T>(),
                found,
            }),
            None => Err(StoreError::KeyNotFound(id.to_string())),
        }
    }

    /// Collects every entry stored as a `T`; entries of other types are skipped
    fn as_map_of<T: Value + Clone>(&self) -> HashMap<String, T> {
        self.entries()
            .into_iter()
            .filter_map(|(key, value)| {
                // Filtering is not a failed lookup, so nothing is reported.
                assert_type::<T>(&value, None).map(|narrowed| (key, narrowed.clone()))
            })
            .collect()
    }

    /// Runtime-tag counterpart of [`as_map_of`](DataStoreExt::as_map_of)
    fn as_map_of_tag(&self, tag: &TypeTag) -> HashMap<String, AnyValue> {
        self.entries()
            .into_iter()
            .filter(|(_, value)| tag.is_instance(value))
            .collect()
    }

    /// Builds a new store holding this store's entries overlaid with `other`'s.
    ///
    /// Neither input is modified. The result reports mismatches to this store's sink.
    fn merge<O: DataStore + ?Sized>(&self, other: &O) -> GenericStore {
        let merged = match self.mismatch_sink() {
            Some(sink) => GenericStore::with_sink(sink),
            None => GenericStore::new(),
        };
        merged.pull_from(self);
        merged.pull_from(other);
        merged
    }
}

impl<S: DataStore + ?Sized> DataStoreExt for S {}

/// Narrows the value at `id` to `T` without copying anything but the result.
///
/// `None` means the key is missing, `Some(Err(tag))` that it holds a value of type `tag`.
/// A mismatch is handed to the store's sink only once `with_untyped` has returned.
#[track_caller]
fn lookup<S, T>(store: &S, id: &str) -> Option<Result<T, TypeTag>>
where
    S: DataStore + ?Sized,
    T: Value + Clone,
{
    let location = Location::caller();
    let sink = store.mismatch_sink();
    let mut outcome = None;
    let mut report = None;
    store.with_untyped(id, &mut |value| {
        outcome = Some(match assert_type::<T>(value, None) {
            Some(narrowed) => Ok(narrowed.clone()),
            None => {
                if sink.is_some() {
                    report = Some(Mismatch::at::<T>(value, location));
                }
                Err(value.type_tag())
            }
        });
    });
    if let (Some(sink), Some(report)) = (sink, report) {
        sink.report(&report);
    }
    outcome
}

/// Renders every value in `store` with its `Display` implementation
///
/// # Examples
///
/// ```
/// use datastore::{stringify, AnyValue, GenericStore};
///
/// let store = GenericStore::of([
///     ("name", AnyValue::new(String::from("Ada"))),
///     ("age", AnyValue::new(36)),
/// ]);
///
/// let rendered = stringify(&store);
/// assert_eq!(rendered["name"], "Ada");
/// assert_eq!(rendered["age"], "36");
/// ```
pub fn stringify<S: DataStore + ?Sized>(store: &S) -> HashMap<String, String> {
    store
        .entries()
        .into_iter()
        .map(|(key, value)| (key, value.render()))
        .collect()
}

macro_rules! forward_data_store {
    ($($ptr:ty),*) => {$(
        impl<S: DataStore + ?Sized> DataStore for $ptr {
            fn keys(&self) -> HashSet<String> {
                (**self).keys()
            }

            fn get_untyped(&self, id: &str) -> Option<AnyValue> {
                (**self).get_untyped(id)
            }

            fn with_untyped(&self, id: &str, f: &mut dyn FnMut(&AnyValue)) {
                (**self).with_untyped(id, f)
            }

            fn entries(&self) -> Vec<(String, AnyValue)> {
                (**self).entries()
            }

            fn contains_key(&self, id: &str) -> bool {
                (**self).contains_key(id)
            }

            fn len(&self) -> usize {
                (**self).len()
            }

            fn is_empty(&self) -> bool {
                (**self).is_empty()
            }

            fn mismatch_sink(&self) -> Option<Arc<dyn MismatchSink>> {
                (**self).mismatch_sink()
            }
        }
    )*};
}

forward_data_store!(&S, Box<S>, Arc<S>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::empty::EmptyStore;

    /// A read-only store that only implements the required methods
    struct Fixed(Vec<(&'static str, AnyValue)>);

    impl DataStore for Fixed {
        fn keys(&self) -> HashSet<String> {
            self.0.iter().map(|(key, _)| key.to_string()).collect()
        }

        fn get_untyped(&self, id: &str) -> Option<AnyValue> {
            self.0
                .iter()
                .find(|(key, _)| *key == id)
                .map(|(_, value)| value.clone())
        }
    }

    fn fixed() -> Fixed {
        Fixed(vec![
            ("a", AnyValue::new(String::from("x"))),
            ("b", AnyValue::new(5i32)),
        ])
    }

    #[test]
    fn test_default_methods_follow_required_ones() {
        let store = fixed();
        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
        assert!(store.contains_key("a"));
        assert!(!store.contains_key("c"));
        assert_eq!(store.entries().len(), 2);
        assert!(store.mismatch_sink().is_none());
    }

    #[test]
    fn test_with_untyped_default_uses_get_untyped() {
        let store = fixed();
        let mut seen = Vec::new();
        store.with_untyped("b", &mut |value| seen.push(value.type_tag()));
        store.with_untyped("zzz", &mut |value| seen.push(value.type_tag()));
        assert_eq!(seen, vec![TypeTag::of::<i32>()]);
    }

    #[test]
    fn test_typed_reads_on_custom_store() {
        let store = fixed();
        assert_eq!(store.get::<i32>("b"), Some(5));
        assert_eq!(store.get::<String>("b"), None);
        assert_eq!(store.get_or("a", 0i32), 0);
        assert_eq!(store.get_or("b", 0i32), 5);
    }

    #[test]
    fn test_try_get_distinguishes_failures() {
        let store = fixed();
        assert_eq!(store.try_get::<i32>("b"), Ok(5));
        assert_eq!(
            store.try_get::<i32>("zzz"),
            Err(StoreError::KeyNotFound("zzz".to_string()))
        );
        match store.try_get::<i32>("a") {
            Err(StoreError::TypeMismatch {
                key,
                expected,
                found,
            }) => {
                assert_eq!(key, "a");
                assert_eq!(expected, TypeTag::of::<i32>());
                assert_eq!(found, TypeTag::of::<String>());
            }
            other => panic!("expected a type mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_as_map_of_filters_by_type() {
        let store = fixed();
        let strings = store.as_map_of::<String>();
        assert_eq!(strings.len(), 1);
        assert_eq!(strings["a"], "x");

        let ints = store.as_map_of_tag(&TypeTag::of::<i32>());
        assert_eq!(ints.len(), 1);
        assert_eq!(ints["b"].downcast_ref::<i32>(), Some(&5));

        assert!(store.as_map_of::<bool>().is_empty());
    }

    #[test]
    fn test_reads_through_trait_objects_and_pointers() {
        let store = fixed();
        let by_ref: &dyn DataStore = &store;
        assert_eq!(by_ref.get::<i32>("b"), Some(5));

        let boxed: Box<dyn DataStore> = Box::new(fixed());
        assert_eq!(boxed.get::<String>("a").as_deref(), Some("x"));

        let shared = Arc::new(fixed());
        assert_eq!(shared.keys().len(), 2);
        assert_eq!(stringify(&shared)["b"], "5");
    }

    #[test]
    fn test_merge_with_empty_store() {
        let merged = fixed().merge(EmptyStore::instance());
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get::<String>("a").as_deref(), Some("x"));

        let merged = EmptyStore::instance().merge(&fixed());
        assert_eq!(merged.get::<i32>("b"), Some(5));
    }
}
