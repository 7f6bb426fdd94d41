use crate::any_value::AnyValue;
use crate::store::DataStore;
use std::collections::HashSet;

/// A store that never holds anything.
///
/// Use it wherever a store is required but there is no data; every read reports
/// absence and `get_or` always hands back the default. There is exactly one instance,
/// [`EMPTY`].
#[derive(Debug)]
pub struct EmptyStore {
    _private: (),
}

/// The shared [`EmptyStore`]
pub static EMPTY: EmptyStore = EmptyStore { _private: () };

impl EmptyStore {
    /// The shared instance, same as `&EMPTY`
    pub fn instance() -> &'static EmptyStore {
        &EMPTY
    }
}

impl DataStore for EmptyStore {
    fn keys(&self) -> HashSet<String> {
        HashSet::new()
    }

    fn get_untyped(&self, _id: &str) -> Option<AnyValue> {
        None
    }

    fn entries(&self) -> Vec<(String, AnyValue)> {
        Vec::new()
    }

    fn contains_key(&self, _id: &str) -> bool {
        false
    }

    fn len(&self) -> usize {
        0
    }

    fn is_empty(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{stringify, DataStoreExt};

    #[test]
    fn test_instance_is_the_singleton() {
        assert!(std::ptr::eq(EmptyStore::instance(), &EMPTY));
    }

    #[test]
    fn test_reports_nothing() {
        let store = EmptyStore::instance();
        assert!(store.keys().is_empty());
        assert!(store.is_empty());
        assert!(store.get_untyped("test").is_none());
        assert!(store.as_map_of::<String>().is_empty());
        assert!(stringify(store).is_empty());
    }
}
