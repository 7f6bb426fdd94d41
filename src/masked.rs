use crate::any_value::Value;
use crate::assertion::Mismatch;
use crate::mutable::{MutableDataStore, MutableDataStoreExt};
use crate::store::DataStoreExt;
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use std::panic::Location;

/// A view over a [`MutableDataStore`] that only deals in values of type `T`.
///
/// The view borrows the store and never copies from it: writes made through the view
/// are visible to every other handle on the store straight away, and vice versa.
/// Values of other types are simply invisible to it.
pub struct Masked<'a, S: ?Sized, T> {
    store: &'a S,
    _type: PhantomData<fn() -> T>,
}

impl<'a, S, T> Masked<'a, S, T>
where
    S: MutableDataStore + ?Sized,
    T: Value + Clone,
{
    /// Wraps `store`; usually reached through [`MutableDataStoreExt::masked`]
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _type: PhantomData,
        }
    }

    /// The value at `id` if it is a `T`
    #[track_caller]
    pub fn get(&self, id: &str) -> Option<T> {
        self.store.get::<T>(id)
    }

    /// The value at `id` if it is a `T`, otherwise `default`
    #[track_caller]
    pub fn get_or(&self, id: &str, default: T) -> T {
        self.store.get_or(id, default)
    }

    /// Stores `value`, replacing whatever `id` held before, of any type
    pub fn set(&self, id: impl Into<String>, value: T) {
        self.store.put(id, value);
    }

    /// Sets `value` if present; `None` leaves the key alone
    pub fn set_opt(&self, id: impl Into<String>, value: Option<T>) {
        self.store.put_opt(id, value);
    }

    /// Returns true if `id` holds a `T`
    pub fn contains(&self, id: &str) -> bool {
        self.store
            .get_untyped(id)
            .map_or(false, |value| value.is::<T>())
    }

    /// Keys whose values are `T`s
    pub fn keys(&self) -> HashSet<String> {
        self.store
            .entries()
            .into_iter()
            .filter(|(_, value)| value.is::<T>())
            .map(|(key, _)| key)
            .collect()
    }

    /// Removes and returns the value at `id`, but only if it is a `T`.
    ///
    /// A value of another type is left in place and reported to the store's sink like
    /// any other failed read.
    #[track_caller]
    pub fn take(&self, id: &str) -> Option<T> {
        let location = Location::caller();
        let sink = self.store.mismatch_sink();
        let mut report = None;
        let removed = self.store.remove_if(id, &mut |value| {
            if value.is::<T>() {
                return true;
            }
            if sink.is_some() {
                report = Some(Mismatch::at::<T>(value, location));
            }
            false
        });
        if let (Some(sink), Some(report)) = (sink, report) {
            sink.report(&report);
        }
        removed.and_then(|value| value.downcast_ref::<T>().cloned())
    }

    /// The wrapped store, with full access again
    pub fn unmasked(&self) -> &'a S {
        self.store
    }
}

impl<S: ?Sized, T> Clone for Masked<'_, S, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized, T> Copy for Masked<'_, S, T> {}

impl<S: ?Sized, T> fmt::Debug for Masked<'_, S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Masked")
            .field("type", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}
