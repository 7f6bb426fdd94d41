use crate::any_value::AnyValue;
use crate::type_tag::TypeTag;
use parking_lot::Mutex;
use std::fmt;
use std::panic::Location;

/// A failed type assertion, as reported to a [`MismatchSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// The offending value, rendered with `Display`
    pub value: String,
    /// The type the value was stored as
    pub found: TypeTag,
    /// The type the caller asked for
    pub expected: TypeTag,
    /// Where the lookup was made
    pub location: &'static Location<'static>,
}

impl Mismatch {
    /// Describes `value` failing to narrow to `T` at `location`
    pub(crate) fn at<T: 'static>(value: &AnyValue, location: &'static Location<'static>) -> Self {
        Self {
            value: value.render(),
            found: value.type_tag(),
            expected: TypeTag::of::<T>(),
            location,
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type assertion of {} to {} failed: {} cannot be assigned to {} (at {})",
            self.value, self.expected, self.found, self.expected, self.location
        )
    }
}

/// Receives diagnostics for failed type assertions.
///
/// Sinks are purely observational; a mismatch is still reported to the caller as an
/// absent value.
pub trait MismatchSink: Send + Sync {
    /// Called once per failed assertion, after the store that produced it has been
    /// unlocked, so a sink may read the store again.
    fn report(&self, mismatch: &Mismatch);
}

/// Forwards mismatches to `tracing` as warnings
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl MismatchSink for TracingSink {
    fn report(&self, mismatch: &Mismatch) {
        tracing::warn!(
            target: "datastore::assertion",
            value = %mismatch.value,
            found = mismatch.found.name(),
            expected = mismatch.expected.name(),
            location = %mismatch.location,
            "type assertion failed"
        );
    }
}

/// Keeps every reported mismatch in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    seen: Mutex<Vec<Mismatch>>,
}

impl RecordingSink {
    /// Creates a sink with nothing recorded
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of everything reported so far
    pub fn mismatches(&self) -> Vec<Mismatch> {
        self.seen.lock().clone()
    }

    /// Number of mismatches recorded so far
    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    /// Returns true if nothing has been reported
    pub fn is_empty(&self) -> bool {
        self.seen.lock().is_empty()
    }

    /// Drains the recorded mismatches
    pub fn take(&self) -> Vec<Mismatch> {
        std::mem::take(&mut *self.seen.lock())
    }
}

impl MismatchSink for RecordingSink {
    fn report(&self, mismatch: &Mismatch) {
        self.seen.lock().push(mismatch.clone());
    }
}

/// Narrows `value` to `T` if it was stored as a `T`.
///
/// A mismatch is not an error: it yields `None`, and is reported to `sink` (if any) along
/// with the caller's location.
///
/// # Examples
///
/// ```
/// use datastore::{assert_type, AnyValue};
///
/// let value = AnyValue::new(5i32);
/// assert_eq!(assert_type::<i32>(&value, None), Some(&5));
/// assert_eq!(assert_type::<String>(&value, None), None);
/// ```
#[track_caller]
pub fn assert_type<'a, T: 'static>(
    value: &'a AnyValue,
    sink: Option<&dyn MismatchSink>,
) -> Option<&'a T> {
    if let Some(narrowed) = value.downcast_ref::<T>() {
        return Some(narrowed);
    }
    if let Some(sink) = sink {
        sink.report(&Mismatch::at::<T>(value, Location::caller()));
    }
    None
}
