use crate::type_tag::TypeTag;
use std::any::Any;
use std::fmt;

mod sealed {
    use std::any::Any;
    use std::fmt;

    pub trait Sealed {}

    impl<T: Any + Clone + fmt::Display + Send + Sync> Sealed for T {}
}

/// Anything that can be placed in a store.
///
/// Implemented for every `Any + Clone + Display + Send + Sync` type and sealed against
/// other implementations, so a boxed value always clones and downcasts as the type it
/// was stored as. `Display` provides the textual form used by
/// [`stringify`](crate::stringify), `Clone` lets stores copy values they do not know the
/// type of.
///
/// Types that are not `Clone` cannot be stored:
///
/// ```compile_fail
/// use datastore::{AnyValue, Value};
/// use std::any::Any;
/// use std::fmt;
///
/// struct Handle(u32);
///
/// impl fmt::Display for Handle {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "{}", self.0)
///     }
/// }
///
/// impl Value for Handle {
///     fn clone_boxed(&self) -> Box<dyn Value> {
///         Box::new(self.0)
///     }
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
///     fn as_any_mut(&mut self) -> &mut dyn Any {
///         self
///     }
/// }
///
/// let _ = AnyValue::new(Handle(7));
/// ```
pub trait Value: sealed::Sealed + Any + fmt::Display + Send + Sync {
    /// Clones the value into a new box without knowing its concrete type
    fn clone_boxed(&self) -> Box<dyn Value>;

    /// The value itself, for downcasting
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T> Value for T
where
    T: Any + Clone + fmt::Display + Send + Sync,
{
    fn clone_boxed(&self) -> Box<dyn Value> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A type-erased stored value that remembers the type it was created from
pub struct AnyValue {
    tag: TypeTag,
    value: Box<dyn Value>,
}

impl AnyValue {
    /// Erases `value`, recording its [`TypeTag`]
    pub fn new<T: Value>(value: T) -> Self {
        Self {
            tag: TypeTag::of::<T>(),
            value: Box::new(value),
        }
    }

    /// The tag of the type this value was created from
    pub fn type_tag(&self) -> TypeTag {
        self.tag
    }

    /// Check if the contained value is of type T
    pub fn is<T: 'static>(&self) -> bool {
        self.tag.is::<T>()
    }

    /// Get a reference to the contained value if it is of type T
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.as_any().downcast_ref::<T>()
    }

    /// Get a mutable reference to the contained value if it is of type T
    pub fn downcast_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.value.as_any_mut().downcast_mut::<T>()
    }

    /// The value's default textual representation
    pub fn render(&self) -> String {
        self.value.to_string()
    }
}

impl Clone for AnyValue {
    fn clone(&self) -> Self {
        Self {
            tag: self.tag,
            value: self.value.clone_boxed(),
        }
    }
}

impl fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyValue")
            .field("type", &self.tag.name())
            .field("value", &self.render())
            .finish()
    }
}
