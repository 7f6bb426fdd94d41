//! # datastore
//!
//! A heterogeneous key-value container with runtime type-checked access.
//!
//! `datastore` maps string keys to values of any type. Values go in without any type
//! constraint and come out only when the caller asks for the type they were stored as;
//! asking for anything else simply yields nothing. This makes it handy for passing loosely
//! structured state (options, metadata, plugin data) between components that don't share
//! a schema.
//!
//! ## Key Features
//!
//! - **Type-checked reads**: every typed read goes through [`assert_type`], never a blind cast
//! - **Never fails on misuse**: missing keys and wrong types read as absent (or the default)
//! - **Shared views**: writes take `&self`, so [`Masked`] views and other handles alias one store
//! - **Pluggable diagnostics**: failed reads can be reported to a [`MismatchSink`], e.g. `tracing`
//! - **Null object**: [`EmptyStore`] stands in wherever there is no data
//!
//! ## Usage Examples
//!
//! ### Basic Usage
//!
//! ```rust
//! use datastore::{AnyValue, DataStore, DataStoreExt, GenericStore, MutableDataStoreExt};
//!
//! let store = GenericStore::of([
//!     ("name", AnyValue::new(String::from("Ada"))),
//!     ("age", AnyValue::new(36i32)),
//! ]);
//!
//! // Typed reads
//! assert_eq!(store.get::<String>("name").as_deref(), Some("Ada"));
//! assert_eq!(store.get::<String>("age"), None);
//!
//! // The default decides the type that is looked for
//! assert_eq!(store.get_or("age", 0i32), 36);
//! assert_eq!(store.get_or("name", 0i32), 0);
//!
//! // Writes overwrite regardless of the previous type
//! store.put("age", String::from("thirty-six"));
//! assert_eq!(store.get::<i32>("age"), None);
//! assert!(store.contains_key("age"));
//! ```
//!
//! ### Filtering, Merging and Rendering
//!
//! ```rust
//! use datastore::{stringify, AnyValue, DataStore, DataStoreExt, GenericStore, MutableDataStoreExt};
//!
//! let defaults = GenericStore::of([
//!     ("theme", AnyValue::new(String::from("light"))),
//!     ("font_size", AnyValue::new(12u32)),
//! ]);
//! let overrides = GenericStore::of([("theme", AnyValue::new(String::from("dark")))]);
//!
//! // `overrides` wins on collisions, neither input changes
//! let settings = defaults.merge(&overrides);
//! assert_eq!(settings.get::<String>("theme").as_deref(), Some("dark"));
//! assert_eq!(defaults.get::<String>("theme").as_deref(), Some("light"));
//!
//! // Only the u32 entries
//! let sizes = settings.as_map_of::<u32>();
//! assert_eq!(sizes.len(), 1);
//!
//! // Everything as text
//! let text = stringify(&settings);
//! assert_eq!(text["font_size"], "12");
//!
//! // Or pull entries into an existing store
//! let session = GenericStore::new();
//! session.put("user", String::from("ada"));
//! session.pull_from(&settings);
//! assert_eq!(session.len(), 3);
//! ```
//!
//! ### Masked Views
//!
//! ```rust
//! use datastore::{DataStoreExt, GenericStore, MutableDataStoreExt};
//!
//! let store = GenericStore::new();
//! let counters = store.masked::<u64>();
//!
//! counters.set("visits", 1);
//! counters.set("visits", counters.get_or("visits", 0) + 1);
//!
//! assert_eq!(counters.get("visits"), Some(2));
//! assert_eq!(store.get::<u64>("visits"), Some(2));
//! ```
//!
//! ### Reporting Mismatches
//!
//! ```rust
//! use datastore::{DataStoreExt, GenericStore, MutableDataStoreExt, RecordingSink};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(RecordingSink::new());
//! let store = GenericStore::with_sink(sink.clone());
//! store.put("port", 8080u16);
//!
//! // Still just absent for the caller...
//! assert_eq!(store.get::<String>("port"), None);
//!
//! // ...but the sink saw what happened and where
//! let seen = sink.take();
//! assert_eq!(seen.len(), 1);
//! assert_eq!(seen[0].found.name(), "u16");
//! assert_eq!(seen[0].value, "8080");
//! ```
//!
//! Use [`TracingSink`] to send the same reports to `tracing` as warnings.
//!
//! ### Strict Lookups
//!
//! ```rust
//! use datastore::{DataStoreExt, GenericStore, MutableDataStoreExt, StoreError};
//!
//! let store = GenericStore::new();
//! store.put("retries", 3u8);
//!
//! match store.try_get::<String>("retries") {
//!     Ok(value) => println!("retries: {}", value),
//!     Err(StoreError::KeyNotFound(key)) => println!("{} is not set", key),
//!     Err(StoreError::TypeMismatch { expected, found, .. }) => {
//!         println!("wanted {}, found {}", expected, found)
//!     }
//! }
//! ```

mod any_value;
mod assertion;
mod empty;
mod error;
mod generic;
mod masked;
mod mutable;
mod store;
mod type_tag;

pub use any_value::{AnyValue, Value};
pub use assertion::{assert_type, Mismatch, MismatchSink, RecordingSink, TracingSink};
pub use empty::{EmptyStore, EMPTY};
pub use error::StoreError;
pub use generic::GenericStore;
pub use masked::Masked;
pub use mutable::{MutableDataStore, MutableDataStoreExt};
pub use store::{stringify, DataStore, DataStoreExt};
pub use type_tag::TypeTag;
