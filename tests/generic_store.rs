use datastore::{
    stringify, AnyValue, DataStore, DataStoreExt, GenericStore, MutableDataStore,
    MutableDataStoreExt, StoreError,
};
use std::collections::HashMap;

fn sample() -> GenericStore {
    GenericStore::of([
        ("test", AnyValue::new(String::from("test"))),
        ("test2", AnyValue::new(5i32)),
    ])
}

#[test]
fn test_store_and_retrieve() {
    let store = GenericStore::new();
    store.put("test", String::from("test"));

    assert_eq!(store.get::<String>("test").as_deref(), Some("test"));
    assert_eq!(
        store.get_untyped("test").map(|v| v.render()).as_deref(),
        Some("test")
    );
}

#[test]
fn test_missing_keys_read_as_absent() {
    let store = GenericStore::new();
    assert_eq!(store.get::<String>("test"), None);
    assert_eq!(store.get::<i32>("test"), None);
    assert_eq!(store.get::<bool>("test"), None);
    assert!(store.get_untyped("test").is_none());

    assert_eq!(store.get_or("test", String::from("default")), "default");
    assert_eq!(store.get_or("test", 1i32), 1);
    assert!(store.get_or("test", true));
}

#[test]
fn test_wrong_type_returns_default() {
    let store = GenericStore::new();
    store.put("test", String::from("test"));

    assert_eq!(store.get::<i32>("test"), None);
    assert_eq!(store.get_or("test", 5i32), 5);
    assert!(store.get_or("test", true));
    assert_eq!(store.get_or("test", String::new()), "test");
}

#[test]
fn test_put_overwrites_across_types() {
    let store = GenericStore::new();
    store.put("k", 1i32);
    store.put("k", String::from("two"));

    assert_eq!(store.get::<i32>("k"), None);
    assert_eq!(store.get::<String>("k").as_deref(), Some("two"));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_put_none_changes_nothing() {
    let store = sample();
    let before = stringify(&store);

    store.put_opt("test", None::<String>);
    store.put_opt("test3", None::<i32>);

    assert_eq!(stringify(&store), before);
}

#[test]
fn test_put_if_absent_keeps_any_existing_value() {
    let store = sample();

    assert!(!store.put_if_absent("test", String::from("nope")));
    assert_eq!(store.get::<String>("test").as_deref(), Some("test"));

    // A value of a different type still counts as present
    assert!(!store.put_if_absent("test2", String::from("nope")));
    assert_eq!(store.get::<i32>("test2"), Some(5));

    assert!(store.put_if_absent("test3", 6i32));
    assert_eq!(store.get::<i32>("test3"), Some(6));
}

#[test]
fn test_remove_and_clear() {
    let store = sample();

    assert!(store.remove("test"));
    assert!(!store.remove("test"));
    assert_eq!(store.get::<String>("test"), None);
    assert_eq!(store.get::<i32>("test2"), Some(5));

    store.clear();
    assert!(store.keys().is_empty());
    assert_eq!(store.get::<i32>("test2"), None);
}

#[test]
fn test_keys_and_values() {
    let store = sample();

    let keys = store.keys();
    assert_eq!(keys.len(), 2);
    assert!(keys.contains("test"));
    assert!(keys.contains("test2"));

    let mut rendered: Vec<String> = store.values().iter().map(AnyValue::render).collect();
    rendered.sort();
    assert_eq!(rendered, vec!["5".to_string(), "test".to_string()]);
}

#[test]
fn test_as_map_of() {
    let store = sample();

    let strings = store.as_map_of::<String>();
    assert_eq!(strings.get("test").map(String::as_str), Some("test"));
    assert!(!strings.contains_key("test2"));

    let ints: HashMap<String, i32> = store.as_map_of();
    assert_eq!(ints.len(), 1);
    assert_eq!(ints.get("test2"), Some(&5));
}

#[test]
fn test_merge_prefers_other_and_leaves_inputs_alone() {
    let first = sample();
    let second = GenericStore::of([
        ("test", AnyValue::new(String::from("test2"))),
        ("test3", AnyValue::new(6i32)),
    ]);

    let merged = first.merge(&second);
    assert_eq!(merged.get::<String>("test").as_deref(), Some("test2"));
    assert_eq!(merged.get::<i32>("test2"), Some(5));
    assert_eq!(merged.get::<i32>("test3"), Some(6));
    assert_eq!(merged.len(), 3);

    assert_eq!(first.get::<String>("test").as_deref(), Some("test"));
    assert!(!first.contains_key("test3"));
    assert_eq!(second.len(), 2);
    assert!(!second.contains_key("test2"));
}

#[test]
fn test_pull_from() {
    let store = sample();
    let other = GenericStore::of([
        ("test", AnyValue::new(String::from("test2"))),
        ("test3", AnyValue::new(6i32)),
    ]);

    store.pull_from(&other);
    assert_eq!(store.get::<String>("test").as_deref(), Some("test2"));
    assert_eq!(store.get::<i32>("test2"), Some(5));
    assert_eq!(store.get::<i32>("test3"), Some(6));

    assert_eq!(other.len(), 2);
    assert_eq!(other.get::<String>("test").as_deref(), Some("test2"));
}

#[test]
fn test_stringify() {
    let rendered = stringify(&sample());
    assert_eq!(rendered.len(), 2);
    assert_eq!(rendered["test"], "test");
    assert_eq!(rendered["test2"], "5");
}

#[test]
fn test_profile_scenario() {
    let store = GenericStore::of([
        ("name", AnyValue::new(String::from("Ada"))),
        ("age", AnyValue::new(36i32)),
    ]);

    assert_eq!(store.get::<String>("name").as_deref(), Some("Ada"));
    assert_eq!(store.get::<String>("age"), None);
    assert_eq!(store.get_or("age", 0i32), 36);

    let ints = store.as_map_of::<i32>();
    assert_eq!(ints.len(), 1);
    assert_eq!(ints["age"], 36);

    let rendered = stringify(&store);
    assert_eq!(rendered["name"], "Ada");
    assert_eq!(rendered["age"], "36");
}

#[test]
fn test_try_get() -> Result<(), StoreError> {
    let store = sample();
    assert_eq!(store.try_get::<i32>("test2")?, 5);

    assert!(matches!(
        store.try_get::<i32>("test"),
        Err(StoreError::TypeMismatch { .. })
    ));
    assert!(matches!(
        store.try_get::<i32>("nope"),
        Err(StoreError::KeyNotFound(_))
    ));
    Ok(())
}

#[test]
fn test_works_through_trait_objects() {
    let store: Box<dyn MutableDataStore> = Box::new(GenericStore::new());
    store.put("flag", true);
    store.put_untyped("count".to_string(), AnyValue::new(2usize));

    assert_eq!(store.get::<bool>("flag"), Some(true));
    assert_eq!(store.get_or("count", 0usize), 2);
    assert_eq!(store.len(), 2);
}
