use datastore::{
    stringify, AnyValue, DataStore, DataStoreExt, EmptyStore, GenericStore, MutableDataStoreExt,
    StoreError, TracingSink,
};
use std::sync::Arc;

/// Reads a profile out of whatever store it is handed
fn describe(store: &dyn DataStore) -> String {
    let name = store.get_or("name", String::from("anonymous"));
    let age = store.get_or("age", 0i32);
    format!("{} ({})", name, age)
}

fn main() -> Result<(), StoreError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    let mut profile = GenericStore::of([
        ("name", AnyValue::new(String::from("Ada"))),
        ("age", AnyValue::new(36i32)),
    ]);
    profile.set_sink(Some(Arc::new(TracingSink)));

    println!("profile: {}", describe(&profile));
    println!("nobody:  {}", describe(EmptyStore::instance()));

    // Wrong type: absent for us, a warning in the log
    if profile.get::<String>("age").is_none() {
        println!("age is not a string");
    }

    // Masked view for the string fields
    let text = profile.masked::<String>();
    text.set("city", String::from("London"));
    println!("text fields: {:?}", text.keys());

    // Layer preferences over the profile
    let prefs = GenericStore::of([
        ("theme", AnyValue::new(String::from("dark"))),
        ("age", AnyValue::new(37i32)),
    ]);
    let combined = profile.merge(&prefs);
    println!("combined:  {}", describe(&combined));

    for (key, value) in stringify(&combined) {
        println!("  {} = {}", key, value);
    }

    combined.with_mut("age", |age: &mut i32| *age += 1)?;
    println!("next year: {}", combined.try_get::<i32>("age")?);

    Ok(())
}
