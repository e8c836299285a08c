use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;
use tree_select::{Mode, Selector, Serialized};

#[derive(Serialize)]
struct StatsQuery {
    period: &'static str,
    quantity: u32,
}

type Stats = Arc<HashMap<String, u32>>;

/// Test that serialized queries are usable as primitive arguments.
#[test]
fn test_serialized_query_arguments() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    let visits = Selector::builder()
        .dependents(|stats: &Stats, _: &(u64, Serialized)| (stats.clone(),))
        .compute(|(stats,): &(Stats,), (site, query): &(u64, Serialized)| {
            CALLS.fetch_add(1, Ordering::SeqCst);
            stats.get(&format!("{site}:{query}")).copied().unwrap_or(0)
        })
        .mode(Mode::Development)
        .build()
        .unwrap();

    let day = Serialized::new(&StatsQuery { period: "day", quantity: 7 }).unwrap();
    let week = Serialized::new(&StatsQuery { period: "week", quantity: 7 }).unwrap();
    let stats: Stats = Arc::new(HashMap::from([(format!("2916284:{day}"), 42)]));

    assert_eq!(visits.select(&stats, (2916284, day.clone())).unwrap(), 42);
    assert_eq!(visits.select(&stats, (2916284, week)).unwrap(), 0);
    assert_eq!(visits.select(&stats, (2916284, day)).unwrap(), 42);
    assert_eq!(CALLS.load(Ordering::SeqCst), 2);
    assert_eq!(visits.len(), 2);
}

#[test]
fn test_serialized_text_is_canonical() {
    let a = Serialized::new(&HashMap::from([("b", 1), ("a", 2)])).unwrap();
    let b = Serialized::new(&HashMap::from([("a", 2), ("b", 1)])).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.as_str(), r#"{"a":2,"b":1}"#);
}

#[test]
fn test_serialized_nested_objects_are_sorted() {
    let inner = HashMap::from([("z", 1), ("m", 2), ("a", 3)]);
    let outer = HashMap::from([("query", vec![inner.clone()]), ("filter", vec![inner])]);
    let arg = Serialized::new(&outer).unwrap();
    assert_eq!(
        arg.as_str(),
        r#"{"filter":[{"a":3,"m":2,"z":1}],"query":[{"a":3,"m":2,"z":1}]}"#
    );
}
