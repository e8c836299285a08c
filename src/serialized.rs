use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::key::{ArgKind, KeyArg, Primitive};

/// A structured value passed as its canonical JSON text.
///
/// Structured queries cannot be used with the default key directly. Wrapping
/// them turns them into a primitive string, so equal queries share a cache
/// slot and different ones never do. Object keys are sorted at every depth,
/// which makes the text independent of map iteration order, also when
/// `serde_json`'s `preserve_order` feature is enabled.
///
/// ```
/// # use std::collections::HashMap;
/// # use tree_select::Serialized;
/// let query = HashMap::from([("quantity", 7), ("period", 1)]);
/// let arg = Serialized::new(&query).unwrap();
/// assert_eq!(arg.as_str(), r#"{"period":1,"quantity":7}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Serialized(String);

impl Serialized {
    /// Serialize a value.
    pub fn new<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Self> {
        let value = canonical(serde_json::to_value(value)?);
        serde_json::to_string(&value).map(Self)
    }

    /// The JSON text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Rebuild every object with its keys inserted in sorted order.
fn canonical(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            let map: Map<String, Value> =
                entries.into_iter().map(|(k, v)| (k, canonical(v))).collect();
            Value::Object(map)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonical).collect()),
        other => other,
    }
}

impl KeyArg for Serialized {
    fn classify(&self) -> ArgKind<'_> {
        ArgKind::Primitive(Primitive::Str(&self.0))
    }
}

impl Display for Serialized {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.pad(&self.0)
    }
}
