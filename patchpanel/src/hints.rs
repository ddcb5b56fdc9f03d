//! Parser hints: auxiliary named values read from sibling tags.

use crate::describe::FieldDescriptor;
use crate::value::Value;
use std::collections::HashMap;

/// Named values handed to a parser alongside the raw string.
///
/// Hints collected from tags are always trimmed `String`s. Hosts calling
/// [`PatchPanel::coerce`](crate::PatchPanel::coerce) directly may insert
/// values of any type; parsers decide what they accept.
#[derive(Debug, Default)]
pub struct Hints {
    values: HashMap<String, Value>,
}

impl Hints {
    /// An empty hint table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read each named tag off `field`, trimmed. Absent tags give `""`.
    pub fn from_field<S: AsRef<str>>(field: &FieldDescriptor, names: &[S]) -> Self {
        let mut hints = Self::new();
        for name in names {
            let name = name.as_ref();
            let value = field.tag().get(name);
            hints.insert(name, value.trim().to_string());
        }
        hints
    }

    /// Set hint `name`, replacing any previous value.
    pub fn insert<T: std::any::Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) {
        self.values.insert(name.into(), Value::new(value));
    }

    /// Hint `name`, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Hint `name` as a string slice, if present and a `String`.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name)?.downcast_ref::<String>().map(String::as_str)
    }

    /// Whether hint `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of hints.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no hints.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Hints {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut hints = Self::new();
        for (name, value) in iter {
            let value: String = value.into();
            hints.insert(name, value);
        }
        hints
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TypeKey;

    #[test]
    fn test_from_field_trims_and_fills_absent() {
        let field = FieldDescriptor::new(
            "KitchenClock",
            TypeKey::of::<String>(),
            r#"dest:"3:00PM" timeFormat:"  Kitchen ""#,
        );
        let hints = Hints::from_field(&field, &["timeFormat", "locale"]);

        assert_eq!(hints.len(), 2);
        assert_eq!(hints.get_str("timeFormat"), Some("Kitchen"));
        assert_eq!(hints.get_str("locale"), Some(""));
        assert!(!hints.contains("dest"));
    }

    #[test]
    fn test_no_names_gives_empty_table() {
        let field = FieldDescriptor::new("Port", TypeKey::of::<i64>(), r#"default:"1""#);
        let names: [&str; 0] = [];
        assert!(Hints::from_field(&field, &names).is_empty());
    }

    #[test]
    fn test_collect_and_non_string_values() {
        let mut hints: Hints = [("timeFormat", "DateOnly")].into_iter().collect();
        assert_eq!(hints.get_str("timeFormat"), Some("DateOnly"));

        hints.insert("timeFormat", 3u8);
        assert_eq!(hints.get_str("timeFormat"), None);
        assert_eq!(hints.get("timeFormat").and_then(|v| v.downcast_ref::<u8>()), Some(&3));
    }
}
