//! The type-indexed parser registry

use crate::error::{BoxError, PanelError, ParseError};
use crate::hints::Hints;
use crate::parsers::{self, Parser};
use crate::tag::Separators;
use crate::value::{TypeKey, Value};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use std::any::Any;
use std::collections::HashMap;
use std::str::FromStr;

/// Maps declared field types to the parsers that coerce tag strings into them.
///
/// A single lock guards the table; registration and coercion each hold it
/// for their whole duration. Parsers therefore must not call back into the
/// same `PatchPanel`.
pub struct PatchPanel {
    separators: Separators,
    parsers: Mutex<HashMap<TypeKey, Parser>>,
}

impl PatchPanel {
    /// Create a registry seeded with the [built-in parsers](crate::parsers).
    ///
    /// The separators are not used by the built-ins; they are kept for host
    /// parsers that split composite tag values (see [`Separators`]).
    pub fn new(token_separator: impl Into<String>, key_value_separator: impl Into<String>) -> Self {
        Self {
            separators: Separators::new(token_separator, key_value_separator),
            parsers: Mutex::new(parsers::builtins().into_iter().collect()),
        }
    }

    /// Separators given at construction.
    pub fn separators(&self) -> &Separators {
        &self.separators
    }

    /// Register `parser` for `key`, replacing any parser already registered
    /// for it, built-ins included.
    pub fn register<F>(&self, key: TypeKey, parser: F)
    where
        F: Fn(&str, &Hints) -> Result<Value, ParseError> + Send + Sync + 'static,
    {
        self.insert(key, std::sync::Arc::new(parser));
    }

    /// Register a typed parser under `TypeKey::of::<T>()`.
    pub fn register_type<T, F>(&self, parser: F)
    where
        T: Any + Send + Sync,
        F: Fn(&str, &Hints) -> Result<T, ParseError> + Send + Sync + 'static,
    {
        self.insert(TypeKey::of::<T>(), parsers::typed(parser));
    }

    /// Register `T`'s [`FromStr`] implementation.
    pub fn register_from_str<T>(&self)
    where
        T: FromStr + Any + Send + Sync,
        T::Err: Into<BoxError>,
    {
        self.insert(TypeKey::of::<T>(), parsers::from_str::<T>());
    }

    /// Register a JSON parser for `T`.
    pub fn register_json<T>(&self)
    where
        T: DeserializeOwned + Any + Send + Sync,
    {
        self.insert(TypeKey::of::<T>(), parsers::json::<T>());
    }

    fn insert(&self, key: TypeKey, parser: Parser) {
        let mut parsers = self.parsers.lock();
        let replaced = parsers.insert(key, parser).is_some();
        tracing::debug!(type_name = key.name(), replaced, "registered parser");
    }

    /// Whether a parser is registered for `key`.
    pub fn is_registered(&self, key: TypeKey) -> bool {
        self.parsers.lock().contains_key(&key)
    }

    /// Coerce `raw` into the type identified by `key`.
    ///
    /// The parser's own failure is returned as [`PanelError::Parse`], still
    /// carrying whatever partial value the parser produced.
    ///
    /// # Errors
    ///
    /// - [`PanelError::UnhandledType`] if nothing is registered for `key`
    /// - [`PanelError::Parse`] if the parser rejects `raw`
    pub fn coerce(&self, raw: &str, key: TypeKey, hints: &Hints) -> Result<Value, PanelError> {
        let parsers = self.parsers.lock();
        let parser = parsers.get(&key).ok_or(PanelError::UnhandledType {
            type_name: key.name(),
        })?;
        tracing::trace!(type_name = key.name(), "coercing tag value");
        Ok(parser(raw, hints)?)
    }

    /// Coerce `raw` into a `T`.
    ///
    /// # Errors
    ///
    /// As [`coerce`](Self::coerce), plus [`PanelError::ValueType`] if the
    /// registered parser returns something other than a `T`.
    pub fn coerce_as<T: Any>(&self, raw: &str, hints: &Hints) -> Result<T, PanelError> {
        let value = self.coerce(raw, TypeKey::of::<T>(), hints)?;
        downcast_value(value)
    }
}

pub(crate) fn downcast_value<T: Any>(value: Value) -> Result<T, PanelError> {
    value.downcast::<T>().map_err(|value| PanelError::ValueType {
        expected: std::any::type_name::<T>(),
        found: value.type_name(),
    })
}

impl Default for PatchPanel {
    fn default() -> Self {
        Self::new(crate::tag::TOKEN_SEPARATOR, crate::tag::KEY_VALUE_SEPARATOR)
    }
}

impl std::fmt::Debug for PatchPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parsers = self.parsers.lock();
        let mut types: Vec<_> = parsers.keys().map(TypeKey::name).collect();
        types.sort_unstable();
        f.debug_struct("PatchPanel")
            .field("separators", &self.separators)
            .field("types", &types)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, TimeDelta};
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Month {
        January = 1,
        November = 11,
    }

    #[test]
    fn test_builtins_are_seeded() {
        let panel = PatchPanel::default();
        assert!(panel.is_registered(TypeKey::of::<String>()));
        assert!(panel.is_registered(TypeKey::of::<bool>()));
        assert!(panel.is_registered(TypeKey::of::<i64>()));
        assert!(panel.is_registered(TypeKey::of::<Duration>()));
        assert!(panel.is_registered(TypeKey::of::<TimeDelta>()));
        assert!(panel.is_registered(TypeKey::of::<DateTime<FixedOffset>>()));
        assert!(!panel.is_registered(TypeKey::of::<Month>()));
    }

    #[test]
    fn test_round_trips() {
        let panel = PatchPanel::default();
        let hints = Hints::new();

        for n in [0i64, 1357, -9, i64::MAX, i64::MIN] {
            assert_eq!(panel.coerce_as::<i64>(&n.to_string(), &hints).unwrap(), n);
        }
        for b in [true, false] {
            assert_eq!(panel.coerce_as::<bool>(&b.to_string(), &hints).unwrap(), b);
        }
        for s in ["", "howdy", "a:b·c:d"] {
            assert_eq!(panel.coerce_as::<String>(s, &hints).unwrap(), s);
        }
    }

    #[test]
    fn test_duration_and_timestamp() {
        let panel = PatchPanel::default();
        assert_eq!(
            panel.coerce_as::<Duration>("5m", &Hints::new()).unwrap(),
            Duration::from_secs(300)
        );
        assert_eq!(
            panel.coerce_as::<TimeDelta>("-1h30m", &Hints::new()).unwrap(),
            TimeDelta::minutes(-90)
        );

        let ts = panel
            .coerce_as::<DateTime<FixedOffset>>("2023-01-02T15:04:05Z", &Hints::new())
            .unwrap();
        assert_eq!(ts.to_rfc3339(), "2023-01-02T15:04:05+00:00");
    }

    #[test]
    fn test_unhandled_type_names_the_type() {
        let panel = PatchPanel::default();
        let err = panel
            .coerce("11", TypeKey::of::<Month>(), &Hints::new())
            .unwrap_err();
        match err {
            PanelError::UnhandledType { type_name } => assert!(type_name.ends_with("Month")),
            other => panic!("expected UnhandledType, got {other:?}"),
        }
    }

    #[test]
    fn test_register_custom_type() {
        let panel = PatchPanel::default();
        panel.register_type::<Month, _>(|raw, _| match raw.parse::<u8>() {
            Ok(1) => Ok(Month::January),
            Ok(11) => Ok(Month::November),
            _ => Err(ParseError::new("month out of range")),
        });

        assert_eq!(
            panel.coerce_as::<Month>("11", &Hints::new()).unwrap(),
            Month::November
        );
        assert!(matches!(
            panel.coerce_as::<Month>("13", &Hints::new()),
            Err(PanelError::Parse(_))
        ));
    }

    #[test]
    fn test_register_overwrites_builtin() {
        let panel = PatchPanel::default();
        panel.register(TypeKey::of::<i64>(), |raw, _| {
            Ok(Value::new(raw.len() as i64))
        });
        assert_eq!(panel.coerce_as::<i64>("1357", &Hints::new()).unwrap(), 4);

        panel.register_type::<i64, _>(|_, _| Ok(7));
        assert_eq!(panel.coerce_as::<i64>("1357", &Hints::new()).unwrap(), 7);
    }

    #[test]
    fn test_parser_failure_keeps_partial_value() {
        let panel = PatchPanel::default();
        let err = panel
            .coerce("three thirty-ish", TypeKey::of::<DateTime<FixedOffset>>(), &{
                let mut hints = Hints::new();
                hints.insert("timeFormat", "Kitchen".to_string());
                hints
            })
            .unwrap_err();
        assert!(matches!(err, PanelError::Parse(_)));
        assert_eq!(
            err.partial_value()
                .and_then(|v| v.downcast_ref::<DateTime<FixedOffset>>()),
            Some(&parsers::zero_timestamp())
        );
    }

    #[test]
    fn test_wrong_value_type() {
        let panel = PatchPanel::default();
        panel.register(TypeKey::of::<u16>(), |_, _| Ok(Value::new("8080".to_string())));
        assert!(matches!(
            panel.coerce_as::<u16>("8080", &Hints::new()),
            Err(PanelError::ValueType { .. })
        ));
    }

    #[test]
    fn test_from_str_and_json_registration() {
        let panel = PatchPanel::default();
        panel.register_from_str::<u16>();
        panel.register_json::<Vec<String>>();

        assert_eq!(panel.coerce_as::<u16>("443", &Hints::new()).unwrap(), 443);
        assert_eq!(
            panel
                .coerce_as::<Vec<String>>(r#"["a","b"]"#, &Hints::new())
                .unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_separators_reach_host_parsers() {
        let panel = PatchPanel::new("|", "=");
        let seps = panel.separators().clone();
        panel.register_type::<Vec<(String, u16)>, _>(move |raw, _| {
            seps.pairs(raw)
                .into_iter()
                .map(|(k, v)| -> Result<(String, u16), ParseError> {
                    Ok((k.to_string(), v.parse::<u16>().map_err(ParseError::new)?))
                })
                .collect()
        });

        let ports = panel
            .coerce_as::<Vec<(String, u16)>>("http=80|https=443", &Hints::new())
            .unwrap();
        assert_eq!(ports, vec![("http".to_string(), 80), ("https".to_string(), 443)]);
    }

    #[test]
    fn test_concurrent_register_and_coerce() {
        let panel = Arc::new(PatchPanel::default());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let panel = Arc::clone(&panel);
                std::thread::spawn(move || {
                    if i % 2 == 0 {
                        panel.register_from_str::<u32>();
                    }
                    panel.coerce_as::<i64>("1357", &Hints::new()).unwrap()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1357);
        }
        assert!(panel.is_registered(TypeKey::of::<u32>()));
    }
}
