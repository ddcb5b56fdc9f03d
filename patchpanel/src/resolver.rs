//! Field lookup, hint collection, and tag coercion

use crate::describe::{FieldDescriptor, TypeInfo};
use crate::error::{FieldTagError, PanelError};
use crate::hints::Hints;
use crate::registry::{downcast_value, PatchPanel};
use crate::value::Value;
use std::any::Any;

/// Tag read by [`PatchPanel::get_default`].
pub const DEFAULT_TAG: &str = "default";

/// A resolved field together with its coerced tag value.
#[derive(Debug)]
pub struct FieldTag<'a> {
    /// The field the tag was read from
    pub field: &'a FieldDescriptor,
    /// The coerced value
    pub value: Value,
}

/// Find field `field_name` on `ty`.
///
/// # Errors
///
/// - [`PanelError::NilType`] if `ty` is `None`
/// - [`PanelError::NotStruct`] if `ty` is not a struct
/// - [`PanelError::NoField`] if the struct has no such field
pub fn resolve_field<'a>(
    ty: Option<&'a TypeInfo>,
    field_name: &str,
) -> Result<&'a FieldDescriptor, PanelError> {
    let ty = ty.ok_or(PanelError::NilType)?;
    let info = ty.as_struct().ok_or(PanelError::NotStruct { kind: ty.kind() })?;
    info.field(field_name)
        .ok_or_else(|| PanelError::no_field(field_name))
}

/// Read the tags named in `hint_tags` off `field`, trimmed.
pub fn collect_hints<S: AsRef<str>>(field: &FieldDescriptor, hint_tags: &[S]) -> Hints {
    Hints::from_field(field, hint_tags)
}

impl PatchPanel {
    /// Read tag `tag_name` off field `field_name` of `ty` and coerce it into
    /// the field's declared type.
    ///
    /// Hints are read from the tags named in `hint_tags` on the same field.
    ///
    /// ```rust
    /// use patchpanel::{PatchPanel, Tagged, TypeInfo};
    /// use std::time::Duration;
    ///
    /// #[derive(Tagged)]
    /// struct Limits {
    ///     #[tag(default = "5m", max = "1h")]
    ///     max_wait: Duration,
    /// }
    ///
    /// let panel = PatchPanel::default();
    /// let resolved = panel
    ///     .get_field_tag("max_wait", "max", Some(TypeInfo::of::<Limits>()), &[] as &[&str])
    ///     .unwrap();
    /// assert_eq!(resolved.field.name(), "max_wait");
    /// assert_eq!(resolved.value.downcast_ref::<Duration>(), Some(&Duration::from_secs(3600)));
    /// ```
    ///
    /// # Errors
    ///
    /// Anything [`resolve_field`] or [`coerce`](Self::coerce) reports. When
    /// the field was found but coercion failed, the returned error still
    /// holds the field descriptor and the parser's partial value.
    pub fn get_field_tag<'a, S: AsRef<str>>(
        &self,
        field_name: &str,
        tag_name: &str,
        ty: Option<&'a TypeInfo>,
        hint_tags: &[S],
    ) -> Result<FieldTag<'a>, FieldTagError> {
        let field = resolve_field(ty, field_name).map_err(FieldTagError::unresolved)?;
        let raw = field.tag().get(tag_name);
        let value = self.coerce_field(field, &raw, hint_tags)?;
        Ok(FieldTag { field, value })
    }

    /// Coerce the `default` tag of field `field_name`.
    ///
    /// ```rust
    /// use patchpanel::{PanelError, PatchPanel, Tagged, TypeInfo};
    ///
    /// #[derive(Tagged)]
    /// struct Server {
    ///     #[tag(default = "1357")]
    ///     port: i64,
    ///     name: String,
    /// }
    ///
    /// let panel = PatchPanel::default();
    /// let ty = Some(TypeInfo::of::<Server>());
    /// let port = panel.get_default("port", ty, &[] as &[&str]).unwrap();
    /// assert_eq!(port.downcast_ref::<i64>(), Some(&1357));
    ///
    /// let name = panel.get_default("name", ty, &[] as &[&str]);
    /// assert!(matches!(name, Err(PanelError::NoValue { .. })));
    /// ```
    ///
    /// # Errors
    ///
    /// [`PanelError::NoValue`] when the tag is absent or empty, so callers
    /// can apply their own fallback; otherwise as
    /// [`get_field_tag`](Self::get_field_tag), without the descriptor.
    pub fn get_default<S: AsRef<str>>(
        &self,
        field_name: &str,
        ty: Option<&TypeInfo>,
        hint_tags: &[S],
    ) -> Result<Value, PanelError> {
        let field = resolve_field(ty, field_name)?;
        let raw = field.tag().get(DEFAULT_TAG);
        if raw.is_empty() {
            return Err(PanelError::no_value(field_name));
        }
        Ok(self.coerce_field(field, &raw, hint_tags)?)
    }

    /// Typed form of [`get_default`](Self::get_default).
    ///
    /// # Errors
    ///
    /// As [`get_default`](Self::get_default), plus
    /// [`PanelError::ValueType`] if the value is not a `T`.
    pub fn get_default_as<T: Any, S: AsRef<str>>(
        &self,
        field_name: &str,
        ty: Option<&TypeInfo>,
        hint_tags: &[S],
    ) -> Result<T, PanelError> {
        downcast_value(self.get_default(field_name, ty, hint_tags)?)
    }

    fn coerce_field<S: AsRef<str>>(
        &self,
        field: &FieldDescriptor,
        raw: &str,
        hint_tags: &[S],
    ) -> Result<Value, FieldTagError> {
        let hints = collect_hints(field, hint_tags);
        self.coerce(raw, field.type_key(), &hints)
            .map_err(|err| FieldTagError::for_field(field, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::describe::StructInfo;
    use crate::value::TypeKey;
    use chrono::{DateTime, FixedOffset, Timelike};
    use std::time::Duration;

    const NO_HINTS: &[&str] = &[];

    struct Config;

    fn config() -> TypeInfo {
        StructInfo::new(
            TypeKey::of::<Config>(),
            vec![
                FieldDescriptor::new("Port", TypeKey::of::<i64>(), r#"default:"1357""#),
                FieldDescriptor::new("Greeting", TypeKey::of::<String>(), r#"friendly:"howdy""#),
                FieldDescriptor::new("MaxWait", TypeKey::of::<Duration>(), r#"default:"5m""#),
                FieldDescriptor::new("Retries", TypeKey::of::<i64>(), r#"default:"many""#),
                FieldDescriptor::new("Blank", TypeKey::of::<i64>(), r#"default:"""#),
                FieldDescriptor::new(
                    "KitchenClock",
                    TypeKey::of::<DateTime<FixedOffset>>(),
                    r#"dest:"3:00PM" timeFormat:"Kitchen""#,
                ),
                FieldDescriptor::new("Raw", TypeKey::of::<Config>(), r#"default:"x""#),
            ],
        )
        .into()
    }

    #[test]
    fn test_resolve_guards() {
        assert!(matches!(resolve_field(None, "Port"), Err(PanelError::NilType)));
        assert!(matches!(
            resolve_field(Some(&TypeInfo::opaque::<u8>()), "Port"),
            Err(PanelError::NotStruct { kind: "u8" })
        ));

        let ty = config();
        assert!(matches!(
            resolve_field(Some(&ty), "Nope"),
            Err(PanelError::NoField { field }) if field == "Nope"
        ));
        assert_eq!(resolve_field(Some(&ty), "Port").unwrap().name(), "Port");
    }

    #[test]
    fn test_get_field_tag() {
        let panel = PatchPanel::default();
        let ty = config();

        let greeting = panel
            .get_field_tag("Greeting", "friendly", Some(&ty), NO_HINTS)
            .unwrap();
        assert_eq!(greeting.field.tag().as_str(), r#"friendly:"howdy""#);
        assert_eq!(greeting.value.downcast_ref::<String>().unwrap(), "howdy");

        let clock = panel
            .get_field_tag("KitchenClock", "dest", Some(&ty), &["timeFormat"])
            .unwrap();
        let clock = clock.value.downcast_ref::<DateTime<FixedOffset>>().unwrap();
        assert_eq!(clock.hour(), 15);
    }

    #[test]
    fn test_get_field_tag_failure_keeps_descriptor() {
        let panel = PatchPanel::default();
        let ty = config();

        let err = panel
            .get_field_tag("Retries", "default", Some(&ty), NO_HINTS)
            .unwrap_err();
        let field = err.field().unwrap();
        assert_eq!(field.name(), "Retries");
        assert_eq!(field.type_key(), TypeKey::of::<i64>());
        assert_eq!(field.tag().get("default"), "many");
        assert!(matches!(err.error(), PanelError::Parse(_)));
        assert_eq!(err.partial_value().and_then(|v| v.downcast_ref::<i64>()), Some(&0));

        let err = panel
            .get_field_tag("Missing", "default", Some(&ty), NO_HINTS)
            .unwrap_err();
        assert!(err.field().is_none());
        assert!(matches!(err.into_error(), PanelError::NoField { .. }));
    }

    #[test]
    fn test_get_field_tag_unhandled_type() {
        let panel = PatchPanel::default();
        let ty = config();
        let err = panel
            .get_field_tag("Raw", "default", Some(&ty), NO_HINTS)
            .unwrap_err();
        assert!(err.field().is_some());
        assert!(matches!(err.error(), PanelError::UnhandledType { .. }));
    }

    #[test]
    fn test_get_default() {
        let panel = PatchPanel::default();
        let ty = config();

        assert_eq!(panel.get_default_as::<i64, _>("Port", Some(&ty), NO_HINTS).unwrap(), 1357);
        assert_eq!(
            panel
                .get_default_as::<Duration, _>("MaxWait", Some(&ty), NO_HINTS)
                .unwrap(),
            Duration::from_secs(300)
        );
    }

    #[test]
    fn test_get_default_no_value_is_distinct() {
        let panel = PatchPanel::default();
        let ty = config();

        for field in ["Greeting", "Blank"] {
            assert!(matches!(
                panel.get_default(field, Some(&ty), NO_HINTS),
                Err(PanelError::NoValue { field: f }) if f == field
            ));
        }
        assert!(matches!(
            panel.get_default("Retries", Some(&ty), NO_HINTS),
            Err(PanelError::Parse(_))
        ));
        assert!(matches!(
            panel.get_default("Port", None, NO_HINTS),
            Err(PanelError::NilType)
        ));
    }
}
