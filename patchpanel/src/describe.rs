//! Struct descriptions: the field metadata tags are read from.
//!
//! Descriptions are plain data. They are usually produced by
//! `#[derive(Tagged)]`, but can be assembled by hand for types the derive
//! cannot see.

use crate::tag::StructTag;
use crate::value::TypeKey;

/// Read-only metadata about one struct field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    type_key: TypeKey,
    tag: StructTag,
}

impl FieldDescriptor {
    /// Describe a field by name, declared type, and tag blob.
    pub fn new(name: impl Into<String>, type_key: TypeKey, tag: impl Into<StructTag>) -> Self {
        Self {
            name: name.into(),
            type_key,
            tag: tag.into(),
        }
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type of the field.
    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    /// Raw tag blob.
    pub fn tag(&self) -> &StructTag {
        &self.tag
    }
}

/// Description of a struct with named fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructInfo {
    type_key: TypeKey,
    fields: Vec<FieldDescriptor>,
}

impl StructInfo {
    /// Describe a struct from its fields in declaration order.
    pub fn new(type_key: TypeKey, fields: Vec<FieldDescriptor>) -> Self {
        Self { type_key, fields }
    }

    /// Key of the struct type itself.
    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    /// Field named `name`.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Name of the field at zero-based `index`.
    pub fn field_name(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(FieldDescriptor::name)
    }

    /// All fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }
}

/// Shape of a type handed to the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeInfo {
    /// A struct with named, tagged fields.
    Struct(StructInfo),
    /// Any other type. Field lookups on it are rejected.
    Opaque(TypeKey),
}

impl TypeInfo {
    /// Description of a [`Tagged`] type.
    pub fn of<T: Tagged>() -> &'static TypeInfo {
        T::type_info()
    }

    /// Description of a type without fields.
    pub fn opaque<T: ?Sized + 'static>() -> Self {
        Self::Opaque(TypeKey::of::<T>())
    }

    /// Key of the described type.
    pub fn type_key(&self) -> TypeKey {
        match self {
            Self::Struct(info) => info.type_key(),
            Self::Opaque(key) => *key,
        }
    }

    /// `"struct"` for structs, otherwise the type's name.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Struct(_) => "struct",
            Self::Opaque(key) => key.name(),
        }
    }

    /// The struct description, if this is a struct.
    pub fn as_struct(&self) -> Option<&StructInfo> {
        match self {
            Self::Struct(info) => Some(info),
            Self::Opaque(_) => None,
        }
    }
}

impl From<StructInfo> for TypeInfo {
    fn from(info: StructInfo) -> Self {
        Self::Struct(info)
    }
}

/// Types that can describe their fields and tags.
///
/// Implemented by `#[derive(Tagged)]`:
///
/// ```rust
/// use patchpanel::{Tagged, TypeInfo, TypeKey};
///
/// #[derive(Tagged)]
/// struct Server {
///     #[tag(default = "8080")]
///     port: i64,
///     host: String,
/// }
///
/// let info = TypeInfo::of::<Server>().as_struct().unwrap();
/// let port = info.field("port").unwrap();
/// assert_eq!(port.type_key(), TypeKey::of::<i64>());
/// assert_eq!(port.tag().get("default"), "8080");
/// assert_eq!(info.field_name(1), Some("host"));
/// ```
pub trait Tagged {
    /// Description of `Self`, built once and cached.
    fn type_info() -> &'static TypeInfo;
}

/// Name of the field at `index`, for looping over a struct's fields.
///
/// Returns `None` for an absent type, a non-struct type, or an index past
/// the last field.
pub fn field_name_by_index(ty: Option<&TypeInfo>, index: usize) -> Option<&str> {
    ty?.as_struct()?.field_name(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tagged;

    fn sample() -> TypeInfo {
        struct Sample;
        StructInfo::new(
            TypeKey::of::<Sample>(),
            vec![
                FieldDescriptor::new("Port", TypeKey::of::<i64>(), r#"default:"1357""#),
                FieldDescriptor::new("Greeting", TypeKey::of::<String>(), r#"friendly:"howdy""#),
            ],
        )
        .into()
    }

    #[test]
    fn test_field_lookup() {
        let ty = sample();
        let info = ty.as_struct().unwrap();

        let port = info.field("Port").unwrap();
        assert_eq!(port.name(), "Port");
        assert_eq!(port.type_key(), TypeKey::of::<i64>());
        assert_eq!(port.tag().get("default"), "1357");
        assert!(info.field("Missing").is_none());
    }

    #[test]
    fn test_field_name_by_index() {
        let ty = sample();
        assert_eq!(field_name_by_index(Some(&ty), 0), Some("Port"));
        assert_eq!(field_name_by_index(Some(&ty), 1), Some("Greeting"));
        assert_eq!(field_name_by_index(Some(&ty), 2), None);
        assert_eq!(field_name_by_index(None, 0), None);
        assert_eq!(field_name_by_index(Some(&TypeInfo::opaque::<u8>()), 0), None);
    }

    #[test]
    fn test_kind() {
        assert_eq!(sample().kind(), "struct");
        assert_eq!(TypeInfo::opaque::<u8>().kind(), "u8");
    }

    #[allow(dead_code)]
    #[derive(Tagged)]
    struct Listener {
        #[tag(default = "127.0.0.1")]
        host: String,
        #[tag(default = "8080", env = "PORT")]
        port: i64,
    }

    #[test]
    fn test_derived_description() {
        let ty = TypeInfo::of::<Listener>();
        assert_eq!(ty.type_key(), TypeKey::of::<Listener>());
        assert_eq!(field_name_by_index(Some(ty), 1), Some("port"));

        let port = ty.as_struct().unwrap().field("port").unwrap();
        assert_eq!(port.type_key(), TypeKey::of::<i64>());
        assert_eq!(port.tag().as_str(), r#"default:"8080" env:"PORT""#);
    }
}
