//! Typed values from struct field tags
//!
//! `patchpanel` reads values off struct field metadata (tags) and coerces
//! them into each field's declared type through a registry of pluggable
//! parsers. Its intended use is bootstrapping configuration: default values,
//! environment-derived values, or any other tag-driven data are read one
//! field at a time and handed to whatever layer populates the struct.
//!
//! # Features
//!
//! - **Type-indexed parsers**: lookups use the field's declared type, so
//!   host-defined types register as first-class keys
//! - **Built-ins**: `String`, `bool`, `i64`, signed `chrono::TimeDelta`,
//!   [`std::time::Duration`], and `chrono::DateTime<FixedOffset>`
//! - **Hints**: sibling tags such as `timeFormat` tune how a parser reads a value
//! - **Distinguished errors**: missing field, missing value, unhandled type,
//!   and malformed input are separate [`PanelError`] variants
//! - **Partial results**: failed coercions still report the field and the
//!   parser's zero or partial value
//!
//! # Example
//!
//! ```rust
//! use patchpanel::{PanelError, PatchPanel, Tagged, TypeInfo};
//! use std::time::Duration;
//!
//! #[derive(Tagged)]
//! struct Config {
//!     #[tag(default = "1357")]
//!     port: i64,
//!
//!     #[tag(default = "5m")]
//!     max_wait: Duration,
//!
//!     greeting: String,
//! }
//!
//! # fn main() -> Result<(), PanelError> {
//! let panel = PatchPanel::default();
//! let ty = Some(TypeInfo::of::<Config>());
//!
//! let port: i64 = panel.get_default_as("port", ty, &[] as &[&str])?;
//! assert_eq!(port, 1357);
//!
//! let max_wait: Duration = panel.get_default_as("max_wait", ty, &[] as &[&str])?;
//! assert_eq!(max_wait, Duration::from_secs(300));
//!
//! // No default configured: the caller decides the fallback
//! let greeting = panel.get_default("greeting", ty, &[] as &[&str]);
//! assert!(matches!(greeting, Err(PanelError::NoValue { .. })));
//! # Ok(())
//! # }
//! ```
//!
//! # Custom types
//!
//! Register a parser for any `'static` type. A later registration for the
//! same type replaces the earlier one, built-ins included.
//!
//! ```rust
//! use patchpanel::{Hints, ParseError, PatchPanel};
//!
//! #[derive(Debug, PartialEq)]
//! enum Level {
//!     Low,
//!     High,
//! }
//!
//! let panel = PatchPanel::default();
//! panel.register_type::<Level, _>(|raw, _hints| match raw {
//!     "low" => Ok(Level::Low),
//!     "high" => Ok(Level::High),
//!     other => Err(ParseError::new(format!("unknown level {other:?}"))),
//! });
//!
//! let level: Level = panel.coerce_as("high", &Hints::new()).unwrap();
//! assert_eq!(level, Level::High);
//! ```
//!
//! # Timestamps
//!
//! Timestamps parse as RFC 3339 unless a `timeFormat` hint names another
//! layout from [`parsers::LAYOUTS`]:
//!
//! ```rust
//! use chrono::{DateTime, FixedOffset, Timelike};
//! use patchpanel::{PatchPanel, Tagged, TypeInfo};
//!
//! #[derive(Tagged)]
//! struct Schedule {
//!     #[tag(dest = "3:00PM", timeFormat = "Kitchen")]
//!     kitchen_clock: DateTime<FixedOffset>,
//! }
//!
//! let panel = PatchPanel::default();
//! let resolved = panel
//!     .get_field_tag("kitchen_clock", "dest", Some(TypeInfo::of::<Schedule>()), &["timeFormat"])
//!     .unwrap();
//! let clock = resolved.value.downcast_ref::<DateTime<FixedOffset>>().unwrap();
//! assert_eq!(clock.hour(), 15);
//! ```

// `#[derive(Tagged)]` output names `::patchpanel`, including in this crate's tests.
extern crate self as patchpanel;

pub mod config_path;
mod describe;
mod error;
mod hints;
pub mod parsers;
mod registry;
mod resolver;
mod tag;
mod value;

pub use describe::{field_name_by_index, FieldDescriptor, StructInfo, Tagged, TypeInfo};
pub use error::{BoxError, FieldTagError, PanelError, ParseError};
pub use hints::Hints;
pub use parsers::Parser;
pub use patchpanel_derive::Tagged;
pub use registry::PatchPanel;
pub use resolver::{collect_hints, resolve_field, FieldTag, DEFAULT_TAG};
pub use tag::{Separators, StructTag, KEY_VALUE_SEPARATOR, TOKEN_SEPARATOR};
pub use value::{TypeKey, Value};
