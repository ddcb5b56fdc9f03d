//! Field tag blobs and composite tag values.
//!
//! A tag blob is the conventional `key:"value" other:"value"` string carried
//! by one field. Individual tag values may in turn hold composite entries
//! such as `http:80·https:443`, which [`Separators`] splits for parsers that
//! want them.

use std::fmt;

/// Separates the entries inside a single tag value (`a:b·c:d`).
///
/// A middot rarely collides with real tag content.
pub const TOKEN_SEPARATOR: &str = "·";

/// Separates key from value inside one entry (`a:b`).
pub const KEY_VALUE_SEPARATOR: &str = ":";

/// Raw tag blob of a single field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StructTag(String);

impl StructTag {
    /// Wrap a blob as written, e.g. `default:"5m" timeFormat:"Kitchen"`.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Build a blob from `(name, value)` pairs, quoting each value.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut raw = String::new();
        for (name, value) in pairs {
            if !raw.is_empty() {
                raw.push(' ');
            }
            raw.push_str(name);
            raw.push_str(":\"");
            for c in value.chars() {
                match c {
                    '"' => raw.push_str("\\\""),
                    '\\' => raw.push_str("\\\\"),
                    '\n' => raw.push_str("\\n"),
                    '\r' => raw.push_str("\\r"),
                    '\t' => raw.push_str("\\t"),
                    c => raw.push(c),
                }
            }
            raw.push('"');
        }
        Self(raw)
    }

    /// The blob as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value of tag `name`, or an empty string if the tag is absent.
    pub fn get(&self, name: &str) -> String {
        self.lookup(name).unwrap_or_default()
    }

    /// Value of tag `name`, distinguishing an absent tag from an empty one.
    ///
    /// Scanning stops at the first malformed entry; everything after it is
    /// treated as absent.
    pub fn lookup(&self, name: &str) -> Option<String> {
        let mut rest = self.0.as_bytes();
        let text = self.0.as_str();
        let mut offset = 0;

        while !rest.is_empty() {
            let skip = rest.iter().take_while(|&&b| b == b' ').count();
            rest = &rest[skip..];
            offset += skip;
            if rest.is_empty() {
                break;
            }

            let key_len = rest
                .iter()
                .take_while(|&&b| b > b' ' && b != b':' && b != b'"' && b != 0x7f)
                .count();
            if key_len == 0
                || key_len + 1 >= rest.len()
                || rest[key_len] != b':'
                || rest[key_len + 1] != b'"'
            {
                break;
            }
            let key = &text[offset..offset + key_len];
            rest = &rest[key_len + 1..];
            offset += key_len + 1;

            let mut i = 1;
            while i < rest.len() && rest[i] != b'"' {
                if rest[i] == b'\\' {
                    i += 1;
                }
                i += 1;
            }
            if i >= rest.len() {
                break;
            }
            let quoted = &text[offset..offset + i + 1];
            rest = &rest[i + 1..];
            offset += i + 1;

            if key == name {
                return unquote(quoted);
            }
        }
        None
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StructTag {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for StructTag {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

fn unquote(quoted: &str) -> Option<String> {
    let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            '0' => out.push('\0'),
            _ => return None,
        }
    }
    Some(out)
}

/// Token and key/value separators for composite tag values.
///
/// Built-in parsers ignore these; they exist for host parsers that accept
/// values such as `ports:"http:80·https:443"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Separators {
    token: String,
    key_value: String,
}

impl Separators {
    /// Create a separator pair.
    pub fn new(token: impl Into<String>, key_value: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            key_value: key_value.into(),
        }
    }

    /// Separator between entries.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Separator between key and value inside an entry.
    pub fn key_value(&self) -> &str {
        &self.key_value
    }

    /// Split `raw` into trimmed, non-empty entries.
    pub fn tokens<'a>(&self, raw: &'a str) -> Vec<&'a str> {
        if self.token.is_empty() {
            let raw = raw.trim();
            return if raw.is_empty() { Vec::new() } else { vec![raw] };
        }
        raw.split(self.token.as_str())
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .collect()
    }

    /// Split `raw` into `(key, value)` entries.
    ///
    /// An entry without the key/value separator becomes a key with an empty
    /// value.
    pub fn pairs<'a>(&self, raw: &'a str) -> Vec<(&'a str, &'a str)> {
        self.tokens(raw)
            .into_iter()
            .map(|entry| {
                if self.key_value.is_empty() {
                    return (entry, "");
                }
                match entry.split_once(self.key_value.as_str()) {
                    Some((key, value)) => (key.trim(), value.trim()),
                    None => (entry, ""),
                }
            })
            .collect()
    }
}

impl Default for Separators {
    fn default() -> Self {
        Self::new(TOKEN_SEPARATOR, KEY_VALUE_SEPARATOR)
    }
}
