//! # Hierarchical Names
//!
//! A `Name` is an ordered list of opaque byte components addressing a packet.
//! Names print and parse in URI form (`/alice/KEY/%01%02`): unreserved ASCII
//! bytes appear verbatim, everything else as a `%XX` escape.
//!
//! Serde serializes a `Name` as its URI string so names can key JSON maps.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while parsing a name from URI form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NameError {
    /// A `%` escape was truncated or not followed by two hex digits.
    #[error("invalid percent-escape in component '{0}'")]
    BadEscape(String),

    /// The URI did not start with `/`.
    #[error("name URI must start with '/': '{0}'")]
    MissingSlash(String),
}

/// One opaque component of a name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NameComponent(Vec<u8>);

impl NameComponent {
    /// Create a component from raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw component bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bytes in the component.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the component has no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encode a non-negative integer as a fixed 8-byte big-endian component.
    ///
    /// Command-interest timestamps and certificate versions use this form.
    pub fn from_nonneg_int(value: u64) -> Self {
        Self(value.to_be_bytes().to_vec())
    }

    /// Decode an 8-byte big-endian non-negative-integer component.
    ///
    /// Returns `None` when the component is not exactly 8 bytes.
    pub fn to_nonneg_int(&self) -> Option<u64> {
        let bytes: [u8; 8] = self.0.as_slice().try_into().ok()?;
        Some(u64::from_be_bytes(bytes))
    }

    /// True if every byte is printable-unreserved and needs no escaping.
    fn byte_is_unreserved(b: u8) -> bool {
        b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~')
    }

    /// Render the component in URI form.
    pub fn to_uri(&self) -> String {
        if self.0.is_empty() {
            // An empty component round-trips as "..."
            return "...".to_string();
        }
        let mut out = String::with_capacity(self.0.len());
        for &b in &self.0 {
            if Self::byte_is_unreserved(b) {
                out.push(b as char);
            } else {
                out.push_str(&format!("%{:02X}", b));
            }
        }
        out
    }

    /// Parse a single component from URI form.
    pub fn parse_uri(text: &str) -> Result<Self, NameError> {
        if text == "..." {
            return Ok(Self(Vec::new()));
        }
        let mut bytes = Vec::with_capacity(text.len());
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c == '%' {
                let hi = chars.next();
                let lo = chars.next();
                let (hi, lo) = match (hi, lo) {
                    (Some(h), Some(l)) => (h, l),
                    _ => return Err(NameError::BadEscape(text.to_string())),
                };
                let byte = u8::from_str_radix(&format!("{hi}{lo}"), 16)
                    .map_err(|_| NameError::BadEscape(text.to_string()))?;
                bytes.push(byte);
            } else {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
        Ok(Self(bytes))
    }
}

impl From<&str> for NameComponent {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl fmt::Display for NameComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uri())
    }
}

/// A hierarchical name: an ordered list of components.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(Vec<NameComponent>);

impl Name {
    /// The empty name (`/`).
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Create a name from components.
    pub fn from_components(components: Vec<NameComponent>) -> Self {
        Self(components)
    }

    /// Parse a name from URI form (`/a/b/%00c`).
    ///
    /// Consecutive slashes are tolerated and produce no component.
    pub fn parse(uri: &str) -> Result<Self, NameError> {
        let trimmed = uri.trim();
        if trimmed.is_empty() || trimmed == "/" {
            return Ok(Self::empty());
        }
        let rest = trimmed
            .strip_prefix('/')
            .ok_or_else(|| NameError::MissingSlash(uri.to_string()))?;
        let mut components = Vec::new();
        for part in rest.split('/') {
            if part.is_empty() {
                continue;
            }
            components.push(NameComponent::parse_uri(part)?);
        }
        Ok(Self(components))
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the name has no components.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Component at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&NameComponent> {
        self.0.get(index)
    }

    /// All components in order.
    pub fn components(&self) -> &[NameComponent] {
        &self.0
    }

    /// Append a component in place.
    pub fn push(&mut self, component: NameComponent) {
        self.0.push(component);
    }

    /// Chainable append.
    pub fn append(mut self, component: impl Into<NameComponent>) -> Self {
        self.0.push(component.into());
        self
    }

    /// Chainable append of a string component.
    pub fn append_str(self, component: &str) -> Self {
        self.append(NameComponent::from(component))
    }

    /// Chainable append of an 8-byte non-negative-integer component.
    pub fn append_nonneg_int(self, value: u64) -> Self {
        self.append(NameComponent::from_nonneg_int(value))
    }

    /// The first `count` components as a new name (clamped to the length).
    pub fn prefix(&self, count: usize) -> Name {
        Name(self.0[..count.min(self.0.len())].to_vec())
    }

    /// True if `self` is a (non-strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &Name) -> bool {
        self.0.len() <= other.0.len() && self.0[..] == other.0[..self.0.len()]
    }

    /// Render the name in URI form.
    pub fn to_uri(&self) -> String {
        if self.0.is_empty() {
            return "/".to_string();
        }
        let mut out = String::new();
        for component in &self.0 {
            out.push('/');
            out.push_str(&component.to_uri());
        }
        out
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uri())
    }
}

impl FromStr for Name {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Name::parse(s)
    }
}

impl Serialize for Name {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_uri())
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let uri = String::deserialize(deserializer)?;
        Name::parse(&uri).map_err(serde::de::Error::custom)
    }
}
