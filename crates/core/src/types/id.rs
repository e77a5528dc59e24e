//! Product identifiers.
//!
//! Catalog products are keyed either by a numeric id or by a string handle,
//! depending on where the product record came from. [`ProductId`] accepts
//! both and keeps whichever form it was given, so a cart persisted with
//! numeric ids reloads with numeric ids.

use core::convert::Infallible;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// A stable product identifier.
///
/// Serialized untagged: `42` and `"terracotta-horse"` are both valid.
/// A numeric id and a handle with the same digits are distinct ids.
///
/// ```
/// use artcrafts_core::ProductId;
///
/// let numeric: ProductId = "42".parse().unwrap();
/// assert_eq!(numeric, ProductId::Numeric(42));
///
/// let handle: ProductId = "terracotta-horse".parse().unwrap();
/// assert_eq!(handle.to_string(), "terracotta-horse");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    /// Integer id, as issued by the catalog service.
    Numeric(i64),
    /// String handle or opaque id.
    Handle(String),
}

impl ProductId {
    /// Returns the numeric form, if this is a numeric id.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Numeric(id) => Some(*id),
            Self::Handle(_) => None,
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Handle(handle) => f.write_str(handle),
        }
    }
}

/// Parses all-digit input as [`ProductId::Numeric`], anything else as a handle.
impl FromStr for ProductId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(trimmed
            .parse::<i64>()
            .map_or_else(|_| Self::Handle(trimmed.to_owned()), Self::Numeric))
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self::Numeric(id)
    }
}

impl From<&str> for ProductId {
    fn from(handle: &str) -> Self {
        Self::Handle(handle.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(handle: String) -> Self {
        Self::Handle(handle)
    }
}
