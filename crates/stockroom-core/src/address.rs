//! # Addresses
//!
//! Every store operation targets either the whole collection or one row.
//!
//! ## Address Scheme
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Address Resolution                              │
//! │                                                                         │
//! │  content://com.stockroom.inventory/inventory       → Collection        │
//! │  content://com.stockroom.inventory/inventory/7     → Item(7)           │
//! │                                                                         │
//! │  content://com.stockroom.inventory/inventory/0     → InvalidId         │
//! │  content://com.stockroom.inventory/inventory/abc   → InvalidId         │
//! │  content://other.app/inventory                     → UnknownAuthority  │
//! │  content://com.stockroom.inventory/orders          → UnknownPath       │
//! │  http://com.stockroom.inventory/inventory          → UnsupportedScheme │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Parsing never silently ignores a bad address: anything that is not
//! exactly one of the two shapes above is an [`AddressError`].

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use url::Url;

use crate::error::AddressError;
use crate::query::TABLE_NAME;
use crate::types::ProductId;
use crate::SCHEME;

/// A resolved store address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Address {
    /// All products.
    Collection,
    /// One product row.
    Item(ProductId),
}

impl Address {
    /// Parses a full URI, checking scheme, authority and path.
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::{Address, DEFAULT_AUTHORITY};
    ///
    /// let address = Address::parse("content://com.stockroom.inventory/inventory/7", DEFAULT_AUTHORITY).unwrap();
    /// assert_eq!(address.id().map(|id| id.get()), Some(7));
    ///
    /// assert!(Address::parse("content://com.stockroom.inventory/inventory/0", DEFAULT_AUTHORITY).is_err());
    /// ```
    pub fn parse(uri: &str, authority: &str) -> Result<Self, AddressError> {
        let url = Url::parse(uri.trim()).map_err(|e| AddressError::Malformed {
            uri: uri.to_string(),
            reason: e.to_string(),
        })?;

        if url.scheme() != SCHEME {
            return Err(AddressError::UnsupportedScheme {
                uri: uri.to_string(),
                scheme: url.scheme().to_string(),
            });
        }

        if !url.username().is_empty()
            || url.password().is_some()
            || url.port().is_some()
            || url.query().is_some()
            || url.fragment().is_some()
        {
            return Err(AddressError::Malformed {
                uri: uri.to_string(),
                reason: "credentials, ports, queries and fragments are not allowed".to_string(),
            });
        }

        let host = url.host_str().unwrap_or_default();
        if host != authority {
            return Err(AddressError::UnknownAuthority {
                uri: uri.to_string(),
                authority: host.to_string(),
            });
        }

        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.collect())
            .unwrap_or_default();

        Self::from_segments(uri, url.path(), &segments)
    }

    /// Resolves the path segments after the authority.
    fn from_segments(uri: &str, path: &str, segments: &[&str]) -> Result<Self, AddressError> {
        let unknown_path = || AddressError::UnknownPath {
            uri: uri.to_string(),
            path: path.to_string(),
        };

        match segments {
            [table] if *table == TABLE_NAME => Ok(Address::Collection),
            [table, id] if *table == TABLE_NAME => parse_id(uri, id).map(Address::Item),
            _ => Err(unknown_path()),
        }
    }

    /// Item address for a known id.
    #[inline]
    pub const fn item(id: ProductId) -> Self {
        Address::Item(id)
    }

    /// The trailing row id, if this is an item address.
    #[inline]
    pub const fn id(&self) -> Option<ProductId> {
        match self {
            Address::Collection => None,
            Address::Item(id) => Some(*id),
        }
    }

    #[inline]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Address::Collection)
    }

    /// The collection this address lives under (itself for the collection).
    #[inline]
    pub const fn collection(&self) -> Self {
        Address::Collection
    }

    /// True if `other` is this address or lives beneath it.
    pub fn contains(&self, other: &Address) -> bool {
        match self {
            Address::Collection => true,
            Address::Item(_) => self == other,
        }
    }

    /// Returns the id, or `Unsupported` for the collection.
    pub fn require_item(&self, operation: &str) -> Result<ProductId, AddressError> {
        self.id().ok_or_else(|| AddressError::Unsupported {
            operation: operation.to_string(),
            address: self.to_string(),
        })
    }

    /// Errors with `Unsupported` unless this is the collection.
    pub fn require_collection(&self, operation: &str) -> Result<(), AddressError> {
        if self.is_collection() {
            Ok(())
        } else {
            Err(AddressError::Unsupported {
                operation: operation.to_string(),
                address: self.to_string(),
            })
        }
    }

    /// Renders the canonical URI for the given authority.
    pub fn to_uri(&self, authority: &str) -> String {
        format!("{}://{}/{}", SCHEME, authority, self)
    }

    /// `content://<authority>/inventory`
    pub fn collection_uri(authority: &str) -> String {
        Address::Collection.to_uri(authority)
    }

    /// `content://<authority>/inventory/<id>`
    pub fn item_uri(id: ProductId, authority: &str) -> String {
        Address::Item(id).to_uri(authority)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Collection => write!(f, "{}", TABLE_NAME),
            Address::Item(id) => write!(f, "{}/{}", TABLE_NAME, id),
        }
    }
}

/// Digits only: `+7`, `-7`, `7.0` and friends are rejected before `parse`.
fn parse_id(uri: &str, segment: &str) -> Result<ProductId, AddressError> {
    let invalid = || AddressError::InvalidId {
        uri: uri.to_string(),
        segment: segment.to_string(),
    };

    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    segment
        .parse::<i64>()
        .ok()
        .and_then(ProductId::new)
        .ok_or_else(invalid)
}

// =============================================================================
// Unit Tests
// =============================================================================
