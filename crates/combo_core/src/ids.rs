//! crates/combo_core/src/ids.rs
//! Product identifiers (attribute/value ids) and the catalog digest id.
//! Deterministic, ASCII-only parsing; no I/O.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors returned when validating or parsing IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdError {
    NonAscii,
    TooLong,
    BadShape,
    NotANumber,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdError::NonAscii => write!(f, "id contains non-ascii bytes"),
            IdError::TooLong => write!(f, "id too long"),
            IdError::BadShape => write!(f, "id has an invalid shape"),
            IdError::NotANumber => write!(f, "id is not an unsigned integer"),
        }
    }
}

impl std::error::Error for IdError {}

const MAX_ID_LEN: usize = 256;
const HEX64_LEN: usize = 64;

#[inline]
fn is_ascii_no_nul(s: &str) -> bool {
    !s.as_bytes().iter().any(|&b| b == 0 || b > 0x7F)
}

/// Lowercase hex (length must be exactly 64).
#[inline]
pub fn is_valid_sha256(s: &str) -> bool {
    if s.len() != HEX64_LEN || !is_ascii_no_nul(s) {
        return false;
    }
    s.as_bytes()
        .iter()
        .all(|&b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

macro_rules! numeric_id_newtype {
    ($(#[$m:meta])* $name:ident) => {
        $(#[$m])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(u32);

        impl $name {
            #[inline] pub const fn new(raw: u32) -> Self { Self(raw) }
            #[inline] pub const fn get(self) -> u32 { self.0 }
        }

        impl From<u32> for $name {
            #[inline]
            fn from(raw: u32) -> Self { Self(raw) }
        }

        impl fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
        }

        impl FromStr for $name {
            type Err = IdError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                if !is_ascii_no_nul(s) { return Err(IdError::NonAscii); }
                if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(IdError::NotANumber);
                }
                s.parse::<u32>().map(Self).map_err(|_| IdError::TooLong)
            }
        }
    }
}

numeric_id_newtype!(
    /// Identifier of a product attribute (e.g. "Color").
    AttributeId
);
numeric_id_newtype!(
    /// Identifier of one attribute value (e.g. "Red"); unique across the whole product.
    ValueId
);

/// "CAT:" + 64-hex lowercase digest of the canonical catalog bytes.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CatalogId(String);

impl CatalogId {
    #[inline] pub fn as_str(&self) -> &str { &self.0 }
    #[inline] pub fn as_hex(&self) -> &str { &self.0[4..] }

    /// Build from a bare 64-hex digest.
    pub fn from_hex(hex: &str) -> Result<Self, IdError> {
        format!("CAT:{hex}").parse()
    }
}

impl fmt::Display for CatalogId {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

#[inline]
fn is_cat_shape(s: &str) -> bool {
    s.len() == 4 + HEX64_LEN
        && s.as_bytes().get(0..4) == Some(b"CAT:")
        && is_valid_sha256(&s[4..])
}

impl FromStr for CatalogId {
    type Err = IdError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !is_ascii_no_nul(s) { return Err(IdError::NonAscii); }
        if s.len() > MAX_ID_LEN { return Err(IdError::TooLong); }
        if !is_cat_shape(s) { return Err(IdError::BadShape); }
        Ok(CatalogId(s.to_owned()))
    }
}
