//! Deterministic hash-based symbol identity.
//!
//! [`SymbolHash`] is a 64-bit hash computed from a function or variable
//! name. Hashes are stable across runs and independent of registration
//! order, so the signature table can be keyed by hash and a lookup never
//! needs the original string to be interned first.
//!
//! # Examples
//!
//! ```
//! use elgo_core::SymbolHash;
//!
//! let a = SymbolHash::from_name("main.add");
//! let b = SymbolHash::from_name("main.add");
//! assert_eq!(a, b);
//! assert_ne!(a, SymbolHash::from_name("main.sub"));
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain marker mixed into function-name hashes.
const FUNCTION: u64 = 0x5ea77ffbcdf5f302;

/// A deterministic 64-bit hash identifying a host-level function name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SymbolHash(pub u64);

impl SymbolHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: SymbolHash = SymbolHash(0);

    /// Create a hash from a (fully qualified) function name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        SymbolHash(FUNCTION ^ xxh64(name.as_bytes(), 0))
    }

    /// Check if this is an empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for SymbolHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolHash({:#018x})", self.0)
    }
}
