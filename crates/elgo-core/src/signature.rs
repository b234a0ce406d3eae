//! Function-signature and foreign-function tables.
//!
//! Both tables are built once, before compilation starts, and are only read
//! afterwards. The compiler never guesses a calling convention from a call
//! site: whether a callee yields a value, yields nothing, or never returns
//! is always looked up here by name.

use bitflags::bitflags;
use rustc_hash::FxHashMap;

use crate::{RegistrationError, SymbolHash};

bitflags! {
    /// Calling-convention flags of a host-level function.
    ///
    /// An empty set means the function returns a usable value.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FuncFlags: u8 {
        /// The function produces no usable value.
        const VOID = 1 << 0;
        /// The function never returns control (panics).
        const PANIC = 1 << 1;
    }
}

/// A registered function signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncSig {
    /// Host-level function name.
    pub name: String,
    /// Calling convention.
    pub flags: FuncFlags,
}

impl FuncSig {
    /// Whether calls to this function produce no usable value.
    pub fn is_void(&self) -> bool {
        self.flags.contains(FuncFlags::VOID)
    }

    /// Whether calls to this function never return.
    pub fn is_panic(&self) -> bool {
        self.flags.contains(FuncFlags::PANIC)
    }
}

/// Registry mapping function names to their calling convention.
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    functions: FxHashMap<SymbolHash, FuncSig>,
}

impl FunctionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a function.
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        flags: FuncFlags,
    ) -> Result<(), RegistrationError> {
        let name = name.into();
        if flags.contains(FuncFlags::VOID | FuncFlags::PANIC) {
            return Err(RegistrationError::ConflictingFlags(name));
        }
        let hash = SymbolHash::from_name(&name);
        if self.functions.contains_key(&hash) {
            return Err(RegistrationError::DuplicateFunction(name));
        }
        self.functions.insert(hash, FuncSig { name, flags });
        Ok(())
    }

    /// Look up a function by name.
    pub fn get(&self, name: &str) -> Option<&FuncSig> {
        self.functions.get(&SymbolHash::from_name(name))
    }

    /// Whether a function with this name is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Whether calls to `name` produce no usable value.
    ///
    /// Undeclared names are host functions reached by name and always
    /// yield a value.
    pub fn is_void(&self, name: &str) -> bool {
        self.get(name).is_some_and(FuncSig::is_void)
    }

    /// Whether calls to `name` never return.
    pub fn is_panic(&self, name: &str) -> bool {
        self.get(name).is_some_and(FuncSig::is_panic)
    }

    /// Number of declared functions.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Iterate over all declared signatures (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &FuncSig> {
        self.functions.values()
    }
}

/// Registry mapping source-level intrinsic identifiers to host functions.
#[derive(Debug, Clone, Default)]
pub struct FfiTable {
    bindings: FxHashMap<String, String>,
}

impl FfiTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a source identifier to a host function name.
    pub fn register(
        &mut self,
        ident: impl Into<String>,
        host_name: impl Into<String>,
    ) -> Result<(), RegistrationError> {
        let ident = ident.into();
        if self.bindings.contains_key(&ident) {
            return Err(RegistrationError::DuplicateFfi(ident));
        }
        self.bindings.insert(ident, host_name.into());
        Ok(())
    }

    /// Host function bound to `ident`.
    pub fn get(&self, ident: &str) -> Option<&str> {
        self.bindings.get(ident).map(String::as_str)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_and_lookup() {
        let mut table = FunctionTable::new();
        table.declare("main.log", FuncFlags::VOID).unwrap();
        table.declare("Go--panic", FuncFlags::PANIC).unwrap();
        table.declare("main.add", FuncFlags::empty()).unwrap();

        assert_eq!(table.len(), 3);
        assert!(table.is_void("main.log"));
        assert!(!table.is_panic("main.log"));
        assert!(table.is_panic("Go--panic"));
        assert!(!table.is_void("main.add"));
        assert_eq!(table.get("main.add").unwrap().name, "main.add");
    }

    #[test]
    fn unknown_names_return_values() {
        let table = FunctionTable::new();
        assert!(!table.contains("length"));
        assert!(!table.is_void("length"));
        assert!(!table.is_panic("length"));
    }

    #[test]
    fn duplicate_declaration() {
        let mut table = FunctionTable::new();
        table.declare("f", FuncFlags::empty()).unwrap();
        assert_eq!(
            table.declare("f", FuncFlags::VOID),
            Err(RegistrationError::DuplicateFunction("f".into()))
        );
    }

    #[test]
    fn conflicting_flags() {
        let mut table = FunctionTable::new();
        assert_eq!(
            table.declare("f", FuncFlags::VOID | FuncFlags::PANIC),
            Err(RegistrationError::ConflictingFlags("f".into()))
        );
        assert!(table.is_empty());
    }

    #[test]
    fn ffi_bindings() {
        let mut ffi = FfiTable::new();
        ffi.register("Insert", "insert").unwrap();
        assert_eq!(ffi.get("Insert"), Some("insert"));
        assert_eq!(ffi.get("Message"), None);
        assert!(matches!(
            ffi.register("Insert", "other"),
            Err(RegistrationError::DuplicateFfi(_))
        ));
        assert_eq!(ffi.len(), 1);
    }
}
