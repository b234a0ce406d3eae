//! Host VM binding contract.
//!
//! Names the host interpreter must provide for compiled code to run:
//! sentinel symbols, reserved return-slot variables and the runtime
//! support functions the converter lowers intrinsics into.

/// The falsy / "no value" sentinel symbol.
pub const NIL: &str = "nil";

/// The truthy sentinel symbol.
pub const T: &str = "t";

/// Symbol used for interning the empty string.
pub const EMPTY_SYMBOL: &str = "##";

/// Dynamic variables holding results 2..N of a multi-result call.
///
/// The first result of a call is the VM-level return value; result `i`
/// (0-based, `i >= 1`) lives in `RESULT_VARS[i - 1]`.
pub const RESULT_VARS: [&str; 7] = [
    "Go--ret-2",
    "Go--ret-3",
    "Go--ret-4",
    "Go--ret-5",
    "Go--ret-6",
    "Go--ret-7",
    "Go--ret-8",
];

/// Maximum number of results a function may declare.
pub const MAX_RESULTS: usize = RESULT_VARS.len() + 1;

/// Reserved variable for the 0-based result `index`.
///
/// Index 0 is the VM-level return value and has no variable.
pub fn result_var(index: usize) -> Option<&'static str> {
    index
        .checked_sub(1)
        .and_then(|slot| RESULT_VARS.get(slot).copied())
}

/// Runtime support functions.
pub mod func {
    /// Coerce a host value to a boolean.
    pub const COERCE_BOOL: &str = "Go--coerce-bool";
    /// Coerce a host value to an integer.
    pub const COERCE_INT: &str = "Go--coerce-int";
    /// Coerce a host value to a float.
    pub const COERCE_FLOAT: &str = "Go--coerce-float";
    /// Coerce a host value to a string.
    pub const COERCE_STRING: &str = "Go--coerce-string";
    /// Coerce a host value to a symbol.
    pub const COERCE_SYMBOL: &str = "Go--coerce-symbol";
    /// Signal a Go panic; never returns.
    pub const PANIC: &str = "Go--panic";
    /// `string<=` helper.
    pub const STRING_LE: &str = "Go--string<=";
    /// `string>=` helper.
    pub const STRING_GE: &str = "Go--string>=";

    /// Host `intern`.
    pub const INTERN: &str = "intern";
    /// Host `funcall`, used for dynamic invocation.
    pub const FUNCALL: &str = "funcall";
    /// Host sequence duplication, used for array copy-on-assign.
    pub const COPY_SEQUENCE: &str = "copy-sequence";
    /// Host array constructor for sparse literals and zero values.
    pub const MAKE_VECTOR: &str = "make-vector";
    /// Host array constructor for dense literals.
    pub const VECTOR: &str = "vector";
    /// Host sequence length.
    pub const LENGTH: &str = "length";
    /// Host identity comparison, for operands without a numeric or string
    /// family.
    pub const EQ: &str = "eq";
    /// Host `string>`.
    pub const STRING_GT: &str = "string>";
    /// Host bitwise or.
    pub const LOGIOR: &str = "logior";
    /// Host bitwise and.
    pub const LOGAND: &str = "logand";
    /// Host bitwise xor.
    pub const LOGXOR: &str = "logxor";
    /// Host bitwise complement.
    pub const LOGNOT: &str = "lognot";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_result_has_no_variable() {
        assert_eq!(result_var(0), None);
    }

    #[test]
    fn result_slots_are_ordered() {
        assert_eq!(result_var(1), Some("Go--ret-2"));
        assert_eq!(result_var(7), Some("Go--ret-8"));
        assert_eq!(result_var(MAX_RESULTS), None);
    }
}
