//! Error codes for binder diagnostics.
//!
//! Each code is a unique identifier (e.g. `E2001`) whose first digit names
//! the area that reported it.

use std::fmt;

macro_rules! error_codes {
    ($($(#[doc = $doc:literal])+ $code:ident,)*) => {
        /// Error codes for all binder diagnostics.
        ///
        /// Format: E#### where the first digit indicates the area:
        /// - E2xxx: Type errors
        /// - E3xxx: Call and scope errors
        /// - E4xxx: Code transformer errors
        /// - E5xxx: Unresolved events left after binding
        /// - E9xxx: Internal errors
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
        pub enum ErrorCode {
            $($(#[doc = $doc])+ $code,)*
        }

        impl ErrorCode {
            /// Every error code, in declaration order.
            pub const ALL: &'static [ErrorCode] = &[$(ErrorCode::$code,)*];

            /// Get the error code as a string (e.g. `"E2001"`).
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(ErrorCode::$code => stringify!($code),)*
                }
            }
        }
    };
}

error_codes! {
    // Type Errors (E2xxx)
    /// Type mismatch
    E2001,
    /// Operand has the wrong kind of type for the operator
    E2002,
    /// Variable or return type violates its declared constraint
    E2003,
    /// Invalid cast
    E2004,
    /// Secret value used where secrets are forbidden
    E2005,
    /// Invalid use of `null` or a nullable type
    E2006,
    /// Invalid index into a tuple, struct, array or string
    E2007,
    /// Format string does not match its arguments
    E2008,
    /// Switch case type differs from the switched value
    E2009,
    /// A type was used as a value, or a value as a type
    E2010,
    /// Type must be fully concrete here
    E2011,
    /// Operator not allowed in a modular expression
    E2012,
    /// Return type differs from an earlier return
    E2013,

    // Call and Scope Errors (E3xxx)
    /// Argument count mismatch
    E3001,
    /// Named parameter given twice
    E3002,
    /// Unknown named parameter
    E3003,
    /// Type parameter used as a runtime value
    E3004,
    /// Callee is not a function
    E3005,
    /// Function not callable from this context
    E3006,
    /// Statement can never be reached
    E3007,
    /// No member of that name
    E3008,
    /// Assignment to a constant
    E3009,
    /// Invalid template instantiation
    E3010,
    /// No typeswitch case matches
    E3011,
    /// Reference parameter not given a variable
    E3012,

    // Transformer Errors (E4xxx)
    /// Bad transformer arguments
    E4001,
    /// Statement not allowed in a transformer body
    E4002,
    /// Transformer condition is not a boolean
    E4003,
    /// Relationship loop contains a reference-counted class
    E4004,

    // Unresolved Events (E5xxx)
    /// Identifier never defined
    E5001,
    /// Variable type never determined
    E5002,
    /// Return type never determined
    E5003,

    // Internal Errors (E9xxx)
    /// Internal binder error
    E9001,
}

impl ErrorCode {
    /// Check if this is a type error (E2xxx range).
    pub fn is_type_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    /// Check if this is a call or scope error (E3xxx range).
    pub fn is_call_error(&self) -> bool {
        self.as_str().starts_with("E3")
    }

    /// Check if this is a code transformer error (E4xxx range).
    pub fn is_transformer_error(&self) -> bool {
        self.as_str().starts_with("E4")
    }

    /// Check if this reports an event still pending after binding (E5xxx range).
    pub fn is_unresolved(&self) -> bool {
        self.as_str().starts_with("E5")
    }

    /// Check if this is an internal error (E9xxx range).
    pub fn is_internal_error(&self) -> bool {
        matches!(self, ErrorCode::E9001)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E2001"`, case-insensitively.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}

#[cfg(test)]
mod tests;
