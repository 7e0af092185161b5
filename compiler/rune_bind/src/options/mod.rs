//! Binder configuration.
//!
//! The compiler driver owns argument parsing; it hands the binder the
//! handful of flags that change what gets bound.

/// An unrecognized binder flag.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum OptionsError {
    #[error("unknown binder flag `{0}`")]
    UnknownFlag(String),
}

/// Flags that change how a program is bound.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BindOptions {
    /// Bind unit tests as instantiated entry points.
    pub test_mode: bool,
    /// Skip runtime checks; recorded for the code generator.
    pub unsafe_mode: bool,
    /// Bind the generated `toString` and `show` methods of every class.
    pub debug_mode: bool,
    /// Maximum number of reported errors (0 = unlimited).
    pub error_limit: usize,
}

impl BindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn test_mode(mut self, enabled: bool) -> Self {
        self.test_mode = enabled;
        self
    }

    #[must_use]
    pub fn unsafe_mode(mut self, enabled: bool) -> Self {
        self.unsafe_mode = enabled;
        self
    }

    #[must_use]
    pub fn debug_mode(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }

    #[must_use]
    pub fn error_limit(mut self, limit: usize) -> Self {
        self.error_limit = limit;
        self
    }

    /// Build options from command line style flags: `-t` (test mode),
    /// `-U` (unsafe mode) and `-g` (debug mode).
    pub fn from_flags(flags: &[&str]) -> Result<Self, OptionsError> {
        let mut options = Self::default();
        for &flag in flags {
            match flag {
                "-t" => options.test_mode = true,
                "-U" => options.unsafe_mode = true,
                "-g" => options.debug_mode = true,
                other => return Err(OptionsError::UnknownFlag(other.to_owned())),
            }
        }
        Ok(options)
    }
}
