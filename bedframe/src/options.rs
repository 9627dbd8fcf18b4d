//! Builder configuration.

use serde::{Deserialize, Serialize};

/// Options controlling how strictly a specification is interpreted.
///
/// Implements `serde` traits so an embedding application can load it
/// alongside its own configuration.
///
/// ```
/// use bedframe::BuildOptions;
///
/// let options: BuildOptions = serde_json::from_str(r#"{ "strict": false }"#)?;
/// assert_eq!(options, BuildOptions::lenient());
/// assert!(BuildOptions::default().is_strict());
/// # Ok::<_, serde_json::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BuildOptions {
    strict: bool,
}

impl BuildOptions {
    /// Reject nodes that are neither a method nor a property container.
    #[must_use]
    pub const fn strict() -> Self {
        Self { strict: true }
    }

    /// Skip nodes that are neither a method nor a property container,
    /// logging a warning for each.
    #[must_use]
    pub const fn lenient() -> Self {
        Self { strict: false }
    }

    /// Set strictness explicitly.
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Returns `true` when malformed nodes are errors.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.strict
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::strict()
    }
}
