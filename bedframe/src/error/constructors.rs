//! Constructors and aggregation helpers for `BedframeError`.

use std::sync::Arc;

use serde_json::Value;

use super::BedframeError;

impl BedframeError {
    /// Report that the field at `name` was not provided.
    ///
    /// # Examples
    ///
    /// ```
    /// use bedframe::BedframeError;
    /// let e = BedframeError::missing("children[0].executor");
    /// assert_eq!(e.to_string(), "Argument children[0].executor was not provided");
    /// ```
    #[must_use]
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingArgument { name: name.into() }
    }

    /// Report that the field at `name` held `received` instead of `expected`.
    #[must_use]
    pub fn wrong_type(name: impl Into<String>, expected: &'static str, received: &Value) -> Self {
        Self::WrongType {
            name: name.into(),
            expected,
            received: json_kind(received),
        }
    }

    /// Build a validation failure, typically returned from a preparer.
    ///
    /// # Examples
    ///
    /// ```
    /// use bedframe::BedframeError;
    /// let e = BedframeError::validation("namespace", "must not be empty");
    /// assert!(matches!(e, BedframeError::Validation { .. }));
    /// ```
    #[must_use]
    pub fn validation(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Specification location the error refers to, when it has one.
    ///
    /// # Examples
    ///
    /// ```
    /// use bedframe::BedframeError;
    /// let e = BedframeError::missing("children[0].executor");
    /// assert_eq!(e.location(), Some("children[0].executor"));
    /// assert_eq!(BedframeError::validation("verb", "empty").location(), None);
    /// ```
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::MissingArgument { name } | Self::WrongType { name, .. } => Some(name.as_str()),
            Self::Unrepresented { path } | Self::Collision { path, .. } => Some(path.as_str()),
            Self::Unregistered { .. } | Self::Validation { .. } | Self::Aggregate(_) => None,
        }
    }

    /// Tries to build a [`BedframeError`] from an iterator of errors.
    ///
    /// Returns `None` for an empty iterator, the error itself when a single
    /// uniquely owned error is supplied, and [`Self::Aggregate`] otherwise.
    #[must_use]
    pub fn try_aggregate<I, E>(errors: I) -> Option<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<Self>>,
    {
        let mut arcs: Vec<Arc<Self>> = errors.into_iter().map(Into::into).collect();
        if arcs.len() > 1 {
            return Some(Self::Aggregate(Box::new(arcs.into_iter().collect())));
        }
        let last = arcs.pop()?;
        Some(match Arc::try_unwrap(last) {
            Ok(err) => err,
            Err(shared) => Self::Aggregate(Box::new(std::iter::once(shared).collect())),
        })
    }

    /// Build a [`BedframeError`] from at least one error.
    ///
    /// # Panics
    ///
    /// Panics if `errors` is empty. Use [`BedframeError::try_aggregate`] when
    /// the list may be empty.
    #[must_use]
    #[track_caller]
    pub fn aggregate<I, E>(errors: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<Self>>,
    {
        Self::try_aggregate(errors).map_or_else(
            || panic!("aggregate requires at least one error"),
            |err| err,
        )
    }
}

/// Name of the JSON kind of `value`, as reported in [`BedframeError::WrongType`].
pub(crate) const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
