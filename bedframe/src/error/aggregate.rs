//! Problems collected by a validation pass.

use std::{error::Error, fmt, sync::Arc};

use super::BedframeError;

/// Every problem [`crate::Builder::validate`] found in a specification, in
/// traversal order.
///
/// Entries can be looked up by the specification location they refer to.
///
/// # Examples
///
/// ```
/// use bedframe::BedframeError;
/// let e = BedframeError::aggregate(vec![
///     BedframeError::missing("children[0].executor"),
///     BedframeError::missing("children[1].method"),
/// ]);
/// if let BedframeError::Aggregate(found) = e {
///     assert_eq!(found.len(), 2);
///     assert_eq!(
///         found.locations().collect::<Vec<_>>(),
///         ["children[0].executor", "children[1].method"]
///     );
///     assert!(found.at("children[1].method").is_some());
/// }
/// ```
#[derive(Debug, Default)]
pub struct AggregatedErrors {
    problems: Vec<Arc<BedframeError>>,
}

impl AggregatedErrors {
    /// Problems in the order they were found.
    #[must_use = "iterators should be consumed to inspect errors"]
    pub fn iter(&self) -> impl Iterator<Item = &BedframeError> {
        self.problems.iter().map(Arc::as_ref)
    }

    /// Specification locations named by the problems, skipping those that
    /// have none.
    #[must_use = "iterators should be consumed to inspect locations"]
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.iter().filter_map(BedframeError::location)
    }

    /// First problem reported at `location`.
    #[must_use]
    pub fn at(&self, location: &str) -> Option<&BedframeError> {
        self.iter().find(|problem| problem.location() == Some(location))
    }

    /// Number of problems.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.problems.len()
    }

    /// Returns `true` when nothing was collected.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}

impl FromIterator<Arc<BedframeError>> for AggregatedErrors {
    fn from_iter<I: IntoIterator<Item = Arc<BedframeError>>>(iter: I) -> Self {
        Self {
            problems: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for AggregatedErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = self.problems.iter().peekable();
        while let Some(problem) = lines.next() {
            write!(f, "  - {problem}")?;
            if lines.peek().is_some() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl Error for AggregatedErrors {}
