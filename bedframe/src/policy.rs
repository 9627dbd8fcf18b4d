//! Per-property merge policies.
//!
//! A [`PropertyTypes`] table maps property names to the [`MergePolicy`] that
//! decides how a child's value combines with the value it inherits. Names
//! missing from the table use [`MergePolicy::OnlyLatest`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a child's value for a property combines with its inherited value.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// The child's own value wins; an absent value is inherited unchanged.
    ///
    /// Objects are replaced wholesale, never merged recursively.
    #[default]
    #[serde(alias = "OnlyLatest")]
    OnlyLatest,
    /// The inherited and own values are joined with a single `/`.
    #[serde(alias = "SlashCombine")]
    SlashCombine,
    /// The value never cascades past the node that holds it.
    #[serde(alias = "Ignore")]
    Ignore,
    /// Any policy name this crate does not know. The property is left
    /// uncombined, exactly like an unknown policy in a literal.
    #[serde(other)]
    Unrecognised,
}

impl MergePolicy {
    /// Resolve a policy from its literal name.
    ///
    /// Both `snake_case` and `PascalCase` spellings are accepted; anything
    /// else, including non-string values, becomes [`Self::Unrecognised`].
    ///
    /// # Examples
    ///
    /// ```
    /// use bedframe::MergePolicy;
    /// use serde_json::json;
    ///
    /// assert_eq!(MergePolicy::from_literal(&json!("slash_combine")), MergePolicy::SlashCombine);
    /// assert_eq!(MergePolicy::from_literal(&json!("Ignore")), MergePolicy::Ignore);
    /// assert_eq!(MergePolicy::from_literal(&json!(7)), MergePolicy::Unrecognised);
    /// ```
    #[must_use]
    pub fn from_literal(value: &Value) -> Self {
        match value.as_str() {
            Some("only_latest" | "OnlyLatest") => Self::OnlyLatest,
            Some("slash_combine" | "SlashCombine") => Self::SlashCombine,
            Some("ignore" | "Ignore") => Self::Ignore,
            _ => Self::Unrecognised,
        }
    }

    /// Returns `true` when values under this policy flow to descendants.
    #[must_use]
    pub const fn cascades(self) -> bool {
        matches!(self, Self::OnlyLatest | Self::SlashCombine)
    }
}

/// Table of merge policies keyed by property name.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyTypes(BTreeMap<String, MergePolicy>);

impl PropertyTypes {
    /// Create an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add or replace the policy for `name`.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, policy: MergePolicy) -> Self {
        self.insert(name, policy);
        self
    }

    /// Add or replace the policy for `name`, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, policy: MergePolicy) -> Option<MergePolicy> {
        self.0.insert(name.into(), policy)
    }

    /// Policy governing `name`, defaulting to [`MergePolicy::OnlyLatest`].
    #[must_use]
    pub fn policy_for(&self, name: &str) -> MergePolicy {
        self.0.get(name).copied().unwrap_or_default()
    }

    /// Iterate over the declared policies in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, MergePolicy)> {
        self.0.iter().map(|(name, policy)| (name.as_str(), *policy))
    }

    /// Number of declared policies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no policy is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, MergePolicy)> for PropertyTypes {
    fn from_iter<I: IntoIterator<Item = (K, MergePolicy)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(name, policy)| (name.into(), policy)).collect())
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests panic to surface broken fixtures"
)]
mod tests {
    use super::{MergePolicy, PropertyTypes};
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case(json!("only_latest"), MergePolicy::OnlyLatest)]
    #[case(json!("OnlyLatest"), MergePolicy::OnlyLatest)]
    #[case(json!("slash_combine"), MergePolicy::SlashCombine)]
    #[case(json!("ignore"), MergePolicy::Ignore)]
    #[case(json!("deep_merge"), MergePolicy::Unrecognised)]
    #[case(json!(null), MergePolicy::Unrecognised)]
    fn literal_names_resolve(#[case] literal: Value, #[case] expected: MergePolicy) {
        assert_eq!(MergePolicy::from_literal(&literal), expected);
    }

    #[test]
    fn undeclared_names_default_to_only_latest() {
        let types = PropertyTypes::new().with("url", MergePolicy::SlashCombine);
        assert_eq!(types.policy_for("url"), MergePolicy::SlashCombine);
        assert_eq!(types.policy_for("verb"), MergePolicy::OnlyLatest);
    }

    #[test]
    fn table_reports_its_size() {
        let mut types = PropertyTypes::new();
        assert!(types.is_empty());
        types.insert("url", MergePolicy::SlashCombine);
        types.insert("url", MergePolicy::Ignore);
        assert_eq!(types.len(), 1);
        assert!(!types.is_empty());
    }

    #[test]
    fn deserializes_unknown_names_as_unrecognised() {
        let types: PropertyTypes =
            serde_json::from_value(json!({"url": "slash_combine", "x": "sideways"}))
                .expect("policy table deserializes");
        assert_eq!(types.policy_for("url"), MergePolicy::SlashCombine);
        assert_eq!(types.policy_for("x"), MergePolicy::Unrecognised);
    }
}
