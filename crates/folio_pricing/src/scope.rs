//! Discount eligibility scopes.
//!
//! A [`Scope`] restricts a discount along three independent axes. An axis with
//! no keys listed is unrestricted; every restricted axis must pass for the
//! scope to match.

use serde::{Deserialize, Serialize};

/// Restriction lists for a discount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub project_type_keys: Vec<String>,
    /// Matches if ANY selected feature is listed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feature_keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub client_type_keys: Vec<String>,
}

impl Scope {
    /// A scope with no restrictions.
    pub fn global() -> Self {
        Self::default()
    }

    pub fn for_project_types<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.project_type_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn for_features<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.feature_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn for_client_types<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.client_type_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn is_unrestricted(&self) -> bool {
        self.project_type_keys.is_empty()
            && self.feature_keys.is_empty()
            && self.client_type_keys.is_empty()
    }
}

/// The parts of a selection a scope is checked against.
#[derive(Debug, Clone, Copy)]
pub struct ScopeSelection<'a> {
    pub project_type_key: &'a str,
    pub selected_feature_keys: &'a [String],
    pub client_type_key: &'a str,
}

/// An axis of a [`Scope`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ScopeAxis {
    ProjectType,
    Feature,
    ClientType,
}

impl std::fmt::Display for ScopeAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopeAxis::ProjectType => write!(f, "project type"),
            ScopeAxis::Feature => write!(f, "features"),
            ScopeAxis::ClientType => write!(f, "client type"),
        }
    }
}

/// Check whether a selection satisfies every restricted axis of a scope.
pub fn matches_scope(scope: &Scope, selection: &ScopeSelection<'_>) -> bool {
    explain_mismatch(scope, selection).is_none()
}

/// Return the first axis the selection fails, or `None` when the scope matches.
pub fn explain_mismatch(scope: &Scope, selection: &ScopeSelection<'_>) -> Option<ScopeAxis> {
    if !scope.project_type_keys.is_empty()
        && !scope
            .project_type_keys
            .iter()
            .any(|k| k == selection.project_type_key)
    {
        return Some(ScopeAxis::ProjectType);
    }

    // Empty selection never satisfies a feature restriction.
    if !scope.feature_keys.is_empty()
        && !selection
            .selected_feature_keys
            .iter()
            .any(|selected| scope.feature_keys.contains(selected))
    {
        return Some(ScopeAxis::Feature);
    }

    if !scope.client_type_keys.is_empty()
        && !scope
            .client_type_keys
            .iter()
            .any(|k| k == selection.client_type_key)
    {
        return Some(ScopeAxis::ClientType);
    }

    None
}
