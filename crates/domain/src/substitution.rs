//! Path parameter substitution
//!
//! Resolves `<name>` placeholders in a path template. Matching is on the
//! literal placeholder text, so parameter names are never interpreted as
//! patterns. No escaping is performed: if one parameter name is a prefix of
//! another's placeholder text the results depend on declaration order.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Lookup capability for bound parameter values.
pub trait VariableLookup {
    /// Returns the value bound to `name`, if any.
    fn lookup(&self, name: &str) -> Option<&str>;
}

impl VariableLookup for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl VariableLookup for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// Parameter values supplied by the test environment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableBindings {
    values: BTreeMap<String, String>,
}

impl VariableBindings {
    /// Creates an empty set of bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `value`, replacing any previous value.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Binds a value (builder pattern).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.bind(name, value);
        self
    }

    /// Removes a binding, returning its previous value.
    pub fn unbind(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }

    /// Returns the number of bound names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl VariableLookup for VariableBindings {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariableBindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Substitutes every declared parameter into `template`.
///
/// All parameters are checked before the path is touched, so a missing
/// binding never yields a partially substituted path.
///
/// # Errors
///
/// Returns `DomainError::MissingParameter` naming the first declared
/// parameter that has no bound value.
pub fn substitute<L>(template: &str, parameters: &[String], bindings: &L) -> DomainResult<String>
where
    L: VariableLookup + ?Sized,
{
    let mut values = Vec::with_capacity(parameters.len());
    for name in parameters {
        let value = bindings
            .lookup(name)
            .ok_or_else(|| DomainError::MissingParameter(name.clone()))?;
        values.push((name, value));
    }

    let mut path = template.to_string();
    for (name, value) in values {
        path = path.replace(&format!("<{name}>"), value);
    }
    Ok(path)
}
