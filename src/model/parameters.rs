use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A single parameter value, kept exactly as YAML produced it.
pub type ParamValue = serde_yaml::Value;

/// Parameters handed to one worker, keyed by parameter name.
///
/// Names are kept sorted so that rendered command lines and plan dumps are
/// stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParameterSet(BTreeMap<String, ParamValue>);

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    /// Inserts a parameter, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Option<ParamValue> {
        self.0.insert(name.into(), value.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Merges `extra` over `base`.
///
/// Precedence: on a name present in both sets the value from `extra` wins.
/// Names only present in `base` are kept unchanged, names only present in
/// `extra` are added. Neither input is modified.
pub fn merge_params(base: &ParameterSet, extra: &ParameterSet) -> ParameterSet {
    let mut merged = base.clone();
    for (name, value) in extra.iter() {
        merged.0.insert(name.clone(), value.clone());
    }
    merged
}

/// The `ros__parameters` block of one parameter file.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDocument {
    source: PathBuf,
    parameters: ParameterSet,
}

impl ParameterDocument {
    pub fn new(source: impl Into<PathBuf>, parameters: ParameterSet) -> Self {
        Self {
            source: source.into(),
            parameters,
        }
    }

    /// Path the document was read from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }
}
