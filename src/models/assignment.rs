use super::config::ParameterValue;
use indexmap::IndexMap;

/// One concrete combination of parameter values, one value per swept parameter.
///
/// Entries keep the declaration order of the parameters they were generated from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterAssignment {
    values: IndexMap<String, ParameterValue>,
}

impl ParameterAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value of a parameter, keeping its original position if already present
    pub fn insert(&mut self, name: impl Into<String>, value: ParameterValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.values.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Every `name_value` pair joined with `-`, in assignment order
    pub fn params_label(&self) -> String {
        self.iter()
            .map(|(name, value)| format!("{}_{}", name, value))
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl<N: Into<String>> FromIterator<(N, ParameterValue)> for ParameterAssignment {
    fn from_iter<T: IntoIterator<Item = (N, ParameterValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
